//! Extension entry point: owns the feature modules and fans host events out
//! to them

use tracing::info;

use crate::features::{AutoHeadComment, ColorHighLight, CommentColor};
use crate::host::{HostContext, HostEvent};
use crate::module::Module;

/// The set of feature modules, in activation order
pub struct CodeHelper {
    modules: Vec<Module>,
}

impl CodeHelper {
    /// Create the extension with every feature module
    pub fn new() -> Self {
        Self {
            modules: vec![
                Module::new(Box::new(AutoHeadComment::new())),
                Module::new(Box::new(CommentColor::new())),
                Module::new(Box::new(ColorHighLight::new())),
            ],
        }
    }

    /// Module names in activation order
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(Module::name).collect()
    }

    /// Look up a module by name
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// Initialize every module
    pub fn activate(&mut self, ctx: &mut HostContext<'_>) {
        info!("codehelper activating");
        for module in &mut self.modules {
            module.init(ctx);
        }
    }

    /// Deliver a host event to every module
    pub fn dispatch(&mut self, event: &HostEvent, ctx: &mut HostContext<'_>) {
        for module in &mut self.modules {
            module.handle_event(event, ctx);
        }
    }

    /// Tear every module down and forget them
    pub fn deactivate(&mut self, ctx: &mut HostContext<'_>) {
        for mut module in self.modules.drain(..) {
            module.dispose(ctx);
        }
        info!("codehelper deactivated");
    }
}

impl Default for CodeHelper {
    fn default() -> Self {
        Self::new()
    }
}
