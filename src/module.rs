//! Feature module lifecycle
//!
//! Every feature is wrapped in a `Module`, which reads the feature's
//! `<Name>Enable` flag, turns the feature on and off as the flag changes and
//! routes host events to the feature only while it is listening for them.

use tracing::{debug, error};

use crate::config::get_bool;
use crate::error::Result;
use crate::host::{EventKind, HostContext, HostEvent};

/// Event kinds a feature is currently listening for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    kinds: Vec<EventKind>,
}

impl Subscriptions {
    /// Start listening for an event kind
    pub fn add(&mut self, kind: EventKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    /// Stop listening for everything
    pub fn clear(&mut self) {
        self.kinds.clear();
    }

    /// Whether an event kind is being listened for
    pub fn contains(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Whether nothing is being listened for
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// A toggleable editor feature
pub trait Feature {
    /// Module name; the enable flag is `<name>Enable`
    fn name(&self) -> &'static str;

    /// One-time setup before the enable flag is read
    fn on_init(&mut self, _ctx: &mut HostContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Turn the feature on and register the events it listens for
    fn on_enable(&mut self, ctx: &mut HostContext<'_>, listeners: &mut Subscriptions);

    /// Turn the feature off and release its resources
    fn on_disable(&mut self, ctx: &mut HostContext<'_>);

    /// Handle an event the feature subscribed to
    fn on_event(&mut self, event: &HostEvent, ctx: &mut HostContext<'_>);

    /// Final teardown
    fn on_dispose(&mut self, _ctx: &mut HostContext<'_>) {}
}

/// Lifecycle wrapper around a feature
pub struct Module {
    feature: Box<dyn Feature>,
    listeners: Subscriptions,
    watching_enable_flag: bool,
    enabled: bool,
}

impl Module {
    /// Wrap a feature; nothing happens until `init`
    pub fn new(feature: Box<dyn Feature>) -> Self {
        Self {
            feature,
            listeners: Subscriptions::default(),
            watching_enable_flag: false,
            enabled: false,
        }
    }

    /// Module name
    pub fn name(&self) -> &'static str {
        self.feature.name()
    }

    /// Configuration key of the enable flag
    pub fn enable_key(&self) -> String {
        format!("{}Enable", self.name())
    }

    /// Whether the feature is currently on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Event kinds the feature is listening for
    pub fn listeners(&self) -> &Subscriptions {
        &self.listeners
    }

    /// Initialize the module
    ///
    /// Failures are logged and leave the module inert.
    pub fn init(&mut self, ctx: &mut HostContext<'_>) {
        match self.try_init(ctx) {
            Ok(()) => debug!(module = self.name(), "init success"),
            Err(e) => error!(module = self.name(), error = %e, "init failed"),
        }
    }

    fn try_init(&mut self, ctx: &mut HostContext<'_>) -> Result<()> {
        self.feature.on_init(ctx)?;

        // Only an explicit `false` keeps the module dormant at startup
        if ctx.config.get(&self.enable_key()).and_then(|v| v.as_bool()) != Some(false) {
            self.enable(ctx);
        }
        self.watching_enable_flag = true;
        Ok(())
    }

    /// Runtime check: anything but an explicit `true` counts as disabled
    fn is_module_enabled(&self, ctx: &HostContext<'_>) -> bool {
        get_bool(ctx.config, &self.enable_key()).unwrap_or(false)
    }

    fn enable(&mut self, ctx: &mut HostContext<'_>) {
        if self.enabled {
            return;
        }
        debug!(module = self.name(), "module enable");
        self.enabled = true;
        self.feature.on_enable(ctx, &mut self.listeners);
    }

    fn disable(&mut self, ctx: &mut HostContext<'_>) {
        if !self.enabled {
            return;
        }
        debug!(module = self.name(), "module disable");
        self.enabled = false;
        self.listeners.clear();
        self.feature.on_disable(ctx);
    }

    /// Route a host event
    pub fn handle_event(&mut self, event: &HostEvent, ctx: &mut HostContext<'_>) {
        if let HostEvent::ConfigurationChanged(change) = event {
            if self.watching_enable_flag && change.affects(&self.enable_key()) {
                if self.is_module_enabled(ctx) {
                    self.enable(ctx);
                } else {
                    self.disable(ctx);
                }
            }
        }

        if self.enabled && self.listeners.contains(event.kind()) {
            self.feature.on_event(event, ctx);
        }
    }

    /// Release every listener and tear the feature down
    pub fn dispose(&mut self, ctx: &mut HostContext<'_>) {
        self.watching_enable_flag = false;
        self.listeners.clear();
        if self.enabled {
            self.enabled = false;
            self.feature.on_disable(ctx);
        }
        self.feature.on_dispose(ctx);
    }
}
