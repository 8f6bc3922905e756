//! codehelper - terminal host for the CodeHelper editor features
//!
//! Previews files with their comment-tag and color-literal decorations, or
//! creates new files and lets the header feature stamp them.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use tracing::{warn, Level};

use codehelper::config::{get_typed, COLOR_THEME_KEY};
use codehelper::error::{CodeHelperError, Result};
use codehelper::host::{DecorationStore, EditorSet, StdFileSystem};
use codehelper::syntax::{Contributions, LanguageRegistry, ThemeRegistry};
use codehelper::terminal::Preview;
use codehelper::{CodeHelper, FileSystem, HostContext, HostEvent, TextDocument, TomlConfiguration, Workspace};

const LOG_ENV: &str = "CODEHELPER_LOG";
const FALLBACK_LANGUAGE: &str = "plaintext";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// What the binary was asked to do
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Preview(Vec<PathBuf>),
    New(Vec<PathBuf>),
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    command: Command,
    config: Option<PathBuf>,
    extensions: Vec<PathBuf>,
}

/// Parse arguments; `None` means help or version was printed
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut command = None;
    let mut files = Vec::new();
    let mut config = None;
    let mut extensions = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                print_version();
                return Ok(None);
            }
            "--config" => {
                let value = iter.next().ok_or_else(|| CodeHelperError::MissingValue(arg.clone()))?;
                config = Some(PathBuf::from(value));
            }
            "--extensions" => {
                let value = iter.next().ok_or_else(|| CodeHelperError::MissingValue(arg.clone()))?;
                extensions.push(PathBuf::from(value));
            }
            flag if flag.starts_with('-') => {
                return Err(CodeHelperError::UnknownArgument(flag.to_string()));
            }
            "preview" | "new" if command.is_none() => command = Some(arg.clone()),
            path => files.push(PathBuf::from(path)),
        }
    }

    let command = match command.as_deref() {
        Some("preview") => Command::Preview(files),
        Some(_) => Command::New(files),
        None => {
            print_usage();
            return Ok(None);
        }
    };

    Ok(Some(Options {
        command,
        config,
        extensions,
    }))
}

fn init_logging() {
    let level = env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

/// Every host service the features need, owned by the binary
struct TerminalHost {
    editors: EditorSet,
    config: TomlConfiguration,
    decorations: DecorationStore,
    languages: LanguageRegistry,
    fs: StdFileSystem,
}

impl TerminalHost {
    fn context(&mut self) -> HostContext<'_> {
        HostContext {
            workspace: &self.editors,
            config: &self.config,
            decorations: &mut self.decorations,
            languages: &mut self.languages,
            fs: &self.fs,
        }
    }

    fn language_for(&self, path: &Path) -> String {
        self.languages
            .detect_language(path)
            .unwrap_or(FALLBACK_LANGUAGE)
            .to_string()
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(options) = parse_args(&args)? else {
        return Ok(());
    };

    init_logging();

    let config = match &options.config {
        Some(path) => TomlConfiguration::load_from(path)?,
        None => TomlConfiguration::load()?,
    };

    let contributions = Contributions::discover(&options.extensions);
    let mut languages = LanguageRegistry::new();
    languages.update_definitions(&contributions);
    let mut themes = ThemeRegistry::new();
    themes.update_definitions(&contributions);

    let mut host = TerminalHost {
        editors: EditorSet::new(),
        config,
        decorations: DecorationStore::new(),
        languages,
        fs: StdFileSystem,
    };
    let mut helper = CodeHelper::new();

    match options.command {
        Command::Preview(files) => preview(&mut host, &mut helper, &mut themes, &files)?,
        Command::New(files) => create(&mut host, &mut helper, &files)?,
    }

    helper.deactivate(&mut host.context());
    Ok(())
}

/// Open every file, activate the features and print the decorated result
fn preview(
    host: &mut TerminalHost,
    helper: &mut CodeHelper,
    themes: &mut ThemeRegistry,
    files: &[PathBuf],
) -> Result<()> {
    for path in files {
        let language = host.language_for(path);
        let document = TextDocument::from_file(path, language)?;
        host.editors.open(document);
    }

    helper.activate(&mut host.context());

    let background = get_typed::<String>(&host.config, COLOR_THEME_KEY)
        .and_then(|theme| themes.editor_background(&theme));
    let preview = Preview::new().background(background.as_deref());

    let mut stdout = io::stdout().lock();
    let editors = host.editors.visible_editors();
    for editor in editors {
        let Some(document) = host.editors.document(editor) else {
            continue;
        };
        if files.len() > 1 {
            if let Some(path) = document.path() {
                writeln!(stdout, "==> {} <==", path.display())?;
            }
        }
        preview.render(&mut stdout, document, &host.decorations.for_editor(editor))?;
    }
    Ok(())
}

/// Create missing files and announce them to the features
fn create(host: &mut TerminalHost, helper: &mut CodeHelper, files: &[PathBuf]) -> Result<()> {
    helper.activate(&mut host.context());

    let mut created = Vec::new();
    for path in files {
        if path.exists() {
            warn!(path = %path.display(), "file exists, skipped");
            continue;
        }
        host.fs.write(path, "")?;
        created.push(path.clone());
    }

    if !created.is_empty() {
        helper.dispatch(&HostEvent::FilesCreated(created), &mut host.context());
    }
    Ok(())
}

fn print_usage() {
    println!("codehelper {} - header comments and highlighting helpers", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: codehelper [OPTIONS] <preview|new> FILE...");
    println!();
    println!("Commands:");
    println!("  preview FILE...        Print files with tag and color highlighting");
    println!("  new FILE...            Create files and insert the configured header");
    println!();
    println!("Options:");
    println!("  --config PATH          Use a configuration file other than ~/.codehelper.toml");
    println!("  --extensions DIR       Add an extension directory (repeatable)");
    println!("  -h, --help             Show this help message");
    println!("  -V, --version          Show version information");
    println!();
    println!("Set {}=debug to see module lifecycle logs.", LOG_ENV);
}

fn print_version() {
    println!("codehelper {}", env!("CARGO_PKG_VERSION"));
}
