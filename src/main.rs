//! Akari editor - render a document's preview from the command line
//!
//! Entry point for the binary. Handles CLI argument parsing, logging
//! initialization, and printing the preview HTML.

use akari_editor::config::Config;
use akari_editor::error::AppError;
use akari_editor::{Editor, SyntaxMode};
use anyhow::Context;
use std::path::PathBuf;

/// Application name for logging
const APP_NAME: &str = "akari-editor";

/// Parsed command line arguments
#[derive(Debug, Default)]
struct Flags {
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    mode: Option<SyntaxMode>,
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let flags = parse_args();
    let Some(path) = flags.file else {
        eprintln!("Error: no input file");
        eprintln!("Use --help for usage information");
        std::process::exit(1);
    };

    let config = match &flags.config {
        Some(config_path) => Config::load_from(config_path)
            .with_context(|| format!("loading {}", config_path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            log::warn!("{}; using default configuration", e);
            Config::default()
        }),
    };

    let content = std::fs::read_to_string(&path).map_err(|source| AppError::ReadError {
        path: path.clone(),
        source,
    })?;

    let mut editor = Editor::with_config(&content, flags.mode, &config)?;
    log::info!(
        "Rendering {} as {}",
        path.display(),
        editor.mode().display_name()
    );
    println!("{}", editor.render_preview_now());

    Ok(())
}

/// Initialize the logging system
fn init_logging() {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,akari_editor=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// Parse command line arguments
fn parse_args() -> Flags {
    let args: Vec<String> = std::env::args().collect();
    let mut flags = Flags::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--html" => flags.mode = Some(SyntaxMode::Html),
            "--markdown" => flags.mode = Some(SyntaxMode::Markdown),
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    flags.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
            _ => {
                if flags.file.is_some() {
                    eprintln!("Error: only one input file is supported");
                    std::process::exit(1);
                }
                flags.file = Some(PathBuf::from(&args[i]));
            }
        }
        i += 1;
    }

    flags
}

/// Print help message
fn print_help() {
    println!(
        r#"Akari editor - Markdown/HTML preview renderer

USAGE:
    akari-editor [OPTIONS] FILE

OPTIONS:
    -h, --help          Show this help message
    -v, --version       Show version information
    -c, --config PATH   Load configuration from PATH
        --html          Treat the input as HTML (shown as written)
        --markdown      Treat the input as Markdown (default)

EXAMPLES:
    akari-editor post.md                Print the preview HTML of post.md
    akari-editor --html page.html       Pass an HTML document through

EDITOR SHORTCUTS:
    Ctrl+B / Ctrl+I / Ctrl+U    Bold / italic / underline
    Ctrl+K                      Insert link
    Ctrl+`                      Inline code
    Ctrl+Shift+`                Code block
    Ctrl+S                      Save
    Ctrl+Z / Ctrl+Shift+Z       Undo / redo
    Ctrl+Shift+P                Toggle preview
    Ctrl+Shift+Enter            Fullscreen
"#
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}
