use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nep_cli::commands::{config_ops, convert_ops, layout_ops};
use nep_cli::type_session;

#[derive(Parser)]
#[command(name = "neptool", about = "Romanized Nepali typing tool")]
struct Cli {
    /// Custom keymap TOML replacing the built-in layout
    #[arg(long, global = true)]
    keymap_file: Option<PathBuf>,
    /// Custom settings TOML
    #[arg(long, global = true)]
    settings_file: Option<PathBuf>,
    /// Log binder decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Write JSON-lines traces to DIR instead of logging to stderr
    /// (needs the `trace` feature)
    #[arg(long, global = true, value_name = "DIR")]
    trace_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transliterate arguments, or stdin lines when none are given
    Convert {
        text: Vec<String>,
        /// Emit one JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// List the active key-to-glyph mapping
    Table {
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the keyboard layout chart
    Layout {
        /// Layout image to check for; falls back to the text chart
        #[arg(long)]
        image: Option<PathBuf>,
        /// Cells per line (defaults to panel.columns)
        #[arg(long)]
        columns: Option<usize>,
    },
    /// Type interactively into a live-transliterated field
    Type,
    /// Keymap configuration
    Keymap {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Settings configuration
    Settings {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the built-in default TOML
    Export,
    /// Check a TOML file
    Validate { file: String },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "nep_session=debug,nep_engine=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let _trace_guard = match &cli.trace_dir {
        Some(dir) => match nep_engine::trace_init::init_tracing(dir) {
            Ok(Some(guard)) => Some(guard),
            Ok(None) => {
                eprintln!("Warning: built without the `trace` feature; --trace-dir ignored");
                init_logging(cli.verbose);
                None
            }
            Err(e) => {
                eprintln!("Error starting trace output: {e}");
                std::process::exit(1);
            }
        },
        None => {
            init_logging(cli.verbose);
            None
        }
    };

    if let Some(path) = &cli.keymap_file {
        if let Err(e) = nep_engine::load_keymap_config(path) {
            eprintln!("Error loading keymap: {e}");
            std::process::exit(1);
        }
    }
    if let Some(path) = &cli.settings_file {
        if let Err(e) = nep_engine::load_settings_config(path) {
            eprintln!("Error loading settings: {e}");
            std::process::exit(1);
        }
    }

    match cli.command {
        Command::Convert { text, json } => convert_ops::convert(&text, json),
        Command::Table { json } => convert_ops::table(json),
        Command::Layout { image, columns } => layout_ops::layout(image.as_deref(), columns),
        Command::Type => {
            if let Err(e) = type_session::run() {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Command::Keymap { action } => match action {
            ConfigAction::Export => config_ops::keymap_export(),
            ConfigAction::Validate { file } => config_ops::keymap_validate(&file),
        },
        Command::Settings { action } => match action {
            ConfigAction::Export => config_ops::settings_export(),
            ConfigAction::Validate { file } => config_ops::settings_validate(&file),
        },
    }
}
