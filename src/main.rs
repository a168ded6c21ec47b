use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swfvec::cli::commands;
use swfvec::cli::commands::extract::ExtractOptions;

/// Parse an output format from string
fn parse_format(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        f @ ("text" | "json") => Ok(f.to_string()),
        _ => Err(format!("Invalid format '{}'. Valid values: text, json", s)),
    }
}

#[derive(Parser)]
#[command(name = "swfvec")]
#[command(
    version,
    about = "Sparse feature vectors from decompiled SWF samples"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Config file (default: ./swfvec.toml)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the feature file for every sample in the paths file
    Extract {
        #[arg(long, help = "Paths file listing the samples")]
        paths: Option<PathBuf>,
        #[arg(long, help = "API catalog, one name per line")]
        catalog: Option<PathBuf>,
        #[arg(long, short, help = "Feature file to write")]
        output: Option<PathBuf>,
        #[arg(long, help = "Decompiler export directory")]
        outputs_dir: Option<PathBuf>,
        #[arg(long, short = 'j', help = "Worker threads (0 = one per core)")]
        workers: Option<usize>,
        #[arg(long, help = "Truncate the feature file instead of appending")]
        overwrite: bool,
    },

    /// Append every file in a folder to the paths file
    Index {
        #[arg(help = "Folder of original samples")]
        folder: PathBuf,
        #[arg(help = "Label: 0 (malicious) or 1 (benign)")]
        label: String,
        #[arg(long, help = "Paths file to append to")]
        paths: Option<PathBuf>,
    },

    /// Count tag categories in one dump file
    ScanDump {
        #[arg(help = "Tag dump file")]
        file: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format,
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Count catalog API references in one script folder
    ScanScripts {
        #[arg(help = "Script folder")]
        dir: PathBuf,
        #[arg(long, help = "API catalog, one name per line")]
        catalog: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format,
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Decode and summarize a feature file
    Inspect {
        #[arg(help = "Feature file")]
        file: PathBuf,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format,
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(short = 's', long, help = "List every record")]
        samples: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a default swfvec.toml into the current directory
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mswfvec encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let load_config = || swfvec::ConfigLoader::load(cli.config.as_deref());

    match cli.command {
        Commands::Extract {
            paths,
            catalog,
            output,
            outputs_dir,
            workers,
            overwrite,
        } => {
            let config = ExtractOptions {
                paths,
                catalog,
                output,
                outputs_dir,
                workers,
                overwrite,
            }
            .apply(load_config()?)?;
            commands::extract::run(&config)?;
        }
        Commands::Index {
            folder,
            label,
            paths,
        } => {
            let paths = match paths {
                Some(paths) => paths,
                None => load_config()?.extraction.paths_file,
            };
            commands::index::run(&folder, &label, &paths)?;
        }
        Commands::ScanDump { file, format } => {
            commands::scan::dump(&file, &format)?;
        }
        Commands::ScanScripts {
            dir,
            catalog,
            format,
        } => {
            let mut config = load_config()?;
            if let Some(catalog) = catalog {
                config.catalog.path = catalog;
            }
            commands::scan::scripts(&dir, &config, &format)?;
        }
        Commands::Inspect {
            file,
            format,
            samples,
        } => {
            commands::inspect::run(&file, &format, samples)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                commands::config::show(&load_config()?, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
