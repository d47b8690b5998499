use std::path::PathBuf;

use clap::Parser;
use idmigrate::{
    ExportStrategy, MigrationConfig, backup, config,
    document::DocumentRole,
    observability,
    pipeline::{self, ExportReport},
};

/// Config file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "idmigrate.toml";

/// CLI arguments for idmigrate
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Convert identity-platform JSON backups into CSV import files",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ./idmigrate.toml if it exists,
    /// otherwise built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run one export strategy
    Export {
        /// Strategy to run
        #[arg(value_enum)]
        strategy: ExportStrategy,
    },
    /// Run every export strategy whose required inputs exist
    ExportAll,
    /// Split a full backup into the per-collection input documents
    SplitBackup {
        /// Backup file (defaults to inputs.backup)
        #[arg(short, long)]
        input: Option<String>,
        /// Directory receiving the documents (defaults to inputs.directory)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Initialize a new configuration file
    Init {
        /// Path to create the config file (defaults to ./idmigrate.toml)
        #[arg(short, long)]
        output: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Export the JSON schema for the configuration file
    Schema {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    let args = Args::parse();

    match args.command {
        Command::Export { strategy } => {
            let config = load_config(args.config.as_deref());
            match pipeline::run_export(&config, strategy) {
                Ok(report) => print_report(&report),
                Err(e) => fail(&format!("Export '{strategy}' failed: {e}")),
            }
        }
        Command::ExportAll => {
            let config = load_config(args.config.as_deref());
            match pipeline::run_all(&config) {
                Ok(reports) if reports.is_empty() => {
                    eprintln!(
                        "No export ran: no strategy found all of its inputs under {}",
                        config.inputs.directory.display()
                    );
                    std::process::exit(1);
                }
                Ok(reports) => reports.iter().for_each(print_report),
                Err(e) => fail(&format!("Export failed: {e}")),
            }
        }
        Command::SplitBackup { input, output } => {
            let config = load_config(args.config.as_deref());
            run_split_backup(&config, input, output);
        }
        Command::Init { output, force } => run_init(output, force),
        Command::Schema { output } => {
            #[cfg(feature = "json-schema")]
            run_schema_export(output);
            #[cfg(not(feature = "json-schema"))]
            {
                let _ = output;
                eprintln!("Error: JSON schema export requires the 'json-schema' feature");
                std::process::exit(1);
            }
        }
    }
}

/// Load the configuration and install logging.
fn load_config(path: Option<&str>) -> MigrationConfig {
    let path = path
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

    let config = match &path {
        Some(path) => match MigrationConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => fail(&format!("Failed to load config: {e}")),
        },
        None => MigrationConfig::default(),
    };

    if let Err(e) = observability::init_tracing(&config.observability) {
        fail(&e.to_string());
    }
    match &path {
        Some(path) => tracing::debug!(path = %path.display(), "Loaded configuration"),
        None => tracing::debug!("Using built-in configuration"),
    }

    config
}

fn print_report(report: &ExportReport) {
    println!(
        "{}: {} rows in {} file(s)",
        report.strategy,
        report.rows,
        report.files.len()
    );
    for file in &report.files {
        println!("  {}", file.display());
    }
}

fn run_split_backup(config: &MigrationConfig, input: Option<String>, output: Option<String>) {
    let input = input
        .map(PathBuf::from)
        .unwrap_or_else(|| config.inputs.path(DocumentRole::Backup));
    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| config.inputs.directory.clone());

    match backup::split_backup_file(&input, &output) {
        Ok(written) => {
            for path in &written {
                println!("Created {}", path.display());
            }
            println!("Extraction complete.");
        }
        Err(e) => fail(&format!("Failed to split backup: {e}")),
    }
}

fn run_init(output: Option<String>, force: bool) {
    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if output_path.exists() && !force {
        fail(&format!(
            "Config file already exists: {}\nUse --force to overwrite.",
            output_path.display()
        ));
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty())
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        fail(&format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ));
    }

    if let Err(e) = std::fs::write(&output_path, config::default_config_toml()) {
        fail(&format!("Failed to write config file: {e}"));
    }

    println!("Created config file: {}", output_path.display());
    println!();
    println!("To run every export, run:");
    println!("  idmigrate export-all --config {}", output_path.display());
}

/// Export the configuration JSON schema to file or stdout.
#[cfg(feature = "json-schema")]
fn run_schema_export(output: Option<String>) {
    let content = match MigrationConfig::json_schema_string() {
        Ok(content) => content,
        Err(e) => fail(&format!("Failed to serialize config schema: {e}")),
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &content) {
                fail(&format!("Failed to write to {path}: {e}"));
            }
            eprintln!("Config JSON schema written to {}", path);
        }
        None => {
            println!("{}", content);
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
