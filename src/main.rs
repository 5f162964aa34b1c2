//! Binary entrypoint for the Gemlevels CLI.
//!
//! Commands:
//! - `build [--deploy]` - compile the spreadsheets into the output tree, optionally handing it off
//! - `check` - load and validate only; nothing is written
//! - `watch` - rebuild whenever a source spreadsheet changes (Ctrl-C to stop)
//! - `deploy` - hand the existing output tree to the configured asset directory
//! - `init` - create a starter `gemlevels.toml`
//! - `pieces` - print the piece geometry table as JSON
//!
//! See the library crate docs for module-level details: `gemlevels::`.
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use gemlevels::compiler;
use gemlevels::config::Config;
use gemlevels::output;
use gemlevels::pieces;

#[derive(Parser)]
#[command(name = "gemlevels")]
#[command(about = "Compile puzzle-level spreadsheets into game assets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "gemlevels.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the level spreadsheets into the output tree
    Build {
        /// Hand the finished tree to `deploy.target` afterwards
        #[arg(long)]
        deploy: bool,
    },
    /// Validate the spreadsheets without writing anything
    Check,
    /// Recompile whenever a source spreadsheet changes
    Watch,
    /// Hand the existing output tree to `deploy.target`
    Deploy,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the piece geometry table as JSON
    Pieces,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        init_logging(&None, cli.verbose);
        if !force && std::path::Path::new(&cli.config).exists() {
            return Err(anyhow!(
                "{} already exists (use --force to overwrite)",
                cli.config
            ));
        }
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config).await?;
    init_logging(&Some(config.clone()), cli.verbose);

    match cli.command {
        Commands::Build { deploy } => {
            info!("Gemlevels v{} building", env!("CARGO_PKG_VERSION"));
            let report = match compiler::compile(&config) {
                Ok(report) => report,
                Err(e) => {
                    error!("build failed: {}", e);
                    std::process::exit(1);
                }
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            if deploy {
                run_deploy(&config)?;
            }
        }
        Commands::Check => match compiler::check(&config) {
            Ok(model) => println!(
                "ok: {} worlds, {} levels",
                model.worlds.len(),
                model.levels.len()
            ),
            Err(e) => {
                error!("check failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Watch => {
            let summary = gemlevels::watch::watch(config).await;
            println!(
                "{}",
                serde_json::json!({ "runs": summary.runs, "failures": summary.failures })
            );
        }
        Commands::Deploy => run_deploy(&config)?,
        Commands::Pieces => {
            println!(
                "{}",
                serde_json::to_string_pretty(&pieces::geometry_table())?
            );
        }
        Commands::Init { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn run_deploy(config: &Config) -> Result<()> {
    let target = config
        .deploy
        .target
        .as_ref()
        .ok_or_else(|| anyhow!("deploy.target is not set in the configuration"))?;
    output::handoff(&config.output.dir, target, config.deploy.mode).with_context(|| {
        format!(
            "Failed to hand {} to {}",
            config.output.dir.display(),
            target.display()
        )
    })?;
    info!("Deployed {} to {}", config.output.dir.display(), target.display());
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides config
    let base_level = match (verbosity, config) {
        (0, Some(cfg)) => cfg.logging.level_filter(),
        (0, None) => log::LevelFilter::Info,
        (1, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Mirror to the console only when someone is watching it
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
