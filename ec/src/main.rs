use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ec_core::cli;
use ec_core::cli::run::RunArgs;
use ec_core::cli::serve::ServeArgs;
use ec_core::conf::{EcConfig, load_config};
use ec_core::logging::{RUN_LOG_LEVEL, SERVE_LOG_LEVEL, init_logging};
use ec_core::shutdown::Shutdown;
use ec_core::{server, stream};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "ec",
    version,
    about = "ec: error console for a shell's stderr stream"
)]
struct Cli {
    /// Path to the ec config file (default: ~/.ec/ec.hcl when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter stdin through the configured plugins to stdout (default)
    Run(RunArgs),

    /// Serve the log directory over HTTP
    Serve(ServeArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::config::ConfigCmd,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ec error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Some(Command::Run(args)) => run(config, &args),

        Some(Command::Serve(args)) => {
            init_logging(SERVE_LOG_LEVEL);

            let cfg = resolve_config(config, |cfg| args.apply(cfg))?;
            let shutdown = install_shutdown()?;

            server::run(&cfg, &shutdown)
        }

        Some(Command::Config { cmd }) => cli::config::run(cmd, config),

        None => run(config, &RunArgs::default()),
    }
}

fn run(config: Option<&Path>, args: &RunArgs) -> Result<()> {
    init_logging(RUN_LOG_LEVEL);

    let cfg = resolve_config(config, |cfg| args.apply(cfg))?;
    let shutdown = install_shutdown()?;

    stream::run_stdio(&cfg, &shutdown)?;
    Ok(())
}

/// Load the config file, apply command-line overrides, then validate.
fn resolve_config(path: Option<&Path>, overrides: impl FnOnce(&mut EcConfig)) -> Result<EcConfig> {
    let mut cfg = load_config(path)?;
    overrides(&mut cfg);

    match cfg.validated() {
        Ok(cfg) => Ok(cfg),
        Err(ec_core::conf::ConfigError::Validation { report }) => {
            eprint!("{}", report.render_plain());
            anyhow::bail!("invalid configuration")
        }
        Err(e) => Err(e.into()),
    }
}

fn install_shutdown() -> Result<Shutdown> {
    let shutdown = Shutdown::new();
    shutdown
        .install_signal_handler()
        .context("failed to install signal handler")?;
    Ok(shutdown)
}
