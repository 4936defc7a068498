use crate::conf::{EcConfig, load_config, validate_config};
use anyhow::{Result, bail};
use clap::Subcommand;
use serde::Serialize;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Print the validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print resolved configuration
    Dump {
        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

pub fn run(cmd: ConfigCmd, path: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCmd::Check { json } => check(path, json),
        ConfigCmd::Dump { json, yaml } => dump(path, json, yaml),
    }
}

pub fn check(path: Option<&Path>, json: bool) -> Result<()> {
    let cfg = load_config(path)?;
    let report = validate_config(&cfg);

    if json {
        println!("{}", report.render_json()?);
    } else {
        print!("{}", report.render_plain());
    }

    if report.has_errors() {
        bail!("configuration has {} error(s)", report.errors.len());
    }

    if !json {
        print_summary(&cfg);
    }
    Ok(())
}

fn print_summary(cfg: &EcConfig) {
    println!("✔ Config loaded successfully");
    println!("✔ plugins: {}", cfg.stream.plugins.join(", "));
    println!("✔ log file: {}", cfg.log.path().display());
    println!("✔ server: {}", cfg.server.bind_addr());
}

pub fn dump(path: Option<&Path>, json: bool, yaml: bool) -> Result<()> {
    let cfg = load_config(path)?;

    if yaml {
        dump_yaml(&cfg)?;
    } else if json || !yaml {
        // default: json
        dump_json(&cfg)?;
    }

    Ok(())
}

fn dump_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

fn dump_yaml<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_yaml::to_string(value)?;
    println!("{s}");
    Ok(())
}
