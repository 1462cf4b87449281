//! IoT Home provisioning tool: entry point.
//!
//! Enables the I2C bus on a Raspberry Pi sensor node so the BME280 can be
//! read.  Safe to run on every boot or from configuration management: a file
//! is only rewritten when its content would change.
//!
//! # Usage
//!
//! ```text
//! home-provision [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>  Provisioning config [default: /etc/iot-home/provision.toml]
//!       --root <DIR>     Edit the files of a mounted image instead of /
//!       --dry-run        Report what would change without writing
//!       --print-config   Print the effective configuration as TOML and exit
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()           -- TOML file or the built-in I2C plan
//!  └─ LocalTargetStore        -- real files, passwd/group lookup under --root
//!  └─ ConfigFileEditor        -- one idempotent edit per target
//!  └─ run_plan()              -- targets in order, stop at first failure
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use home_provision::application::{run_plan, ConfigFileEditor, TargetStore};
use home_provision::infrastructure::filesystem::LocalTargetStore;
use home_provision::infrastructure::storage::config::{load_config, DEFAULT_CONFIG_PATH};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// IoT Home provisioning: enable I2C for the room sensor.
#[derive(Debug, Parser)]
#[command(
    name = "home-provision",
    about = "Idempotently enable the I2C interface on a Raspberry Pi",
    version
)]
struct Cli {
    /// Path to the provisioning configuration file.
    ///
    /// A missing file is not an error: the built-in I2C plan is used.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "IOT_HOME_PROVISION_CONFIG")]
    config: PathBuf,

    /// Root directory that target paths and passwd/group lookups are relative to.
    ///
    /// Use this to provision an SD card mounted on another machine.
    #[arg(long, env = "IOT_HOME_ROOT")]
    root: Option<PathBuf>,

    /// Compute and log the outcome for each file without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // `RUST_LOG` wins; otherwise use the level from the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.provision.log_level)),
        )
        .init();

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let root = cli.root.or(config.provision.root.clone());
    let root_dir = root.as_deref().unwrap_or(Path::new("/"));
    let dry_run = cli.dry_run || config.provision.dry_run;
    let plan = config.plan(root.as_deref())?;

    info!(
        "IoT Home provisioning starting: {} target(s), root={}, dry_run={dry_run}",
        plan.len(),
        root_dir.display()
    );

    let store =
        LocalTargetStore::for_root(root_dir).context("loading user and group tables")?;
    let editor =
        ConfigFileEditor::new(Arc::new(store) as Arc<dyn TargetStore>).with_dry_run(dry_run);

    let report = run_plan(&editor, &plan).context("provisioning failed")?;

    if report.is_converged() {
        info!("all targets already provisioned");
    } else if dry_run {
        warn!(
            "dry run: {} file(s) would change; re-run without --dry-run to apply",
            report.changed_count()
        );
    } else {
        info!(
            "{} file(s) changed; reboot for the I2C interface to come up",
            report.changed_count()
        );
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
