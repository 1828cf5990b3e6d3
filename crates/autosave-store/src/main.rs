//! settings-autosave demo harness.
//!
//! Builds a [`Settings`] object, attaches a [`PersistenceTrigger`] that writes
//! `settings.json` after every change, applies a few changes, and waits for the
//! background writes to finish.
//!
//! # Usage
//!
//! ```text
//! autosave-demo [OPTIONS]
//!
//! Options:
//!   --config <FILE>        TOML config file [default: autosave.toml]
//!   --path <FILE>          Snapshot file (overrides the config file)
//!   --ordering <MODE>      racy | queued (overrides the config file)
//!   --no-restore           Start from defaults instead of the existing snapshot
//!   --dry-run              Keep snapshots in memory instead of writing the file
//!   --set <NAME=VALUE>     Assignment to apply; repeatable.  Without any --set
//!                          the built-in demo runs: FieldOne=false, FieldTwo=true
//!   --pause-ms <MS>        Pause after each assignment [default: 100]
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()                  -- TOML file, CLI overrides on top
//!  └─ initial_values()              -- restore the last snapshot (optional)
//!  └─ Settings::with_values()
//!       ├─ change logger             (subscriber #0: which field changed)
//!       └─ PersistenceTrigger        (subscriber #1: background snapshot writes)
//!  └─ apply assignments, await one SaveReport per real change
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use autosave_core::Settings;
use autosave_store::application::apply_changes::{apply, demo_script, Assignment};
use autosave_store::application::persist_on_change::{PersistenceTrigger, WriteOrdering};
use autosave_store::application::restore::initial_values;
use autosave_store::infrastructure::storage::{
    config::{load_config, DEFAULT_CONFIG_FILE},
    json_file::JsonFileStore,
    memory::MemoryStore,
    SnapshotStore,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Settings autosave demo.
///
/// Every settings change is written to disk immediately, in the background.
#[derive(Debug, Parser)]
#[command(
    name = "autosave-demo",
    about = "Persist a settings object to JSON on every change",
    version
)]
struct Cli {
    /// TOML configuration file.  A missing file means "all defaults".
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, env = "AUTOSAVE_CONFIG")]
    config: PathBuf,

    /// Snapshot file path.
    #[arg(long, env = "AUTOSAVE_PATH")]
    path: Option<PathBuf>,

    /// Write ordering: `racy` (last write to complete wins) or `queued`.
    #[arg(long, env = "AUTOSAVE_ORDERING")]
    ordering: Option<WriteOrdering>,

    /// Do not seed the settings from an existing snapshot.
    #[arg(long)]
    no_restore: bool,

    /// Record snapshots in memory instead of writing the snapshot file.
    #[arg(long)]
    dry_run: bool,

    /// Assignment to apply, e.g. `--set FieldOne=true`.  Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<Assignment>,

    /// Pause after each assignment, in milliseconds.
    #[arg(long, default_value_t = 100)]
    pause_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(path) = cli.path {
        config.storage.path = path;
    }
    if let Some(ordering) = cli.ordering {
        config.storage.write_ordering = ordering;
    }
    if cli.no_restore {
        config.storage.restore_on_start = false;
    }

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("settings-autosave demo starting");

    let file_store = JsonFileStore::new(&config.storage.path);
    let initial = initial_values(&file_store, config.storage.restore_on_start).await;

    let mut settings = Settings::with_values(initial);
    settings.subscribe(|_, change| {
        info!(field = %change.field, sequence = change.sequence, "settings changed");
    });

    let store: Arc<dyn SnapshotStore> = if cli.dry_run {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(file_store)
    };
    let store_location = store.location();
    let (trigger, mut reports) =
        PersistenceTrigger::new(store, config.storage.write_ordering).with_reports();
    info!(
        ordering = %trigger.ordering(),
        location = %store_location,
        "persisting settings on every change"
    );
    trigger
        .attach(&mut settings)
        .context("attaching persistence trigger")?;

    let script = if cli.assignments.is_empty() {
        demo_script()
    } else {
        cli.assignments
    };

    let mut pending = 0usize;
    for assignment in script {
        if apply(&mut settings, assignment) {
            pending += 1;
        } else {
            info!("{assignment}: value unchanged, nothing to save");
        }
        tokio::time::sleep(Duration::from_millis(cli.pause_ms)).await;
    }

    // Writes are fire-and-forget for the setters; the harness still waits for
    // them so the process does not exit with a save in flight.
    let mut failed = 0usize;
    while pending > 0 {
        let Some(report) = reports.recv().await else {
            break;
        };
        if !report.is_success() {
            failed += 1;
        }
        pending -= 1;
    }

    info!(failed, "final settings:\n{settings}");
    Ok(())
}
