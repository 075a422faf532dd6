//! CLI entry point for tasklist.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tasklist_app::filter_util::CriteriaBuilder;
use tasklist_app::{AppConfig, PreferenceStore, TaskService};
use tasklist_core::TaskStore;
use time::OffsetDateTime;
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::{ListFormat, Shell, ThemeAction};

mod commands;
mod view;

/// In-memory task list with filtering, bulk editing and JSON export/import.
#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "tasklist: an interactive task list shell")]
struct Cli {
    /// Configuration file (defaults to <config_dir>/tasklist/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with an empty list instead of the sample tasks.
    #[arg(long)]
    no_sample: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive shell (default).
    Shell,

    /// List tasks of an export file.
    Ls {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Show statistics of an export file.
    Stats {
        #[arg(long)]
        file: PathBuf,
    },

    /// Show or toggle the stored colour theme.
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing();
    execute_command(cli)
}

fn execute_command(cli: Cli) -> Result<()> {
    let Cli {
        config,
        no_sample,
        cmd,
    } = cli;
    let mut config = match config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::load_default()?,
    };
    if no_sample {
        config.startup.sample_data = false;
    }
    tracing::debug!(
        sample_data = config.startup.sample_data,
        export_dir = %config.export.dir.display(),
        "configuration loaded"
    );

    match cmd.unwrap_or(Command::Shell) {
        Command::Shell => {
            let service = TaskService::startup(&config)?;
            let runtime = Runtime::new().context("failed to start async runtime")?;
            let stdin = io::stdin().lock();
            let stdout = io::stdout().lock();
            Shell::new(service, runtime, stdin, stdout)
                .with_preferences(PreferenceStore::default_location())
                .with_export_dir(config.export.dir)
                .run()
        }

        Command::Ls {
            file,
            status,
            priority,
            search,
            sort,
            format,
        } => {
            let criteria = CriteriaBuilder::new()
                .with_status(status.as_deref())
                .and_then(|builder| builder.with_priority(priority.as_deref()))
                .and_then(|builder| builder.with_sort(sort.as_deref()))
                .map_err(|err| anyhow::anyhow!(err.describe_user_facing()))?
                .with_search(search)
                .build();
            let store = load_file(file)?.with_criteria(criteria);
            let mut out = BufWriter::new(io::stdout().lock());
            match format {
                ListFormat::Table => {
                    view::render_task_table(&mut out, &store, OffsetDateTime::now_utc().date())?;
                }
                ListFormat::Json => view::render_task_json(&mut out, &store)?,
            }
            out.flush()?;
            Ok(())
        }

        Command::Stats { file } => {
            let store = load_file(file)?;
            view::render_stats(&mut io::stdout().lock(), store.statistics())?;
            Ok(())
        }

        Command::Theme { action } => {
            let prefs = PreferenceStore::default_location()
                .context("no configuration directory available for preferences")?;
            let theme = match action {
                ThemeAction::Show => prefs.load_theme(),
                ThemeAction::Toggle => prefs.toggle_theme()?,
            };
            println!("{theme}");
            Ok(())
        }
    }
}

/// Load an export file into a fresh store.
fn load_file(path: PathBuf) -> Result<TaskStore> {
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let pending = runtime.block_on(TaskService::load_import(&path))?;
    let mut store = TaskStore::new();
    store
        .import_replace_all(pending.records)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(store)
}

fn install_tracing() {
    // RUST_LOG overrides; default stays at WARN so the shell output is not interleaved.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
