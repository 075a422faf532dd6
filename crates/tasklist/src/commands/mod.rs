//! Interactive shell: each input line is tokenised and dispatched to the
//! task service.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tasklist_app::filter_util::{parse_priority_token, parse_sort_token, parse_status_token};
use tasklist_app::{Confirmation, DueDatePatch, PreferenceStore, TaskPatch, TaskService};
use tasklist_core::{TaskFields, TaskId};
use time::{Date, OffsetDateTime};
use tokio::runtime::Runtime;

use crate::view;

/// One parsed shell line.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Create a task.
    Add {
        /// Title words.
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// low, medium or high; anything else is stored as medium.
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<String>,
    },

    /// Change fields of a task; omitted fields keep their value.
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
    },

    /// Flip completion of a task.
    Toggle { id: String },

    /// Delete a task.
    Rm {
        id: String,
        #[command(flatten)]
        confirm: Confirm,
    },

    /// Move a task to the front of the manual order.
    Top { id: String },

    /// Add tasks to the selection.
    Select {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Check or uncheck a single task.
    ToggleSelect { id: String },

    /// Remove tasks from the selection.
    Deselect {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Select every visible task.
    SelectAll,

    /// Empty the selection.
    ClearSelection,

    /// Complete every selected task.
    CompleteSelected,

    /// Reopen every selected task.
    ReopenSelected,

    /// Delete every selected task.
    DeleteSelected {
        #[command(flatten)]
        confirm: Confirm,
    },

    /// Show all, active or completed tasks.
    Status { value: String },

    /// Show tasks of one priority, or all.
    Priority { value: String },

    /// Filter by text in title or description.
    Search {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// Drop the text filter.
    ClearSearch,

    /// Change the sort key.
    Sort { key: String },

    /// List visible tasks.
    Ls {
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },

    /// Show collection statistics.
    Stats,

    /// Write every task to a dated JSON file.
    Export {
        /// Target directory (defaults to the configured export dir).
        dir: Option<PathBuf>,
    },

    /// Replace every task with the content of an export file.
    Import {
        path: PathBuf,
        #[command(flatten)]
        confirm: Confirm,
    },

    /// Show or toggle the colour theme.
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },

    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug, Clone, Copy)]
struct Confirm {
    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes")]
    yes: bool,
}

/// Output format for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Pipe table with a summary line.
    Table,
    /// Pretty-printed JSON array.
    Json,
}

/// Theme sub-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    /// Print the stored theme.
    Show,
    /// Switch between light and dark and print the result.
    Toggle,
}

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented session over a task service.
///
/// Confirmations are read from the same input as commands.
pub struct Shell<R, W> {
    service: TaskService,
    prefs: Option<PreferenceStore>,
    export_dir: PathBuf,
    runtime: Runtime,
    input: R,
    out: W,
    today: fn() -> Date,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Build a shell reading commands from `input` and writing to `out`.
    #[must_use]
    pub fn new(service: TaskService, runtime: Runtime, input: R, out: W) -> Self {
        Self {
            service,
            prefs: None,
            export_dir: PathBuf::from("."),
            runtime,
            input,
            out,
            today: || OffsetDateTime::now_utc().date(),
        }
    }

    /// Use `prefs` for the `theme` command; `None` disables it.
    #[must_use]
    pub fn with_preferences(mut self, prefs: Option<PreferenceStore>) -> Self {
        self.prefs = prefs;
        self
    }

    /// Default directory for `export` when no directory is given.
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    #[cfg(test)]
    fn with_today(mut self, today: fn() -> Date) -> Self {
        self.today = today;
        self
    }

    #[cfg(test)]
    fn into_service(self) -> TaskService {
        self.service
    }

    /// Read and run lines until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.out)?;
                return Ok(());
            };
            match self.dispatch_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(err) => writeln!(self.out, "error: {err}")?,
            }
        }
    }

    fn dispatch_line(&mut self, line: &str) -> Result<Flow> {
        let tokens = shell_words::split(line).map_err(|err| anyhow!("cannot parse line: {err}"))?;
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }
        match ShellLine::try_parse_from(tokens) {
            Ok(ShellLine { command }) => self.execute(command),
            Err(err) => {
                write!(self.out, "{}", err.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Add {
                title,
                description,
                priority,
                due,
            } => {
                let mut fields = TaskFields::new(title.join(" "));
                fields.description = description;
                fields.priority = priority;
                fields.due_date = due;
                let id = self.service.add(fields)?;
                writeln!(self.out, "added task #{id}")?;
            }
            ShellCommand::Edit {
                id,
                title,
                description,
                priority,
                due,
                clear_due,
            } => {
                let id = parse_task_id(&id)?;
                let patch = TaskPatch {
                    title,
                    description,
                    priority,
                    due_date: if clear_due {
                        Some(DueDatePatch::Clear)
                    } else {
                        due.map(DueDatePatch::Set)
                    },
                };
                if patch.is_empty() {
                    writeln!(self.out, "nothing to change")?;
                } else {
                    self.service.edit(id, patch)?;
                    writeln!(self.out, "updated task #{id}")?;
                }
            }
            ShellCommand::Toggle { id } => {
                let id = parse_task_id(&id)?;
                let completed = self.service.toggle(id)?;
                let state = if completed { "completed" } else { "reopened" };
                writeln!(self.out, "task #{id} {state}")?;
            }
            ShellCommand::Rm { id, confirm } => {
                let id = parse_task_id(&id)?;
                let prompt = self.service.confirm_delete(id)?;
                if self.confirmed(confirm, &prompt)? {
                    self.service.delete(id)?;
                    writeln!(self.out, "deleted task #{id}")?;
                }
            }
            ShellCommand::Top { id } => {
                let id = parse_task_id(&id)?;
                if self.service.reorder_to_front(id) {
                    writeln!(self.out, "moved task #{id} to the front")?;
                } else {
                    writeln!(self.out, "task not found: #{id}")?;
                }
            }
            ShellCommand::Select { ids } => {
                let ids = parse_task_ids(&ids)?;
                self.service.select(&ids)?;
                self.write_selection()?;
            }
            ShellCommand::ToggleSelect { id } => {
                let id = parse_task_id(&id)?;
                let checked = self.service.store().selection().contains(id);
                self.service.set_selected(id, !checked)?;
                self.write_selection()?;
            }
            ShellCommand::Deselect { ids } => {
                let ids = parse_task_ids(&ids)?;
                self.service.deselect(&ids);
                self.write_selection()?;
            }
            ShellCommand::SelectAll => {
                self.service.select_all_visible();
                self.write_selection()?;
            }
            ShellCommand::ClearSelection => {
                self.service.clear_selection();
                self.write_selection()?;
            }
            ShellCommand::CompleteSelected => {
                let matched = self.service.complete_selected();
                writeln!(self.out, "completed {matched} task(s)")?;
            }
            ShellCommand::ReopenSelected => {
                let matched = self.service.reopen_selected();
                writeln!(self.out, "reopened {matched} task(s)")?;
            }
            ShellCommand::DeleteSelected { confirm } => {
                match self.service.confirm_delete_selected() {
                    None => writeln!(self.out, "no tasks selected")?,
                    Some(prompt) => {
                        if self.confirmed(confirm, &prompt)? {
                            let removed = self.service.delete_selected();
                            writeln!(self.out, "deleted {removed} task(s)")?;
                        }
                    }
                }
            }
            ShellCommand::Status { value } => {
                let status = parse_status_token(&value).map_err(|err| anyhow!(err.describe_user_facing()))?;
                self.service.set_status(status);
                self.render_list(ListFormat::Table)?;
            }
            ShellCommand::Priority { value } => {
                let priority =
                    parse_priority_token(&value).map_err(|err| anyhow!(err.describe_user_facing()))?;
                self.service.set_priority(priority);
                self.render_list(ListFormat::Table)?;
            }
            ShellCommand::Search { words } => {
                self.service.set_search(words.join(" "));
                self.render_list(ListFormat::Table)?;
            }
            ShellCommand::ClearSearch => {
                self.service.clear_search();
                self.render_list(ListFormat::Table)?;
            }
            ShellCommand::Sort { key } => {
                let sort = parse_sort_token(&key).map_err(|err| anyhow!(err.describe_user_facing()))?;
                self.service.set_sort(sort);
                self.render_list(ListFormat::Table)?;
            }
            ShellCommand::Ls { format } => self.render_list(format)?,
            ShellCommand::Stats => view::render_stats(&mut self.out, self.service.store().statistics())?,
            ShellCommand::Export { dir } => {
                let dir = dir.unwrap_or_else(|| self.export_dir.clone());
                let path = self.runtime.block_on(self.service.export_to(&dir))?;
                writeln!(self.out, "exported {} task(s) to {}", self.service.store().len(), path.display())?;
            }
            ShellCommand::Import { path, confirm } => {
                let pending = self.runtime.block_on(TaskService::load_import(&path))?;
                let prompt = TaskService::confirm_import(&pending);
                if self.confirmed(confirm, &prompt)? {
                    let ids = self.service.apply_import(pending)?;
                    writeln!(self.out, "imported {} task(s)", ids.len())?;
                }
            }
            ShellCommand::Theme { action } => {
                let prefs = self
                    .prefs
                    .as_ref()
                    .ok_or_else(|| anyhow!("no preferences location available"))?;
                let theme = match action {
                    ThemeAction::Show => prefs.load_theme(),
                    ThemeAction::Toggle => prefs.toggle_theme()?,
                };
                writeln!(self.out, "theme: {theme}")?;
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn render_list(&mut self, format: ListFormat) -> Result<()> {
        let store = self.service.store();
        match format {
            ListFormat::Table => view::render_task_table(&mut self.out, store, (self.today)())?,
            ListFormat::Json => view::render_task_json(&mut self.out, store)?,
        }
        Ok(())
    }

    fn write_selection(&mut self) -> Result<()> {
        let selected = self.service.store().selection().len();
        writeln!(self.out, "{selected} task(s) selected")?;
        Ok(())
    }

    fn confirmed(&mut self, confirm: Confirm, prompt: &Confirmation) -> Result<bool> {
        if confirm.yes {
            return Ok(true);
        }
        write!(self.out, "{} [y/N]: ", prompt.message)?;
        self.out.flush()?;
        let answer = self.read_line()?.unwrap_or_default();
        let accepted = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
        if !accepted {
            writeln!(self.out, "cancelled")?;
        }
        Ok(accepted)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("failed to read input")?;
        Ok((read > 0).then_some(line))
    }
}

fn parse_task_ids(inputs: &[String]) -> Result<Vec<TaskId>> {
    inputs.iter().map(|raw| parse_task_id(raw)).collect()
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw).map_err(|err| anyhow!("invalid task id '{raw}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tasklist_app::sample::sample_tasks;
    use tasklist_core::{Priority, TaskStore};
    use tempfile::TempDir;
    use time::macros::date;

    fn ok<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    fn fixed_today() -> Date {
        date!(2025 - 08 - 14)
    }

    fn run_script(script: &str) -> (String, TaskService) {
        let store = ok(TaskStore::from_tasks(sample_tasks()), "sample store");
        run_with(TaskService::new(store), script, None)
    }

    fn run_with(service: TaskService, script: &str, prefs: Option<PreferenceStore>) -> (String, TaskService) {
        let runtime = ok(Runtime::new(), "runtime");
        let mut out = Vec::new();
        let mut shell = Shell::new(service, runtime, Cursor::new(script.to_owned()), &mut out)
            .with_preferences(prefs)
            .with_today(fixed_today);
        ok(shell.run(), "shell run");
        let service = shell.into_service();
        (ok(String::from_utf8(out), "utf8"), service)
    }

    #[test]
    fn add_quoted_title_and_list() {
        let (out, service) = run_script("add \"Buy milk\" -p high --due 2025-08-01\nls\nquit\n");
        assert!(out.contains("added task #4"));
        assert!(out.contains("| 4 | no | high | 2025-08-01 (overdue) | Buy milk"));
        assert_eq!(service.store().tasks()[0].title, "Buy milk");
    }

    #[test]
    fn errors_are_reported_and_session_continues() {
        let (out, service) = run_script("toggle 99\ntoggle abc\nadd \"   \"\ntoggle 1\n");
        assert!(out.contains("error: task not found: #99"));
        assert!(out.contains("error: invalid task id 'abc'"));
        assert!(out.contains("error: validation error: empty title"));
        assert!(out.contains("task #1 completed"));
        assert_eq!(service.store().len(), 3);
    }

    #[test]
    fn unknown_priority_is_stored_as_medium() {
        let (out, service) = run_script("add -p urgent X\nedit 1 -p HIGH\nedit 1 -p someday\n");
        assert!(out.contains("added task #4"));
        assert!(!out.contains("error:"));
        let added = ok(service.store().get(TaskId(4)).ok_or("task #4 missing"), "lookup");
        assert_eq!(added.priority, Priority::Medium);
        let edited = ok(service.store().get(TaskId(1)).ok_or("task #1 missing"), "lookup");
        assert_eq!(edited.priority, Priority::Medium);
    }

    #[test]
    fn select_with_unknown_id_selects_nothing() {
        let (out, service) = run_script("select 1 99\nselect 2 3\n");
        assert!(out.contains("error: task not found: #99"));
        assert!(out.contains("2 task(s) selected"));
        assert_eq!(service.store().selected_ids(), vec![TaskId(2), TaskId(3)]);
    }

    #[test]
    fn toggle_select_flips_one_task() {
        let (out, service) = run_script("toggle-select 2\ntoggle-select 3\ntoggle-select 2\ntoggle-select 99\n");
        assert!(out.contains("> 1 task(s) selected\n> 2 task(s) selected\n> 1 task(s) selected\n"));
        assert!(out.contains("error: task not found: #99"));
        assert_eq!(service.store().selected_ids(), vec![TaskId(3)]);
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let (out, service) = run_script("rm 3\nn\nrm 2\ny\n");
        assert!(out.contains("Are you sure you want to delete \"Submit assignment\"? [y/N]: cancelled"));
        assert!(out.contains("deleted task #2"));
        assert!(service.store().contains(TaskId(3)));
        assert!(!service.store().contains(TaskId(2)));
    }

    #[test]
    fn bulk_delete_of_selection() {
        let (out, service) = run_script("select 1 3\ndelete-selected\ny\ndelete-selected -y\n");
        assert!(out.contains("2 task(s) selected"));
        assert!(out.contains("Are you sure you want to delete 2 selected task(s)?"));
        assert!(out.contains("deleted 2 task(s)"));
        assert!(out.contains("no tasks selected"));
        assert_eq!(service.store().len(), 1);
    }

    #[test]
    fn filters_and_sort_change_the_listing() {
        let (out, service) = run_script("status completed\nsearch ASSIGNMENT\nsort title\nclear-search\n");
        assert!(out.contains("1 of 3 shown (status: completed, priority: all, sort: createdAt)"));
        assert!(out.contains("sort: title"));
        assert!(service.store().criteria().search.is_empty());
    }

    #[test]
    fn edit_patch_and_top_under_manual_sort() {
        let (out, service) = run_script("edit 3 --title \"Submit final assignment\" --clear-due\nsort manual\ntop 3\n");
        assert!(out.contains("updated task #3"));
        assert!(out.contains("moved task #3 to the front"));
        let first = &service.store().tasks()[0];
        assert_eq!(first.title, "Submit final assignment");
        assert_eq!(first.due_date, None);
    }

    #[test]
    fn export_then_import_round_trip() {
        let temp = ok(TempDir::new(), "temp dir");
        let dir = temp.path().display().to_string();
        let script = format!("export \"{dir}\"\n");
        let (out, _) = run_script(&script);
        assert!(out.contains("exported 3 task(s)"));

        let file = ok(std::fs::read_dir(temp.path()), "read dir")
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .find(|path| path.extension().is_some_and(|ext| ext == "json"))
            .unwrap_or_else(|| panic!("export file written"));
        let script = format!("import \"{}\"\ny\n", file.display());
        let (out, service) = run_script(&script);
        assert!(out.contains("This will replace all current tasks with 3 imported tasks. Continue?"));
        assert!(out.contains("imported 3 task(s)"));
        assert_eq!(service.store().next_id(), TaskId(7));
    }

    #[test]
    fn theme_toggle_persists() {
        let temp = ok(TempDir::new(), "temp dir");
        let prefs = PreferenceStore::new(temp.path().join("preferences.toml"));
        let store = ok(TaskStore::from_tasks(sample_tasks()), "sample store");
        let (out, _) = run_with(TaskService::new(store), "theme\ntheme toggle\ntheme show\n", Some(prefs));
        assert!(out.contains("theme: light"));
        assert!(out.contains("theme: dark"));
    }

    #[test]
    fn unknown_command_prints_usage() {
        let (out, _) = run_script("frobnicate\nstats\n");
        assert!(out.contains("frobnicate"));
        assert!(out.contains("total: 3  completed: 1  pending: 2  progress: 33%"));
    }

    #[test]
    fn shell_line_parses_flags() {
        let line = ok(
            ShellLine::try_parse_from(["edit", "#2", "--priority", "low", "--due", "2025-09-01"]),
            "parse",
        );
        match line.command {
            ShellCommand::Edit { id, priority, due, clear_due, .. } => {
                assert_eq!(id, "#2");
                assert_eq!(priority.as_deref(), Some("low"));
                assert_eq!(due.as_deref(), Some("2025-09-01"));
                assert!(!clear_due);
            }
            other => panic!("expected edit, got {other:?}"),
        }
    }
}
