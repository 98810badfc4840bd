//! Shared setup and reporting for commands

use crate::output;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indicatif::ProgressBar;
use packsmith_core::config::PROJECT_CONFIG_FILE;
use packsmith_core::types::RuntimeConfig;
use packsmith_core::HierarchicalConfigLoader;
use packsmith_extensions::discovery::{discover_versions, VersionDirectory};
use packsmith_extensions::executor::{ExecutionSummary, ProgressSink, TaskExecutor, TaskOutcome};
use packsmith_extensions::report::FailureReport;
use packsmith_extensions::tool::PackwizTool;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a command needs besides its own arguments
pub struct CommandContext {
    pub config: RuntimeConfig,
    pub json: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Load the runtime configuration and apply global display flags
    pub fn load(
        config_file: Option<&Utf8Path>,
        json: bool,
        quiet: bool,
        no_color: bool,
    ) -> Result<Self> {
        let loader = HierarchicalConfigLoader::new()?;
        let project_file = resolve_project_file(config_file);
        let mut config = loader
            .load_runtime_config(project_file.as_deref())
            .context("Failed to load runtime configuration")?;

        if no_color {
            config.display.color_enabled = false;
        }
        if !config.display.color_enabled {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        tracing::debug!(?config, "runtime configuration loaded");
        Ok(Self {
            config,
            json,
            quiet,
        })
    }

    /// CLI value if given, else the configured pool size
    pub fn concurrency(&self, cli: Option<usize>) -> usize {
        cli.unwrap_or(self.config.executor.concurrency)
    }

    pub fn versions_dir(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.unwrap_or_else(|| PathBuf::from(&self.config.layout.versions_dir))
    }

    /// Executor wired to the configured packwiz binary
    pub fn executor(&self, concurrency: Option<usize>) -> TaskExecutor {
        preflight_tool(&self.config.tool.program);
        let tool = Arc::new(PackwizTool::new(self.config.tool.program.clone()));
        TaskExecutor::from_config(tool, &self.config).with_concurrency(self.concurrency(concurrency))
    }

    /// Progress reporting is suppressed for `--json` and `--quiet`
    pub fn progress(&self, total: usize, msg: &str) -> BarProgress {
        BarProgress::new(total, msg, !self.json && !self.quiet)
    }
}

/// `--config` wins; otherwise `./packsmith.yaml` is used when it exists
fn resolve_project_file(explicit: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Utf8PathBuf::from(PROJECT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

/// Warn when the tool cannot be found; running continues and each item fails on its own
fn preflight_tool(program: &str) {
    if which::which(program).is_err() {
        output::warning(&format!(
            "'{}' was not found on PATH; every invocation will fail until it is installed",
            program
        ));
    }
}

/// Discover version directories, failing when there are none
pub fn require_versions(base: &Path) -> Result<Vec<VersionDirectory>> {
    let dirs = discover_versions(base)?;
    if dirs.is_empty() {
        anyhow::bail!(
            "No <loader>/<version> directories found under {}",
            base.display()
        );
    }
    Ok(dirs)
}

/// Where completion lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineTarget {
    Suppressed,
    AboveBar,
    Stdout,
}

/// Prints one line per finished item above an indicatif bar
///
/// indicatif hides the bar when stderr is not a terminal and drops anything
/// printed through it, so lines go straight to stdout in that case.
pub struct BarProgress {
    bar: ProgressBar,
    lines: bool,
}

impl BarProgress {
    pub fn new(total: usize, msg: &str, visible: bool) -> Self {
        Self {
            bar: output::progress_bar(total as u64, msg, visible),
            lines: visible,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn line_target(&self) -> LineTarget {
        match (self.lines, self.bar.is_hidden()) {
            (false, _) => LineTarget::Suppressed,
            (true, false) => LineTarget::AboveBar,
            (true, true) => LineTarget::Stdout,
        }
    }
}

impl ProgressSink for BarProgress {
    fn item_finished(&self, completed: usize, total: usize, outcome: &TaskOutcome) {
        match self.line_target() {
            LineTarget::Suppressed => {}
            LineTarget::AboveBar => self.bar.println(progress_line(completed, total, outcome)),
            LineTarget::Stdout => println!("{}", progress_line(completed, total, outcome)),
        }
        self.bar.set_position(completed as u64);
    }
}

/// `[██░░] 1/4 (25.0%) | Sodium [fabric/1.20.1] ✓ (retried 1x)`
pub fn progress_line(completed: usize, total: usize, outcome: &TaskOutcome) -> String {
    let status = if outcome.success {
        match outcome.retries() {
            0 => "✓".to_string(),
            n => format!("✓ (retried {}x)", n),
        }
    } else {
        format!("✗ (failed after {} attempt(s))", outcome.attempts_used)
    };

    format!(
        "{} | {} [{}] {}",
        output::render_bar(completed, total),
        outcome.item.label(),
        outcome.item.group,
        status
    )
}

/// Print grouped failures under `title`; nothing when the report is empty
pub fn print_report(title: &str, report: &FailureReport) {
    if report.is_empty() {
        return;
    }
    output::error(title);
    for group in report.groups() {
        println!("   [{}]", group.key);
        for entry in &group.entries {
            output::item(entry);
        }
    }
}

/// One-line tally of a finished run
pub fn print_tally(what: &str, summary: &ExecutionSummary) {
    output::kv(
        what,
        &format!("{} succeeded, {} failed", summary.succeeded(), summary.failed()),
    );
}

/// Print `value` as pretty JSON on stdout
pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
