//! Sync command: install resources from one version directory into another

use anyhow::Result;
use packsmith_extensions::discovery::VersionDirectory;
use packsmith_extensions::executor::ExecutionSummary;
use packsmith_extensions::planner::plan_sync;
use packsmith_extensions::report::FailureReport;
use packsmith_extensions::resources::ResourceKind;
use serde_json::json;

use super::common::{print_json, print_report, CommandContext};
use crate::cli::SyncArgs;
use crate::output;

pub async fn run(args: SyncArgs, ctx: &CommandContext) -> Result<()> {
    for dir in [&args.source, &args.target] {
        if !dir.is_dir() {
            anyhow::bail!("Version directory not found: {}", dir.display());
        }
    }

    let target = VersionDirectory::from_path(&args.target);
    let executor = ctx.executor(args.concurrency);

    if !ctx.json {
        output::header(&format!(
            "Syncing {} -> {}",
            args.source.display(),
            args.target.display()
        ));
    }

    let mut results = Vec::with_capacity(ResourceKind::ALL.len());
    for kind in ResourceKind::ALL {
        let plan = plan_sync(&args.source, &target, kind, args.platform)?;
        if !ctx.json {
            output::kv(
                kind.label(),
                &format!(
                    "{} to install, {} already present",
                    plan.items.len(),
                    plan.already_present.len()
                ),
            );
        }

        // Files without .pw.toml metadata fail without invoking the tool.
        let mut report = FailureReport::new();
        for file_name in &plan.unsupported {
            report.record(plan.group(), format!("{} (no .pw.toml metadata)", file_name));
        }

        let progress = ctx.progress(plan.items.len(), &format!("Syncing {}", kind.label()));
        let summary = executor.run(plan.items, &progress).await;
        progress.finish();

        for group in summary.report.groups() {
            for entry in &group.entries {
                report.record(group.key.clone(), entry.clone());
            }
        }
        results.push((kind, summary, report));
    }

    if ctx.json {
        let kinds: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|(kind, summary, report)| {
                (
                    kind.dir_name().to_string(),
                    json!({ "succeeded": summary.succeeded(), "failed": report }),
                )
            })
            .collect();
        return print_json(&serde_json::Value::Object(kinds));
    }

    print_summary(&results);
    Ok(())
}

fn print_summary(results: &[(ResourceKind, ExecutionSummary, FailureReport)]) {
    output::header("Summary");
    let mut failures = 0;
    for (kind, summary, report) in results {
        output::kv(
            kind.label(),
            &format!("{} installed, {} failed", summary.succeeded(), report.failure_count()),
        );
        print_report(&format!("Failed to sync the following {}:", kind.label()), report);
        failures += report.failure_count();
    }

    if failures == 0 {
        output::success("Sync completed");
    } else {
        output::warning(&format!("Sync completed with {} failure(s)", failures));
    }
}
