//! Update command: refresh every mod in every version directory

use anyhow::Result;
use packsmith_extensions::planner::plan_update;
use serde_json::json;

use super::common::{print_json, print_report, print_tally, require_versions, CommandContext};
use crate::cli::UpdateArgs;
use crate::output;

pub async fn run(args: UpdateArgs, ctx: &CommandContext) -> Result<()> {
    let versions_dir = ctx.versions_dir(args.versions_dir);
    let dirs = require_versions(&versions_dir)?;

    if !ctx.json {
        output::header("Updating mods");
        output::kv("versions", &dirs.len().to_string());
    }

    let items = plan_update(&dirs);
    let executor = ctx.executor(args.concurrency);
    let progress = ctx.progress(items.len(), "Updating");
    let summary = executor.run(items, &progress).await;
    progress.finish();

    if ctx.json {
        return print_json(&json!({
            "succeeded": summary.succeeded(),
            "failed": summary.report,
        }));
    }

    output::header("Summary");
    print_tally("update", &summary);
    print_report("Failed to update the following versions:", &summary.report);
    if summary.report.is_empty() {
        output::success("All versions updated");
    }
    Ok(())
}
