//! Export command: produce a pack archive for every version directory

use anyhow::Result;
use packsmith_extensions::export::clean_exports;
use packsmith_extensions::planner::plan_export;
use serde_json::json;

use super::common::{print_json, print_report, print_tally, require_versions, CommandContext};
use crate::cli::ExportArgs;
use crate::output;

pub async fn run(args: ExportArgs, ctx: &CommandContext) -> Result<()> {
    let versions_dir = ctx.versions_dir(args.versions_dir);
    let format = args.format.unwrap_or(ctx.config.layout.export_format);
    let dirs = require_versions(&versions_dir)?;

    if !ctx.json {
        output::header(&format!("Exporting {} packs", format));
        output::kv("versions", &dirs.len().to_string());
    }

    if !args.no_clean {
        let removed = clean_exports(&dirs, format);
        tracing::info!("Removed {} previous export(s)", removed);
    }

    let items = plan_export(&dirs, format);
    let executor = ctx.executor(args.concurrency);
    let progress = ctx.progress(items.len(), "Exporting");
    let summary = executor.run(items, &progress).await;
    progress.finish();

    if ctx.json {
        return print_json(&json!({
            "format": format.as_str(),
            "succeeded": summary.succeeded(),
            "failed": summary.report,
        }));
    }

    output::header("Summary");
    print_tally("export", &summary);
    print_report("Failed to export the following versions:", &summary.report);
    if summary.report.is_empty() {
        output::success(&format!("Exported {} pack(s)", summary.succeeded()));
    }
    Ok(())
}
