//! Build command: merge descriptors into a fresh version tree and install into it

use anyhow::{Context, Result};
use packsmith_core::types::Platform;
use packsmith_extensions::discovery::discover_versions;
use packsmith_extensions::executor::{ExecutionSummary, TaskExecutor};
use packsmith_extensions::export::clean_exports;
use packsmith_extensions::merge::{merge_mods, merge_names, ModKey};
use packsmith_extensions::overlay::{overlay_extensions, prepare_build_dir};
use packsmith_extensions::pack_manifest::apply_suffix_to_tree;
use packsmith_extensions::planner::{plan_export, plan_install};
use packsmith_extensions::load_descriptors;
use serde_json::json;
use std::path::{Path, PathBuf};

use super::common::{print_json, print_report, print_tally, require_versions, CommandContext};
use crate::cli::BuildArgs;
use crate::output;

pub async fn run(args: BuildArgs, ctx: &CommandContext) -> Result<()> {
    let descriptors = load_descriptors(args.descriptors.as_slice());
    if descriptors.is_empty() {
        anyhow::bail!("None of the given descriptors could be loaded");
    }

    let name = merge_names(&descriptors);
    if !ctx.json {
        output::header(&format!("Building '{}'", name));
        for descriptor in &descriptors {
            output::kv(
                "extension",
                &format!(
                    "{} ({})",
                    descriptor.display_name(),
                    descriptor.display_version()
                ),
            );
        }
    }

    let versions_dir = ctx.versions_dir(args.versions_dir);
    let output_dir = args
        .output
        .unwrap_or_else(|| PathBuf::from(&ctx.config.layout.output_dir));
    let target = prepare_build_dir(&versions_dir, &output_dir, &name)
        .context("Failed to prepare build directory")?;

    let overlaid = overlay_extensions(&descriptors, &target);
    tracing::debug!("Overlaid {} file(s) in total", overlaid);

    let merged = merge_mods(&descriptors);
    let dirs = require_versions(&target)?;
    let plan = plan_install(&merged, &dirs);
    if !ctx.json {
        output::kv(
            "plan",
            &format!(
                "{} mod target(s), {} install item(s) across {} version(s)",
                merged.len(),
                plan.items.len(),
                dirs.len()
            ),
        );
        print_dropped(&plan.dropped);
    }

    let executor = ctx.executor(args.concurrency);
    let progress = ctx.progress(plan.items.len(), "Installing mods");
    let install = executor.run(plan.items, &progress).await;
    progress.finish();

    match apply_suffix_to_tree(&target, &name) {
        Ok(suffixed) => {
            tracing::debug!("Suffixed {} pack manifest(s) with '{}'", suffixed, name)
        }
        Err(e) => output::warning(&format!("Failed to suffix pack versions: {:#}", e)),
    }

    // An export phase that cannot start still leaves the install results to report.
    let mut export_error = None;
    let export = if args.no_export {
        None
    } else {
        let format = args.format.unwrap_or(ctx.config.layout.export_format);
        match export_all(ctx, &executor, &target, format).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                export_error = Some(format!("{:#}", e));
                None
            }
        }
    };

    if ctx.json {
        return print_json(&json!({
            "name": name,
            "output": target.display().to_string(),
            "dropped": plan.dropped,
            "install": {
                "succeeded": install.succeeded(),
                "failed": install.report,
            },
            "export": export.as_ref().map(|summary| json!({
                "succeeded": summary.succeeded(),
                "failed": summary.report,
            })),
            "export_error": export_error,
        }));
    }

    output::header("Summary");
    print_tally("install", &install);
    if let Some(summary) = &export {
        print_tally("export", summary);
    }
    print_report("Failed to install the following mods:", &install.report);
    if let Some(summary) = &export {
        print_report("Failed to export the following versions:", &summary.report);
    }
    if let Some(err) = &export_error {
        output::error(&format!("Export skipped: {}", err));
    }

    let clean = install.report.is_empty()
        && export_error.is_none()
        && export.as_ref().map_or(true, |summary| summary.report.is_empty());
    if clean {
        output::success(&format!("Build '{}' completed", name));
    } else {
        output::warning(&format!("Build '{}' completed with failures", name));
    }
    output::kv("output", &target.display().to_string());
    Ok(())
}

async fn export_all(
    ctx: &CommandContext,
    executor: &TaskExecutor,
    target: &Path,
    format: Platform,
) -> Result<ExecutionSummary> {
    let dirs = discover_versions(target).context("Failed to scan the build directory")?;
    let removed = clean_exports(&dirs, format);
    if removed > 0 {
        tracing::debug!("Removed {} stale export(s)", removed);
    }

    let items = plan_export(&dirs, format);
    let progress = ctx.progress(items.len(), "Exporting packs");
    let summary = executor.run(items, &progress).await;
    progress.finish();
    Ok(summary)
}

fn print_dropped(dropped: &[ModKey]) {
    if dropped.is_empty() {
        return;
    }
    output::info(&format!(
        "{} mod target(s) skipped, no matching version directory:",
        dropped.len()
    ));
    for key in dropped {
        output::item(&format!("{} [{}]", key.name, key.group()));
    }
}
