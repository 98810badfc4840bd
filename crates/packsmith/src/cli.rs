//! CLI argument parsing with clap
//!
//! Options that also exist in the runtime configuration are `Option`s so that
//! only flags the user actually passed override it.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use packsmith_core::types::Platform;
use std::path::PathBuf;

/// packsmith - merged modpack builds on top of packwiz
#[derive(Parser, Debug)]
#[command(name = "packsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Runtime config file (default: ./packsmith.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Print the final summary as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a merged version tree from one or more extension descriptors
    Build(BuildArgs),

    /// Install resources present in one version directory into another
    Sync(SyncArgs),

    /// Update every mod in every version directory
    Update(UpdateArgs),

    /// Export every version directory as a pack
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Extension descriptor files, applied in order (later ones win)
    #[arg(required = true, num_args = 1..)]
    pub descriptors: Vec<PathBuf>,

    /// Output directory [default: build]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of concurrent packwiz invocations [default: 4]
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Versions template directory [default: versions]
    #[arg(long)]
    pub versions_dir: Option<PathBuf>,

    /// Skip exporting packs after the build
    #[arg(long)]
    pub no_export: bool,

    /// Export format (modrinth, curseforge) [default: modrinth]
    #[arg(long)]
    pub format: Option<Platform>,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Version directory to read resources from
    pub source: PathBuf,

    /// Version directory to install missing resources into
    pub target: PathBuf,

    /// Number of concurrent packwiz invocations [default: 4]
    pub concurrency: Option<usize>,

    /// Platform to install from
    #[arg(long, default_value = "modrinth")]
    pub platform: Platform,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Versions directory [default: versions]
    #[arg(long)]
    pub versions_dir: Option<PathBuf>,

    /// Number of concurrent packwiz invocations [default: 4]
    #[arg(short, long)]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Versions directory [default: versions]
    #[arg(long)]
    pub versions_dir: Option<PathBuf>,

    /// Export format (modrinth, curseforge) [default: modrinth]
    #[arg(long)]
    pub format: Option<Platform>,

    /// Keep previously exported packs instead of deleting them first
    #[arg(long)]
    pub no_clean: bool,

    /// Number of concurrent packwiz invocations [default: 4]
    #[arg(short, long)]
    pub concurrency: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_args() {
        let cli = Cli::parse_from([
            "packsmith",
            "build",
            "opti/extensions.toml",
            "qol/extensions.toml",
            "-o",
            "out",
            "-c",
            "8",
            "--format",
            "cf",
            "--no-export",
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.descriptors.len(), 2);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.concurrency, Some(8));
        assert_eq!(args.format, Some(Platform::CurseForge));
        assert!(args.no_export);
        assert!(args.versions_dir.is_none());
    }

    #[test]
    fn test_build_requires_descriptor() {
        assert!(Cli::try_parse_from(["packsmith", "build"]).is_err());
    }

    #[test]
    fn test_sync_positional_concurrency() {
        let cli = Cli::parse_from(["packsmith", "sync", "a", "b", "6"]);
        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.concurrency, Some(6));
        assert_eq!(args.platform, Platform::Modrinth);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["packsmith", "export", "-vv", "--json", "--config", "p.yaml"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert_eq!(cli.config, Some(Utf8PathBuf::from("p.yaml")));
    }
}
