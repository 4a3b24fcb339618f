use anyhow::Context;
use colored::Colorize;
use tracing::info;

use sld_diff::compare_snapshots;
use sld_snapshot::{assemble_snapshot, FsSnapshotStore, SnapshotStore};
use sld_types::{BuildSnapshot, CompareInfo, ImpactMap};

use crate::cli::*;
use crate::config::{CompareConfig, CompareMode};
use crate::policy::{evaluate, Verdict, EQUAL_MESSAGE};
use crate::report::{render_compare, render_impact, to_json, CompareReport, ATTENTION_BANNER};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let config = CompareConfig::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Command::Save(args) => cmd_save(with_save_args(config, args), cli.format),
        Command::Compare(args) => cmd_compare(with_compare_args(config, args), cli.format),
        Command::Impact(args) => cmd_impact(config, args, cli.format),
    }
}

fn with_save_args(mut config: CompareConfig, args: SaveArgs) -> CompareConfig {
    if let Some(file) = args.file {
        config.snapshot_file_name = file;
    }
    if let Some(dir) = args.build_info {
        config.build_info_path = dir;
    }
    if let Some(dir) = args.snapshot_dir {
        config.snapshot_path = dir;
    }
    config
}

fn with_compare_args(mut config: CompareConfig, args: CompareArgs) -> CompareConfig {
    if let Some(file) = args.file {
        config.snapshot_file_name = file;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if args.no_print_diff {
        config.print_diff = false;
    }
    if let Some(dir) = args.build_info {
        config.build_info_path = dir;
    }
    if let Some(dir) = args.snapshot_dir {
        config.snapshot_path = dir;
    }
    config
}

fn current_snapshot(config: &CompareConfig) -> anyhow::Result<BuildSnapshot> {
    assemble_snapshot(&config.build_info_path).with_context(|| {
        format!(
            "failed to snapshot build artifacts in {}",
            config.build_info_path.display()
        )
    })
}

fn cmd_save(config: CompareConfig, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = current_snapshot(&config)?;
    let store = FsSnapshotStore::new(&config.snapshot_path);
    store
        .save(&config.snapshot_file_name, &snapshot)
        .context("could not save the storage layout snapshot")?;

    let path = config.snapshot_file();
    match format {
        OutputFormat::Json => println!(
            "{}",
            to_json(&serde_json::json!({
                "path": path,
                "buildInfos": snapshot.build_infos.len(),
                "contracts": snapshot.contract_count(),
            }))?
        ),
        OutputFormat::Text => println!(
            "{} Saved snapshot of {} contract(s) to {}",
            "✓".green().bold(),
            snapshot.contract_count(),
            path.display().to_string().bold()
        ),
    }
    Ok(())
}

/// What a comparison found and what the mode makes of it.
#[derive(Debug)]
pub struct CompareOutcome {
    pub info: CompareInfo,
    pub verdict: Verdict,
    /// Inheritance impact of the saved snapshot.
    pub impact_old: ImpactMap,
    /// Inheritance impact of the current build.
    pub impact_latest: ImpactMap,
}

impl CompareOutcome {
    /// Borrow the outcome as a printable report.
    pub fn report(&self) -> CompareReport<'_> {
        CompareReport::new(&self.info, &self.impact_old, &self.impact_latest)
    }
}

/// Compare `current` against the snapshot saved under `name`.
pub fn run_compare(
    store: &dyn SnapshotStore,
    name: &str,
    current: &BuildSnapshot,
    mode: CompareMode,
) -> anyhow::Result<CompareOutcome> {
    let saved = store
        .load(name)
        .context("could not load the saved storage layout snapshot")?;
    let info = compare_snapshots(&saved, current).context("storage layout comparison aborted")?;
    let verdict = evaluate(mode, saved == *current, &info);
    info!(%mode, ?verdict, records = info.record_count(), "compared snapshots");
    Ok(CompareOutcome {
        info,
        verdict,
        impact_old: saved.inheritance_impact,
        impact_latest: current.inheritance_impact.clone(),
    })
}

fn cmd_compare(config: CompareConfig, format: OutputFormat) -> anyhow::Result<()> {
    let store = FsSnapshotStore::new(&config.snapshot_path);
    if !store.exists(&config.snapshot_file_name)? {
        anyhow::bail!(
            "could not find saved snapshot of the storage layout at {}",
            config.snapshot_file().display()
        );
    }
    let current = current_snapshot(&config)?;
    let outcome = run_compare(&store, &config.snapshot_file_name, &current, config.mode)?;

    match (format, outcome.verdict) {
        (OutputFormat::Json, _) => println!("{}", to_json(&outcome.report())?),
        (OutputFormat::Text, Verdict::Identical) => println!("{}", EQUAL_MESSAGE.green()),
        (OutputFormat::Text, _) if config.print_diff => println!("{}", render_compare(&outcome.report())),
        (OutputFormat::Text, _) => println!("{}", ATTENTION_BANNER.yellow().bold()),
    }

    if let Verdict::Failed(message) = outcome.verdict {
        anyhow::bail!(message);
    }
    Ok(())
}

fn cmd_impact(config: CompareConfig, args: ImpactArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = with_save_args(
        config,
        SaveArgs {
            build_info: args.build_info,
            ..Default::default()
        },
    );
    let snapshot = current_snapshot(&config)?;
    match format {
        OutputFormat::Json => println!("{}", to_json(&snapshot.inheritance_impact)?),
        OutputFormat::Text => println!("{}", render_impact(&snapshot.inheritance_impact)),
    }
    Ok(())
}
