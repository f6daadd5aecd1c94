//! Main entry point for the packmerge CLI application.
//!
//! Loads the packs named on the command line, merges them with the
//! library's [`MergeEngine`], and writes the result to the current
//! directory or where `-o`/`-d` point.

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::warn;

use packmerge::inputs::{format_size, load_packs};
use packmerge::pack::png_dimensions;
use packmerge::{Cli, MergeEngine, MergePlan, PackMetadata, Phase};

/// Application entry point.
///
/// Parses command-line arguments, sets up logging, and dispatches to
/// list mode or merge mode.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    run(&cli).await
}

async fn run(cli: &Cli) -> Result<()> {
    let loaded = load_packs(&cli.packs, &cli.input_policy()).await?;
    if loaded.packs.is_empty() {
        bail!("No resource packs left to merge");
    }

    let engine = MergeEngine::new(cli.merge_options());

    // List mode: show the merge plan and exit
    if cli.list {
        let plan = engine.plan(&loaded.packs, &packmerge::NoProgress).await?;
        print_plan(&plan, cli.verbose);
        return Ok(());
    }

    let metadata = build_metadata(cli).await?;

    // Resolve the output path before merging so a refusal costs nothing
    let output_path = match cli.output {
        Some(ref path) => path.clone(),
        None => {
            let dir = cli.output_dir.clone().unwrap_or_default();
            dir.join(metadata.file_name())
        }
    };
    if output_path.exists() && !cli.force {
        bail!(
            "{} already exists (use -f to overwrite)",
            output_path.display()
        );
    }

    let quiet = cli.is_quiet();
    let report = move |phase: Phase, percent: u8| {
        if !quiet {
            eprintln!("  [{:>3}%] {}", percent, phase);
        }
    };
    let merged = engine.merge(&loaded.packs, &metadata, &report).await?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&output_path, &merged.data)
        .await
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if !merged.skipped.is_empty() {
        warn!(
            "{} unreadable entries were left out of the merged pack",
            merged.skipped.len()
        );
    }

    if !quiet {
        println!(
            "Wrote {} ({}, {} entries, {} overridden)",
            output_path.display(),
            format_size(merged.data.len() as u64),
            merged.entry_count,
            merged.conflict_count
        );
    }

    Ok(())
}

/// Collect name, description, format and icon from the command line.
async fn build_metadata(cli: &Cli) -> Result<PackMetadata> {
    let mut metadata = PackMetadata::new(cli.name.as_str(), cli.description.as_str())
        .with_format_version(cli.pack_format);

    if let Some(ref path) = cli.icon {
        let icon = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read icon {}", path.display()))?;
        match png_dimensions(&icon) {
            Some((w, h)) if w != h => warn!(
                "Icon {} is {}x{}, packs expect a square image",
                path.display(),
                w,
                h
            ),
            Some(_) => {}
            None => warn!("Icon {} does not look like a PNG", path.display()),
        }
        metadata = metadata.with_icon(icon);
    }

    Ok(metadata)
}

/// Print the merged file list.
///
/// Supports two output formats:
/// - Simple format (`-l`): each path with the pack that supplies it
/// - Verbose format (`-lv`): size, winner and overridden packs per path
fn print_plan(plan: &MergePlan, verbose: bool) {
    let pack_name = |index: usize| plan.packs.get(index).map(String::as_str).unwrap_or("?");

    if verbose {
        println!("{:>10}  {:<24}  {:<24}  Name", "Length", "From", "Overrides");
        println!("{}", "-".repeat(80));
    }

    let mut total = 0u64;
    for (path, file) in plan.files.iter() {
        if verbose {
            let overrides: Vec<_> = file.overridden.iter().map(|&i| pack_name(i)).collect();
            println!(
                "{:>10}  {:<24}  {:<24}  {}",
                file.data.len(),
                pack_name(file.source),
                overrides.join(","),
                path
            );
            total += file.data.len() as u64;
        } else {
            println!("{}  [{}]", path, pack_name(file.source));
        }
    }

    if verbose {
        println!("{}", "-".repeat(80));
        println!(
            "{:>10}  {} files, {} overridden, {} unreadable",
            total,
            plan.files.len(),
            plan.files.conflict_count(),
            plan.skipped.len()
        );
    }

    for skipped in &plan.skipped {
        eprintln!("{}", skipped);
    }
}
