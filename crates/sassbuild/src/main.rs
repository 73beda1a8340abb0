//! `sassbuild` - compile a project's stylesheets from the command line.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use sassbuild::{ChangeRecord, ChangeSet, GrassBackend, IncrementalController, ResolvedConfig};
use tracing_subscriber::prelude::*;

const USAGE: &str = "Usage: sassbuild [--project <dir>] [--incremental] \
    [--added <file>]... [--modified <file>]... [--removed <file>]...";

fn init_tracing() {
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).compact();
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

#[derive(Debug, Default)]
struct Args {
    project: Option<Utf8PathBuf>,
    incremental: bool,
    changes: Vec<ChangeRecord>,
}

fn parse_args(args: impl IntoIterator<Item = String>, cwd: &Utf8Path) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--project" => parsed.project = Some(path_value(&arg, args.next(), cwd)?),
            "--incremental" => parsed.incremental = true,
            "--added" => parsed
                .changes
                .push(ChangeRecord::added(path_value(&arg, args.next(), cwd)?)),
            "--modified" => parsed
                .changes
                .push(ChangeRecord::modified(path_value(&arg, args.next(), cwd)?)),
            "--removed" => parsed
                .changes
                .push(ChangeRecord::removed(path_value(&arg, args.next(), cwd)?)),
            "--help" | "-h" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(eyre!("unknown argument: {other}\n\n{USAGE}")),
        }
    }

    if !parsed.incremental && !parsed.changes.is_empty() {
        return Err(eyre!(
            "--added/--modified/--removed require --incremental\n\n{USAGE}"
        ));
    }

    Ok(parsed)
}

/// The path following `flag`, resolved against the working directory.
fn path_value(flag: &str, next: Option<String>, cwd: &Utf8Path) -> Result<Utf8PathBuf> {
    let value = next.ok_or_else(|| eyre!("{flag} needs a path\n\n{USAGE}"))?;
    Ok(cwd.join(value))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cwd = std::env::current_dir()?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
        eyre!(
            "Current directory is not valid UTF-8: {}",
            e.as_path().display()
        )
    })?;
    let args = parse_args(std::env::args().skip(1), &cwd)?;

    let config = match &args.project {
        Some(project) => ResolvedConfig::discover_from(project)?,
        None => ResolvedConfig::discover()?,
    }
    .ok_or_else(|| eyre!("no .config/sassbuild.yaml found"))?;

    tracing::info!(
        root = %config.root,
        source_root = %config.layout.source_root(),
        dest_root = %config.layout.dest_root(),
        incremental = args.incremental,
        "Starting sassbuild"
    );

    let controller = IncrementalController::new(config.layout.clone(), GrassBackend);
    let report = if args.incremental {
        let mut changes = ChangeSet::incremental();
        changes.extend(args.changes);
        controller.build(changes, &config.options)?
    } else {
        controller.rebuild_all(&config.options)?
    };

    tracing::info!(
        compiled = report.compiled,
        skipped = report.skipped,
        removed = report.removed,
        "Done"
    );
    Ok(())
}
