//! The incremental build controller.
//!
//! A build takes the host's [`ChangeSet`] and brings the output tree in line
//! with it:
//!
//! 1. Non-incremental builds purge every CSS / map artifact under the
//!    destination root first.
//! 2. A [`BuildContext`] (options snapshot + compiler handle) is created for
//!    this build only and dropped when the build ends, successful or not.
//! 3. Added and modified sources are compiled and written. Partials and
//!    non-stylesheets are skipped. The first failure aborts the build.
//! 4. Only once every out-of-date record succeeded are removed sources
//!    processed: both artifacts are deleted, best-effort. Artifacts that
//!    another source produced earlier in the same build are kept.
//!
//! Nothing is kept between builds except what is on disk.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};

use crate::change_set::{ChangeRecord, ChangeSet};
use crate::compiler::{Compiler, CompilerBackend};
use crate::error::{BuildError, CompileFailure};
use crate::options::CompilationOptions;
use crate::paths::OutputLayout;
use crate::source::SourceUnit;
use crate::writer::{OutputWriter, WriteOutcome};

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Sources compiled (whether or not their artifacts changed)
    pub compiled: usize,
    /// Artifacts written because their content changed
    pub written: usize,
    /// Artifacts left alone because their content was identical
    pub unchanged: usize,
    /// Records skipped: partials and non-stylesheet files
    pub skipped: usize,
    /// Removed sources whose artifacts were cleaned up
    pub removed: usize,
    /// Artifacts deleted by the up-front purge of a non-incremental build
    pub purged: usize,
}

/// Per-build state. Created at build entry, dropped at build exit.
struct BuildContext<'a, C> {
    layout: &'a OutputLayout,
    writer: &'a OutputWriter,
    options: CompilationOptions,
    compiler: C,
    report: BuildReport,
    /// CSS paths produced by this build
    produced: HashSet<Utf8PathBuf>,
}

impl<'a, C: Compiler> BuildContext<'a, C> {
    fn new<B>(
        backend: &B,
        layout: &'a OutputLayout,
        writer: &'a OutputWriter,
        options: &CompilationOptions,
    ) -> Self
    where
        B: CompilerBackend<Compiler = C>,
    {
        let options = options.clone();
        let compiler = backend.configure(&options);
        Self {
            layout,
            writer,
            options,
            compiler,
            report: BuildReport::default(),
            produced: HashSet::new(),
        }
    }

    /// Compile one added or modified source and write its artifacts.
    fn out_of_date(&mut self, record: &ChangeRecord) -> Result<(), BuildError> {
        let Some(unit) = SourceUnit::new(record.path()) else {
            tracing::debug!(path = %record.path(), "not a stylesheet, skipping");
            self.report.skipped += 1;
            return Ok(());
        };
        if unit.is_partial() {
            tracing::debug!(path = %unit.path(), "partial, skipping");
            self.report.skipped += 1;
            return Ok(());
        }

        let target = self
            .layout
            .target(unit.path())
            .ok_or_else(|| BuildError::OutsideSourceRoot {
                path: unit.path().to_path_buf(),
                source_root: self.layout.source_root().to_path_buf(),
            })?;

        let output = match self.compiler.compile(&unit, &target) {
            Ok(output) => output,
            Err(CompileFailure::Compilation(e)) => {
                tracing::error!("{}:{}:{}", e.file, e.line, e.column);
                tracing::error!("{}", e.message);
                return Err(BuildError::Compilation(e));
            }
            Err(CompileFailure::Backend(e)) => {
                tracing::error!(path = %unit.path(), error = %e, "compiler failed");
                return Err(BuildError::Backend(e));
            }
        };
        self.report.compiled += 1;

        let outcome = self.writer.write(&target.css, output.css.as_bytes())?;
        self.record(outcome);

        if self.options.source_map.enabled {
            match &output.source_map {
                Some(map) => {
                    let outcome = self.writer.write(&target.map, map.as_bytes())?;
                    self.record(outcome);
                }
                None => tracing::warn!(path = %unit.path(), "source maps enabled but compiler produced none"),
            }
        }

        self.produced.insert(target.css);
        Ok(())
    }

    /// Delete both artifacts of a removed source.
    fn removed(&mut self, record: &ChangeRecord) -> Result<(), BuildError> {
        let Some(target) = self.layout.target(record.path()) else {
            if record.path().starts_with(self.layout.source_root()) {
                tracing::debug!(path = %record.path(), "not a stylesheet, nothing to remove");
                self.report.skipped += 1;
                return Ok(());
            }
            return Err(BuildError::OutsideSourceRoot {
                path: record.path().to_path_buf(),
                source_root: self.layout.source_root().to_path_buf(),
            });
        };

        if self.produced.contains(&target.css) {
            tracing::debug!(
                path = %record.path(),
                css = %target.css,
                "output rebuilt from another source in this build, keeping"
            );
            self.report.skipped += 1;
            return Ok(());
        }

        self.writer.delete(&target.css);
        self.writer.delete(&target.map);
        self.report.removed += 1;
        Ok(())
    }

    fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.report.written += 1,
            WriteOutcome::Unchanged => self.report.unchanged += 1,
        }
    }
}

/// Drives compilation for one source / destination layout.
pub struct IncrementalController<B> {
    layout: OutputLayout,
    backend: B,
    writer: OutputWriter,
}

impl<B: CompilerBackend> IncrementalController<B> {
    pub fn new(layout: OutputLayout, backend: B) -> Self {
        Self {
            layout,
            backend,
            writer: OutputWriter::new(),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one build.
    ///
    /// Fails on the first compilation error or output I/O failure. Artifacts
    /// written earlier in the same build stay on disk.
    pub fn build(
        &self,
        changes: ChangeSet,
        options: &CompilationOptions,
    ) -> Result<BuildReport, BuildError> {
        let incremental = changes.is_incremental();
        tracing::info!(
            incremental,
            changes = changes.len(),
            source_root = %self.layout.source_root(),
            dest_root = %self.layout.dest_root(),
            "starting build"
        );

        let purged = if incremental {
            0
        } else {
            self.writer.purge(self.layout.dest_root())
        };

        let mut ctx = BuildContext::new(&self.backend, &self.layout, &self.writer, options);
        ctx.report.purged = purged;

        let (out_of_date, removed) = changes.into_parts();
        for record in &out_of_date {
            ctx.out_of_date(record)?;
        }
        for record in &removed {
            ctx.removed(record)?;
        }

        let report = ctx.report;
        tracing::info!(
            compiled = report.compiled,
            written = report.written,
            unchanged = report.unchanged,
            removed = report.removed,
            purged = report.purged,
            "build finished"
        );
        Ok(report)
    }

    /// Purge the output tree and compile every source under the source root.
    pub fn rebuild_all(&self, options: &CompilationOptions) -> Result<BuildReport, BuildError> {
        let sources = crate::source::discover_sources(self.layout.source_root());
        self.build(ChangeSet::full_rebuild(sources), options)
    }
}

impl<B> IncrementalController<B> {
    /// Where the artifacts of `source` go, if it maps anywhere.
    pub fn css_path_for(&self, source: &Utf8Path) -> Option<Utf8PathBuf> {
        self.layout.target(source).map(|t| t.css)
    }
}
