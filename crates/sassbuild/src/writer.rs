//! Writing and deleting output artifacts.
//!
//! Writes go to a scratch file next to the destination which is then
//! renamed into place, so a failed write never leaves a truncated artifact
//! at the final path. Deletes are best-effort and never fail a build.

use std::io::Write as _;

use camino::Utf8Path;

use crate::error::BuildError;

/// What a write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The artifact was created or replaced.
    Written,
    /// The destination already held identical bytes.
    Unchanged,
}

/// Persists compiled artifacts under a destination tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutputWriter;

impl OutputWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `contents` to `path`, creating parent directories as needed.
    pub fn write(&self, path: &Utf8Path, contents: &[u8]) -> Result<WriteOutcome, BuildError> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        if !parent.is_dir() {
            fs_err::create_dir_all(parent).map_err(|source| {
                tracing::error!(dir = %parent, "cannot create output directory");
                BuildError::OutputDir {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }

        // Skip the write entirely if the content is unchanged
        if let Ok(existing) = fs_err::read(path) {
            if existing == contents {
                tracing::trace!(path = %path, "unchanged, skipping write");
                return Ok(WriteOutcome::Unchanged);
            }
        }

        let write_err = |source| BuildError::Write {
            path: path.to_path_buf(),
            source,
        };

        // Scratch files default to 0600; artifacts get the same mode a plain
        // create would give them, or keep the mode of the file they replace.
        let mut builder = tempfile::Builder::new();
        builder.prefix(".sassbuild-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut scratch = builder.tempfile_in(parent).map_err(write_err)?;

        if let Ok(existing) = fs_err::metadata(path) {
            if let Err(source) = scratch.as_file().set_permissions(existing.permissions()) {
                discard_scratch(scratch);
                return Err(write_err(source));
            }
        }

        if let Err(source) = scratch.write_all(contents).and_then(|_| scratch.flush()) {
            discard_scratch(scratch);
            return Err(write_err(source));
        }

        if let Err(e) = scratch.persist(path) {
            discard_scratch(e.file);
            return Err(write_err(e.error));
        }

        tracing::debug!(path = %path, bytes = contents.len(), "wrote artifact");
        Ok(WriteOutcome::Written)
    }

    /// Best-effort delete. Returns true if a file was removed.
    ///
    /// A file that is already gone is not a failure; anything else is
    /// logged and swallowed.
    pub fn delete(&self, path: &Utf8Path) -> bool {
        match fs_err::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path, "deleted artifact");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::info!(path = %path, error = %e, "unable to delete file");
                false
            }
        }
    }

    /// Best-effort delete of every `*.css` and `*.css.map` below `root`.
    /// Returns the number of files removed.
    pub fn purge(&self, root: &Utf8Path) -> usize {
        if !root.is_dir() {
            return 0;
        }

        let mut removed = 0;
        for entry in ignore::WalkBuilder::new(root)
            .standard_filters(false)
            .build()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::info!(error = %e, "unable to read output tree entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Some(path) = Utf8Path::from_path(entry.path()) else {
                continue;
            };
            if is_artifact(path) && self.delete(path) {
                removed += 1;
            }
        }

        tracing::debug!(root = %root, removed, "purged output tree");
        removed
    }
}

/// Whether a path looks like something this tool produces.
pub fn is_artifact(path: &Utf8Path) -> bool {
    let name = path.file_name().unwrap_or_default();
    name.ends_with(".css") || name.ends_with(".css.map")
}

fn discard_scratch(scratch: tempfile::NamedTempFile) {
    let scratch_path = scratch.path().display().to_string();
    if let Err(e) = scratch.close() {
        tracing::info!(path = %scratch_path, error = %e, "unable to delete scratch file");
    }
}
