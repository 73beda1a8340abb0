//! Error types for incremental builds.
//!
//! Compilation errors and I/O failures are kept apart: a stylesheet that
//! does not compile is a different problem from an output tree that cannot
//! be written.

use camino::Utf8PathBuf;
use std::fmt;

/// A structured Sass compilation error.
///
/// Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationError {
    /// File the error was reported in (may be an imported file)
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Short message, without location
    pub message: String,
    /// The compiler's full human-readable report
    pub formatted: String,
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file, self.line, self.column, self.message
        )
    }
}

impl std::error::Error for CompilationError {}

/// The compiler could not be run on an input at all.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A file needed to build the output (such as the source embedded in
    /// `sourcesContent`) could not be read. Read failures inside grass,
    /// including the entry file, surface as [`BackendError::Internal`].
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other failure inside the compiler.
    #[error("compiler failed on {path}: {message}")]
    Internal { path: Utf8PathBuf, message: String },
}

/// Result of compiling a single file.
#[derive(Debug, thiserror::Error)]
pub enum CompileFailure {
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A stylesheet failed to compile.
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),

    /// The compiler could not process a stylesheet.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A destination directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A change record points outside the configured source root.
    #[error("{path} is not under the source root {source_root}")]
    OutsideSourceRoot {
        path: Utf8PathBuf,
        source_root: Utf8PathBuf,
    },
}

impl From<CompileFailure> for BuildError {
    fn from(failure: CompileFailure) -> Self {
        match failure {
            CompileFailure::Compilation(e) => BuildError::Compilation(e),
            CompileFailure::Backend(e) => BuildError::Backend(e),
        }
    }
}

impl BuildError {
    /// True for failures of the output tree rather than of the sources.
    pub fn is_io(&self) -> bool {
        matches!(self, BuildError::OutputDir { .. } | BuildError::Write { .. })
    }
}
