//! sassbuild - incremental Sass/SCSS to CSS compilation
//!
//! A host build tool hands each build a [`ChangeSet`] of added, modified and
//! removed stylesheets. The [`IncrementalController`] compiles what is out
//! of date, writes the CSS (and source maps) under the destination root and
//! cleans up artifacts of removed sources. Partials (`_name.scss`) are never
//! compiled on their own.
//!
//! ```no_run
//! use sassbuild::{ChangeRecord, ChangeSet, GrassBackend, IncrementalController, OutputLayout};
//!
//! # fn main() -> Result<(), sassbuild::BuildError> {
//! let controller = IncrementalController::new(
//!     OutputLayout::new("/project/src/sass", "/project/build/css"),
//!     GrassBackend,
//! );
//! let changes = ChangeSet::incremental()
//!     .with(ChangeRecord::modified("/project/src/sass/site.scss"))
//!     .with(ChangeRecord::removed("/project/src/sass/old.scss"));
//! controller.build(changes, &Default::default())?;
//! # Ok(())
//! # }
//! ```

pub mod change_set;
pub mod compiler;
pub mod config;
pub mod controller;
pub mod error;
pub mod options;
pub mod paths;
pub mod source;
pub mod writer;

pub use change_set::{ChangeKind, ChangeRecord, ChangeSet};
pub use compiler::{CompiledStylesheet, Compiler, CompilerBackend, GrassBackend, GrassCompiler};
pub use config::ResolvedConfig;
pub use controller::{BuildReport, IncrementalController};
pub use error::{BackendError, BuildError, CompilationError, CompileFailure};
pub use options::{
    Capability, CompilationOptions, ImportResolver, LogSink, MessageLocation, OutputStyle,
    SourceMapOptions, TracingLogSink,
};
pub use paths::{OutputLayout, OutputTarget};
pub use source::{SourceUnit, Syntax, discover_sources};
pub use writer::{OutputWriter, WriteOutcome};
