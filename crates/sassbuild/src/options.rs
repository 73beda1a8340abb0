//! Compiler options snapshot and user-supplied capabilities.
//!
//! A [`CompilationOptions`] value is built once per build and never mutated
//! while the build runs.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

pub use sassbuild_config::OutputStyle;

/// Where a `@warn` or `@debug` message came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for MessageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Receives messages emitted by `@warn` and `@debug`.
pub trait LogSink: Send + Sync {
    fn warn(&self, location: &MessageLocation, message: &str);
    fn debug(&self, location: &MessageLocation, message: &str);
}

/// Supplies stylesheet contents for `@import` / `@use` before the real
/// file system is consulted.
///
/// `path` is the candidate location the compiler is probing (for example
/// `<dir>/_colors.scss`). Return `None` to fall through to disk.
pub trait ImportResolver: Send + Sync {
    fn resolve(&self, path: &Utf8Path) -> Option<Vec<u8>>;

    /// Whether `path` should be treated as a directory. Defaults to no.
    fn is_dir(&self, _path: &Utf8Path) -> bool {
        false
    }
}

/// A user-supplied hook injected into the compiler.
#[derive(Clone)]
pub enum Capability {
    LogSink(Arc<dyn LogSink>),
    ImportResolver(Arc<dyn ImportResolver>),
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::LogSink(_) => f.write_str("LogSink(..)"),
            Capability::ImportResolver(_) => f.write_str("ImportResolver(..)"),
        }
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Capability::LogSink(a), Capability::LogSink(b)) => Arc::ptr_eq(a, b),
            (Capability::ImportResolver(a), Capability::ImportResolver(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Source map settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapOptions {
    pub enabled: bool,
    /// Embed the map as a data URI instead of referencing the `.css.map` file
    pub embed: bool,
    /// Include source contents in the map
    pub contents: bool,
    /// Don't append a `sourceMappingURL` comment
    pub omit_url: bool,
    /// `sourceRoot` of the map
    pub root: Option<String>,
}

impl Default for SourceMapOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            embed: false,
            contents: false,
            omit_url: false,
            root: None,
        }
    }
}

/// Every compiler-tunable setting for one build.
///
/// Equality is by value, except capabilities which compare by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationOptions {
    pub indent: String,
    pub linefeed: String,
    pub output_style: OutputStyle,
    pub precision: Option<u32>,
    pub include_paths: Vec<Utf8PathBuf>,
    pub plugin_path: Option<Utf8PathBuf>,
    /// Inline comments pointing back at source lines
    pub source_comments: bool,
    pub source_map: SourceMapOptions,
    pub capabilities: Vec<Capability>,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            linefeed: "\n".to_string(),
            output_style: OutputStyle::Expanded,
            precision: None,
            include_paths: Vec::new(),
            plugin_path: None,
            source_comments: false,
            source_map: SourceMapOptions::default(),
            capabilities: Vec::new(),
        }
    }
}

impl CompilationOptions {
    /// Resolve configuration values against the project root.
    pub fn from_config(config: &sassbuild_config::CompilerConfig, root: &Utf8Path) -> Self {
        Self {
            indent: config.indent.clone(),
            linefeed: config.linefeed.clone(),
            output_style: config.output_style,
            precision: config.precision,
            include_paths: config.include_paths.iter().map(|p| root.join(p)).collect(),
            plugin_path: config.plugin_path.as_ref().map(|p| root.join(p)),
            source_comments: config.source_comments,
            source_map: SourceMapOptions {
                enabled: config.source_map.enabled,
                embed: config.source_map.embed,
                contents: config.source_map.contents,
                omit_url: config.source_map.omit_url,
                root: config.source_map.root.clone(),
            },
            capabilities: Vec::new(),
        }
    }

    /// Register a capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn with_log_sink(self, sink: Arc<dyn LogSink>) -> Self {
        self.with_capability(Capability::LogSink(sink))
    }

    pub fn with_import_resolver(self, resolver: Arc<dyn ImportResolver>) -> Self {
        self.with_capability(Capability::ImportResolver(resolver))
    }

    pub fn log_sinks(&self) -> impl Iterator<Item = &Arc<dyn LogSink>> {
        self.capabilities.iter().filter_map(|c| match c {
            Capability::LogSink(sink) => Some(sink),
            _ => None,
        })
    }

    pub fn import_resolvers(&self) -> impl Iterator<Item = &Arc<dyn ImportResolver>> {
        self.capabilities.iter().filter_map(|c| match c {
            Capability::ImportResolver(resolver) => Some(resolver),
            _ => None,
        })
    }
}

/// Forwards `@warn` and `@debug` to tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn warn(&self, location: &MessageLocation, message: &str) {
        tracing::warn!(location = %location, "{message}");
    }

    fn debug(&self, location: &MessageLocation, message: &str) {
        tracing::info!(location = %location, "{message}");
    }
}
