//! Compiling one stylesheet.
//!
//! [`CompilerBackend::configure`] turns an options snapshot into a compiler
//! handle that lives for exactly one build. [`Compiler::compile`] turns one
//! source into CSS text and, when enabled, source map text. Sass errors come
//! back as structured [`CompilationError`]s so the caller can report them.
//!
//! The production backend is [`GrassBackend`], built on the `grass` crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use camino::Utf8Path;
use serde::Serialize;

use crate::error::{BackendError, CompilationError, CompileFailure};
use crate::options::{
    CompilationOptions, ImportResolver, LogSink, MessageLocation, OutputStyle, TracingLogSink,
};
use crate::paths::{OutputTarget, relative_path};
use crate::source::{SourceUnit, Syntax};

/// Compiler output for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStylesheet {
    pub css: String,
    /// Present only when source maps are enabled
    pub source_map: Option<String>,
}

/// A compiler handle configured for one build.
pub trait Compiler {
    /// Compile `unit`, whose artifacts will end up at `target`.
    ///
    /// `target` is only used to compute references between the CSS, its map
    /// and the source; the compiler never writes to it.
    fn compile(
        &self,
        unit: &SourceUnit,
        target: &OutputTarget,
    ) -> Result<CompiledStylesheet, CompileFailure>;
}

/// Creates compiler handles from an options snapshot.
pub trait CompilerBackend {
    type Compiler: Compiler;

    fn configure(&self, options: &CompilationOptions) -> Self::Compiler;
}

/// Sass compilation through `grass`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrassBackend;

impl CompilerBackend for GrassBackend {
    type Compiler = GrassCompiler;

    fn configure(&self, options: &CompilationOptions) -> GrassCompiler {
        GrassCompiler::new(options.clone())
    }
}

/// A grass-backed compiler holding the build's options snapshot.
pub struct GrassCompiler {
    options: CompilationOptions,
}

impl GrassCompiler {
    pub fn new(options: CompilationOptions) -> Self {
        if let Some(precision) = options.precision {
            tracing::warn!(precision, "grass uses a fixed numeric precision; ignoring `precision`");
        }
        if options.source_comments {
            tracing::warn!("grass cannot emit source comments; ignoring `source_comments`");
        }
        if let Some(plugin_path) = &options.plugin_path {
            tracing::warn!(%plugin_path, "grass does not load plugins; ignoring `plugin_path`");
        }
        if matches!(options.output_style, OutputStyle::Nested | OutputStyle::Compact) {
            tracing::debug!(style = ?options.output_style, "output style not supported by grass, using expanded");
        }

        let options = options.with_log_sink(Arc::new(TracingLogSink));
        Self { options }
    }

    pub fn options(&self) -> &CompilationOptions {
        &self.options
    }
}

impl Compiler for GrassCompiler {
    fn compile(
        &self,
        unit: &SourceUnit,
        target: &OutputTarget,
    ) -> Result<CompiledStylesheet, CompileFailure> {
        let fs = CapabilityFs {
            resolvers: self.options.import_resolvers().cloned().collect(),
        };
        let logger = SinkLogger {
            sinks: self.options.log_sinks().cloned().collect(),
        };

        let style = match self.options.output_style {
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
            OutputStyle::Expanded | OutputStyle::Nested | OutputStyle::Compact => {
                grass::OutputStyle::Expanded
            }
        };
        let syntax = match unit.syntax() {
            Syntax::Scss => grass::InputSyntax::Scss,
            Syntax::Indented => grass::InputSyntax::Sass,
        };

        let mut grass_options = grass::Options::default()
            .fs(&fs)
            .logger(&logger)
            .style(style)
            .input_syntax(syntax);
        for include in &self.options.include_paths {
            grass_options = grass_options.load_path(include.as_std_path());
        }

        tracing::debug!(source = %unit.path(), syntax = ?unit.syntax(), "compiling");
        let css = grass::from_path(unit.path().as_std_path(), &grass_options)
            .map_err(|e| convert_error(e, unit.path()))?;

        let mut css = reformat(&css, &self.options.indent, &self.options.linefeed);

        let map = &self.options.source_map;
        if !map.enabled {
            return Ok(CompiledStylesheet {
                css,
                source_map: None,
            });
        }

        let source_map = build_source_map(unit, target, &self.options)?;
        if !map.omit_url {
            let url = if map.embed {
                format!(
                    "data:application/json;base64,{}",
                    base64::engine::general_purpose::STANDARD.encode(&source_map)
                )
            } else {
                file_name(&target.map).to_string()
            };
            if !css.is_empty() && !css.ends_with(self.options.linefeed.as_str()) {
                css.push_str(&self.options.linefeed);
            }
            css.push_str(&format!("/*# sourceMappingURL={url} */"));
            css.push_str(&self.options.linefeed);
        }

        Ok(CompiledStylesheet {
            css,
            source_map: Some(source_map),
        })
    }
}

fn convert_error(err: Box<grass::Error>, source: &Utf8Path) -> CompileFailure {
    let formatted = err.to_string();
    match (*err).kind() {
        grass::ErrorKind::ParseError { message, loc, .. } => CompilationError {
            file: loc.file.name().to_string(),
            line: loc.begin.line + 1,
            column: loc.begin.column + 1,
            message,
            formatted,
        }
        .into(),
        _ => BackendError::Internal {
            path: source.to_path_buf(),
            message: formatted,
        }
        .into(),
    }
}

fn file_name(path: &Utf8Path) -> &str {
    path.file_name().unwrap_or(path.as_str())
}

/// Source Map v3 document. grass records no positions, so `mappings` is
/// always empty.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceMapV3<'a> {
    version: u8,
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_root: Option<&'a str>,
    sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources_content: Option<Vec<String>>,
    names: Vec<String>,
    mappings: &'a str,
}

fn build_source_map(
    unit: &SourceUnit,
    target: &OutputTarget,
    options: &CompilationOptions,
) -> Result<String, BackendError> {
    let map_dir = target.map.parent().unwrap_or(Utf8Path::new(""));
    let source = relative_path(map_dir, unit.path());

    let sources_content = if options.source_map.contents {
        let content =
            fs_err::read_to_string(unit.path()).map_err(|source| BackendError::Read {
                path: unit.path().to_path_buf(),
                source,
            })?;
        Some(vec![content])
    } else {
        None
    };

    let map = SourceMapV3 {
        version: 3,
        file: file_name(&target.css),
        source_root: options.source_map.root.as_deref(),
        sources: vec![source.into_string()],
        sources_content,
        names: Vec::new(),
        mappings: "",
    };

    serde_json::to_string(&map).map_err(|e| BackendError::Internal {
        path: unit.path().to_path_buf(),
        message: format!("failed to serialize source map: {e}"),
    })
}

/// Re-indent grass output (which always indents with two spaces and ends
/// lines with `\n`) using the configured indent and line ending.
///
/// Continuation lines of multi-line `/* ... */` comments keep their text
/// as written; only the line ending changes.
fn reformat(css: &str, indent: &str, linefeed: &str) -> String {
    if indent == "  " && linefeed == "\n" {
        return css.to_string();
    }

    let mut out = String::with_capacity(css.len());
    let mut in_comment = false;
    let mut lines = css.split('\n').peekable();
    while let Some(line) = lines.next() {
        if in_comment {
            out.push_str(line);
        } else {
            let content = line.trim_start_matches(' ');
            let depth = (line.len() - content.len()) / 2;
            out.push_str(&indent.repeat(depth));
            out.push_str(&line[depth * 2..]);
        }
        in_comment = comment_open_after(line, in_comment);
        if lines.peek().is_some() {
            out.push_str(linefeed);
        }
    }
    out
}

/// Whether a `/* ... */` comment is still open at the end of `line`.
fn comment_open_after(line: &str, mut in_comment: bool) -> bool {
    let mut rest = line;
    loop {
        let marker = if in_comment { "*/" } else { "/*" };
        match rest.find(marker) {
            Some(at) => {
                rest = &rest[at + 2..];
                in_comment = !in_comment;
            }
            None => return in_comment,
        }
    }
}

/// File system seen by grass: import resolvers first, then the disk.
#[derive(Clone)]
struct CapabilityFs {
    resolvers: Vec<Arc<dyn ImportResolver>>,
}

impl std::fmt::Debug for CapabilityFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityFs")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl CapabilityFs {
    fn resolve(&self, path: &Path) -> Option<Vec<u8>> {
        let path = Utf8Path::from_path(path)?;
        self.resolvers.iter().find_map(|r| r.resolve(path))
    }
}

impl grass::Fs for CapabilityFs {
    fn is_dir(&self, path: &Path) -> bool {
        if let Some(utf8) = Utf8Path::from_path(path) {
            if self.resolvers.iter().any(|r| r.is_dir(utf8)) {
                return true;
            }
        }
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path).is_some() || path.is_file()
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        match self.resolve(path) {
            Some(contents) => Ok(contents),
            None => fs_err::read(PathBuf::from(path)),
        }
    }
}

/// Fans `@warn` / `@debug` out to every registered sink.
struct SinkLogger {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl std::fmt::Debug for SinkLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkLogger")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

fn message_location(location: &codemap::SpanLoc) -> MessageLocation {
    MessageLocation {
        file: location.file.name().to_string(),
        line: location.begin.line + 1,
        column: location.begin.column + 1,
    }
}

impl grass::Logger for SinkLogger {
    fn debug(&self, location: codemap::SpanLoc, message: &str) {
        let location = message_location(&location);
        for sink in &self.sinks {
            sink.debug(&location, message);
        }
    }

    fn warn(&self, location: codemap::SpanLoc, message: &str) {
        let location = message_location(&location);
        for sink in &self.sinks {
            sink.warn(&location, message);
        }
    }
}
