//! Stylesheet sources: dialect, partials, and source tree discovery.

use camino::{Utf8Path, Utf8PathBuf};

/// Stylesheet dialect, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// Brace-delimited `.scss`
    Scss,
    /// Indented `.sass`
    Indented,
}

impl Syntax {
    /// Detect the dialect from a path's extension.
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension()? {
            "scss" => Some(Syntax::Scss),
            "sass" => Some(Syntax::Indented),
            _ => None,
        }
    }

    /// The file extension for this dialect, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Syntax::Scss => "scss",
            Syntax::Indented => "sass",
        }
    }
}

/// One stylesheet source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    path: Utf8PathBuf,
    syntax: Syntax,
    partial: bool,
}

impl SourceUnit {
    /// Classify a path. Returns `None` when the extension is not a
    /// stylesheet extension.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Option<Self> {
        let path = path.into();
        let syntax = Syntax::from_path(&path)?;
        let partial = path.file_name().is_some_and(|name| name.starts_with('_'));
        Some(Self {
            path,
            syntax,
            partial,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Partials (`_name.scss`) are only ever imported, never compiled on their own.
    pub fn is_partial(&self) -> bool {
        self.partial
    }
}

/// Find every `.scss` and `.sass` file below `root`, sorted by path.
///
/// Partials are included; callers decide what to do with them. A missing
/// root yields an empty list.
pub fn discover_sources(root: &Utf8Path) -> Vec<SourceUnit> {
    if !root.is_dir() {
        tracing::debug!(root = %root, "source root does not exist");
        return Vec::new();
    }

    let mut sources = Vec::new();
    for entry in ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .build()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read source tree entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        if let Some(unit) = SourceUnit::new(path) {
            sources.push(unit);
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(root = %root, count = sources.len(), "discovered sources");
    sources
}
