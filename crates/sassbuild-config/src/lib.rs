//! Configuration types for sassbuild.
//!
//! This crate contains the configuration structs that are parsed from
//! `.config/sassbuild.yaml`. Discovery and path resolution live in the
//! `sassbuild` crate.

use serde::Deserialize;

/// sassbuild configuration from `.config/sassbuild.yaml`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct SassbuildConfig {
    /// Source directory (relative to project root)
    pub source: String,

    /// Subpath below `source` that holds the stylesheets.
    #[serde(default)]
    pub sass_path: String,

    /// Output directory (relative to project root)
    pub output: String,

    /// Subpath below `output` where CSS is written.
    #[serde(default)]
    pub css_path: String,

    /// Compiler settings
    #[serde(default)]
    pub options: CompilerConfig,
}

/// Compiler-tunable settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Indentation string used for nested output
    pub indent: String,

    /// Line ending written between output lines
    pub linefeed: String,

    /// Output style for the generated css code
    pub output_style: OutputStyle,

    /// Precision for outputting fractional numbers
    pub precision: Option<u32>,

    /// Additional directories searched by `@import` / `@use`
    /// (relative to project root)
    pub include_paths: Vec<String>,

    /// Directory to load compiler plugins from
    pub plugin_path: Option<String>,

    /// Emit inline comments pointing at the source line
    pub source_comments: bool,

    /// Source map generation
    pub source_map: SourceMapConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            linefeed: "\n".to_string(),
            output_style: OutputStyle::default(),
            precision: None,
            include_paths: Vec::new(),
            plugin_path: None,
            source_comments: false,
            source_map: SourceMapConfig::default(),
        }
    }
}

/// Source map settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct SourceMapConfig {
    /// Write a `.css.map` next to every CSS file
    pub enabled: bool,

    /// Embed the map as a data URI in the `sourceMappingURL` comment
    pub embed: bool,

    /// Embed source contents in the map
    pub contents: bool,

    /// Don't append a `sourceMappingURL` comment to the CSS
    pub omit_url: bool,

    /// Value of the map's `sourceRoot` field
    pub root: Option<String>,
}

impl Default for SourceMapConfig {
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

/// Output style for the generated CSS
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compact,
    Compressed,
    Nested,
}
