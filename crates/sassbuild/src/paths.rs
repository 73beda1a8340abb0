//! Mapping from source files to output locations.
//!
//! `<source_root>/<p>.scss` compiles to `<dest_root>/<p>.css`, with the
//! source map (if any) at `<dest_root>/<p>.css.map`.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::source::Syntax;

/// Source and destination roots for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    source_root: Utf8PathBuf,
    dest_root: Utf8PathBuf,
}

impl OutputLayout {
    pub fn new(source_root: impl Into<Utf8PathBuf>, dest_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
        }
    }

    /// Build a layout from base directories plus relative subpaths
    /// (an empty subpath means the base directory itself).
    pub fn with_subpaths(
        source_dir: &Utf8Path,
        sass_path: &str,
        dest_dir: &Utf8Path,
        css_path: &str,
    ) -> Self {
        fn under(base: &Utf8Path, sub: &str) -> Utf8PathBuf {
            if sub.is_empty() {
                base.to_path_buf()
            } else {
                base.join(sub)
            }
        }
        Self::new(under(source_dir, sass_path), under(dest_dir, css_path))
    }

    pub fn source_root(&self) -> &Utf8Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Utf8Path {
        &self.dest_root
    }

    /// Output base for a source: its path relative to the source root, with
    /// the stylesheet extension removed, re-rooted under the destination.
    ///
    /// Returns `None` if the source is not below the source root or does not
    /// carry a `.scss` / `.sass` extension.
    pub fn output_base(&self, source: &Utf8Path) -> Option<Utf8PathBuf> {
        let relative = source.strip_prefix(&self.source_root).ok()?;
        let syntax = Syntax::from_path(relative)?;
        let relative = relative.as_str();
        let stem = &relative[..relative.len() - syntax.extension().len() - 1];
        if stem.is_empty() || stem.ends_with('/') {
            return None;
        }
        Some(self.dest_root.join(stem))
    }

    /// Both artifact locations for a source.
    pub fn target(&self, source: &Utf8Path) -> Option<OutputTarget> {
        self.output_base(source).map(OutputTarget::from_base)
    }
}

/// The CSS and source map locations for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub css: Utf8PathBuf,
    pub map: Utf8PathBuf,
}

impl OutputTarget {
    pub fn from_base(base: Utf8PathBuf) -> Self {
        Self {
            css: css_path(&base),
            map: map_path(&base),
        }
    }
}

/// `<base>.css`
pub fn css_path(base: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{base}.css"))
}

/// `<base>.css.map`
pub fn map_path(base: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{base}.css.map"))
}

/// Path of `to` relative to the directory `from`, using `..` where needed.
///
/// Both paths are expected to be absolute (or both relative to the same base).
pub fn relative_path(from: &Utf8Path, to: &Utf8Path) -> Utf8PathBuf {
    let from: Vec<Utf8Component<'_>> = from.components().collect();
    let to: Vec<Utf8Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = Utf8PathBuf::new();
    for _ in common..from.len() {
        result.push("..");
    }
    for component in &to[common..] {
        result.push(component.as_str());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> OutputLayout {
        OutputLayout::new("/project/src/main/sass", "/project/build/css")
    }

    #[test]
    fn test_output_base_top_level() {
        assert_eq!(
            layout().output_base(Utf8Path::new("/project/src/main/sass/main.scss")),
            Some(Utf8PathBuf::from("/project/build/css/main"))
        );
    }

    #[test]
    fn test_output_base_nested_and_indented() {
        assert_eq!(
            layout().output_base(Utf8Path::new("/project/src/main/sass/theme/dark.sass")),
            Some(Utf8PathBuf::from("/project/build/css/theme/dark"))
        );
    }

    #[test]
    fn test_output_base_strips_only_the_extension() {
        assert_eq!(
            layout().output_base(Utf8Path::new("/project/src/main/sass/site.min.scss")),
            Some(Utf8PathBuf::from("/project/build/css/site.min"))
        );
    }

    #[test]
    fn test_output_base_rejects_foreign_paths() {
        assert_eq!(
            layout().output_base(Utf8Path::new("/elsewhere/main.scss")),
            None
        );
        assert_eq!(
            layout().output_base(Utf8Path::new("/project/src/main/sass/main.less")),
            None
        );
        // A sibling directory sharing a string prefix is not below the root
        assert_eq!(
            layout().output_base(Utf8Path::new("/project/src/main/sass2/main.scss")),
            None
        );
    }

    #[test]
    fn test_target_paths() {
        let target = layout()
            .target(Utf8Path::new("/project/src/main/sass/a/b.scss"))
            .unwrap();
        assert_eq!(target.css, Utf8PathBuf::from("/project/build/css/a/b.css"));
        assert_eq!(
            target.map,
            Utf8PathBuf::from("/project/build/css/a/b.css.map")
        );
    }

    #[test]
    fn test_with_subpaths() {
        let layout = OutputLayout::with_subpaths(
            Utf8Path::new("/p/src"),
            "sass",
            Utf8Path::new("/p/build"),
            "",
        );
        assert_eq!(layout.source_root(), "/p/src/sass");
        assert_eq!(layout.dest_root(), "/p/build");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Utf8Path::new("/p/build/css/a"), Utf8Path::new("/p/src/a/b.scss")),
            Utf8PathBuf::from("../../../src/a/b.scss")
        );
        assert_eq!(
            relative_path(Utf8Path::new("/p/out"), Utf8Path::new("/p/out/x.scss")),
            Utf8PathBuf::from("x.scss")
        );
    }
}
