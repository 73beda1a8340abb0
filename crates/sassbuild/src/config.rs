//! Configuration file discovery and parsing
//!
//! Searches for `.config/sassbuild.yaml` walking up from the current directory.
//! The project root is the parent of `.config/`.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use std::env;

pub use sassbuild_config::{CompilerConfig, SassbuildConfig, SourceMapConfig};

use crate::options::CompilationOptions;
use crate::paths::OutputLayout;

const CONFIG_DIR: &str = ".config";
const CONFIG_FILE_YAML: &str = "sassbuild.yaml";

/// Discovered configuration with resolved paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Project root (parent of .config/)
    pub root: Utf8PathBuf,
    /// Absolute source and destination roots, subpaths applied
    pub layout: OutputLayout,
    /// Compiler options, include paths resolved against the project root
    pub options: CompilationOptions,
}

impl ResolvedConfig {
    /// Discover and load configuration from current directory
    pub fn discover() -> Result<Option<Self>> {
        match find_config_file()? {
            Some(path) => Ok(Some(load_config(&path)?)),
            None => Ok(None),
        }
    }

    /// Load configuration from a specific project path (no walking up)
    pub fn discover_from(project_path: &Utf8Path) -> Result<Option<Self>> {
        let yaml_file = project_path.join(CONFIG_DIR).join(CONFIG_FILE_YAML);
        if yaml_file.exists() {
            Ok(Some(load_config(&yaml_file)?))
        } else {
            Ok(None)
        }
    }
}

/// Search for `.config/sassbuild.yaml` walking up from current directory
fn find_config_file() -> Result<Option<Utf8PathBuf>> {
    let cwd = env::current_dir()?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
        eyre!(
            "Current directory is not valid UTF-8: {}",
            e.as_path().display()
        )
    })?;
    Ok(find_config_file_from(&cwd))
}

fn find_config_file_from(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = start;
    loop {
        let yaml_file = current.join(CONFIG_DIR).join(CONFIG_FILE_YAML);
        if yaml_file.exists() {
            return Some(yaml_file);
        }
        current = current.parent()?;
    }
}

/// Load and resolve configuration from a config file path
fn load_config(config_path: &Utf8Path) -> Result<ResolvedConfig> {
    let content = fs_err::read_to_string(config_path)?;

    let config: SassbuildConfig = serde_yaml::from_str(&content)
        .map_err(|e| eyre!("Failed to parse {}: {}", config_path, e))?;

    // Project root is the parent of .config/
    let config_dir = config_path
        .parent()
        .ok_or_else(|| eyre!("Config file has no parent directory"))?;
    let root = config_dir
        .parent()
        .ok_or_else(|| eyre!(".config directory has no parent"))?
        .to_owned();

    tracing::debug!(config = %config_path, root = %root, "loaded configuration");
    Ok(resolve(config, root))
}

/// Resolve parsed configuration against a project root
pub fn resolve(config: SassbuildConfig, root: Utf8PathBuf) -> ResolvedConfig {
    let layout = OutputLayout::with_subpaths(
        &root.join(&config.source),
        &config.sass_path,
        &root.join(&config.output),
        &config.css_path,
    );
    let options = CompilationOptions::from_config(&config.options, &root);

    ResolvedConfig {
        root,
        layout,
        options,
    }
}
