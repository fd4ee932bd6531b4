//! Configuration for condense

use crate::CondenseError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the source root
pub const CONFIG_FILE_NAME: &str = ".condense.toml";

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# Condense Configuration

[filter]
# Only bundle files with these extensions (empty = all)
include_ext = []
# Never bundle files with these extensions
exclude_ext = []
# Only descend into directories with these names (empty = all)
include_dirs = []
# Never descend into directories with these names
exclude_dirs = []

[condense]
# Elide imports, docstrings, logging calls and except bodies
enabled = false
# Extensions the condenser applies to
extensions = ["py"]

[ignore]
# Honour .gitignore files while walking
respect_gitignore = true
# Additional patterns to ignore
patterns = [
    ".git",
    "__pycache__",
    "node_modules",
    "target",
    ".venv",
    "venv",
]

[output]
# Files larger than this (bytes) are skipped
max_file_bytes = 10485760
"#;

/// Condense configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub condense: CondenseConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub include_ext: Vec<String>,
    #[serde(default)]
    pub exclude_ext: Vec<String>,
    #[serde(default)]
    pub include_dirs: Vec<String>,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CondenseConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_condense_extensions")]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default = "default_respect_gitignore")]
    pub respect_gitignore: bool,
    #[serde(default = "default_ignore_patterns")]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

// Default value functions
fn default_condense_extensions() -> Vec<String> {
    vec!["py".to_string()]
}
fn default_respect_gitignore() -> bool {
    true
}
fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".git".to_string(),
        "__pycache__".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
        ".venv".to_string(),
        "venv".to_string(),
    ]
}
fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for CondenseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            extensions: default_condense_extensions(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: default_respect_gitignore(),
            patterns: default_ignore_patterns(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl FilterConfig {
    /// Whether a file passes the include/exclude extension filters
    pub fn accepts_file(&self, path: &Path) -> bool {
        let ext = file_extension(path);
        if !self.include_ext.is_empty() && !contains_ext(&self.include_ext, ext) {
            return false;
        }
        !contains_ext(&self.exclude_ext, ext)
    }

    /// Whether the walker may descend into a directory with this name
    pub fn accepts_dir(&self, name: &str) -> bool {
        if !self.include_dirs.is_empty() && !self.include_dirs.iter().any(|d| d == name) {
            return false;
        }
        !self.exclude_dirs.iter().any(|d| d == name)
    }
}

impl CondenseConfig {
    /// Whether the condenser should run on this file
    pub fn applies_to(&self, path: &Path) -> bool {
        self.enabled && contains_ext(&self.extensions, file_extension(path))
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| CondenseError::ConfigParse(e.to_string()))
    }

    /// Load `.condense.toml` from `root` if present, defaults otherwise
    pub fn discover(root: &Path) -> crate::Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config into `root`
    pub fn init(root: &Path) -> crate::Result<PathBuf> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Err(CondenseError::ConfigExists(path));
        }
        fs::create_dir_all(root)?;
        fs::write(&path, DEFAULT_CONFIG)?;
        Ok(path)
    }
}

/// Extension without the leading dot, empty when the file has none
fn file_extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// Extension lists accept both `py` and `.py`
fn contains_ext(list: &[String], ext: &str) -> bool {
    list.iter().any(|e| e.trim_start_matches('.') == ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert!(!config.condense.enabled);
        assert_eq!(config.condense.extensions, vec!["py"]);
        assert!(config.ignore.respect_gitignore);
        assert_eq!(config.output.max_file_bytes, 10 * 1024 * 1024);
        assert!(config.filter.include_ext.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[condense]\nenabled = true\n").unwrap();
        assert!(config.condense.enabled);
        assert_eq!(config.condense.extensions, vec!["py"]);
        assert!(config.ignore.patterns.contains(&"__pycache__".to_string()));
    }

    #[test]
    fn test_invalid_toml_is_config_parse_error() {
        let err = Config::from_toml("[condense\nenabled = ").unwrap_err();
        assert!(matches!(err, CondenseError::ConfigParse(_)));
    }

    #[test]
    fn test_extension_filters_accept_dotted_and_bare() {
        let filter = FilterConfig {
            include_ext: vec![".py".to_string(), "md".to_string()],
            exclude_ext: vec![],
            ..Default::default()
        };
        assert!(filter.accepts_file(Path::new("src/app.py")));
        assert!(filter.accepts_file(Path::new("README.md")));
        assert!(!filter.accepts_file(Path::new("main.rs")));
        assert!(!filter.accepts_file(Path::new("Makefile")));

        let filter = FilterConfig {
            exclude_ext: vec![".lock".to_string()],
            ..Default::default()
        };
        assert!(!filter.accepts_file(Path::new("Cargo.lock")));
        assert!(filter.accepts_file(Path::new("Makefile")));
    }

    #[test]
    fn test_dir_filters() {
        let filter = FilterConfig {
            include_dirs: vec!["src".to_string(), "pkg".to_string()],
            exclude_dirs: vec!["pkg".to_string()],
            ..Default::default()
        };
        assert!(filter.accepts_dir("src"));
        assert!(!filter.accepts_dir("pkg"));
        assert!(!filter.accepts_dir("docs"));
    }

    #[test]
    fn test_condense_applies_only_when_enabled() {
        let mut condense = CondenseConfig::default();
        assert!(!condense.applies_to(Path::new("a.py")));
        condense.enabled = true;
        assert!(condense.applies_to(Path::new("a.py")));
        assert!(!condense.applies_to(Path::new("a.pyc")));
    }

    #[test]
    fn test_init_and_discover() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!Config::discover(dir.path()).unwrap().condense.enabled);

        let path = Config::init(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
        assert!(matches!(
            Config::init(dir.path()),
            Err(CondenseError::ConfigExists(_))
        ));

        fs::write(&path, "[condense]\nenabled = true\n").unwrap();
        assert!(Config::discover(dir.path()).unwrap().condense.enabled);
    }
}
