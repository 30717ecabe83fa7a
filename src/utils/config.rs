use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "changelog-gate.toml";

/// configuration for the changelog gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// branch used as the default range base, and whose pushes are diffed
    /// against the pre-push commit (default: "main")
    pub main_branch: String,

    /// executable used for the diff query (default: "git")
    pub git_program: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            main_branch: "main".to_string(),
            git_program: "git".to_string(),
        }
    }
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_branch(mut self, name: impl Into<String>) -> Self {
        self.main_branch = name.into();
        self
    }

    pub fn git_program(mut self, program: impl Into<String>) -> Self {
        self.git_program = program.into();
        self
    }

    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: GateConfig = toml::from_str(&contents).map_err(|e| Error::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// load `changelog-gate.toml` from the repository root
    ///
    /// a missing file yields the defaults, a broken one is an error
    pub fn load_or_default<P: AsRef<Path>>(repo_path: P) -> Result<Self> {
        match Self::find_config_file(&repo_path) {
            Some(config_path) => {
                log::debug!("loading configuration from {}", config_path.display());
                Self::load_from_file(&config_path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn find_config_file<P: AsRef<Path>>(repo_path: P) -> Option<PathBuf> {
        let config_path = repo_path.as_ref().join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        assert_eq!(config.main_branch, "main");
        assert_eq!(config.git_program, "git");
    }

    #[test]
    fn test_builder() {
        let config = GateConfig::new().main_branch("trunk").git_program("/usr/bin/git");
        assert_eq!(config.main_branch, "trunk");
        assert_eq!(config.git_program, "/usr/bin/git");
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = GateConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "main_branch = \"develop\"\n",
        )
        .unwrap();

        let config = GateConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config.main_branch, "develop");
        assert_eq!(config.git_program, "git");
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "main_branch = [").unwrap();

        let result = GateConfig::load_or_default(temp_dir.path());
        assert!(matches!(result, Err(Error::TomlParseError { .. })));
    }

    #[test]
    fn test_load_missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = GateConfig::load_from_file(temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::FileReadError { .. })));
    }
}
