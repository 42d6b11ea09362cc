use std::path::{Path, PathBuf};
use std::time::Duration;

use blockpress_engine::InsertFallback;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

const DEFAULT_DEBOUNCE_MS: u64 = 500;

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory that relative fragment names are resolved against
    pub posts_path: PathBuf,
    /// Idle window before an edited document is serialized again
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub insert_fallback: InsertFallback,
}

impl Config {
    pub fn new(posts_path: impl Into<PathBuf>) -> Self {
        Self {
            posts_path: posts_path.into(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            insert_fallback: InsertFallback::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.posts_path = Self::expand_path(&config.posts_path).unwrap_or(config.posts_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/blockpress");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Resolve a fragment name against `posts_path`; absolute paths pass through.
    pub fn resolve_fragment(&self, name: impl AsRef<Path>) -> PathBuf {
        self.posts_path.join(name)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_under_home() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/blockpress/config.toml"));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let config: Config = toml::from_str(r#"posts_path = "/srv/posts""#).unwrap();

        assert_eq!(config.posts_path, PathBuf::from("/srv/posts"));
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.insert_fallback, InsertFallback::Append);
    }

    #[rstest]
    #[case("append", InsertFallback::Append)]
    #[case("ignore", InsertFallback::Ignore)]
    fn insert_fallback_is_lowercase(#[case] value: &str, #[case] expected: InsertFallback) {
        let content = format!("posts_path = \"/p\"\ninsert_fallback = \"{value}\"\n");
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(config.insert_fallback, expected);
    }

    #[test]
    fn unknown_insert_fallback_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "posts_path = \"/p\"\ninsert_fallback = \"prepend\"\n",
        )
        .unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { config_path, .. } if config_path == config_file));
    }

    #[test]
    fn expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/blog/posts")).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("blog/posts"));
    }

    #[test]
    fn expand_path_with_env_var() {
        unsafe {
            env::set_var("BLOCKPRESS_TEST_ROOT", "/srv/site");
        }

        let expanded = Config::expand_path(Path::new("$BLOCKPRESS_TEST_ROOT/posts")).unwrap();
        assert_eq!(expanded, PathBuf::from("/srv/site/posts"));

        unsafe {
            env::remove_var("BLOCKPRESS_TEST_ROOT");
        }
    }

    #[rstest]
    #[case("/absolute/path")]
    #[case("relative/path")]
    fn expand_path_leaves_plain_paths(#[case] path: &str) {
        assert_eq!(Config::expand_path(Path::new(path)).unwrap(), PathBuf::from(path));
    }

    #[test]
    fn load_returns_none_when_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let config = Config {
            posts_path: PathBuf::from("/tmp/posts"),
            debounce_ms: 250,
            insert_fallback: InsertFallback::Ignore,
        };

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn tilde_in_toml_is_expanded_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "posts_path = \"~/posts\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert!(!config.posts_path.to_string_lossy().starts_with('~'));
        assert!(config.posts_path.ends_with("posts"));
    }

    #[test]
    fn resolve_fragment_joins_relative_names() {
        let config = Config::new("/srv/posts");
        assert_eq!(
            config.resolve_fragment("hello.html"),
            PathBuf::from("/srv/posts/hello.html")
        );
        assert_eq!(
            config.resolve_fragment("/tmp/draft.html"),
            PathBuf::from("/tmp/draft.html")
        );
    }
}
