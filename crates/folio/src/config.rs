//! Configuration for a [`Folio`](crate::Folio) instance.
//!
//! A configuration is a small TOML file (`config.toml`) kept in the configuration directory,
//! by default `<config dir>/folio`. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! database_path = "/home/me/.local/share/folio/folio.db"
//! storage_path = "/home/me/Documents/folio/papers"
//! resolution_window = 8
//! role_fallback = "teacher"
//!
//! [scholar]
//! base_url = "https://serpapi.com/search.json"
//! api_key_env = "SERPAPI_API_KEY"
//! timeout_secs = 30
//! max_results = 100
//! ```

use super::*;
use crate::role::Role;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Location of the SQLite database file
  pub database_path:     PathBuf,
  /// Root directory of the PDF object store
  pub storage_path:      PathBuf,
  /// Base URL under which stored objects are published; a `file://` URL of the storage root
  /// when absent
  pub public_base_url:   Option<Url>,
  /// Maximum number of co-author lookups in flight while enriching a paper list
  pub resolution_window: usize,
  /// Role assigned when a caller has no role row, or the lookup fails
  pub role_fallback:     Role,
  /// Citation-data provider settings
  pub scholar:           ScholarConfig,
}

/// Settings for the Google Scholar author lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScholarConfig {
  /// Search endpoint of the provider
  pub base_url:     String,
  /// Name of the environment variable holding the API key
  pub api_key_env:  String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
  /// Upper bound on publications requested per author
  pub max_results:  u32,
}

impl Default for ScholarConfig {
  fn default() -> Self {
    Self {
      base_url:     "https://serpapi.com/search.json".to_string(),
      api_key_env:  "SERPAPI_API_KEY".to_string(),
      timeout_secs: 30,
      max_results:  100,
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path:     Self::default_database_path(),
      storage_path:      Self::default_storage_path(),
      public_base_url:   None,
      resolution_window: 8,
      role_fallback:     Role::Teacher,
      scholar:           ScholarConfig::default(),
    }
  }
}

impl Config {
  /// Returns the default configuration directory.
  ///
  /// - On Unix: `~/.config/folio`
  /// - On macOS: `~/Library/Application Support/folio`
  /// - On Windows: `%APPDATA%\folio`
  pub fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
      .map(|dir| dir.join("folio"))
      .ok_or_else(|| FolioError::Config("Could not determine a configuration directory".into()))
  }

  /// Returns the default path for the database file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.local/share/folio/folio.db`
  /// - On macOS: `~/Library/Application Support/folio/folio.db`
  /// - On Windows: `%APPDATA%\folio\folio.db`
  /// - Fallback: `./folio/folio.db` in the current directory
  pub fn default_database_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("folio").join("folio.db")
  }

  /// Returns the default root of the PDF object store (`<documents>/folio/papers`).
  pub fn default_storage_path() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from(".")).join("folio").join("papers")
  }

  /// Reads `config.toml` from `config_dir`.
  pub fn load(config_dir: impl AsRef<Path>) -> Result<Self> {
    let path = config_dir.as_ref().join(CONFIG_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| {
      FolioError::Config(format!("Could not read configuration at {}: {e}", path.display()))
    })?;
    let config: Config = toml::from_str(&content)?;
    if config.resolution_window == 0 {
      return Err(FolioError::Config("`resolution_window` must be at least 1".into()));
    }
    Ok(config)
  }

  /// Writes this configuration to `config.toml` in `config_dir`, creating the directory.
  pub fn save(&self, config_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = config_dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(CONFIG_FILE);
    std::fs::write(&path, toml::to_string_pretty(self)?)?;
    debug!("Saved configuration to {path:?}");
    Ok(path)
  }

  /// Sets the database path.
  pub fn with_database_path(mut self, path: &Path) -> Self {
    self.database_path = path.to_path_buf();
    self
  }

  /// Sets the storage path.
  pub fn with_storage_path(mut self, path: &Path) -> Self {
    self.storage_path = path.to_path_buf();
    self
  }

  /// Publishes stored PDFs under `url` instead of `file://` URLs.
  pub fn with_public_base_url(mut self, url: Url) -> Self {
    self.public_base_url = Some(url);
    self
  }

  /// Sets the role fallback.
  pub fn with_role_fallback(mut self, role: Role) -> Self {
    self.role_fallback = role;
    self
  }

  /// Sets the co-author resolution window; values below one become one.
  pub fn with_resolution_window(mut self, window: usize) -> Self {
    self.resolution_window = window.max(1);
    self
  }

  /// Points the Scholar client at another endpoint, e.g. a test server.
  pub fn with_scholar_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.scholar.base_url = base_url.into();
    self
  }

  /// Names the environment variable the Scholar API key is read from.
  pub fn with_scholar_api_key_env(mut self, name: impl Into<String>) -> Self {
    self.scholar.api_key_env = name.into();
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[traced_test]
  #[test]
  fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let config = Config::default()
      .with_database_path(&dir.path().join("folio.db"))
      .with_role_fallback(Role::None)
      .with_resolution_window(3);
    config.save(dir.path()).unwrap();

    let loaded = Config::load(dir.path()).unwrap();
    assert_eq!(loaded, config);
  }

  #[test]
  fn test_empty_file_uses_defaults() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
    let loaded = Config::load(dir.path()).unwrap();
    assert_eq!(loaded.role_fallback, Role::Teacher);
    assert_eq!(loaded.scholar.max_results, 100);
    assert_eq!(loaded.scholar.api_key_env, "SERPAPI_API_KEY");
  }

  #[test]
  fn test_missing_file_is_config_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(Config::load(dir.path()), Err(FolioError::Config(_))));
  }

  #[test]
  fn test_default_database_path() {
    let path = Config::default_database_path();
    assert!(path.ends_with("folio/folio.db") || path.ends_with("folio\\folio.db"));
  }
}
