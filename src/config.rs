use std::path::Path;

use crate::{
  entity::{EntityRegistry, EntityType},
  error::ConfigError,
  notify::NotifierConfig,
};

const TAGSTRING_DEFAULT_STORAGE_DIR: &str = ".tagstring";
const TAGSTRING_DEFAULT_CONFIG_NAME: &str = ".tagstring.json";

fn default_locale() -> String {
  "en".to_owned()
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
  pub storage_dir_path: String,
  /// Locale whose translated names order lookups of localized types.
  #[serde(default = "default_locale")]
  pub locale: String,
  #[serde(default)]
  pub notifier: NotifierConfig,
  #[serde(default = "EntityType::defaults")]
  pub taggable: Vec<EntityType>,
}

impl Config {
  /// Reads `$TAGSTRING_CONFIG`, or `~/.tagstring.json`, writing a default
  /// config there first if it doesn't exist yet.
  pub fn new() -> Result<Self, ConfigError> {
    let home_env = std::env::var("HOME").map_err(|_| ConfigError::HomeNotSet)?;
    let home = Path::new(home_env.as_str());

    let config_file_path = match std::env::var("TAGSTRING_CONFIG") {
      Ok(file_path) => Path::new(&file_path).to_path_buf(),
      Err(_) => home.join(TAGSTRING_DEFAULT_CONFIG_NAME),
    };

    return Self::load_or_create(&config_file_path, home);
  }

  pub fn load_or_create(config_file_path: &Path, home: &Path) -> Result<Self, ConfigError> {
    if !config_file_path.exists() {
      let config = Self::with_storage_dir(
        home
          .join(TAGSTRING_DEFAULT_STORAGE_DIR)
          .to_string_lossy()
          .as_ref(),
      );

      let file = std::fs::File::create(config_file_path)?;
      serde_json::to_writer_pretty(file, &config)?;
      return Ok(config);
    }

    let file = std::fs::File::open(config_file_path)?;
    return Ok(serde_json::from_reader(std::io::BufReader::new(file))?);
  }

  pub fn with_storage_dir(storage_dir_path: &str) -> Self {
    Self {
      storage_dir_path: storage_dir_path.to_owned(),
      locale: default_locale(),
      notifier: NotifierConfig::default(),
      taggable: EntityType::defaults(),
    }
  }

  pub fn registry(&self) -> EntityRegistry {
    EntityRegistry::from_types(&self.taggable)
  }
}

#[cfg(test)]
mod tests {
  use super::Config;
  use crate::{
    entity::{EntityKind, EntityType},
    notify::NotifierConfig,
  };

  #[test]
  fn writes_default_config_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    let config = Config::load_or_create(&config_path, dir.path()).unwrap();
    assert!(config_path.exists());
    assert_eq!(config.locale, "en");
    assert_eq!(config.notifier, NotifierConfig::Empty);
    assert!(config.storage_dir_path.ends_with(".tagstring"));

    let reloaded = Config::load_or_create(&config_path, dir.path()).unwrap();
    assert_eq!(reloaded, config);
  }

  #[test]
  fn optional_fields_take_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
      &config_path,
      r#"{"storage_dir_path": "/var/lib/tags", "notifier": {"Command": {"program": "reindex"}}}"#,
    )
    .unwrap();

    let config = Config::load_or_create(&config_path, dir.path()).unwrap();
    assert_eq!(config.storage_dir_path, "/var/lib/tags");
    assert_eq!(config.taggable, EntityType::defaults());
    assert_eq!(
      config.notifier,
      NotifierConfig::Command {
        program: "reindex".to_owned(),
        args: Vec::new()
      }
    );
  }

  #[test]
  fn registry_follows_taggable_list() {
    let mut config = Config::with_storage_dir("/tmp/tags");
    config.taggable = vec![EntityType::new(EntityKind::InfoRequest, false)];

    let registry = config.registry();
    assert!(registry.resolve("InfoRequest").is_ok());
    assert!(registry.resolve("PublicBody").is_err());
  }
}
