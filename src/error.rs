use thiserror::Error;

use crate::entity::EntityRef;

#[derive(Error, Debug)]
pub enum TagError {
  #[error("invalid tag '{0}': name can't be empty")]
  Validation(String),

  #[error("tag '{0}' not found")]
  TagNotFound(String),

  #[error("unknown entity type: {0}")]
  UnknownEntityType(String),

  #[error("{0} not found")]
  EntityNotFound(EntityRef),

  #[error("storage error: {0}")]
  Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("can't persist table: {0}")]
  Persist(#[from] tempfile::PersistError),

  #[error("{0} table lock poisoned")]
  Poisoned(&'static str),

  #[error("record owned by {found} can't replace tags of {expected}")]
  OwnerMismatch { expected: EntityRef, found: EntityRef },
}

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("HOME is not set")]
  HomeNotSet,

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}
