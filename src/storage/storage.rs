use crate::{
  entity::{Entity, EntityKind, EntityRef, NameOrdering},
  error::StorageError,
  record::TagRecord,
};

use super::scope::{TagField, TagScope, TagTuple};

/// Rows of `(entity_type, entity_id, name, value)` shared by every entity
/// kind, plus the entity rows lookups join against.
pub trait TagStore: Send + Sync {
  fn insert(&self, record: TagRecord) -> Result<(), StorageError>;
  fn delete_all(&self, entity: EntityRef) -> Result<usize, StorageError>;
  /// Swaps every record owned by `entity` for `records` in one step: readers
  /// see either the old set or the new one. All `records` must belong to
  /// `entity`.
  fn replace_all(&self, entity: EntityRef, records: Vec<TagRecord>) -> Result<(), StorageError>;

  fn find_by_entity(&self, entity: EntityRef) -> Result<Vec<TagRecord>, StorageError>;
  fn find_by_name(
    &self,
    kind: EntityKind,
    name: &str,
    ordering: &NameOrdering,
  ) -> Result<Vec<TagRecord>, StorageError>;
  fn select(&self, scope: &TagScope) -> Result<Vec<TagRecord>, StorageError>;
  fn distinct(&self, scope: &TagScope, fields: &[TagField]) -> Result<Vec<TagTuple>, StorageError>;

  fn upsert_entity(&self, entity: Entity) -> Result<(), StorageError>;
  fn entity(&self, entity: EntityRef) -> Result<Option<Entity>, StorageError>;
  fn entities(&self, kind: EntityKind) -> Result<Vec<Entity>, StorageError>;
}
