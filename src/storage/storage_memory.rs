use std::sync::RwLock;

use crate::{
  entity::{Entity, EntityKind, EntityRef, NameOrdering},
  error::StorageError,
  record::TagRecord,
};

use super::{
  query,
  scope::{TagField, TagScope, TagTuple},
  storage::TagStore,
};

/// Non-persistent store, same locking rules as `JsonStorage`.
#[derive(Default)]
pub struct MemoryStorage {
  tags: RwLock<Vec<TagRecord>>,
  entities: RwLock<Vec<Entity>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

fn poisoned<T>(table: &'static str) -> impl FnOnce(T) -> StorageError {
  move |_| StorageError::Poisoned(table)
}

impl TagStore for MemoryStorage {
  fn insert(&self, record: TagRecord) -> Result<(), StorageError> {
    self.tags.write().map_err(poisoned("tags"))?.push(record);
    Ok(())
  }

  fn delete_all(&self, entity: EntityRef) -> Result<usize, StorageError> {
    let mut tags = self.tags.write().map_err(poisoned("tags"))?;
    let (next, removed) = query::without_entity(&tags, entity);
    *tags = next;
    Ok(removed)
  }

  fn replace_all(&self, entity: EntityRef, records: Vec<TagRecord>) -> Result<(), StorageError> {
    query::check_owner(entity, &records)?;
    let mut tags = self.tags.write().map_err(poisoned("tags"))?;
    *tags = query::replaced(&tags, entity, records);
    Ok(())
  }

  fn find_by_entity(&self, entity: EntityRef) -> Result<Vec<TagRecord>, StorageError> {
    let tags = self.tags.read().map_err(poisoned("tags"))?;
    Ok(query::by_entity(&tags, entity))
  }

  fn find_by_name(
    &self,
    kind: EntityKind,
    name: &str,
    ordering: &NameOrdering,
  ) -> Result<Vec<TagRecord>, StorageError> {
    let tags = self.tags.read().map_err(poisoned("tags"))?;
    let entities = self.entities.read().map_err(poisoned("entities"))?;
    Ok(query::by_name(&tags, &entities, kind, name, ordering))
  }

  fn select(&self, scope: &TagScope) -> Result<Vec<TagRecord>, StorageError> {
    let tags = self.tags.read().map_err(poisoned("tags"))?;
    Ok(query::select(&tags, scope))
  }

  fn distinct(&self, scope: &TagScope, fields: &[TagField]) -> Result<Vec<TagTuple>, StorageError> {
    let tags = self.tags.read().map_err(poisoned("tags"))?;
    Ok(query::distinct(&tags, scope, fields))
  }

  fn upsert_entity(&self, entity: Entity) -> Result<(), StorageError> {
    let mut entities = self.entities.write().map_err(poisoned("entities"))?;
    *entities = query::upserted(&entities, entity);
    Ok(())
  }

  fn entity(&self, entity: EntityRef) -> Result<Option<Entity>, StorageError> {
    let entities = self.entities.read().map_err(poisoned("entities"))?;
    Ok(entities.iter().find(|e| e.entity_ref() == entity).cloned())
  }

  fn entities(&self, kind: EntityKind) -> Result<Vec<Entity>, StorageError> {
    let entities = self.entities.read().map_err(poisoned("entities"))?;
    Ok(query::entities_of(&entities, kind))
  }
}
