use std::{
  io::Write,
  path::{Path, PathBuf},
  sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::debug;

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

/// One pretty-printed JSON file per table. Readers and writers of a table are
/// serialized through its lock; when both tables are needed the tags lock is
/// taken first.
pub struct JsonStorage {
  tags: RwLock<JsonStorageItem<TagRecord>>,
  entities: RwLock<JsonStorageItem<Entity>>,
}

impl JsonStorage {
  pub fn new(database_folder: &str) -> Result<Self, StorageError> {
    let database_path = Path::new(database_folder);
    std::fs::create_dir_all(database_path)?;

    Ok(Self {
      tags: RwLock::new(JsonStorageItem::new(database_path.join("tags.json"))?),
      entities: RwLock::new(JsonStorageItem::new(database_path.join("entities.json"))?),
    })
  }

  pub fn tags_filepath(&self) -> Result<PathBuf, StorageError> {
    Ok(self.read_tags()?.storage_path().to_path_buf())
  }

  pub fn entities_filepath(&self) -> Result<PathBuf, StorageError> {
    Ok(self.read_entities()?.storage_path().to_path_buf())
  }

  fn read_tags(&self) -> Result<RwLockReadGuard<'_, JsonStorageItem<TagRecord>>, StorageError> {
    self.tags.read().map_err(|_| StorageError::Poisoned("tags"))
  }

  fn write_tags(&self) -> Result<RwLockWriteGuard<'_, JsonStorageItem<TagRecord>>, StorageError> {
    self.tags.write().map_err(|_| StorageError::Poisoned("tags"))
  }

  fn read_entities(&self) -> Result<RwLockReadGuard<'_, JsonStorageItem<Entity>>, StorageError> {
    self.entities.read().map_err(|_| StorageError::Poisoned("entities"))
  }

  fn write_entities(&self) -> Result<RwLockWriteGuard<'_, JsonStorageItem<Entity>>, StorageError> {
    self
      .entities
      .write()
      .map_err(|_| StorageError::Poisoned("entities"))
  }
}

impl TagStore for JsonStorage {
  fn insert(&self, record: TagRecord) -> Result<(), StorageError> {
    self.write_tags()?.add(record)
  }

  fn delete_all(&self, entity: EntityRef) -> Result<usize, StorageError> {
    let mut tags = self.write_tags()?;
    let (next, removed) = query::without_entity(tags.all(), entity);
    if removed > 0 {
      tags.replace_all(next)?;
    }
    Ok(removed)
  }

  fn replace_all(&self, entity: EntityRef, records: Vec<TagRecord>) -> Result<(), StorageError> {
    query::check_owner(entity, &records)?;
    let count = records.len();

    let mut tags = self.write_tags()?;
    let next = query::replaced(tags.all(), entity, records);
    tags.replace_all(next)?;

    debug!("replaced tags of {} with {} records", entity, count);
    Ok(())
  }

  fn find_by_entity(&self, entity: EntityRef) -> Result<Vec<TagRecord>, StorageError> {
    Ok(query::by_entity(self.read_tags()?.all(), entity))
  }

  fn find_by_name(
    &self,
    kind: EntityKind,
    name: &str,
    ordering: &NameOrdering,
  ) -> Result<Vec<TagRecord>, StorageError> {
    let tags = self.read_tags()?;
    let entities = self.read_entities()?;
    Ok(query::by_name(
      tags.all(),
      entities.all(),
      kind,
      name,
      ordering,
    ))
  }

  fn select(&self, scope: &TagScope) -> Result<Vec<TagRecord>, StorageError> {
    Ok(query::select(self.read_tags()?.all(), scope))
  }

  fn distinct(&self, scope: &TagScope, fields: &[TagField]) -> Result<Vec<TagTuple>, StorageError> {
    Ok(query::distinct(self.read_tags()?.all(), scope, fields))
  }

  fn upsert_entity(&self, entity: Entity) -> Result<(), StorageError> {
    let mut entities = self.write_entities()?;
    let next = query::upserted(entities.all(), entity);
    entities.replace_all(next)
  }

  fn entity(&self, entity: EntityRef) -> Result<Option<Entity>, StorageError> {
    Ok(
      self
        .read_entities()?
        .all()
        .iter()
        .find(|e| e.entity_ref() == entity)
        .cloned(),
    )
  }

  fn entities(&self, kind: EntityKind) -> Result<Vec<Entity>, StorageError> {
    Ok(query::entities_of(self.read_entities()?.all(), kind))
  }
}

struct JsonStorageItem<T> {
  filepath: PathBuf,
  buffer: Vec<T>,
}

impl<T> JsonStorageItem<T>
where
  T: Clone + serde::de::DeserializeOwned + serde::ser::Serialize,
{
  fn new(filepath: PathBuf) -> Result<Self, StorageError> {
    let mut storage_item = Self {
      filepath,
      buffer: Vec::new(),
    };

    storage_item.restore()?;

    debug!(
      "restored {} items from: {}",
      storage_item.buffer.len(),
      storage_item.filepath.display()
    );

    Ok(storage_item)
  }

  fn storage_path(&self) -> &Path {
    self.filepath.as_path()
  }

  fn restore(&mut self) -> Result<(), StorageError> {
    let file = match std::fs::File::open(&self.filepath) {
      Ok(file) => file,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        self.buffer = Vec::new();
        return Ok(());
      }
      Err(err) => return Err(err.into()),
    };

    if file.metadata()?.len() == 0 {
      self.buffer = Vec::new();
      return Ok(());
    }
    self.buffer = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(())
  }

  fn add(&mut self, item: T) -> Result<(), StorageError> {
    let mut next = self.buffer.clone();
    next.push(item);
    self.replace_all(next)
  }

  /// The buffer only changes once the new contents are durably on disk.
  fn replace_all(&mut self, items: Vec<T>) -> Result<(), StorageError> {
    self.flush(&items)?;
    self.buffer = items;
    Ok(())
  }

  fn all(&self) -> &[T] {
    &self.buffer
  }

  fn flush(&self, items: &[T]) -> Result<(), StorageError> {
    let folder = match self.filepath.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(folder)?;
    serde_json::to_writer_pretty(&mut file, items)?;
    file.flush()?;
    file.as_file().sync_all()?;
    file.persist(&self.filepath)?;
    Ok(())
  }
}
