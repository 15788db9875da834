use crate::{entity::EntityRef, error::TagError, tag::Tag, traits::Indexable};

/// One persisted tag of one entity.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TagRecord {
  id: uuid::Uuid,
  entity: EntityRef,
  name: String,
  value: Option<String>,
  created_at: chrono::DateTime<chrono::Local>,
}

impl Indexable for TagRecord {
  fn id(&self) -> uuid::Uuid {
    self.id
  }
}

impl TagRecord {
  pub fn new(entity: EntityRef, tag: &Tag) -> Result<Self, TagError> {
    tag.validate()?;
    Ok(Self {
      id: uuid::Uuid::new_v4(),
      entity,
      name: tag.name().to_owned(),
      value: tag.value().map(|v| v.to_owned()),
      created_at: chrono::Local::now(),
    })
  }

  pub fn from_string(entity: EntityRef, tag: &str) -> Result<Self, TagError> {
    Self::new(entity, &Tag::parse(tag))
  }

  pub fn entity(&self) -> EntityRef {
    self.entity
  }

  pub fn name(&self) -> &str {
    self.name.as_str()
  }

  pub fn value(&self) -> Option<&str> {
    self.value.as_deref()
  }

  pub fn created_at(&self) -> chrono::DateTime<chrono::Local> {
    self.created_at
  }

  pub fn tag(&self) -> Tag {
    Tag::new(self.name(), self.value())
  }

  pub fn name_and_value(&self) -> String {
    self.tag().name_and_value()
  }
}
