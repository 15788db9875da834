use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::error::TagError;

/// Every kind of record that can carry tags.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum EntityKind {
  PublicBody,
  InfoRequest,
  User,
}

impl EntityKind {
  pub const ALL: [EntityKind; 3] = [
    EntityKind::PublicBody,
    EntityKind::InfoRequest,
    EntityKind::User,
  ];

  pub fn discriminator(&self) -> &'static str {
    match self {
      EntityKind::PublicBody => "PublicBody",
      EntityKind::InfoRequest => "InfoRequest",
      EntityKind::User => "User",
    }
  }
}

impl Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.discriminator())
  }
}

impl FromStr for EntityKind {
  type Err = TagError;

  fn from_str(discriminator: &str) -> Result<Self, Self::Err> {
    EntityKind::ALL
      .iter()
      .find(|kind| kind.discriminator() == discriminator)
      .copied()
      .ok_or_else(|| TagError::UnknownEntityType(discriminator.to_owned()))
  }
}

/// Identifies exactly one tagged entity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct EntityRef {
  #[serde(rename = "entity_type")]
  kind: EntityKind,
  #[serde(rename = "entity_id")]
  id: u64,
}

impl EntityRef {
  pub fn new(kind: EntityKind, id: u64) -> Self {
    Self { kind, id }
  }

  pub fn kind(&self) -> EntityKind {
    self.kind
  }

  pub fn id(&self) -> u64 {
    self.id
  }
}

impl Display for EntityRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}#{}", self.kind, self.id)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameOrdering {
  Name,
  Translated(String),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
  entity: EntityRef,
  name: String,
  #[serde(default)]
  translations: BTreeMap<String, String>,
}

impl Entity {
  pub fn new(entity: EntityRef, name: &str) -> Self {
    Self {
      entity,
      name: name.to_owned(),
      translations: BTreeMap::new(),
    }
  }

  pub fn with_translation(mut self, locale: &str, name: &str) -> Self {
    self.translations.insert(locale.to_owned(), name.to_owned());
    self
  }

  pub fn entity_ref(&self) -> EntityRef {
    self.entity
  }

  pub fn name(&self) -> &str {
    self.name.as_str()
  }

  pub fn translation(&self, locale: &str) -> Option<&str> {
    self.translations.get(locale).map(|name| name.as_str())
  }

  pub fn translations(&self) -> &BTreeMap<String, String> {
    &self.translations
  }

  /// Name used for ordering listings; untranslated entities fall back to
  /// their own name.
  pub fn display_name(&self, ordering: &NameOrdering) -> &str {
    match ordering {
      NameOrdering::Name => self.name(),
      NameOrdering::Translated(locale) => self.translation(locale).unwrap_or(self.name()),
    }
  }
}

/// A registered taggable kind together with its ordering capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityType {
  kind: EntityKind,
  #[serde(default)]
  localized_ordering: bool,
}

impl EntityType {
  pub fn new(kind: EntityKind, localized_ordering: bool) -> Self {
    Self {
      kind,
      localized_ordering,
    }
  }

  pub fn defaults() -> Vec<EntityType> {
    vec![
      EntityType::new(EntityKind::PublicBody, true),
      EntityType::new(EntityKind::InfoRequest, false),
      EntityType::new(EntityKind::User, false),
    ]
  }

  pub fn kind(&self) -> EntityKind {
    self.kind
  }

  pub fn supports_localized_ordering(&self) -> bool {
    self.localized_ordering
  }

  pub fn name_ordering(&self, locale: &str) -> NameOrdering {
    match self.localized_ordering {
      true => NameOrdering::Translated(locale.to_owned()),
      false => NameOrdering::Name,
    }
  }

  pub fn entity(&self, id: u64) -> EntityRef {
    EntityRef::new(self.kind, id)
  }
}

#[derive(Debug, Clone)]
pub struct EntityRegistry {
  types: BTreeMap<String, EntityType>,
}

impl EntityRegistry {
  pub fn new() -> Self {
    Self {
      types: BTreeMap::new(),
    }
  }

  pub fn from_types(types: &[EntityType]) -> Self {
    let mut registry = Self::new();
    for entity_type in types {
      registry.register(*entity_type);
    }
    registry
  }

  pub fn register(&mut self, entity_type: EntityType) {
    self
      .types
      .insert(entity_type.kind().discriminator().to_owned(), entity_type);
  }

  pub fn resolve(&self, discriminator: &str) -> Result<EntityType, TagError> {
    self
      .types
      .get(discriminator)
      .copied()
      .ok_or_else(|| TagError::UnknownEntityType(discriminator.to_owned()))
  }

  pub fn types(&self) -> impl Iterator<Item = &EntityType> {
    self.types.values()
  }
}

impl Default for EntityRegistry {
  fn default() -> Self {
    Self::from_types(&EntityType::defaults())
  }
}
