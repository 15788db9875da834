use log::{debug, warn};

use crate::{
  entity::{Entity, EntityRef, EntityRegistry, EntityType},
  error::TagError,
  lookup,
  notify::{CommandNotifier, EmptyNotifier, Notifier, NotifierConfig},
  search::apply_filter,
  storage::{JsonStorage, TagField, TagScope, TagStore},
  tag::Tag,
  tag_set::TagSet,
  Config,
};

/// A tag together with every entity of one type that carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDetail {
  pub tag: Tag,
  pub taggings: Vec<Entity>,
}

pub struct Tagger {
  storage: Box<dyn TagStore>,
  notifier: Box<dyn Notifier>,
  registry: EntityRegistry,
  config: Config,
}

impl Tagger {
  pub fn new(config: Config) -> Result<Self, TagError> {
    debug!("tagstring data folder: {}", config.storage_dir_path);

    let notifier: Box<dyn Notifier> = match config.notifier.clone() {
      NotifierConfig::Empty => Box::new(EmptyNotifier::new()),
      NotifierConfig::Command { program, args } => Box::new(CommandNotifier::new(program, args)),
    };
    let storage = JsonStorage::new(&config.storage_dir_path)?;

    Ok(Self::with_parts(config, Box::new(storage), notifier))
  }

  pub fn with_parts(
    config: Config,
    storage: Box<dyn TagStore>,
    notifier: Box<dyn Notifier>,
  ) -> Self {
    Self {
      storage,
      notifier,
      registry: config.registry(),
      config,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn entity_type(&self, entity_type: &str) -> Result<EntityType, TagError> {
    self.registry.resolve(entity_type)
  }

  pub fn entity_ref(&self, entity_type: &str, id: u64) -> Result<EntityRef, TagError> {
    Ok(self.entity_type(entity_type)?.entity(id))
  }

  fn tag_set(&self, entity: EntityRef) -> TagSet<'_> {
    TagSet::new(self.storage.as_ref(), entity)
  }

  pub fn set_tag_string(
    &mut self,
    entity_type: &str,
    id: u64,
    tag_string: Option<&str>,
  ) -> Result<String, TagError> {
    let entity = self.entity_ref(entity_type, id)?;
    self
      .tag_set(entity)
      .set_tag_string(tag_string.unwrap_or_default())?;
    self.notify(&entity);
    self.tag_set(entity).tag_string()
  }

  pub fn tag_string(&self, entity_type: &str, id: u64) -> Result<String, TagError> {
    self.tag_set(self.entity_ref(entity_type, id)?).tag_string()
  }

  pub fn tag_array(&self, entity_type: &str, id: u64) -> Result<Vec<Tag>, TagError> {
    self.tag_set(self.entity_ref(entity_type, id)?).tag_array()
  }

  pub fn searchable_tokens(&self, entity_type: &str, id: u64) -> Result<Vec<String>, TagError> {
    self
      .tag_set(self.entity_ref(entity_type, id)?)
      .searchable_tokens()
  }

  pub fn has_tag(&self, entity_type: &str, id: u64, name: &str) -> Result<bool, TagError> {
    self.tag_set(self.entity_ref(entity_type, id)?).has_tag(name)
  }

  pub fn tag_values(&self, entity_type: &str, id: u64, name: &str) -> Result<Vec<String>, TagError> {
    self.tag_set(self.entity_ref(entity_type, id)?).tag_values(name)
  }

  pub fn add_tag_if_absent(
    &mut self,
    entity_type: &str,
    id: u64,
    tag: &str,
  ) -> Result<String, TagError> {
    let entity = self.entity_ref(entity_type, id)?;
    let before = self.tag_set(entity).tag_string()?;
    let after = self.tag_set(entity).add_tag_if_absent(tag)?;
    if before != after {
      self.notify(&entity);
    }
    Ok(after)
  }

  pub fn remove_tag(&mut self, entity_type: &str, id: u64, tag: &str) -> Result<String, TagError> {
    let entity = self.entity_ref(entity_type, id)?;
    let before = self.tag_set(entity).tag_string()?;
    let after = self.tag_set(entity).remove_tag(tag)?;
    if before != after {
      self.notify(&entity);
    }
    Ok(after)
  }

  /// Every distinct tag used on `entity_type`, ordered by name then value.
  pub fn list_tags(&self, entity_type: &str, query: Option<&str>) -> Result<Vec<Tag>, TagError> {
    let entity_type = self.entity_type(entity_type)?;
    let scope = apply_filter(TagScope::new(entity_type.kind()), query);
    let tuples = self
      .storage
      .distinct(&scope, &[TagField::Name, TagField::Value])?;

    Ok(
      tuples
        .into_iter()
        .map(|tuple| {
          let mut fields = tuple.into_iter();
          let name = fields.next().flatten().unwrap_or_default();
          let value = fields.next().flatten();
          Tag::new(&name, value.as_deref())
        })
        .collect(),
    )
  }

  pub fn show_tag(
    &self,
    entity_type: &str,
    tag: &str,
    query: Option<&str>,
  ) -> Result<TagDetail, TagError> {
    let entity_type = self.entity_type(entity_type)?;
    Ok(TagDetail {
      tag: Tag::parse(tag),
      taggings: lookup::tagged_with(self.storage.as_ref(), &entity_type, tag, query)?,
    })
  }

  pub fn find_entities_by_tag(&self, entity_type: &str, tag: &str) -> Result<Vec<Entity>, TagError> {
    let entity_type = self.entity_type(entity_type)?;
    lookup::find_entities_by_tag(
      self.storage.as_ref(),
      &entity_type,
      &self.config.locale,
      tag,
    )
  }

  pub fn add_entity(
    &mut self,
    entity_type: &str,
    id: u64,
    name: &str,
    translations: &[(String, String)],
  ) -> Result<Entity, TagError> {
    let entity_ref = self.entity_ref(entity_type, id)?;
    let entity = translations
      .iter()
      .fold(Entity::new(entity_ref, name), |entity, (locale, name)| {
        entity.with_translation(locale, name)
      });

    self.storage.upsert_entity(entity.clone())?;
    self.notify(&entity_ref);
    Ok(entity)
  }

  pub fn entities(&self, entity_type: &str) -> Result<Vec<Entity>, TagError> {
    let entity_type = self.entity_type(entity_type)?;
    Ok(self.storage.entities(entity_type.kind())?)
  }

  fn notify(&mut self, entity: &EntityRef) {
    match self.notifier.notify(entity) {
      Ok(msg) => debug!("notified: {}", msg),
      Err(err) => warn!("notify err: {} entity: {}", err, entity),
    };
  }
}
