use std::{cell::RefCell, rc::Rc};

use colored::{Color, ColoredString, Colorize};

use crate::{entity::Entity, error::TagError, tag::Tag, Tagger};

struct ViewColors {}
impl ViewColors {
  const TAG_NAME: Color = Color::Cyan;
  const TAG_VALUE: Color = Color::Yellow;
  const ENTITY_ID: Color = Color::BrightBlack;
  const ENTITY_NAME: Color = Color::Green;
  const TRANSLATION: Color = Color::Magenta;
}

const PAD: &str = "  ";

pub struct Viewer {
  tagger: Rc<RefCell<Tagger>>,
}

impl Viewer {
  pub fn new(tagger: Rc<RefCell<Tagger>>) -> Self {
    Self { tagger }
  }

  pub fn show_tags(&self, entity_type: &str, id: u64) -> Result<(), TagError> {
    let tags = self.tagger.borrow().tag_array(entity_type, id)?;
    self.print_tag_line(&tags);
    Ok(())
  }

  pub fn show_tag_array(&self, entity_type: &str, id: u64) -> Result<(), TagError> {
    for tag in self.tagger.borrow().tag_array(entity_type, id)? {
      println!(
        "{pad}{name}{pad}{value}",
        pad = PAD,
        name = tag.name().color(ViewColors::TAG_NAME),
        value = tag.value().unwrap_or("-").color(ViewColors::TAG_VALUE)
      );
    }
    Ok(())
  }

  pub fn show_searchable_tokens(&self, entity_type: &str, id: u64) -> Result<(), TagError> {
    for token in self.tagger.borrow().searchable_tokens(entity_type, id)? {
      println!("{}{}", PAD, token);
    }
    Ok(())
  }

  pub fn show_values(&self, entity_type: &str, id: u64, name: &str) -> Result<(), TagError> {
    let values = self.tagger.borrow().tag_values(entity_type, id, name)?;
    if values.is_empty() {
      println!("{} has no values", name.color(ViewColors::TAG_NAME));
      return Ok(());
    }
    for value in values {
      println!("{}{}", PAD, value.color(ViewColors::TAG_VALUE));
    }
    Ok(())
  }

  pub fn show_listing(&self, entity_type: &str, query: Option<&str>) -> Result<(), TagError> {
    let tags = self.tagger.borrow().list_tags(entity_type, query)?;
    if tags.is_empty() {
      println!("no tags to show");
      return Ok(());
    }
    for tag in tags.iter() {
      println!("{}{}", PAD, self.format_tag(tag));
    }
    Ok(())
  }

  pub fn show_tag_detail(
    &self,
    entity_type: &str,
    tag: &str,
    query: Option<&str>,
  ) -> Result<(), TagError> {
    let detail = self.tagger.borrow().show_tag(entity_type, tag, query)?;
    println!(
      "{} name: {} value: {}",
      self.format_tag(&detail.tag),
      detail.tag.name().bold(),
      detail.tag.value().unwrap_or("-").bold()
    );
    self.print_entities(&detail.taggings);
    Ok(())
  }

  pub fn show_entities_by_tag(&self, entity_type: &str, tag: &str) -> Result<(), TagError> {
    let entities = self.tagger.borrow().find_entities_by_tag(entity_type, tag)?;
    self.print_entities(&entities);
    Ok(())
  }

  pub fn print_tag_string(&self, tag_string: &str) {
    let tags: Vec<Tag> = tag_string.split(' ').filter(|t| !t.is_empty()).map(Tag::parse).collect();
    self.print_tag_line(&tags);
  }

  pub fn print_entity(&self, entity: &Entity) {
    let translations: Vec<String> = entity
      .translations()
      .iter()
      .map(|(locale, name)| format!("{}: {}", locale, name))
      .collect();

    println!(
      "{pad}{id}{pad}{name}{pad}{translations}",
      pad = PAD,
      id = entity.entity_ref().to_string().color(ViewColors::ENTITY_ID),
      name = entity.name().color(ViewColors::ENTITY_NAME),
      translations = translations.join(", ").color(ViewColors::TRANSLATION).italic()
    );
  }

  fn print_entities(&self, entities: &[Entity]) {
    if entities.is_empty() {
      println!("no entities to show");
      return;
    }
    for entity in entities {
      self.print_entity(entity);
    }
  }

  fn print_tag_line(&self, tags: &[Tag]) {
    if tags.is_empty() {
      println!("no tags");
      return;
    }
    let formatted: Vec<String> = tags.iter().map(|t| self.format_tag(t).to_string()).collect();
    println!("[{}]", formatted.join(" "));
  }

  fn format_tag(&self, tag: &Tag) -> ColoredString {
    match tag.value() {
      Some(value) => format!(
        "{}:{}",
        tag.name().color(ViewColors::TAG_NAME),
        value.color(ViewColors::TAG_VALUE)
      )
      .normal(),
      None => tag.name().color(ViewColors::TAG_NAME),
    }
  }
}
