use std::{cell::RefCell, rc::Rc};

use tagstring::{viewer::Viewer, Config, Tagger};

const DEFAULT_ENTITY_TYPE: &str = "PublicBody";

fn build_cli() -> clap::Command<'static> {
  let id = || clap::Arg::new("id").required(true).index(1);
  let query = || clap::Arg::new("query").long("query").short('q').takes_value(true);

  clap::Command::new("tagstring")
    .about("Machine tags (`name` or `name:value`) on public bodies, requests and users")
    .arg_required_else_help(true)
    .arg(
      clap::Arg::new("type")
        .long("type")
        .short('t')
        .takes_value(true)
        .global(true)
        .default_value(DEFAULT_ENTITY_TYPE),
    )
    .subcommand(clap::Command::new("set").args(&[
      id(),
      clap::Arg::new("tags").index(2).multiple_values(true),
    ]))
    .subcommand(clap::Command::new("show").args(&[
      id(),
      clap::Arg::new("array").long("array"),
      clap::Arg::new("search").long("search"),
    ]))
    .subcommand(clap::Command::new("add").args(&[
      id(),
      clap::Arg::new("tag").required(true).index(2),
    ]))
    .subcommand(clap::Command::new("remove").args(&[
      id(),
      clap::Arg::new("tag").required(true).index(2),
    ]))
    .subcommand(clap::Command::new("has").args(&[
      id(),
      clap::Arg::new("name").required(true).index(2),
    ]))
    .subcommand(clap::Command::new("values").args(&[
      id(),
      clap::Arg::new("name").required(true).index(2),
    ]))
    .subcommand(clap::Command::new("list").arg(query()))
    .subcommand(clap::Command::new("tag").args(&[
      clap::Arg::new("tag").required(true).index(1),
      query(),
    ]))
    .subcommand(
      clap::Command::new("find").arg(clap::Arg::new("tag").required(true).index(1)),
    )
    .subcommand(clap::Command::new("entity").args(&[
      id(),
      clap::Arg::new("name").required(true).index(2),
      clap::Arg::new("translation")
        .long("translation")
        .takes_value(true)
        .multiple_occurrences(true),
    ]))
    .subcommand(
      clap::Command::new("completions").arg(clap::Arg::new("shell").required(true).index(1)),
    )
}

fn main() {
  env_logger::init();

  let matches = build_cli().get_matches();

  if let Some(("completions", command_matches)) = matches.subcommand() {
    match command_matches.value_of_t::<clap_complete::Shell>("shell") {
      Ok(shell) => {
        clap_complete::generate(shell, &mut build_cli(), "tagstring", &mut std::io::stdout())
      }
      Err(err) => err.exit(),
    }
    return;
  }

  let config = match Config::new() {
    Ok(config) => config,
    Err(err) => {
      eprintln!("config err: {}", err);
      std::process::exit(1);
    }
  };
  let tagger = match Tagger::new(config) {
    Ok(tagger) => Rc::new(RefCell::new(tagger)),
    Err(err) => {
      eprintln!("storage err: {}", err);
      std::process::exit(1);
    }
  };
  let viewer = Viewer::new(Rc::clone(&tagger));

  let (subcommand, command_matches) = match matches.subcommand() {
    Some(found) => found,
    None => {
      println!("subcommand not found");
      return;
    }
  };
  let entity_type = command_matches
    .value_of("type")
    .unwrap_or(DEFAULT_ENTITY_TYPE);
  let id = || match command_matches.value_of_t::<u64>("id") {
    Ok(id) => id,
    Err(err) => err.exit(),
  };

  let result = match subcommand {
    "set" => {
      let tags: Vec<&str> = command_matches
        .values_of("tags")
        .map(|values| values.collect())
        .unwrap_or_default();
      let res = tagger
        .borrow_mut()
        .set_tag_string(entity_type, id(), Some(&tags.join(" ")));
      res.map(|tag_string| {
        println!("tags set:");
        viewer.print_tag_string(&tag_string);
      })
    }

    "show" => {
      if command_matches.is_present("array") {
        viewer.show_tag_array(entity_type, id())
      } else if command_matches.is_present("search") {
        viewer.show_searchable_tokens(entity_type, id())
      } else {
        viewer.show_tags(entity_type, id())
      }
    }

    "add" => {
      let tag = command_matches.value_of("tag").unwrap_or_default();
      let res = tagger.borrow_mut().add_tag_if_absent(entity_type, id(), tag);
      res.map(|tag_string| viewer.print_tag_string(&tag_string))
    }

    "remove" => {
      let tag = command_matches.value_of("tag").unwrap_or_default();
      let res = tagger.borrow_mut().remove_tag(entity_type, id(), tag);
      res.map(|tag_string| viewer.print_tag_string(&tag_string))
    }

    "has" => {
      let name = command_matches.value_of("name").unwrap_or_default();
      let res = tagger.borrow().has_tag(entity_type, id(), name);
      res.map(|found| println!("{}", found))
    }

    "values" => viewer.show_values(
      entity_type,
      id(),
      command_matches.value_of("name").unwrap_or_default(),
    ),

    "list" => viewer.show_listing(entity_type, command_matches.value_of("query")),

    "tag" => viewer.show_tag_detail(
      entity_type,
      command_matches.value_of("tag").unwrap_or_default(),
      command_matches.value_of("query"),
    ),

    "find" => viewer.show_entities_by_tag(
      entity_type,
      command_matches.value_of("tag").unwrap_or_default(),
    ),

    "entity" => {
      let name = command_matches.value_of("name").unwrap_or_default();
      let translations: Vec<(String, String)> = command_matches
        .values_of("translation")
        .map(|values| values.filter_map(parse_translation).collect())
        .unwrap_or_default();
      let res = tagger
        .borrow_mut()
        .add_entity(entity_type, id(), name, &translations);
      res.map(|entity| viewer.print_entity(&entity))
    }

    subcmd => {
      println!("unknown subcommand {}", subcmd);
      Ok(())
    }
  };

  if let Err(err) = result {
    eprintln!("{} err: {}", subcommand, err);
    std::process::exit(1);
  }
}

fn parse_translation(translation: &str) -> Option<(String, String)> {
  match translation.split_once('=') {
    Some((locale, name)) if !locale.is_empty() => Some((locale.to_owned(), name.to_owned())),
    _ => {
      eprintln!("skipping translation '{}', expected locale=name", translation);
      None
    }
  }
}
