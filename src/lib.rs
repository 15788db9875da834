extern crate chrono;
extern crate colored;
extern crate serde;
extern crate serde_json;
extern crate uuid;

mod tagger;

pub mod config;
pub mod entity;
pub mod error;
pub mod lookup;
pub mod notify;
pub mod record;
pub mod search;
pub mod storage;
pub mod tag;
pub mod tag_set;
pub mod traits;
pub mod viewer;

pub use config::Config;
pub use tagger::*;
