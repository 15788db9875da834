mod query;
mod scope;
mod storage;
mod storage_json;
mod storage_memory;

pub use scope::{TagField, TagPredicate, TagScope, TagTuple};
pub use storage::TagStore;
pub use storage_json::JsonStorage;
pub use storage_memory::MemoryStorage;
