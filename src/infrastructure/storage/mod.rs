//! Storage adapters

mod json_file;
mod json_sink;
mod memory;

pub use json_file::JsonFileStore;
pub use json_sink::JsonRecordingSink;
pub use memory::MemoryStore;
