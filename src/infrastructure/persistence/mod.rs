pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryRepository;
pub use json_file::JsonFileRepository;
