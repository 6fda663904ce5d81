pub mod backend;
pub mod memory;

pub use backend::SearchBackend;
pub use memory::{EngineStats, MemoryEngine};
