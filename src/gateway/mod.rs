pub mod search;

pub use search::{ScoredEntity, SearchGateway};
