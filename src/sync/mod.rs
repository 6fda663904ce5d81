pub mod divergence;
pub mod service;

pub use divergence::{Divergence, SyncOperation};
pub use service::{IndexStatus, SyncOutcome, SyncService};
