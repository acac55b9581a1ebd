//! In-memory light state cache

mod snapshot;
mod state_cache;

pub use snapshot::Snapshot;
pub use state_cache::StateCache;
