//! Yeelight State Management
//!
//! Holds the last known properties of each light and keeps them current from
//! two sources:
//!
//! - **Full refreshes**: a `get_prop` reply decoded into a [`PropertySet`]
//!   replaces everything cached for the light
//! - **Optimistic updates**: after a light acknowledges a command, the
//!   matching [`PropertyUpdate`] patches the cache without re-reading it
//!
//! # Architecture
//!
//! ```text
//! get_prop reply → decoder → StateCache ← PropertyUpdate (acknowledged command)
//!                               ↓
//!                            Snapshot (properties + timestamps)
//! ```
//!
//! # Example
//!
//! ```
//! use yeelight_state::{LightId, StateCache};
//!
//! let cache = StateCache::new();
//! let desk = LightId::new("desk");
//! cache.register(desk.clone());
//!
//! let mut values = vec![""; 23];
//! values[0] = "on";
//! values[1] = "50";
//! cache.apply_full_refresh_values(&desk, &values).unwrap();
//!
//! let snapshot = cache.snapshot(&desk).unwrap();
//! assert!(snapshot.properties.power);
//! assert_eq!(snapshot.properties.bright, 50);
//! ```

pub mod cache;
pub mod decoder;
pub mod error;
pub mod logging;
pub mod model;

pub use cache::{Snapshot, StateCache};
pub use decoder::{decode_response, decode_values};
pub use error::{Result, StateError};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use model::{ColorMode, LightId, PropertySet, PropertyUpdate, StateChange};
