//! Light state model

mod light_id;
mod property_set;
mod state_change;
mod update;

pub use light_id::LightId;
pub use property_set::{ColorMode, PropertySet};
pub use state_change::StateChange;
pub use update::PropertyUpdate;
