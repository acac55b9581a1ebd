use crate::model::{LightId, PropertyUpdate};

/// Change detected while updating the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// A full refresh reported values different from the cached ones
    Refreshed {
        light: LightId,
        changed: Vec<&'static str>,
    },
    /// An acknowledged command altered the cached state
    Updated {
        light: LightId,
        update: PropertyUpdate,
        changed: Vec<&'static str>,
    },
}

impl StateChange {
    pub fn light(&self) -> &LightId {
        match self {
            StateChange::Refreshed { light, .. } | StateChange::Updated { light, .. } => light,
        }
    }

    /// Names of the properties whose value changed
    pub fn changed(&self) -> &[&'static str] {
        match self {
            StateChange::Refreshed { changed, .. } | StateChange::Updated { changed, .. } => {
                changed
            }
        }
    }
}
