//! What an acknowledged command means for the cached state

use yeelight_api::{
    SetBright, SetCtAbx, SetHsv, SetName, SetPower, SetRgb, StartCf, StopCf, Toggle,
};
use yeelight_state::PropertyUpdate;

/// Operations whose success can be mirrored in the state cache
pub trait CacheEffect {
    /// The update to apply once the light answered `["ok"]`
    fn cache_update(&self) -> PropertyUpdate;
}

impl CacheEffect for SetPower {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::Power {
            target: self.target,
            on: self.on,
            mode: self.mode,
        }
    }
}

impl CacheEffect for Toggle {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::Toggle {
            target: self.target,
        }
    }
}

impl CacheEffect for SetBright {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::Brightness {
            target: self.target,
            bright: self.brightness,
        }
    }
}

impl CacheEffect for SetCtAbx {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::ColorTemperature {
            target: self.target,
            ct: self.ct,
        }
    }
}

impl CacheEffect for SetRgb {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::Rgb {
            target: self.target,
            rgb: self.rgb,
        }
    }
}

impl CacheEffect for SetHsv {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::Hsv {
            target: self.target,
            hue: self.hue,
            sat: self.sat,
        }
    }
}

impl CacheEffect for StartCf {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::FlowStarted {
            target: self.target,
            expression: self.expression.clone(),
        }
    }
}

impl CacheEffect for StopCf {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::FlowStopped {
            target: self.target,
        }
    }
}

impl CacheEffect for SetName {
    fn cache_update(&self) -> PropertyUpdate {
        PropertyUpdate::Name {
            name: self.name.clone(),
        }
    }
}
