//! Thread-safe light state cache with change detection

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;
use yeelight_api::GetPropResponse;

use super::Snapshot;
use crate::decoder;
use crate::error::{Result, StateError};
use crate::model::{LightId, PropertySet, PropertyUpdate, StateChange};

#[derive(Debug, Clone, Default)]
struct CachedLight {
    properties: PropertySet,
    last_refreshed_at: Option<DateTime<Utc>>,
    last_updated_at: Option<DateTime<Utc>>,
}

/// Last known properties of every registered light
///
/// Clones share the same data. Update methods return `Some(StateChange)` only
/// when a cached value actually changed. Updates are not ordered against
/// command sends; a refresh that lands after an optimistic update simply
/// overwrites it.
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    lights: Arc<RwLock<HashMap<LightId, CachedLight>>>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `id`; returns `false` if it was already tracked
    pub fn register(&self, id: LightId) -> bool {
        let mut lights = self.lights.write();
        if lights.contains_key(&id) {
            return false;
        }
        lights.insert(id, CachedLight::default());
        true
    }

    /// Stop tracking `id`
    pub fn remove(&self, id: &LightId) -> bool {
        self.lights.write().remove(id).is_some()
    }

    pub fn contains(&self, id: &LightId) -> bool {
        self.lights.read().contains_key(id)
    }

    /// Registered light ids, sorted
    pub fn ids(&self) -> Vec<LightId> {
        let mut ids: Vec<LightId> = self.lights.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lights.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.read().is_empty()
    }

    /// Current cached state of `id`
    pub fn snapshot(&self, id: &LightId) -> Option<Snapshot> {
        self.lights.read().get(id).map(|light| Snapshot {
            properties: light.properties.clone(),
            last_refreshed_at: light.last_refreshed_at,
            last_updated_at: light.last_updated_at,
        })
    }

    /// Replace the cached properties with a decoded `get_prop` response
    ///
    /// The response is decoded before the cache is touched, so a value out of
    /// range leaves the previous properties in place.
    pub fn apply_full_refresh(
        &self,
        id: &LightId,
        response: &GetPropResponse,
    ) -> Result<Option<StateChange>> {
        let properties = decoder::decode_response(response)?;
        self.replace(id, properties)
    }

    /// Like [`apply_full_refresh`](Self::apply_full_refresh) for raw values in
    /// `get_prop` order
    pub fn apply_full_refresh_values<S: AsRef<str>>(
        &self,
        id: &LightId,
        values: &[S],
    ) -> Result<Option<StateChange>> {
        let properties = decoder::decode_values(values)?;
        self.replace(id, properties)
    }

    /// Patch the cache after a light acknowledged `update`
    pub fn apply_partial_update(
        &self,
        id: &LightId,
        update: PropertyUpdate,
    ) -> Result<Option<StateChange>> {
        let mut lights = self.lights.write();
        let light = lights
            .get_mut(id)
            .ok_or_else(|| StateError::UnknownLight(id.clone()))?;

        let mut next = light.properties.clone();
        next.apply(&update)?;
        let changed = light.properties.diff(&next);
        light.properties = next;
        light.last_updated_at = Some(Utc::now());

        if changed.is_empty() {
            return Ok(None);
        }
        debug!(light = %id, ?changed, "Applied optimistic update");
        Ok(Some(StateChange::Updated {
            light: id.clone(),
            update,
            changed,
        }))
    }

    fn replace(&self, id: &LightId, properties: PropertySet) -> Result<Option<StateChange>> {
        let mut lights = self.lights.write();
        let light = lights
            .get_mut(id)
            .ok_or_else(|| StateError::UnknownLight(id.clone()))?;

        let first = light.last_refreshed_at.is_none();
        let changed = light.properties.diff(&properties);
        light.properties = properties;
        light.last_refreshed_at = Some(Utc::now());

        if changed.is_empty() && !first {
            return Ok(None);
        }
        debug!(light = %id, ?changed, "Refreshed properties");
        Ok(Some(StateChange::Refreshed {
            light: id.clone(),
            changed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yeelight_api::{Target, PROPERTIES};

    fn values(power: &str, bright: &str) -> Vec<String> {
        let mut values = vec![String::new(); PROPERTIES.len()];
        values[0] = power.to_string();
        values[1] = bright.to_string();
        values
    }

    fn cache_with(id: &str) -> (StateCache, LightId) {
        let cache = StateCache::new();
        let id = LightId::new(id);
        cache.register(id.clone());
        (cache, id)
    }

    #[test]
    fn test_register_is_idempotent() {
        let (cache, id) = cache_with("desk");
        assert!(!cache.register(id.clone()));
        assert_eq!(cache.ids(), vec![id.clone()]);
        assert!(cache.remove(&id));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_snapshot_before_refresh() {
        let (cache, id) = cache_with("desk");
        let snap = cache.snapshot(&id).unwrap();
        assert!(!snap.is_refreshed());
        assert_eq!(snap.properties, PropertySet::default());
        assert!(cache.snapshot(&LightId::new("other")).is_none());
    }

    #[test]
    fn test_full_refresh_reports_changes() {
        let (cache, id) = cache_with("desk");

        let change = cache
            .apply_full_refresh_values(&id, &values("on", "50"))
            .unwrap()
            .unwrap();
        assert_eq!(change.changed(), &["power", "bright"]);

        let snap = cache.snapshot(&id).unwrap();
        assert!(snap.properties.power);
        assert_eq!(snap.properties.bright, 50);
        assert!(snap.is_refreshed());

        assert!(cache
            .apply_full_refresh_values(&id, &values("on", "50"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_first_refresh_always_reports() {
        let (cache, id) = cache_with("desk");
        let change = cache
            .apply_full_refresh_values(&id, &values("", ""))
            .unwrap();
        assert!(matches!(change, Some(StateChange::Refreshed { ref changed, .. }) if changed.is_empty()));
    }

    #[test]
    fn test_bad_refresh_keeps_previous_state() {
        let (cache, id) = cache_with("desk");
        cache
            .apply_full_refresh_values(&id, &values("on", "50"))
            .unwrap();

        let err = cache
            .apply_full_refresh_values(&id, &values("on", "150"))
            .unwrap_err();
        assert!(matches!(err, StateError::Decode { property: "bright", .. }));
        assert_eq!(cache.snapshot(&id).unwrap().properties.bright, 50);
    }

    #[test]
    fn test_partial_update() {
        let (cache, id) = cache_with("desk");
        let update = PropertyUpdate::Brightness {
            target: Target::Main,
            bright: 70,
        };

        let change = cache
            .apply_partial_update(&id, update.clone())
            .unwrap()
            .unwrap();
        assert_eq!(change.changed(), &["bright"]);

        let snap = cache.snapshot(&id).unwrap();
        assert_eq!(snap.properties.bright, 70);
        assert!(snap.has_unconfirmed_updates());

        assert!(cache.apply_partial_update(&id, update).unwrap().is_none());
    }

    #[test]
    fn test_unknown_light() {
        let cache = StateCache::new();
        let id = LightId::new("ghost");
        assert!(matches!(
            cache.apply_partial_update(&id, PropertyUpdate::Toggle { target: Target::Main }),
            Err(StateError::UnknownLight(_))
        ));
        assert!(matches!(
            cache.apply_full_refresh_values(&id, &values("on", "1")),
            Err(StateError::UnknownLight(_))
        ));
    }

    #[test]
    fn test_clones_share_state() {
        let (cache, id) = cache_with("desk");
        let other = cache.clone();
        other
            .apply_partial_update(&id, PropertyUpdate::Toggle { target: Target::Main })
            .unwrap();
        assert!(cache.snapshot(&id).unwrap().properties.power);
    }
}
