//! Light handle
//!
//! A [`Light`] ties one light's command channel to its slot in the shared
//! state cache. Typed operations are validated and encoded before anything is
//! queued, so a bad parameter never reaches the socket.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use yeelight_api::{
    reply, FlowAction, GetProp, LightOperation, SetBright, SetCtAbx, SetHsv, SetName, SetPower, SetRgb,
    StartCf, StopCf, Target, Toggle, Transition,
};
use yeelight_channel::{Command, CommandChannel, Endpoint, PushNotification, SendReport};
use yeelight_state::{LightId, Snapshot, StateCache, StateChange};

use crate::config::BridgeConfig;
use crate::effect::CacheEffect;
use crate::error::Result;
use crate::stats::SendStats;

struct LightInner {
    id: LightId,
    channel: CommandChannel,
    cache: StateCache,
    changes: broadcast::Sender<StateChange>,
    next_request_id: AtomicU64,
    stats: Mutex<SendStats>,
    refresh_attempts: u32,
    command_attempts: u32,
}

/// Handle to one light
///
/// Cheap to clone; clones share the channel, cache slot and statistics.
///
/// # Example
///
/// ```rust,ignore
/// let desk = registry.add_light("desk", "192.168.1.40")?;
/// desk.refresh().await?;
/// desk.set_brightness(60).await?;
/// println!("{:?}", desk.snapshot());
/// ```
#[derive(Clone)]
pub struct Light {
    inner: Arc<LightInner>,
}

impl Light {
    pub(crate) fn new(
        id: LightId,
        channel: CommandChannel,
        cache: StateCache,
        changes: broadcast::Sender<StateChange>,
        config: &BridgeConfig,
    ) -> Self {
        cache.register(id.clone());
        Self {
            inner: Arc::new(LightInner {
                id,
                channel,
                cache,
                changes,
                next_request_id: AtomicU64::new(1),
                stats: Mutex::new(SendStats::default()),
                refresh_attempts: config.refresh_attempts,
                command_attempts: config.command_attempts,
            }),
        }
    }

    pub fn id(&self) -> &LightId {
        &self.inner.id
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.inner.channel.endpoint()
    }

    /// Send a pre-formatted payload and return the raw reply
    ///
    /// Nothing is validated or decoded. A payload spanning more than one line
    /// is refused. The outcome is counted in [`stats`](Self::stats): a reply
    /// carrying an error object counts as a failure.
    pub async fn send_command(
        &self,
        payload: impl Into<String>,
        max_attempts: u32,
    ) -> Result<SendReport> {
        let report = self.transmit(payload.into(), max_attempts).await?;
        let accepted = reply::parse_result(&report.reply).is_ok();
        self.inner.stats.lock().record(&report, accepted);
        Ok(report)
    }

    /// Validate, send and decode `op` with its default attempt budget
    pub async fn execute<Op: LightOperation>(&self, op: &Op) -> Result<Op::Response> {
        self.execute_with_attempts(op, Op::MAX_ATTEMPTS).await
    }

    pub async fn execute_with_attempts<Op: LightOperation>(
        &self,
        op: &Op,
        max_attempts: u32,
    ) -> Result<Op::Response> {
        let id = self.inner.next_request_id.fetch_add(1, Ordering::Relaxed);
        let payload = op.encode(id)?;
        debug!(light = %self.inner.id, method = op.method(), id, "Sending command");

        let report = self.transmit(payload, max_attempts).await?;
        let decoded = op.decode(&report.reply);
        self.inner.stats.lock().record(&report, decoded.is_ok());
        Ok(decoded?)
    }

    /// Hand `payload` to the channel, counting transport failures
    async fn transmit(&self, payload: String, max_attempts: u32) -> Result<SendReport> {
        match self.inner.channel.send(Command::new(payload, max_attempts)).await {
            Ok(report) => Ok(report),
            Err(err) => {
                self.inner.stats.lock().record_failure(&err);
                Err(err.into())
            }
        }
    }

    /// Execute a state-changing `op` and mirror it in the cache
    ///
    /// The cache is only patched once the light acknowledged the command.
    /// Returns the resulting change, if any value actually moved.
    pub async fn apply<Op>(&self, op: Op) -> Result<Option<StateChange>>
    where
        Op: LightOperation<Response = ()> + CacheEffect,
    {
        self.execute_with_attempts(&op, self.inner.command_attempts)
            .await?;

        let change = self
            .inner
            .cache
            .apply_partial_update(&self.inner.id, op.cache_update())?;
        self.publish(&change);
        Ok(change)
    }

    /// Read every property from the light and replace the cached set
    pub async fn refresh(&self) -> Result<Option<StateChange>> {
        let response = self
            .execute_with_attempts(&GetProp::all(), self.inner.refresh_attempts)
            .await?;
        let change = self
            .inner
            .cache
            .apply_full_refresh(&self.inner.id, &response)?;
        self.publish(&change);
        Ok(change)
    }

    /// Last cached state, `None` once the light was removed from its registry
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.inner.cache.snapshot(&self.inner.id)
    }

    pub fn stats(&self) -> SendStats {
        *self.inner.stats.lock()
    }

    /// Receive this light's push notifications
    pub fn subscribe_pushes(&self) -> broadcast::Receiver<PushNotification> {
        self.inner.channel.subscribe_pushes()
    }

    /// Call `callback` for every push notification from this light
    ///
    /// Must be called from within a tokio runtime. The callback runs on its
    /// own task until [`PushObserver::stop`] or the channel shuts down.
    pub fn on_push<F>(&self, callback: F) -> PushObserver
    where
        F: Fn(PushNotification) + Send + 'static,
    {
        let mut pushes = self.subscribe_pushes();
        let light = self.inner.id.clone();

        let handle = tokio::spawn(async move {
            loop {
                match pushes.recv().await {
                    Ok(push) => callback(push),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(light = %light, skipped, "Push observer fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!(light = %light, "Push observer stopped");
        });

        PushObserver { handle }
    }

    pub async fn set_power(&self, on: bool) -> Result<Option<StateChange>> {
        self.apply(SetPower::new(on)).await
    }

    pub async fn toggle(&self) -> Result<Option<StateChange>> {
        self.apply(Toggle::new(Target::Main)).await
    }

    pub async fn set_brightness(&self, brightness: u8) -> Result<Option<StateChange>> {
        self.apply(SetBright::new(brightness)).await
    }

    pub async fn set_color_temperature(&self, ct: u32) -> Result<Option<StateChange>> {
        self.apply(SetCtAbx::new(ct)).await
    }

    pub async fn set_rgb(&self, rgb: u32) -> Result<Option<StateChange>> {
        self.apply(SetRgb::new(rgb)).await
    }

    pub async fn set_hsv(&self, hue: u16, sat: u8) -> Result<Option<StateChange>> {
        self.apply(SetHsv::new(hue, sat)).await
    }

    pub async fn start_flow(
        &self,
        count: u32,
        action: FlowAction,
        expression: impl Into<String>,
    ) -> Result<Option<StateChange>> {
        self.apply(StartCf::new(count, action, expression)).await
    }

    pub async fn stop_flow(&self) -> Result<Option<StateChange>> {
        self.apply(StopCf::new(Target::Main)).await
    }

    pub async fn set_name(&self, name: impl Into<String>) -> Result<Option<StateChange>> {
        self.apply(SetName::new(name)).await
    }

    /// Brightness change with an explicit transition
    pub async fn fade_brightness(
        &self,
        brightness: u8,
        transition: Transition,
    ) -> Result<Option<StateChange>> {
        self.apply(SetBright::new(brightness).with_transition(transition))
            .await
    }

    pub(crate) async fn shutdown(&self) {
        self.inner.channel.shutdown().await;
        self.inner.cache.remove(&self.inner.id);
    }

    fn publish(&self, change: &Option<StateChange>) {
        if let Some(change) = change {
            // No subscribers is fine
            let _ = self.inner.changes.send(change.clone());
        }
    }
}

impl std::fmt::Debug for Light {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Light")
            .field("id", &self.inner.id)
            .field("endpoint", self.inner.channel.endpoint())
            .finish()
    }
}

/// Background task forwarding push notifications to a callback
#[derive(Debug)]
pub struct PushObserver {
    handle: JoinHandle<()>,
}

impl PushObserver {
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
