//! Yeelight SDK
//!
//! Control Yeelight bulbs over their LAN protocol from async Rust.
//!
//! Each light gets its own command channel: one socket, one command in flight,
//! automatic redial and retry, and push notifications delivered to observers.
//! A shared cache keeps the last known properties of every light, refreshed by
//! polling and patched optimistically when a command is acknowledged.
//!
//! # Architecture
//!
//! ```text
//! LightRegistry ── Light ── CommandChannel ── socket ── bulb
//!       │            │            │
//!   PollingTask   StateCache   push observers
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use yeelight_sdk::{BridgeConfig, LightRegistry};
//!
//! # async fn example() -> yeelight_sdk::Result<()> {
//! let registry = LightRegistry::new(BridgeConfig::default())?;
//! let desk = registry.add_light("desk", "192.168.1.40")?;
//!
//! desk.refresh().await?;
//! desk.set_color_temperature(2700).await?;
//!
//! // Out of range values fail before anything is sent
//! assert!(desk.set_brightness(150).await.unwrap_err().is_validation());
//!
//! let observer = desk.on_push(|push| println!("desk changed: {}", push.raw()));
//! # observer.stop();
//! # Ok(())
//! # }
//! ```

mod config;
mod effect;
mod error;
mod light;
mod poller;
mod registry;
mod stats;

pub use config::BridgeConfig;
pub use effect::CacheEffect;
pub use error::{Result, SdkError};
pub use light::{Light, PushObserver};
pub use poller::PollingStatus;
pub use registry::LightRegistry;
pub use stats::SendStats;

pub use yeelight_api as api;
pub use yeelight_api::{Effect, FlowAction, LightOperation, PowerMode, Target, Transition};
pub use yeelight_channel::{
    BoxedStream, ChannelConfig, Connector, Endpoint, LineError, PushNotification, SendReport,
};
pub use yeelight_state::logging;
pub use yeelight_state::{ColorMode, LightId, PropertySet, PropertyUpdate, Snapshot, StateChange};
