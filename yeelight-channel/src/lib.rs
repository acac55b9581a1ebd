//! Command channel for a single Yeelight bulb
//!
//! A light accepts one TCP connection and answers commands on it in order,
//! interleaving unsolicited `props` notifications whenever its state changes.
//! This crate turns that socket into a queue-backed channel:
//!
//! - commands are serialized, one attempt in flight at a time
//! - push frames are separated from replies and forwarded to subscribers
//! - dead or wedged sockets are closed and redialed within an attempt budget
//!
//! # Example
//!
//! ```rust,no_run
//! use yeelight_channel::{ChannelConfig, Command, CommandChannel, Endpoint};
//!
//! # async fn example() -> yeelight_channel::Result<()> {
//! let channel = CommandChannel::spawn(Endpoint::new("192.168.1.40"), ChannelConfig::default())?;
//! let report = channel
//!     .send(Command::new(r#"{"id":1,"method":"toggle","params":[]}"#, 10))
//!     .await?;
//! println!("{} after {} attempts", report.reply, report.attempts);
//! # Ok(())
//! # }
//! ```

mod channel;
mod config;
mod error;
mod frame;
mod watchdog;

pub use channel::{Command, CommandChannel, SendReport};
pub use config::ChannelConfig;
pub use error::{ChannelError, Result};
pub use frame::{classify, Frame, PushNotification, PUSH_PREFIX};
pub use watchdog::{Guarded, Watchdog};

pub use line_client::{BoxedStream, Connector, Endpoint, LineError, TcpConnector, DEFAULT_PORT};

/// Re-exports for the common case
pub mod prelude {
    pub use crate::{ChannelConfig, ChannelError, Command, CommandChannel, Endpoint, SendReport};
}
