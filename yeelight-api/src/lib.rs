//! Type-safe Yeelight LAN control
//!
//! This crate describes the commands a Yeelight bulb accepts over its LAN
//! control socket. Every operation validates its parameters before producing
//! a request payload, and knows how to decode the reply the light sends back.
//! Sending the payload is left to the command channel.
//!
//! # Example
//!
//! ```
//! use yeelight_api::{LightOperation, SetCtAbx, Transition};
//!
//! let op = SetCtAbx::new(2700).with_transition(Transition::sudden());
//! let payload = op.encode(1).unwrap();
//! assert_eq!(payload, r#"{"id":1,"method":"set_ct_abx","params":[2700,"sudden",30]}"#);
//!
//! // Out of range values never produce a payload
//! assert!(SetCtAbx::new(9000).encode(2).is_err());
//! ```

pub mod error;
pub mod operation;
pub mod operations;
pub mod reply;
pub mod types;

pub use error::{ApiError, Result};
pub use operation::{LightOperation, Validate, ValidationError};
pub use operations::*;
pub use reply::ReplyError;
pub use types::{Effect, FlowAction, PowerMode, Target, Transition};
