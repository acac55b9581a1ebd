//! Command catalog
//!
//! Each operation is a plain value. Build it, optionally pick a [`Target`](crate::Target)
//! or [`Transition`](crate::Transition), then hand it to a light.

pub mod brightness;
pub mod color;
pub mod flow;
pub mod get_prop;
pub mod name;
pub mod power;

pub use brightness::SetBright;
pub use color::{SetCtAbx, SetHsv, SetRgb};
pub use flow::{StartCf, StopCf};
pub use get_prop::{GetProp, GetPropResponse, PROPERTIES};
pub use name::SetName;
pub use power::{SetPower, Toggle};
