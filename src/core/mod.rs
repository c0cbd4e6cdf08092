//! Shared constants and the cooperative move timer.

#![allow(unused_imports)]

pub mod constants;
pub mod tick;

pub use constants::*;
pub use tick::Countdown;
