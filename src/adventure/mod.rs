//! Adventure mode: level sessions and campaign progress.

#![allow(unused_imports)]

pub mod progress;
pub mod session;

pub use progress::AdventureProgress;
pub use session::LevelSession;
