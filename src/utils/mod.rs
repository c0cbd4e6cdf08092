//! Utility modules: build info and file persistence.

#![allow(unused_imports)]

pub mod build_info;
pub mod persistence;

pub use build_info::*;
