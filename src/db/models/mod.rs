//! Database models split into domain-specific modules.

pub mod admin;
pub mod case;
pub mod common;
pub mod lead;
pub mod stats;

pub use admin::*;
pub use case::*;
pub use common::*;
pub use lead::*;
pub use stats::*;
