//! Domain model definitions for café listings.

pub mod cafe;

pub use cafe::{CafeRecord, NewCafe};
