//! Core data types, units, and forecast aggregation for skycast
//!
//! Everything in this crate is pure and synchronous: network access and
//! persistence live behind the collaborator traits in `skycast-clients`.

pub mod display;
pub mod forecast;
pub mod history;
pub mod hourly;
pub mod query;
pub mod rollups;
pub mod types;
pub mod units;

pub use forecast::*;
pub use history::*;
pub use query::*;
pub use rollups::*;
pub use types::*;
pub use units::*;
