//! route-optimizer core
//!
//! Orders a day's appointments by nearest-neighbor heuristics, optionally as a
//! round trip from a home location, and turns the order into arrival times.
//! Distances come from a precise pairwise service when one is configured, with
//! great-circle estimates filling in whenever it fails.

pub mod api;
pub mod coordinate;
pub mod error;
pub mod fallback;
pub mod haversine;
pub mod matrix;
pub mod optimizer;
pub mod osrm;
pub mod route;
pub mod schedule;
pub mod traits;

pub use coordinate::Coordinate;
pub use error::{DistanceProviderError, InvalidCoordinateError, OptimizeError, PartialDistanceError};
pub use optimizer::{OptimizationResult, OptimizeOptions, Optimizer, ScheduledStop};
