//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, RoadMapStore, FeedSource)
//! but are themselves concrete structs, not traits.

mod roadmaps;

pub use roadmaps::{MapSummary, RoadMapService};
