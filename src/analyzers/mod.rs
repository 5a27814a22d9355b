//! Team-statistics aggregation and table sorting.
//!
//! Match records fetched for a team are reduced into per-metric averages,
//! a weighted total score and event rates; pit records are merged into a
//! single field map.

pub mod aggregate;
pub mod lookup;
pub mod sort;
pub mod types;
pub mod utility;
