// Library root: sheet normalization, rank tiers, stats and the pipelines that
// turn fetched grids into dashboard view models.

pub mod config;
pub mod pipeline;
pub mod rank;
pub mod series;
pub mod source;
pub mod stats;
pub mod table;
