#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod graph;
mod types;

pub use graph::PoseGraph;
pub use types::{
    Cov2, Landmark, LandmarkEdge, LoopClosureEdge, OdometryEdge, Pose2, SlamConfig,
};
