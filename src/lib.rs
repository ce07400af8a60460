//! Viewport-aware clustering of event markers
//!
//! Events are projected into the current viewport, merged greedily by pixel
//! distance using zoom-dependent thresholds, and memoized per input set so a
//! map view only pays for clustering when something it depends on changes.

pub mod cluster;

pub use cluster::{
    ClusterController, ClusterInput, ClusterOptions, ClusterSet, ClusterStats, Event,
    EventCluster, MapBounds, ViewportSize, ZoomTable,
};
