//! Package cluster groups map events into markers for one viewport
pub mod category;
pub mod controller;
pub mod error;
pub mod event;
pub mod kdtree;
pub mod merge;
pub mod point;
pub mod projection;
pub mod zoom;

#[cfg(test)]
mod category_test;
#[cfg(test)]
mod controller_test;

pub use category::{CategoryStyle, MIXED_CATEGORY, category_style};
pub use controller::{ClusterController, ClusterInput, ClusterSet, ClusterStats};
pub use error::{ClusterError, Result};
pub use event::{Event, LatLng};
pub use kdtree::PixelTree;
pub use merge::{EventCluster, cluster_events, singletons};
pub use point::{MapBounds, PixelPoint, ViewportSize};
pub use projection::project;
pub use zoom::{ClusterConfig, ClusterOptions, MarkerSize, SizeBreakpoints, ZoomStep, ZoomTable};
