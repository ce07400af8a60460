//! Zoom level → clustering parameters
//!
//! The merge distance curve and the zoom at which clustering switches off
//! are product-tuned values, so they live in a table rather than a formula.

use super::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};

/// Default zoom at (and above) which every event renders on its own
pub const DEFAULT_DISABLE_AT: f64 = 15.0;

/// Default minimum members for an aggregate marker
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;

/// Default marker radius in pixels
pub const DEFAULT_RADIUS: f64 = 40.0;

const DEFAULT_STEPS: [ZoomStep; 5] = [
    ZoomStep {
        below_zoom: 6.0,
        max_distance: 80.0,
    },
    ZoomStep {
        below_zoom: 9.0,
        max_distance: 60.0,
    },
    ZoomStep {
        below_zoom: 12.0,
        max_distance: 50.0,
    },
    ZoomStep {
        below_zoom: 14.0,
        max_distance: 40.0,
    },
    ZoomStep {
        below_zoom: 15.0,
        max_distance: 30.0,
    },
];

/// One row of the zoom table: applies to zoom levels below `below_zoom`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomStep {
    pub below_zoom: f64,
    /// Merge distance in pixels
    pub max_distance: f64,
}

/// Display size class of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSize {
    Small,
    Medium,
    Large,
}

/// Member counts at which a cluster marker grows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBreakpoints {
    pub medium: usize,
    pub large: usize,
}

impl MarkerSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerSize::Small => "small",
            MarkerSize::Medium => "medium",
            MarkerSize::Large => "large",
        }
    }
}

impl Default for SizeBreakpoints {
    fn default() -> Self {
        Self {
            medium: 10,
            large: 50,
        }
    }
}

impl SizeBreakpoints {
    pub fn classify(&self, count: usize) -> MarkerSize {
        if count >= self.large {
            MarkerSize::Large
        } else if count >= self.medium {
            MarkerSize::Medium
        } else {
            MarkerSize::Small
        }
    }
}

/// Clustering parameters in effect for one zoom level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub min_cluster_size: usize,
    /// Pixel distance within which events merge into a seed's group
    pub max_distance: f64,
    /// Marker radius in pixels
    pub radius: f64,
    pub breakpoints: SizeBreakpoints,
}

impl ClusterConfig {
    /// Config that turns every event into a singleton
    pub fn disabled(radius: f64, breakpoints: SizeBreakpoints) -> Self {
        Self {
            min_cluster_size: usize::MAX,
            max_distance: 0.0,
            radius,
            breakpoints,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.max_distance <= 0.0 || self.min_cluster_size == usize::MAX
    }
}

/// Caller overrides applied on top of the zoom table
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    pub min_cluster_size: Option<usize>,
    pub max_distance: Option<f64>,
}

/// Zoom-keyed clustering table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomTable {
    steps: Vec<ZoomStep>,
    disable_at: f64,
    min_cluster_size: usize,
    radius: f64,
    breakpoints: SizeBreakpoints,
}

impl Default for ZoomTable {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS.to_vec(),
            disable_at: DEFAULT_DISABLE_AT,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            radius: DEFAULT_RADIUS,
            breakpoints: SizeBreakpoints::default(),
        }
    }
}

impl ZoomTable {
    /// Builds a table, rejecting curves that would merge more when zooming in
    pub fn new(steps: Vec<ZoomStep>, disable_at: f64) -> Result<Self> {
        if steps.is_empty() {
            return Err(ClusterError::config("zoom table has no steps"));
        }
        if !disable_at.is_finite() {
            return Err(ClusterError::config("disable zoom must be finite"));
        }
        for (i, step) in steps.iter().enumerate() {
            if !step.below_zoom.is_finite() {
                return Err(ClusterError::config(format!("step {} zoom is not finite", i)));
            }
            if !step.max_distance.is_finite() || step.max_distance < 0.0 {
                return Err(ClusterError::config(format!(
                    "step {} distance {} is not a non-negative number",
                    i, step.max_distance
                )));
            }
            if i > 0 {
                let prev = &steps[i - 1];
                if step.below_zoom <= prev.below_zoom {
                    return Err(ClusterError::config(format!(
                        "step {} zoom {} is not above {}",
                        i, step.below_zoom, prev.below_zoom
                    )));
                }
                if step.max_distance > prev.max_distance {
                    return Err(ClusterError::config(format!(
                        "step {} distance {} grows past {}",
                        i, step.max_distance, prev.max_distance
                    )));
                }
            }
        }

        Ok(Self {
            steps,
            disable_at,
            ..Default::default()
        })
    }

    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size.max(2);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: SizeBreakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    pub fn disable_at(&self) -> f64 {
        self.disable_at
    }

    pub fn breakpoints(&self) -> SizeBreakpoints {
        self.breakpoints
    }

    pub fn steps(&self) -> &[ZoomStep] {
        &self.steps
    }

    /// Resolves the clustering parameters for `zoom`
    ///
    /// Zooms at or past `disable_at`, and non-finite zooms, get the disabled
    /// config. Zooms past the last step reuse the last step's distance.
    pub fn resolve(&self, zoom: f64) -> ClusterConfig {
        if !zoom.is_finite() || zoom >= self.disable_at {
            return ClusterConfig::disabled(self.radius, self.breakpoints);
        }

        let step = self
            .steps
            .iter()
            .find(|s| zoom < s.below_zoom)
            .or_else(|| self.steps.last());

        match step {
            Some(step) => ClusterConfig {
                min_cluster_size: self.min_cluster_size,
                max_distance: step.max_distance,
                radius: self.radius,
                breakpoints: self.breakpoints,
            },
            None => ClusterConfig::disabled(self.radius, self.breakpoints),
        }
    }

    /// Resolves `zoom` and applies caller overrides
    ///
    /// Overrides never re-enable clustering at or past the disable zoom. A
    /// negative or non-finite distance override turns merging off; a minimum
    /// size below 2 is raised to 2.
    pub fn resolve_with(&self, zoom: f64, options: &ClusterOptions) -> ClusterConfig {
        let mut config = self.resolve(zoom);
        if config.is_disabled() {
            return config;
        }
        if let Some(min) = options.min_cluster_size {
            config.min_cluster_size = min.max(2);
        }
        if let Some(dist) = options.max_distance {
            config.max_distance = if dist.is_finite() && dist > 0.0 {
                dist
            } else {
                0.0
            };
        }
        config
    }
}
