//! Memoized clustering for a live map view
//!
//! The controller keeps the last computed cluster set together with a key
//! describing every input that can change it. Repeated calls with equal
//! inputs hand back the same `Arc`, so renderers can skip work on pointer
//! equality.

use super::error::Result;
use super::event::Event;
use super::merge::{EventCluster, cluster_events, singletons};
use super::point::{MapBounds, ViewportSize};
use super::zoom::{ClusterOptions, ZoomTable};
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;

/// Aggregate counts over a cluster set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClusterStats {
    /// Sum of `count` over all clusters, equal to the number of input events
    pub total: usize,
    pub cluster_count: usize,
    pub single_event_count: usize,
}

impl ClusterStats {
    pub fn from_clusters(clusters: &[EventCluster]) -> Self {
        clusters.iter().fold(ClusterStats::default(), |mut s, c| {
            s.total += c.count;
            if c.is_cluster {
                s.cluster_count += 1;
            } else {
                s.single_event_count += 1;
            }
            s
        })
    }
}

/// Result of one clustering pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSet {
    pub clusters: Vec<EventCluster>,
    pub stats: ClusterStats,
}

impl ClusterSet {
    pub fn new(clusters: Vec<EventCluster>) -> Self {
        let stats = ClusterStats::from_clusters(&clusters);
        Self { clusters, stats }
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Everything a clustering pass depends on
#[derive(Debug, Clone, Copy)]
pub struct ClusterInput<'a> {
    pub events: &'a [Event],
    pub bounds: Option<MapBounds>,
    pub viewport: Option<ViewportSize>,
    pub zoom: f64,
    pub enabled: bool,
    pub options: ClusterOptions,
}

impl<'a> ClusterInput<'a> {
    pub fn new(events: &'a [Event], zoom: f64) -> Self {
        Self {
            events,
            bounds: None,
            viewport: None,
            zoom,
            enabled: true,
            options: ClusterOptions::default(),
        }
    }

    pub fn with_view(mut self, bounds: MapBounds, viewport: ViewportSize) -> Self {
        self.bounds = Some(bounds);
        self.viewport = Some(viewport);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_options(mut self, options: ClusterOptions) -> Self {
        self.options = options;
        self
    }
}

/// Floats are compared by bit pattern so NaN inputs still hit the cache
#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    events: Vec<(String, Option<u64>, Option<u64>)>,
    bounds: Option<[u64; 4]>,
    viewport: Option<[u64; 2]>,
    zoom: u64,
    enabled: bool,
    min_cluster_size: Option<usize>,
    max_distance: Option<u64>,
}

impl CacheKey {
    fn new(input: &ClusterInput<'_>) -> Self {
        CacheKey {
            events: input
                .events
                .iter()
                .map(|e| (e.id.clone(), e.lat.map(f64::to_bits), e.lng.map(f64::to_bits)))
                .collect(),
            bounds: input
                .bounds
                .map(|b| {
                    [
                        b.north.to_bits(),
                        b.south.to_bits(),
                        b.east.to_bits(),
                        b.west.to_bits(),
                    ]
                }),
            viewport: input
                .viewport
                .map(|v| [v.width.to_bits(), v.height.to_bits()]),
            zoom: input.zoom.to_bits(),
            enabled: input.enabled,
            min_cluster_size: input.options.min_cluster_size,
            max_distance: input.options.max_distance.map(f64::to_bits),
        }
    }
}

/// Recomputes clusters only when their inputs change
#[derive(Debug, Default)]
pub struct ClusterController {
    table: ZoomTable,
    cached: Option<(CacheKey, Arc<ClusterSet>)>,
    recomputations: usize,
}

impl ClusterController {
    pub fn new(table: ZoomTable) -> Self {
        Self {
            table,
            cached: None,
            recomputations: 0,
        }
    }

    pub fn table(&self) -> &ZoomTable {
        &self.table
    }

    /// Number of passes actually run (cache misses)
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    /// Drops the cached result so the next call recomputes
    pub fn clear(&mut self) {
        self.cached = None;
    }

    /// Returns clusters for `input`, reusing the previous result when the
    /// inputs are unchanged
    ///
    /// Never fails: if the merge pass errors, every event is returned as a
    /// singleton instead.
    pub fn compute(&mut self, input: &ClusterInput<'_>) -> Arc<ClusterSet> {
        let key = CacheKey::new(input);
        if let Some((cached_key, set)) = &self.cached {
            if *cached_key == key {
                return Arc::clone(set);
            }
        }

        self.recomputations += 1;
        let set = Arc::new(ClusterSet::new(self.run(input)));
        debug!(
            "[ClusterController] {} events -> {} clusters, {} singles (zoom {})",
            set.stats.total, set.stats.cluster_count, set.stats.single_event_count, input.zoom
        );
        self.cached = Some((key, Arc::clone(&set)));
        set
    }

    fn run(&self, input: &ClusterInput<'_>) -> Vec<EventCluster> {
        let (Some(bounds), Some(viewport)) = (input.bounds, input.viewport) else {
            return singletons(input.events);
        };
        if !input.enabled {
            return singletons(input.events);
        }

        let config = self.table.resolve_with(input.zoom, &input.options);
        or_singletons(
            cluster_events(input.events, &bounds, &viewport, &config),
            input.events,
        )
    }
}

/// Falls back to one singleton per event when the merge pass failed
pub(crate) fn or_singletons(
    result: Result<Vec<EventCluster>>,
    events: &[Event],
) -> Vec<EventCluster> {
    match result {
        Ok(clusters) => clusters,
        Err(e) => {
            warn!("[ClusterController] clustering failed, showing singles: {}", e);
            singletons(events)
        }
    }
}
