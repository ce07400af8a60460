use super::category::dominant_category;
use super::error::{ClusterError, Result};
use super::event::{Event, LatLng};
use super::kdtree::PixelTree;
use super::point::{MapBounds, PixelList, PixelPoint, ViewportSize, geo_centroid, pixel_centroid};
use super::projection::project;
use super::zoom::{ClusterConfig, MarkerSize, SizeBreakpoints};
use bitvec::prelude::*;
use serde::Serialize;

// Greedy first-fit merge:
//
// for each event E in input order
//    skip E if already consumed
//    mark E consumed
//    if E is unlocated
//       emit singleton(E)
//    else
//       group = [E] + every later unconsumed located event within
//               max_distance pixels of E, in input order
//       mark group consumed
//       if |group| >= min_cluster_size
//          emit cluster(group)
//       else
//          emit singleton(G) for G in group
//
// An event joins the group of the earliest seed that reaches it, not the
// nearest one. Output order follows seed order, so it is stable for a given
// input order.

/// One marker on the map: a single event or an aggregate of nearby events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCluster {
    pub id: String,
    pub is_cluster: bool,
    pub count: usize,
    /// Mean member position; `None` for an unlocated singleton
    pub center: Option<LatLng>,
    /// Mean projected member position; `None` when nothing was projected
    pub pixel: Option<PixelPoint>,
    pub category: String,
    pub events: Vec<Event>,
}

impl EventCluster {
    /// Wraps one event as its own marker
    pub fn single(event: &Event, pixel: Option<PixelPoint>) -> Self {
        EventCluster {
            id: format!("single-{}", event.id),
            is_cluster: false,
            count: 1,
            center: event.location(),
            pixel,
            category: event.category.clone(),
            events: vec![event.clone()],
        }
    }

    /// Builds an aggregate marker from located members
    fn aggregate(members: &[(&Event, LatLng, PixelPoint)]) -> Self {
        let ids: Vec<&str> = members.iter().map(|(e, _, _)| e.id.as_str()).collect();
        EventCluster {
            id: format!("cluster-{}", ids.join("-")),
            is_cluster: true,
            count: members.len(),
            center: geo_centroid(members.iter().map(|(_, c, _)| c)),
            pixel: pixel_centroid(members.iter().map(|(_, _, p)| p)),
            category: dominant_category(members.iter().map(|(e, _, _)| e.category.as_str())),
            events: members.iter().map(|(e, _, _)| (*e).clone()).collect(),
        }
    }

    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.id.as_str())
    }

    /// Marker size class for this cluster
    pub fn marker_size(&self, breakpoints: &SizeBreakpoints) -> MarkerSize {
        if self.is_cluster {
            breakpoints.classify(self.count)
        } else {
            MarkerSize::Small
        }
    }
}

/// One singleton per event, in input order, without projection
pub fn singletons(events: &[Event]) -> Vec<EventCluster> {
    events.iter().map(|e| EventCluster::single(e, None)).collect()
}

/// Partitions `events` into map markers for the given viewport
///
/// Every input event ends up in exactly one returned cluster. Unlocated
/// events (and events whose projection is not finite) are emitted as
/// singletons at their input position and never merge.
///
/// Worst case is O(n²) when every event is in range of every other one, so
/// this is meant for what fits in one viewport (low hundreds of events).
pub fn cluster_events(
    events: &[Event],
    bounds: &MapBounds,
    viewport: &ViewportSize,
    config: &ClusterConfig,
) -> Result<Vec<EventCluster>> {
    // slots[i] is the index of event i in the projected point list
    let mut slots: Vec<Option<usize>> = vec![None; events.len()];
    let mut located: Vec<(usize, LatLng)> = Vec::new();
    let mut pixels = PixelList::new();

    for (i, event) in events.iter().enumerate() {
        let Some(coord) = event.location() else {
            continue;
        };
        let px = project(&coord, bounds, viewport);
        if !px.x().is_finite() || !px.y().is_finite() {
            continue;
        }
        slots[i] = Some(pixels.len());
        located.push((i, coord));
        pixels.push(px);
    }

    let mut clusters = Vec::with_capacity(events.len());
    let mut emitted = bitvec![0; events.len()];
    let single_at = |i: usize| EventCluster::single(&events[i], slots[i].map(|k| pixels[k]));

    if config.is_disabled() {
        for i in 0..events.len() {
            emitted.set(i, true);
            clusters.push(single_at(i));
        }
        return check_partition(events.len(), clusters, &emitted);
    }

    let tree = PixelTree::new(pixels.clone());
    let mut consumed = bitvec![0; events.len()];
    let mut hits = Vec::new();

    for i in 0..events.len() {
        if consumed[i] {
            continue;
        }
        consumed.set(i, true);

        let Some(k) = slots[i] else {
            emitted.set(i, true);
            clusters.push(single_at(i));
            continue;
        };

        tree.within(&tree.points[k], config.max_distance, &mut hits);
        // tree order -> input order
        hits.sort_unstable();

        let mut group = vec![k];
        for &h in &hits {
            let j = located[h].0;
            if !consumed[j] {
                consumed.set(j, true);
                group.push(h);
            }
        }

        for &h in &group {
            emitted.set(located[h].0, true);
        }
        if group.len() >= config.min_cluster_size {
            let members: Vec<(&Event, LatLng, PixelPoint)> = group
                .iter()
                .map(|&h| (&events[located[h].0], located[h].1, tree.points[h]))
                .collect();
            clusters.push(EventCluster::aggregate(&members));
        } else {
            clusters.extend(group.iter().map(|&h| single_at(located[h].0)));
        }
    }

    check_partition(events.len(), clusters, &emitted)
}

pub(crate) fn check_partition(
    expected: usize,
    clusters: Vec<EventCluster>,
    emitted: &BitSlice,
) -> Result<Vec<EventCluster>> {
    let actual: usize = clusters.iter().map(|c| c.count).sum();
    if actual != expected || emitted.count_ones() != expected {
        return Err(ClusterError::PartitionViolated { expected, actual });
    }
    if let Some(bad) = clusters.iter().find(|c| c.count != c.events.len()) {
        return Err(ClusterError::Internal {
            message: format!(
                "cluster {} reports {} of {} members",
                bad.id,
                bad.count,
                bad.events.len()
            ),
        });
    }
    Ok(clusters)
}
