#[cfg(test)]
mod tests {
    use crate::cluster::controller::or_singletons;
    use crate::cluster::{
        ClusterController, ClusterError, ClusterInput, ClusterOptions, ClusterStats, Event,
        EventCluster, MapBounds, ViewportSize, ZoomTable,
    };
    use std::sync::Arc;

    fn events() -> Vec<Event> {
        vec![
            Event::at("A", "concert", 45.0, 16.0),
            Event::at("B", "concert", 45.0001, 16.0001),
            Event::at("C", "sport", 10.0, 10.0),
            Event::at("D", "sport", 0.0, 0.0),
        ]
    }

    fn bounds() -> MapBounds {
        MapBounds::new(46.0, 9.0, 17.0, 9.0)
    }

    fn viewport() -> ViewportSize {
        ViewportSize::new(800.0, 600.0)
    }

    #[test]
    fn test_stats() {
        let events = events();
        let mut controller = ClusterController::default();
        let input = ClusterInput::new(&events, 5.0).with_view(bounds(), viewport());

        let set = controller.compute(&input);
        assert_eq!(
            set.stats,
            ClusterStats {
                total: 4,
                cluster_count: 1,
                single_event_count: 2,
            }
        );
        assert_eq!(set.stats, ClusterStats::from_clusters(&set.clusters));
    }

    #[test]
    fn test_cache_hit_returns_same_arc() {
        let events = events();
        let mut controller = ClusterController::new(ZoomTable::default());
        let input = ClusterInput::new(&events, 5.0).with_view(bounds(), viewport());

        let first = controller.compute(&input);
        let copy = events.clone();
        let second =
            controller.compute(&ClusterInput::new(&copy, 5.0).with_view(bounds(), viewport()));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(controller.recomputations(), 1);

        controller.clear();
        let third = controller.compute(&input);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
        assert_eq!(controller.recomputations(), 2);
    }

    #[test]
    fn test_any_key_change_recomputes() {
        let events = events();
        let mut controller = ClusterController::default();
        let base = ClusterInput::new(&events, 5.0).with_view(bounds(), viewport());
        let first = controller.compute(&base);

        let mut moved = events.clone();
        moved[2].lat = Some(10.5);
        let variants = vec![
            ClusterInput::new(&moved, 5.0).with_view(bounds(), viewport()),
            ClusterInput::new(&events, 6.0).with_view(bounds(), viewport()),
            ClusterInput::new(&events, 5.0)
                .with_view(MapBounds::new(46.0, 9.0, 18.0, 9.0), viewport()),
            ClusterInput::new(&events, 5.0)
                .with_view(bounds(), ViewportSize::new(640.0, 600.0)),
            base.with_enabled(false),
            base.with_options(ClusterOptions {
                min_cluster_size: Some(3),
                max_distance: None,
            }),
        ];

        let mut last = first;
        for (i, input) in variants.iter().enumerate() {
            let next = controller.compute(input);
            assert!(!Arc::ptr_eq(&last, &next), "variant {}", i);
            last = next;
        }
        assert_eq!(controller.recomputations(), 7);
    }

    #[test]
    fn test_disabled_returns_singles_in_order() {
        let events = events();
        let mut controller = ClusterController::default();
        let input = ClusterInput::new(&events, 5.0)
            .with_view(bounds(), viewport())
            .with_enabled(false);

        let set = controller.compute(&input);
        assert_eq!(set.clusters.len(), events.len());
        for (cluster, event) in set.clusters.iter().zip(&events) {
            assert!(!cluster.is_cluster);
            assert_eq!(cluster.count, 1);
            assert_eq!(cluster.events[0].id, event.id);
        }
        assert_eq!(set.stats.single_event_count, 4);
        assert_eq!(set.stats.cluster_count, 0);
    }

    #[test]
    fn test_missing_view_returns_singles() {
        let events = events();
        let mut controller = ClusterController::default();

        let set = controller.compute(&ClusterInput::new(&events, 5.0));
        assert_eq!(set.stats.total, 4);
        assert_eq!(set.stats.cluster_count, 0);

        let mut half = ClusterInput::new(&events, 5.0);
        half.bounds = Some(bounds());
        let set = controller.compute(&half);
        assert_eq!(set.stats.single_event_count, 4);
    }

    #[test]
    fn test_empty_input() {
        let mut controller = ClusterController::default();
        let set = controller.compute(&ClusterInput::new(&[], 5.0).with_view(bounds(), viewport()));
        assert!(set.is_empty());
        assert_eq!(set.stats, ClusterStats::default());
    }

    #[test]
    fn test_failed_pass_falls_back_to_singles() {
        let events = events();

        let failed = Err(ClusterError::PartitionViolated {
            expected: 4,
            actual: 3,
        });
        let clusters = or_singletons(failed, &events);
        assert_eq!(clusters.len(), events.len());
        for (cluster, event) in clusters.iter().zip(&events) {
            assert!(!cluster.is_cluster);
            assert_eq!(cluster.count, 1);
            assert_eq!(cluster.events[0].id, event.id);
        }
        let stats = ClusterStats::from_clusters(&clusters);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.single_event_count, 4);

        let internal = Err(ClusterError::Internal {
            message: "boom".to_string(),
        });
        assert_eq!(or_singletons(internal, &events).len(), 4);

        let ok = vec![EventCluster::single(&events[0], None)];
        assert_eq!(or_singletons(Ok(ok.clone()), &events), ok);
    }

    #[test]
    fn test_high_zoom_disables_clustering() {
        let events: Vec<Event> = (0..20)
            .map(|i| Event::at(format!("e{}", i), "party", 45.0, 16.0))
            .collect();
        let mut controller = ClusterController::default();
        let set =
            controller.compute(&ClusterInput::new(&events, 15.0).with_view(bounds(), viewport()));
        assert_eq!(set.stats.cluster_count, 0);
        assert_eq!(set.stats.single_event_count, 20);

        let set =
            controller.compute(&ClusterInput::new(&events, 14.0).with_view(bounds(), viewport()));
        assert_eq!(set.stats.cluster_count, 1);
        assert_eq!(set.clusters[0].count, 20);
    }
}
