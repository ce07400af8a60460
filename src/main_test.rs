#[cfg(test)]
mod tests {
    use crate::{Args, OutputFormat, read_events, resolve_bounds, write_clusters};
    use clap::Parser;
    use event_map_cluster::cluster::{
        ClusterController, ClusterInput, Event, MapBounds, ViewportSize, ZoomTable,
    };
    use std::fs;
    use std::path::PathBuf;

    const TEST_CSV: &str = "id,title,category,lat,lng,starts_at,price,status
zg-1,Jazz u parku,concert,45.8150,15.9819,2026-06-01T20:00,0,published
zg-2,INmusic,concert,45.8152,15.9821,2026-06-02T18:00,45.5,published
zg-3,Dinamo - Hajduk,sport,45.8187,15.9950,,12,
st-1,Ultra Europe,festival,43.5081,16.4402,2026-07-10T16:00,120,published
online,Webinar,conference,,,2026-05-05T10:00,,draft
";

    fn write_fixture(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, TEST_CSV).expect("Failed to create test CSV");
        path
    }

    #[test]
    fn test_read_events() {
        let path = write_fixture("event_map_cluster_read.csv");
        let events = read_events(&path).expect("Failed to read CSV");
        fs::remove_file(&path).ok();

        assert_eq!(events.len(), 5);
        assert_eq!(events[0].id, "zg-1");
        assert_eq!(events[1].price, Some(45.5));
        assert_eq!(events[2].starts_at, None);
        assert_eq!(events[2].status, None);
        assert!(!events[4].is_located());
        assert_eq!(events[4].lat, None);
    }

    #[test]
    fn test_resolve_bounds() {
        let events = vec![
            Event::at("a", "sport", 45.0, 15.0),
            Event::at("b", "sport", 44.0, 16.0),
        ];

        let args = Args::parse_from(["event_map_cluster", "--padding", "0"]);
        assert_eq!(
            resolve_bounds(&args, &events).unwrap(),
            Some(MapBounds::new(45.0, 44.0, 16.0, 15.0))
        );

        let args = Args::parse_from([
            "event_map_cluster",
            "--north",
            "46",
            "--south",
            "-10",
            "--east",
            "20",
            "--west",
            "-5.5",
        ]);
        assert_eq!(
            resolve_bounds(&args, &events).unwrap(),
            Some(MapBounds::new(46.0, -10.0, 20.0, -5.5))
        );

        let args = Args::parse_from(["event_map_cluster", "--north", "46"]);
        assert!(resolve_bounds(&args, &events).is_err());

        let args = Args::parse_from(["event_map_cluster"]);
        assert_eq!(resolve_bounds(&args, &[]).unwrap(), None);
    }

    #[test]
    fn test_main_program() {
        let path = write_fixture("event_map_cluster_main.csv");
        let events = read_events(&path).expect("Failed to read CSV");
        fs::remove_file(&path).ok();

        let args = Args::parse_from(["event_map_cluster", "--zoom", "8"]);
        let bounds = resolve_bounds(&args, &events).unwrap().unwrap();

        let mut controller = ClusterController::new(ZoomTable::default());
        let input = ClusterInput::new(&events, args.zoom)
            .with_view(bounds, ViewportSize::new(args.width, args.height));
        let set = controller.compute(&input);
        assert_eq!(set.stats.total, events.len());

        let mut out = Vec::new();
        write_clusters(&mut out, &set, OutputFormat::Csv, controller.table()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("id,is_cluster,count"));
        assert_eq!(lines.len(), set.clusters.len() + 1);
        // Zagreb events collapse, Split and the online event stay apart
        assert!(text.contains("mixed,small,Razno,#6366f1,zg-1;zg-2;zg-3"), "{}", text);
        assert!(text.contains("single-st-1,false,1"), "{}", text);
        assert!(text.contains(",festival,small,Festival,"), "{}", text);
        assert!(
            text.contains("single-online,false,1,,,,,conference,small,Konferencija,#0ea5e9,online"),
            "{}",
            text
        );

        let mut out = Vec::new();
        write_clusters(&mut out, &set, OutputFormat::Json, controller.table()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["stats"]["total"], 5);
        assert_eq!(json["clusters"][0]["is_cluster"], true);
    }

    #[test]
    fn test_no_cluster_flag() {
        let path = write_fixture("event_map_cluster_flag.csv");
        let events = read_events(&path).expect("Failed to read CSV");
        fs::remove_file(&path).ok();

        let args = Args::parse_from(["event_map_cluster", "--no-cluster"]);
        let bounds = resolve_bounds(&args, &events).unwrap().unwrap();
        let mut controller = ClusterController::default();
        let input = ClusterInput::new(&events, args.zoom)
            .with_view(bounds, ViewportSize::new(args.width, args.height))
            .with_enabled(!args.no_cluster);
        let set = controller.compute(&input);
        assert_eq!(set.stats.cluster_count, 0);
        assert_eq!(set.stats.single_event_count, 5);
    }
}
