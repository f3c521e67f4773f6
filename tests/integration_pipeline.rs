// tests/integration_pipeline.rs
//! End-to-end runs over letters tables on disk.

use socialmap::config::{CentralitySelect, Configuration, LayoutSelect};
use socialmap::{export, pipeline, SocialMapError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LETTERS: &str = "\
Name,Ada,Byron,Clara,Dora,Eli
Ada,,12,3,1,
Byron,9,,8,2,4
Clara,2,6,,,1
Dora,,5,,,x
Eli,,7,,,
";

fn write_table(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("letters.csv");
    fs::write(&path, content).unwrap();
    path
}

fn config_for(path: &Path) -> Configuration {
    Configuration {
        source_file: path.to_path_buf(),
        layout_seed: Some(42),
        ..Configuration::default()
    }
}

#[test]
fn test_isolated_writer_is_still_placed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, "Name,A,B,C\nA,,5,\nB,,,1\nC,,,\n");
    let config = Configuration {
        display_threshold: 2,
        ..config_for(&path)
    };

    let map = pipeline::run(&config).unwrap();
    assert_eq!(map.graph.edge_count(), 1);
    assert_eq!(map.graph.weight("A", "B"), Some(5));
    assert_eq!(map.graph.weight("B", "C"), None);
    assert!(map.positions.contains_key("C"));
}

#[test]
fn test_positions_cover_exactly_the_node_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, LETTERS);

    for layout in [
        LayoutSelect::Spring,
        LayoutSelect::KamadaKawai,
        LayoutSelect::Spectral,
        LayoutSelect::Spiral,
        LayoutSelect::Circular,
    ] {
        let config = Configuration {
            layout_select: layout,
            centrality_nodes: 3,
            display_threshold: 2,
            ..config_for(&path)
        };
        let map = pipeline::run(&config).unwrap();

        let mut names: Vec<&str> = map.graph.node_names();
        names.sort_unstable();
        let keys: Vec<&str> = map.positions.keys().map(String::as_str).collect();
        assert_eq!(names, keys, "{}", layout.name());
    }
}

#[test]
fn test_threshold_holds_for_every_retained_edge() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, LETTERS);
    let config = Configuration {
        display_threshold: 5,
        ..config_for(&path)
    };

    let map = pipeline::run(&config).unwrap();
    assert!(map.graph.edges().all(|e| e.weight >= 5));
    assert!(map.edge_widths.iter().all(|e| e.width >= 1));
    assert_eq!(map.graph.node_count(), 5);
}

#[test]
fn test_anchor_count_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, LETTERS);

    for centrality in [
        CentralitySelect::Betweenness,
        CentralitySelect::Load,
        CentralitySelect::Eigenvector,
    ] {
        for anchors in 0..=4 {
            let config = Configuration {
                centrality_select: centrality,
                centrality_nodes: anchors,
                graph_directional: true,
                ..config_for(&path)
            };
            let map = pipeline::run(&config).unwrap();
            assert!(map.ranked.len() <= anchors.min(map.graph.node_count()));
            assert!(map.anchors.len() <= map.ranked.len());
        }
    }
}

#[test]
fn test_pinned_anchors_land_where_placed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, LETTERS);
    let config = Configuration {
        centrality_nodes: 2,
        ..config_for(&path)
    };

    let map = pipeline::run(&config).unwrap();
    assert!(!map.anchors.is_empty());
    assert_eq!(map.anchors.center().unwrap().node, "Byron");
    for anchor in map.anchors.iter() {
        assert_eq!(map.positions[&anchor.node], anchor.position.to_vec());
    }
}

#[test]
fn test_repeated_runs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, LETTERS);
    let config = Configuration {
        centrality_nodes: 3,
        layout_select: LayoutSelect::KamadaKawai,
        ..config_for(&path)
    };

    let first = pipeline::run(&config).unwrap();
    let second = pipeline::run(&config).unwrap();
    assert_eq!(
        first.graph.edges().collect::<Vec<_>>(),
        second.graph.edges().collect::<Vec<_>>()
    );
    assert_eq!(first.ranked, second.ranked);
    assert_eq!(first.anchors, second.anchors);
}

#[test]
fn test_missing_source_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("nope.csv"));
    assert!(matches!(
        pipeline::run(&config),
        Err(SocialMapError::DataLoad { .. })
    ));
}

#[test]
fn test_out_of_range_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, LETTERS);
    let config = Configuration {
        edge_weight_factor: 1.0,
        ..config_for(&path)
    };
    assert!(matches!(
        pipeline::run(&config),
        Err(SocialMapError::Config(_))
    ));
}

#[test]
fn test_ragged_source_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, "Name,A,B\nA,1,2\nB,3\n");
    assert!(matches!(
        pipeline::run(&config_for(&path)),
        Err(SocialMapError::DataLoad { .. })
    ));
}

#[test]
fn test_outputs_written_for_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, LETTERS);
    let map = pipeline::run(&Configuration {
        centrality_nodes: 2,
        ..config_for(&path)
    })
    .unwrap();

    let scene_path = dir.path().join("scene.json");
    let dot_path = dir.path().join("scene.dot");
    export::write_file(&scene_path, &export::scene_json(&map).unwrap()).unwrap();
    export::write_file(&dot_path, &export::dot_source(&map)).unwrap();

    let scene: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&scene_path).unwrap()).unwrap();
    assert_eq!(scene["nodes"].as_array().unwrap().len(), 5);
    assert!(!scene["anchors"].as_array().unwrap().is_empty());
    assert!(fs::read_to_string(&dot_path).unwrap().starts_with("graph {"));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("socialmap.json");
    fs::write(
        &path,
        r#"{ "centrality_select": "load", "layout_select": "spectral", "font_size": 12 }"#,
    )
    .unwrap();

    let config = Configuration::load(Some(&path)).unwrap();
    assert_eq!(config.centrality_select, CentralitySelect::Load);
    assert_eq!(config.layout_select, LayoutSelect::Spectral);
    assert_eq!(config.render.font_size, 12);
    assert!(config.validate().is_ok());
}
