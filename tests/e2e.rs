mod common;

use clump_detector::config::clumping;
use clump_detector::grid::io::{load_grid, save_label_image, write_json_file};
use clump_detector::grid::{GridF32, GridGeom};
use clump_detector::{
    ClumpDetector, ClumpId, ClumpParams, ClumpingOptions, DualThresholdOptions,
};
use common::synthetic_grid::{dumbbell, stacked_planes};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("clump_detector_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn dumbbell_grid_is_split_end_to_end() {
    let _ = env_logger::builder().is_test(true).try_init();
    let grid = dumbbell(5, 4, 50.0, 40.0);

    let params = ClumpParams::new(ClumpingOptions::new(35.0))
        .with_geom(GridGeom::flat(0.5, 0.5))
        .with_min_clump_size(1.0)
        .with_dual_threshold(DualThresholdOptions::new(45.0));
    let detection = ClumpDetector::new(params)
        .unwrap()
        .process_with_diagnostics(&grid)
        .unwrap();

    assert_eq!(detection.info.num_clumps(), 1);
    assert_eq!(detection.clumps.len(), 2);
    let total: usize = detection.clumps.iter().map(|c| c.n_cells).sum();
    assert_eq!(total, 54);
    assert!(detection.clumps.iter().all(|c| c.parent == ClumpId(1)));
    assert!((detection.clumps[0].size - detection.clumps[0].n_cells as f64 * 0.25).abs() < 1e-9);
    assert_eq!(detection.report.num_split(), 1);
}

#[test]
fn stacked_dumbbell_splits_as_a_volume() {
    let plane = dumbbell(4, 3, 50.0, 40.0);
    let grid = stacked_planes(&plane, 3);
    let params = ClumpParams::new(ClumpingOptions::new(35.0))
        .with_geom(GridGeom::flat(1.0, 1.0).with_z_levels(vec![1.0, 2.0, 3.0]))
        .with_dual_threshold(DualThresholdOptions::new(45.0));
    let clumps = ClumpDetector::new(params).unwrap().process(&grid).unwrap();
    assert_eq!(clumps.len(), 2);
    assert!(clumps.iter().all(|c| c.bbox.min_z == 0 && c.bbox.max_z == 2));
    let total: usize = clumps.iter().map(|c| c.n_cells).sum();
    assert_eq!(total, 3 * (2 * 16 + 3));
}

#[test]
fn json_grid_round_trip_and_label_image() {
    let dir = scratch_dir("io");
    let mut grid = GridF32::new(12, 6, 1).with_missing(-999.0);
    grid.fill_rect(0, 1, 3, 1, 3, 40.0);
    grid.fill_rect(0, 7, 10, 2, 4, 42.0);
    grid.set(8, 3, 0, -999.0);

    let grid_path = dir.join("grid.json");
    write_json_file(&grid_path, &grid).unwrap();
    let loaded = load_grid(&grid_path).unwrap();
    assert_eq!(loaded.missing, Some(-999.0));
    assert_eq!(loaded.data, grid.data);

    let detection = ClumpDetector::new(ClumpParams::new(ClumpingOptions::new(35.0)))
        .unwrap()
        .process_with_diagnostics(&loaded)
        .unwrap();
    assert_eq!(detection.clumps.len(), 2);
    assert_eq!(detection.clumps[1].n_cells, 11);

    let label_path = dir.join("labels.png");
    save_label_image(&detection.info, 0, &label_path).unwrap();
    let labels = image::open(&label_path).unwrap().into_luma8();
    assert_eq!(labels.dimensions(), (12, 6));
    assert_eq!(labels.get_pixel(0, 0).0[0], 0);
    assert_ne!(labels.get_pixel(2, 2).0[0], 0);
    assert_ne!(labels.get_pixel(2, 2), labels.get_pixel(7, 2));
    assert_eq!(labels.get_pixel(8, 3).0[0], 0);

    assert!(save_label_image(&detection.info, 1, &label_path).is_err());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tool_config_drives_the_detector() {
    let dir = scratch_dir("config");
    let grid = dumbbell(5, 4, 50.0, 40.0);
    let grid_path = dir.join("grid.json");
    write_json_file(&grid_path, &grid).unwrap();

    let config_path = dir.join("config.json");
    let config = serde_json::json!({
        "input": grid_path,
        "clumping": { "threshold": 35.0 },
        "dual_threshold": { "secondary_threshold": 45.0 },
        "output": { "report_json": dir.join("report.json") }
    });
    fs::write(&config_path, config.to_string()).unwrap();

    let cfg = clumping::load_config(&config_path).unwrap();
    let input = load_grid(&cfg.input).unwrap();
    let detection = ClumpDetector::new(cfg.to_params())
        .unwrap()
        .process_with_diagnostics(&input)
        .unwrap();
    write_json_file(&cfg.output.report_json, &detection.report).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&cfg.output.report_json).unwrap()).unwrap();
    assert_eq!(report["settings"]["secondaryThreshold"], 45.0);
    assert_eq!(report["decompositions"][0]["outcome"]["parts"], 2);

    assert!(clumping::load_config(&dir.join("missing.json")).is_err());
    let _ = fs::remove_dir_all(&dir);
}
