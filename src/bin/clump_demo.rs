use clump_detector::config::clumping;
use clump_detector::detector::ClumpDetector;
use clump_detector::grid::io::{load_grid, save_label_image, write_json_file};
use clump_detector::grid::GridSource;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = clumping::load_config(Path::new(&config_path))?;

    let grid = load_grid(&config.input)?;
    let shape = grid.shape();
    let detector = ClumpDetector::new(config.to_params())
        .map_err(|e| format!("Invalid parameters in {config_path}: {e}"))?;
    let detection = detector
        .process_with_diagnostics(&grid)
        .map_err(|e| format!("Clumping {} failed: {e}", config.input.display()))?;

    write_json_file(&config.output.report_json, &detection.report)?;
    println!(
        "Loaded {}x{}x{} grid from {}",
        shape.nx,
        shape.ny,
        shape.nz,
        config.input.display()
    );
    println!("{}", detection.report.summary());
    println!(
        "Saved report with {} features to {}",
        detection.clumps.len(),
        config.output.report_json.display()
    );

    if let Some(label_path) = &config.output.label_image {
        save_label_image(&detection.info, config.output.label_plane, label_path)?;
        println!(
            "Saved plane {} labels to {}",
            config.output.label_plane,
            label_path.display()
        );
    }

    Ok(())
}

fn usage() -> String {
    "Usage: clump_demo <config.json>".to_string()
}
