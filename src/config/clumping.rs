use crate::clumping::ClumpingOptions;
use crate::detector::ClumpParams;
use crate::dual_threshold::DualThresholdOptions;
use crate::grid::{GridGeom, Projection};
use crate::types::Comparison;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `clump_demo` tool.
#[derive(Debug, Deserialize)]
pub struct ClumpToolConfig {
    /// JSON grid document or grayscale image.
    pub input: PathBuf,
    #[serde(default)]
    pub geom: GeomConfig,
    #[serde(default)]
    pub clumping: ClumpingConfig,
    #[serde(default)]
    pub dual_threshold: Option<DualThresholdConfig>,
    /// Minimum size of top-level clumps (km² or km³).
    #[serde(default)]
    pub min_clump_size: f64,
    pub output: ClumpOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeomConfig {
    pub dx: f64,
    pub dy: f64,
    pub min_x: f64,
    pub min_y: f64,
    pub z_levels_km: Vec<f64>,
    /// Treat `dx`/`dy`/`min_x`/`min_y` as degrees on a lat/lon grid.
    pub latlon: bool,
}

impl Default for GeomConfig {
    fn default() -> Self {
        Self {
            dx: 1.0,
            dy: 1.0,
            min_x: 0.0,
            min_y: 0.0,
            z_levels_km: Vec::new(),
            latlon: false,
        }
    }
}

impl GeomConfig {
    pub fn to_geom(&self) -> GridGeom {
        let projection = if self.latlon {
            Projection::LatLon
        } else {
            Projection::Flat
        };
        GridGeom::flat(self.dx, self.dy)
            .with_origin(self.min_x, self.min_y)
            .with_z_levels(self.z_levels_km.clone())
            .with_projection(projection)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClumpingConfig {
    pub threshold: f32,
    /// Clump cells below the threshold instead of at or above it.
    pub below: bool,
    pub min_overlap: usize,
}

impl Default for ClumpingConfig {
    fn default() -> Self {
        Self {
            threshold: 35.0,
            below: false,
            min_overlap: 1,
        }
    }
}

impl ClumpingConfig {
    pub fn to_options(&self) -> ClumpingOptions {
        let comparison = if self.below {
            Comparison::Below
        } else {
            Comparison::AboveOrEqual
        };
        ClumpingOptions::new(self.threshold)
            .with_comparison(comparison)
            .with_min_overlap(self.min_overlap)
    }
}

#[derive(Debug, Deserialize)]
pub struct DualThresholdConfig {
    pub secondary_threshold: f32,
    #[serde(default = "default_fraction_all_parts")]
    pub min_fraction_all_parts: f64,
    #[serde(default = "default_fraction_each_part")]
    pub min_fraction_each_part: f64,
    #[serde(default = "default_area_each_part")]
    pub min_area_each_part: usize,
    #[serde(default)]
    pub min_feature_size: f64,
    /// When `None`, sub-clumps have no upper size limit.
    #[serde(default)]
    pub max_feature_size: Option<f64>,
}

fn default_fraction_all_parts() -> f64 {
    DualThresholdOptions::default().min_fraction_all_parts
}

fn default_fraction_each_part() -> f64 {
    DualThresholdOptions::default().min_fraction_each_part
}

fn default_area_each_part() -> usize {
    DualThresholdOptions::default().min_area_each_part
}

impl DualThresholdConfig {
    pub fn to_options(&self) -> DualThresholdOptions {
        let defaults = DualThresholdOptions::default();
        DualThresholdOptions {
            secondary_threshold: self.secondary_threshold,
            min_fraction_all_parts: self.min_fraction_all_parts,
            min_fraction_each_part: self.min_fraction_each_part,
            min_area_each_part: self.min_area_each_part,
            min_feature_size: self.min_feature_size,
            max_feature_size: self
                .max_feature_size
                .filter(|v| v.is_finite())
                .unwrap_or(defaults.max_feature_size),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClumpOutputConfig {
    #[serde(rename = "report_json")]
    pub report_json: PathBuf,
    /// Label image of one plane; skipped when absent.
    #[serde(default)]
    pub label_image: Option<PathBuf>,
    #[serde(default)]
    pub label_plane: usize,
}

impl ClumpToolConfig {
    pub fn to_params(&self) -> ClumpParams {
        ClumpParams {
            clumping: self.clumping.to_options(),
            dual_threshold: self.dual_threshold.as_ref().map(|d| d.to_options()),
            min_clump_size: self.min_clump_size,
            geom: self.geom.to_geom(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<ClumpToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<ClumpToolConfig, serde_json::Error> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{ "input": "grid.json", "output": { "report_json": "out.json" } }"#)
            .unwrap();
        let params = cfg.to_params();
        assert_eq!(params.clumping.threshold, 35.0);
        assert_eq!(params.clumping.min_overlap, 1);
        assert!(params.dual_threshold.is_none());
        assert_eq!(params.geom, GridGeom::default());
        assert!(cfg.output.label_image.is_none());
    }

    #[test]
    fn full_config_maps_to_params() {
        let cfg = parse_config(
            r#"{
                "input": "refl.png",
                "geom": { "dx": 0.01, "dy": 0.01, "min_y": 40.0, "latlon": true },
                "clumping": { "threshold": 20.0, "below": true, "min_overlap": 2 },
                "dual_threshold": { "secondary_threshold": 10.0, "min_area_each_part": 9 },
                "min_clump_size": 30.0,
                "output": { "report_json": "r.json", "label_image": "l.png" }
            }"#,
        )
        .unwrap();
        let params = cfg.to_params();
        assert_eq!(params.clumping.comparison, Comparison::Below);
        assert_eq!(params.clumping.min_overlap, 2);
        assert_eq!(params.geom.projection, Projection::LatLon);
        assert_eq!(params.min_clump_size, 30.0);
        let dual = params.dual_threshold.unwrap();
        assert_eq!(dual.min_area_each_part, 9);
        assert_eq!(dual.min_fraction_each_part, 0.05);
        assert_eq!(dual.max_feature_size, 1.0e99);
        assert!(params.validate().is_ok());
    }
}
