mod common;

use clump_detector::grid::GridGeom;
use clump_detector::{
    clump_grid, emit_boundary, BoundaryNode, BoundaryPolicy, ClumpId, ClumpingOptions, Corner,
    Decomposition, DualThresholdDecomposer, DualThresholdOptions, SplitRejection,
};
use common::synthetic_grid::dumbbell;

fn decomposer(options: DualThresholdOptions) -> DualThresholdDecomposer {
    DualThresholdDecomposer::new(ClumpingOptions::new(35.0), options, GridGeom::default()).unwrap()
}

#[test]
fn dumbbell_covers_parent_and_rejects_strict_each_part() {
    let _ = env_logger::builder().is_test(true).try_init();
    let grid = dumbbell(6, 5, 55.0, 40.0);
    let info = clump_grid(&grid, &ClumpingOptions::new(35.0)).unwrap();
    assert_eq!(info.num_clumps(), 1);
    let parent = info.clump(ClumpId(1)).unwrap();

    let permissive = DualThresholdOptions {
        secondary_threshold: 50.0,
        min_fraction_all_parts: 0.9,
        min_fraction_each_part: 0.2,
        min_area_each_part: 10,
        ..Default::default()
    };
    let split = decomposer(permissive)
        .decompose_clump(&grid, &info, ClumpId(1))
        .unwrap();
    let covered: usize = split.sub_clumps().iter().map(|p| p.n_cells).sum();
    assert_eq!(split.sub_clumps().len(), 2);
    assert!(covered as f64 / parent.n_cells as f64 >= 0.9);

    let strict = DualThresholdOptions {
        min_fraction_each_part: 0.55,
        ..permissive
    };
    let kept = decomposer(strict)
        .decompose_clump(&grid, &info, ClumpId(1))
        .unwrap();
    assert!(kept.sub_clumps().is_empty());
    assert!(matches!(
        kept,
        Decomposition::Unsplit(SplitRejection::EachPartFraction { .. })
    ));
}

#[test]
fn large_min_area_leaves_no_cores() {
    let grid = dumbbell(4, 2, 55.0, 40.0);
    let info = clump_grid(&grid, &ClumpingOptions::new(35.0)).unwrap();
    let options = DualThresholdOptions {
        min_area_each_part: 17,
        ..DualThresholdOptions::new(50.0)
    };
    let result = decomposer(options)
        .decompose_clump(&grid, &info, ClumpId(1))
        .unwrap();
    assert_eq!(
        result.rejection(),
        Some(SplitRejection::TooFewCores { found: 0 })
    );
}

#[test]
fn sub_clump_outline_renders_in_world_coordinates() {
    let grid = dumbbell(3, 3, 55.0, 40.0);
    let info = clump_grid(&grid, &ClumpingOptions::new(35.0)).unwrap();
    let result = decomposer(DualThresholdOptions::new(50.0))
        .decompose_clump(&grid, &info, ClumpId(1))
        .unwrap();
    let left = &result.sub_clumps()[0];
    let b = left.bbox;

    // Outline of the left sub-clump's bounding box, traced clockwise.
    let nodes = [
        BoundaryNode::new(b.min_x as f64, b.max_y as f64, Corner::NW),
        BoundaryNode::new(b.max_x as f64, b.max_y as f64, Corner::NE),
        BoundaryNode::new(b.max_x as f64, b.min_y as f64, Corner::SE),
        BoundaryNode::new(b.min_x as f64, b.min_y as f64, Corner::SW),
    ];
    let geom = GridGeom::flat(2.0, 2.0).with_origin(-100.0, 50.0);
    let outline = emit_boundary(&nodes, BoundaryPolicy::CornerRect).to_world(&geom);
    assert!(outline.is_closed());
    assert_eq!(outline.len(), 5);
    let (x0, y0) = outline.points()[0];
    assert_eq!(x0, -100.0 + (b.min_x as f64 - 0.5) * 2.0);
    assert_eq!(y0, 50.0 + (b.max_y as f64 + 0.5) * 2.0);
}
