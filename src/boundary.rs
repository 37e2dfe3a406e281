//! Rendering of traced clump boundaries into closed point lists.
//!
//! A boundary tracer walks the outline of a clump and yields one
//! [`BoundaryNode`] per visited cell, tagged with the cell corner the
//! outline passes through. [`emit_boundary`] turns that node sequence into
//! a [`BoundaryPolygon`] under one of three conventions:
//!
//! - [`BoundaryPolicy::CornerRect`]: each node is moved half a cell towards
//!   its corner, giving box-like outlines that enclose whole cells.
//! - [`BoundaryPolicy::PassThrough`]: cell centres verbatim.
//! - [`BoundaryPolicy::Collapsed`]: only the near-edge x and the row of each
//!   node are kept and consecutive duplicates are dropped.
//!
//! Grid y grows northwards, so the north corners sit at `y + 0.5`.
//! Output polygons are closed: the last point repeats the first.
use crate::grid::GridGeom;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Corner {
    NW,
    NE,
    SW,
    SE,
}

impl Corner {
    /// Offset from the cell centre to this corner, in cells.
    pub fn offset(self) -> (f64, f64) {
        match self {
            Corner::NW => (-0.5, 0.5),
            Corner::NE => (0.5, 0.5),
            Corner::SW => (-0.5, -0.5),
            Corner::SE => (0.5, -0.5),
        }
    }

    pub fn is_west(self) -> bool {
        matches!(self, Corner::NW | Corner::SW)
    }
}

/// One traced boundary cell: grid coordinates plus the corner the outline
/// passes through.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryNode {
    pub x: f64,
    pub y: f64,
    pub corner: Corner,
}

impl BoundaryNode {
    pub fn new(x: f64, y: f64, corner: Corner) -> Self {
        Self { x, y, corner }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    #[default]
    CornerRect,
    PassThrough,
    Collapsed,
}

/// Closed outline of one clump or sub-clump.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BoundaryPolygon {
    points: Vec<(f64, f64)>,
}

impl BoundaryPolygon {
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of points including the closing repeat.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() >= 2 && first == last,
            _ => false,
        }
    }

    /// Same outline in projection coordinates of `geom`.
    pub fn to_world(&self, geom: &GridGeom) -> BoundaryPolygon {
        BoundaryPolygon {
            points: self
                .points
                .iter()
                .map(|&(x, y)| geom.to_world(x, y))
                .collect(),
        }
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}

/// Render `nodes` under `policy`. An empty node list gives an empty polygon.
pub fn emit_boundary(nodes: &[BoundaryNode], policy: BoundaryPolicy) -> BoundaryPolygon {
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(nodes.len() + 1);
    match policy {
        BoundaryPolicy::CornerRect => {
            points.extend(nodes.iter().map(|n| {
                let (ox, oy) = n.corner.offset();
                (n.x + ox, n.y + oy)
            }));
        }
        BoundaryPolicy::PassThrough => {
            points.extend(nodes.iter().map(|n| (n.x, n.y)));
        }
        BoundaryPolicy::Collapsed => {
            for n in nodes {
                let x = if n.corner.is_west() { n.x - 0.5 } else { n.x + 0.5 };
                let p = (x, n.y);
                if points.last() != Some(&p) {
                    points.push(p);
                }
            }
        }
    }
    close(&mut points);
    BoundaryPolygon { points }
}

fn close(points: &mut Vec<(f64, f64)>) {
    if let Some(&first) = points.first() {
        if points.len() == 1 || points.last() != Some(&first) {
            points.push(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<BoundaryNode> {
        // 2x2 block of cells traced clockwise from the top-left cell.
        vec![
            BoundaryNode::new(0.0, 1.0, Corner::NW),
            BoundaryNode::new(1.0, 1.0, Corner::NE),
            BoundaryNode::new(1.0, 0.0, Corner::SE),
            BoundaryNode::new(0.0, 0.0, Corner::SW),
        ]
    }

    #[test]
    fn corner_rect_moves_to_cell_corners() {
        let poly = emit_boundary(&square(), BoundaryPolicy::CornerRect);
        assert_eq!(
            poly.points(),
            &[
                (-0.5, 1.5),
                (1.5, 1.5),
                (1.5, -0.5),
                (-0.5, -0.5),
                (-0.5, 1.5)
            ]
        );
        assert!(poly.is_closed());
    }

    #[test]
    fn pass_through_keeps_coordinates() {
        let poly = emit_boundary(&square(), BoundaryPolicy::PassThrough);
        assert_eq!(poly.len(), 5);
        assert_eq!(poly.points()[1], (1.0, 1.0));
        assert_eq!(poly.points()[4], (0.0, 1.0));
    }

    #[test]
    fn collapsed_drops_consecutive_duplicates() {
        let nodes = vec![
            BoundaryNode::new(0.0, 2.0, Corner::NW),
            BoundaryNode::new(0.0, 2.0, Corner::SW),
            BoundaryNode::new(3.0, 2.0, Corner::NE),
            BoundaryNode::new(3.0, 2.0, Corner::SE),
            BoundaryNode::new(3.0, 1.0, Corner::SE),
            BoundaryNode::new(0.0, 1.0, Corner::SW),
        ];
        let poly = emit_boundary(&nodes, BoundaryPolicy::Collapsed);
        assert_eq!(
            poly.points(),
            &[(-0.5, 2.0), (3.5, 2.0), (3.5, 1.0), (-0.5, 1.0), (-0.5, 2.0)]
        );
    }

    #[test]
    fn already_closed_input_is_not_doubled() {
        let mut nodes = square();
        nodes.push(nodes[0]);
        let poly = emit_boundary(&nodes, BoundaryPolicy::PassThrough);
        assert_eq!(poly.len(), 5);
        assert!(poly.is_closed());
    }

    #[test]
    fn empty_and_single_node() {
        let empty = emit_boundary(&[], BoundaryPolicy::CornerRect);
        assert!(empty.is_empty());
        assert!(!empty.is_closed());

        let one = emit_boundary(
            &[BoundaryNode::new(2.0, 3.0, Corner::SE)],
            BoundaryPolicy::CornerRect,
        );
        assert_eq!(one.points(), &[(2.5, 2.5), (2.5, 2.5)]);
        assert!(one.is_closed());
    }

    #[test]
    fn to_world_applies_origin_and_spacing() {
        let geom = GridGeom::flat(2.0, 0.5).with_origin(100.0, -10.0);
        let poly = emit_boundary(&square(), BoundaryPolicy::CornerRect).to_world(&geom);
        assert_eq!(poly.points()[0], (99.0, -9.25));
        assert!(poly.is_closed());
    }
}
