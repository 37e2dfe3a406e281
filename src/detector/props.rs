use crate::clumping::{ClumpInfo, Footprint};
use crate::dual_threshold::SubClump;
use crate::error::ClumpError;
use crate::types::{BoundingBox, ClumpId, Interval};
use serde::Serialize;
use std::borrow::Cow;

/// One feature in the detector output: either a top-level clump that was
/// kept whole or a sub-clump of a split parent.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClumpProps {
    /// Position in the output list, starting at 1.
    pub id: ClumpId,
    /// Top-level clump this feature came from.
    pub parent: ClumpId,
    /// Secondary-threshold core, for sub-clumps only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_id: Option<ClumpId>,
    pub bbox: BoundingBox,
    pub n_cells: usize,
    pub size: f64,
    #[serde(skip)]
    pub intervals: Vec<Interval>,
}

impl ClumpProps {
    pub(crate) fn whole(
        id: ClumpId,
        info: &ClumpInfo,
        parent: ClumpId,
        size: f64,
    ) -> Result<Self, ClumpError> {
        let clump = info.clump(parent)?;
        let intervals = info
            .clump_intervals(parent)?
            .map(|i| Interval { id, ..*i })
            .collect();
        Ok(Self {
            id,
            parent,
            core_id: None,
            bbox: clump.bbox,
            n_cells: clump.n_cells,
            size,
            intervals,
        })
    }

    pub(crate) fn from_sub_clump(id: ClumpId, sub: SubClump) -> Self {
        let intervals = sub
            .intervals
            .into_iter()
            .map(|i| Interval { id, ..i })
            .collect();
        Self {
            id,
            parent: sub.parent,
            core_id: Some(sub.core_id),
            bbox: sub.bbox,
            n_cells: sub.n_cells,
            size: sub.size,
            intervals,
        }
    }

    pub fn is_sub_clump(&self) -> bool {
        self.core_id.is_some()
    }

    pub fn footprint(&self) -> Footprint<'_> {
        Footprint {
            id: self.id,
            bbox: self.bbox,
            n_cells: self.n_cells,
            intervals: Cow::Borrowed(&self.intervals),
        }
    }
}
