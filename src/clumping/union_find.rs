use crate::error::ClumpError;

/// Disjoint-set forest over provisional clump labels.
///
/// Union keeps the smaller root as representative, so the canonical label of
/// a set is always its smallest member.
#[derive(Clone, Debug, Default)]
pub struct DisjointSet {
    parent: Vec<u32>,
}

impl DisjointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Allocate a fresh singleton label.
    pub fn make_set(&mut self) -> Result<u32, ClumpError> {
        let label = self.parent.len();
        if label == self.parent.capacity() {
            let extra = label.max(64);
            self.parent
                .try_reserve(extra)
                .map_err(ClumpError::allocation("labels", label + extra))?;
        }
        self.parent.push(label as u32);
        Ok(label as u32)
    }

    /// Representative of `label`, compressing the path on the way.
    pub fn canonical_id(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut x = label;
        while self.parent[x as usize] != root {
            let next = self.parent[x as usize];
            self.parent[x as usize] = root;
            x = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`, returning the surviving representative.
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.canonical_id(a);
        let rb = self.canonical_id(b);
        if ra == rb {
            return ra;
        }
        let (keep, drop) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[drop as usize] = keep;
        keep
    }
}
