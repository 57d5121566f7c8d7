// crate modules
use crate::field::BinCounts;

/// Per-axis replica numbers of a track inside a voxelised volume
///
/// Supplied by the navigator as the copy numbers of the x, y and z
/// divisions. Negative values are allowed and simply fall outside the grid.
pub type Placement = [i32; 3];

/// Maps a discrete placement onto a flat cell index
///
/// Pure arithmetic, so identical placements always resolve to the same
/// index. Anything outside the grid resolves to `None`.
///
/// ```rust
/// # use vrtools_importance::{BinCounts, CellIndexResolver};
/// let resolver = CellIndexResolver::new(BinCounts::new(4, 3, 2).unwrap());
///
/// assert_eq!(resolver.resolve([0, 0, 0]), Some(0));
/// assert_eq!(resolver.resolve([3, 2, 1]), Some(23));
/// assert_eq!(resolver.resolve([-1, 0, 0]), None);
/// assert_eq!(resolver.resolve([0, 3, 0]), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellIndexResolver {
    bins: BinCounts,
}

impl CellIndexResolver {
    pub fn new(bins: BinCounts) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> BinCounts {
        self.bins
    }

    /// Flat cell index for a placement, `None` when outside the grid
    pub fn resolve(&self, placement: Placement) -> Option<usize> {
        let [ix, iy, iz] = placement.map(|i| usize::try_from(i).ok());
        self.bins.cell_index(ix?, iy?, iz?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_placement_same_index() {
        let resolver = CellIndexResolver::new(BinCounts::new(5, 5, 5).unwrap());
        let placement = [2, 4, 1];
        assert_eq!(resolver.resolve(placement), resolver.resolve(placement));
        assert_eq!(resolver.resolve(placement), Some(2 * 25 + 4 * 5 + 1));
    }

    #[test]
    fn any_axis_outside() {
        let resolver = CellIndexResolver::new(BinCounts::new(2, 2, 2).unwrap());
        assert_eq!(resolver.resolve([2, 0, 0]), None);
        assert_eq!(resolver.resolve([0, 0, -3]), None);
        assert_eq!(resolver.resolve([i32::MAX, i32::MAX, i32::MAX]), None);
    }
}
