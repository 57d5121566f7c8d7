// crate modules
use crate::error::{Error, Result};

/// Number of bins along each axis of a voxelised volume
///
/// Cells are ordered x-major, then y, then z, so the flat index of cell
/// `(ix, iy, iz)` is `ix*ny*nz + iy*nz + iz`.
///
/// ```rust
/// # use vrtools_importance::BinCounts;
/// let bins = BinCounts::new(4, 3, 2).unwrap();
/// assert_eq!(bins.number_of_cells(), 24);
/// assert_eq!(bins.cell_index(1, 2, 1), Some(6 + 4 + 1));
/// assert_eq!(bins.cell_index(4, 0, 0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinCounts {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl BinCounts {
    /// Bin counts, rejecting any axis with no bins
    ///
    /// The grid must also be small enough that its size in bytes fits in a
    /// `usize`, so that every later size calculation is exact.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        for (axis, n) in [('x', nx), ('y', ny), ('z', nz)] {
            if n == 0 {
                return Err(Error::ZeroBins { axis });
            }
        }

        nx.checked_mul(ny)
            .and_then(|n| n.checked_mul(nz))
            .and_then(|n| n.checked_mul(std::mem::size_of::<f64>()))
            .ok_or(Error::TooManyCells { nx, ny, nz })?;

        Ok(Self { nx, ny, nz })
    }

    /// Total number of voxels
    pub fn number_of_cells(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Size in bytes of a map of this grid stored as doubles
    pub fn byte_length(&self) -> usize {
        self.number_of_cells() * std::mem::size_of::<f64>()
    }

    /// Flat row-major index, or `None` if any axis index is out of range
    pub fn cell_index(&self, ix: usize, iy: usize, iz: usize) -> Option<usize> {
        if ix >= self.nx || iy >= self.ny || iz >= self.nz {
            return None;
        }
        Some(ix * self.ny * self.nz + iy * self.nz + iz)
    }
}

impl std::fmt::Display for BinCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)
    }
}

/// Immutable voxel grid of strictly positive importance values
///
/// Built once per run and then only read, so a single field is typically
/// wrapped in an `Arc` and shared by every worker thread.
///
/// ```rust
/// # use vrtools_importance::{BinCounts, ImportanceField};
/// let bins = BinCounts::new(2, 1, 1).unwrap();
/// let field = ImportanceField::from_values(bins, vec![1.0, 4.0]).unwrap();
///
/// assert_eq!(field.importance(1), Some(4.0));
/// assert_eq!(field.importance(2), None);
///
/// // zero importance is never valid
/// assert!(ImportanceField::from_values(bins, vec![1.0, 0.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceField {
    bins: BinCounts,
    values: Vec<f64>,
}

impl ImportanceField {
    /// Validate values against the bin counts
    ///
    /// Fails if the number of values does not match the number of cells, or
    /// if any value is zero, negative, or not finite.
    pub fn from_values(bins: BinCounts, values: Vec<f64>) -> Result<Self> {
        if values.len() != bins.number_of_cells() {
            return Err(Error::LengthMismatch {
                expected: bins.number_of_cells(),
                found: values.len(),
            });
        }

        if let Some((index, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(Error::InvalidImportance {
                index,
                value: *value,
            });
        }

        Ok(Self { bins, values })
    }

    /// Importance at a flat cell index
    pub fn importance(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn bins(&self) -> BinCounts {
        self.bins
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of voxels
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated field, kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Smallest and largest importance in the field
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
    }
}

impl std::fmt::Display for ImportanceField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (lo, hi) = self.range();
        writeln!(f, "ImportanceField {{")?;
        writeln!(f, "    cells: {} ({})", self.len(), self.bins)?;
        writeln!(f, "    min: {lo:.5e}")?;
        writeln!(f, "    max: {hi:.5e}")?;
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bins_rejected() {
        assert!(matches!(
            BinCounts::new(2, 0, 1),
            Err(Error::ZeroBins { axis: 'y' })
        ));
    }

    #[test]
    fn row_major_ordering() {
        let bins = BinCounts::new(2, 3, 4).unwrap();
        let mut expected = 0;
        for ix in 0..2 {
            for iy in 0..3 {
                for iz in 0..4 {
                    assert_eq!(bins.cell_index(ix, iy, iz), Some(expected));
                    expected += 1;
                }
            }
        }
    }

    #[test]
    fn invalid_values() {
        let bins = BinCounts::new(3, 1, 1).unwrap();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            match ImportanceField::from_values(bins, vec![1.0, bad, 1.0]) {
                Err(Error::InvalidImportance { index, .. }) => assert_eq!(index, 1),
                other => panic!("{bad} accepted: {other:?}"),
            }
        }
        assert!(matches!(
            ImportanceField::from_values(bins, vec![1.0; 2]),
            Err(Error::LengthMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn range_of_values() {
        let bins = BinCounts::new(1, 2, 2).unwrap();
        let field = ImportanceField::from_values(bins, vec![2.0, 0.5, 8.0, 1.0]).unwrap();
        assert_eq!(field.range(), (0.5, 8.0));
    }
}
