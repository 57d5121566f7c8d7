//! Read and write operations for binary importance maps
//!
//! The file is a flat sequence of little-endian IEEE-754 doubles, one per
//! voxel, in x-major then y then z order. There is no header. The bin counts
//! come from the geometry definition of the biased volume.

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::field::{BinCounts, ImportanceField};

// external crates
use bincode::{deserialize, serialize};
use log::{debug, info};

const VALUE_BYTES: usize = std::mem::size_of::<f64>();

/// Deserialise a binary importance map
///
/// Returns a validated [ImportanceField] from the file at `path`, which must
/// hold exactly `bins.number_of_cells()` strictly positive values.
///
/// ```rust,no_run
/// # use vrtools_importance::{read_importance_file, BinCounts};
/// let bins = BinCounts::new(10, 10, 40).unwrap();
/// let field = read_importance_file("./importance.bin", bins).unwrap();
/// println!("{field}");
/// ```
pub fn read_importance_file<P: AsRef<Path>>(path: P, bins: BinCounts) -> Result<ImportanceField> {
    let path = path.as_ref();
    debug!("Reading importance map from {}", path.display());

    let file = File::open(path)?;
    check_length(file.metadata()?.len(), bins)?;
    let field = read_importance(BufReader::new(file), bins)?;

    let (lo, hi) = field.range();
    info!(
        "Importance map of {} elements ({bins}), range {lo:.3e} to {hi:.3e}",
        field.len()
    );
    Ok(field)
}

/// Deserialise an importance map from any byte source
pub fn read_importance<R: Read>(reader: R, bins: BinCounts) -> Result<ImportanceField> {
    // one byte past the map is enough to detect trailing data
    let limit = bins.byte_length() as u64 + 1;
    let mut bytes = Vec::new();
    reader.take(limit).read_to_end(&mut bytes)?;
    check_length(bytes.len() as u64, bins)?;

    let values = bytes
        .chunks_exact(VALUE_BYTES)
        .map(|chunk| deserialize::<f64>(chunk))
        .collect::<core::result::Result<Vec<f64>, _>>()?;

    ImportanceField::from_values(bins, values)
}

/// Compare a byte count against the size of a map for `bins`
fn check_length(length: u64, bins: BinCounts) -> Result<()> {
    let expected = bins.number_of_cells();

    // a partial final value counts as missing
    let found = length / VALUE_BYTES as u64;
    if found < expected as u64 {
        return Err(Error::Truncated {
            expected,
            found: found as usize,
        });
    }
    if length != bins.byte_length() as u64 {
        return Err(Error::TrailingData { expected });
    }
    Ok(())
}

/// Serialise an importance map in the same layout expected by the reader
pub fn write_importance_file<P: AsRef<Path>>(field: &ImportanceField, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for value in field.values() {
        writer.write_all(&serialize(value)?)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_bytes(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn little_endian_doubles() {
        let bins = BinCounts::new(1, 1, 3).unwrap();
        let field = read_importance(as_bytes(&[1.0, 2.5, 1e-3]).as_slice(), bins).unwrap();
        assert_eq!(field.values(), &[1.0, 2.5, 1e-3]);
    }

    #[test]
    fn truncated_input() {
        let bins = BinCounts::new(2, 2, 1).unwrap();
        let mut bytes = as_bytes(&[1.0, 1.0, 1.0]);
        assert!(matches!(
            read_importance(bytes.as_slice(), bins),
            Err(Error::Truncated {
                expected: 4,
                found: 3
            })
        ));

        // half a value is still missing data
        bytes.extend_from_slice(&[0u8; 4]);
        assert!(matches!(
            read_importance(bytes.as_slice(), bins),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn trailing_data() {
        let bins = BinCounts::new(2, 1, 1).unwrap();
        let mut bytes = as_bytes(&[1.0, 1.0]);
        bytes.push(0);
        assert!(matches!(
            read_importance(bytes.as_slice(), bins),
            Err(Error::TrailingData { expected: 2 })
        ));
    }
}
