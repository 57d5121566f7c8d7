//! Voxelised importance maps
//!
//! An importance map assigns a strictly positive importance to every voxel of
//! a box divided into `nx*ny*nz` bins. Maps are loaded once from a headerless
//! binary file of doubles, validated, and then shared read-only.
//!
//! ```rust
//! # use vrtools_importance::{BinCounts, CellIndexResolver, ImportanceField};
//! let bins = BinCounts::new(2, 2, 1).unwrap();
//! let field = ImportanceField::from_values(bins, vec![1.0, 2.0, 4.0, 8.0]).unwrap();
//! let resolver = CellIndexResolver::new(bins);
//!
//! let index = resolver.resolve([1, 0, 0]).unwrap();
//! assert_eq!(field.importance(index), Some(4.0));
//! ```

// Split into subfiles for development, but anything important is re-exported
mod error;
mod field;
mod reader;
mod resolver;

// Inline anything important for a nice public API
#[doc(inline)]
pub use field::{BinCounts, ImportanceField};

#[doc(inline)]
pub use reader::{read_importance, read_importance_file, write_importance_file};

#[doc(inline)]
pub use resolver::{CellIndexResolver, Placement};

#[doc(inline)]
pub use error::{Error, Result};
