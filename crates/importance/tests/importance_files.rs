//! Integration tests for importance map files

use std::io::Write;
use std::sync::Arc;

use rstest::{fixture, rstest};
use vrtools_importance::{
    read_importance_file, write_importance_file, BinCounts, CellIndexResolver, Error,
    ImportanceField,
};

#[fixture]
fn bins() -> BinCounts {
    BinCounts::new(3, 2, 2).unwrap()
}

#[fixture]
fn field(bins: BinCounts) -> ImportanceField {
    let values = (0..bins.number_of_cells())
        .map(|i| 2f64.powi(i as i32 % 4))
        .collect();
    ImportanceField::from_values(bins, values).unwrap()
}

#[rstest]
fn write_then_read(field: ImportanceField, bins: BinCounts) {
    let file = tempfile::NamedTempFile::new().unwrap();
    write_importance_file(&field, file.path()).unwrap();

    let loaded = read_importance_file(file.path(), bins).unwrap();
    assert_eq!(loaded, field);
    assert_eq!(std::fs::metadata(file.path()).unwrap().len(), 12 * 8);
}

#[rstest]
#[case(BinCounts::new(3, 2, 1).unwrap())]
#[case(BinCounts::new(4, 2, 2).unwrap())]
fn bins_must_match_file(field: ImportanceField, #[case] wrong: BinCounts) {
    let file = tempfile::NamedTempFile::new().unwrap();
    write_importance_file(&field, file.path()).unwrap();

    match read_importance_file(file.path(), wrong) {
        Err(Error::TrailingData { expected }) => assert_eq!(expected, 6),
        Err(Error::Truncated { expected, found }) => {
            assert_eq!(expected, 16);
            assert_eq!(found, 12);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[rstest]
fn negative_value_in_file(bins: BinCounts) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..bins.number_of_cells() {
        let value: f64 = if i == 7 { -1.0 } else { 1.0 };
        file.write_all(&value.to_le_bytes()).unwrap();
    }

    assert!(matches!(
        read_importance_file(file.path(), bins),
        Err(Error::InvalidImportance { index: 7, .. })
    ));
}

#[rstest]
fn missing_file(bins: BinCounts) {
    assert!(matches!(
        read_importance_file("./not/a/real/importance.bin", bins),
        Err(Error::IOError(_))
    ));
}

#[rstest]
fn shared_between_threads(field: ImportanceField, bins: BinCounts) {
    let shared = Arc::new(field);
    let resolver = CellIndexResolver::new(bins);

    let handles = (0..4)
        .map(|_| {
            let field = Arc::clone(&shared);
            std::thread::spawn(move || {
                let index = resolver.resolve([2, 1, 1]).unwrap();
                field.importance(index).unwrap()
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 8.0);
    }
}

#[rstest]
#[case(10_000_000, 10_000_000, 10_000_000)]
#[case(usize::MAX, 2, 1)]
#[case(usize::MAX / 8 + 1, 1, 1)]
fn grid_too_large_to_address(#[case] nx: usize, #[case] ny: usize, #[case] nz: usize) {
    match BinCounts::new(nx, ny, nz) {
        Err(Error::TooManyCells { nx: x, ny: y, nz: z }) => assert_eq!((x, y, z), (nx, ny, nz)),
        other => panic!("unexpected result {other:?}"),
    }
}

#[rstest]
fn huge_grid_with_small_file_is_truncated(field: ImportanceField) {
    let file = tempfile::NamedTempFile::new().unwrap();
    write_importance_file(&field, file.path()).unwrap();

    let huge = BinCounts::new(1 << 16, 1 << 16, 1 << 8).unwrap();
    match read_importance_file(file.path(), huge) {
        Err(Error::Truncated { expected, found }) => {
            assert_eq!(expected, 1 << 40);
            assert_eq!(found, 12);
        }
        other => panic!("unexpected result {other:?}"),
    }
}
