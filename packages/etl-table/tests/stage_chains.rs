//! Integration tests for composed stage chains.

use std::cell::Cell;

use etl_table::{
    to_csv_bytes, CsvTable, MemoryTable, Row, SortOrder, Table, TableError, TableExt, Value,
};

fn text_row(values: &[&str]) -> Row {
    values.iter().map(|v| Value::from(*v)).collect()
}

fn planets_table() -> MemoryTable {
    let homeworlds = [
        "Tatooine", "Naboo", "Tatooine", "Alderaan", "Naboo", "Tatooine", "Stewjon", "Tatooine",
        "Naboo", "Alderaan",
    ];
    let rows = homeworlds
        .iter()
        .enumerate()
        .map(|(i, world)| vec![Value::from(format!("person {i}")), Value::from(*world)])
        .collect();
    MemoryTable::from_parts(["name", "homeworld"], rows).unwrap()
}

/// A table whose scans are counted, to observe re-execution.
struct CountingTable {
    inner: MemoryTable,
    scans: Cell<usize>,
}

impl Table for CountingTable {
    fn scan(&self) -> etl_table::Result<etl_table::Scan<'_>> {
        self.scans.set(self.scans.get() + 1);
        self.inner.scan()
    }
}

#[test]
fn test_group_count_rows_match_distinct_combinations() {
    let counts = planets_table().value_counts(["homeworld"]).cutout(["frequency"]);

    assert_eq!(counts.header().unwrap().names(), ["homeworld", "count"]);
    let rows = counts.rows().unwrap();
    assert_eq!(rows.len(), 4);

    let total: i64 = rows.iter().map(|r| r[1].as_i64().unwrap()).sum();
    assert_eq!(total, 10);
    assert_eq!(rows[0], vec![Value::from("Tatooine"), Value::Int(4)]);
}

#[test]
fn test_sort_then_limit_takes_first_sorted_rows() {
    let table = MemoryTable::from_parts(
        ["name"],
        vec![text_row(&["c"]), text_row(&["a"]), text_row(&["d"]), text_row(&["b"])],
    )
    .unwrap()
    .sort_by("name", SortOrder::Desc)
    .head(2);

    assert_eq!(table.rows().unwrap(), vec![text_row(&["d"]), text_row(&["c"])]);
}

#[test]
fn test_every_scan_reruns_upstream() {
    let source = CountingTable {
        inner: planets_table(),
        scans: Cell::new(0),
    };
    let chain = (&source).cutout(["name"]).head(3);

    chain.rows().unwrap();
    chain.rows().unwrap();
    assert_eq!(source.scans.get(), 2);

    let buffered = chain.materialize().unwrap();
    assert_eq!(source.scans.get(), 3);
    buffered.rows().unwrap();
    buffered.rows().unwrap();
    assert_eq!(source.scans.get(), 3);
}

#[test]
fn test_header_uniqueness_across_stages() {
    let table = planets_table()
        .add_field("count", |_| Ok(Value::Int(1)))
        .value_counts(["count"]);
    assert!(matches!(table.scan(), Err(TableError::DuplicateField { .. })));
}

#[test]
fn test_csv_round_trip_through_stages() {
    let bytes = to_csv_bytes(&planets_table().cutout(["name"])).unwrap();
    let reloaded = CsvTable::from_bytes(bytes)
        .value_counts(["homeworld"])
        .sort_by("homeworld", SortOrder::Asc);

    let worlds: Vec<String> = reloaded
        .rows()
        .unwrap()
        .iter()
        .map(|r| r[0].to_string())
        .collect();
    assert_eq!(worlds, ["Alderaan", "Naboo", "Stewjon", "Tatooine"]);
}

#[test]
fn test_boxed_chain_is_still_a_table() {
    let boxed = planets_table().head(1).boxed();
    assert_eq!(boxed.row_count().unwrap(), 1);
}
