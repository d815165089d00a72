//! Line-item row filtering

use crate::ingest::types::Row;

use super::columns::ResolvedColumns;

/// Values treated as "no value" in a primary-key cell (compared case-insensitively)
const NULL_TOKENS: &[&str] = &["", "nan", "none"];

/// True if a trimmed cell carries a real value
pub fn is_present(cell: &str) -> bool {
    let trimmed = cell.trim();
    !NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Rows whose primary-key cell is present, original order preserved
///
/// If the primary-key column itself is absent every row is rejected.
pub fn valid_rows<'t>(rows: &'t [Row], columns: &ResolvedColumns, primary_key: &str) -> Vec<&'t Row> {
    let Some(pk_col) = columns.index(primary_key) else {
        return Vec::new();
    };

    rows.iter().filter(|row| is_present(row.get(pk_col))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{ColumnMapping, Table};

    #[test]
    fn test_null_tokens() {
        assert!(!is_present(""));
        assert!(!is_present("   "));
        assert!(!is_present("nan"));
        assert!(!is_present("NaN"));
        assert!(!is_present(" NONE "));
        assert!(is_present("0"));
        assert!(is_present("nanometer"));
    }

    #[test]
    fn test_valid_rows_keeps_order() {
        let table = Table::from_strings(
            &["Item Code", "Qty"],
            &[&["B", "1"], &["nan", "2"], &["", "3"], &["A", "4"], &["None", "5"]],
        );
        let mapping = ColumnMapping::new().with("item", "Item Code");
        let columns = ResolvedColumns::resolve_all(&table, &mapping);

        let rows = valid_rows(table.rows(), &columns, "item");
        let codes: Vec<_> = rows.iter().map(|r| r.get(0)).collect();
        assert_eq!(codes, vec!["B", "A"]);
    }

    #[test]
    fn test_missing_primary_key_column_rejects_all() {
        let table = Table::from_strings(&["Qty"], &[&["1"]]);
        let mapping = ColumnMapping::new().with("item", "Item Code");
        let columns = ResolvedColumns::resolve_all(&table, &mapping);
        assert!(valid_rows(table.rows(), &columns, "item").is_empty());
    }
}
