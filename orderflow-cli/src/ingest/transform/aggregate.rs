//! Per-document and per-group totals

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::ingest::types::{AggregationMode, IngestConfig, Row};

use super::columns::ResolvedColumns;
use super::numeric::{NumericCell, parse_number};

/// How rows are partitioned into groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping<'a> {
    /// Every row belongs to one group named after the document
    Document(&'a str),
    /// Rows are keyed by the trimmed value of this column (None = column absent)
    Column(Option<usize>),
}

impl<'a> Grouping<'a> {
    pub fn from_config(config: &IngestConfig, columns: &ResolvedColumns, document_key: &'a str) -> Self {
        match (config.mode, config.active_group_key()) {
            (AggregationMode::Keyed, Some(field)) => Grouping::Column(columns.index(field)),
            _ => Grouping::Document(document_key),
        }
    }

    pub fn key_of(&self, row: &Row) -> String {
        match self {
            Grouping::Document(key) => key.to_string(),
            Grouping::Column(Some(idx)) => row.get(*idx).trim().to_string(),
            Grouping::Column(None) => String::new(),
        }
    }
}

/// Totals for one group of valid rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateGroup {
    pub key: String,
    pub count: usize,
    pub sum_quantity: Decimal,
    pub sum_amount: Decimal,
}

impl AggregateGroup {
    fn new(key: String) -> Self {
        AggregateGroup {
            key,
            count: 0,
            sum_quantity: Decimal::ZERO,
            sum_amount: Decimal::ZERO,
        }
    }
}

/// All groups of a document, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    groups: Vec<AggregateGroup>,
    index: HashMap<String, usize>,
    unparsable_numbers: usize,
}

impl Aggregates {
    pub fn groups(&self) -> &[AggregateGroup] {
        &self.groups
    }

    pub fn get(&self, key: &str) -> Option<&AggregateGroup> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Non-blank quantity/amount cells that were counted as 0, including
    /// values that would overflow their group's running total
    pub fn unparsable_numbers(&self) -> usize {
        self.unparsable_numbers
    }

    fn group_mut(&mut self, key: String) -> &mut AggregateGroup {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.groups.push(AggregateGroup::new(key.clone()));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }
}

/// Sum quantity and amount over `rows`, grouped per `grouping`
///
/// Never fails: missing columns, unparsable cells and values that would
/// overflow a running total contribute zero.
pub fn aggregate(
    rows: &[&Row],
    columns: &ResolvedColumns,
    config: &IngestConfig,
    grouping: Grouping<'_>,
) -> Aggregates {
    let qty_col = columns.index(&config.quantity_field);
    let amt_col = columns.index(&config.amount_field);

    let mut aggregates = Aggregates::default();
    let mut unparsable = 0;

    let mut read = |col: Option<usize>, row: &Row| -> Decimal {
        let Some(col) = col else {
            return Decimal::ZERO;
        };
        let cell = parse_number(row.get(col));
        if cell == NumericCell::Unparsable {
            log::debug!("Row {}: unparsable number '{}' counted as 0", row.number, row.get(col));
            unparsable += 1;
        }
        cell.value()
    };

    let mut overflowed = 0;
    for row in rows {
        let qty = read(qty_col, row);
        let amt = read(amt_col, row);

        let group = aggregates.group_mut(grouping.key_of(row));
        group.count += 1;
        for (sum, value) in [(&mut group.sum_quantity, qty), (&mut group.sum_amount, amt)] {
            if !accumulate(sum, value) {
                log::warn!("Row {}: value {} overflows the group total, counted as 0", row.number, value);
                overflowed += 1;
            }
        }
    }

    aggregates.unparsable_numbers = unparsable + overflowed;
    aggregates
}

/// Add `value` to `sum`; on overflow `sum` is left unchanged and false is returned
fn accumulate(sum: &mut Decimal, value: Decimal) -> bool {
    match sum.checked_add(value) {
        Some(total) => {
            *sum = total;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testutil::{grn_config, po_config};
    use crate::ingest::types::Table;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn run(table: &Table, config: &IngestConfig) -> Aggregates {
        let columns = ResolvedColumns::resolve_all(table, &config.columns);
        let rows: Vec<&Row> = table.rows().iter().collect();
        let grouping = Grouping::from_config(config, &columns, "doc.xlsx");
        aggregate(&rows, &columns, config, grouping)
    }

    #[test]
    fn test_single_group_totals() {
        let table = Table::from_strings(
            &["Item Code", "Quantity", "Total Amount"],
            &[&["A", "2", "10.50"], &["B", "3", "4.25"], &["C", "x", ""]],
        );
        let aggs = run(&table, &po_config());

        assert_eq!(aggs.len(), 1);
        let group = aggs.get("doc.xlsx").unwrap();
        assert_eq!(group.count, 3);
        assert_eq!(group.sum_quantity, dec("5"));
        assert_eq!(group.sum_amount, dec("14.75"));
        assert_eq!(aggs.unparsable_numbers(), 1);
    }

    #[test]
    fn test_single_group_sum_is_order_independent() {
        let rows = [&["A", "1.1", "0"][..], &["B", "2.2", "0"], &["C", "3.3", "0"]];
        let forward = Table::from_strings(&["Item Code", "Quantity", "Total Amount"], &rows);
        let mut reversed_rows = rows.to_vec();
        reversed_rows.reverse();
        let backward = Table::from_strings(&["Item Code", "Quantity", "Total Amount"], &reversed_rows);

        let config = po_config();
        let a = run(&forward, &config);
        let b = run(&backward, &config);
        assert_eq!(a.groups()[0].sum_quantity, dec("6.6"));
        assert_eq!(a.groups()[0].sum_quantity, b.groups()[0].sum_quantity);
    }

    #[test]
    fn test_keyed_groups() {
        let table = Table::from_strings(
            &["Item Code", "po_number", "Quantity - GRN", "Total GRN Amount"],
            &[&["I1", "A", "1", "100"], &["I2", "A", "2", "200"], &["I3", "B", "5", "50"]],
        );
        let aggs = run(&table, &grn_config());

        assert_eq!(aggs.len(), 2);
        let keys: Vec<_> = aggs.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B"]);

        let a = aggs.get("A").unwrap();
        assert_eq!((a.count, a.sum_quantity, a.sum_amount), (2, dec("3"), dec("300")));
        let b = aggs.get("B").unwrap();
        assert_eq!((b.count, b.sum_quantity, b.sum_amount), (1, dec("5"), dec("50")));
    }

    #[test]
    fn test_missing_numeric_columns_sum_to_zero() {
        let table = Table::from_strings(&["Item Code"], &[&["A"], &["B"]]);
        let aggs = run(&table, &po_config());
        let group = &aggs.groups()[0];
        assert_eq!(group.count, 2);
        assert_eq!(group.sum_quantity, Decimal::ZERO);
        assert_eq!(aggs.unparsable_numbers(), 0);
    }

    #[test]
    fn test_overflowing_values_count_as_zero() {
        let table = Table::from_strings(
            &["Item Code", "Quantity", "Total Amount"],
            &[
                &["A", "50000000000000000000000000000", "1"],
                &["B", "50000000000000000000000000000", "2"],
                &["C", "-1", "3"],
            ],
        );
        let aggs = run(&table, &po_config());

        let group = &aggs.groups()[0];
        assert_eq!(group.count, 3);
        assert_eq!(group.sum_quantity, dec("49999999999999999999999999999"));
        assert_eq!(group.sum_amount, dec("6"));
        assert_eq!(aggs.unparsable_numbers(), 1);
    }

    #[test]
    fn test_accumulate_keeps_sum_on_overflow() {
        let mut sum = Decimal::MAX;
        assert!(!accumulate(&mut sum, Decimal::ONE));
        assert_eq!(sum, Decimal::MAX);
        assert!(accumulate(&mut sum, Decimal::NEGATIVE_ONE));
        assert_eq!(sum, Decimal::MAX - Decimal::ONE);
    }

    #[test]
    fn test_empty_rows_produce_no_groups() {
        let table = Table::from_strings(&["Item Code"], &[]);
        assert!(run(&table, &po_config()).is_empty());
    }
}
