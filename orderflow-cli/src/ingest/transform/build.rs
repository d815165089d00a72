//! Assemble fixed-schema output records

use crate::ingest::types::{FieldSource, IngestConfig, OutputRecord, Row};

use super::aggregate::{AggregateGroup, Aggregates, Grouping};
use super::columns::ResolvedColumns;
use super::numeric::format_decimal;

/// Document-level values shared by every record of a document
#[derive(Debug, Clone, Copy)]
pub struct DocumentMeta<'a> {
    pub identifier: &'a str,
    pub date: &'a str,
    pub source_file: &'a str,
}

/// One record per valid row, every schema field always present
pub fn build_records(
    rows: &[&Row],
    columns: &ResolvedColumns,
    config: &IngestConfig,
    grouping: Grouping<'_>,
    aggregates: &Aggregates,
    meta: DocumentMeta<'_>,
) -> Vec<OutputRecord> {
    rows.iter()
        .map(|row| {
            let key = grouping.key_of(row);
            let group = aggregates.get(&key);
            let identifier = match grouping {
                Grouping::Document(_) => meta.identifier,
                Grouping::Column(_) => key.as_str(),
            };

            let mut record = OutputRecord::new();
            for field in &config.output {
                let value = match field.source {
                    FieldSource::Row => field
                        .logical_field()
                        .and_then(|logical| columns.value(row, logical))
                        .map(|v| v.trim().to_string())
                        .unwrap_or_default(),
                    FieldSource::Identifier => identifier.to_string(),
                    FieldSource::Date => meta.date.to_string(),
                    FieldSource::Count => total(group, |g| g.count.to_string()),
                    FieldSource::SumQuantity => total(group, |g| format_decimal(g.sum_quantity)),
                    FieldSource::SumAmount => total(group, |g| format_decimal(g.sum_amount)),
                    FieldSource::SourceFile => meta.source_file.to_string(),
                };
                record.push(field.name.clone(), value);
            }
            record
        })
        .collect()
}

fn total(group: Option<&AggregateGroup>, render: impl Fn(&AggregateGroup) -> String) -> String {
    group.map(render).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::testutil::{grn_config, po_config};
    use crate::ingest::transform::aggregate::aggregate;
    use crate::ingest::types::Table;

    fn build(table: &Table, config: &IngestConfig, meta: DocumentMeta<'_>) -> Vec<OutputRecord> {
        let columns = ResolvedColumns::resolve_all(table, &config.columns);
        let rows: Vec<&Row> = table.rows().iter().collect();
        let grouping = Grouping::from_config(config, &columns, meta.source_file);
        let aggs = aggregate(&rows, &columns, config, grouping);
        build_records(&rows, &columns, config, grouping, &aggs, meta)
    }

    #[test]
    fn test_single_mode_records_carry_document_totals() {
        let table = Table::from_strings(
            &["Item Code", "Product Description", "Quantity", "Total Amount"],
            &[&["A", " Rice ", "2", "10"], &["B", "Dal", "3", "20.5"]],
        );
        let meta = DocumentMeta {
            identifier: "PO1",
            date: "2026-02-11",
            source_file: "PO1_20260211_000000.xlsx",
        };
        let records = build(&table, &po_config(), meta);

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.get("po_number"), Some("PO1"));
        assert_eq!(first.get("po_date"), Some("2026-02-11"));
        assert_eq!(first.get("product_name"), Some("Rice"));
        assert_eq!(first.get("total_items_in_po"), Some("2"));
        assert_eq!(first.get("total_quantity_in_po"), Some("5"));
        assert_eq!(first.get("total_amount_of_po"), Some("30.5"));
        assert_eq!(first.get("source_file"), Some("PO1_20260211_000000.xlsx"));
        // Not in the sheet: still present, empty
        assert_eq!(first.get("mrp"), Some(""));
        assert_eq!(first.len(), po_config().output.len());
    }

    #[test]
    fn test_keyed_mode_records_carry_own_group_totals() {
        let table = Table::from_strings(
            &["Item Code", "Product Description", "po_number", "Quantity - GRN", "Total GRN Amount"],
            &[
                &["I1", "Salt", "A", "1", "10"],
                &["I2", "Sugar", "A", "2", "20"],
                &["I3", "Tea", "B", "7", "70"],
            ],
        );
        let meta = DocumentMeta {
            identifier: "",
            date: "2026-02-10",
            source_file: "Consolidated-GRN-Report_20260210_143022.xlsx",
        };
        let records = build(&table, &grn_config(), meta);

        assert_eq!(records.len(), 3);
        let summary: Vec<_> = records
            .iter()
            .map(|r| {
                (
                    r.get("grn_number").unwrap(),
                    r.get("total_items_in_grn").unwrap(),
                    r.get("total_quantity_in_grn").unwrap(),
                    r.get("total_amount_of_grn").unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![("A", "2", "3", "30"), ("A", "2", "3", "30"), ("B", "1", "7", "70")]
        );
        assert!(records.iter().all(|r| r.get("received_date") == Some("2026-02-10")));
    }
}
