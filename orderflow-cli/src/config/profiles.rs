//! Built-in ingest profiles
//!
//! `po`: one purchase order per file, identifier and date from the file name.
//! `grn`: consolidated goods-receipt report, many GRNs per file keyed by the
//! `po_number` column.

use serde::{Deserialize, Serialize};

use crate::ingest::types::{
    AggregationMode, ColumnMapping, FieldSource, IngestConfig, OutputField,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Purchase orders (single-group totals)
    Po,
    /// Consolidated goods-receipt reports (totals per GRN)
    Grn,
}

impl Profile {
    pub fn label(&self) -> &'static str {
        match self {
            Profile::Po => "po",
            Profile::Grn => "grn",
        }
    }

    pub fn ingest_config(&self) -> IngestConfig {
        match self {
            Profile::Po => po(),
            Profile::Grn => grn(),
        }
    }

    /// Attachment / file-name substring the profile's documents carry
    pub fn name_filter(&self) -> Option<&'static str> {
        match self {
            Profile::Po => None,
            Profile::Grn => Some("Consolidated-GRN-Report"),
        }
    }
}

fn po() -> IngestConfig {
    let columns = ColumnMapping::new()
        .with("product_number", "Item Code")
        .with("product_name", "Product Description")
        .with("quantity_ordered", "Quantity")
        .with("price_per_unit", "Basic Cost Price")
        .with("mrp", "MRP")
        .with("base_price", "Landing Rate")
        .with("amount_per_line_amount", "Total Amount");

    IngestConfig {
        name: "PO".to_string(),
        columns,
        required_fields: vec!["product_number".to_string(), "product_name".to_string()],
        primary_key_field: "product_number".to_string(),
        mode: AggregationMode::Single,
        group_key_field: None,
        quantity_field: "quantity_ordered".to_string(),
        amount_field: "amount_per_line_amount".to_string(),
        output: vec![
            OutputField::derived("po_number", "PO Number", FieldSource::Identifier),
            OutputField::derived("po_date", "PO Date", FieldSource::Date),
            OutputField::row("product_number", "Product Number"),
            OutputField::row("product_name", "Product Name"),
            OutputField::row("quantity_ordered", "Qty"),
            OutputField::row("price_per_unit", "price_per_unit"),
            OutputField::row("mrp", "MRP"),
            OutputField::row("base_price", "Base Price"),
            OutputField::row("amount_per_line_amount", "Total Line Amount"),
            OutputField::derived("total_items_in_po", "Total Items in PO", FieldSource::Count),
            OutputField::derived(
                "total_quantity_in_po",
                "Total Quantity in PO",
                FieldSource::SumQuantity,
            ),
            OutputField::derived("total_amount_of_po", "Total Amount of PO", FieldSource::SumAmount),
            OutputField::derived("source_file", "source_file", FieldSource::SourceFile),
        ],
    }
}

fn grn() -> IngestConfig {
    let columns = ColumnMapping::new()
        .with("item_code", "Item Code")
        .with("po_number", "po_number")
        .with("product_upc", "Product UPC")
        .with("product_description", "Product Description")
        .with("mrp", "MRP")
        .with("tax_amount", "Tax Amount")
        .with("landing_rate_po", "Landing Rate - PO")
        .with("landing_rate_grn", "Landing Rate - GRN")
        .with("quantity_po", "Quantity - PO")
        .with("quantity_grn", "Quantity - GRN")
        .with("fill_rate", "Fill rate (%)")
        .with("total_grn_amount", "Total GRN Amount")
        .with("gmv_loss", "GMV Loss");

    let row = |name: &str, header: &str| OutputField::row(name, header);

    IngestConfig {
        name: "GRN".to_string(),
        columns,
        required_fields: vec![
            "item_code".to_string(),
            "product_description".to_string(),
            "po_number".to_string(),
        ],
        primary_key_field: "item_code".to_string(),
        mode: AggregationMode::Keyed,
        group_key_field: Some("po_number".to_string()),
        quantity_field: "quantity_grn".to_string(),
        amount_field: "total_grn_amount".to_string(),
        output: vec![
            OutputField::derived("grn_number", "GRN Number", FieldSource::Identifier),
            OutputField::derived("received_date", "Received Date", FieldSource::Date),
            row("item_code", "Item Code"),
            row("product_upc", "Product UPC"),
            row("product_description", "Product Description"),
            row("mrp", "MRP"),
            row("tax_amount", "Tax Amount"),
            row("landing_rate_po", "Landing Rate - PO"),
            row("landing_rate_grn", "Landing Rate - GRN"),
            row("quantity_po", "Qty - PO"),
            row("quantity_grn", "Qty - GRN"),
            row("fill_rate", "Fill Rate (%)"),
            row("total_grn_amount", "Total GRN Amount"),
            row("gmv_loss", "GMV Loss"),
            OutputField::derived("total_items_in_grn", "Total Items in GRN", FieldSource::Count),
            OutputField::derived(
                "total_quantity_in_grn",
                "Total Quantity in GRN",
                FieldSource::SumQuantity,
            ),
            OutputField::derived("total_amount_of_grn", "Total Amount of GRN", FieldSource::SumAmount),
            OutputField::derived("source_file", "source_file", FieldSource::SourceFile),
        ],
    }
}
