//! Required-column validation for the two sheet exports.
//!
//! Presence is binary per column; type correctness is the normalizer's job.

use crate::{error::SchemaError, source::RawTable};

pub const INVENTORY_SHEET: &str = "inventory";
pub const SALES_SHEET: &str = "sales";

/// Exact header names as they appear in the spreadsheet exports.
pub mod columns {
    pub const ITEM_ID: &str = "Item ID";
    pub const CATEGORY: &str = "Category";
    pub const PRODUCT_NAME: &str = "Product Name / Model";
    pub const SUPPLIER_PRICE: &str = "Supplier Price (Ksh)";
    pub const SELLING_PRICE: &str = "Selling Price (Ksh)";
    pub const BALANCE_STOCK: &str = "Balance Stock";

    pub const SALE_ITEM_ID: &str = "Item ID / Product";
    pub const QTY_SOLD: &str = "Qty Sold";
    pub const SALE_DATE: &str = "Date";
    pub const PROFIT: &str = "Profit";
    pub const PAYMENT_METHOD: &str = "Payment Method";
    pub const INSTALLER: &str = "Installer/Referral";
    // Present in practice but not required; both default when absent.
    pub const TOTAL_SALE: &str = "Total Sale";
    pub const CUSTOMER_NAME: &str = "Customer Name";
}

pub const REQUIRED_INVENTORY_COLUMNS: &[&str] = &[
    columns::ITEM_ID,
    columns::CATEGORY,
    columns::PRODUCT_NAME,
    columns::SUPPLIER_PRICE,
    columns::SELLING_PRICE,
    columns::BALANCE_STOCK,
];

pub const REQUIRED_SALES_COLUMNS: &[&str] = &[
    columns::SALE_ITEM_ID,
    columns::QTY_SOLD,
    columns::SALE_DATE,
    columns::PROFIT,
    columns::PAYMENT_METHOD,
    columns::INSTALLER,
];

/// Fail fast on the first absent column, naming the sheet. Pure check with
/// no side effects.
pub fn validate_columns(
    table: &RawTable,
    required: &[&str],
    sheet: &'static str,
) -> Result<(), SchemaError> {
    for column in required {
        if table.column_index(column).is_none() {
            return Err(SchemaError::MissingColumn {
                sheet,
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}
