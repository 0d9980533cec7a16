//! Type normalization for validated raw tables.
//!
//! Policy: malformed business data degrades instead of halting the report.
//! Unparseable dates drop the row (a sale without a date cannot be bucketed),
//! unparseable numerics default to zero, and missing categorical text is
//! either defaulted (`Category` -> "Unknown") or left blank (payment method
//! and installer, where the blank string is its own grouping bucket).
//! Normalization never returns an error.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    model::{InventoryRecord, SaleRecord},
    schema::columns,
    source::RawTable,
};

pub const UNKNOWN_CATEGORY: &str = "Unknown";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Multi-format date parse; `None` for empty or unrecognized input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Lenient decimal parse: grouping separators and surrounding whitespace are
/// stripped before parsing. `None` for empty or unparseable input.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Non-negative decimal with a zero default for missing/unparseable input.
fn decimal_or_zero(raw: &str) -> Decimal {
    parse_decimal(raw)
        .filter(|d| !d.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

/// Signed decimal with a zero default (profit may legitimately be negative).
fn signed_decimal_or_zero(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Non-negative count: decimal parse truncated toward zero, floored at 0.
fn count_or_zero(raw: &str) -> i64 {
    parse_decimal(raw)
        .and_then(|d| d.trunc().to_i64())
        .map(|n| n.max(0))
        .unwrap_or(0)
}

/// Build typed inventory records. Rows with a blank identifier are dropped;
/// a blank category becomes "Unknown".
pub fn normalize_inventory(table: &RawTable) -> Vec<InventoryRecord> {
    let mut records = Vec::with_capacity(table.row_count());
    for row in &table.rows {
        let item_id = table.get(row, columns::ITEM_ID).trim();
        if item_id.is_empty() {
            continue;
        }
        let category = table.get(row, columns::CATEGORY).trim();
        records.push(InventoryRecord {
            item_id: item_id.to_string(),
            category: if category.is_empty() {
                UNKNOWN_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            product_name: table.get(row, columns::PRODUCT_NAME).trim().to_string(),
            supplier_price: decimal_or_zero(table.get(row, columns::SUPPLIER_PRICE)),
            selling_price: decimal_or_zero(table.get(row, columns::SELLING_PRICE)),
            balance_stock: count_or_zero(table.get(row, columns::BALANCE_STOCK)),
        });
    }
    debug!(
        "Normalized {} of {} inventory row(s)",
        records.len(),
        table.row_count()
    );
    records
}

/// Build typed sale records. Rows missing the identifier or a parseable sale
/// date are dropped; everything else defaults rather than failing.
pub fn normalize_sales(table: &RawTable) -> Vec<SaleRecord> {
    let mut records = Vec::with_capacity(table.row_count());
    for row in &table.rows {
        let item_id = table.get(row, columns::SALE_ITEM_ID).trim();
        if item_id.is_empty() {
            continue;
        }
        let Some(sale_date) = parse_date(table.get(row, columns::SALE_DATE)) else {
            continue;
        };
        records.push(SaleRecord {
            item_id: item_id.to_string(),
            sale_date,
            quantity_sold: count_or_zero(table.get(row, columns::QTY_SOLD)),
            profit: signed_decimal_or_zero(table.get(row, columns::PROFIT)),
            revenue: signed_decimal_or_zero(table.get(row, columns::TOTAL_SALE)),
            payment_method: table.get(row, columns::PAYMENT_METHOD).trim().to_string(),
            installer: table.get(row, columns::INSTALLER).trim().to_string(),
            customer_name: table.get(row, columns::CUSTOMER_NAME).trim().to_string(),
        });
    }
    debug!(
        "Normalized {} of {} sales row(s)",
        records.len(),
        table.row_count()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory_table(body: &str) -> RawTable {
        let csv = format!(
            "Item ID,Category,Product Name / Model,Supplier Price (Ksh),Selling Price (Ksh),Balance Stock\n{body}"
        );
        RawTable::parse(csv.as_bytes(), "inventory").expect("parse inventory csv")
    }

    fn sales_table(body: &str) -> RawTable {
        let csv = format!(
            "Item ID / Product,Qty Sold,Date,Profit,Payment Method,Installer/Referral,Total Sale,Customer Name\n{body}"
        );
        RawTable::parse(csv.as_bytes(), "sales").expect("parse sales csv")
    }

    #[test]
    fn parse_date_supports_multiple_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        assert_eq!(parse_date("2024-05-06"), Some(expected));
        assert_eq!(parse_date("06/05/2024"), Some(expected));
        assert_eq!(parse_date("2024/05/06"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn parse_decimal_strips_grouping_separators() {
        assert_eq!(parse_decimal("1,234.50"), Some("1234.50".parse().unwrap()));
        assert_eq!(parse_decimal(" 42 "), Some(Decimal::from(42)));
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn inventory_rows_without_identifier_are_dropped() {
        let table = inventory_table("A1,Speakers,PS-200,1000,1500,3\n ,Cables,RCA,50,80,10\n");
        let records = normalize_inventory(&table);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_id, "A1");
        assert!(records.len() <= table.row_count());
    }

    #[test]
    fn blank_inventory_category_defaults_to_unknown() {
        let table = inventory_table("A1, ,PS-200,1000,1500,3\n");
        let records = normalize_inventory(&table);
        assert_eq!(records[0].category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn unparseable_inventory_numerics_default_to_zero() {
        let table = inventory_table("A1,Speakers,PS-200,abc,,-4\n");
        let records = normalize_inventory(&table);
        assert_eq!(records[0].supplier_price, Decimal::ZERO);
        assert_eq!(records[0].selling_price, Decimal::ZERO);
        assert_eq!(records[0].balance_stock, 0);
    }

    #[test]
    fn sales_rows_with_bad_date_are_dropped() {
        let table = sales_table("A1,2,2024-01-10,500,Cash,Bob,3000,Jane\nA1,1,soon,100,Cash,Bob,900,Jane\n");
        let records = normalize_sales(&table);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].sale_date,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[test]
    fn blank_payment_and_installer_stay_blank() {
        let table = sales_table("A1,2,2024-01-10,500, , ,3000,\n");
        let records = normalize_sales(&table);
        assert_eq!(records[0].payment_method, "");
        assert_eq!(records[0].installer, "");
        assert_eq!(records[0].customer_name, "");
    }

    #[test]
    fn negative_profit_is_preserved_but_quantity_floors_at_zero() {
        let table = sales_table("A1,-3,2024-01-10,-250,Cash,Bob,0,Jane\n");
        let records = normalize_sales(&table);
        assert_eq!(records[0].profit, Decimal::from(-250));
        assert_eq!(records[0].quantity_sold, 0);
    }

    #[test]
    fn missing_revenue_column_defaults_to_zero() {
        let csv = "Item ID / Product,Qty Sold,Date,Profit,Payment Method,Installer/Referral\nA1,2,2024-01-10,500,Cash,Bob\n";
        let table = RawTable::parse(csv.as_bytes(), "sales").expect("parse sales csv");
        let records = normalize_sales(&table);
        assert_eq!(records[0].revenue, Decimal::ZERO);
    }
}
