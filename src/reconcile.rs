//! Reconciliation: the validate -> normalize -> join pipeline that produces
//! the session's working dataset.
//!
//! The join is a left outer join of sales against inventory on the trimmed
//! identifier: every normalized sale appears exactly once in the output.
//! Duplicate inventory identifiers would fan sales rows out, so they are
//! rejected up front as a schema failure. Any upstream failure aborts the
//! whole load; no partial dataset ever escapes.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::info;

use crate::{
    error::SchemaError,
    model::{Dataset, InventoryRecord, MergedSale, SaleRecord},
    normalize::{self, UNKNOWN_CATEGORY},
    schema::{
        self, INVENTORY_SHEET, REQUIRED_INVENTORY_COLUMNS, REQUIRED_SALES_COLUMNS, SALES_SHEET,
    },
    source::SheetSource,
};

/// Left-join normalized sales against inventory. The output length always
/// equals `sales.len()`.
pub fn merge(
    inventory: &[InventoryRecord],
    sales: Vec<SaleRecord>,
) -> Result<Vec<MergedSale>, SchemaError> {
    let mut by_id: HashMap<&str, &InventoryRecord> = HashMap::with_capacity(inventory.len());
    for record in inventory {
        if by_id.insert(record.item_id.as_str(), record).is_some() {
            return Err(SchemaError::DuplicateIdentifier {
                sheet: INVENTORY_SHEET,
                identifier: record.item_id.clone(),
            });
        }
    }

    let merged = sales
        .into_iter()
        .map(|mut sale| {
            // Joined values can reintroduce untrimmed strings; trim again on
            // the merged row.
            sale.payment_method = sale.payment_method.trim().to_string();
            sale.installer = sale.installer.trim().to_string();
            match by_id.get(sale.item_id.as_str()) {
                Some(inv) => MergedSale {
                    category: inv.category.trim().to_string(),
                    product_name: Some(inv.product_name.trim().to_string()),
                    supplier_price: Some(inv.supplier_price),
                    selling_price: Some(inv.selling_price),
                    sale,
                },
                None => MergedSale {
                    category: UNKNOWN_CATEGORY.to_string(),
                    product_name: None,
                    supplier_price: None,
                    selling_price: None,
                    sale,
                },
            }
        })
        .collect();
    Ok(merged)
}

/// Run the full pipeline against both sources. Fail-closed: either the
/// complete validated, normalized, merged dataset comes back, or an error.
pub fn load_dataset(
    inventory_source: &SheetSource,
    sales_source: &SheetSource,
) -> Result<Dataset> {
    let inventory_table = inventory_source
        .fetch(INVENTORY_SHEET)
        .context("Loading inventory sheet")?;
    let sales_table = sales_source
        .fetch(SALES_SHEET)
        .context("Loading sales sheet")?;

    schema::validate_columns(&inventory_table, REQUIRED_INVENTORY_COLUMNS, INVENTORY_SHEET)?;
    schema::validate_columns(&sales_table, REQUIRED_SALES_COLUMNS, SALES_SHEET)?;

    let inventory = normalize::normalize_inventory(&inventory_table);
    let sales = normalize::normalize_sales(&sales_table);
    let merged = merge(&inventory, sales)?;

    info!(
        "Loaded dataset: {} inventory row(s), {} merged sale(s)",
        inventory.len(),
        merged.len()
    );
    Ok(Dataset {
        inventory,
        sales: merged,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn inventory(item_id: &str, category: &str, product: &str) -> InventoryRecord {
        InventoryRecord {
            item_id: item_id.to_string(),
            category: category.to_string(),
            product_name: product.to_string(),
            supplier_price: Decimal::from(1000),
            selling_price: Decimal::from(1500),
            balance_stock: 3,
        }
    }

    fn sale(item_id: &str, day: u32) -> SaleRecord {
        SaleRecord {
            item_id: item_id.to_string(),
            sale_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            quantity_sold: 1,
            profit: Decimal::from(100),
            revenue: Decimal::from(500),
            payment_method: "Cash".to_string(),
            installer: "Bob".to_string(),
            customer_name: "Jane".to_string(),
        }
    }

    #[test]
    fn join_preserves_every_sale_exactly_once() {
        let inv = vec![inventory("A1", "Speakers", "PS-200")];
        let sales = vec![sale("A1", 10), sale("A1", 11), sale("ZZ", 12)];
        let merged = merge(&inv, sales).expect("merge");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn matched_sales_carry_inventory_fields() {
        let inv = vec![inventory("A1", "Speakers", "PS-200")];
        let merged = merge(&inv, vec![sale("A1", 10)]).expect("merge");
        assert_eq!(merged[0].category, "Speakers");
        assert_eq!(merged[0].product_name.as_deref(), Some("PS-200"));
        assert_eq!(merged[0].supplier_price, Some(Decimal::from(1000)));
    }

    #[test]
    fn orphaned_sales_fall_into_unknown_category() {
        let merged = merge(&[], vec![sale("GHOST", 10)]).expect("merge");
        assert_eq!(merged[0].category, UNKNOWN_CATEGORY);
        assert_eq!(merged[0].product_name, None);
        assert_eq!(merged[0].selling_price, None);
    }

    #[test]
    fn duplicate_inventory_identifier_is_rejected() {
        let inv = vec![
            inventory("A1", "Speakers", "PS-200"),
            inventory("A1", "Cables", "RCA"),
        ];
        let err = merge(&inv, Vec::new()).expect_err("duplicate identifier");
        assert_eq!(
            err.to_string(),
            "inventory sheet contains duplicate identifier 'A1'"
        );
    }

    #[test]
    fn merged_categorical_fields_are_trimmed() {
        let mut inv = inventory("A1", "Speakers", "PS-200");
        inv.category = " Speakers ".to_string();
        let mut s = sale("A1", 10);
        s.payment_method = " Cash ".to_string();
        let merged = merge(&[inv], vec![s]).expect("merge");
        assert_eq!(merged[0].category, "Speakers");
        assert_eq!(merged[0].sale.payment_method, "Cash");
    }
}
