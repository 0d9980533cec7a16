use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One inventory row after normalization. Immutable for the session; rows
/// without an identifier never make it this far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRecord {
    pub item_id: String,
    pub category: String,
    pub product_name: String,
    pub supplier_price: Decimal,
    pub selling_price: Decimal,
    pub balance_stock: i64,
}

/// One sales row after normalization. The sale date is mandatory; rows with
/// an unparseable date are dropped before this type is constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub item_id: String,
    pub sale_date: NaiveDate,
    pub quantity_sold: i64,
    pub profit: Decimal,
    pub revenue: Decimal,
    pub payment_method: String,
    pub installer: String,
    pub customer_name: String,
}

/// A sale enriched with its inventory row's descriptive fields. Orphaned
/// sales (no matching inventory identifier) keep `None` for the product
/// fields and fall into the "Unknown" category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSale {
    pub sale: SaleRecord,
    pub category: String,
    pub product_name: Option<String>,
    pub supplier_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
}

/// The session's working dataset: unfiltered inventory plus the merged sales
/// table. Never mutated after load; filters derive read-only views.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inventory: Vec<InventoryRecord>,
    pub sales: Vec<MergedSale>,
}
