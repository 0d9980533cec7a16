//! Pure aggregation functions over a record set (filtered sales or the
//! unfiltered inventory).
//!
//! Everything here is stateless: callers pass a slice and get back scalars
//! or ordered sequences. Group-by results use ascending key order as the
//! baseline so output is deterministic; rankings re-sort by value.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Weekday};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::model::{InventoryRecord, MergedSale};

pub const LOW_STOCK_THRESHOLD: i64 = 5;
pub const SLOW_MOVING_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub items_sold: i64,
    /// Percentage; exactly 0.0 when total revenue is zero.
    pub avg_profit_margin: f64,
}

pub fn sales_summary(sales: &[MergedSale]) -> SalesSummary {
    let total_revenue: Decimal = sales.iter().map(|s| s.sale.revenue).sum();
    let total_profit: Decimal = sales.iter().map(|s| s.sale.profit).sum();
    let items_sold: i64 = sales.iter().map(|s| s.sale.quantity_sold).sum();
    let avg_profit_margin = if total_revenue > Decimal::ZERO {
        (total_profit / total_revenue * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    } else {
        0.0
    };
    SalesSummary {
        total_revenue,
        total_profit,
        items_sold,
        avg_profit_margin,
    }
}

/// Monday that starts the calendar week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Profit summed into Monday-anchored weekly buckets, ascending by week
/// start. Weeks with no sales are omitted, not zero-filled.
pub fn weekly_profit(sales: &[MergedSale]) -> Vec<(NaiveDate, Decimal)> {
    let mut buckets: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in sales {
        *buckets.entry(week_start(record.sale.sale_date)).or_default() += record.sale.profit;
    }
    buckets.into_iter().collect()
}

fn group_sum_decimal<F>(sales: &[MergedSale], key: F) -> BTreeMap<String, Decimal>
where
    F: Fn(&MergedSale) -> Option<String>,
{
    let mut groups: BTreeMap<String, Decimal> = BTreeMap::new();
    for record in sales {
        if let Some(group) = key(record) {
            *groups.entry(group).or_default() += record.sale.profit;
        }
    }
    groups
}

/// Profit per installer/referral, ascending by value (horizontal-bar order).
pub fn profit_by_installer(sales: &[MergedSale]) -> Vec<(String, Decimal)> {
    let mut groups: Vec<(String, Decimal)> =
        group_sum_decimal(sales, |s| Some(s.sale.installer.clone()))
            .into_iter()
            .collect();
    groups.sort_by(|a, b| a.1.cmp(&b.1));
    groups
}

/// Profit per payment method, ascending key order.
pub fn profit_by_payment_method(sales: &[MergedSale]) -> Vec<(String, Decimal)> {
    group_sum_decimal(sales, |s| Some(s.sale.payment_method.clone()))
        .into_iter()
        .collect()
}

fn top_n<V: Ord + Copy>(groups: BTreeMap<String, V>, n: usize) -> Vec<(String, V)> {
    let mut items: Vec<(String, V)> = groups.into_iter().collect();
    // Stable sort: ties keep ascending key order from the map.
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items.truncate(n);
    items
}

/// Top `n` products by summed profit, descending. Orphaned sales have no
/// product name and are excluded from product rankings.
pub fn top_products_by_profit(sales: &[MergedSale], n: usize) -> Vec<(String, Decimal)> {
    top_n(group_sum_decimal(sales, |s| s.product_name.clone()), n)
}

/// Top `n` products by summed quantity sold, descending.
pub fn top_products_by_quantity(sales: &[MergedSale], n: usize) -> Vec<(String, i64)> {
    let mut groups: BTreeMap<String, i64> = BTreeMap::new();
    for record in sales {
        if let Some(product) = &record.product_name {
            *groups.entry(product.clone()).or_default() += record.sale.quantity_sold;
        }
    }
    top_n(groups, n)
}

/// Top `n` customers by summed profit, descending. Blank customer names form
/// their own bucket, matching the grouping policy for categorical text.
pub fn top_customers_by_profit(sales: &[MergedSale], n: usize) -> Vec<(String, Decimal)> {
    top_n(
        group_sum_decimal(sales, |s| Some(s.sale.customer_name.clone())),
        n,
    )
}

/// Inventory rows at or below the stock threshold.
pub fn low_stock(inventory: &[InventoryRecord], threshold: i64) -> Vec<&InventoryRecord> {
    inventory
        .iter()
        .filter(|item| item.balance_stock <= threshold)
        .collect()
}

/// How recently an item last sold, anchored to the dataset's latest sale
/// date rather than wall-clock time (the report is historical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    NeverSold,
    DaysSinceLastSale(i64),
}

impl Staleness {
    pub fn is_slow_moving(&self) -> bool {
        match self {
            Staleness::NeverSold => true,
            Staleness::DaysSinceLastSale(days) => *days > SLOW_MOVING_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessRow<'a> {
    pub item: &'a InventoryRecord,
    pub staleness: Staleness,
}

/// Classify every inventory row. With no sales at all, everything is
/// `NeverSold`.
pub fn stock_staleness<'a>(
    inventory: &'a [InventoryRecord],
    sales: &[MergedSale],
) -> Vec<StalenessRow<'a>> {
    let latest_overall = sales.iter().map(|s| s.sale.sale_date).max();
    let mut last_sale: HashMap<&str, NaiveDate> = HashMap::new();
    for record in sales {
        last_sale
            .entry(record.sale.item_id.as_str())
            .and_modify(|d| *d = (*d).max(record.sale.sale_date))
            .or_insert(record.sale.sale_date);
    }

    inventory
        .iter()
        .map(|item| {
            let staleness = match (latest_overall, last_sale.get(item.item_id.as_str())) {
                (Some(latest), Some(last)) => {
                    Staleness::DaysSinceLastSale((latest - *last).num_days())
                }
                _ => Staleness::NeverSold,
            };
            StalenessRow { item, staleness }
        })
        .collect()
}

/// The slow-moving subset: last sale more than [`SLOW_MOVING_DAYS`] before
/// the dataset's latest sale, or never sold.
pub fn slow_moving_stock<'a>(
    inventory: &'a [InventoryRecord],
    sales: &[MergedSale],
) -> Vec<StalenessRow<'a>> {
    stock_staleness(inventory, sales)
        .into_iter()
        .filter(|row| row.staleness.is_slow_moving())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockValuation {
    pub at_cost: Decimal,
    pub at_retail: Decimal,
}

/// Point-in-time valuation over the unfiltered inventory; independent of
/// any sales date filter.
pub fn stock_valuation(inventory: &[InventoryRecord]) -> StockValuation {
    let mut at_cost = Decimal::ZERO;
    let mut at_retail = Decimal::ZERO;
    for item in inventory {
        let stock = Decimal::from(item.balance_stock);
        at_cost += stock * item.supplier_price;
        at_retail += stock * item.selling_price;
    }
    StockValuation { at_cost, at_retail }
}
