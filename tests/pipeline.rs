use std::{fs, path::PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sales_insight::{
    aggregate::{self, LOW_STOCK_THRESHOLD, Staleness},
    filter::{FilterOutcome, ReportFilter},
    model::Dataset,
    reconcile,
    source::SheetSource,
};
use tempfile::tempdir;

const INVENTORY_HEADER: &str =
    "Item ID,Category,Product Name / Model,Supplier Price (Ksh),Selling Price (Ksh),Balance Stock";
const SALES_HEADER: &str =
    "Item ID / Product,Qty Sold,Date,Profit,Payment Method,Installer/Referral,Total Sale,Customer Name";

fn write_sheet(dir: &tempfile::TempDir, name: &str, header: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("{header}\n{body}")).expect("write sheet");
    path
}

fn load(inventory_body: &str, sales_body: &str) -> anyhow::Result<Dataset> {
    let dir = tempdir().expect("temp dir");
    let inventory = write_sheet(&dir, "inventory.csv", INVENTORY_HEADER, inventory_body);
    let sales = write_sheet(&dir, "sales.csv", SALES_HEADER, sales_body);
    reconcile::load_dataset(&SheetSource::File(inventory), &SheetSource::File(sales))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn worked_example_end_to_end() {
    let dataset = load(
        "A1,Speakers,PS-200,1000,1500,3\n",
        "A1,2,2024-01-10,500,Cash,Bob,3000,Jane\n",
    )
    .expect("load dataset");

    assert_eq!(dataset.inventory.len(), 1);
    assert_eq!(dataset.sales.len(), 1);
    assert_eq!(dataset.sales[0].product_name.as_deref(), Some("PS-200"));

    let summary = aggregate::sales_summary(&dataset.sales);
    assert_eq!(summary.total_revenue, Decimal::from(3000));
    assert_eq!(summary.total_profit, Decimal::from(500));
    assert_eq!(summary.items_sold, 2);
    assert!((summary.avg_profit_margin - 16.666_666_666_666_668).abs() < 1e-6);

    let valuation = aggregate::stock_valuation(&dataset.inventory);
    assert_eq!(valuation.at_cost, Decimal::from(3000));
    assert_eq!(valuation.at_retail, Decimal::from(4500));

    let low = aggregate::low_stock(&dataset.inventory, LOW_STOCK_THRESHOLD);
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].item_id, "A1");
}

#[test]
fn malformed_rows_degrade_without_failing_the_load() {
    let dataset = load(
        // Second row has no identifier and is dropped; third has junk numerics.
        "A1,Speakers,PS-200,1000,1500,3\n,Cables,RCA,50,80,10\nB2,Cables,HDMI,abc,,x\n",
        // Orphan sale kept; dateless row dropped; junk profit defaults to 0.
        "A1,2,2024-01-10,500,Cash,Bob,3000,Jane\nZZ,1,2024-01-11,100,Cash,Ann,700,Kim\nA1,1,,100,Cash,Bob,700,Jane\nB2,1,2024-01-12,oops,Card,Ann,150,Kim\n",
    )
    .expect("load dataset");

    assert_eq!(dataset.inventory.len(), 2);
    assert_eq!(dataset.inventory[1].supplier_price, Decimal::ZERO);
    assert_eq!(dataset.inventory[1].balance_stock, 0);

    // Join preserves every dated, identified sale exactly once.
    assert_eq!(dataset.sales.len(), 3);
    let orphan = dataset
        .sales
        .iter()
        .find(|s| s.sale.item_id == "ZZ")
        .expect("orphan sale kept");
    assert_eq!(orphan.category, "Unknown");
    assert_eq!(orphan.product_name, None);

    let junk_profit = dataset
        .sales
        .iter()
        .find(|s| s.sale.item_id == "B2")
        .expect("junk profit sale");
    assert_eq!(junk_profit.sale.profit, Decimal::ZERO);
}

#[test]
fn missing_required_column_aborts_the_load() {
    let dir = tempdir().expect("temp dir");
    let inventory = write_sheet(
        &dir,
        "inventory.csv",
        INVENTORY_HEADER,
        "A1,Speakers,PS-200,1000,1500,3\n",
    );
    let sales = write_sheet(
        &dir,
        "sales.csv",
        "Item ID / Product,Qty Sold,Date",
        "A1,2,2024-01-10\n",
    );
    let err = reconcile::load_dataset(&SheetSource::File(inventory), &SheetSource::File(sales))
        .expect_err("schema failure");
    assert!(
        err.to_string()
            .contains("sales sheet is missing required column 'Profit'")
    );
}

#[test]
fn duplicate_inventory_identifiers_abort_the_load() {
    let err = load(
        "A1,Speakers,PS-200,1000,1500,3\nA1,Cables,RCA,50,80,10\n",
        "A1,2,2024-01-10,500,Cash,Bob,3000,Jane\n",
    )
    .expect_err("duplicate identifier");
    assert!(err.to_string().contains("duplicate identifier 'A1'"));
}

#[test]
fn filters_cascade_down_to_an_explicit_empty_signal() {
    let dataset = load(
        "A1,Speakers,PS-200,1000,1500,3\nB2,Cables,RCA,50,80,10\n",
        "A1,2,2024-01-10,500,Cash,Bob,3000,Jane\nB2,4,2024-02-05,120,Card,Ann,320,Kim\n",
    )
    .expect("load dataset");

    let january = ReportFilter::date_range(day(2024, 1, 1), day(2024, 1, 31));
    match january.clone().apply(&dataset.sales) {
        FilterOutcome::Matched(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].category, "Speakers");
        }
        FilterOutcome::Empty => panic!("expected January sales"),
    }

    let mismatch = january.with_categories(["Cables".to_string()]);
    assert_eq!(mismatch.apply(&dataset.sales), FilterOutcome::Empty);
}

#[test]
fn weekly_trend_orders_monday_buckets_across_the_pipeline() {
    let dataset = load(
        "A1,Speakers,PS-200,1000,1500,3\n",
        // 2024-01-09 and 2024-01-12 share the week of Monday 2024-01-08;
        // 2024-01-22 starts a later week.
        "A1,1,2024-01-12,200,Cash,Bob,600,Jane\nA1,1,2024-01-09,100,Cash,Bob,500,Jane\nA1,1,2024-01-22,300,Cash,Bob,700,Jane\n",
    )
    .expect("load dataset");

    let trend = aggregate::weekly_profit(&dataset.sales);
    assert_eq!(
        trend,
        vec![
            (day(2024, 1, 8), Decimal::from(300)),
            (day(2024, 1, 22), Decimal::from(300)),
        ]
    );
}

#[test]
fn staleness_is_anchored_to_the_latest_sale_in_the_dataset() {
    let dataset = load(
        "A1,Speakers,PS-200,1000,1500,3\nB2,Cables,RCA,50,80,10\nC3,Cables,HDMI,60,90,2\n",
        // Latest sale 2024-06-01; A1 last sold 91 days earlier, B2 on the anchor date.
        "A1,1,2024-03-02,100,Cash,Bob,500,Jane\nB2,1,2024-03-03,100,Cash,Bob,500,Jane\nB2,1,2024-06-01,100,Cash,Bob,500,Jane\n",
    )
    .expect("load dataset");

    let rows = aggregate::stock_staleness(&dataset.inventory, &dataset.sales);
    assert_eq!(rows[0].staleness, Staleness::DaysSinceLastSale(91));
    assert_eq!(rows[1].staleness, Staleness::DaysSinceLastSale(0));
    assert_eq!(rows[2].staleness, Staleness::NeverSold);

    let slow: Vec<&str> = aggregate::slow_moving_stock(&dataset.inventory, &dataset.sales)
        .into_iter()
        .map(|row| row.item.item_id.as_str())
        .collect();
    assert_eq!(slow, vec!["A1", "C3"]);
}

#[test]
fn top_rankings_never_pad_missing_groups() {
    let dataset = load(
        "A1,Speakers,PS-200,1000,1500,3\nB2,Cables,RCA,50,80,10\n",
        "A1,2,2024-01-10,500,Cash,Bob,3000,Jane\nB2,4,2024-01-11,120,Card,Ann,320,Kim\n",
    )
    .expect("load dataset");

    let top = aggregate::top_products_by_profit(&dataset.sales, 5);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0], ("PS-200".to_string(), Decimal::from(500)));

    let customers = aggregate::top_customers_by_profit(&dataset.sales, 10);
    assert_eq!(customers.len(), 2);
}
