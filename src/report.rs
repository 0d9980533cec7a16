//! The `report` command: authenticate, load the dataset through the cache,
//! apply the session's filter, and render every report section as terminal
//! tables.
//!
//! Fail-closed: authentication, fetch, schema, and join failures abort the
//! whole render pass. A filter that matches nothing prints a warning and
//! stops instead of rendering zero-valued metrics.

use anyhow::{Context, Result, bail};
use log::{info, warn};
use rust_decimal::Decimal;

use crate::{
    aggregate::{self, LOW_STOCK_THRESHOLD, Staleness},
    cache::DatasetCache,
    cli::ReportArgs,
    config::Config,
    filter::{self, FilterOutcome, ReportFilter},
    model::{Dataset, MergedSale},
    reconcile,
    session::Session,
    table::{Align, print_table},
};

pub fn execute(args: &ReportArgs) -> Result<()> {
    let config = Config::load(&args.config)?;

    let mut session = Session::new();
    let supplied = Config::supplied_password(args.password.as_deref())?;
    session.authenticate(config.shared_secret()?, &supplied);
    session.require_authenticated()?;

    let inventory_source = config.inventory_source()?;
    let sales_source = config.sales_source()?;
    let mut cache = DatasetCache::new(config.cache_ttl());
    let loader = || reconcile::load_dataset(&inventory_source, &sales_source);
    let dataset = if args.refresh {
        cache.refresh(loader)
    } else {
        cache.get_or_load(loader)
    }
    .context("Loading dashboard data")?;

    let report_filter = build_filter(args, &dataset.sales)?;
    info!(
        "Reporting from {} to {}",
        report_filter.start, report_filter.end
    );

    let filtered = match report_filter.apply(&dataset.sales) {
        FilterOutcome::Empty => {
            warn!("No data available for the selected filters");
            return Ok(());
        }
        FilterOutcome::Matched(rows) => rows,
    };

    render_sales_overview(&filtered, args, &config.currency);
    render_inventory_insights(&dataset, &config.currency);
    Ok(())
}

fn build_filter(args: &ReportArgs, sales: &[MergedSale]) -> Result<ReportFilter> {
    let Some((min_date, max_date)) = filter::date_bounds(sales) else {
        bail!("Sales sheet contains no dated rows to report on");
    };
    let mut report_filter = ReportFilter::date_range(
        args.from.unwrap_or(min_date),
        args.to.unwrap_or(max_date),
    );
    if !args.categories.is_empty() {
        report_filter = report_filter.with_categories(args.categories.iter().cloned());
    }
    if !args.products.is_empty() {
        report_filter = report_filter.with_products(args.products.iter().cloned());
    }
    Ok(report_filter)
}

fn render_sales_overview(filtered: &[MergedSale], args: &ReportArgs, currency: &str) {
    let summary = aggregate::sales_summary(filtered);
    section("Key Metrics");
    print_table(
        &["Metric", "Value"],
        &[
            vec![
                "Total Revenue".to_string(),
                format_amount(summary.total_revenue, currency),
            ],
            vec![
                "Total Profit".to_string(),
                format_amount(summary.total_profit, currency),
            ],
            vec!["Items Sold".to_string(), summary.items_sold.to_string()],
            vec![
                "Avg. Profit Margin".to_string(),
                format!("{:.1}%", summary.avg_profit_margin),
            ],
        ],
        &[Align::Left, Align::Right],
    );

    section("Weekly Profit Trend");
    let trend_rows: Vec<Vec<String>> = aggregate::weekly_profit(filtered)
        .into_iter()
        .map(|(week, profit)| vec![week.to_string(), format_amount(profit, currency)])
        .collect();
    print_table(
        &["Week Starting", "Profit"],
        &trend_rows,
        &[Align::Left, Align::Right],
    );

    section("Profit by Installer/Referral");
    print_group_table("Installer/Referral", aggregate::profit_by_installer(filtered), currency);

    section("Profit by Payment Method");
    print_group_table(
        "Payment Method",
        aggregate::profit_by_payment_method(filtered),
        currency,
    );

    section("Top Products by Profit");
    print_group_table(
        "Product",
        aggregate::top_products_by_profit(filtered, args.top),
        currency,
    );

    section("Top Products by Quantity Sold");
    let quantity_rows: Vec<Vec<String>> = aggregate::top_products_by_quantity(filtered, args.top)
        .into_iter()
        .map(|(product, qty)| vec![product, qty.to_string()])
        .collect();
    print_table(
        &["Product", "Qty Sold"],
        &quantity_rows,
        &[Align::Left, Align::Right],
    );

    section("Top Customers by Profit");
    print_group_table(
        "Customer",
        aggregate::top_customers_by_profit(filtered, args.top_customers),
        currency,
    );
}

fn render_inventory_insights(dataset: &Dataset, currency: &str) {
    let valuation = aggregate::stock_valuation(&dataset.inventory);
    section("Stock Valuation");
    print_table(
        &["Metric", "Value"],
        &[
            vec![
                "Total Stock Value (at Cost)".to_string(),
                format_amount(valuation.at_cost, currency),
            ],
            vec![
                "Total Stock Value (at Retail)".to_string(),
                format_amount(valuation.at_retail, currency),
            ],
        ],
        &[Align::Left, Align::Right],
    );

    section("Low Stock Items");
    let low_rows: Vec<Vec<String>> =
        aggregate::low_stock(&dataset.inventory, LOW_STOCK_THRESHOLD)
            .into_iter()
            .map(|item| {
                vec![
                    item.item_id.clone(),
                    item.product_name.clone(),
                    item.balance_stock.to_string(),
                ]
            })
            .collect();
    print_table(
        &["Item ID", "Product", "Balance Stock"],
        &low_rows,
        &[Align::Left, Align::Left, Align::Right],
    );

    section("Slow-Moving Stock");
    let slow_rows: Vec<Vec<String>> =
        aggregate::slow_moving_stock(&dataset.inventory, &dataset.sales)
            .into_iter()
            .map(|row| {
                let since = match row.staleness {
                    Staleness::NeverSold => "Never Sold".to_string(),
                    Staleness::DaysSinceLastSale(days) => days.to_string(),
                };
                vec![
                    row.item.item_id.clone(),
                    row.item.product_name.clone(),
                    row.item.balance_stock.to_string(),
                    since,
                ]
            })
            .collect();
    print_table(
        &["Item ID", "Product", "Balance Stock", "Days Since Last Sale"],
        &slow_rows,
        &[Align::Left, Align::Left, Align::Right, Align::Right],
    );
}

fn section(title: &str) {
    println!("\n{title}");
}

fn print_group_table(key_header: &str, groups: Vec<(String, Decimal)>, currency: &str) {
    let rows: Vec<Vec<String>> = groups
        .into_iter()
        .map(|(key, value)| vec![key, format_amount(value, currency)])
        .collect();
    print_table(&[key_header, "Profit"], &rows, &[Align::Left, Align::Right]);
}

/// Whole-unit amount with thousands grouping and the currency label,
/// e.g. `3,000 Ksh`.
pub fn format_amount(value: Decimal, currency: &str) -> String {
    let rounded = value.round_dp(0).to_string();
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped} {currency}")
}
