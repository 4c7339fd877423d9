use chrono::Utc;

use storefront_core::domain::{Coupon, Order, Product, Resource, Review};
use storefront_core::reduce;

use crate::app::AppContext;
use crate::cli::{Kind, StatsArgs};
use crate::errors::CliError;
use crate::helpers::parse_output_format;
use crate::output::{metric_rows, print_json, stats_json};
use crate::ui::{blank_line, header, print, simple_table, Column, OutputMode};

pub fn handle_stats(ctx: &AppContext, args: &StatsArgs) -> anyhow::Result<()> {
    match args.kind {
        Kind::Products => stats::<Product>(ctx, args),
        Kind::Orders => stats::<Order>(ctx, args),
        Kind::Coupons => stats::<Coupon>(ctx, args),
        Kind::Reviews => stats::<Review>(ctx, args),
    }
}

fn stats<R: Resource>(ctx: &AppContext, args: &StatsArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    if args.json && format.is_some() {
        return Err(CliError::invalid_input("--format cannot be used with --json").into());
    }
    if let Some(threshold) = args.low_stock {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(CliError::invalid_input("--low-stock must be a non-negative number").into());
        }
    }

    let records = ctx.load::<R>()?;
    let metric_context = ctx.metric_context(Utc::now(), args.low_stock)?;
    let stats = reduce(&records, &R::dashboard_metrics(&metric_context));
    tracing::debug!(kind = R::KIND, metrics = stats.len(), "stats reduced");

    let ui_ctx = ctx.ui_context(args.json, format);
    if ui_ctx.mode.is_json() {
        return print_json(&stats_json(R::KIND, records.len(), &stats));
    }

    let rows: Vec<Vec<String>> = metric_rows(&stats)
        .into_iter()
        .map(|(name, value)| vec![name, value])
        .collect();
    let columns = [Column::new("METRIC"), Column::numeric("VALUE")];

    match ui_ctx.mode {
        OutputMode::Pretty => {
            let context = format!("{} records", records.len());
            print(
                &ui_ctx,
                &header(&ui_ctx, &format!("stats {}", R::KIND), Some(&context)),
            );
            blank_line(&ui_ctx);
            print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
        }
        OutputMode::Plain | OutputMode::Json => {
            for row in &rows {
                println!("{}={}", row[0], row[1]);
            }
        }
    }

    Ok(())
}
