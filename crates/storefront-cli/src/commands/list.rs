use chrono::Utc;

use storefront_core::domain::{Coupon, Order, Product, Resource, Review};
use storefront_core::query::DateWindow;
use storefront_core::{
    evaluate_with, Diagnostic, FieldFilter, FieldKind, QueryDescriptor, SortKey, StockLevel,
};

use crate::app::AppContext;
use crate::cli::{Kind, ListArgs};
use crate::errors::CliError;
use crate::helpers::{parse_duration, parse_filter_expr, parse_output_format};
use crate::output::{list_json, print_json, render_listing, Listing};
use crate::ui::{blank_line, header, hint, kv, print, simple_table, OutputMode};

use super::print_diagnostics;

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    match args.kind {
        Kind::Products => list::<Product>(ctx, args),
        Kind::Orders => list::<Order>(ctx, args),
        Kind::Coupons => list::<Coupon>(ctx, args),
        Kind::Reviews => list::<Review>(ctx, args),
    }
}

fn list<R: Resource + Listing>(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    if args.json && format.is_some() {
        return Err(CliError::invalid_input("--format cannot be used with --json").into());
    }

    let query = build_query::<R>(ctx, args)?;
    let records = ctx.load::<R>()?;

    let mut diagnostics = Vec::new();
    let result = evaluate_with(&records, &query, &R::accessors(), &mut |d: &Diagnostic| {
        diagnostics.push(d.clone())
    });
    tracing::debug!(
        kind = R::KIND,
        matched = result.total_matched,
        page = result.page,
        "list evaluated"
    );

    let ui_ctx = ctx.ui_context(args.json, format);
    if ui_ctx.mode.is_json() {
        return print_json(&list_json(R::KIND, &result, &diagnostics));
    }
    print_diagnostics(&ui_ctx, &diagnostics, ctx.quiet());

    let page_context = format!("page {}/{}", result.page, result.total_pages);
    if result.is_empty() {
        if !ctx.quiet() {
            match ui_ctx.mode {
                OutputMode::Pretty => {
                    print(
                        &ui_ctx,
                        &header(&ui_ctx, &format!("list {}", R::KIND), Some(&page_context)),
                    );
                    blank_line(&ui_ctx);
                    print(
                        &ui_ctx,
                        &hint(
                            &ui_ctx,
                            &format!("No {} match. Try a broader search or filter.", R::KIND),
                        ),
                    );
                }
                OutputMode::Plain | OutputMode::Json => println!("count=0"),
            }
        }
        return Ok(());
    }

    let rows = render_listing(&ui_ctx, result.iter());
    match ui_ctx.mode {
        OutputMode::Pretty => {
            print(
                &ui_ctx,
                &header(&ui_ctx, &format!("list {}", R::KIND), Some(&page_context)),
            );
            blank_line(&ui_ctx);
            print(&ui_ctx, &simple_table(&ui_ctx, R::columns(), &rows));
            blank_line(&ui_ctx);
            if !ctx.quiet() {
                print(
                    &ui_ctx,
                    &kv(&ui_ctx, "Matched", &result.total_matched.to_string()),
                );
                if result.page < result.total_pages {
                    print(
                        &ui_ctx,
                        &hint(&ui_ctx, &format!("Next page: --page {}", result.page + 1)),
                    );
                }
            }
        }
        OutputMode::Plain | OutputMode::Json => {
            print(&ui_ctx, &simple_table(&ui_ctx, R::columns(), &rows));
        }
    }

    Ok(())
}

/// Translate list flags into a query. Relative dates resolve against the
/// clock here so the engine stays pure.
fn build_query<R: Resource>(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<QueryDescriptor> {
    let accessors = R::accessors();

    if args.page == 0 {
        return Err(CliError::invalid_input("--page must be at least 1").into());
    }
    let sort = match args.sort.as_deref() {
        Some(raw) => raw
            .parse::<SortKey>()
            .map_err(|e| CliError::invalid_input(e.to_string()))?,
        None => R::default_sort(),
    };
    let mut query = QueryDescriptor::new()
        .sort(sort)
        .page(args.page)
        .page_size(ctx.page_size(args.page_size, args.customer)?);

    if let Some(text) = args.search.as_deref() {
        query = query.search(text);
    }
    for expr in &args.filter {
        query = query.filter(parse_filter_expr(&accessors, expr)?);
    }

    if let Some(raw) = args.stock.as_deref() {
        if accessors.kind("stock") != Some(FieldKind::Number) {
            return Err(CliError::invalid_input(format!(
                "--stock does not apply to {}",
                R::KIND
            ))
            .into());
        }
        let level = raw
            .parse::<StockLevel>()
            .map_err(|e| CliError::invalid_input(e.to_string()))?;
        query = query.filter(FieldFilter::stock("stock", level, ctx.low_stock_threshold()?));
    }

    let window = if let Some(raw) = args.last.as_deref() {
        Some(DateWindow::last(parse_duration(raw)?, Utc::now()))
    } else if args.today {
        Some(DateWindow::day_of(Utc::now()))
    } else {
        None
    };
    if let Some(window) = window {
        if accessors.kind(&args.date_field) != Some(FieldKind::Date) {
            return Err(CliError::invalid_input_with_hint(
                format!("\"{}\" is not a date field of {}", args.date_field, R::KIND),
                "Hint: Pass --date-field with a timestamp field such as createdAt.",
            )
            .into());
        }
        query = query.filter(window.filter(args.date_field.as_str()));
    }

    Ok(query)
}
