//! Rendering primitives for CLI output.
//!
//! Every function returns the finished string for the active mode; only
//! `print`, `blank_line` and `print_error` write.

use comfy_table::presets::{ASCII_HORIZONTAL_ONLY, UTF8_HORIZONTAL_ONLY};
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use super::context::UiContext;
use super::mode::OutputMode;
use super::theme::{styled, styles, Badge};

/// First line of a command's human output.
///
/// Pretty: `Storefront · list products  page 1/3`, plain: `storefront list products`.
pub fn header(ctx: &UiContext, command: &str, context: Option<&str>) -> String {
    match ctx.mode {
        OutputMode::Json => String::new(),
        OutputMode::Plain => format!("storefront {}", command),
        OutputMode::Pretty => {
            let separator = if ctx.unicode { "\u{00B7}" } else { "|" };
            let mut line = format!(
                "{} {} {}",
                styled("Storefront", styles::bold(), ctx.color),
                separator,
                command
            );
            if let Some(context) = context {
                line.push_str("  ");
                line.push_str(&styled(context, styles::dim(), ctx.color));
            }
            line
        }
    }
}

pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let mark = styled(kind.display(ctx.unicode), kind.style(), ctx.color);
    match message {
        "" => mark,
        _ => format!("{} {}", mark, message),
    }
}

/// `Key: value` when pretty, `key=value` otherwise.
pub fn kv(ctx: &UiContext, key: &str, value: &str) -> String {
    if ctx.mode.is_pretty() {
        format!("{} {}", styled(&format!("{}:", key), styles::dim(), ctx.color), value)
    } else {
        format!("{}={}", plain_key(key), value)
    }
}

/// A follow-up suggestion. Hints built with a leading `Hint:` are not
/// labelled twice.
pub fn hint(ctx: &UiContext, text: &str) -> String {
    let text = text.strip_prefix("Hint:").map(str::trim_start).unwrap_or(text);
    if ctx.mode.is_pretty() {
        format!("{} {}", styled("Hint:", styles::dim(), ctx.color), text)
    } else {
        format!("hint={}", text)
    }
}

/// Outcome block after a write: a success line then aligned fields.
pub fn receipt(ctx: &UiContext, title: &str, items: &[(&str, String)]) -> String {
    if !ctx.mode.is_pretty() {
        return std::iter::once("status=ok".to_string())
            .chain(items.iter().map(|(key, value)| kv(ctx, key, value)))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let key_width = items.iter().map(|(key, _)| key.len() + 1).max().unwrap_or(0);
    let mut lines = vec![badge(ctx, Badge::Ok, title)];
    lines.extend(items.iter().map(|(key, value)| {
        let label = format!("{:<width$}", format!("{}:", key), width = key_width);
        format!("  {} {}", styled(&label, styles::dim(), ctx.color), value)
    }));
    lines.join("\n")
}

/// Table column; numeric columns are right-aligned.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub numeric: bool,
}

impl Column {
    pub const fn new(header: &'static str) -> Self {
        Self {
            header,
            numeric: false,
        }
    }

    pub const fn numeric(header: &'static str) -> Self {
        Self {
            header,
            numeric: true,
        }
    }
}

/// Rows as a table when pretty, as tab-separated lines (no header) otherwise.
pub fn simple_table(ctx: &UiContext, columns: &[Column], rows: &[Vec<String>]) -> String {
    if !ctx.mode.is_pretty() {
        return rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = Table::new();
    table
        .load_preset(if ctx.unicode {
            UTF8_HORIZONTAL_ONLY
        } else {
            ASCII_HORIZONTAL_ONLY
        })
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(u16::try_from(ctx.width).unwrap_or(u16::MAX))
        .set_header(columns.iter().map(|column| {
            let cell = Cell::new(column.header);
            if ctx.color {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        }));
    for row in rows {
        table.add_row(row);
    }
    for (index, column) in columns.iter().enumerate() {
        if let Some(table_column) = table.column_mut(index) {
            if column.numeric {
                table_column.set_cell_alignment(CellAlignment::Right);
            }
        }
    }

    table.to_string()
}

/// Write a line to stdout; JSON mode keeps stdout for the document.
pub fn print(ctx: &UiContext, message: &str) {
    if !ctx.mode.is_json() {
        println!("{}", message);
    }
}

/// Spacer between pretty sections.
pub fn blank_line(ctx: &UiContext) {
    if ctx.mode.is_pretty() {
        println!();
    }
}

pub fn error_message(ctx: &UiContext, message: &str, error_hint: Option<&str>) -> String {
    let first = if ctx.mode.is_pretty() {
        badge(ctx, Badge::Err, message)
    } else {
        format!("error={}", message)
    };
    match error_hint {
        Some(text) => format!("{}\n{}", first, hint(ctx, text)),
        None => first,
    }
}

/// Errors go to stderr in every mode.
pub fn print_error(ctx: &UiContext, message: &str, error_hint: Option<&str>) {
    eprintln!("{}", error_message(ctx, message, error_hint));
}

/// `Total Revenue` -> `total_revenue`.
fn plain_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(mode: OutputMode) -> UiContext {
        UiContext {
            color: false,
            unicode: true,
            width: 100,
            mode,
            timezone: None,
        }
    }

    #[test]
    fn test_header_per_mode() {
        assert_eq!(
            header(&ctx(OutputMode::Pretty), "list products", Some("page 1/2")),
            "Storefront \u{00B7} list products  page 1/2"
        );
        assert_eq!(
            header(&ctx(OutputMode::Plain), "list products", None),
            "storefront list products"
        );
        assert!(header(&ctx(OutputMode::Json), "list", None).is_empty());
    }

    #[test]
    fn test_kv_plain_normalizes_key() {
        assert_eq!(
            kv(&ctx(OutputMode::Plain), "Total Revenue", "10.00"),
            "total_revenue=10.00"
        );
        assert_eq!(kv(&ctx(OutputMode::Pretty), "Total", "3"), "Total: 3");
    }

    #[test]
    fn test_hint_label_not_doubled() {
        assert_eq!(
            hint(&ctx(OutputMode::Plain), "Hint: Pass --data"),
            "hint=Pass --data"
        );
        assert_eq!(
            hint(&ctx(OutputMode::Pretty), "Pass --data"),
            "Hint: Pass --data"
        );
    }

    #[test]
    fn test_receipt_plain() {
        let r = receipt(
            &ctx(OutputMode::Plain),
            "Applied toggle",
            &[("Kind", "products".to_string()), ("Records", "4".to_string())],
        );
        assert_eq!(r, "status=ok\nkind=products\nrecords=4");
    }

    #[test]
    fn test_receipt_pretty_aligns_keys() {
        let r = receipt(
            &ctx(OutputMode::Pretty),
            "Applied toggle",
            &[("Id", "p1".to_string()), ("Records", "4".to_string())],
        );
        let lines: Vec<&str> = r.lines().collect();
        assert_eq!(lines[1], "  Id:      p1");
        assert_eq!(lines[2], "  Records: 4");
    }

    #[test]
    fn test_simple_table_pretty_has_headers() {
        let columns = [Column::new("ID"), Column::numeric("PRICE")];
        let rows = vec![vec!["p1".to_string(), "40.00".to_string()]];
        let out = simple_table(&ctx(OutputMode::Pretty), &columns, &rows);
        assert!(out.contains("ID"));
        assert!(out.contains("PRICE"));
        assert!(out.contains("40.00"));
    }

    #[test]
    fn test_simple_table_plain_is_tab_separated() {
        let columns = [Column::new("ID"), Column::new("NAME")];
        let rows = vec![
            vec!["p1".to_string(), "Desk Lamp".to_string()],
            vec!["p2".to_string(), "Mug".to_string()],
        ];
        let out = simple_table(&ctx(OutputMode::Plain), &columns, &rows);
        assert_eq!(out, "p1\tDesk Lamp\np2\tMug");
    }

    #[test]
    fn test_error_message_plain() {
        let e = error_message(
            &ctx(OutputMode::Plain),
            "No snapshot",
            Some("Hint: Set --data"),
        );
        assert_eq!(e, "error=No snapshot\nhint=Set --data");
    }
}
