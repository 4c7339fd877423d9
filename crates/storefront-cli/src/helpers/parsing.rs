//! Parsing helpers for duration, output format and filter expressions.

use chrono::Duration;

use storefront_core::{FieldAccessorMap, FieldFilter, FieldKind, FieldValue};

use crate::errors::CliError;
use crate::ui::OutputFormat;

/// Parse a duration string (e.g., "7d", "24h").
pub fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    let invalid = |message: String| -> anyhow::Error {
        CliError::invalid_input_with_hint(message, "Hint: Use <number><unit>, e.g. 7d, 24h, 30m.")
            .into()
    };

    if value.len() < 2 {
        return Err(invalid(format!(
            "Invalid duration: {} (expected <number><unit>)",
            value
        )));
    }

    let (num_str, unit) = value.split_at(value.len() - 1);
    let amount: i64 = num_str
        .parse()
        .map_err(|_| invalid(format!("Invalid duration number: {}", value)))?;
    if amount <= 0 {
        return Err(invalid(format!("Duration must be positive: {}", value)));
    }

    match unit {
        "d" => Ok(Duration::days(amount)),
        "h" => Ok(Duration::hours(amount)),
        "m" => Ok(Duration::minutes(amount)),
        "s" => Ok(Duration::seconds(amount)),
        _ => Err(invalid(format!(
            "Invalid duration unit: {} (use d/h/m/s)",
            unit
        ))),
    }
}

/// Parse an optional `--format` value.
pub fn parse_output_format(value: Option<&str>) -> anyhow::Result<Option<OutputFormat>> {
    Ok(value.map(str::parse::<OutputFormat>).transpose()?)
}

/// Parse a raw value for `field`, typed by the accessor map.
pub fn parse_field_value<R>(
    accessors: &FieldAccessorMap<R>,
    field: &str,
    raw: &str,
) -> anyhow::Result<FieldValue> {
    let kind = field_kind(accessors, field)?;
    FieldValue::parse(kind, raw).map_err(|e| invalid_value(field, kind, e))
}

/// Parse a `--filter` expression.
///
/// - `field=value` equality (`field=a,b` is membership for enum fields)
/// - `field>=n` / `field<=n` inclusive bound on number or date fields
pub fn parse_filter_expr<R>(
    accessors: &FieldAccessorMap<R>,
    expr: &str,
) -> anyhow::Result<FieldFilter> {
    let (field, op, raw) = split_filter(expr)?;
    let kind = field_kind(accessors, field)?;

    match op {
        FilterOp::Equals => {
            if kind == FieldKind::Enum && raw.contains(',') {
                let values = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(|value| FieldValue::Text(value.to_string()))
                    .collect::<Vec<_>>();
                return Ok(FieldFilter::one_of(field, values));
            }
            let value = FieldValue::parse(kind, raw).map_err(|e| invalid_value(field, kind, e))?;
            if value.is_null() {
                return Err(CliError::invalid_input(format!(
                    "Filter \"{}\" needs a value",
                    expr
                ))
                .into());
            }
            Ok(FieldFilter::equals(field, value))
        }
        FilterOp::AtLeast | FilterOp::AtMost => {
            let value = FieldValue::parse(kind, raw).map_err(|e| invalid_value(field, kind, e))?;
            let lower = op == FilterOp::AtLeast;
            match value {
                FieldValue::Number(n) if lower => Ok(FieldFilter::range(field, Some(n), None)),
                FieldValue::Number(n) => Ok(FieldFilter::range(field, None, Some(n))),
                FieldValue::Date(d) if lower => Ok(FieldFilter::date_range(field, Some(d), None)),
                FieldValue::Date(d) => Ok(FieldFilter::date_range(field, None, Some(d))),
                _ => Err(CliError::invalid_input(format!(
                    "Bounds only apply to number and date fields; \"{}\" is {}",
                    field, kind
                ))
                .into()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    Equals,
    AtLeast,
    AtMost,
}

fn split_filter(expr: &str) -> anyhow::Result<(&str, FilterOp, &str)> {
    let parsed = if let Some((field, raw)) = expr.split_once(">=") {
        Some((field, FilterOp::AtLeast, raw))
    } else if let Some((field, raw)) = expr.split_once("<=") {
        Some((field, FilterOp::AtMost, raw))
    } else {
        expr.split_once('=')
            .map(|(field, raw)| (field, FilterOp::Equals, raw))
    };

    match parsed {
        Some((field, op, raw)) if !field.trim().is_empty() => Ok((field.trim(), op, raw.trim())),
        _ => Err(CliError::invalid_input_with_hint(
            format!("Invalid filter: {}", expr),
            "Hint: Use field=value, field=a,b, field>=n or field<=n.",
        )
        .into()),
    }
}

fn field_kind<R>(accessors: &FieldAccessorMap<R>, field: &str) -> anyhow::Result<FieldKind> {
    accessors.kind(field).ok_or_else(|| {
        let known = accessors
            .fields()
            .map(|f| f.name().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        CliError::invalid_input_with_hint(
            format!("Unknown field: {}", field),
            format!("Hint: Known fields are {}.", known),
        )
        .into()
    })
}

fn invalid_value(
    field: &str,
    kind: FieldKind,
    err: storefront_core::StorefrontError,
) -> anyhow::Error {
    CliError::invalid_input(format!("{} (field \"{}\" is {})", err, field, kind)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storefront_core::domain::{Order, Product, Resource};
    use storefront_core::Condition;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert!(parse_duration("0d").is_err());
        assert!(parse_duration("7w").is_err());
        assert!(parse_duration("d").is_err());
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format(None).unwrap(), None);
        assert_eq!(
            parse_output_format(Some("plain")).unwrap(),
            Some(OutputFormat::Plain)
        );
        assert!(parse_output_format(Some("csv")).is_err());
    }

    #[test]
    fn test_boolean_equality() {
        let filter = parse_filter_expr(&Product::accessors(), "isActive=true").unwrap();
        assert_eq!(filter, FieldFilter::equals("isActive", true));
    }

    #[test]
    fn test_enum_membership() {
        let filter = parse_filter_expr(&Order::accessors(), "status=pending, shipped").unwrap();
        assert_eq!(
            filter,
            FieldFilter::one_of("status", vec!["pending", "shipped"])
        );
    }

    #[test]
    fn test_number_and_date_bounds() {
        let accessors = Product::accessors();
        assert_eq!(
            parse_filter_expr(&accessors, "price>=10").unwrap(),
            FieldFilter::range("price", Some(10.0), None)
        );
        let until = parse_filter_expr(&accessors, "createdAt<=2024-03-01").unwrap();
        assert_eq!(
            until.condition,
            Condition::DateRange {
                since: None,
                until: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            }
        );
    }

    #[test]
    fn test_unknown_field_lists_known_fields() {
        let err = parse_filter_expr(&Product::accessors(), "colour=red").unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli.exit_code(), 4);
        assert!(cli.hint().unwrap().contains("price"));
    }

    #[test]
    fn test_bounds_on_text_field_rejected() {
        assert!(parse_filter_expr(&Product::accessors(), "name>=a").is_err());
    }

    #[test]
    fn test_malformed_expression() {
        assert!(parse_filter_expr(&Product::accessors(), "price").is_err());
        assert!(parse_filter_expr(&Product::accessors(), "=3").is_err());
        assert!(parse_filter_expr(&Product::accessors(), "price=").is_err());
    }

    #[test]
    fn test_parse_field_value_is_typed() {
        let accessors = Product::accessors();
        assert_eq!(
            parse_field_value(&accessors, "stock", "4").unwrap(),
            FieldValue::Number(4.0)
        );
        assert!(parse_field_value(&accessors, "stock", "many").is_err());
        assert_eq!(
            parse_field_value(&accessors, "category", "").unwrap(),
            FieldValue::Null
        );
    }
}
