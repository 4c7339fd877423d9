//! Input and parsing helper functions for the CLI.
//!
//! - Duration, format and filter-expression parsing (`parsing`)
//! - Record input for `apply append` (`input`)

mod input;
mod parsing;

pub use input::read_record_json;
pub use parsing::{parse_duration, parse_field_value, parse_filter_expr, parse_output_format};
