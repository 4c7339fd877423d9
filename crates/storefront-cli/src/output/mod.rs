//! Output formatting for list, stats and apply results.
//!
//! JSON goes through `json`; tables and plain lines through `text`.

mod json;
mod text;

pub use json::{apply_json, list_json, print_json, stats_json};
pub use text::{metric_rows, render_listing, Listing};
