//! UI primitives for the storefront CLI.
//!
//! - **Context**: environment detection (TTY, width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badges and styles
//! - **Render**: tables, headers, receipts, hints
//! - **Format**: string, number and date helpers
//!
//! ```ignore
//! let ui_ctx = ctx.ui_context(args.json, format);
//! if ui_ctx.mode.is_json() {
//!     return print_json(&value);
//! }
//! print(&ui_ctx, &header(&ui_ctx, "list products", None));
//! print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
//! ```

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::{OutputFormat, OutputMode};
pub use theme::Badge;

pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, receipt, simple_table, Column,
};

pub use format::{format_datetime, format_money, format_number, short_id, truncate};
