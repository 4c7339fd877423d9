//! Command handlers. Each handler dispatches on the record kind and runs a
//! generic body over [`storefront_core::domain::Resource`].

pub mod apply;
pub mod list;
pub mod misc;
pub mod stats;

use storefront_core::Diagnostic;

use crate::ui::{badge, Badge, UiContext};

/// Diagnostics in human output go to stderr; JSON carries them inline.
fn print_diagnostics(ui_ctx: &UiContext, diagnostics: &[Diagnostic], quiet: bool) {
    if quiet || ui_ctx.mode.is_json() {
        return;
    }
    for diagnostic in diagnostics {
        if ui_ctx.mode.is_pretty() {
            eprintln!("{}", badge(ui_ctx, Badge::Warn, &diagnostic.to_string()));
        } else {
            eprintln!("warning={}", diagnostic);
        }
    }
}
