//! Terminal environment detection.

use std::io::IsTerminal;

use chrono_tz::Tz;

use super::mode::{OutputFormat, OutputMode, Terminal};

/// Display settings for one command's output.
#[derive(Debug, Clone)]
pub struct UiContext {
    pub color: bool,
    pub unicode: bool,
    /// Columns available for tables
    pub width: usize,
    pub mode: OutputMode,
    /// Display timezone for timestamps; UTC when unset
    pub timezone: Option<Tz>,
}

impl UiContext {
    /// Probe stdout and the environment, then apply the command's flags.
    ///
    /// `NO_COLOR` and `--no-color` both disable styling; so does anything
    /// that is not a capable terminal.
    pub fn from_env(
        json: bool,
        format: Option<OutputFormat>,
        no_color: bool,
        ascii: bool,
    ) -> Self {
        let terminal = Terminal {
            is_tty: std::io::stdout().is_terminal(),
            is_dumb: std::env::var("TERM").is_ok_and(|term| term == "dumb"),
        };
        let styled_terminal = terminal.is_tty && !terminal.is_dumb;

        Self {
            color: styled_terminal && !no_color && std::env::var_os("NO_COLOR").is_none(),
            unicode: !ascii,
            width: terminal_width().unwrap_or(DEFAULT_WIDTH),
            mode: OutputMode::resolve(json, format, terminal),
            timezone: None,
        }
    }

    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }
}

const DEFAULT_WIDTH: usize = 100;

/// `COLUMNS` when set, otherwise the tty's window size.
fn terminal_width() -> Option<usize> {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.trim().parse::<usize>().ok())
        .filter(|&cols| cols > 0);
    if from_env.is_some() {
        return from_env;
    }
    window_columns()
}

#[cfg(unix)]
fn window_columns() -> Option<usize> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ writes a winsize into the buffer we own
    let status = unsafe {
        libc::ioctl(
            libc::STDOUT_FILENO,
            libc::TIOCGWINSZ,
            &mut size as *mut libc::winsize,
        )
    };
    (status == 0 && size.ws_col > 0).then_some(usize::from(size.ws_col))
}

#[cfg(not(unix))]
fn window_columns() -> Option<usize> {
    None
}
