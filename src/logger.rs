//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output shown only with `--verbose`
//! - `ProgressLine` for single-line page counters
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("bundle"; "processed {} files", count);
//!
//! // Progress line while pages are rewritten
//! let progress = ProgressLine::new("bundle", &[("pages", 42)]);
//! progress.inc("pages");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use std::{
    cell::Cell,
    fmt,
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Whether a progress line currently owns the last terminal line.
static BAR_ACTIVE: AtomicBool = AtomicBool::new(false);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
///
/// If a progress line is active, the message is printed above it and the
/// progress line is left for its next refresh to redraw.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    if BAR_ACTIVE.load(Ordering::SeqCst) {
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Render `text` in `style` when `stream` takes colors.
///
/// Goes through `if_supports_color`, so `--color never` and non-tty output
/// stay plain.
pub fn paint(text: impl fmt::Display, stream: Stream, style: Style) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let style = match module_lower {
        "bundle" => Style::new().bright_blue(),
        "cleanup" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "dry-run" => Style::new().bright_magenta(),
        _ => Style::new().bright_yellow(),
    };
    paint(format!("[{module}]"), Stream::Stdout, style.bold())
}

// ============================================================================
// Progress Line (single-line counters)
// ============================================================================

/// Single-line progress display with named counters
///
/// Displays: `[bundle] pages(42/69)`
///
/// Counters update in place on the same line. Pages are processed one at a
/// time, so plain `Cell`s are enough here.
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<Counter>,
    /// Disabled lines track counts but never touch the terminal.
    visible: bool,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: Cell<usize>,
}

impl ProgressLine {
    /// Create a new progress display under `module`.
    ///
    /// Only includes counters with total > 0.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let mut progress = Self::hidden(module, items);
        progress.visible = true;
        BAR_ACTIVE.store(true, Ordering::SeqCst);
        progress.display();
        progress
    }

    /// Create a progress line that counts without drawing.
    pub fn hidden(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: Cell::new(0),
            })
            .collect();

        Self {
            module,
            counters,
            visible: false,
        }
    }

    /// Increment the counter with the given name.
    #[inline]
    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.set(counter.current.get() + 1);
            self.display();
        }
    }

    /// Render counters as `name(current/total)` separated by spaces.
    fn render(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.get(), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Display the current progress line (overwrites current line).
    fn display(&self) {
        if !self.visible {
            return;
        }
        let prefix = colorize_prefix(self.module, self.module);
        let mut stdout = stdout().lock();
        // Clear line and write progress (no newline - stays on same line)
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        write!(stdout, "{} {}", prefix, self.render()).ok();
        stdout.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_ACTIVE.store(false, Ordering::SeqCst);
        if self.visible {
            self.display();
            let mut stdout = stdout().lock();
            writeln!(stdout).ok();
            stdout.flush().ok();
        }
        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_ACTIVE.store(false, Ordering::SeqCst);
        if !self.visible {
            return;
        }

        // Clear the line on drop (if not finished properly, e.g. on error)
        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        stdout.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_prefix_plain_without_color() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("bundle", "bundle"), "[bundle]");
        assert_eq!(colorize_prefix("Warning", "warning"), "[Warning]");
        assert_eq!(paint("x", Stream::Stderr, Style::new().red()), "x");
    }

    #[test]
    fn test_progress_render_skips_empty_counters() {
        let progress = ProgressLine::hidden("bundle", &[("pages", 3), ("assets", 0)]);
        assert_eq!(progress.render(), "pages(0/3)");

        progress.inc("pages");
        progress.inc("pages");
        progress.inc("unknown");
        assert_eq!(progress.render(), "pages(2/3)");
    }

    #[test]
    fn test_verbose_flag_roundtrip() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
