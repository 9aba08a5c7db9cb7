//! Terminal setup, teardown, and management.
//!
//! The terminal is restored by an RAII guard, and by a panic hook so a crash
//! never leaves the shell in raw mode.

use std::io::{self, Stdout, stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Terminal type used by the frontend.
pub type VeritasTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Track whether the panic hook has been installed to avoid installing it multiple times.
static PANIC_HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

/// RAII guard that restores the terminal on drop.
pub struct TerminalGuard {
    _private: (),
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Enter raw mode and the alternate screen and build a ratatui terminal.
///
/// Keep the returned guard alive for as long as the terminal is in use.
pub fn init(title: &str) -> Result<(VeritasTerminal, TerminalGuard)> {
    install_panic_hook();

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        EnterAlternateScreen,
        EnableBracketedPaste,
        SetTitle(title),
        cursor::Hide
    )?;
    let guard = TerminalGuard { _private: () };

    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
    terminal.clear()?;
    Ok((terminal, guard))
}

/// Undo everything [`init`] did. Safe to call more than once.
pub fn restore_terminal() -> io::Result<()> {
    let mut out = stdout();
    execute!(out, cursor::Show, DisableBracketedPaste, LeaveAlternateScreen)?;
    disable_raw_mode()
}

fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);

        if std::env::var("RUST_BACKTRACE").is_err() {
            eprintln!();
            eprintln!("\x1b[1;33mTip:\x1b[0m For a full backtrace, run with RUST_BACKTRACE=1");
        }
    }));
}
