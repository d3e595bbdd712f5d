//! Interval-driven dashboard loop with raw-mode input polling

use std::io;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};

use crate::core::DevicePoller;
use crate::display::{self, DisplayOptions};
use crate::error::Result;

/// Raw-mode terminal session.
///
/// Restores the terminal on drop so the quit path, the error path and
/// early returns all tear down the same way.
struct TerminalSession;

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

/// Restore the terminal before the default panic output is printed.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        default_hook(info);
    }));
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

/// Wait out one refresh interval, returning true when a quit key arrives.
///
/// `event::poll` blocks at most until the deadline, so the key check never
/// stalls the refresh cadence beyond the interval itself.
fn wait_for_quit(interval: Duration) -> Result<bool> {
    let deadline = Instant::now() + interval;
    loop {
        let timeout = deadline.saturating_duration_since(Instant::now());
        if timeout.is_zero() {
            return Ok(false);
        }
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_quit(key.code, key.modifiers) {
                    return Ok(true);
                }
            }
        }
    }
}

/// Poll and paint on a fixed interval until `q`/`Q` is pressed.
pub fn run(poller: &DevicePoller, opts: &DisplayOptions, interval: Duration) -> Result<()> {
    let use_color = opts.use_color();
    let _session = TerminalSession::new()?;
    let mut out = io::stdout();

    loop {
        let devices = poller.poll()?;
        let lines = display::build_frame(&devices, opts, use_color);
        display::paint(&mut out, &lines)?;

        if wait_for_quit(interval)? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_quit(KeyCode::Char('Q'), KeyModifiers::SHIFT));
        assert!(is_quit(KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert!(!is_quit(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_quit(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(!is_quit(KeyCode::Enter, KeyModifiers::NONE));
        assert!(!is_quit(KeyCode::Esc, KeyModifiers::NONE));
    }
}
