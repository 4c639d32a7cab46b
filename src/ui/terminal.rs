//! Crossterm terminal ownership and the interactive frame sink.

use super::scene::render_scene;
use super::{FrameSink, SceneView, Signal};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

/// Raw mode plus the alternate screen for as long as it lives.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = stdout.execute(EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        if let Err(err) = disable_raw_mode() {
            log::error!("failed to disable raw mode: {err}");
        }
        if let Err(err) = self.terminal.backend_mut().execute(LeaveAlternateScreen) {
            log::error!("failed to leave alternate screen: {err}");
        }
    }
}

/// Whether a key press is the close signal.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) | (KeyCode::Char('Q'), _) => true,
        (KeyCode::Char('c'), m) => m.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Draws each frame to the terminal, then drains pending input without
/// blocking.
pub struct TerminalSink {
    guard: TerminalGuard,
}

impl TerminalSink {
    pub fn new(guard: TerminalGuard) -> Self {
        Self { guard }
    }
}

impl FrameSink for TerminalSink {
    fn present(&mut self, scene: &SceneView<'_>) -> io::Result<Signal> {
        self.guard.terminal().draw(|frame| {
            let area = frame.size();
            render_scene(frame, area, scene);
        })?;

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if is_quit_key(&key) {
                    return Ok(Signal::Quit);
                }
            }
        }
        Ok(Signal::Continue)
    }
}
