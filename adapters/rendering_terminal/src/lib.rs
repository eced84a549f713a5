#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering backend for lifegrid built on crossterm.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result as AnyResult};
use crossterm::{
    cursor, execute, queue,
    style::Print,
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use lifegrid_rendering::{Frame, RenderingBackend};

/// Backend that redraws the whole grid on every frame.
#[derive(Debug)]
pub struct TerminalBackend<W: Write> {
    out: W,
    restore_on_drop: bool,
}

impl<W: Write> TerminalBackend<W> {
    /// Wraps an arbitrary writer without touching terminal modes.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            restore_on_drop: false,
        }
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl TerminalBackend<Stdout> {
    /// Switches stdout to the alternate screen and hides the cursor.
    ///
    /// Both are restored when the backend is dropped.
    pub fn stdout() -> AnyResult<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide, cursor::MoveTo(0, 0))
            .context("failed to prepare the terminal")?;
        Ok(Self {
            out,
            restore_on_drop: true,
        })
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        queue!(
            self.out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            Print(&frame.text),
            Print(format!(
                "generation {}  population {}\n",
                frame.generation, frame.population
            ))
        )
        .context("failed to queue frame")?;
        self.out.flush().context("failed to flush frame")
    }
}

impl<W: Write> Drop for TerminalBackend<W> {
    fn drop(&mut self) {
        if self.restore_on_drop {
            let _ = execute!(self.out, cursor::Show, LeaveAlternateScreen);
        }
    }
}
