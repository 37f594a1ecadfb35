use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal,
};

/// Text attributes of one drawn line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStyle {
    pub bold: bool,
    pub dim: bool,
    pub reverse: bool,
}

/// Raw-mode alternate screen with mouse capture. Restores the terminal on
/// drop.
pub struct Terminal {
    stdout: io::Stdout,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        Ok(Self { stdout })
    }

    /// Block for the next event, or return `None` after `timeout`.
    pub fn poll(&self, timeout: Duration) -> io::Result<Option<CrosstermEvent>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Redraw the whole screen, one entry per row starting at the top.
    pub fn draw(&mut self, lines: &[(String, LineStyle)]) -> io::Result<()> {
        queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;

        for (y, (text, style)) in lines.iter().enumerate() {
            let Ok(y) = u16::try_from(y) else {
                break;
            };
            queue!(self.stdout, cursor::MoveTo(0, y), SetAttribute(Attribute::Reset))?;
            if style.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                queue!(self.stdout, SetAttribute(Attribute::Dim))?;
            }
            if style.reverse {
                queue!(self.stdout, SetAttribute(Attribute::Reverse))?;
            }
            queue!(self.stdout, Print(text))?;
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
