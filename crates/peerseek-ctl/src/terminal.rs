//! Terminal output sink.

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use peerseek_core::{Category, StatusRecord};
use peerseek_services::StatusSink;

const ACTIVE: Color = Color::Rgb { r: 0x35, g: 0x7e, b: 0xdd };
const SUCCESS: Color = Color::Rgb { r: 0x0c, g: 0xb8, b: 0x92 };
const ERROR: Color = Color::Rgb { r: 0xea, g: 0x50, b: 0x37 };

fn color_for(category: Category) -> Option<Color> {
    match category {
        Category::Neutral => None,
        Category::Active => Some(ACTIVE),
        Category::Success => Some(SUCCESS),
        Category::Error => Some(ERROR),
    }
}

/// Renders status records as coloured lines.
pub struct TerminalSink<W> {
    out: W,
    /// Clear the screen on reset; otherwise a blank line separates runs.
    clear_on_reset: bool,
    colors: bool,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W, clear_on_reset: bool, colors: bool) -> Self {
        Self {
            out,
            clear_on_reset,
            colors,
        }
    }

    fn write_reset(&mut self) -> std::io::Result<()> {
        if self.clear_on_reset {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        } else {
            queue!(self.out, Print("\n"))?;
        }
        self.out.flush()
    }

    fn write_record(&mut self, record: &StatusRecord) -> std::io::Result<()> {
        match color_for(record.category).filter(|_| self.colors) {
            Some(color) => queue!(
                self.out,
                PrintStyledContent(record.text.as_str().with(color)),
                Print("\n")
            )?,
            None => queue!(self.out, Print(&record.text), Print("\n"))?,
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> StatusSink for TerminalSink<W> {
    fn reset(&mut self) {
        if let Err(e) = self.write_reset() {
            tracing::warn!(error = %e, "failed to clear terminal");
        }
    }

    fn append(&mut self, record: StatusRecord) {
        if let Err(e) = self.write_record(&record) {
            tracing::warn!(error = %e, "failed to write status line");
        }
    }
}
