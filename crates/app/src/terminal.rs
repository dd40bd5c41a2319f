use std::io::{self, Write};

use finlit_core::quiz::{Phase, Tick};
use services::PresentationDriver;
use tracing::warn;

/// Line-oriented quiz renderer.
///
/// The engine ticks every poll interval; only ticks that change the phase or
/// the question are drawn so the terminal is not flooded.
pub struct TerminalDriver<W: Write> {
    out: W,
    last: Option<(Phase, usize)>,
}

impl<W: Write> TerminalDriver<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    fn draw(&mut self, tick: &Tick) -> io::Result<()> {
        let view = &tick.directive;
        match view.phase {
            Phase::Collecting => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "{} {}  |  question {} of {}  |  score {}",
                    view.avatar.label(),
                    view.username,
                    view.index + 1,
                    view.total(),
                    view.score(),
                )?;
                if let Some(question) = &view.question {
                    writeln!(self.out, "{question}")?;
                }
                for (i, option) in view.options.iter().enumerate() {
                    writeln!(self.out, "  {}. {}", i + 1, option.text)?;
                }
                writeln!(self.out, "Type an option number and press enter.")?;
            }
            Phase::Revealing => {
                for option in &view.options {
                    let Some(mark) = option.annotation else {
                        continue;
                    };
                    let tag = match (mark.correct, mark.selected) {
                        (true, true) => "correct, your pick",
                        (true, false) => "correct",
                        (false, true) => "your pick",
                        (false, false) => continue,
                    };
                    writeln!(self.out, "  -> {} ({tag})", option.text)?;
                }
                if view.selected.is_none() {
                    writeln!(self.out, "  no answer locked in")?;
                }
            }
            Phase::Advancing => {}
            Phase::Complete => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "Quiz complete, {}! Score {}/{} ({:.0}%)",
                    view.username,
                    view.score(),
                    view.total(),
                    view.ratio.percent(),
                )?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> PresentationDriver for TerminalDriver<W> {
    fn present(&mut self, tick: &Tick) {
        let key = (tick.phase(), tick.directive.index);
        if self.last == Some(key) {
            return;
        }
        self.last = Some(key);
        if let Err(err) = self.draw(tick) {
            warn!("terminal write failed: {err}");
        }
    }
}
