//! One summary line per cycle on a terminal

use super::{DisplayState, Renderer, Status};
use crate::shared::PollError;
use std::io::{self, Write};

pub struct TerminalRenderer<W: Write + Send = io::Stdout> {
    state: DisplayState,
    out: W,
}

impl TerminalRenderer {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: DisplayState::default(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&self) -> String {
        let s = &self.state;
        match s.status {
            Status::Error(_) => format!("[{}]", s.status),
            _ => format!(
                "[{}] wind {} from {} (needle {:.0}°) at {}",
                s.status, s.speed, s.direction, s.needle, s.time
            ),
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn set_status(&mut self, status: &Status) {
        self.state.set_status(status);
    }

    fn set_speed(&mut self, text: &str) {
        self.state.set_speed(text);
    }

    fn set_direction(&mut self, text: &str) {
        self.state.set_direction(text);
    }

    fn set_time(&mut self, text: &str) {
        self.state.set_time(text);
    }

    fn set_needle_rotation(&mut self, degrees: f64) {
        self.state.set_needle_rotation(degrees);
    }

    fn present(&mut self) -> Result<(), PollError> {
        let line = self.line();
        writeln!(self.out, "{}", line)
            .and_then(|_| self.out.flush())
            .map_err(|e| PollError::Render(format!("terminal write failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_line() {
        let mut term = TerminalRenderer::new(Vec::new());
        term.set_speed("22.4 mph");
        term.set_direction("290° WNW");
        term.set_needle_rotation(290.0);
        term.set_time("3/1/2024, 10:55:00 AM");
        term.set_status(&Status::Ok("XCDC1".to_string()));
        term.present().unwrap();

        let out = String::from_utf8(term.into_inner()).unwrap();
        assert_eq!(
            out,
            "[OK • XCDC1] wind 22.4 mph from 290° WNW (needle 290°) at 3/1/2024, 10:55:00 AM\n"
        );
    }

    #[test]
    fn test_error_line() {
        let mut term = TerminalRenderer::new(Vec::new());
        term.set_status(&Status::Error("HTTP 500 Internal Server Error".to_string()));
        term.present().unwrap();

        let out = String::from_utf8(term.into_inner()).unwrap();
        assert_eq!(out, "[Error: HTTP 500 Internal Server Error]\n");
    }
}
