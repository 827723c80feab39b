//! Display surfaces the poller writes into

#[cfg(feature = "html")]
pub mod html;
pub mod terminal;

use crate::shared::{PollError, PLACEHOLDER};
use std::fmt;

/// What the status line shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing fetched yet
    #[default]
    Idle,
    Fetching,
    /// Last cycle succeeded for the named station
    Ok(String),
    /// Last cycle failed with this message
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "{}", PLACEHOLDER),
            Status::Fetching => write!(f, "Fetching…"),
            Status::Ok(station) => write!(f, "OK • {}", station),
            Status::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Capability for writing to the named display surfaces.
///
/// `present` runs once at the end of every cycle so renderers that batch
/// their output (a file, a terminal line) can flush.
pub trait Renderer: Send {
    fn set_status(&mut self, status: &Status);
    fn set_speed(&mut self, text: &str);
    fn set_direction(&mut self, text: &str);
    fn set_time(&mut self, text: &str);
    /// Degrees clockwise from north
    fn set_needle_rotation(&mut self, degrees: f64);

    fn present(&mut self) -> Result<(), PollError> {
        Ok(())
    }
}

/// In-memory copy of every surface
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub status: Status,
    pub speed: String,
    pub direction: String,
    pub time: String,
    pub needle: f64,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            speed: PLACEHOLDER.to_string(),
            direction: PLACEHOLDER.to_string(),
            time: PLACEHOLDER.to_string(),
            needle: 0.0,
        }
    }
}

impl Renderer for DisplayState {
    fn set_status(&mut self, status: &Status) {
        self.status = status.clone();
    }

    fn set_speed(&mut self, text: &str) {
        self.speed = text.to_string();
    }

    fn set_direction(&mut self, text: &str) {
        self.direction = text.to_string();
    }

    fn set_time(&mut self, text: &str) {
        self.time = text.to_string();
    }

    fn set_needle_rotation(&mut self, degrees: f64) {
        self.needle = degrees;
    }
}

/// Forwards every write to each inner renderer
#[derive(Default)]
pub struct Fanout {
    renderers: Vec<Box<dyn Renderer>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, renderer: impl Renderer + 'static) {
        self.renderers.push(Box::new(renderer));
    }
}

impl Renderer for Fanout {
    fn set_status(&mut self, status: &Status) {
        self.renderers.iter_mut().for_each(|r| r.set_status(status));
    }

    fn set_speed(&mut self, text: &str) {
        self.renderers.iter_mut().for_each(|r| r.set_speed(text));
    }

    fn set_direction(&mut self, text: &str) {
        self.renderers.iter_mut().for_each(|r| r.set_direction(text));
    }

    fn set_time(&mut self, text: &str) {
        self.renderers.iter_mut().for_each(|r| r.set_time(text));
    }

    fn set_needle_rotation(&mut self, degrees: f64) {
        self.renderers
            .iter_mut()
            .for_each(|r| r.set_needle_rotation(degrees));
    }

    /// Presents every renderer and reports the first failure
    fn present(&mut self) -> Result<(), PollError> {
        let mut first_err = None;
        for renderer in &mut self.renderers {
            if let Err(e) = renderer.present() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn set_status(&mut self, _: &Status) {}
        fn set_speed(&mut self, _: &str) {}
        fn set_direction(&mut self, _: &str) {}
        fn set_time(&mut self, _: &str) {}
        fn set_needle_rotation(&mut self, _: f64) {}

        fn present(&mut self) -> Result<(), PollError> {
            Err(PollError::Render("disk full".to_string()))
        }
    }

    #[test]
    fn test_status_text() {
        assert_eq!(Status::Fetching.to_string(), "Fetching…");
        assert_eq!(Status::Ok("XCDC1".to_string()).to_string(), "OK • XCDC1");
        assert_eq!(
            Status::Error("HTTP 500 Internal Server Error".to_string()).to_string(),
            "Error: HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn test_default_state_is_placeholder() {
        let state = DisplayState::default();
        assert_eq!(state.speed, PLACEHOLDER);
        assert_eq!(state.direction, PLACEHOLDER);
        assert_eq!(state.time, PLACEHOLDER);
        assert_eq!(state.status, Status::Idle);
    }

    #[test]
    fn test_fanout_reports_present_failure() {
        let mut fanout = Fanout::new();
        fanout.push(DisplayState::default());
        fanout.push(FailingRenderer);

        fanout.set_speed("5.0 mph");
        assert_eq!(
            fanout.present(),
            Err(PollError::Render("disk full".to_string()))
        );
    }
}
