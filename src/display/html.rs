//! Self-refreshing HTML page with a compass needle

use super::{DisplayState, Renderer, Status};
use crate::shared::PollError;
use std::fs;
use std::path::PathBuf;

/// Writes the display state to an HTML file after every cycle.
///
/// The page reloads itself on the poll interval, so pointing a browser at the
/// file gives the same live view as a hosted page.
pub struct HtmlRenderer {
    state: DisplayState,
    path: PathBuf,
    refresh_secs: u64,
}

impl HtmlRenderer {
    pub fn new(path: impl Into<PathBuf>, refresh_secs: u64) -> Self {
        Self {
            state: DisplayState::default(),
            path: path.into(),
            refresh_secs: refresh_secs.max(1),
        }
    }

    pub fn render_page(&self) -> String {
        let s = &self.state;
        let status_class = match s.status {
            Status::Ok(_) => "ok",
            Status::Error(_) => "error",
            _ => "pending",
        };

        format!(
            r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="{refresh}">
<title>Wind</title>
<style>
body {{ font-family: system-ui, sans-serif; text-align: center; margin: 2rem; }}
.dial {{ position: relative; width: 240px; height: 240px; margin: 1rem auto; border: 3px solid #333; border-radius: 50%; }}
.dial span {{ position: absolute; font-weight: bold; }}
.n {{ top: 4px; left: 50%; transform: translateX(-50%); }}
.e {{ right: 8px; top: 50%; transform: translateY(-50%); }}
.s {{ bottom: 4px; left: 50%; transform: translateX(-50%); }}
.w {{ left: 8px; top: 50%; transform: translateY(-50%); }}
#needle {{ position: absolute; left: 50%; top: 50%; width: 6px; height: 100px; background: #c0392b; border-radius: 3px; transform-origin: 50% 90%; }}
.ok {{ color: #1e7e34; }}
.error {{ color: #c0392b; }}
.pending {{ color: #666; }}
</style>
</head>
<body>
<div id="status" class="{status_class}">{status}</div>
<div class="dial">
<span class="n">N</span><span class="e">E</span><span class="s">S</span><span class="w">W</span>
<div id="needle" style="transform: translate(-50%, -90%) rotate({needle}deg)"></div>
</div>
<div id="speedText">{speed}</div>
<div id="dirText">{direction}</div>
<div id="timeText">{time}</div>
</body>
</html>
"#,
            refresh = self.refresh_secs,
            status_class = status_class,
            status = escape(&s.status.to_string()),
            needle = s.needle,
            speed = escape(&s.speed),
            direction = escape(&s.direction),
            time = escape(&s.time),
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Renderer for HtmlRenderer {
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

    /// Written to a sibling temp file, then renamed over the page
    fn present(&mut self) -> Result<(), PollError> {
        let page = self.render_page();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| PollError::Render(format!("{}: {}", parent.display(), e)))?;
        }

        let tmp = self.path.with_extension("html.tmp");
        fs::write(&tmp, page)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| PollError::Render(format!("{}: {}", self.path.display(), e)))
    }
}
