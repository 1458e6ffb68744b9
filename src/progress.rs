//! Progress bar widget
//!
//! Owns the refresh lifecycle: loading indicator, status line, the delayed
//! width transition, and the goal celebration. The actual fetch lives in
//! `feed`; this widget only ever sees its outcome, and every failure
//! collapses into the fallback value with a stale-data marker — nothing
//! propagates past here.

use crate::display::{draw_text, text_width, PixelBuffer};
use crate::feed::FeedError;
use crate::util::{approach, group_thousands};

const LOADING_TEXT: &str = "Loading market cap data...";
const STALE_SUFFIX: &str = " (using cached data)";
const COMPLETE_TEXT: &str = "Goal Reached!";

/// Presentation delay before the width transition starts, so the text
/// update and the bar movement read as two beats
const WIDTH_DELAY: f32 = 0.5;

/// Delay between the completion message and the celebration burst
const CELEBRATION_DELAY: f32 = 1.0;

/// Width approach rate per second (transition analog)
const WIDTH_RATE: f32 = 6.0;

const BAR_FILL: (u8, u8, u8) = (0, 255, 136);
const BAR_TRACK: (u8, u8, u8) = (24, 28, 26);
const BAR_BORDER: (u8, u8, u8) = (70, 90, 80);
const LABEL_COLOR: (u8, u8, u8) = (220, 230, 225);

/// Progress toward the goal, clamped to [0, 100]. Inputs are assumed
/// non-negative (market caps are).
pub fn percentage(value: f64, goal: f64) -> f64 {
    (value / goal * 100.0).min(100.0)
}

/// A percentage waiting out the presentation delay before it becomes the
/// bar's animation target
struct PendingTarget {
    pct: f32,
    delay: f32,
}

pub struct ProgressWidget {
    goal: f64,
    fallback: f64,
    reduced_motion: bool,
    label: String,
    /// Rendered width in percent, eased toward `target`
    displayed: f32,
    target: f32,
    pending: Option<PendingTarget>,
    /// Countdown to the celebration burst once the goal is reached
    celebration: Option<f32>,
}

impl ProgressWidget {
    pub fn new(goal: f64, fallback: f64, reduced_motion: bool) -> Self {
        Self {
            goal,
            fallback,
            reduced_motion,
            label: LOADING_TEXT.to_string(),
            displayed: 0.0,
            target: 0.0,
            pending: None,
            celebration: None,
        }
    }

    /// Synchronous start of a refresh cycle: loading indicator up, width
    /// back to zero, pending animations from the previous cycle discarded.
    pub fn begin_refresh(&mut self) {
        self.label = LOADING_TEXT.to_string();
        self.displayed = 0.0;
        self.target = 0.0;
        self.pending = None;
        self.celebration = None;
    }

    /// Fold a feed outcome into the widget. Failures are logged for
    /// operators and rendered as the fallback value with the stale marker.
    pub fn apply_outcome(&mut self, outcome: Result<f64, FeedError>) {
        match outcome {
            Ok(value) => self.apply(value, false),
            Err(e) => {
                log::warn!("Market cap fetch failed: {}", e);
                self.apply(self.fallback, true);
            }
        }
    }

    /// Render a value: format the status line immediately, then arm the
    /// delayed width transition
    pub fn apply(&mut self, value: f64, stale: bool) {
        let pct = percentage(value, self.goal);
        let mut label = format!(
            "Current MC: ${} | Goal: ${} | Progress: {:.2}%",
            group_thousands(value.round() as u64),
            group_thousands(self.goal.round() as u64),
            pct
        );
        if stale {
            label.push_str(STALE_SUFFIX);
        }
        self.label = label;

        let delay = if self.reduced_motion { 0.0 } else { WIDTH_DELAY };
        self.pending = Some(PendingTarget {
            pct: pct as f32,
            delay,
        });
    }

    /// Advance animations. Returns true exactly when the celebration burst
    /// should fire (once per goal-reaching refresh).
    pub fn update(&mut self, dt: f32) -> bool {
        if let Some(pending) = &mut self.pending {
            pending.delay -= dt;
            if pending.delay <= 0.0 {
                let pct = pending.pct;
                self.pending = None;
                self.target = pct;
                if pct >= 100.0 {
                    self.label = COMPLETE_TEXT.to_string();
                    self.celebration = Some(CELEBRATION_DELAY);
                }
            }
        }

        if self.reduced_motion {
            self.displayed = self.target;
        } else {
            self.displayed = approach(self.displayed, self.target, WIDTH_RATE, dt);
            if (self.target - self.displayed).abs() < 0.05 {
                self.displayed = self.target;
            }
        }

        if let Some(countdown) = &mut self.celebration {
            *countdown -= dt;
            if *countdown <= 0.0 {
                self.celebration = None;
                return true;
            }
        }
        false
    }

    /// Draw the bar track, the eased fill, and the status line beneath
    pub fn render(&self, buffer: &mut PixelBuffer, x: i32, y: i32, w: u32, h: u32) {
        buffer.fill_rect(x, y, w, h, BAR_TRACK.0, BAR_TRACK.1, BAR_TRACK.2);
        buffer.draw_rect(x, y, w, h, BAR_BORDER.0, BAR_BORDER.1, BAR_BORDER.2);

        let inner_w = w.saturating_sub(2);
        let fill_w = (self.displayed / 100.0 * inner_w as f32) as u32;
        if fill_w > 0 {
            buffer.fill_rect(
                x + 1,
                y + 1,
                fill_w.min(inner_w),
                h.saturating_sub(2),
                BAR_FILL.0,
                BAR_FILL.1,
                BAR_FILL.2,
            );
        }

        let label_x = x + (w as i32 - text_width(&self.label) as i32) / 2;
        draw_text(
            buffer,
            label_x,
            y + h as i32 + 6,
            &self.label,
            LABEL_COLOR.0,
            LABEL_COLOR.1,
            LABEL_COLOR.2,
        );
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Rendered width in percent
    pub fn displayed(&self) -> f32 {
        self.displayed
    }
}
