//! Ticker band
//!
//! Classic leftward news-ticker strip along the bottom edge. The text is
//! drawn in repeating copies so the loop is seamless; hovering the band
//! pauses it, and reduced motion freezes it entirely.

use crate::display::{draw_text, text_width, PixelBuffer};

pub const BAND_HEIGHT: u32 = 18;

const SPEED: f32 = 60.0; // pixels per second, leftward
const BAND_BG: (u8, u8, u8) = (10, 14, 12);
const BAND_EDGE: (u8, u8, u8) = (0, 120, 66);
const TEXT_COLOR: (u8, u8, u8) = (0, 255, 136);

pub struct Ticker {
    text: String,
    x: f32,
    paused: bool,
    frozen: bool,
    screen_width: u32,
}

impl Ticker {
    pub fn new(text: impl Into<String>, screen_width: u32, reduced_motion: bool) -> Self {
        Self {
            text: text.into(),
            x: 0.0,
            paused: false,
            frozen: reduced_motion,
            screen_width,
        }
    }

    /// Hover pauses the scroll (and resumes it on leave)
    pub fn set_hover(&mut self, hover: bool) {
        self.paused = hover;
    }

    pub fn is_paused(&self) -> bool {
        self.paused || self.frozen
    }

    /// Offset of the first text copy, always in (-text_width, 0]
    pub fn offset(&self) -> f32 {
        self.x
    }

    pub fn update(&mut self, dt: f32) {
        if self.is_paused() {
            return;
        }
        let tile = text_width(&self.text) as f32;
        if tile <= 0.0 {
            return;
        }
        self.x -= SPEED * dt;
        // Seamless wrap: step back by whole tiles, never jump visually
        while self.x <= -tile {
            self.x += tile;
        }
    }

    /// Render the band with its top edge at `y`
    pub fn render(&self, buffer: &mut PixelBuffer, y: i32) {
        buffer.fill_rect(0, y, self.screen_width, BAND_HEIGHT, BAND_BG.0, BAND_BG.1, BAND_BG.2);
        buffer.hline(
            0,
            self.screen_width as i32 - 1,
            y,
            BAND_EDGE.0,
            BAND_EDGE.1,
            BAND_EDGE.2,
        );

        let tile = text_width(&self.text) as i32;
        if tile <= 0 {
            return;
        }
        let text_y = y + (BAND_HEIGHT as i32 - 7) / 2;
        let mut cx = self.x as i32;
        while cx < self.screen_width as i32 {
            draw_text(
                buffer,
                cx,
                text_y,
                &self.text,
                TEXT_COLOR.0,
                TEXT_COLOR.1,
                TEXT_COLOR.2,
            );
            cx += tile;
        }
    }
}
