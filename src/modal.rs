//! Video modal
//!
//! Overlay panel for the "watch our story" embed. Opening loads the
//! configured video source into the frame; closing clears it so playback
//! (and its audio) stops. While open the page underneath is dimmed and
//! receives no input.

use crate::display::{
    draw_text, draw_text_centered, text_width, PixelBuffer,
};

const PANEL_BG: (u8, u8, u8) = (16, 20, 18);
const PANEL_BORDER: (u8, u8, u8) = (0, 255, 136);
const FRAME_BG: (u8, u8, u8) = (4, 6, 5);
const TITLE_COLOR: (u8, u8, u8) = (255, 255, 255);
const HINT_COLOR: (u8, u8, u8) = (140, 150, 145);

pub struct Modal {
    active: bool,
    /// Configured embed target
    video_url: String,
    /// Source currently loaded into the frame; empty while closed
    video_src: String,
}

impl Modal {
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            active: false,
            video_url: video_url.into(),
            video_src: String::new(),
        }
    }

    /// Show the overlay and start the embed
    pub fn open(&mut self) {
        self.video_src = self.video_url.clone();
        self.active = true;
    }

    /// Hide the overlay and clear the source to stop playback
    pub fn close(&mut self) {
        self.active = false;
        self.video_src.clear();
    }

    pub fn is_open(&self) -> bool {
        self.active
    }

    /// Source currently loaded into the video frame
    pub fn video_src(&self) -> &str {
        &self.video_src
    }

    /// Panel bounds for the given surface size
    fn panel_rect(&self, width: u32, height: u32) -> (i32, i32, u32, u32) {
        let w = width * 3 / 4;
        let h = height / 2;
        let x = (width - w) as i32 / 2;
        let y = (height - h) as i32 / 2;
        (x, y, w, h)
    }

    /// Handle a click while open. A click on the dimmed surround closes the
    /// modal (overlay-click-to-close); clicks inside the panel are absorbed.
    /// Returns true when the event was consumed (always, while open).
    pub fn handle_click(&mut self, x: i32, y: i32, width: u32, height: u32) -> bool {
        if !self.active {
            return false;
        }
        let (px, py, pw, ph) = self.panel_rect(width, height);
        let inside =
            x >= px && x < px + pw as i32 && y >= py && y < py + ph as i32;
        if !inside {
            self.close();
        }
        true
    }

    pub fn render(&self, buffer: &mut PixelBuffer) {
        if !self.active {
            return;
        }

        // Dim everything underneath
        buffer.dim();

        let (x, y, w, h) = self.panel_rect(buffer.width(), buffer.height());
        buffer.fill_rect(x, y, w, h, PANEL_BG.0, PANEL_BG.1, PANEL_BG.2);
        buffer.draw_rect(x, y, w, h, PANEL_BORDER.0, PANEL_BORDER.1, PANEL_BORDER.2);

        draw_text(
            buffer,
            x + 10,
            y + 8,
            "OUR STORY",
            TITLE_COLOR.0,
            TITLE_COLOR.1,
            TITLE_COLOR.2,
        );
        // Close control, top-right
        let close_x = x + w as i32 - 14;
        draw_text(buffer, close_x, y + 8, "X", HINT_COLOR.0, HINT_COLOR.1, HINT_COLOR.2);

        // Video frame with the loaded source captioned underneath
        let frame_x = x + 10;
        let frame_y = y + 22;
        let frame_w = w.saturating_sub(20);
        let frame_h = h.saturating_sub(56);
        buffer.fill_rect(frame_x, frame_y, frame_w, frame_h, FRAME_BG.0, FRAME_BG.1, FRAME_BG.2);
        buffer.draw_rect(frame_x, frame_y, frame_w, frame_h, HINT_COLOR.0, HINT_COLOR.1, HINT_COLOR.2);

        // Play glyph in the middle of the frame
        let cx = frame_x + frame_w as i32 / 2;
        let cy = frame_y + frame_h as i32 / 2;
        for i in 0..8 {
            buffer.vline(cx - 4 + i, cy - 8 + i, cy + 8 - i, PANEL_BORDER.0, PANEL_BORDER.1, PANEL_BORDER.2);
        }

        let src = if self.video_src.len() > 48 {
            &self.video_src[..48]
        } else {
            &self.video_src
        };
        let src_x = x + (w as i32 - text_width(src) as i32) / 2;
        draw_text(buffer, src_x, y + h as i32 - 26, src, HINT_COLOR.0, HINT_COLOR.1, HINT_COLOR.2);

        draw_text_centered(
            buffer,
            y + h as i32 - 12,
            "ESC OR CLICK OUTSIDE TO CLOSE",
            HINT_COLOR.0,
            HINT_COLOR.1,
            HINT_COLOR.2,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/embed/abc";

    #[test]
    fn test_starts_closed_with_empty_src() {
        let modal = Modal::new(URL);
        assert!(!modal.is_open());
        assert_eq!(modal.video_src(), "");
    }

    #[test]
    fn test_open_loads_source() {
        let mut modal = Modal::new(URL);
        modal.open();
        assert!(modal.is_open());
        assert_eq!(modal.video_src(), URL);
    }

    #[test]
    fn test_close_clears_source() {
        let mut modal = Modal::new(URL);
        modal.open();
        modal.close();
        assert!(!modal.is_open());
        assert_eq!(modal.video_src(), "", "source must be cleared to stop audio");
    }

    #[test]
    fn test_reopen_after_close() {
        let mut modal = Modal::new(URL);
        modal.open();
        modal.close();
        modal.open();
        assert_eq!(modal.video_src(), URL);
    }

    #[test]
    fn test_overlay_click_closes() {
        let mut modal = Modal::new(URL);
        modal.open();
        // Top-left corner is outside the centered panel
        assert!(modal.handle_click(1, 1, 640, 480));
        assert!(!modal.is_open());
        assert_eq!(modal.video_src(), "");
    }

    #[test]
    fn test_panel_click_is_absorbed() {
        let mut modal = Modal::new(URL);
        modal.open();
        assert!(modal.handle_click(320, 240, 640, 480));
        assert!(modal.is_open());
    }

    #[test]
    fn test_click_ignored_while_closed() {
        let mut modal = Modal::new(URL);
        assert!(!modal.handle_click(320, 240, 640, 480));
    }
}
