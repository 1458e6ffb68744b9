//! Page layout
//!
//! The vertical page: fixed header with anchor navigation, a scrollable
//! stack of sections with one-way reveal animation, and the hero controls
//! (watch-story, refresh, call-to-action). The progress widget itself lives
//! in `progress`; the page only decides where it sits under the current
//! scroll offset.

use crate::display::{
    draw_text, draw_text_blend, draw_text_scaled, text_width, PixelBuffer,
};
use crate::ticker::BAND_HEIGHT;
use crate::util::{approach, lerp_color};

pub const HEADER_HEIGHT: u32 = 28;

/// Reveal requires 10% of a section inside the viewport, with a margin
/// pulled up from the bottom edge
const REVEAL_THRESHOLD: f32 = 0.1;
const REVEAL_MARGIN: f32 = 50.0;
const REVEAL_RATE: f32 = 3.0;
/// Slide-in distance while a section fades in
const REVEAL_SLIDE: f32 = 12.0;

const SCROLL_RATE: f32 = 8.0;
const WHEEL_STEP: f32 = 40.0;
/// Anchor scrolls land this far below the header
const ANCHOR_PAD: f32 = 8.0;

const BG_TOP: (u8, u8, u8) = (6, 9, 8);
const BG_BOTTOM: (u8, u8, u8) = (12, 18, 15);
const HEADER_BG: (u8, u8, u8) = (10, 14, 12);
const ACCENT: (u8, u8, u8) = (0, 255, 136);
const TITLE_COLOR: (u8, u8, u8) = (255, 255, 255);
const BODY_COLOR: (u8, u8, u8) = (170, 182, 176);
const BUTTON_BG: (u8, u8, u8) = (20, 26, 23);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    WatchStory,
    Refresh,
    Cta,
}

struct Button {
    /// Page-space bounds
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    label: &'static str,
    action: ButtonAction,
}

impl Button {
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w as i32 && y >= self.y && y < self.y + self.h as i32
    }
}

struct Section {
    title: &'static str,
    nav_label: &'static str,
    body: &'static [&'static str],
    /// Page-space top
    top: f32,
    height: f32,
    reveal: f32,
    revealing: bool,
}

pub struct Page {
    sections: Vec<Section>,
    buttons: Vec<Button>,
    scroll: f32,
    scroll_target: f32,
    content_height: f32,
    viewport_h: f32,
    width: u32,
    reduced_motion: bool,
    /// Page-space progress bar bounds inside the hero
    progress_x: i32,
    progress_y: f32,
    progress_w: u32,
    progress_h: u32,
    /// Refresh icon rotation while a fetch is in flight
    spin_phase: f32,
}

const HERO_BODY: &[&str] = &[];
const STORY_BODY: &[&str] = &[
    "He said he would live on a treadmill",
    "until the market cap hits 100 mill.",
    "The belt has not stopped since.",
];
const COMMUNITY_BODY: &[&str] = &[
    "Every holder is a step. Join the walk,",
    "catch the nightly mile counts live,",
    "and keep the belt moving.",
];
const DISCLAIMER_BODY: &[&str] = &[
    "Nothing on this wall is financial advice.",
    "The treadmill is real. The gains may not be.",
    "Walk responsibly.",
];

impl Page {
    pub fn new(width: u32, screen_height: u32, reduced_motion: bool) -> Self {
        let viewport_h = screen_height.saturating_sub(HEADER_HEIGHT + BAND_HEIGHT) as f32;

        // Hero: headline, progress bar + label, button row
        let progress_x = 40;
        let progress_y = 64.0;
        let progress_w = width.saturating_sub(80);
        let progress_h = 20;

        let mut buttons = Vec::new();
        let button_y = 116;
        let button_h = 18;
        let mut bx = 40;
        for (label, action) in [
            ("WATCH STORY", ButtonAction::WatchStory),
            ("REFRESH", ButtonAction::Refresh),
            ("BUY $TREAD", ButtonAction::Cta),
        ] {
            // Refresh carries a spin icon on its right edge
            let icon_pad = if action == ButtonAction::Refresh { 16 } else { 0 };
            let w = text_width(label) + 16 + icon_pad;
            buttons.push(Button {
                x: bx,
                y: button_y,
                w,
                h: button_h,
                label,
                action,
            });
            bx += w as i32 + 12;
        }

        let mut sections = Vec::new();
        let mut top = 0.0;
        for (title, nav_label, body, extra) in [
            ("LIVE ON TREADMILL TILL 100 MILL", "HOME", HERO_BODY, 170.0),
            ("THE STORY", "STORY", STORY_BODY, 0.0),
            ("COMMUNITY", "COMMUNITY", COMMUNITY_BODY, 0.0),
            ("FINE PRINT", "INFO", DISCLAIMER_BODY, 40.0),
        ] {
            let height = 26.0 + body.len() as f32 * 12.0 + 24.0 + extra;
            sections.push(Section {
                title,
                nav_label,
                body,
                top,
                height,
                reveal: 0.0,
                revealing: false,
            });
            top += height;
        }

        Self {
            sections,
            buttons,
            scroll: 0.0,
            scroll_target: 0.0,
            content_height: top,
            viewport_h,
            width,
            reduced_motion,
            progress_x,
            progress_y,
            progress_w,
            progress_h,
            spin_phase: 0.0,
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_h).max(0.0)
    }

    /// Anchor navigation: ease the viewport to a section top
    pub fn scroll_to_section(&mut self, idx: usize) {
        if let Some(section) = self.sections.get(idx) {
            self.scroll_target = (section.top - ANCHOR_PAD).clamp(0.0, self.max_scroll());
        }
    }

    /// Wheel / arrow-key scrolling in pixel steps
    pub fn scroll_by(&mut self, steps: f32) {
        self.scroll_target =
            (self.scroll_target + steps * WHEEL_STEP).clamp(0.0, self.max_scroll());
    }

    pub fn update(&mut self, dt: f32, refresh_in_flight: bool) {
        if self.reduced_motion {
            self.scroll = self.scroll_target;
        } else {
            self.scroll = approach(self.scroll, self.scroll_target, SCROLL_RATE, dt);
            if (self.scroll_target - self.scroll).abs() < 0.5 {
                self.scroll = self.scroll_target;
            }
        }

        // One-way reveals: once triggered a section never hides again
        let view_top = self.scroll;
        let view_bottom = self.scroll + self.viewport_h - REVEAL_MARGIN;
        for section in &mut self.sections {
            if !section.revealing {
                let visible = (section.top + section.height).min(view_bottom)
                    - section.top.max(view_top);
                if visible >= section.height * REVEAL_THRESHOLD {
                    section.revealing = true;
                }
            }
            if section.revealing && section.reveal < 1.0 {
                if self.reduced_motion {
                    section.reveal = 1.0;
                } else {
                    section.reveal = (section.reveal + REVEAL_RATE * dt).min(1.0);
                }
            }
        }

        if refresh_in_flight {
            self.spin_phase += dt * std::f32::consts::TAU;
        }
    }

    /// Reveal progress of a section in [0, 1]
    pub fn reveal(&self, idx: usize) -> f32 {
        self.sections.get(idx).map_or(0.0, |s| s.reveal)
    }

    /// Header nav hit test (screen space)
    pub fn nav_hit(&self, x: i32, y: i32) -> Option<usize> {
        if y < 0 || y >= HEADER_HEIGHT as i32 {
            return None;
        }
        let mut nx = self.nav_start_x();
        for (idx, section) in self.sections.iter().enumerate() {
            let w = text_width(section.nav_label) as i32 + 14;
            if x >= nx && x < nx + w {
                return Some(idx);
            }
            nx += w;
        }
        None
    }

    /// Hero button hit test (screen space, scroll-aware)
    pub fn button_hit(&self, x: i32, y: i32) -> Option<ButtonAction> {
        let view_h = self.viewport_h as i32;
        let local_y = y - HEADER_HEIGHT as i32;
        if local_y < 0 || local_y >= view_h {
            return None;
        }
        let page_y = local_y + self.scroll as i32;
        self.buttons
            .iter()
            .find(|b| b.contains(x, page_y))
            .map(|b| b.action)
    }

    /// Screen-space progress bar bounds under the current scroll
    pub fn progress_anchor(&self) -> (i32, i32, u32, u32) {
        (
            self.progress_x,
            (self.progress_y - self.scroll) as i32 + HEADER_HEIGHT as i32,
            self.progress_w,
            self.progress_h,
        )
    }

    fn nav_start_x(&self) -> i32 {
        self.width as i32 - {
            let mut total = 0;
            for section in &self.sections {
                total += text_width(section.nav_label) as i32 + 14;
            }
            total
        } - 6
    }

    pub fn render(&self, buffer: &mut PixelBuffer, refresh_in_flight: bool) {
        self.render_background(buffer);
        self.render_sections(buffer);
        self.render_buttons(buffer, refresh_in_flight);
        self.render_header(buffer);
    }

    fn render_background(&self, buffer: &mut PixelBuffer) {
        let h = buffer.height() as i32;
        let w = buffer.width() as i32;
        for row in 0..h {
            let t = row as f32 / h as f32;
            let (r, g, b) = lerp_color(BG_TOP, BG_BOTTOM, t);
            buffer.hline(0, w - 1, row, r, g, b);
        }
    }

    fn render_sections(&self, buffer: &mut PixelBuffer) {
        let header = HEADER_HEIGHT as i32;
        let view_bottom = header + self.viewport_h as i32;

        for (idx, section) in self.sections.iter().enumerate() {
            if section.reveal <= 0.0 {
                continue;
            }
            let slide = ((1.0 - section.reveal) * REVEAL_SLIDE) as i32;
            let screen_top = header + (section.top - self.scroll) as i32 + slide;
            if screen_top >= view_bottom || screen_top + (section.height as i32) < header {
                continue;
            }

            let alpha = (section.reveal * 255.0) as u8;
            if idx == 0 {
                // Hero headline gets the big treatment
                let title_x =
                    (self.width as i32 - text_width(section.title) as i32 * 2) / 2;
                draw_text_scaled(
                    buffer,
                    title_x,
                    screen_top + 16,
                    section.title,
                    TITLE_COLOR.0,
                    TITLE_COLOR.1,
                    TITLE_COLOR.2,
                    2,
                );
            } else {
                draw_text_blend(
                    buffer,
                    40,
                    screen_top + 8,
                    section.title,
                    ACCENT.0,
                    ACCENT.1,
                    ACCENT.2,
                    alpha,
                );
                buffer.hline(
                    40,
                    40 + text_width(section.title) as i32,
                    screen_top + 18,
                    ACCENT.0 / 2,
                    ACCENT.1 / 2,
                    ACCENT.2 / 2,
                );
            }

            let mut line_y = screen_top + 26;
            for line in section.body {
                draw_text_blend(
                    buffer,
                    40,
                    line_y,
                    line,
                    BODY_COLOR.0,
                    BODY_COLOR.1,
                    BODY_COLOR.2,
                    alpha,
                );
                line_y += 12;
            }
        }
    }

    fn render_buttons(&self, buffer: &mut PixelBuffer, refresh_in_flight: bool) {
        let header = HEADER_HEIGHT as i32;
        for button in &self.buttons {
            let y = header + (button.y as f32 - self.scroll) as i32;
            if y + button.h as i32 <= header || y >= header + self.viewport_h as i32 {
                continue;
            }
            buffer.fill_rect(button.x, y, button.w, button.h, BUTTON_BG.0, BUTTON_BG.1, BUTTON_BG.2);
            buffer.draw_rect(button.x, y, button.w, button.h, ACCENT.0, ACCENT.1, ACCENT.2);
            draw_text(
                buffer,
                button.x + 8,
                y + (button.h as i32 - 7) / 2,
                button.label,
                TITLE_COLOR.0,
                TITLE_COLOR.1,
                TITLE_COLOR.2,
            );

            if button.action == ButtonAction::Refresh {
                // Spin icon: orbiting dot while a fetch is in flight
                let cx = button.x + button.w as i32 - 10;
                let cy = y + button.h as i32 / 2;
                buffer.draw_circle(cx, cy, 4, BODY_COLOR.0, BODY_COLOR.1, BODY_COLOR.2);
                let angle = if refresh_in_flight {
                    self.spin_phase
                } else {
                    -std::f32::consts::FRAC_PI_2
                };
                let dx = (angle.cos() * 4.0) as i32;
                let dy = (angle.sin() * 4.0) as i32;
                buffer.fill_circle(cx + dx, cy + dy, 1, ACCENT.0, ACCENT.1, ACCENT.2);
            }
        }
    }

    fn render_header(&self, buffer: &mut PixelBuffer) {
        buffer.fill_rect(0, 0, self.width, HEADER_HEIGHT, HEADER_BG.0, HEADER_BG.1, HEADER_BG.2);
        buffer.hline(
            0,
            self.width as i32 - 1,
            HEADER_HEIGHT as i32 - 1,
            ACCENT.0 / 2,
            ACCENT.1 / 2,
            ACCENT.2 / 2,
        );
        draw_text(buffer, 8, 10, "$TREAD", ACCENT.0, ACCENT.1, ACCENT.2);

        let mut nx = self.nav_start_x();
        for section in &self.sections {
            draw_text(
                buffer,
                nx + 7,
                10,
                section.nav_label,
                BODY_COLOR.0,
                BODY_COLOR.1,
                BODY_COLOR.2,
            );
            nx += text_width(section.nav_label) as i32 + 14;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::new(640, 480, false)
    }

    fn settle(page: &mut Page, secs: f32) {
        let steps = (secs * 60.0).ceil() as usize;
        for _ in 0..steps {
            page.update(1.0 / 60.0, false);
        }
    }

    #[test]
    fn test_four_sections_taller_than_viewport() {
        let p = page();
        assert_eq!(p.section_count(), 4);
        assert!(p.max_scroll() > 0.0, "page must actually scroll");
    }

    #[test]
    fn test_scroll_to_section_converges() {
        let mut p = page();
        p.scroll_to_section(2);
        settle(&mut p, 3.0);
        let expected = (p.sections[2].top - ANCHOR_PAD).clamp(0.0, p.max_scroll());
        assert_eq!(p.scroll(), expected);
    }

    #[test]
    fn test_scroll_clamps_at_edges() {
        let mut p = page();
        p.scroll_by(-10.0);
        settle(&mut p, 2.0);
        assert_eq!(p.scroll(), 0.0);

        p.scroll_by(1000.0);
        settle(&mut p, 5.0);
        assert_eq!(p.scroll(), p.max_scroll());
    }

    #[test]
    fn test_reveal_is_one_way() {
        let mut p = page();
        settle(&mut p, 1.0);
        assert_eq!(p.reveal(0), 1.0, "hero starts visible");
        assert_eq!(p.reveal(3), 0.0, "bottom section starts hidden");

        p.scroll_by(1000.0);
        settle(&mut p, 5.0);
        assert_eq!(p.reveal(3), 1.0);

        // Scrolling back up must not hide it again
        p.scroll_by(-1000.0);
        settle(&mut p, 5.0);
        assert_eq!(p.reveal(3), 1.0);
    }

    #[test]
    fn test_reveal_monotonic() {
        let mut p = page();
        let mut last = 0.0;
        for _ in 0..120 {
            p.update(1.0 / 60.0, false);
            let r = p.reveal(0);
            assert!(r >= last);
            last = r;
        }
    }

    #[test]
    fn test_button_hit_respects_scroll() {
        let mut p = page();
        let button = &p.buttons[0];
        let screen_y = HEADER_HEIGHT as i32 + button.y + 2;
        assert_eq!(
            p.button_hit(button.x + 2, screen_y),
            Some(ButtonAction::WatchStory)
        );

        // After scrolling a full section the same screen point misses
        p.scroll_to_section(2);
        settle(&mut p, 3.0);
        assert_eq!(p.button_hit(p.buttons[0].x + 2, screen_y), None);
    }

    #[test]
    fn test_button_actions_distinct() {
        let p = page();
        let header = HEADER_HEIGHT as i32;
        let hits: Vec<_> = p
            .buttons
            .iter()
            .map(|b| p.button_hit(b.x + 2, header + b.y + 2).unwrap())
            .collect();
        assert_eq!(
            hits,
            vec![
                ButtonAction::WatchStory,
                ButtonAction::Refresh,
                ButtonAction::Cta
            ]
        );
    }

    #[test]
    fn test_header_clicks_never_hit_buttons() {
        let p = page();
        assert_eq!(p.button_hit(p.buttons[0].x + 2, 5), None);
    }

    #[test]
    fn test_nav_hit_maps_every_section() {
        let p = page();
        let mut nx = p.nav_start_x();
        for idx in 0..p.section_count() {
            let w = text_width(p.sections[idx].nav_label) as i32 + 14;
            assert_eq!(p.nav_hit(nx + 1, 10), Some(idx));
            nx += w;
        }
        assert_eq!(p.nav_hit(5, 100), None, "below the header is not nav");
    }

    #[test]
    fn test_reduced_motion_snaps_scroll() {
        let mut p = Page::new(640, 480, true);
        p.scroll_to_section(3);
        p.update(0.0, false);
        assert_eq!(p.scroll(), p.scroll_target);
        assert!(p.scroll() > 0.0);
    }

    #[test]
    fn test_progress_anchor_tracks_scroll() {
        let mut p = page();
        let (_, y0, _, _) = p.progress_anchor();
        p.scroll_by(2.0);
        settle(&mut p, 2.0);
        let (_, y1, _, _) = p.progress_anchor();
        assert!(y1 < y0);
    }
}
