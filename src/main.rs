// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod config;
mod confetti;
mod display;
mod feed;
mod modal;
mod page;
mod progress;
mod ticker;
mod util;

use config::WidgetConfig;
use confetti::ConfettiEngine;
use display::{draw_text, Display, InputEvent, MouseButtonKind, PixelBuffer, RenderTarget};
use display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use feed::MarketFeed;
use modal::Modal;
use page::{ButtonAction, Page};
use progress::ProgressWidget;
use sdl2::keyboard::Keycode;
use ticker::{Ticker, BAND_HEIGHT};
use util::FpsCounter;

struct Args {
    width: u32,
    height: u32,
    vsync: bool,
    config_path: String,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        config_path: config::DEFAULT_CONFIG_PATH.to_string(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => parsed.vsync = false,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        parsed.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        parsed.height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1920x1080)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            parsed.width = w;
                            parsed.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config_path = args[i + 1].clone();
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: capwall [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!("  --config PATH, -c PATH    Widget config file (default: {})", config::DEFAULT_CONFIG_PATH);
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    parsed
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = parse_args();
    let config = WidgetConfig::load_or_default(&args.config_path);

    let (mut display, texture_creator) =
        Display::with_options("capwall", args.width, args.height, args.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, args.width, args.height)?;
    let mut buffer = PixelBuffer::with_size(args.width, args.height);

    // FPS counter with 60 sample rolling average
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;

    let mut feed = MarketFeed::new(config.api_url.clone()).map_err(|e| e.to_string())?;
    let mut progress = ProgressWidget::new(
        config.goal,
        config.fallback_market_cap,
        config.reduced_motion,
    );
    let mut confetti = ConfettiEngine::new(args.width, args.height, 0x7EAD);
    let mut page = Page::new(args.width, args.height, config.reduced_motion);
    let mut modal = Modal::new(config.video_url.clone());
    let mut ticker = Ticker::new(config.ticker_text.clone(), args.width, config.reduced_motion);

    let ticker_top = args.height as i32 - BAND_HEIGHT as i32;

    log::info!(
        "capwall {}x{}, goal ${}, polling every {}s",
        args.width,
        args.height,
        util::group_thousands(config.goal.round() as u64),
        config.refresh_interval_secs
    );

    // Initial refresh on startup
    progress.begin_refresh();
    feed.request_refresh();
    let mut refresh_countdown = config.refresh_interval_secs;

    'main: loop {
        let (dt, _current_fps, avg_fps) = fps_counter.tick();

        // Handle input
        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => match key {
                    Keycode::Escape => {
                        if modal.is_open() {
                            modal.close();
                        } else {
                            break 'main;
                        }
                    },
                    Keycode::R => {
                        if !modal.is_open() {
                            confetti.fire_celebration();
                        }
                    },
                    Keycode::W => {
                        if !modal.is_open() {
                            modal.open();
                        }
                    },
                    Keycode::F => show_fps = !show_fps,
                    Keycode::Num1 => page.scroll_to_section(0),
                    Keycode::Num2 => page.scroll_to_section(1),
                    Keycode::Num3 => page.scroll_to_section(2),
                    Keycode::Num4 => page.scroll_to_section(3),
                    Keycode::Up => page.scroll_by(-1.0),
                    Keycode::Down => page.scroll_by(1.0),
                    _ => {},
                },
                InputEvent::MouseMove { x: _, y } => {
                    ticker.set_hover(y >= ticker_top);
                },
                InputEvent::Wheel { dy } => {
                    if !modal.is_open() {
                        page.scroll_by(-dy as f32);
                    }
                },
                InputEvent::MouseDown { x, y, button } => {
                    if button != MouseButtonKind::Left {
                        continue;
                    }
                    // The modal swallows everything while open
                    if modal.handle_click(x, y, args.width, args.height) {
                        continue;
                    }
                    if let Some(idx) = page.nav_hit(x, y) {
                        page.scroll_to_section(idx);
                        continue;
                    }
                    match page.button_hit(x, y) {
                        Some(ButtonAction::WatchStory) => modal.open(),
                        Some(ButtonAction::Refresh) => {
                            // Button is disabled while a fetch is in flight
                            if !feed.in_flight() {
                                log::debug!("Manual refresh");
                                progress.begin_refresh();
                                feed.request_refresh();
                            }
                        },
                        Some(ButtonAction::Cta) => confetti.fire_tap(),
                        None => {},
                    }
                },
            }
        }

        // Auto-refresh: runs for the lifetime of the page, failures cannot
        // stop the cadence
        refresh_countdown -= dt;
        if refresh_countdown <= 0.0 {
            refresh_countdown += config.refresh_interval_secs;
            log::debug!("Auto refresh");
            progress.begin_refresh();
            feed.request_refresh();
        }

        // Fold in the newest fetch outcome, if any arrived this frame
        if let Some(outcome) = feed.poll() {
            progress.apply_outcome(outcome);
        }

        // Update
        page.update(dt, feed.in_flight());
        ticker.update(dt);
        if progress.update(dt) {
            confetti.fire_celebration();
        }
        confetti.update(dt);

        // Render back to front: page chrome, progress bar, ticker,
        // confetti overlay, modal on top
        page.render(&mut buffer, feed.in_flight());
        let (px, py, pw, ph) = page.progress_anchor();
        progress.render(&mut buffer, px, py, pw, ph);
        ticker.render(&mut buffer, ticker_top);
        confetti.render(&mut buffer);
        modal.render(&mut buffer);

        // FPS overlay (press F to toggle)
        if show_fps {
            let (min_fps, max_fps) = fps_counter.min_max_fps();
            let ms = fps_counter.avg_frame_time_ms();
            let fps_text = format!(
                "FPS {} avg  {} min  {} max  {}ms",
                avg_fps as u32, min_fps as u32, max_fps as u32, ms as u32
            );
            // Draw above the ticker with shadow for visibility
            let y = ticker_top - 12;
            draw_text(&mut buffer, 5, y + 1, &fps_text, 0, 0, 0);
            draw_text(&mut buffer, 4, y, &fps_text, 255, 255, 0);
        }

        // Present
        display.present(&mut target, &buffer)?;
    }

    Ok(())
}
