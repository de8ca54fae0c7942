use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use grid_snake::config::CONFIG_FILE;
use grid_snake::geometry::{BOARD_WIDTH, GRID_SIZE};
use grid_snake::render::{self, Canvas};
use grid_snake::{Cell, FileStore, GameConfig, Key, Notice, RenderError, Session, SessionEvent};
use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Window layout
const HUD_HEIGHT: f32 = 40.0;
const BOARD_PX: f32 = BOARD_WIDTH as f32;
const NOTICE_SECONDS: f64 = 4.0;

const OVERLAY: Color = Color::new(0.07, 0.09, 0.15, 0.75);
const HUD_TEXT: Color = Color::new(0.12, 0.16, 0.22, 1.0);
const NOTICE_TEXT: Color = Color::new(0.94, 0.27, 0.27, 1.0);

fn to_mq(c: render::Color) -> Color {
    Color::new(c.r, c.g, c.b, 1.0)
}

/// Draws the board below the HUD strip.
struct MacroquadCanvas;

impl MacroquadCanvas {
    fn cell_center(cell: Cell) -> Vec2 {
        let (x, y) = cell.center(GRID_SIZE as f32);
        vec2(x, y + HUD_HEIGHT)
    }
}

impl Canvas for MacroquadCanvas {
    fn draw_background(&mut self) -> Result<(), RenderError> {
        // Vertical gradient in bands.
        const BANDS: usize = 20;
        let top = to_mq(render::BACKGROUND_TOP);
        let bottom = to_mq(render::BACKGROUND_BOTTOM);
        let band_h = BOARD_PX / BANDS as f32;
        for i in 0..BANDS {
            let t = i as f32 / (BANDS - 1) as f32;
            let color = Color::new(
                top.r + (bottom.r - top.r) * t,
                top.g + (bottom.g - top.g) * t,
                top.b + (bottom.b - top.b) * t,
                1.0,
            );
            draw_rectangle(0.0, HUD_HEIGHT + i as f32 * band_h, BOARD_PX, band_h + 1.0, color);
        }
        Ok(())
    }

    fn draw_circle_at(
        &mut self,
        cell: Cell,
        color: render::Color,
        radius: f32,
    ) -> Result<(), RenderError> {
        let c = Self::cell_center(cell);
        draw_circle(c.x, c.y, radius, to_mq(color));
        Ok(())
    }

    fn draw_star_at(
        &mut self,
        cell: Cell,
        spikes: usize,
        outer_radius: f32,
        inner_radius: f32,
        color: render::Color,
    ) -> Result<(), RenderError> {
        let c = Self::cell_center(cell);
        let points = render::star_points(c.x, c.y, spikes, outer_radius, inner_radius);
        if points.is_empty() {
            return Err(RenderError::Backend(format!("star with {spikes} spikes")));
        }
        let color = to_mq(color);
        for (i, (x, y)) in points.iter().enumerate() {
            let (nx, ny) = points[(i + 1) % points.len()];
            draw_triangle(c, vec2(*x, *y), vec2(nx, ny), color);
        }
        Ok(())
    }

    fn draw_hud(&mut self, score: u32, clock: &str) -> Result<(), RenderError> {
        draw_text(&format!("Score: {score}"), 8.0, 28.0, 24.0, HUD_TEXT);
        let m = measure_text(clock, None, 24, 1.0);
        draw_text(clock, BOARD_PX - m.width - 8.0, 28.0, 24.0, HUD_TEXT);
        Ok(())
    }
}

fn draw_centered(lines: &[(&str, f32)]) {
    let sh = screen_height();
    draw_rectangle(0.0, 0.0, screen_width(), sh, OVERLAY);
    let mut y = sh * 0.35;
    for (text, size) in lines {
        let m = measure_text(text, None, *size as u16, 1.0);
        draw_text(text, (screen_width() - m.width) * 0.5, y, *size, WHITE);
        y += size + 12.0;
    }
}

fn draw_panels(session: &Session<FileStore>) {
    let panels = session.panels();
    if panels.menu {
        let resume = if panels.resume_button { "R: Resume saved game" } else { "" };
        draw_centered(&[
            ("SNAKE", 40.0),
            ("Enter: New game", 20.0),
            (resume, 20.0),
            ("N: Reset save", 20.0),
            ("Esc: Quit", 20.0),
        ]);
    } else if panels.paused {
        draw_centered(&[
            ("PAUSED", 36.0),
            ("Space: Continue", 20.0),
            ("R: Resume from save", 20.0),
            ("N: Reset   M: Menu", 20.0),
        ]);
    } else if let Some(score) = panels.game_over {
        let final_score = format!("Final score: {score}");
        draw_centered(&[
            ("GAME OVER", 36.0),
            (final_score.as_str(), 24.0),
            ("Enter: Restart", 20.0),
            ("N: Reset   M: Menu", 20.0),
        ]);
    }
}

fn draw_notice(notice: &Notice) {
    let text = notice.to_string();
    let m = measure_text(&text, None, 16, 1.0);
    let x = (screen_width() - m.width).max(0.0) * 0.5;
    draw_text(&text, x, screen_height() - 8.0, 16.0, NOTICE_TEXT);
}

fn poll_keys(session: &mut Session<FileStore>) {
    for (code, key) in [
        (KeyCode::Up, Key::Up),
        (KeyCode::Down, Key::Down),
        (KeyCode::Left, Key::Left),
        (KeyCode::Right, Key::Right),
        (KeyCode::Escape, Key::Escape),
    ] {
        if is_key_pressed(code) {
            session.handle_key(key);
        }
    }

    let panels = session.panels();
    if is_key_pressed(KeyCode::Enter) {
        if panels.menu {
            session.start();
        } else if panels.game_over.is_some() {
            session.restart();
        }
    }
    if is_key_pressed(KeyCode::R) && (panels.paused || (panels.menu && panels.resume_button)) {
        session.resume();
    }
    if is_key_pressed(KeyCode::Space) && panels.paused {
        session.unpause();
    }
    if is_key_pressed(KeyCode::N) && !session.drivers_running() {
        session.reset();
    }
    if is_key_pressed(KeyCode::M) && (panels.paused || panels.game_over.is_some()) {
        session.show_menu();
    }
}

fn bootstrap() -> anyhow::Result<GameConfig> {
    let config = GameConfig::load(Path::new(CONFIG_FILE))
        .with_context(|| format!("reading {CONFIG_FILE}"))?;
    fs::create_dir_all(&config.save_dir)
        .with_context(|| format!("creating save directory {}", config.save_dir.display()))?;
    Ok(config)
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Snake".to_owned(),
        window_width: BOARD_PX as i32,
        window_height: (BOARD_PX + HUD_HEIGHT) as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = bootstrap().unwrap_or_else(|e| {
        error!(error = ?e, "falling back to default config");
        GameConfig::default()
    });
    info!(save_dir = %config.save_dir.display(), "starting");
    let store = FileStore::new(config.save_dir.clone());
    let mut session = Session::new(config, store);

    let started = get_time();
    let mut notice: Option<(Notice, f64)> = None;
    let mut canvas = MacroquadCanvas;

    loop {
        let now = get_time();
        poll_keys(&mut session);
        session.advance(Duration::from_secs_f64((now - started).max(0.0)));

        let mut quit = false;
        for event in session.drain_events() {
            match event {
                SessionEvent::Notice(n) => notice = Some((n, now)),
                SessionEvent::QuitRequested => quit = true,
            }
        }
        if quit {
            break;
        }

        clear_background(WHITE);
        session.render(&mut canvas);
        draw_panels(&session);
        if notice.as_ref().is_some_and(|(_, shown_at)| now - shown_at >= NOTICE_SECONDS) {
            notice = None;
        }
        if let Some((n, _)) = &notice {
            draw_notice(n);
        }

        next_frame().await;
    }
}
