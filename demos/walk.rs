//! Walk around a map with the arrow keys, Tab shows the collision overlays.
//!
//! ```text
//! cargo run --example walk -- [map] [config.json]
//! ```

use anyhow::Context;
use macroquad::prelude::*;
use macroquad_rpg_map::loader::{file::FileMapLoader, map as map_loader};
use macroquad_rpg_map::{poll_events, Event, MapConfig, MapState, ScreenPainter};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAP: &str = "tests/assets/maps/town.map";

fn window_conf() -> Conf {
    Conf {
        window_title: "Walk".into(),
        window_width: 640,
        window_height: 360,
        ..Default::default()
    }
}

async fn run() -> anyhow::Result<()> {
    prevent_quit();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_MAP.to_owned());
    let config = match args.next() {
        Some(p) => MapConfig::load(&p).with_context(|| format!("loading config {}", p))?,
        None => MapConfig::default(),
    };

    let mut loader = FileMapLoader::new(&path);
    let mut map = map_loader::open(&mut loader, &path)
        .with_context(|| format!("loading map {}", path))?;

    map_loader::load_player(&mut loader, &mut map, "../sprites/hero.png", 16, 16)
        .context("loading player sprite")?;
    map.config = config;
    map.init(screen_width() as u32, screen_height() as u32);

    tracing::info!(
        objects = loader.objects().len(),
        blocks = map.blocks.len(),
        "map ready"
    );

    let mut painter = ScreenPainter;

    while map.state() != MapState::Finished {
        for event in poll_events() {
            match event {
                Event::Quit => map.finish(),
                event => map.handle(&event),
            }
        }

        map.update((get_frame_time() * 1000.0) as u32);

        clear_background(BLACK);
        map.draw(&mut painter);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 20.0, 20.0, WHITE);

        next_frame().await;
    }

    map_loader::finish(&mut loader);

    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    if let Err(err) = run().await {
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
}
