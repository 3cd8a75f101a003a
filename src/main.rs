mod app;
mod platform;
mod renderer;
mod town;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use app::GameApp;
use arena::config::Config;
use platform::GameWindow;
use town::TownLayout;

#[derive(Parser)]
#[command(name = "arena", about = "Third-person character in a small town")]
struct Args {
    /// Tuning file (motion, timing, camera, key bindings)
    #[arg(long, default_value = "arena.json")]
    config: PathBuf,

    /// Building placement file
    #[arg(long, default_value = "assets/town_layout.json")]
    layout: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::load(&args.config).context("loading config")?;
    let layout = TownLayout::load(&args.layout).context("loading town layout")?;

    let sdl = sdl2::init().map_err(|e| anyhow!(e)).context("SDL init")?;
    let window = GameWindow::new(&sdl, "Arena", args.width, args.height)?;

    let mut app = GameApp::new(&sdl, &window, config, &layout)?;
    app.run(&window);
    Ok(())
}
