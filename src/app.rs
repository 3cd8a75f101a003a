use anyhow::{Context, Result};
use glam::Vec3;
use sdl2::Sdl;

use arena::config::Config;
use arena::engine::input::InputState;
use arena::engine::time::FrameTimer;
use arena::game::Game;

use crate::platform::{EventRouter, GameWindow, KeyMap};
use crate::renderer::{MeshStore, Renderer};
use crate::town::{attach_body, spawn_town, TownLayout};

pub struct GameApp {
    game: Game,
    meshes: MeshStore,
    renderer: Renderer,
    input: InputState,
    router: EventRouter,
}

impl GameApp {
    /// Needs a current GL context: meshes are uploaded here.
    pub fn new(sdl: &Sdl, window: &GameWindow, config: Config, layout: &TownLayout) -> Result<Self> {
        let keys = KeyMap::default_layout()
            .with_overrides(&config.input.bindings)
            .context("key bindings")?;
        let router = EventRouter::new(sdl, keys)?;
        let input = InputState::new(config.timing.debounce());

        let renderer = Renderer::init()?;
        let (w, h) = window.size();
        renderer.resize(w as i32, h as i32);

        let mut game = Game::new(config);
        let mut meshes = MeshStore::default();
        spawn_town(&mut game.world, &mut meshes, layout);
        attach_body(&mut game.world, &mut meshes, game.player).context("building player body")?;
        let [x, z] = layout.player_start;
        game.place_player(x, z);

        log::info!("press H for controls, click to look around");
        Ok(Self {
            game,
            meshes,
            renderer,
            input,
            router,
        })
    }

    pub fn run(&mut self, window: &GameWindow) {
        let mut timer = FrameTimer::new();

        loop {
            timer.tick();
            let browsing = self.game.browser.is_enabled();
            let pumped = self.router.pump(
                &mut self.input,
                &mut self.game.camera,
                timer.elapsed(),
                browsing,
            );
            if pumped.quit {
                break;
            }
            if let Some((w, h)) = pumped.resized {
                self.renderer.resize(w, h);
            }

            self.game.tick(&mut self.input, timer.now, timer.dt);
            self.render(window);
            window.swap();
        }
        log::info!("bye");
    }

    fn render(&mut self, window: &GameWindow) {
        let camera = &self.game.camera;
        let view = camera.view_matrix();
        let proj = camera.projection_matrix(window.aspect_ratio());
        let eye: Vec3 = camera.position;
        self.renderer
            .draw_scene(&self.game.world, &self.meshes, &view, &proj, eye);
    }
}
