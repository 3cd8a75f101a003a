pub mod keymap;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Mod, Scancode};
use sdl2::mouse::MouseUtil;
use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::{EventPump, Sdl};

use arena::camera::FollowCamera;
use arena::engine::input::InputState;

pub use keymap::KeyMap;

pub struct GameWindow {
    _gl_context: GLContext,
    window: Window,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self> {
        let video = sdl.video().map_err(|e| anyhow!(e)).context("SDL video")?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video
            .window(title, width, height)
            .opengl()
            .position_centered()
            .resizable()
            .build()
            .context("creating window")?;

        let gl_context = window
            .gl_create_context()
            .map_err(|e| anyhow!(e))
            .context("creating GL context")?;

        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);

        Ok(Self {
            _gl_context: gl_context,
            window,
        })
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    pub fn size(&self) -> (u32, u32) {
        self.window.size()
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.window.size();
        w as f32 / h.max(1) as f32
    }
}

/// What the frame loop has to react to after draining the queue.
#[derive(Default)]
pub struct PumpResult {
    pub quit: bool,
    pub resized: Option<(i32, i32)>,
}

/// Translates SDL events into [`InputState`] and pointer-lock changes.
pub struct EventRouter {
    pump: EventPump,
    mouse: MouseUtil,
    keys: KeyMap,
}

impl EventRouter {
    pub fn new(sdl: &Sdl, keys: KeyMap) -> Result<Self> {
        let pump = sdl.event_pump().map_err(|e| anyhow!(e)).context("event pump")?;
        Ok(Self {
            pump,
            mouse: sdl.mouse(),
            keys,
        })
    }

    fn lock_pointer(&self, camera: &mut FollowCamera, locked: bool) {
        if camera.pointer_locked() != locked {
            log::debug!("pointer {}", if locked { "locked" } else { "released" });
        }
        self.mouse.set_relative_mouse_mode(locked);
        camera.set_pointer_locked(locked);
    }

    /// Drain pending events. `now` stamps key presses for debounce and
    /// hold-time checks. `browsing` enables the Shift+key clip browser layer.
    pub fn pump(
        &mut self,
        input: &mut InputState,
        camera: &mut FollowCamera,
        now: Duration,
        browsing: bool,
    ) -> PumpResult {
        let mut result = PumpResult::default();
        let events: Vec<Event> = self.pump.poll_iter().collect();

        for event in events {
            match event {
                Event::Quit { .. } => result.quit = true,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => self.lock_pointer(camera, false),
                Event::KeyDown {
                    scancode: Some(sc),
                    keymod,
                    repeat: false,
                    ..
                } => {
                    let shifted = keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD);
                    let browser = if browsing && shifted {
                        self.keys.browser_action(sc)
                    } else {
                        None
                    };
                    if let Some(action) = browser.or_else(|| self.keys.action(sc)) {
                        input.set_key(action, true, now);
                    }
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    // Release both layers; the press may have come from either.
                    for action in [self.keys.browser_action(sc), self.keys.action(sc)]
                        .into_iter()
                        .flatten()
                    {
                        input.set_key(action, false, now);
                    }
                }
                Event::MouseButtonDown { .. } => self.lock_pointer(camera, true),
                Event::MouseMotion { xrel, yrel, .. } if camera.pointer_locked() => {
                    input.add_mouse_motion(xrel as f32, yrel as f32);
                }
                // SDL reports notches with +y away from the user; zoom wants
                // positive delta to pull the camera back.
                Event::MouseWheel { y, .. } => input.add_wheel(-y as f32 * 100.0),
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::FocusLost => {
                        input.reset_all();
                        self.lock_pointer(camera, false);
                    }
                    WindowEvent::SizeChanged(w, h) => result.resized = Some((w, h)),
                    _ => {}
                },
                _ => {}
            }
        }
        result
    }
}
