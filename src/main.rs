use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use vitrine::camera::PointerAction;
use vitrine::cli::{Cli, ScenePick};
use vitrine::config::Config;
use vitrine::core::RenderClock;
use vitrine::renderer::Renderer;
use vitrine::scene::container::SceneContainer;
use vitrine::scenes::{create_hero_scene, create_showcase_scene};

// === Constants ===

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const SCROLL_PIXELS_TO_LINES: f32 = 0.05;

// === Pointer tracking ===

/// Raw pointer state, folded into orbit actions as the cursor moves
#[derive(Default)]
struct PointerTracker {
    primary_down: bool,
    secondary_down: bool,
    last_position: Option<(f64, f64)>,
}

impl PointerTracker {
    fn button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.primary_down = pressed,
            MouseButton::Right => self.secondary_down = pressed,
            _ => {}
        }
        if !self.primary_down && !self.secondary_down {
            self.last_position = None;
        }
    }

    fn moved(&mut self, x: f64, y: f64) -> Option<PointerAction> {
        let last = self.last_position.replace((x, y));

        if !self.primary_down && !self.secondary_down {
            return None;
        }

        let (last_x, last_y) = last?;
        let dx = (x - last_x) as f32;
        let dy = (y - last_y) as f32;

        if self.primary_down {
            Some(PointerAction::Drag { dx, dy })
        } else {
            Some(PointerAction::Pan { dx, dy })
        }
    }

    fn scrolled(delta: MouseScrollDelta) -> PointerAction {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * SCROLL_PIXELS_TO_LINES,
        };
        PointerAction::Scroll { amount }
    }
}

// === Application ===

struct App {
    config: Config,
    container: SceneContainer,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    clock: RenderClock,
    pointer: PointerTracker,
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
    quiet: bool,
}

impl App {
    fn new(config: Config, container: SceneContainer, quiet: bool) -> Self {
        Self {
            config,
            container,
            window: None,
            renderer: None,
            clock: RenderClock::new(),
            pointer: PointerTracker::default(),
            frame_count: 0,
            fps: 0.0,
            fps_update_timer: 0.0,
            quiet,
        }
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            if !self.quiet {
                log::debug!("FPS: {:.1}", self.fps);
            }
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title(self.config.window.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.config.window.width,
                        self.config.window.height,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let renderer = match pollster::block_on(Renderer::new(
                window.clone(),
                &self.container,
                self.config.overlay,
            )) {
                Ok(renderer) => renderer,
                Err(e) => {
                    log::error!("failed to initialize renderer: {:#}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.window = Some(window);
            self.renderer = Some(renderer);
            // The render loop starts now; elapsed time is measured from here
            self.clock.reset();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let the overlay inspect the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.button(button, state.is_pressed());
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(action) = self.pointer.moved(position.x, position.y) {
                    self.container.pointer(action);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.container.pointer(PointerTracker::scrolled(delta));
            }
            WindowEvent::RedrawRequested => {
                let timing = self.clock.tick();

                self.update_fps(timing.delta);
                self.container.advance(&timing);

                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    if let Err(e) =
                        renderer.render(&self.container, window, timing.elapsed, self.fps)
                    {
                        match e {
                            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                                renderer.resize(window.inner_size());
                            }
                            wgpu::SurfaceError::OutOfMemory => {
                                log::error!("out of GPU memory, exiting");
                                event_loop.exit();
                            }
                            _ => log::warn!("render error: {}", e),
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.merge_cli(&cli);

    let container = match cli.scene {
        ScenePick::Showcase => create_showcase_scene(),
        ScenePick::Hero => create_hero_scene(),
    };

    if !cli.no_ui {
        println!("vitrine - drag to orbit (hero scene), Escape to quit");
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, container, cli.no_ui);

    event_loop.run_app(&mut app)?;

    Ok(())
}
