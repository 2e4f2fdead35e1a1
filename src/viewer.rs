use sfml::graphics::{Color, Font, RenderTarget, RenderWindow, Text, Transformable};
use sfml::system::{Clock, Vector2u};
use sfml::window::{ContextSettings, Event, Key, Style, VideoMode};
use sfml::SfBox;

use bitflags::bitflags;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::stage::Stage;
use crate::surface::WindowSurface;

bitflags! {
    pub struct Flags: u8 {
        const FULLSCREEN = 1 << 0;
        const DRAW_GUI = 1 << 1;
        const SHOW_CURSOR = 1 << 2;
        const FONT_FAILURE = 1 << 3;
    }
}

pub struct App {
    pub config: Config,
    pub fps_clock: SfBox<Clock>,
    pub ctx_settings: ContextSettings,

    pub flags: Flags,
    pub font: Option<SfBox<Font>>,

    pub debug_text: String,

    surface: WindowSurface,
    stage: Stage,
}

impl App {
    //
    // Lifecycle code
    //

    pub fn new(config: Config) -> App {
        let ctx_settings = ContextSettings {
            antialiasing_level: config.antialiasing_level,
            ..Default::default()
        };

        let mut flags = Flags::SHOW_CURSOR;
        let font = Font::from_file(&config.font_path);
        if font.is_none() {
            warn!(path = %config.font_path, "font not loaded; debug overlay disabled");
            flags |= Flags::FONT_FAILURE;
        }

        let density = Stage::density_for(config.pixel_ratio);
        let window = Self::open_window(&config, &ctx_settings, flags, density);
        let mut surface = WindowSurface::new(window, config.background, config.stroke);

        let (width, height) = Self::logical_size(surface.window().size(), density);
        let stage = Stage::new(&mut surface, config.pixel_ratio, width, height);
        info!(
            width,
            height,
            density,
            pixel_ratio = config.pixel_ratio,
            "stage created"
        );

        App {
            config,
            fps_clock: Clock::start(),
            ctx_settings,
            flags,
            font,
            debug_text: String::new(),
            surface,
            stage,
        }
    }

    fn open_window(
        config: &Config,
        ctx_settings: &ContextSettings,
        flags: Flags,
        density: u32,
    ) -> RenderWindow {
        let fullscreen = flags.contains(Flags::FULLSCREEN);
        let mut window = RenderWindow::new(
            if fullscreen {
                VideoMode::desktop_mode()
            } else {
                VideoMode::from((config.width * density, config.height * density))
            },
            &config.title,
            if fullscreen {
                Style::FULLSCREEN
            } else {
                Style::DEFAULT
            },
            ctx_settings,
        );
        window.set_framerate_limit(config.fps_limit);
        window.set_mouse_cursor_visible(flags.contains(Flags::SHOW_CURSOR));

        info!(size = ?window.size(), fullscreen, "window opened");
        window
    }

    fn logical_size(pixels: Vector2u, density: u32) -> (f32, f32) {
        let density = density as f32;
        (pixels.x as f32 / density, pixels.y as f32 / density)
    }

    fn to_logical(&self, coordinate: i32) -> f32 {
        coordinate as f32 / self.stage.density() as f32
    }

    pub fn run(&mut self) {
        'main_loop: while self.surface.window().is_open() {
            while let Some(event) = self.surface.window_mut().poll_event() {
                if !self.process_event(event) {
                    break 'main_loop;
                }
            }

            self.request_update();
            self.stage.animate(&mut self.surface);
            self.request_draw_gui();
            self.surface.window_mut().display();
        }

        info!("viewer closed");
    }

    fn close(&mut self) {
        self.surface.window_mut().close();
    }

    //
    // Input processing code
    //

    pub fn process_event(&mut self, event: Event) -> bool {
        match event {
            Event::Closed => {
                self.close();
                return false;
            }
            Event::KeyPressed { code, .. } => return self.process_key(code),
            Event::Resized { width, height } => {
                let (width, height) =
                    Self::logical_size((width, height).into(), self.stage.density());
                self.stage.resize(&mut self.surface, width, height);
            }
            Event::MouseButtonPressed { x, .. } | Event::TouchBegan { x, .. } => {
                let x = self.to_logical(x);
                debug!(x, "pointer down");
                self.stage.pointer_down(x);
            }
            Event::MouseMoved { x, .. } | Event::TouchMoved { x, .. } => {
                let x = self.to_logical(x);
                self.stage.pointer_move(x);
            }
            Event::MouseButtonReleased { .. } | Event::TouchEnded { .. } => {
                debug!(velocity = self.stage.velocity(), "pointer up");
                self.stage.pointer_up();
            }
            _ => (),
        }
        true
    }

    pub fn process_key(&mut self, code: Key) -> bool {
        match code {
            Key::Escape => {
                self.close();
                return false;
            }
            Key::F3 => self.flags.toggle(Flags::DRAW_GUI),
            Key::H => {
                self.flags.toggle(Flags::SHOW_CURSOR);
                self.surface
                    .window_mut()
                    .set_mouse_cursor_visible(self.flags.contains(Flags::SHOW_CURSOR));
            }
            Key::F | Key::F11 => self.toggle_fullscreen(),
            _ => (),
        }
        true
    }

    fn toggle_fullscreen(&mut self) {
        self.flags.toggle(Flags::FULLSCREEN);

        let density = self.stage.density();
        self.surface.window_mut().close();
        let window = Self::open_window(&self.config, &self.ctx_settings, self.flags, density);
        self.surface = WindowSurface::new(window, self.config.background, self.config.stroke);

        let (width, height) = Self::logical_size(self.surface.window().size(), density);
        self.stage.resize(&mut self.surface, width, height);
    }

    //
    // Update code
    //

    pub fn request_update(&mut self) {
        let fps = self.get_fps();

        if !Self::overlay_visible(self.flags) {
            return;
        }

        self.debug_text = format!(
            include_str!("debug_screen_template.txt"),
            fps,
            if self.config.fps_limit > 0 {
                format!(
                    " (max: {} - {:6.2}%)",
                    self.config.fps_limit,
                    fps / self.config.fps_limit as f32 * 100.0
                )
            } else {
                "".to_owned()
            },
            self.stage.velocity(),
            if self.stage.is_down() {
                " [dragging]"
            } else {
                ""
            },
            self.stage
                .polygon()
                .map_or(0.0, |polygon| polygon.rotation()),
            self.stage.width(),
            self.stage.height(),
            self.stage.density(),
            self.surface.window().settings().antialiasing_level,
            self.ctx_settings.antialiasing_level,
            self.flags.bits()
        );
    }

    fn get_fps(&mut self) -> f32 {
        let current_time = self.fps_clock.restart().as_seconds();
        1.0 / current_time
    }

    //
    // Draw code
    //

    /// The overlay needs both the F3 toggle and a loaded font.
    pub fn overlay_visible(flags: Flags) -> bool {
        flags.contains(Flags::DRAW_GUI) && !flags.contains(Flags::FONT_FAILURE)
    }

    pub fn request_draw_gui(&mut self) {
        if !Self::overlay_visible(self.flags) {
            return;
        }

        if let Some(font) = self.font.as_ref() {
            let mut debug_label = Text::new(&self.debug_text, font, 16);
            debug_label.set_fill_color(Color::WHITE);
            debug_label.set_outline_color(self.config.background);
            debug_label.set_outline_thickness(1.5);
            debug_label.set_position((10.0, 10.0));
            self.surface.window_mut().draw(&debug_label);
        }
    }
}
