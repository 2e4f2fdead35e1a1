use sfml::graphics::Color;
use sfml::window::VideoMode;

/// Startup settings for the viewer window.
#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    /// Initial stage size in logical units.
    pub width: u32,
    pub height: u32,
    pub fps_limit: u32,
    pub antialiasing_level: u32,
    pub pixel_ratio: f32,
    pub background: Color,
    pub stroke: Color,
    pub font_path: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            title: "Rotating Polygon".to_owned(),
            width: 800,
            height: 600,
            fps_limit: 60,
            antialiasing_level: 8,
            pixel_ratio: 1.0,
            background: Color {
                r: 0,
                g: 0,
                b: 25,
                a: 255,
            },
            stroke: Color::WHITE,
            font_path: "font.ttf".to_owned(),
        }
    }
}

impl Config {
    /// Defaults with the pixel ratio taken from the desktop video mode.
    pub fn from_platform() -> Config {
        Config {
            pixel_ratio: Self::pixel_ratio_for(VideoMode::desktop_mode().height),
            ..Config::default()
        }
    }

    /// SFML exposes no display scale factor, so only 4K-class screens
    /// (2160 px tall or more) count as high density.
    pub fn pixel_ratio_for(desktop_height: u32) -> f32 {
        if desktop_height >= 2160 {
            2.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_window() {
        let config = Config::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.pixel_ratio, 1.0);
        assert_eq!(config.fps_limit, 60);
    }

    #[test]
    fn only_4k_desktops_are_high_density() {
        assert_eq!(Config::pixel_ratio_for(1080), 1.0);
        assert_eq!(Config::pixel_ratio_for(1440), 1.0);
        assert_eq!(Config::pixel_ratio_for(2159), 1.0);
        assert_eq!(Config::pixel_ratio_for(2160), 2.0);
    }
}
