use tracing::{debug, warn};

use crate::polygon::Polygon;
use crate::surface::Surface;

/// Per-frame velocity multiplier applied while coasting.
pub const FRICTION: f32 = 0.92;
pub const POLYGON_SIDES: usize = 15;

/// Stage state driven by resize and pointer events.
pub struct Stage {
    width: f32,
    height: f32,
    density: u32,

    is_down: bool,
    offset_x: f32,
    move_x: f32,

    polygon: Option<Polygon>,
}

impl Stage {
    /// Builds the stage for a `width` x `height` viewport and sizes `surface`
    /// to match. `pixel_ratio` is what the platform reports for the display.
    pub fn new(surface: &mut dyn Surface, pixel_ratio: f32, width: f32, height: f32) -> Stage {
        let mut stage = Stage {
            width: 0.0,
            height: 0.0,
            density: Self::density_for(pixel_ratio),
            is_down: false,
            offset_x: 0.0,
            move_x: 0.0,
            polygon: None,
        };
        stage.resize(surface, width, height);
        stage
    }

    /// High density displays render at twice the size, everything else at 1.
    pub fn density_for(pixel_ratio: f32) -> u32 {
        if pixel_ratio > 1.0 {
            2
        } else {
            1
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn density(&self) -> u32 {
        self.density
    }

    pub fn velocity(&self) -> f32 {
        self.move_x
    }

    pub fn is_down(&self) -> bool {
        self.is_down
    }

    pub fn polygon(&self) -> Option<&Polygon> {
        self.polygon.as_ref()
    }

    //
    // Viewport
    //

    pub fn resize(&mut self, surface: &mut dyn Surface, width: f32, height: f32) {
        self.width = width;
        self.height = height;

        let density = self.density as f32;
        surface.resize(
            (width * density).round() as u32,
            (height * density).round() as u32,
        );
        surface.scale(density);

        // Sunk below the bottom edge so only the upper arc shows
        match Polygon::new(width / 2.0, height * 1.25, height / 1.5, POLYGON_SIDES) {
            Ok(polygon) => {
                debug!(
                    width,
                    height,
                    center = ?polygon.center(),
                    radius = polygon.radius(),
                    sides = polygon.sides(),
                    "stage resized"
                );
                self.polygon = Some(polygon);
            }
            Err(error) => warn!(width, height, %error, "keeping previous polygon"),
        }
    }

    //
    // Pointer input
    //

    pub fn pointer_down(&mut self, x: f32) {
        self.is_down = true;
        self.move_x = 0.0;
        self.offset_x = x;
    }

    pub fn pointer_move(&mut self, x: f32) {
        if self.is_down {
            self.move_x = x - self.offset_x;
            self.offset_x = x;
        }
    }

    pub fn pointer_up(&mut self) {
        self.is_down = false;
    }

    //
    // Frame
    //

    /// Renders one frame and decays the velocity.
    pub fn animate(&mut self, surface: &mut dyn Surface) {
        surface.clear_rect(0.0, 0.0, self.width, self.height);

        self.move_x *= FRICTION;

        if let Some(polygon) = self.polygon.as_mut() {
            polygon.animate(surface, self.move_x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{Op, Recorder};

    fn stage(width: f32, height: f32) -> (Stage, Recorder) {
        let mut surface = Recorder::default();
        let stage = Stage::new(&mut surface, 1.0, width, height);
        surface.take();
        (stage, surface)
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn density_doubles_only_on_high_ratio() {
        assert_eq!(Stage::density_for(1.0), 1);
        assert_eq!(Stage::density_for(0.75), 1);
        assert_eq!(Stage::density_for(1.25), 2);
        assert_eq!(Stage::density_for(3.0), 2);
    }

    #[test]
    fn surface_is_scaled_by_density() {
        let mut surface = Recorder::default();
        let stage = Stage::new(&mut surface, 2.0, 800.0, 600.0);

        assert_eq!(stage.density(), 2);
        assert_eq!(surface.ops, vec![Op::Resize(1600, 1200), Op::Scale(2.0)]);
    }

    #[test]
    fn resize_rebuilds_polygon_from_stage_size() {
        let (mut stage, mut surface) = stage(800.0, 600.0);
        stage.pointer_down(0.0);
        stage.pointer_move(30.0);
        stage.animate(&mut surface);
        assert!(stage.polygon().unwrap().rotation() != 0.0);

        stage.resize(&mut surface, 1024.0, 300.0);
        let polygon = stage.polygon().unwrap();
        assert_close(polygon.center().x, 512.0);
        assert_close(polygon.center().y, 375.0);
        assert_close(polygon.radius(), 200.0);
        assert_eq!(polygon.sides(), POLYGON_SIDES);
        assert_eq!(polygon.rotation(), 0.0);
    }

    #[test]
    fn degenerate_resize_keeps_previous_polygon() {
        let (mut stage, mut surface) = stage(800.0, 600.0);
        stage.resize(&mut surface, 800.0, 0.0);

        assert_eq!(stage.height(), 0.0);
        assert_close(stage.polygon().unwrap().radius(), 400.0);
    }

    #[test]
    fn move_yields_instantaneous_delta() {
        let (mut stage, _) = stage(800.0, 600.0);
        stage.pointer_down(100.0);
        stage.pointer_move(130.0);
        assert_eq!(stage.velocity(), 30.0);
        stage.pointer_move(125.0);
        assert_eq!(stage.velocity(), -5.0);
    }

    #[test]
    fn pointer_down_resets_velocity() {
        let (mut stage, _) = stage(800.0, 600.0);
        stage.pointer_down(0.0);
        stage.pointer_move(40.0);
        stage.pointer_up();
        stage.pointer_down(200.0);
        assert!(stage.is_down());
        assert_eq!(stage.velocity(), 0.0);
    }

    #[test]
    fn moves_after_release_are_ignored() {
        let (mut stage, _) = stage(800.0, 600.0);
        stage.pointer_move(50.0);
        assert_eq!(stage.velocity(), 0.0);

        stage.pointer_down(10.0);
        stage.pointer_move(20.0);
        stage.pointer_up();
        stage.pointer_move(500.0);
        assert!(!stage.is_down());
        assert_eq!(stage.velocity(), 10.0);
    }

    #[test]
    fn velocity_decays_geometrically() {
        let (mut stage, mut surface) = stage(800.0, 600.0);
        stage.pointer_down(0.0);
        stage.pointer_move(100.0);
        stage.pointer_up();

        let mut previous = stage.velocity();
        for _ in 0..85 {
            stage.animate(&mut surface);
            assert_close(stage.velocity(), previous * FRICTION);
            previous = stage.velocity();
        }
        assert!(stage.velocity() > 0.0);
        assert!(stage.velocity() < 0.001 * 100.0);
    }

    #[test]
    fn frame_clears_stage_then_draws() {
        let (mut stage, mut surface) = stage(800.0, 600.0);
        stage.animate(&mut surface);

        let ops = surface.take();
        assert_eq!(ops[0], Op::ClearRect(0.0, 0.0, 800.0, 600.0));
        assert_eq!(ops[1], Op::BeginPath);
        assert_eq!(ops.last(), Some(&Op::Stroke));
    }

    #[test]
    fn drag_then_frame_end_to_end() {
        let (mut stage, mut surface) = stage(800.0, 600.0);
        let polygon = stage.polygon().unwrap();
        assert_close(polygon.center().x, 400.0);
        assert_close(polygon.center().y, 750.0);
        assert_close(polygon.radius(), 400.0);
        assert_eq!(polygon.sides(), 15);

        stage.pointer_down(100.0);
        stage.pointer_move(150.0);
        assert_eq!(stage.velocity(), 50.0);

        stage.animate(&mut surface);
        assert_close(stage.velocity(), 46.0);
        assert_close(
            stage.polygon().unwrap().rotation(),
            46.0 * crate::polygon::ROTATION_PER_PIXEL,
        );
    }
}
