use std::f32::consts::TAU;

use sfml::system::Vector2f;

use crate::surface::Surface;

/// Radians of rotation per pixel of horizontal pointer travel.
pub const ROTATION_PER_PIXEL: f32 = 0.008;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("polygon needs at least 3 sides, got {0}")]
    TooFewSides(usize),
    #[error("polygon radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
}

/// Regular polygon outline that spins around its center.
#[derive(Debug, Clone)]
pub struct Polygon {
    center: Vector2f,
    radius: f32,
    sides: usize,
    rotation: f32,
}

impl Polygon {
    pub fn new(x: f32, y: f32, radius: f32, sides: usize) -> Result<Polygon, ShapeError> {
        if sides < 3 {
            return Err(ShapeError::TooFewSides(sides));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ShapeError::InvalidRadius(radius));
        }

        Ok(Polygon {
            center: Vector2f::new(x, y),
            radius,
            sides,
            rotation: 0.0,
        })
    }

    pub fn center(&self) -> Vector2f {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sides(&self) -> usize {
        self.sides
    }

    /// Accumulated rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Vertex positions for the current rotation, in ascending index order.
    pub fn vertices(&self) -> impl Iterator<Item = Vector2f> + '_ {
        let step = TAU / self.sides as f32;
        (0..self.sides).map(move |i| {
            let (sin, cos) = (self.rotation + i as f32 * step).sin_cos();
            Vector2f::new(
                self.center.x + self.radius * cos,
                self.center.y + self.radius * sin,
            )
        })
    }

    /// Advances the rotation by `move_x` pixels worth of travel and strokes
    /// the outline into `surface`.
    pub fn animate(&mut self, surface: &mut dyn Surface, move_x: f32) {
        self.rotation += move_x * ROTATION_PER_PIXEL;

        surface.begin_path();
        for (i, vertex) in self.vertices().enumerate() {
            if i == 0 {
                surface.move_to(vertex.x, vertex.y);
            } else {
                surface.line_to(vertex.x, vertex.y);
            }
        }
        surface.close_path();
        surface.stroke();
    }
}
