use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// Axis-aligned box on the grid. `location` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub location: Vector,
}

/// One rectangle for the host to paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

impl Sprite {
    pub fn new(name: &str, width: f32, height: f32, color: &str, location: Vector) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            color: color.to_string(),
            location,
        }
    }

    #[inline]
    pub fn center(&self) -> Vector {
        Vector::new(
            self.location.x + self.width / 2.0,
            self.location.y + self.height / 2.0,
        )
    }

    /// Overlap test between two boxes
    #[inline]
    pub fn collides(&self, other: &Sprite) -> bool {
        self.location.x < other.location.x + other.width
            && self.location.x + self.width > other.location.x
            && self.location.y < other.location.y + other.height
            && self.location.y + self.height > other.location.y
    }

    /// True if `point` lies inside this box
    #[inline]
    pub fn touches(&self, point: Vector) -> bool {
        point.x >= self.location.x
            && point.x <= self.location.x + self.width
            && point.y >= self.location.y
            && point.y <= self.location.y + self.height
    }

    /// Clamp the box inside the grid. Returns which axes were clamped.
    pub fn bind_to_grid(&mut self, grid_width: f32, grid_height: f32) -> (bool, bool) {
        let max_x = (grid_width - self.width).max(0.0);
        let max_y = (grid_height - self.height).max(0.0);

        let mut hit_x = false;
        let mut hit_y = false;

        if self.location.x < 0.0 {
            self.location.x = 0.0;
            hit_x = true;
        } else if self.location.x > max_x {
            self.location.x = max_x;
            hit_x = true;
        }

        if self.location.y < 0.0 {
            self.location.y = 0.0;
            hit_y = true;
        } else if self.location.y > max_y {
            self.location.y = max_y;
            hit_y = true;
        }

        (hit_x, hit_y)
    }

    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand {
            x: self.location.x,
            y: self.location.y,
            width: self.width,
            height: self.height,
            color: self.color.clone(),
        });
    }
}
