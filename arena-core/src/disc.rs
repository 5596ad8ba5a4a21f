use crate::config::Config;
use crate::sprite::{DrawCommand, Sprite};
use crate::vector::Vector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscKind {
    DarkBlue,
    White,
    Brown,
}

impl DiscKind {
    pub fn name(&self) -> &'static str {
        match self {
            DiscKind::DarkBlue => "DarkBlue",
            DiscKind::White => "White",
            DiscKind::Brown => "Brown",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DiscKind::DarkBlue => "rgba(0, 0, 139, 1)",
            DiscKind::White => "rgba(255, 255, 255, 1)",
            DiscKind::Brown => "rgba(139, 69, 19, 1)",
        }
    }
}

/// Possession state. `Held -> Primed -> Deadly -> Returning -> Held`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscStatus {
    Held,
    /// Held, with an automatic throw scheduled
    Primed,
    Deadly,
    Returning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disc {
    pub kind: DiscKind,
    pub status: DiscStatus,
    /// Latch: an automatic throw has been scheduled for this possession
    pub primed: bool,
    pub sprite: Sprite,
    pub velocity: Vector,
    speed: f32,
    return_time: f64,
    thrown_at: Option<f64>,
}

impl Disc {
    pub fn new(kind: DiscKind, owner: &Sprite, config: &Config) -> Self {
        let mut disc = Self {
            kind,
            status: DiscStatus::Held,
            primed: false,
            sprite: Sprite::new(
                kind.name(),
                config.disc_size,
                config.disc_size,
                kind.color(),
                Vector::zero(),
            ),
            velocity: Vector::zero(),
            speed: config.disc_speed,
            return_time: config.disc_return_time,
            thrown_at: None,
        };
        disc.ride_on(owner);
        disc
    }

    #[inline]
    pub fn location(&self) -> Vector {
        self.sprite.location
    }

    /// Launch along `direction` at disc speed
    pub fn thrown(&mut self, direction: Vector, current_time: f64) {
        self.status = DiscStatus::Deadly;
        self.velocity = direction.normalized() * self.speed;
        self.thrown_at = Some(current_time);
    }

    /// Start flying back to the owner
    pub fn recall(&mut self) {
        self.status = DiscStatus::Returning;
        self.thrown_at = None;
    }

    /// Back in the owner's hand, ready to be primed again
    pub fn catch(&mut self) {
        self.status = DiscStatus::Held;
        self.primed = false;
        self.velocity = Vector::zero();
        self.thrown_at = None;
    }

    /// Advance one frame of disc motion
    pub fn update(&mut self, owner: &Sprite, current_time: f64, grid_width: f32, grid_height: f32) {
        match self.status {
            DiscStatus::Held | DiscStatus::Primed => self.ride_on(owner),
            DiscStatus::Deadly => {
                self.sprite.location += self.velocity;
                let (hit_x, hit_y) = self.sprite.bind_to_grid(grid_width, grid_height);
                let expired = self
                    .thrown_at
                    .map_or(true, |at| current_time - at >= self.return_time);
                if hit_x || hit_y || expired {
                    self.recall();
                }
            }
            DiscStatus::Returning => {
                let mut heading = owner.center() - self.sprite.center();
                heading.normalize();
                self.velocity = heading * self.speed;
                self.sprite.location += self.velocity;
            }
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        self.sprite.draw(out);
    }

    fn ride_on(&mut self, owner: &Sprite) {
        let center = owner.center();
        self.sprite.location = Vector::new(
            center.x - self.sprite.width / 2.0,
            center.y - self.sprite.height / 2.0,
        );
    }
}
