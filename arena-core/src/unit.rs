use crate::archetype::{Archetype, Pathing};
use crate::config::{Config, GridBounds};
use crate::disc::{Disc, DiscStatus};
use crate::movement::{pick_destination, steer_towards, DestinationPick};
use crate::scheduler::{TaskId, ThrowScheduler};
use crate::sprite::{DrawCommand, Sprite};
use crate::throwing::{aim_point, throw_delay_ms, throw_direction};
use crate::vector::Vector;
use log::{debug, info};
use rand::{Rng, RngCore};
use serde::Serialize;

/// World state a unit reads during its frame update
pub struct FrameContext<'a> {
    pub bounds: GridBounds,
    pub diagonal: f32,
    pub player_location: Option<Vector>,
    pub current_time: f64,
    pub scheduler: &'a mut ThrowScheduler,
    pub rng: &'a mut dyn RngCore,
}

/// What happened to a unit during one `update`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    pub caught_disc: bool,
    pub retargeted: bool,
    pub primed: Option<TaskId>,
}

/// One combatant on the grid
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    // Identity
    pub id: u32,
    pub archetype: Archetype,
    pub sprite: Sprite,

    // Role flags
    pub is_player: bool,
    pub can_block: bool,
    pub regenerates: bool,
    pub pathing: Pathing,

    // Movement
    pub base_speed: f32,
    pub speed_modifier: f32,
    pub velocity: Option<Vector>,
    pub destination: Option<Vector>,

    // Combat
    pub base_accuracy: f32,
    pub accuracy_modifier: f32,
    pub max_hits: u32,
    pub hits: u32,
    pub points: u32,
    pub disc: Option<Disc>,
    pub pending_throw: Option<TaskId>,
}

impl Unit {
    /// Spawn an archetype at `location` with its default parameters
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        archetype: Archetype,
        location: Vector,
        config: &Config,
        rng: &mut R,
    ) -> Self {
        let profile = archetype.profile(config);
        let sprite = Sprite::new(
            profile.name,
            config.unit_size,
            config.unit_size,
            &profile.color,
            location,
        );
        let disc = profile
            .disc
            .roll(rng)
            .map(|kind| Disc::new(kind, &sprite, config));

        Self {
            id,
            archetype,
            sprite,
            is_player: profile.is_player,
            can_block: false,
            regenerates: profile.regenerates,
            pathing: profile.pathing,
            base_speed: profile.base_speed,
            speed_modifier: 1.0,
            velocity: None,
            destination: None,
            base_accuracy: profile.base_accuracy,
            accuracy_modifier: 0.0,
            max_hits: profile.max_hits,
            hits: 0,
            points: profile.points,
            disc,
            pending_throw: None,
        }
    }

    pub fn warrior<R: Rng + ?Sized>(id: u32, location: Vector, config: &Config, rng: &mut R) -> Self {
        Self::new(id, Archetype::Warrior, location, config, rng)
    }

    pub fn bulldog<R: Rng + ?Sized>(id: u32, location: Vector, config: &Config, rng: &mut R) -> Self {
        Self::new(id, Archetype::Bulldog, location, config, rng)
    }

    pub fn leader<R: Rng + ?Sized>(id: u32, location: Vector, config: &Config, rng: &mut R) -> Self {
        Self::new(id, Archetype::Leader, location, config, rng)
    }

    pub fn guard<R: Rng + ?Sized>(id: u32, location: Vector, config: &Config, rng: &mut R) -> Self {
        Self::new(id, Archetype::Guard, location, config, rng)
    }

    pub fn tran<R: Rng + ?Sized>(id: u32, location: Vector, config: &Config, rng: &mut R) -> Self {
        Self::new(id, Archetype::Tran, location, config, rng)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.sprite.name
    }

    #[inline]
    pub fn location(&self) -> Vector {
        self.sprite.location
    }

    /// Current movement speed after damage
    #[inline]
    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_modifier
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hits >= self.max_hits
    }

    /// Advance one frame
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            caught_disc: self.catch_disc(),
            ..FrameOutcome::default()
        };

        if self.velocity.is_none() {
            self.set_destination(&ctx.bounds, &mut *ctx.rng);
        }

        self.update_location();

        if self.reached_destination() {
            debug!("{} #{} reached destination", self.name(), self.id);
            outcome.retargeted |= self.set_destination(&ctx.bounds, &mut *ctx.rng).is_some();
        }

        let (hit_x, hit_y) = self.sprite.bind_to_grid(ctx.bounds.width, ctx.bounds.height);
        if hit_x || hit_y {
            outcome.retargeted |= self.set_destination(&ctx.bounds, &mut *ctx.rng).is_some();
        }

        outcome.primed = self.prime_disc(ctx);
        if let Some(disc) = self.disc.as_mut() {
            disc.update(&self.sprite, ctx.current_time, ctx.bounds.width, ctx.bounds.height);
        }

        outcome
    }

    #[inline]
    fn update_location(&mut self) {
        if let Some(velocity) = self.velocity {
            self.sprite.location += velocity;
        }
    }

    fn reached_destination(&self) -> bool {
        self.destination
            .map_or(false, |destination| self.sprite.touches(destination))
    }

    /// Choose a new destination and steer toward it.
    ///
    /// Returns `None` for units that do not wander.
    pub fn set_destination<R: Rng + ?Sized>(
        &mut self,
        bounds: &GridBounds,
        rng: &mut R,
    ) -> Option<DestinationPick> {
        match self.pathing {
            Pathing::Wander => {
                let pick = pick_destination(self.location(), bounds, rng);
                self.destination = Some(pick.destination);
                self.velocity = Some(steer_towards(self.location(), pick.destination, self.speed()));
                Some(pick)
            }
            // Guard stands its post; the player is moved by the host
            Pathing::Stationary | Pathing::External => None,
        }
    }

    /// Arm the automatic throw once per possession
    fn prime_disc(&mut self, ctx: &mut FrameContext<'_>) -> Option<TaskId> {
        if self.is_player {
            return None;
        }
        let player_location = ctx.player_location?;
        let disc = self.disc.as_mut()?;
        if disc.status != DiscStatus::Held || disc.primed {
            return None;
        }

        disc.primed = true;
        disc.status = DiscStatus::Primed;

        let distance = self.sprite.location.distance(player_location);
        let delay = throw_delay_ms(distance, ctx.diagonal, &mut *ctx.rng);
        let task = ctx.scheduler.schedule(self.id, ctx.current_time + delay);
        self.pending_throw = Some(task);

        debug!(
            "{} #{} primed disc, throwing in {:.0}ms (distance={:.1})",
            self.name(),
            self.id,
            delay,
            distance
        );
        Some(task)
    }

    /// The scheduled throw firing. Aims at the player with accuracy error.
    ///
    /// Returns the throw direction, or `None` if the throw was abandoned.
    pub fn throw_disc<R: Rng + ?Sized>(
        &mut self,
        player_location: Option<Vector>,
        current_time: f64,
        rng: &mut R,
    ) -> Option<Vector> {
        self.pending_throw = None;
        let disc = self.disc.as_mut()?;
        if disc.status != DiscStatus::Primed {
            return None;
        }

        let Some(target) = player_location else {
            // Nobody to throw at: keep the disc and re-arm later
            disc.catch();
            return None;
        };

        let aim = aim_point(target, self.base_accuracy, self.accuracy_modifier, rng);
        let direction = throw_direction(disc.location(), aim);
        disc.thrown(direction, current_time);

        debug!(
            "{} #{} threw {} disc toward ({:.1}, {:.1})",
            self.sprite.name,
            self.id,
            disc.kind.name(),
            aim.x,
            aim.y
        );
        Some(direction)
    }

    /// Manual throw, bypassing the timer. Only works with the disc in hand.
    pub fn throw(&mut self, direction: Vector, current_time: f64) -> bool {
        let Some(disc) = self.disc.as_mut() else {
            return false;
        };
        if disc.status != DiscStatus::Held {
            return false;
        }

        disc.status = DiscStatus::Deadly;
        disc.thrown(direction, current_time);
        true
    }

    /// Take back a returning disc on contact
    pub fn catch_disc(&mut self) -> bool {
        match self.disc.as_mut() {
            Some(disc)
                if disc.status == DiscStatus::Returning && self.sprite.collides(&disc.sprite) =>
            {
                disc.catch();
                debug!("{} #{} caught disc", self.sprite.name, self.id);
                true
            }
            _ => false,
        }
    }

    /// Take `strength` hits. Damage slows the unit and breaks its course.
    pub fn hit<R: Rng + ?Sized>(&mut self, strength: u32, bounds: &GridBounds, rng: &mut R) {
        self.hits = self.hits.saturating_add(strength);
        self.speed_modifier = 1.0 / (self.hits as f32 + 1.0);
        self.set_destination(bounds, rng);

        info!(
            "{} hit. {} left",
            self.name(),
            self.max_hits.saturating_sub(self.hits)
        );
    }

    /// Heal one hit if this archetype regenerates
    pub fn regenerate<R: Rng + ?Sized>(&mut self, bounds: &GridBounds, rng: &mut R) -> bool {
        if !self.regenerates || self.hits == 0 {
            return false;
        }

        self.hits -= 1;
        // Half speed per remaining hit, full speed when healed. Capped at 1.
        let modifier = 0.5 * self.hits as f32;
        self.speed_modifier = if modifier > 0.0 { modifier.min(1.0) } else { 1.0 };
        self.set_destination(bounds, rng);

        info!("{} regenerated 1 HP", self.name());
        true
    }

    /// Render self, then the disc on top
    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        self.sprite.draw(out);
        if let Some(disc) = &self.disc {
            disc.draw(out);
        }
    }
}
