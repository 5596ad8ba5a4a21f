use crate::config::Config;
use crate::disc::DiscKind;
use crate::error::ArenaError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of combatant on the grid. `Tran` is the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Tran,
    Warrior,
    Bulldog,
    Leader,
    Guard,
}

/// How a unit picks where to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pathing {
    /// Random destinations across the grid
    Wander,
    /// Never picks a destination
    Stationary,
    /// Moved by the host
    External,
}

/// Which disc a unit spawns with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscLoadout {
    None,
    Fixed(DiscKind),
    /// `rare` with `percent` chance, otherwise `common`
    Chance {
        percent: f32,
        rare: DiscKind,
        common: DiscKind,
    },
}

impl DiscLoadout {
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<DiscKind> {
        match *self {
            DiscLoadout::None => None,
            DiscLoadout::Fixed(kind) => Some(kind),
            DiscLoadout::Chance {
                percent,
                rare,
                common,
            } => {
                if rng.gen::<f32>() * 100.0 <= percent {
                    Some(rare)
                } else {
                    Some(common)
                }
            }
        }
    }
}

/// Fixed parameters of an archetype
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeProfile {
    pub name: &'static str,
    pub color: String,
    pub is_player: bool,
    pub base_speed: f32,
    pub base_accuracy: f32,
    pub max_hits: u32,
    pub regenerates: bool,
    pub points: u32,
    pub disc: DiscLoadout,
    pub pathing: Pathing,
}

impl Archetype {
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Tran => "Tran",
            Archetype::Warrior => "Warrior",
            Archetype::Bulldog => "Bulldog",
            Archetype::Leader => "Leader",
            Archetype::Guard => "Guard",
        }
    }

    pub fn profile(&self, config: &Config) -> ArchetypeProfile {
        // Shared unit defaults, overridden per archetype below
        let base = ArchetypeProfile {
            name: self.name(),
            color: config.warrior_color.clone(),
            is_player: false,
            base_speed: 1.0,
            base_accuracy: config.warrior_accuracy,
            max_hits: 1,
            regenerates: false,
            points: 100,
            disc: DiscLoadout::Fixed(DiscKind::DarkBlue),
            pathing: Pathing::Wander,
        };

        match self {
            Archetype::Tran => ArchetypeProfile {
                color: config.tran_color.clone(),
                is_player: true,
                points: 0,
                pathing: Pathing::External,
                ..base
            },
            Archetype::Warrior => base,
            Archetype::Bulldog => ArchetypeProfile {
                color: config.bulldog_color.clone(),
                base_speed: 0.75,
                base_accuracy: config.bulldog_accuracy,
                max_hits: 2,
                regenerates: true,
                points: 500,
                ..base
            },
            Archetype::Leader => ArchetypeProfile {
                color: config.leader_color.clone(),
                base_speed: 2.0,
                base_accuracy: config.leader_accuracy,
                points: 1000,
                disc: DiscLoadout::Chance {
                    percent: config.white_disc_percent,
                    rare: DiscKind::White,
                    common: DiscKind::Brown,
                },
                ..base
            },
            // Carries a stun pole instead of a disc; the pole has no mechanics yet
            Archetype::Guard => ArchetypeProfile {
                color: config.guard_color.clone(),
                base_speed: 2.0,
                max_hits: 4,
                regenerates: true,
                points: 2000,
                disc: DiscLoadout::None,
                pathing: Pathing::Stationary,
                ..base
            },
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tran" | "player" => Ok(Archetype::Tran),
            "warrior" => Ok(Archetype::Warrior),
            "bulldog" => Ok(Archetype::Bulldog),
            "leader" => Ok(Archetype::Leader),
            "guard" => Ok(Archetype::Guard),
            _ => Err(ArenaError::UnknownArchetype(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_archetype_table() {
        let config = Config::default();

        let warrior = Archetype::Warrior.profile(&config);
        assert_eq!(
            (warrior.base_speed, warrior.base_accuracy, warrior.max_hits, warrior.regenerates, warrior.points),
            (1.0, 85.0, 1, false, 100)
        );
        assert_eq!(warrior.disc, DiscLoadout::Fixed(DiscKind::DarkBlue));

        let bulldog = Archetype::Bulldog.profile(&config);
        assert_eq!(
            (bulldog.base_speed, bulldog.base_accuracy, bulldog.max_hits, bulldog.regenerates, bulldog.points),
            (0.75, 90.0, 2, true, 500)
        );
        assert_eq!(bulldog.disc, DiscLoadout::Fixed(DiscKind::DarkBlue));

        let leader = Archetype::Leader.profile(&config);
        assert_eq!(
            (leader.base_speed, leader.base_accuracy, leader.max_hits, leader.regenerates, leader.points),
            (2.0, 95.0, 1, false, 1000)
        );

        let guard = Archetype::Guard.profile(&config);
        assert_eq!(
            (guard.base_speed, guard.base_accuracy, guard.max_hits, guard.regenerates, guard.points),
            (2.0, 85.0, 4, true, 2000)
        );
        assert_eq!(guard.disc, DiscLoadout::None);
        assert_eq!(guard.pathing, Pathing::Stationary);
    }

    #[test]
    fn test_leader_disc_roll_is_mostly_brown() {
        let config = Config::default();
        let loadout = Archetype::Leader.profile(&config).disc;
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let whites = (0..10_000)
            .filter(|_| loadout.roll(&mut rng) == Some(DiscKind::White))
            .count();
        // ~20%
        assert!(whites > 1500 && whites < 2500, "whites = {}", whites);
    }

    #[test]
    fn test_parse_archetype() {
        assert_eq!("bulldog".parse::<Archetype>().unwrap(), Archetype::Bulldog);
        assert_eq!("Guard".parse::<Archetype>().unwrap(), Archetype::Guard);
        assert!(matches!(
            "dragon".parse::<Archetype>(),
            Err(ArenaError::UnknownArchetype(_))
        ));
    }
}
