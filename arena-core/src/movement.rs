use crate::config::GridBounds;
use crate::vector::Vector;
use rand::Rng;

/// Samples taken before a destination is accepted regardless of distance
pub const MAX_DESTINATION_ATTEMPTS: u32 = 4;

/// Outcome of a destination search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestinationPick {
    pub destination: Vector,
    pub attempts: u32,
}

/// Pick a random point on the grid at least `minimum_distance` away.
///
/// Gives up after [`MAX_DESTINATION_ATTEMPTS`] samples and takes the last
/// one, so a unit pinned in a corner never stalls the frame.
pub fn pick_destination<R: Rng + ?Sized>(
    location: Vector,
    bounds: &GridBounds,
    rng: &mut R,
) -> DestinationPick {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let candidate = Vector::random_2d(rng, bounds.width, bounds.height);

        if location.distance(candidate) >= bounds.minimum_distance
            || attempts >= MAX_DESTINATION_ATTEMPTS
        {
            return DestinationPick {
                destination: candidate,
                attempts,
            };
        }
    }
}

/// Velocity toward `destination` with magnitude `speed`
#[inline]
pub fn steer_towards(location: Vector, destination: Vector, speed: f32) -> Vector {
    let mut force = destination - location;
    force.normalize();

    let mut velocity = Vector::zero() + force * speed;
    velocity.limit(speed);
    velocity
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounds(minimum_distance: f32) -> GridBounds {
        GridBounds {
            width: 800.0,
            height: 600.0,
            minimum_distance,
        }
    }

    #[test]
    fn test_destination_respects_minimum_distance() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let bounds = bounds(250.0);
        let location = Vector::new(400.0, 300.0);

        for _ in 0..500 {
            let pick = pick_destination(location, &bounds, &mut rng);
            assert!(pick.attempts >= 1 && pick.attempts <= MAX_DESTINATION_ATTEMPTS);
            assert!(
                location.distance(pick.destination) >= bounds.minimum_distance
                    || pick.attempts == MAX_DESTINATION_ATTEMPTS
            );
        }
    }

    #[test]
    fn test_unreachable_minimum_gives_up_after_four_samples() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let bounds = bounds(10_000.0);

        let pick = pick_destination(Vector::new(0.0, 0.0), &bounds, &mut rng);
        assert_eq!(pick.attempts, MAX_DESTINATION_ATTEMPTS);
        assert!(pick.destination.x < 800.0 && pick.destination.y < 600.0);
    }

    #[test]
    fn test_zero_minimum_accepts_first_sample() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pick = pick_destination(Vector::new(10.0, 10.0), &bounds(0.0), &mut rng);
        assert_eq!(pick.attempts, 1);
    }

    #[test]
    fn test_steer_towards_has_requested_speed() {
        let v = steer_towards(Vector::new(0.0, 0.0), Vector::new(30.0, 40.0), 0.75);
        assert!((v.magnitude() - 0.75).abs() < 1e-5);
        assert!((v.x - 0.45).abs() < 1e-5);
        assert!((v.y - 0.6).abs() < 1e-5);

        // Already there: no NaN, no motion
        let still = steer_towards(Vector::new(5.0, 5.0), Vector::new(5.0, 5.0), 2.0);
        assert_eq!(still, Vector::zero());
    }
}
