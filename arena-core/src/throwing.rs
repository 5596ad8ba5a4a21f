use crate::vector::Vector;
use rand::Rng;

/// Shortest wait between priming and throwing (ms)
pub const MIN_THROW_DELAY_MS: f64 = 1000.0;
/// Distance-scaled part of the wait: `BASE + random * SPREAD`
const DISTANCE_DELAY_BASE_MS: f64 = 2000.0;
const DISTANCE_DELAY_SPREAD_MS: f64 = 4000.0;
/// Longest wait, reached at full-diagonal distance
pub const MAX_THROW_DELAY_MS: f64 =
    MIN_THROW_DELAY_MS + DISTANCE_DELAY_BASE_MS + DISTANCE_DELAY_SPREAD_MS;

/// How long a primed unit waits before its automatic throw.
///
/// Closer units throw sooner; the distance part scales linearly with
/// `distance / diagonal`.
pub fn throw_delay_ms<R: Rng + ?Sized>(distance: f32, diagonal: f32, rng: &mut R) -> f64 {
    let multiplier = if diagonal > 0.0 {
        (distance / diagonal).clamp(0.0, 1.0) as f64
    } else {
        0.0
    };

    MIN_THROW_DELAY_MS
        + (DISTANCE_DELAY_BASE_MS + rng.gen::<f64>() * DISTANCE_DELAY_SPREAD_MS) * multiplier
}

/// Half-width of the aim error band for a given accuracy
#[inline]
pub fn aim_spread(base_accuracy: f32, accuracy_modifier: f32) -> f32 {
    100.0 - base_accuracy + accuracy_modifier
}

/// One axis of aim error: `floor(random * spread * 2) - spread`.
/// A negative spread mirrors the band; zero spread means no error.
pub fn aim_offset<R: Rng + ?Sized>(spread: f32, rng: &mut R) -> f32 {
    (rng.gen::<f32>() * spread * 2.0).floor() - spread
}

/// Somewhere around `target`, worse the lower the accuracy
pub fn aim_point<R: Rng + ?Sized>(
    target: Vector,
    base_accuracy: f32,
    accuracy_modifier: f32,
    rng: &mut R,
) -> Vector {
    let spread = aim_spread(base_accuracy, accuracy_modifier);
    Vector::new(
        target.x + aim_offset(spread, rng),
        target.y + aim_offset(spread, rng),
    )
}

/// Unit direction from the disc to the aim point
#[inline]
pub fn throw_direction(from: Vector, aim: Vector) -> Vector {
    (aim - from).normalized()
}
