//! Random placement of the wireframe target.

use glam::Vec3;
use rand::Rng;

use crate::transform::TargetBox;

/// Draws each axis as `floor(u * (max_size - 0.5)) + 0.5`.
///
/// Values are half-integers in `[0.5, max_size - 0.5]` whenever `max_size`
/// is a multiple of 0.5.
pub fn generate_size<R: Rng + ?Sized>(rng: &mut R, max_size: f32) -> Vec3 {
    let mut axis = || (rng.gen::<f32>() * (max_size - 0.5)).floor() + 0.5;
    Vec3::new(axis(), axis(), axis())
}

/// Draws each axis as `floor(u * 2 * bound) - bound`.
pub fn generate_position<R: Rng + ?Sized>(rng: &mut R, bound: f32) -> Vec3 {
    let mut axis = || (rng.gen::<f32>() * 2.0 * bound).floor() - bound;
    Vec3::new(axis(), axis(), axis())
}

pub fn generate_target<R: Rng + ?Sized>(rng: &mut R, max_size: f32, bound: f32) -> TargetBox {
    TargetBox {
        size: generate_size(rng, max_size),
        position: generate_position(rng, bound),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn sizes_are_half_integers_within_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for max_size in [1.0_f32, 2.0, 3.5, 6.0] {
            for _ in 0..500 {
                let size = generate_size(&mut rng, max_size);
                for value in size.to_array() {
                    assert!(value >= 0.5 && value <= max_size - 0.5, "{value} / {max_size}");
                    assert_eq!(value.rem_euclid(1.0), 0.5);
                }
            }
        }
    }

    #[test]
    fn positions_are_integers_within_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for bound in [1.0_f32, 3.0, 10.0] {
            for _ in 0..500 {
                let position = generate_position(&mut rng, bound);
                for value in position.to_array() {
                    assert_eq!(value.fract(), 0.0);
                    assert!(value >= -bound && value <= bound - 1.0, "{value} / {bound}");
                }
            }
        }
    }

    #[test]
    fn default_bound_yields_half_integer_grid() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let position = generate_position(&mut rng, 1.5);
            for value in position.to_array() {
                assert!([-1.5, -0.5, 0.5].contains(&value), "{value}");
            }
        }
    }

    #[test]
    fn generator_covers_every_size() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = [false; 2];
        for _ in 0..200 {
            let size = generate_size(&mut rng, 2.0);
            seen[(size.x - 0.5) as usize] = true;
        }
        assert_eq!(seen, [true, true]);
    }
}
