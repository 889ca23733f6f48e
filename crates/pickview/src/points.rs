//! Random point cloud generation.

use glam::Vec3;
use rand::Rng;

/// Half-extent of the cube the points are scattered in.
const SPREAD: f32 = 2.5;

/// Smallest and largest cloud sizes produced by regeneration.
const MIN_POINTS: usize = 50;
const MAX_POINTS: usize = 200;

/// Generates a fresh random cloud of 50 to 200 points in a `[-2.5, 2.5]`
/// cube around the origin.
pub fn generate_random_points<R: Rng>(rng: &mut R) -> Vec<Vec3> {
    let count = rng.gen_range(MIN_POINTS..=MAX_POINTS);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-SPREAD..SPREAD),
                rng.gen_range(-SPREAD..SPREAD),
                rng.gen_range(-SPREAD..SPREAD),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_count_stays_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let points = generate_random_points(&mut rng);
            assert!((MIN_POINTS..=MAX_POINTS).contains(&points.len()));
        }
    }

    #[test]
    fn test_points_stay_in_cube() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for p in generate_random_points(&mut rng) {
            assert!(p.x.abs() < SPREAD && p.y.abs() < SPREAD && p.z.abs() < SPREAD);
        }
    }

    #[test]
    fn test_regeneration_produces_different_clouds() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let a = generate_random_points(&mut rng);
        let b = generate_random_points(&mut rng);
        assert_ne!(a, b);
    }
}
