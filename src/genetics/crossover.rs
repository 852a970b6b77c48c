//! Trait inheritance: parental averaging plus Gaussian mutation.

use crate::animal::Traits;
use crate::rng::gaussian;
use rand::Rng;

/// Offspring traits: each trait is the mean of the parents' values,
/// independently perturbed by `N(0, mutation_std)`. Results are floored at
/// zero. This is the only place noise enters an inherited trait.
pub fn blend_traits<R: Rng + ?Sized>(a: &Traits, b: &Traits, mutation_std: f64, rng: &mut R) -> Traits {
    let mut child = |x: f64, y: f64| gaussian(&mut *rng, (x + y) / 2.0, mutation_std).max(0.0);

    Traits {
        speed: child(a.speed, b.speed),
        sight_radius: child(a.sight_radius, b.sight_radius),
        max_hunger: child(a.max_hunger, b.max_hunger),
        max_age: child(a.max_age, b.max_age),
        reproductive_drive: child(a.reproductive_drive, b.reproductive_drive),
        nutritional_value: child(a.nutritional_value, b.nutritional_value),
    }
}
