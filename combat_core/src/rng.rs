//! Random source injected into combat

use rand::Rng;

/// Source of uniform rolls for hit, crit, variance and effect triggers
///
/// Every `rand::Rng` is a `CombatRng`; tests can supply scripted rolls instead.
pub trait CombatRng {
    /// Uniform draw in [0, 1)
    fn roll(&mut self) -> f64;

    /// Uniform draw in [low, high)
    fn roll_range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.roll()
    }

    /// True with probability `chance`
    fn chance(&mut self, chance: f64) -> bool {
        self.roll() < chance
    }
}

impl<R: Rng + ?Sized> CombatRng for R {
    fn roll(&mut self) -> f64 {
        self.gen::<f64>()
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedRolls;
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_seeded_rolls_repeat() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..20 {
            let x = a.roll();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.roll());
        }
    }

    #[test]
    fn test_roll_range() {
        let mut rolls = ScriptedRolls::new(&[0.0, 0.5]);
        assert!((rolls.roll_range(0.85, 1.15) - 0.85).abs() < 1e-12);
        assert!((rolls.roll_range(0.85, 1.15) - 1.0).abs() < 1e-12);
        assert_eq!(rolls.remaining(), 0);
    }

    #[test]
    fn test_chance() {
        let mut rolls = ScriptedRolls::new(&[0.29, 0.3]).with_fallback(0.99);
        assert!(rolls.chance(0.3));
        assert!(!rolls.chance(0.3));
        assert!(!rolls.chance(0.3));
    }
}
