//! Pluggable sources of an initial coin reserve.

use crate::denomination::Denomination;
use crate::reserve::CashReserve;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

/// Produces the reserve a machine starts with.
pub trait ReserveGenerator {
    fn generate(&mut self) -> CashReserve;
}

/// A fixed reserve is its own generator.
impl ReserveGenerator for CashReserve {
    fn generate(&mut self) -> CashReserve {
        self.clone()
    }
}

/// Random reserve: a non-empty random subset of `denominations`, each with
/// between 1 and `max_quantity` coins.
#[derive(Debug, Clone)]
pub struct RandomReserveGenerator<R> {
    denominations: Vec<Denomination>,
    max_quantity: u32,
    rng: R,
}

impl RandomReserveGenerator<rand::rngs::ThreadRng> {
    /// Generator over the euro coin set using the thread-local RNG.
    pub fn euro(max_quantity: u32) -> Self {
        let denominations = Denomination::EURO_COINS
            .iter()
            .filter_map(|&c| Denomination::new(c))
            .collect();
        RandomReserveGenerator::with_rng(denominations, max_quantity, rand::thread_rng())
    }
}

impl<R: Rng> RandomReserveGenerator<R> {
    /// Creates a generator with an explicit RNG, e.g. a seeded one for tests.
    ///
    /// A `max_quantity` of zero is raised to one so every picked denomination holds a coin.
    pub fn with_rng(denominations: Vec<Denomination>, max_quantity: u32, rng: R) -> Self {
        RandomReserveGenerator {
            denominations,
            max_quantity: max_quantity.max(1),
            rng,
        }
    }
}

impl<R: Rng> ReserveGenerator for RandomReserveGenerator<R> {
    fn generate(&mut self) -> CashReserve {
        if self.denominations.is_empty() {
            return CashReserve::new();
        }

        let mut pool = self.denominations.clone();
        pool.shuffle(&mut self.rng);
        let picked = self.rng.gen_range(1..=pool.len());

        let reserve: CashReserve = pool
            .into_iter()
            .take(picked)
            .map(|d| (d, self.rng.gen_range(1..=self.max_quantity)))
            .collect();

        info!("Generated reserve: {}", reserve);
        reserve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn coins(values: &[u32]) -> Vec<Denomination> {
        values.iter().map(|&v| Denomination::new(v).unwrap()).collect()
    }

    #[test]
    fn test_generated_reserve_respects_bounds() {
        let pool = coins(&[1, 5, 10, 100]);
        let mut generator =
            RandomReserveGenerator::with_rng(pool.clone(), 7, StdRng::seed_from_u64(42));

        for _ in 0..50 {
            let reserve = generator.generate();
            assert!(!reserve.is_empty());
            for (denomination, count) in reserve.iter() {
                assert!(pool.contains(&denomination));
                assert!((1..=7).contains(&count));
            }
        }
    }

    #[test]
    fn test_seeded_generator_is_deterministic() {
        let pool = coins(&[1, 2, 5, 10, 20, 50]);
        let mut a = RandomReserveGenerator::with_rng(pool.clone(), 10, StdRng::seed_from_u64(7));
        let mut b = RandomReserveGenerator::with_rng(pool, 10, StdRng::seed_from_u64(7));
        assert_eq!(a.generate(), b.generate());
    }

    #[test]
    fn test_empty_pool_yields_empty_reserve() {
        let mut generator = RandomReserveGenerator::with_rng(Vec::new(), 5, StdRng::seed_from_u64(1));
        assert!(generator.generate().is_empty());
    }

    #[test]
    fn test_euro_generator_uses_euro_coins() {
        let reserve = RandomReserveGenerator::euro(3).generate();
        for (denomination, _) in reserve.iter() {
            assert!(Denomination::EURO_COINS.contains(&denomination.cents()));
        }
    }

    #[test]
    fn test_fixed_reserve_generates_itself() {
        let mut fixed: CashReserve = coins(&[10]).into_iter().map(|d| (d, 4)).collect();
        assert_eq!(fixed.generate(), fixed);
    }
}
