use rand::distributions::uniform::SampleRange;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

const MIN_DRAWN_SEED: u64 = 1;
const MAX_DRAWN_SEED: u64 = 1_000_000;

/// The single random stream of a generation run.
///
/// Everything a run produces, entity ids included, is drawn from here, so
/// two runs with the same seed and counts write the same rows.
#[derive(Debug, Clone)]
pub struct WorldRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl WorldRng {
    /// Seeds the stream; without a seed one is drawn from thread entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let seed =
            seed.unwrap_or_else(|| rand::thread_rng().gen_range(MIN_DRAWN_SEED..=MAX_DRAWN_SEED));
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_uuid(&mut self) -> Uuid {
        let bytes: [u8; 16] = self.inner.gen();
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub fn range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: SampleRange<T>,
    {
        self.inner.gen_range(range)
    }

    /// Uniform draw from a fixed catalogue table.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty. Catalogue tables are non-empty constants;
    /// pools built during a run go through [`WorldRng::choose`].
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        match items.choose(&mut self.inner) {
            Some(item) => item,
            None => panic!("pick from an empty catalogue table"),
        }
    }

    /// Uniform draw from a pool that may be empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    /// Weighted draw over `(value, weight)` pairs. `None` when the table is
    /// empty or every weight is zero.
    pub fn pick_weighted<T: Copy>(&mut self, weighted: &[(T, u32)]) -> Option<T> {
        let index = WeightedIndex::new(weighted.iter().map(|(_, weight)| *weight)).ok()?;
        weighted
            .get(index.sample(&mut self.inner))
            .map(|(value, _)| *value)
    }

    /// Draws `count` distinct elements, in draw order. Asking for more than
    /// the slice holds returns every element.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let count = count.min(items.len());
        rand::seq::index::sample(&mut self.inner, items.len(), count)
            .into_iter()
            .map(|index| items[index].clone())
            .collect()
    }

    /// `value` scaled by a uniform factor in `[1 - spread, 1 + spread]`.
    pub fn jitter(&mut self, value: f64, spread: f64) -> f64 {
        if spread <= 0.0 {
            return value;
        }
        value * self.inner.gen_range((1.0 - spread)..=(1.0 + spread))
    }
}

impl RngCore for WorldRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = WorldRng::new(Some(99));
        let mut b = WorldRng::new(Some(99));
        for _ in 0..32 {
            assert_eq!(a.next_uuid(), b.next_uuid());
            assert_eq!(a.range(0..1000u32), b.range(0..1000u32));
        }
    }

    #[test]
    fn drawn_seed_is_recorded() {
        let rng = WorldRng::new(None);
        assert!((MIN_DRAWN_SEED..=MAX_DRAWN_SEED).contains(&rng.seed()));
    }

    #[test]
    fn sample_has_no_repeats_and_caps_at_len() {
        let mut rng = WorldRng::new(Some(3));
        let items: Vec<u32> = (0..10).collect();
        let mut picked = rng.sample(&items, 20);
        assert_eq!(picked.len(), 10);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 10);
    }

    #[test]
    fn weighted_pick_skips_zero_weights() {
        let mut rng = WorldRng::new(Some(5));
        let weighted = [("never", 0), ("always", 10)];
        for _ in 0..100 {
            assert_eq!(rng.pick_weighted(&weighted), Some("always"));
        }
    }

    #[test]
    fn empty_pools_yield_nothing() {
        let mut rng = WorldRng::new(Some(5));
        let empty: [u32; 0] = [];
        assert_eq!(rng.choose(&empty), None);
        assert_eq!(rng.pick_weighted::<u32>(&[]), None);
        assert_eq!(rng.pick_weighted(&[(1u32, 0), (2, 0)]), None);
        assert_eq!(rng.choose(&[9u32]), Some(&9));
    }

    #[test]
    fn weighted_pick_follows_the_weights() {
        let mut rng = WorldRng::new(Some(13));
        let weighted = [("common", 90), ("rare", 10)];
        let common = (0..1000)
            .filter(|_| rng.pick_weighted(&weighted) == Some("common"))
            .count();
        assert!((800..=980).contains(&common));
    }

    #[test]
    #[should_panic(expected = "empty catalogue table")]
    fn picking_from_an_empty_catalogue_panics() {
        let mut rng = WorldRng::new(Some(1));
        let empty: [&str; 0] = [];
        rng.pick(&empty);
    }

    #[test]
    fn uuids_are_version_four() {
        let mut rng = WorldRng::new(Some(11));
        assert_eq!(rng.next_uuid().get_version_num(), 4);
    }
}
