//! NK and NKq fitness landscapes.
//!
//! Fitness is the mean of `N` component contributions. Component `i` reads
//! the `K + 1` digits at positions `i, i+1, ..., i+K (mod N)` and maps that
//! sub-vector to a value drawn at random the first time it is seen. Draws are
//! memoized, so the landscape is fixed once explored but never materialized
//! up front.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use rand::prelude::*;

use super::location::{Location, random_location};
use crate::schema::{ComponentValues, ConfigError, LandscapeConfig};

/// Attribute indices read by each component: row `i` is `(i, ..., i+K) mod N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionIndex {
    width: usize,
    indices: Vec<usize>,
}

impl InteractionIndex {
    /// Build the table for `n` components of width `k + 1`.
    pub fn new(n: usize, k: usize) -> Self {
        let width = k + 1;
        let indices = (0..n)
            .flat_map(|i| (0..width).map(move |offset| (i + offset) % n))
            .collect();
        Self { width, indices }
    }

    /// Attribute indices of component `component`.
    #[inline]
    pub fn row(&self, component: usize) -> &[usize] {
        let start = component * self.width;
        &self.indices[start..start + self.width]
    }

    /// Number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len() / self.width
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Digits per row (`K + 1`).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Digits of `location` read by `component`.
    pub fn slice(&self, component: usize, location: &Location) -> Vec<u8> {
        let digits = location.digits();
        self.row(component).iter().map(|&j| digits[j]).collect()
    }
}

/// Cache key: component index plus the exact digits it read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    pub component: usize,
    pub digits: Vec<u8>,
}

/// Memoized component contributions.
///
/// Entries are only ever added. Generation for a missing key runs under the
/// write lock, so concurrent callers agree on a single value per key.
#[derive(Debug, Default)]
pub struct FitnessCache {
    entries: RwLock<HashMap<ComponentKey, f64>>,
}

impl FitnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, if any.
    pub fn get(&self, key: &ComponentKey) -> Option<f64> {
        self.entries.read().get(key).copied()
    }

    /// Cached value for `key`, generating and storing it on a miss.
    pub fn get_or_insert_with<F>(&self, key: ComponentKey, generate: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        // Another thread may have filled the entry between the two locks.
        *self.entries.write().entry(key).or_insert_with(generate)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of every cached entry.
    pub fn snapshot(&self) -> HashMap<ComponentKey, f64> {
        self.entries.read().clone()
    }
}

impl ComponentValues {
    /// Draw a fresh component contribution.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Continuous => rng.r#gen::<f64>(),
            Self::Quantized { levels } => {
                let level = rng.gen_range(0..levels);
                f64::from(level) / f64::from(levels - 1)
            }
        }
    }
}

/// A lazily generated NK (or NKq) fitness landscape.
pub struct NkLandscape {
    config: LandscapeConfig,
    interactions: InteractionIndex,
    cache: FitnessCache,
    rng: Mutex<StdRng>,
}

impl NkLandscape {
    /// Create a landscape whose component draws are seeded by `seed`.
    pub fn new(config: LandscapeConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a landscape drawing component values from `rng`.
    pub fn with_rng(config: LandscapeConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let interactions = InteractionIndex::new(config.n, config.k);
        Ok(Self {
            config,
            interactions,
            cache: FitnessCache::new(),
            rng: Mutex::new(rng),
        })
    }

    /// Continuous landscape with `alleles` digits per attribute and an
    /// entropy-seeded generator.
    pub fn construct(n: usize, k: usize, alleles: u8) -> Result<Self, ConfigError> {
        let config = LandscapeConfig {
            n,
            k,
            alleles,
            values: ComponentValues::Continuous,
        };
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn config(&self) -> &LandscapeConfig {
        &self.config
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.config.n
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.config.k
    }

    #[inline]
    pub fn alleles(&self) -> u8 {
        self.config.alleles
    }

    pub fn interactions(&self) -> &InteractionIndex {
        &self.interactions
    }

    pub fn cache(&self) -> &FitnessCache {
        &self.cache
    }

    /// Uniformly random location; consumes entropy from `rng` only.
    pub fn random_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Location {
        random_location(rng, self.config.n, self.config.alleles)
    }

    /// Contribution of `component` for the sub-vector `digits`.
    pub fn component_fitness(&self, component: usize, digits: &[u8]) -> f64 {
        let key = ComponentKey {
            component,
            digits: digits.to_vec(),
        };
        self.cache.get_or_insert_with(key, || {
            let mut rng = self.rng.lock();
            self.config.values.draw(&mut *rng)
        })
    }

    /// Store `value` for a component sub-vector unless one is already cached.
    /// Returns the value that ends up cached.
    pub fn seed_component(&self, component: usize, digits: &[u8], value: f64) -> f64 {
        let key = ComponentKey {
            component,
            digits: digits.to_vec(),
        };
        self.cache.get_or_insert_with(key, || value)
    }

    /// Mean component contribution at `location`.
    pub fn fitness(&self, location: &Location) -> f64 {
        debug_assert_eq!(location.len(), self.config.n);
        let total: f64 = (0..self.interactions.len())
            .map(|i| self.component_fitness(i, &self.interactions.slice(i, location)))
            .sum();
        total / self.config.n as f64
    }
}

impl std::fmt::Debug for NkLandscape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NkLandscape")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_index_wraps() {
        let index = InteractionIndex::new(5, 2);
        assert_eq!(index.len(), 5);
        assert_eq!(index.width(), 3);
        assert_eq!(index.row(0), &[0, 1, 2]);
        assert_eq!(index.row(3), &[3, 4, 0]);
        assert_eq!(index.row(4), &[4, 0, 1]);
    }

    #[test]
    fn test_interaction_index_k_zero() {
        let index = InteractionIndex::new(3, 0);
        assert_eq!(index.row(2), &[2]);
    }

    #[test]
    fn test_construct_rejects_invalid_parameters() {
        assert_eq!(
            NkLandscape::construct(0, 0, 2).unwrap_err(),
            ConfigError::InvalidAttributeCount
        );
        assert_eq!(
            NkLandscape::construct(4, 4, 2).unwrap_err(),
            ConfigError::InvalidInteractionWidth { n: 4, k: 4 }
        );
        assert_eq!(
            NkLandscape::construct(4, 1, 1).unwrap_err(),
            ConfigError::InvalidAlleles(1)
        );
        assert_eq!(
            NkLandscape::new(LandscapeConfig::nkq(4, 1, 1), 0).unwrap_err(),
            ConfigError::InvalidQuantization(1)
        );
    }

    #[test]
    fn test_random_location_in_range() {
        let landscape = NkLandscape::construct(12, 3, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let location = landscape.random_location(&mut rng);
            assert_eq!(location.len(), 12);
            assert!(location.digits().iter().all(|&d| d < 4));
        }
        assert!(landscape.cache().is_empty());
    }

    #[test]
    fn test_fitness_idempotent() {
        let landscape = NkLandscape::new(LandscapeConfig::nk(10, 3), 11).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let location = landscape.random_location(&mut rng);
            let first = landscape.fitness(&location);
            let second = landscape.fitness(&location);
            assert_eq!(first.to_bits(), second.to_bits());
            assert!((0.0..1.0).contains(&first));
        }
    }

    #[test]
    fn test_fitness_is_mean_of_components() {
        let landscape = NkLandscape::new(LandscapeConfig::nk(4, 1), 2).unwrap();
        let location = Location::new(vec![0, 1, 1, 0]);
        let fitness = landscape.fitness(&location);
        let components: f64 = (0..4)
            .map(|i| {
                let key = ComponentKey {
                    component: i,
                    digits: landscape.interactions().slice(i, &location),
                };
                landscape.cache().get(&key).unwrap()
            })
            .sum();
        assert!((fitness - components / 4.0).abs() < 1e-12);
        assert_eq!(landscape.cache().len(), 4);
    }

    #[test]
    fn test_continuous_sensitivity() {
        let landscape = NkLandscape::new(LandscapeConfig::nk(6, 2), 9).unwrap();
        let a = Location::new(vec![0, 0, 0, 0, 0, 0]);
        let b = Location::new(vec![1, 0, 0, 0, 0, 0]);
        assert_ne!(landscape.fitness(&a), landscape.fitness(&b));
    }

    #[test]
    fn test_same_seed_same_landscape() {
        let a = NkLandscape::new(LandscapeConfig::nk(8, 2), 77).unwrap();
        let b = NkLandscape::new(LandscapeConfig::nk(8, 2), 77).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            let location = a.random_location(&mut rng);
            assert_eq!(a.fitness(&location), b.fitness(&location));
        }
    }

    #[test]
    fn test_cache_monotonic() {
        let landscape = NkLandscape::new(LandscapeConfig::nk(6, 2), 4).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut previous = landscape.cache().snapshot();
        for _ in 0..30 {
            let location = landscape.random_location(&mut rng);
            landscape.fitness(&location);
            let current = landscape.cache().snapshot();
            assert!(current.len() >= previous.len());
            for (key, value) in &previous {
                assert_eq!(current.get(key).map(|v| v.to_bits()), Some(value.to_bits()));
            }
            previous = current;
        }
    }

    #[test]
    fn test_quantized_two_levels() {
        let landscape = NkLandscape::new(LandscapeConfig::nkq(6, 2, 2), 13).unwrap();
        for component in 0..6 {
            for digits in [[0u8, 0, 0], [0, 1, 0], [1, 1, 1]] {
                let first = landscape.component_fitness(component, &digits);
                assert!(first == 0.0 || first == 1.0);
                for _ in 0..5 {
                    assert_eq!(landscape.component_fitness(component, &digits), first);
                }
            }
        }
    }

    #[test]
    fn test_quantized_locations_share_fitness() {
        // Four binary components give at most five distinct means over
        // sixteen locations.
        let landscape = NkLandscape::new(LandscapeConfig::nkq(4, 0, 2), 31).unwrap();
        let locations: Vec<Location> = (0..16).map(|code| Location::decode(code, 4, 2)).collect();
        let mut by_fitness: HashMap<u64, Vec<&Location>> = HashMap::new();
        for location in &locations {
            by_fitness
                .entry(landscape.fitness(location).to_bits())
                .or_default()
                .push(location);
        }
        assert!(by_fitness.len() <= 5);
        let shared = by_fitness.values().find(|group| group.len() > 1).unwrap();
        assert_ne!(shared[0], shared[1]);
        assert_eq!(landscape.fitness(shared[0]), landscape.fitness(shared[1]));
    }

    #[test]
    fn test_quantized_levels_are_grid_points() {
        let landscape = NkLandscape::new(LandscapeConfig::nkq(5, 1, 5), 21).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let location = landscape.random_location(&mut rng);
            landscape.fitness(&location);
        }
        for value in landscape.cache().snapshot().values() {
            let scaled = value * 4.0;
            assert!((scaled - scaled.round()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_seed_component_keeps_first_value() {
        let landscape = NkLandscape::new(LandscapeConfig::nk(3, 0), 0).unwrap();
        assert_eq!(landscape.seed_component(0, &[1], 0.25), 0.25);
        assert_eq!(landscape.seed_component(0, &[1], 0.75), 0.25);
        assert_eq!(landscape.component_fitness(0, &[1]), 0.25);
    }

    #[test]
    fn test_concurrent_lookups_agree() {
        use rayon::prelude::*;

        let landscape = NkLandscape::new(LandscapeConfig::nk(4, 3), 6).unwrap();
        let values: Vec<f64> = (0..64)
            .into_par_iter()
            .map(|_| landscape.component_fitness(2, &[1, 0, 1, 1]))
            .collect();
        assert!(values.iter().all(|&v| v == values[0]));
        assert_eq!(landscape.cache().len(), 1);
    }
}
