//! Hill-climbing agents.

use std::sync::Arc;

use rand::prelude::*;

use super::landscape::NkLandscape;
use super::location::{Location, mutate_position};
use crate::schema::StepStrategy;

/// A searcher walking an [`NkLandscape`].
///
/// An agent is active until its strategy finds no acceptable move, after
/// which it is done for good and [`Agent::step`] is a no-op.
#[derive(Debug, Clone)]
pub struct Agent {
    landscape: Arc<NkLandscape>,
    location: Location,
    fitness: f64,
    moves: usize,
    done: bool,
    strategy: StepStrategy,
    rng: StdRng,
}

impl Agent {
    /// Create an agent at a uniformly random location drawn from `rng`.
    pub fn new(landscape: Arc<NkLandscape>, strategy: StepStrategy, mut rng: StdRng) -> Self {
        let location = landscape.random_location(&mut rng);
        Self::at(landscape, location, strategy, rng)
    }

    /// Create an agent at a chosen location.
    pub fn at(
        landscape: Arc<NkLandscape>,
        location: Location,
        strategy: StepStrategy,
        rng: StdRng,
    ) -> Self {
        let fitness = landscape.fitness(&location);
        Self {
            landscape,
            location,
            fitness,
            moves: 0,
            done: false,
            strategy,
            rng,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Accepted moves so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn strategy(&self) -> StepStrategy {
        self.strategy
    }

    pub fn landscape(&self) -> &Arc<NkLandscape> {
        &self.landscape
    }

    /// Current location with `direction` changed to another digit.
    pub fn mutation(&mut self, direction: usize) -> Location {
        mutate_position(
            &self.location,
            direction,
            self.landscape.alleles(),
            &mut self.rng,
        )
    }

    /// All single-position mutations of the current location, in a fresh
    /// random order of positions.
    pub fn generate_mutations(&mut self) -> Mutations {
        let mut positions: Vec<usize> = (0..self.location.len()).collect();
        positions.shuffle(&mut self.rng);
        Mutations {
            origin: self.location.clone(),
            alleles: self.landscape.alleles(),
            positions: positions.into_iter(),
            rng: StdRng::seed_from_u64(self.rng.r#gen()),
        }
    }

    /// Move to `new_location` if it is at least as fit as the current one.
    ///
    /// Equal fitness is accepted so agents can drift across plateaus.
    pub fn consider(&mut self, new_location: Location) -> bool {
        let new_fitness = self.landscape.fitness(&new_location);
        if new_fitness >= self.fitness {
            self.location = new_location;
            self.fitness = new_fitness;
            self.moves += 1;
            true
        } else {
            false
        }
    }

    /// Advance one step with this agent's strategy. Returns whether it moved.
    pub fn step(&mut self) -> bool {
        if self.done {
            return false;
        }
        match self.strategy {
            StepStrategy::Fitter => self.step_fitter(),
        }
    }

    /// First-improvement (or tie) hill climbing.
    fn step_fitter(&mut self) -> bool {
        for candidate in self.generate_mutations() {
            if self.consider(candidate) {
                return true;
            }
        }
        self.done = true;
        false
    }
}

/// Lazy sequence of single-position mutations produced by
/// [`Agent::generate_mutations`].
pub struct Mutations {
    origin: Location,
    alleles: u8,
    positions: std::vec::IntoIter<usize>,
    rng: StdRng,
}

impl Iterator for Mutations {
    type Item = Location;

    fn next(&mut self) -> Option<Location> {
        let position = self.positions.next()?;
        Some(mutate_position(
            &self.origin,
            position,
            self.alleles,
            &mut self.rng,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for Mutations {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LandscapeConfig;

    /// NKq landscape where every component is pre-seeded to `value`, so every
    /// location has the same fitness.
    fn flat_landscape(n: usize, k: usize, value: f64) -> Arc<NkLandscape> {
        let landscape = NkLandscape::new(LandscapeConfig::nkq(n, k, 2), 0).unwrap();
        let width = k + 1;
        for component in 0..n {
            for code in 0..(1u64 << width) {
                let digits = Location::decode(code, width, 2);
                landscape.seed_component(component, digits.digits(), value);
            }
        }
        Arc::new(landscape)
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_new_agent_state() {
        let landscape = Arc::new(NkLandscape::new(LandscapeConfig::nk(8, 2), 1).unwrap());
        let agent = Agent::new(landscape.clone(), StepStrategy::Fitter, rng(2));
        assert_eq!(agent.location().len(), 8);
        assert_eq!(agent.fitness(), landscape.fitness(agent.location()));
        assert_eq!(agent.moves(), 0);
        assert!(!agent.is_done());
    }

    #[test]
    fn test_mutation_leaves_agent_untouched() {
        let landscape = Arc::new(NkLandscape::new(LandscapeConfig::nk(5, 2), 1).unwrap());
        let start = Location::new(vec![0, 1, 0, 1, 0]);
        let mut agent = Agent::at(landscape, start.clone(), StepStrategy::Fitter, rng(3));

        let mutated = agent.mutation(2);
        assert_eq!(mutated, Location::new(vec![0, 1, 1, 1, 0]));
        assert_eq!(agent.location(), &start);
        assert_eq!(agent.moves(), 0);
    }

    #[test]
    fn test_generate_mutations_covers_every_position() {
        let landscape = Arc::new(NkLandscape::new(LandscapeConfig::nk(6, 1), 1).unwrap());
        let start = Location::zeros(6);
        let mut agent = Agent::at(landscape, start.clone(), StepStrategy::Fitter, rng(4));

        let mutations: Vec<Location> = agent.generate_mutations().collect();
        assert_eq!(mutations.len(), 6);
        let mut flipped: Vec<usize> = mutations
            .iter()
            .map(|m| {
                assert_eq!(m.hamming_distance(&start), 1);
                m.digits().iter().position(|&d| d == 1).unwrap()
            })
            .collect();
        flipped.sort_unstable();
        assert_eq!(flipped, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_generate_mutations_order_varies() {
        let landscape = Arc::new(NkLandscape::new(LandscapeConfig::nk(12, 1), 1).unwrap());
        let mut agent = Agent::at(landscape, Location::zeros(12), StepStrategy::Fitter, rng(5));

        let orders: Vec<Vec<Location>> = (0..8)
            .map(|_| agent.generate_mutations().collect())
            .collect();
        assert!(orders.iter().any(|order| order != &orders[0]));
    }

    #[test]
    fn test_consider_accepts_equal_fitness() {
        let landscape = flat_landscape(5, 2, 0.5);
        let mut agent = Agent::at(landscape, Location::zeros(5), StepStrategy::Fitter, rng(6));
        assert_eq!(agent.fitness(), 0.5);

        for i in 0..5 {
            let next = agent.mutation(i);
            assert!(agent.consider(next.clone()));
            assert_eq!(agent.location(), &next);
            assert_eq!(agent.moves(), i + 1);
        }
    }

    #[test]
    fn test_consider_rejects_worse_and_accepts_better() {
        let landscape = NkLandscape::new(LandscapeConfig::nk(3, 0), 0).unwrap();
        landscape.seed_component(0, &[0], 0.5);
        landscape.seed_component(0, &[1], 0.2);
        landscape.seed_component(1, &[0], 0.5);
        landscape.seed_component(1, &[1], 0.9);
        landscape.seed_component(2, &[0], 0.5);
        landscape.seed_component(2, &[1], 0.5);
        let landscape = Arc::new(landscape);

        let start = Location::zeros(3);
        let mut agent = Agent::at(landscape, start.clone(), StepStrategy::Fitter, rng(7));

        assert!(!agent.consider(Location::new(vec![1, 0, 0])));
        assert_eq!(agent.location(), &start);
        assert_eq!(agent.moves(), 0);

        assert!(agent.consider(Location::new(vec![0, 1, 0])));
        assert_eq!(agent.moves(), 1);
        assert!((agent.fitness() - (0.5 + 0.9 + 0.5) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fitter_done_on_first_step_at_peak() {
        // 00000 scores 1.0 and every other sub-vector scores 0.0, so no
        // single mutation is as fit as the start.
        let landscape = NkLandscape::new(LandscapeConfig::nkq(5, 2, 2), 0).unwrap();
        for component in 0..5 {
            for code in 0..8u64 {
                let digits = Location::decode(code, 3, 2);
                let value = if code == 0 { 1.0 } else { 0.0 };
                landscape.seed_component(component, digits.digits(), value);
            }
        }
        let mut agent = Agent::at(
            Arc::new(landscape),
            Location::zeros(5),
            StepStrategy::Fitter,
            rng(8),
        );

        assert!(!agent.step());
        assert!(agent.is_done());
        assert_eq!(agent.moves(), 0);

        // Done is terminal.
        assert!(!agent.step());
        assert!(agent.is_done());
    }

    #[test]
    fn test_fitter_climbs_to_local_peak() {
        let landscape = Arc::new(NkLandscape::new(LandscapeConfig::nk(10, 3), 12).unwrap());
        let mut agent = Agent::new(landscape.clone(), StepStrategy::Fitter, rng(9));
        let start_fitness = agent.fitness();

        let mut steps = 0;
        while agent.step() {
            steps += 1;
            assert!(steps < 10_000);
        }

        assert!(agent.is_done());
        assert_eq!(agent.moves(), steps);
        assert!(agent.fitness() >= start_fitness);
        let peak = agent.location().clone();
        for position in 0..10 {
            let neighbor = peak.with_digit(position, peak.digits()[position] ^ 1);
            assert!(landscape.fitness(&neighbor) < agent.fitness());
        }
    }
}
