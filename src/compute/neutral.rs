//! Neutral networks: connected sets of equal-fitness locations.
//!
//! Locations are graph nodes identified by their integer code (see
//! [`Location::encode`]); two nodes are joined when they differ in exactly one
//! position. A full survey enumerates all `A^N` locations, which bounds the
//! practical size of `N`: more than `2^MAX_ENUMERATION_BITS` locations is
//! refused rather than sampled.

use std::collections::{BTreeMap, HashMap};

use super::landscape::NkLandscape;
use super::location::{Location, codes_adjacent, neighbor_codes, space_size};
use crate::schema::NeutralNetworkReport;

/// Largest enumerable search space, as a power of two.
pub const MAX_ENUMERATION_BITS: u32 = 24;

/// Neutral network errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NeutralError {
    #[error(
        "Search space of {alleles}^{n} locations exceeds the enumeration limit of 2^{}",
        MAX_ENUMERATION_BITS
    )]
    SpaceTooLarge { n: usize, alleles: u8 },
}

/// Graph over locations of one fitness level, with edges between locations
/// at Hamming distance 1.
///
/// Connectivity is tracked with a union-find forest while nodes are added.
#[derive(Debug, Clone)]
pub struct NeutralNetworkGraph {
    n: usize,
    alleles: u8,
    locations: u64,
    nodes: Vec<u64>,
    index: HashMap<u64, usize>,
    edges: Vec<(u64, u64)>,
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl NeutralNetworkGraph {
    /// Empty graph for locations of length `n` over `alleles` digits.
    pub fn new(n: usize, alleles: u8) -> Result<Self, NeutralError> {
        match space_size(n, alleles) {
            Some(locations) if locations <= 1u64 << MAX_ENUMERATION_BITS => Ok(Self {
                n,
                alleles,
                locations,
                nodes: Vec::new(),
                index: HashMap::new(),
                edges: Vec::new(),
                parent: Vec::new(),
                size: Vec::new(),
            }),
            _ => Err(NeutralError::SpaceTooLarge { n, alleles }),
        }
    }

    /// Add `location`. Returns false if it was already present or is not a
    /// location of this graph's space.
    pub fn add(&mut self, location: &Location) -> bool {
        if !location.is_valid(self.n, self.alleles) {
            return false;
        }
        self.add_code(location.encode(self.alleles))
    }

    /// Add the location with code `code`, linking it to every present node
    /// one mutation away. Returns false if it was already present or
    /// `code >= alleles^n`.
    pub fn add_code(&mut self, code: u64) -> bool {
        if code >= self.locations || self.index.contains_key(&code) {
            return false;
        }

        let slot = self.nodes.len();
        self.nodes.push(code);
        self.index.insert(code, slot);
        self.parent.push(slot);
        self.size.push(1);

        // Probing the A-1 alternatives per position finds exactly the present
        // nodes at distance 1 without scanning the whole graph.
        for neighbor in neighbor_codes(code, self.n, self.alleles) {
            if let Some(&other) = self.index.get(&neighbor) {
                debug_assert!(codes_adjacent(code, neighbor, self.n, self.alleles));
                self.edges.push((code.min(neighbor), code.max(neighbor)));
                self.union(slot, other);
            }
        }
        true
    }

    pub fn contains(&self, code: u64) -> bool {
        self.index.contains_key(&code)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node codes in insertion order.
    pub fn nodes(&self) -> &[u64] {
        &self.nodes
    }

    /// Edges as `(smaller code, larger code)`.
    pub fn edges(&self) -> &[(u64, u64)] {
        &self.edges
    }

    /// Number of locations in the space this graph draws from.
    pub fn space_size(&self) -> u64 {
        self.locations
    }

    /// True if `a` and `b` are joined by an edge.
    ///
    /// Every pair of present nodes one mutation apart is joined, so this
    /// never looks at the edge list.
    pub fn has_edge(&self, a: u64, b: u64) -> bool {
        self.contains(a) && self.contains(b) && codes_adjacent(a, b, self.n, self.alleles)
    }

    /// Connected components, each listing node codes in insertion order.
    pub fn components(&self) -> Vec<Vec<u64>> {
        let mut by_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<u64>> = Vec::new();
        for (slot, &code) in self.nodes.iter().enumerate() {
            let root = self.root(slot);
            let component = *by_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[component].push(code);
        }
        components
    }

    /// Size of every component, in no particular order.
    pub fn component_sizes(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&slot| self.parent[slot] == slot)
            .map(|root| self.size[root])
            .collect()
    }

    fn root(&self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            slot = self.parent[slot];
        }
        slot
    }

    fn find(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            // Path halving.
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

/// Neutral networks of every fitness level of a fully enumerated landscape.
#[derive(Debug, Clone)]
pub struct NeutralNetworkSurvey {
    total_locations: u64,
    /// Keyed by the bit pattern of the fitness value. Fitness is never
    /// negative, so bit order matches numeric order.
    levels: BTreeMap<u64, NeutralNetworkGraph>,
}

impl NeutralNetworkSurvey {
    /// Evaluate every location of `landscape` and group equal-fitness
    /// locations into graphs.
    ///
    /// Every evaluation goes through the landscape cache, so this also fills
    /// in the whole landscape. Evaluation order is the code order, which keeps
    /// seeded landscapes reproducible.
    pub fn enumerate(landscape: &NkLandscape) -> Result<Self, NeutralError> {
        let (n, alleles) = (landscape.n(), landscape.alleles());
        // Validates the enumeration limit before any work is done.
        let template = NeutralNetworkGraph::new(n, alleles)?;
        let total_locations = space_size(n, alleles).unwrap_or_default();
        log::info!("enumerating {total_locations} locations (N={n}, A={alleles})");

        let mut levels: BTreeMap<u64, NeutralNetworkGraph> = BTreeMap::new();
        for code in 0..total_locations {
            let fitness = landscape.fitness(&Location::decode(code, n, alleles));
            levels
                .entry(fitness.to_bits())
                .or_insert_with(|| template.clone())
                .add_code(code);
        }

        let survey = Self {
            total_locations,
            levels,
        };
        log::info!(
            "found {} fitness levels and {} neutral networks",
            survey.levels.len(),
            survey.component_sizes().len()
        );
        Ok(survey)
    }

    /// Number of locations enumerated.
    pub fn total_locations(&self) -> u64 {
        self.total_locations
    }

    /// Number of distinct fitness values.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Graph per fitness value, ascending by fitness.
    pub fn levels(&self) -> impl Iterator<Item = (f64, &NeutralNetworkGraph)> {
        self.levels
            .iter()
            .map(|(&bits, graph)| (f64::from_bits(bits), graph))
    }

    /// Graph for an exact fitness value.
    pub fn level(&self, fitness: f64) -> Option<&NeutralNetworkGraph> {
        self.levels.get(&fitness.to_bits())
    }

    /// Sizes of all neutral networks across all fitness levels.
    pub fn component_sizes(&self) -> Vec<usize> {
        self.levels
            .values()
            .flat_map(NeutralNetworkGraph::component_sizes)
            .collect()
    }

    /// Mean neutral network size.
    pub fn mean_component_size(&self) -> f64 {
        let sizes = self.component_sizes();
        if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
        }
    }

    /// Share of locations in networks strictly larger than the mean size.
    pub fn common_fraction(&self) -> f64 {
        if self.total_locations == 0 {
            return 0.0;
        }
        let mean = self.mean_component_size();
        let common: usize = self
            .component_sizes()
            .into_iter()
            .filter(|&size| size as f64 > mean)
            .sum();
        common as f64 / self.total_locations as f64
    }

    /// Summary values for reporting.
    pub fn report(&self) -> NeutralNetworkReport {
        let mut component_sizes = self.component_sizes();
        component_sizes.sort_unstable_by(|a, b| b.cmp(a));
        NeutralNetworkReport {
            total_locations: self.total_locations,
            fitness_levels: self.levels.len(),
            component_sizes,
            mean_component_size: self.mean_component_size(),
            common_fraction: self.common_fraction(),
        }
    }
}
