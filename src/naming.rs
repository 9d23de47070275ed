//! Country names and populations
//!
//! Both draw from the generator's seeded RNG so a fixed seed reproduces the
//! same names in the same order.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

const PREFIXES: [&str; 9] = [
    "North", "South", "East", "West", "New", "Great", "Upper", "Lower", "Central",
];

const ROOTS: [&str; 10] = [
    "Albion", "Veridia", "Eldoria", "Nord", "Sylvania", "Karth", "Zephyr", "Mor", "Tal", "Vor",
];

// "ia" is listed twice to double its weight
const SUFFIXES: [&str; 9] = ["ia", "land", "ia", "stan", "burg", "dale", "wood", "mere", "fell"];

/// Random draws before a clashing name gets a numeric suffix
const MAX_REDRAWS: usize = 32;

/// How a name is put together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameForm {
    /// Root and suffix, e.g. "Nordland"
    Simple,
    /// Root, the tail of a second root, and a suffix, e.g. "Karthvoria"
    Compound,
    /// Prefix word, then root and suffix, e.g. "Upper Taldale"
    Prefixed,
}

impl NameForm {
    const ALL: [NameForm; 3] = [NameForm::Simple, NameForm::Compound, NameForm::Prefixed];
}

/// Produces country names that are unique within one world
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    used: HashSet<String>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of names handed out so far
    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Draw a fresh name
    ///
    /// Redraws on collision a bounded number of times, then appends the
    /// smallest free number ("Nordia 2", "Nordia 3", ...).
    pub fn next_name<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        let mut candidate = random_name(rng);
        for _ in 0..MAX_REDRAWS {
            if !self.used.contains(&candidate) {
                break;
            }
            candidate = random_name(rng);
        }

        if self.used.contains(&candidate) {
            let base = candidate;
            let mut n = 2;
            candidate = format!("{} {}", base, n);
            while self.used.contains(&candidate) {
                n += 1;
                candidate = format!("{} {}", base, n);
            }
        }

        self.used.insert(candidate.clone());
        candidate
    }
}

/// One name in a random form; may repeat across calls
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let form = *NameForm::ALL.choose(rng).unwrap_or(&NameForm::Simple);
    compose_name(form, rng)
}

/// One name in the given form
pub fn compose_name<R: Rng + ?Sized>(form: NameForm, rng: &mut R) -> String {
    match form {
        NameForm::Simple => {
            let root = pick(&ROOTS, rng);
            let suffix = pick(&SUFFIXES, rng);
            format!("{}{}", root, suffix)
        }
        NameForm::Compound => {
            let root = pick(&ROOTS, rng);
            let second = pick(&ROOTS, rng);
            let tail = &second[second.len().saturating_sub(3)..];
            let suffix = pick(&SUFFIXES, rng);
            format!("{}{}{}", root, tail, suffix)
        }
        NameForm::Prefixed => {
            let prefix = pick(&PREFIXES, rng);
            let root = pick(&ROOTS, rng);
            let suffix = pick(&SUFFIXES, rng);
            format!("{} {}{}", prefix, root, suffix)
        }
    }
}

fn pick<R: Rng + ?Sized>(table: &[&'static str], rng: &mut R) -> &'static str {
    table.choose(rng).copied().unwrap_or("")
}

/// Population size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PopulationBand {
    Small,
    Medium,
    Large,
}

impl PopulationBand {
    /// Weighted draw table: small 3/6, medium 2/6, large 1/6
    const WEIGHTED: [PopulationBand; 6] = [
        PopulationBand::Small,
        PopulationBand::Medium,
        PopulationBand::Large,
        PopulationBand::Small,
        PopulationBand::Small,
        PopulationBand::Medium,
    ];

    /// Inclusive population range of the band
    pub fn range(self) -> (u64, u64) {
        match self {
            PopulationBand::Small => (50_000, 2_000_000),
            PopulationBand::Medium => (2_000_000, 15_000_000),
            PopulationBand::Large => (15_000_000, 100_000_000),
        }
    }
}

/// Draw a population from a weighted size band
pub fn random_population<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    let band = *PopulationBand::WEIGHTED.choose(rng).unwrap_or(&PopulationBand::Small);
    let (lo, hi) = band.range();
    rng.gen_range(lo..=hi)
}
