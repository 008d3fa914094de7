use super::element::{AtomElement, IMPORTANT_ELEMENTS};
use super::residue::Residue;
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Atom counts bucketed by a key (element or residue kind).
///
/// `total_count()` always equals the sum of the per-key counts. Compositions
/// merge term-wise with `+`, which is associative and commutative, so subunits
/// or whole proteins can be combined in any order for aggregate summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition<K: Ord + Copy> {
    counts: BTreeMap<K, usize>,
    total_count: usize,
}

pub type ElementComposition = Composition<AtomElement>;
pub type ResidueComposition = Composition<Residue>;

impl<K: Ord + Copy> Default for Composition<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total_count: 0,
        }
    }
}

impl<K: Ord + Copy> Composition<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K) {
        self.insert_many(key, 1);
    }

    pub fn insert_many(&mut self, key: K, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry(key).or_insert(0) += count;
        self.total_count += count;
    }

    pub fn count(&self, key: K) -> usize {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Non-zero counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        self.counts.iter().map(|(key, count)| (*key, *count))
    }
}

impl ElementComposition {
    pub fn carbon_count(&self) -> usize {
        self.count(AtomElement::Carbon)
    }

    pub fn nitrogen_count(&self) -> usize {
        self.count(AtomElement::Nitrogen)
    }

    pub fn hydrogen_count(&self) -> usize {
        self.count(AtomElement::Hydrogen)
    }

    pub fn oxygen_count(&self) -> usize {
        self.count(AtomElement::Oxygen)
    }

    pub fn sulfur_count(&self) -> usize {
        self.count(AtomElement::Sulfur)
    }

    /// Atoms of the elements listed in [`IMPORTANT_ELEMENTS`].
    pub fn important_element_count(&self) -> usize {
        IMPORTANT_ELEMENTS.iter().map(|e| self.count(*e)).sum()
    }

    /// Atoms outside of [`IMPORTANT_ELEMENTS`], including unknown ones.
    pub fn other_element_count(&self) -> usize {
        self.total_count - self.important_element_count()
    }
}

impl<K: Ord + Copy> FromIterator<K> for Composition<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut composition = Self::new();
        for key in iter {
            composition.insert(key);
        }
        composition
    }
}

impl<K: Ord + Copy> AddAssign<&Composition<K>> for Composition<K> {
    fn add_assign(&mut self, rhs: &Composition<K>) {
        for (key, count) in rhs.iter() {
            self.insert_many(key, count);
        }
    }
}

impl<K: Ord + Copy> AddAssign for Composition<K> {
    fn add_assign(&mut self, rhs: Composition<K>) {
        *self += &rhs;
    }
}

impl<K: Ord + Copy> Add for Composition<K> {
    type Output = Composition<K>;

    fn add(mut self, rhs: Composition<K>) -> Self::Output {
        self += &rhs;
        self
    }
}

impl<K: Ord + Copy> Sum for Composition<K> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), |acc, next| acc + next)
    }
}

impl<'a, K: Ord + Copy + 'a> Sum<&'a Composition<K>> for Composition<K> {
    fn sum<I: Iterator<Item = &'a Composition<K>>>(iter: I) -> Self {
        iter.fold(Self::new(), |mut acc, next| {
            acc += next;
            acc
        })
    }
}
