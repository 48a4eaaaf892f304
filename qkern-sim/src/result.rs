//! Sampling and observation result types

use ahash::AHashMap;
use qkern_state::PauliTerm;
use std::fmt;

use crate::statistics::ExecutionStatistics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Histogram of measured bitstrings
///
/// Bitstrings list measured bits in measurement order, first measured bit
/// leftmost. Counts sum to the number of successful shots. Iteration follows
/// the order in which outcomes were first observed (by shot index, so it is
/// the same for sequential and parallel runs).
///
/// # Example
/// ```
/// use qkern_sim::SampleResult;
///
/// let counts = SampleResult::from_counts([("00", 9960), ("11", 40)]);
/// assert_eq!(counts.most_probable(), Some("00"));
/// assert_eq!(counts.total_shots(), 10000);
/// assert_eq!(counts.to_string(), "{ 00:9960 11:40 }");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleResult {
    counts: AHashMap<String, usize>,
    order: Vec<String>,
    failed_shots: usize,
    statistics: Option<ExecutionStatistics>,
}

impl SampleResult {
    /// Create from `(bitstring, count)` pairs; iteration order is input order
    ///
    /// Repeated bitstrings are added together.
    pub fn from_counts<S: Into<String>>(counts: impl IntoIterator<Item = (S, usize)>) -> Self {
        let mut result = Self::default();
        for (bits, count) in counts {
            result.add(bits.into(), count);
        }
        result
    }

    pub(crate) fn add(&mut self, bits: String, count: usize) {
        match self.counts.get_mut(&bits) {
            Some(existing) => *existing += count,
            None => {
                self.order.push(bits.clone());
                self.counts.insert(bits, count);
            }
        }
    }

    pub(crate) fn with_failed_shots(mut self, failed: usize) -> Self {
        self.failed_shots = failed;
        self
    }

    pub(crate) fn with_statistics(mut self, stats: ExecutionStatistics) -> Self {
        self.statistics = Some(stats);
        self
    }

    /// The outcome with the highest count; ties go to the first observed
    pub fn most_probable(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (bits, count) in self.iter() {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((bits, count));
            }
        }
        best.map(|(bits, _)| bits)
    }

    /// Count for a bitstring (0 if never observed)
    pub fn count(&self, bits: &str) -> usize {
        self.counts.get(bits).copied().unwrap_or(0)
    }

    /// Relative frequency of a bitstring among successful shots
    pub fn probability(&self, bits: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            0.0
        } else {
            self.count(bits) as f64 / total as f64
        }
    }

    /// `(bitstring, count)` in first-observed order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order.iter().map(move |bits| (bits.as_str(), self.count(bits)))
    }

    /// Number of distinct outcomes
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Successful shots
    pub fn total_shots(&self) -> usize {
        self.counts.values().sum()
    }

    /// Shots that ended in a recoverable error
    pub fn failed_shots(&self) -> usize {
        self.failed_shots
    }

    /// Statistics, if the simulator collected them
    pub fn statistics(&self) -> Option<&ExecutionStatistics> {
        self.statistics.as_ref()
    }

    /// Histogram restricted to the given bit positions, in the given order
    ///
    /// Positions past the end of a bitstring are skipped.
    pub fn marginal(&self, positions: &[usize]) -> SampleResult {
        let mut out = SampleResult::default();
        for (bits, count) in self.iter() {
            let raw = bits.as_bytes();
            let reduced: String = positions
                .iter()
                .filter_map(|&p| raw.get(p).map(|&b| b as char))
                .collect();
            out.add(reduced, count);
        }
        out.failed_shots = self.failed_shots;
        out
    }

    /// Average parity `⟨Z⊗…⊗Z⟩` over all measured bits
    pub fn expectation_z(&self) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        let signed: i64 = self
            .iter()
            .map(|(bits, count)| {
                let ones = bits.bytes().filter(|&b| b == b'1').count();
                if ones % 2 == 0 {
                    count as i64
                } else {
                    -(count as i64)
                }
            })
            .sum();
        signed as f64 / total as f64
    }
}

impl<'a> IntoIterator for &'a SampleResult {
    type Item = (&'a str, usize);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, usize)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Outcomes in lexicographic order
impl fmt::Display for SampleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.order.iter().collect();
        keys.sort();
        write!(f, "{{ ")?;
        for bits in keys {
            write!(f, "{}:{} ", bits, self.count(bits))?;
        }
        write!(f, "}}")
    }
}

/// Expectation value of a Hamiltonian together with its per-term parts
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObserveResult {
    expectation: f64,
    terms: Vec<TermExpectation>,
    shots: Option<usize>,
}

/// One term of an [`ObserveResult`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TermExpectation {
    /// The term, with its coefficient
    pub term: PauliTerm,
    /// `⟨P⟩` of the bare Pauli product
    pub value: f64,
}

impl ObserveResult {
    pub(crate) fn new(expectation: f64, terms: Vec<TermExpectation>, shots: Option<usize>) -> Self {
        Self {
            expectation,
            terms,
            shots,
        }
    }

    /// `⟨H⟩`
    pub fn expectation(&self) -> f64 {
        self.expectation
    }

    /// Per-term values in Hamiltonian order
    pub fn terms(&self) -> &[TermExpectation] {
        &self.terms
    }

    /// `⟨P_k⟩` of the k-th term
    pub fn term_expectation(&self, index: usize) -> Option<f64> {
        self.terms.get(index).map(|t| t.value)
    }

    /// Number of terms
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Shots per term when estimated by sampling
    pub fn shots(&self) -> Option<usize> {
        self.shots
    }
}

impl fmt::Display for ObserveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⟨H⟩ = {:.6}", self.expectation)?;
        if let Some(shots) = self.shots {
            write!(f, " ({} shots per term)", shots)?;
        }
        Ok(())
    }
}
