//! Fixed-size measurement snapshots.

use serde::{Deserialize, Serialize};

use crate::record::pattern::Pattern;
use crate::schema::catalog::{IPVS_OUTPUT_LEN, OUTPUT_LEN, flatten_index, ipvs_index};

/// One complete snapshot for a zone (Normal) or (zone, sequence) pair (HVI).
///
/// Always holds exactly [`OUTPUT_LEN`] patterns, stored WAD-major. Reads past
/// the end yield [`Pattern::PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Pattern>", into = "Vec<Pattern>")]
pub struct Output {
    data: Vec<Pattern>,
}

impl Output {
    /// Build from acquisition data, padding with placeholders or truncating.
    #[must_use]
    pub fn from_patterns(mut data: Vec<Pattern>) -> Self {
        data.resize(OUTPUT_LEN, Pattern::PLACEHOLDER);
        Self { data }
    }

    /// Snapshot where every cell is the placeholder.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_patterns(Vec::new())
    }

    /// Pattern at flat index `index`, or the placeholder.
    #[must_use]
    pub fn get(&self, index: usize) -> Pattern {
        self.data
            .get(index)
            .copied()
            .unwrap_or(Pattern::PLACEHOLDER)
    }

    /// Pattern at (`wad`, `pattern`), or the placeholder when out of range.
    #[must_use]
    pub fn cell(&self, wad: usize, pattern: usize) -> Pattern {
        if pattern >= crate::schema::catalog::PATTERN_COUNT {
            return Pattern::PLACEHOLDER;
        }
        self.get(flatten_index(wad, pattern))
    }

    /// Replace the pattern at (`wad`, `pattern`); ignored when out of range.
    pub fn set_cell(&mut self, wad: usize, pattern: usize, value: Pattern) {
        if pattern >= crate::schema::catalog::PATTERN_COUNT {
            return;
        }
        if let Some(slot) = self.data.get_mut(flatten_index(wad, pattern)) {
            *slot = value;
        }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.data
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Pattern>> for Output {
    fn from(value: Vec<Pattern>) -> Self {
        Self::from_patterns(value)
    }
}

impl From<Output> for Vec<Pattern> {
    fn from(value: Output) -> Self {
        value.data
    }
}

/// IPVS snapshot: 10 points at each of the 7 WADs, stored WAD-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Pattern>", into = "Vec<Pattern>")]
pub struct IpvsOutput {
    data: Vec<Pattern>,
}

impl IpvsOutput {
    #[must_use]
    pub fn from_patterns(mut data: Vec<Pattern>) -> Self {
        data.resize(IPVS_OUTPUT_LEN, Pattern::PLACEHOLDER);
        Self { data }
    }

    /// Pattern at (`wad`, `point`), or the placeholder when out of range.
    #[must_use]
    pub fn cell(&self, wad: usize, point: usize) -> Pattern {
        if point >= crate::schema::catalog::IPVS_POINT_COUNT {
            return Pattern::PLACEHOLDER;
        }
        self.data
            .get(ipvs_index(wad, point))
            .copied()
            .unwrap_or(Pattern::PLACEHOLDER)
    }
}

impl From<Vec<Pattern>> for IpvsOutput {
    fn from(value: Vec<Pattern>) -> Self {
        Self::from_patterns(value)
    }
}

impl From<IpvsOutput> for Vec<Pattern> {
    fn from(value: IpvsOutput) -> Self {
        value.data
    }
}
