use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::constants::PERCENTILE_BIN_EDGES;

/// Fixed histogram bin edges over `[0, 1]`.
///
/// Bins are half-open `[e_i, e_{i+1})` except the last, which also includes
/// its right edge. Values outside `[e_0, e_last]` are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    mode: BinMode,
    edges: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinMode {
    Even(usize),
    Percentile,
}

impl BinEdges {
    /// `n` equal-width bins: edges `0, 1/n, ..., (n-1)/n, 1`.
    pub fn even(n: usize) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::ZeroSize { name: "bins" });
        }
        let mut edges: Vec<f32> = (0..n).map(|i| i as f32 / n as f32).collect();
        edges.push(1.0);
        Ok(Self {
            mode: BinMode::Even(n),
            edges,
        })
    }

    /// The hand-tuned percentile edge set.
    pub fn percentile() -> Self {
        Self {
            mode: BinMode::Percentile,
            edges: PERCENTILE_BIN_EDGES.to_vec(),
        }
    }

    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin index of `value`, or `None` when it falls outside the edges.
    pub fn bin_of(&self, value: f32) -> Option<usize> {
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if !(first..=last).contains(&value) {
            return None;
        }
        if value == last {
            return Some(self.n_bins() - 1);
        }
        Some(self.edges.partition_point(|&edge| edge <= value) - 1)
    }

    /// Adds the counts of `values` into `counts` (length [`BinEdges::n_bins`]).
    pub fn accumulate<I>(&self, values: I, counts: &mut [f32])
    where
        I: IntoIterator<Item = f32>,
    {
        for value in values {
            if let Some(bin) = self.bin_of(value) {
                counts[bin] += 1.0;
            }
        }
    }
}

impl fmt::Display for BinEdges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            BinMode::Even(n) => write!(f, "even{n}"),
            BinMode::Percentile => f.write_str("percentile"),
        }
    }
}

impl FromStr for BinEdges {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidBins {
            value: s.to_string(),
        };
        let value = s.trim();

        if value == "percentile" {
            return Ok(Self::percentile());
        }

        let n = value
            .strip_prefix("even")
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .ok_or_else(invalid)?;
        Self::even(n)
    }
}
