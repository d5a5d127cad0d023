// Copyright 2024 Vladimir Kharchev

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Contains the [`Distribution`] struct shared by every distribution kind and the [`Model`]
//! trait describing what a distribution kind has to provide.
//!
//! [`Distribution`] only stores the parameters and the observations. The statistics are
//! calculated by the implementors of [`Model`], such as [`Gaussian`](crate::Gaussian).
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use statrs::function::factorial;
use tracing::{instrument, Level};

use crate::error::{Error, Result};

/// The parameters of a probability distribution together with the observations they were
/// calculated from.
///
/// `mean` and `stdev` are not kept in sync with `data`. They are refreshed only by the
/// recomputing methods of [`Model`].
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    mean: f64,
    stdev: f64,
    data: Vec<f64>,
}

impl Distribution {
    /// The mean of [`Distribution::default`].
    pub const DEFAULT_MEAN: f64 = 0.0;
    /// The standard deviation of [`Distribution::default`].
    pub const DEFAULT_STDEV: f64 = 1.0;

    /// Constructs a distribution with the given parameters and no observations.
    #[must_use]
    pub fn new(mean: f64, stdev: f64) -> Self {
        Self {
            mean,
            stdev,
            data: Vec::new(),
        }
    }

    /// The mean of the distribution.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// The standard deviation of the distribution.
    #[must_use]
    pub fn stdev(&self) -> f64 {
        self.stdev
    }

    /// The observations in the order they were loaded.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Overrides the mean without touching the observations.
    pub fn set_mean(&mut self, mean: f64) {
        self.mean = mean;
    }

    /// Overrides the standard deviation without touching the observations.
    pub fn set_stdev(&mut self, stdev: f64) {
        self.stdev = stdev;
    }

    /// Replaces all observations. `mean` and `stdev` are left unchanged.
    pub fn set_data(&mut self, data: Vec<f64>) {
        self.data = data;
    }

    /// Returns the number of ways to choose `k` out of `n` trials.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `k > n` and [`Error::Overflow`] if the coefficient is too
    /// large for `f64`.
    pub fn n_choose_k(n: u64, k: u64) -> Result<f64> {
        if k > n {
            return Err(Error::InvalidArgument(format!(
                "cannot choose {k} out of {n} trials"
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let coefficient = match exact_binomial(n, k) {
            Some(exact) => exact as f64,
            // Beyond 170! the factorials are infinite and the ratio is not finite.
            None => {
                factorial::factorial(n) / factorial::factorial(k) / factorial::factorial(n - k)
            }
        };
        if !coefficient.is_finite() {
            return Err(Error::Overflow { n, k });
        }
        Ok(coefficient)
    }

    /// Replaces the observations with the numbers read from `path`, one per line.
    ///
    /// Blank lines are skipped. `mean` and `stdev` are left unchanged, see
    /// [`Gaussian::read_data_file`](crate::Gaussian::read_data_file) for a version that
    /// recomputes them.
    ///
    /// # Errors
    /// [`Error::Io`] if the file can't be read and [`Error::Parse`] if a line is not a number.
    /// The observations are not modified when an error is returned.
    #[instrument(level = Level::DEBUG, skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn read_data_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let reader = BufReader::new(File::open(path).map_err(io_error)?);

        let mut data = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(io_error)?;
            let content = line.trim();
            if content.is_empty() {
                continue;
            }
            let value = content.parse::<f64>().map_err(|_| Error::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                content: content.to_string(),
            })?;
            data.push(value);
        }

        tracing::debug!("loaded {} observations", data.len());
        self.data = data;
        Ok(())
    }
}

/// `C(n, k)` in integer arithmetic, `None` if an intermediate product overflows.
fn exact_binomial(n: u64, k: u64) -> Option<u128> {
    let k = k.min(n - k);
    // After step `i` the accumulator holds C(n - k + i, i), so every division is exact.
    (1..=k).try_fold(1_u128, |acc, i| {
        acc.checked_mul(u128::from(n - k + i))
            .map(|product| product / u128::from(i))
    })
}

impl Default for Distribution {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MEAN, Self::DEFAULT_STDEV)
    }
}

/// A kind of probability distribution backed by a [`Distribution`].
///
/// Implementors define how the parameters are estimated from the observations and how the
/// density is evaluated. The plotting functions in [`plot`](crate::plot) work with any
/// implementor.
pub trait Model {
    /// The underlying parameters and observations.
    fn distribution(&self) -> &Distribution;

    /// Mutable access to the underlying parameters and observations.
    fn distribution_mut(&mut self) -> &mut Distribution;

    /// Evaluates the probability density function at `x`.
    ///
    /// # Errors
    /// Implementors return an error when the parameters don't describe a valid distribution.
    fn pdf(&self, x: f64) -> Result<f64>;

    /// Estimates the mean from the observations, stores it and returns it.
    ///
    /// # Errors
    /// [`Error::EmptyDataset`] if there are no observations.
    fn calculate_mean(&mut self) -> Result<f64>;

    /// Estimates the standard deviation from the observations, stores it and returns it.
    ///
    /// `sample` selects between the sample (`n - 1`) and the population (`n`) estimate.
    ///
    /// # Errors
    /// [`Error::EmptyDataset`] if there are no observations.
    fn calculate_stdev(&mut self, sample: bool) -> Result<f64>;
}
