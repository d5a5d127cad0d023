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

//! Contains the [`Gaussian`] distribution.
use std::f64::consts::PI;
use std::fmt;
use std::ops::Add;
use std::path::Path;

use statrs::distribution::Normal;
use statrs::statistics::Statistics;

use crate::distribution::{Distribution, Model};
use crate::error::{Error, Result};

/// A normal distribution N(μ, σ²) estimated from a dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gaussian(Distribution);

impl Gaussian {
    /// Constructs a Gaussian with mean `mean` and standard deviation `stdev` and no observations.
    #[must_use]
    pub fn new(mean: f64, stdev: f64) -> Self {
        Self(Distribution::new(mean, stdev))
    }

    /// Constructs a Gaussian from `samples`, with the parameters estimated from them.
    ///
    /// `sample` has the same meaning as in [`Model::calculate_stdev`].
    ///
    /// # Errors
    /// Same as [`Model::calculate_stdev`].
    pub fn fit(samples: &[f64], sample: bool) -> Result<Self> {
        let mut gaussian = Self::default();
        gaussian.0.set_data(samples.to_vec());
        gaussian.calculate_stdev(sample)?;
        Ok(gaussian)
    }

    /// The mean μ.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.0.mean()
    }

    /// The standard deviation σ.
    #[must_use]
    pub fn stdev(&self) -> f64 {
        self.0.stdev()
    }

    /// The observations in file order.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        self.0.data()
    }

    /// Reads the observations from `path` like [`Distribution::read_data_file`] and then
    /// recomputes the mean and the standard deviation from them.
    ///
    /// # Errors
    /// The errors of [`Distribution::read_data_file`] and [`Model::calculate_stdev`].
    ///
    /// A failed read leaves the observations and the parameters unchanged. A failed
    /// recomputation does not: the new observations are kept, and the mean and the standard
    /// deviation are left as far as they got. An empty file keeps the old parameters, and a
    /// single observation with `sample` set updates the mean but keeps the old standard deviation.
    pub fn read_data_file<P: AsRef<Path>>(&mut self, path: P, sample: bool) -> Result<()> {
        self.0.read_data_file(path)?;
        self.calculate_stdev(sample)?;
        Ok(())
    }

    /// Returns the distribution of the sum of two independent Gaussian random variables.
    ///
    /// The observations of `a` and `b` are not carried over.
    #[must_use]
    pub fn combine_independent(a: &Gaussian, b: &Gaussian) -> Gaussian {
        Gaussian::new(
            a.mean() + b.mean(),
            f64::hypot(a.stdev(), b.stdev()),
        )
    }

    /// Returns the same text as the [`Display`](fmt::Display) implementation.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Converts into [`statrs`]' normal distribution.
    ///
    /// # Errors
    /// [`Error::DegenerateDistribution`] if the standard deviation is not positive.
    pub fn to_normal(&self) -> Result<Normal> {
        self.check_stdev()?;
        Normal::new(self.mean(), self.stdev()).map_err(|_| Error::DegenerateDistribution {
            stdev: self.stdev(),
        })
    }

    fn check_stdev(&self) -> Result<()> {
        let stdev = self.stdev();
        if stdev.is_finite() && stdev > 0.0 {
            Ok(())
        } else {
            Err(Error::DegenerateDistribution { stdev })
        }
    }
}

impl Model for Gaussian {
    fn distribution(&self) -> &Distribution {
        &self.0
    }

    fn distribution_mut(&mut self) -> &mut Distribution {
        &mut self.0
    }

    /// `pdf(x) = 1/(σ√(2π)) · exp(-((x-μ)/σ)²/2)`
    fn pdf(&self, x: f64) -> Result<f64> {
        self.check_stdev()?;
        let z = (x - self.mean()) / self.stdev();
        Ok((-0.5 * z * z).exp() / (self.stdev() * (2.0 * PI).sqrt()))
    }

    fn calculate_mean(&mut self) -> Result<f64> {
        let data = self.0.data();
        if data.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let mean = Statistics::mean(data);
        tracing::trace!(mean, "recomputed mean");
        self.0.set_mean(mean);
        Ok(mean)
    }

    /// Always re-derives the mean from the current observations first, so the stored mean is
    /// refreshed as well.
    fn calculate_stdev(&mut self, sample: bool) -> Result<f64> {
        self.calculate_mean()?;
        let data = self.0.data();
        if sample && data.len() < 2 {
            return Err(Error::InvalidArgument(
                "the sample standard deviation needs at least two observations".to_string(),
            ));
        }
        let stdev = if sample {
            Statistics::std_dev(data)
        } else {
            Statistics::population_std_dev(data)
        };
        tracing::trace!(stdev, sample, "recomputed standard deviation");
        self.0.set_stdev(stdev);
        Ok(stdev)
    }
}

impl Add for &Gaussian {
    type Output = Gaussian;

    fn add(self, other: &Gaussian) -> Gaussian {
        Gaussian::combine_independent(self, other)
    }
}

impl Add for Gaussian {
    type Output = Gaussian;

    fn add(self, other: Gaussian) -> Gaussian {
        Gaussian::combine_independent(&self, &other)
    }
}

impl fmt::Display for Gaussian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean {}, standard deviation {}",
            self.mean(),
            self.stdev()
        )
    }
}

impl rand::distributions::Distribution<f64> for Gaussian {
    /// Draws a value from N(μ, σ²). A Gaussian with a non-positive σ always yields μ.
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.to_normal() {
            Ok(normal) => rand::distributions::Distribution::sample(&normal, rng),
            Err(_) => self.mean(),
        }
    }
}
