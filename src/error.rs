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

//! Contains the [`Error`] type returned by every fallible operation of the crate.
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, summarizing or plotting a distribution.
#[derive(Debug, Error)]
pub enum Error {
    /// The data file could not be opened or read.
    #[error("cannot read data file {}: {source}", path.display())]
    Io {
        /// Path of the data file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// A line of the data file is not a number.
    #[error("{}:{line}: cannot parse {content:?} as a number", path.display())]
    Parse {
        /// Path of the data file.
        path: PathBuf,
        /// 1-based number of the offending line.
        line: usize,
        /// The offending line with surrounding whitespace removed.
        content: String,
    },
    /// A statistic or a plot was requested for a distribution without observations.
    #[error("the dataset is empty")]
    EmptyDataset,
    /// The standard deviation is not a positive finite number.
    #[error("standard deviation must be positive and finite, got {stdev}")]
    DegenerateDistribution {
        /// The offending standard deviation.
        stdev: f64,
    },
    /// The binomial coefficient does not fit into `f64`.
    #[error("binomial coefficient C({n}, {k}) overflows")]
    Overflow {
        /// Total number of trials.
        n: u64,
        /// Chosen number of trials.
        k: u64,
    },
    /// A plotting backend failed to draw or save the figure.
    #[error("cannot render plot: {0}")]
    Render(String),
    /// An argument is outside of its domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
