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

//! A small library for describing a dataset by a Gaussian distribution.
//!
//! The observations are read from a text file with one number per line. [`Gaussian`] estimates
//! the mean and the standard deviation from them, evaluates the density of the resulting normal
//! distribution and can combine two independent Gaussians into the distribution of their sum.
//! The module [`plot`] draws the observations next to the fitted density.
//!
//! # Examples
//!
//! Let's assume that the file `numbers.txt` contains the measurements 1, 2, 3 and 4, one per
//! line.
//! ```
//! use std::io::Write;
//! use gauss_toy::{Gaussian, Model};
//!
//! # let mut file = tempfile::NamedTempFile::new().unwrap();
//! # writeln!(file, "1\n2\n3\n4").unwrap();
//! # let path = file.path();
//! let mut gaussian = Gaussian::default();
//! // Reading the file recomputes the parameters using the sample standard deviation
//! gaussian.read_data_file(path, true).unwrap();
//! assert_eq!(gaussian.mean(), 2.5);
//! assert!((gaussian.stdev() - 1.290_994_448_735_805_6).abs() < 1e-12);
//!
//! // The density at the mean is 1/(σ√(2π))
//! let peak = gaussian.pdf(2.5).unwrap();
//! assert!((peak - 0.309_019_36).abs() < 1e-6);
//!
//! // The sum of two independent Gaussians
//! let other = Gaussian::new(10.0, 2.0);
//! let sum = Gaussian::combine_independent(&gaussian, &other);
//! println!("{sum}");
//! ```
//!
//! The same data can be drawn with any [`plot::Plotter`]. [`plot::SvgPlotter`] saves the
//! figures as SVG images:
//! ```no_run
//! use gauss_toy::plot::{plot_bar_pdf, PlotOptions, SvgPlotter};
//! use gauss_toy::Gaussian;
//!
//! let gaussian = Gaussian::fit(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0], true).unwrap();
//! let mut plotter = SvgPlotter::new("bar_pdf.svg");
//! let (x, y) = plot_bar_pdf(&gaussian, &mut plotter, &PlotOptions::default()).unwrap();
//! assert_eq!(x.len(), PlotOptions::DEFAULT_N_SPACES);
//! assert_eq!(y.len(), x.len());
//! ```
#![deny(clippy::pedantic)]
#![deny(missing_docs)]

pub mod distribution;
pub mod error;
pub mod gaussian;
pub mod plot;

pub use distribution::{Distribution, Model};
pub use error::{Error, Result};
pub use gaussian::Gaussian;
