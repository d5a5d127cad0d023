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

//! Plotting of the observations of a [`Model`] and of its density.
//!
//! The functions [`plot_histogram`] and [`plot_bar_pdf`] prepare the figures and hand them to a
//! [`Plotter`], which does the actual drawing. [`SvgPlotter`] draws them with [`plotters`], other
//! backends can be plugged in by implementing [`Plotter`].
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{instrument, Level};

use crate::distribution::Model;
use crate::error::{Error, Result};

/// Tunables of the plotting functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotOptions {
    /// Number of points at which the density is evaluated by [`plot_bar_pdf`].
    pub n_spaces: usize,
    /// Number of histogram bins.
    pub bins: usize,
}

impl PlotOptions {
    /// The default value of `self.n_spaces`
    pub const DEFAULT_N_SPACES: usize = 50;
    /// The default value of `self.bins`
    pub const DEFAULT_BINS: usize = 10;
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            n_spaces: Self::DEFAULT_N_SPACES,
            bins: Self::DEFAULT_BINS,
        }
    }
}

/// Equal width binning of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin boundaries, one more than the number of bins.
    pub edges: Vec<f64>,
    /// Height of every bin. Either counts or densities.
    pub heights: Vec<f64>,
}

impl Histogram {
    /// Relative padding of the range of constant data.
    pub const RELATIVE_PAD: f64 = 1e-9;

    /// Splits `[min(data), max(data)]` into `bins` equal bins. The last bin includes the maximum.
    ///
    /// If all values are equal the range is widened on both sides by half a unit, or by a
    /// [`Self::RELATIVE_PAD`] fraction of the value when that is larger. When `density` is set the
    /// heights are scaled so that the total area is one.
    ///
    /// # Errors
    /// [`Error::EmptyDataset`] if `data` is empty and [`Error::InvalidArgument`] if `bins` is 0.
    pub fn from_data(data: &[f64], bins: usize, density: bool) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidArgument(
                "a histogram needs at least one bin".to_string(),
            ));
        }
        let (mut low, mut high) = range(data)?;
        if high <= low {
            let pad = f64::max(0.5, low.abs() * Self::RELATIVE_PAD);
            low -= pad;
            high += pad;
        }
        #[allow(clippy::cast_precision_loss)]
        let width = (high - low) / bins as f64;
        #[allow(clippy::cast_precision_loss)]
        let edges: Vec<f64> = (0..=bins).map(|i| low + width * i as f64).collect();

        let mut heights = vec![0.0; bins];
        for &x in data {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (((x - low) / width) as usize).min(bins - 1);
            heights[index] += 1.0;
        }
        if density {
            #[allow(clippy::cast_precision_loss)]
            let area = data.len() as f64 * width;
            heights.iter_mut().for_each(|h| *h /= area);
        }
        Ok(Self { edges, heights })
    }

    /// The left edge of the first bin and the right edge of the last one.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        let low = self.edges.first().copied().unwrap_or(0.0);
        let high = self.edges.last().copied().unwrap_or(1.0);
        (low, high)
    }

    /// Iterates over `(left edge, right edge, height)` of every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.heights)
            .map(|(edge, &height)| (edge[0], edge[1], height))
    }
}

/// A single histogram with its labels.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramFigure {
    /// The binned data.
    pub histogram: Histogram,
    /// Title of the figure.
    pub title: &'static str,
    /// Label of the horizontal axis.
    pub x_label: &'static str,
    /// Label of the vertical axis.
    pub y_label: &'static str,
}

/// Two panels sharing the horizontal axis: a normalized histogram above and the density below.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPdfFigure<'a> {
    /// The binned data, normalized to a density.
    pub histogram: Histogram,
    /// Title of the histogram panel.
    pub histogram_title: &'static str,
    /// Vertical label of the histogram panel.
    pub y_label: &'static str,
    /// Points where the density is evaluated.
    pub x: &'a [f64],
    /// The density at every point of `x`.
    pub y: &'a [f64],
    /// Title of the density panel.
    pub pdf_title: &'static str,
}

/// A backend able to draw the figures of this module.
pub trait Plotter {
    /// Draws a histogram.
    ///
    /// # Errors
    /// [`Error::Render`] if the backend fails.
    fn histogram(&mut self, figure: &HistogramFigure) -> Result<()>;

    /// Draws a normalized histogram with a density curve.
    ///
    /// # Errors
    /// [`Error::Render`] if the backend fails.
    fn bar_pdf(&mut self, figure: &BarPdfFigure<'_>) -> Result<()>;
}

/// Draws a histogram of the observations of `model`.
///
/// # Errors
/// [`Error::EmptyDataset`] if there are no observations, otherwise the errors of `plotter`.
#[instrument(level = Level::DEBUG, skip_all)]
pub fn plot_histogram<M, P>(model: &M, plotter: &mut P, options: &PlotOptions) -> Result<()>
where
    M: Model + ?Sized,
    P: Plotter + ?Sized,
{
    let histogram = Histogram::from_data(model.distribution().data(), options.bins, false)?;
    plotter.histogram(&HistogramFigure {
        histogram,
        title: "Histogram of Data",
        x_label: "Data",
        y_label: "Count",
    })
}

/// Evaluates the density of `model` at `options.n_spaces` evenly spaced points of
/// `[min(data), max(data))` and draws it under a normalized histogram of the observations.
///
/// Returns the points and the density values.
///
/// # Errors
/// [`Error::EmptyDataset`] if there are no observations, [`Error::InvalidArgument`] if
/// `options.n_spaces` is 0, and the errors of [`Model::pdf`] and `plotter`.
#[instrument(level = Level::DEBUG, skip_all, fields(n_spaces = options.n_spaces))]
pub fn plot_bar_pdf<M, P>(
    model: &M,
    plotter: &mut P,
    options: &PlotOptions,
) -> Result<(Vec<f64>, Vec<f64>)>
where
    M: Model + ?Sized,
    P: Plotter + ?Sized,
{
    let data = model.distribution().data();
    let (low, high) = range(data)?;
    if options.n_spaces == 0 {
        return Err(Error::InvalidArgument(
            "the density needs at least one point".to_string(),
        ));
    }
    #[allow(clippy::cast_precision_loss)]
    let interval = (high - low) / options.n_spaces as f64;

    #[allow(clippy::cast_precision_loss)]
    let x: Vec<f64> = (0..options.n_spaces)
        .map(|i| low + interval * i as f64)
        .collect();
    let y = x
        .iter()
        .map(|&point| model.pdf(point))
        .collect::<Result<Vec<f64>>>()?;

    let histogram = Histogram::from_data(data, options.bins, true)?;
    plotter.bar_pdf(&BarPdfFigure {
        histogram,
        histogram_title: "Normed Histogram of Data",
        y_label: "Density",
        x: &x,
        y: &y,
        pdf_title: "Normal Distribution for Sample Mean and Sample Standard Deviation",
    })?;
    Ok((x, y))
}

/// Minimum and maximum of `data`.
fn range(data: &[f64]) -> Result<(f64, f64)> {
    let low = data.iter().copied().min_by(f64::total_cmp);
    let high = data.iter().copied().max_by(f64::total_cmp);
    low.zip(high).ok_or(Error::EmptyDataset)
}

/// A [`Plotter`] drawing the figures into an SVG file with [`plotters`].
///
/// Every figure overwrites the file at `path`.
pub struct SvgPlotter {
    /// Width and height of the image in pixels.
    pub size: (u32, u32),
    path: PathBuf,
}

impl SvgPlotter {
    /// The default value of `self.size`
    pub const DEFAULT_SIZE: (u32, u32) = (1200, 800);

    /// Constructs a plotter writing to `path`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            path: path.into(),
        }
    }

    /// The file the figures are written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Plotter for SvgPlotter {
    fn histogram(&mut self, figure: &HistogramFigure) -> Result<()> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        draw_bars(
            &root,
            &figure.histogram,
            figure.title,
            figure.x_label,
            figure.y_label,
        )?;
        root.present().map_err(render_error)?;
        tracing::debug!(path = %self.path.display(), "histogram written");
        Ok(())
    }

    fn bar_pdf(&mut self, figure: &BarPdfFigure<'_>) -> Result<()> {
        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        let panels = root.split_evenly((2, 1));

        draw_bars(
            &panels[0],
            &figure.histogram,
            figure.histogram_title,
            "Data",
            figure.y_label,
        )?;

        // Both panels share the horizontal range of the histogram.
        let (low, high) = figure.histogram.span();
        let top = headroom(figure.y.iter().copied());
        let mut chart = ChartBuilder::on(&panels[1])
            .caption(figure.pdf_title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(low..high, 0.0..top)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .x_desc("Data")
            .y_desc(figure.y_label)
            .draw()
            .map_err(render_error)?;
        chart
            .draw_series(LineSeries::new(
                figure.x.iter().copied().zip(figure.y.iter().copied()),
                &RED,
            ))
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        tracing::debug!(path = %self.path.display(), "density plot written");
        Ok(())
    }
}

/// Draws the bins of `histogram` as bars filling `area`.
fn draw_bars(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    histogram: &Histogram,
    title: &str,
    x_label: &str,
    y_label: &str,
) -> Result<()> {
    let (low, high) = histogram.span();
    let top = headroom(histogram.heights.iter().copied());
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(low..high, 0.0..top)
        .map_err(render_error)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(render_error)?;
    chart
        .draw_series(histogram.bins().map(|(left, right, height)| {
            Rectangle::new([(left, 0.0), (right, height)], BLUE.mix(0.5).filled())
        }))
        .map_err(render_error)?;
    Ok(())
}

/// Upper end of the vertical axis for values up to `max(values)`.
fn headroom(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn render_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::Gaussian;

    /// Remembers the figures instead of drawing them.
    #[derive(Default)]
    struct Recorder {
        histograms: Vec<HistogramFigure>,
        curves: Vec<(Histogram, Vec<f64>, Vec<f64>)>,
    }

    impl Plotter for Recorder {
        fn histogram(&mut self, figure: &HistogramFigure) -> Result<()> {
            self.histograms.push(figure.clone());
            Ok(())
        }

        fn bar_pdf(&mut self, figure: &BarPdfFigure<'_>) -> Result<()> {
            self.curves.push((
                figure.histogram.clone(),
                figure.x.to_vec(),
                figure.y.to_vec(),
            ));
            Ok(())
        }
    }

    fn fitted() -> Gaussian {
        Gaussian::fit(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0], true).unwrap()
    }

    #[test]
    fn histogram_counts() {
        let histogram = Histogram::from_data(&[0.0, 1.0, 1.5, 2.0, 4.0], 4, false).unwrap();
        assert_eq!(histogram.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(histogram.heights, vec![1.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn histogram_density_has_unit_area() {
        let histogram = Histogram::from_data(&[0.3, 1.2, 1.9, 2.2, 7.5, 9.0], 7, true).unwrap();
        let area: f64 = histogram
            .bins()
            .map(|(left, right, height)| (right - left) * height)
            .sum();
        assert_abs_diff_eq!(area, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn histogram_of_constant_data() {
        let histogram = Histogram::from_data(&[2.0, 2.0], 2, false).unwrap();
        assert_eq!(histogram.edges, vec![1.5, 2.0, 2.5]);
        assert_eq!(histogram.heights, vec![0.0, 2.0]);
    }

    #[test]
    fn histogram_errors() {
        assert!(matches!(
            Histogram::from_data(&[], 3, false),
            Err(Error::EmptyDataset)
        ));
        assert!(matches!(
            Histogram::from_data(&[1.0], 0, false),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn plot_histogram_labels() {
        let mut recorder = Recorder::default();
        plot_histogram(&fitted(), &mut recorder, &PlotOptions::default()).unwrap();
        let figure = &recorder.histograms[0];
        assert_eq!(figure.title, "Histogram of Data");
        assert_eq!(figure.x_label, "Data");
        assert_eq!(figure.y_label, "Count");
        assert_abs_diff_eq!(figure.histogram.heights.iter().sum::<f64>(), 9.0);
    }

    #[test]
    fn plot_bar_pdf_points() {
        let gaussian = fitted();
        let mut recorder = Recorder::default();
        let options = PlotOptions {
            n_spaces: 8,
            ..PlotOptions::default()
        };
        let (x, y) = plot_bar_pdf(&gaussian, &mut recorder, &options).unwrap();
        assert_eq!(x.len(), 8);
        assert_abs_diff_eq!(x[0], 1.0);
        assert_abs_diff_eq!(x[1], 1.5);
        assert_abs_diff_eq!(x[7], 4.5);
        for (&point, &value) in x.iter().zip(&y) {
            assert_abs_diff_eq!(value, gaussian.pdf(point).unwrap());
        }
        assert_eq!(recorder.curves[0].1, x);
        assert_eq!(recorder.curves[0].2, y);
    }

    #[test]
    fn plot_bar_pdf_errors() {
        let mut recorder = Recorder::default();
        let empty = Gaussian::default();
        assert!(matches!(
            plot_bar_pdf(&empty, &mut recorder, &PlotOptions::default()),
            Err(Error::EmptyDataset)
        ));
        assert!(matches!(
            plot_histogram(&empty, &mut recorder, &PlotOptions::default()),
            Err(Error::EmptyDataset)
        ));
        let options = PlotOptions {
            n_spaces: 0,
            ..PlotOptions::default()
        };
        assert!(matches!(
            plot_bar_pdf(&fitted(), &mut recorder, &options),
            Err(Error::InvalidArgument(_))
        ));

        let mut degenerate = Gaussian::new(0.0, 0.0);
        degenerate.distribution_mut().set_data(vec![1.0, 2.0]);
        assert!(matches!(
            plot_bar_pdf(&degenerate, &mut recorder, &PlotOptions::default()),
            Err(Error::DegenerateDistribution { .. })
        ));
        assert!(recorder.curves.is_empty());
    }

    #[test]
    fn histogram_of_large_constant_data() {
        let histogram = Histogram::from_data(&[1e17, 1e17, 1e17], 10, true).unwrap();
        let (low, high) = histogram.span();
        assert!(low < 1e17 && 1e17 < high);
        assert!(histogram.heights.iter().all(|h| h.is_finite()));
        let area: f64 = histogram
            .bins()
            .map(|(left, right, height)| (right - left) * height)
            .sum();
        assert_abs_diff_eq!(area, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn svg_plotter_draws_both_panels() {
        let dir = tempfile::tempdir().unwrap();
        let mut plotter = SvgPlotter::new(dir.path().join("bar_pdf.svg"));
        plotter.size = (640, 480);
        let options = PlotOptions {
            n_spaces: 5,
            bins: 4,
        };
        plot_bar_pdf(&fitted(), &mut plotter, &options).unwrap();
        let svg = std::fs::read_to_string(plotter.path()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Normed Histogram of Data"));
        assert!(svg.contains("Sample Standard Deviation"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn svg_plotter_histogram() {
        let dir = tempfile::tempdir().unwrap();
        let mut plotter = SvgPlotter::new(dir.path().join("histogram.svg"));
        plot_histogram(&fitted(), &mut plotter, &PlotOptions::default()).unwrap();
        let svg = std::fs::read_to_string(plotter.path()).unwrap();
        assert!(svg.contains("Histogram of Data"));
        assert!(svg.contains("Count"));
    }

    #[test]
    fn svg_plotter_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut plotter = SvgPlotter::new(dir.path().join("missing").join("histogram.svg"));
        assert!(matches!(
            plot_histogram(&fitted(), &mut plotter, &PlotOptions::default()),
            Err(Error::Render(_))
        ));
    }
}
