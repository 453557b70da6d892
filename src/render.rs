//! Renderers consuming an error-rate series
//!
//! The model hands its `(voltage, error_rate)` pairs and the effective
//! threshold to a [`Renderer`]. Two are provided: a CSV table and an SVG
//! chart drawn with plotters.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::ErrorRateSeries;
use crate::VthreshError;

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(
        &mut self,
        series: &ErrorRateSeries,
        effective_threshold: f64,
    ) -> Result<(), VthreshError>;
}

/// Writes `voltage,error_rate` rows; repeated calls append rows under one header
pub struct CsvRenderer<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRenderer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, VthreshError> {
        self.writer
            .into_inner()
            .map_err(|err| VthreshError::Io(err.into_error()))
    }
}

impl CsvRenderer<File> {
    pub fn create(path: &Path) -> Result<Self, VthreshError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> Renderer for CsvRenderer<W> {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn render(
        &mut self,
        series: &ErrorRateSeries,
        _effective_threshold: f64,
    ) -> Result<(), VthreshError> {
        for point in series {
            self.writer.serialize(point)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Chart styling, passed to [`SvgRenderer`]
///
/// Colors are `[r, g, b]`. Defaults give a dark-background chart with an
/// orange curve and a red dashed threshold marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series_label: String,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    pub grid: [u8; 3],
    pub line_color: [u8; 3],
    pub line_alpha: f64,
    pub line_width: u32,
    pub threshold_color: [u8; 3],
    pub title_size: f64,
    pub label_size: f64,
    pub legend_size: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            title: "False Positive and False Negative Rates with Transistor Effect".to_string(),
            x_label: "Voltage (V)".to_string(),
            y_label: "Error Rate".to_string(),
            series_label: "Error Rate with Transistor Effect".to_string(),
            background: [0x1c, 0x1c, 0x1c],
            foreground: [0xff, 0xff, 0xff],
            grid: [0x80, 0x80, 0x80],
            line_color: [0xff, 0xa5, 0x00],
            line_alpha: 0.7,
            line_width: 2,
            threshold_color: [0xff, 0x00, 0x00],
            title_size: 24.0,
            label_size: 20.0,
            legend_size: 18.0,
        }
    }
}

impl PlotStyle {
    pub fn validate(&self) -> Result<(), VthreshError> {
        if self.width == 0 || self.height == 0 {
            return Err(VthreshError::InvalidConfig(
                "plot width and height must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.line_alpha) {
            return Err(VthreshError::InvalidConfig(format!(
                "line_alpha must be in [0, 1], got {}",
                self.line_alpha
            )));
        }

        for (name, size) in [
            ("title_size", self.title_size),
            ("label_size", self.label_size),
            ("legend_size", self.legend_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(VthreshError::InvalidConfig(format!(
                    "{name} must be a positive font size, got {size}"
                )));
            }
        }

        Ok(())
    }
}

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Draws the series to an SVG file
pub struct SvgRenderer {
    path: PathBuf,
    style: PlotStyle,
}

impl SvgRenderer {
    pub fn new(path: impl Into<PathBuf>, style: PlotStyle) -> Self {
        Self {
            path: path.into(),
            style,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Renderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn render(
        &mut self,
        series: &ErrorRateSeries,
        effective_threshold: f64,
    ) -> Result<(), VthreshError> {
        if series.is_empty() {
            return Err(VthreshError::EmptyInput("no points to plot"));
        }
        self.style.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        draw_chart(&self.path, series, effective_threshold, &self.style)
            .map_err(|err| VthreshError::Render(err.to_string()))?;

        info!(path = %self.path.display(), points = series.len(), "wrote error-rate chart");
        Ok(())
    }
}

fn x_range(series: &ErrorRateSeries) -> (f64, f64) {
    match series.voltage_span() {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((lo, _)) => (lo - 0.5, lo + 0.5),
        None => (-0.5, 0.5),
    }
}

fn draw_chart(
    path: &Path,
    series: &ErrorRateSeries,
    effective_threshold: f64,
    style: &PlotStyle,
) -> Result<(), Box<dyn std::error::Error>> {
    let background = rgb(style.background);
    let foreground = rgb(style.foreground);
    let grid = rgb(style.grid);
    let marker = rgb(style.threshold_color);

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&background)?;

    let (x_min, x_max) = x_range(series);
    let y_max = series
        .peak()
        .map(|p| p.error_rate)
        .unwrap_or(0.5)
        .max(1e-3)
        * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            style.title.as_str(),
            ("sans-serif", style.title_size).into_font().color(&foreground),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .axis_style(foreground)
        .label_style(("sans-serif", style.label_size * 0.8).into_font().color(&foreground))
        .axis_desc_style(("sans-serif", style.label_size).into_font().color(&foreground))
        .bold_line_style(grid.mix(0.5))
        .light_line_style(grid.mix(0.15))
        .draw()?;

    let line = rgb(style.line_color)
        .mix(style.line_alpha)
        .stroke_width(style.line_width);

    chart
        .draw_series(LineSeries::new(
            series.iter().map(|p| (p.voltage, p.error_rate)),
            line,
        ))?
        .label(style.series_label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], line));

    chart.draw_series(DashedLineSeries::new(
        vec![(effective_threshold, 0.0), (effective_threshold, y_max)],
        6,
        4,
        marker.stroke_width(1),
    ))?;

    let label_x = effective_threshold + (x_max - x_min) * 0.012;
    chart.draw_series(std::iter::once(Text::new(
        format!("Threshold Voltage = {effective_threshold}V"),
        (label_x, y_max * 0.2),
        ("sans-serif", style.legend_size).into_font().color(&marker),
    )))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", style.legend_size).into_font().color(&foreground))
        .border_style(foreground)
        .background_style(background.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_error_rate, ThresholdModel, VoltageDomain};

    fn reference_series() -> ErrorRateSeries {
        let domain = VoltageDomain::new(vec![3.0, 3.2, 3.4]).unwrap();
        compute_error_rate(&domain, &ThresholdModel::default()).unwrap()
    }

    #[test]
    fn test_csv_renderer_rows() {
        let series = reference_series();
        let mut renderer = CsvRenderer::new(Vec::new());
        renderer.render(&series, 3.2).unwrap();

        let bytes = renderer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "voltage,error_rate");
        assert_eq!(lines[2], "3.2,0.5");
    }

    #[test]
    fn test_csv_renderer_full_precision() {
        let domain = VoltageDomain::new(vec![2.3]).unwrap();
        let series = compute_error_rate(&domain, &ThresholdModel::default()).unwrap();
        let mut renderer = CsvRenderer::new(Vec::new());
        renderer.render(&series, 3.2).unwrap();

        let text = String::from_utf8(renderer.into_inner().unwrap()).unwrap();
        let row = text.lines().nth(1).unwrap();
        let value: f64 = row.split(',').nth(1).unwrap().parse().unwrap();
        assert_eq!(value, series.points()[0].error_rate);
    }

    #[test]
    fn test_plot_style_validation() {
        assert!(PlotStyle::default().validate().is_ok());

        let style = PlotStyle {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(style.validate(), Err(VthreshError::InvalidConfig(_))));

        let style = PlotStyle {
            line_alpha: 1.5,
            ..Default::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_x_range_pads_single_sample() {
        let domain = VoltageDomain::new(vec![3.2]).unwrap();
        let series = compute_error_rate(&domain, &ThresholdModel::default()).unwrap();
        assert_eq!(x_range(&series), (2.7, 3.7));
    }

    #[test]
    fn test_x_range_unordered_series() {
        let series = crate::error_rates(&[3.4, 3.0, 3.2], &ThresholdModel::default()).unwrap();
        assert_eq!(x_range(&series), (3.0, 3.4));
    }
}
