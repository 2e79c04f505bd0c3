//! SVG bar charts comparing the trained models

use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::comparison::ComparisonRow;
use crate::pipeline::PipelineError;

pub const METRICS_CHART: &str = "metrics_comparison_bar.svg";
pub const TRAINING_TIME_CHART: &str = "training_time_bar.svg";

const PANEL_WIDTH: u32 = 500;
const CHART_HEIGHT: u32 = 500;

/// One bar panel: a title and the value per model, in row order
struct Panel<'a> {
    title: &'a str,
    color: RGBColor,
    values: Vec<f64>,
}

fn chart_error<E: std::fmt::Display>(path: &Path, err: E) -> anyhow::Error {
    PipelineError::io_failure(path, std::io::Error::other(err.to_string())).into()
}

/// Value range with headroom for the bar labels; always includes zero
fn value_range(values: &[f64]) -> (f64, f64) {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let min = values.iter().copied().fold(0.0_f64, f64::min);
    let span = (max - min).max(1e-9);
    let low = if min < 0.0 { min - span * 0.15 } else { 0.0 };
    (low, max + span * 0.15)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    panel: &Panel,
    labels: &[String],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (low, high) = value_range(&panel.values);
    let n = panel.values.len();

    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .caption(panel.title, ("sans-serif", 20))
        .x_label_area_size(36)
        .y_label_area_size(56)
        .build_cartesian_2d((0..n).into_segmented(), low..high)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| format!("{:.2}", v))
        .axis_style(BLACK.mix(0.6))
        .light_line_style(BLACK.mix(0.06))
        .label_style(("sans-serif", 13))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(panel.color.filled())
            .margin(24)
            .data(panel.values.iter().enumerate().map(|(i, &v)| (i, v))),
    )?;

    chart.draw_series(panel.values.iter().enumerate().map(|(i, &v)| {
        Text::new(
            format!("{:.4}", v),
            (SegmentValue::CenterOf(i), v),
            ("sans-serif", 13)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom)),
        )
    }))?;

    Ok(())
}

fn render(path: &Path, panels: &[Panel], labels: &[String]) -> Result<()> {
    let width = PANEL_WIDTH * panels.len() as u32;
    let root = SVGBackend::new(path, (width, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(path, e))?;

    let areas = root.split_evenly((1, panels.len()));
    for (area, panel) in areas.iter().zip(panels) {
        draw_panel(area, panel, labels).map_err(|e| chart_error(path, e))?;
    }

    root.present().map_err(|e| chart_error(path, e))?;
    Ok(())
}

/// Render both comparison charts into `output_dir`, returning their paths
pub fn render_comparison_charts(rows: &[ComparisonRow], output_dir: &Path) -> Result<Vec<PathBuf>> {
    if rows.is_empty() {
        return Err(PipelineError::InvalidInput("no models to chart".to_string()).into());
    }

    let labels: Vec<String> = rows.iter().map(|r| r.model.code().to_uppercase()).collect();

    let metrics_path = output_dir.join(METRICS_CHART);
    render(
        &metrics_path,
        &[
            Panel {
                title: "R² (higher is better)",
                color: RGBColor(70, 130, 180),
                values: rows.iter().map(|r| r.r2).collect(),
            },
            Panel {
                title: "RMSE (lower is better)",
                color: RGBColor(220, 120, 60),
                values: rows.iter().map(|r| r.rmse).collect(),
            },
            Panel {
                title: "MAE (lower is better)",
                color: RGBColor(90, 170, 90),
                values: rows.iter().map(|r| r.mae).collect(),
            },
        ],
        &labels,
    )?;

    let time_path = output_dir.join(TRAINING_TIME_CHART);
    render(
        &time_path,
        &[Panel {
            title: "Training Time (seconds)",
            color: RGBColor(140, 110, 190),
            values: rows.iter().map(|r| r.training_time).collect(),
        }],
        &labels,
    )?;

    Ok(vec![metrics_path, time_path])
}
