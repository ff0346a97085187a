//! Render chart curves to **SVG** or **PNG**.
//!
//! - Office palette, one color per curve
//! - Gaps (`None` values) break lines; isolated points become markers
//! - Year tick labels when the x axis carries date serials
//! - Locale-aware y tick labels (`1 200`)

use crate::models::{Curve, CurveKind, from_oa_date};
use anyhow::{Result, anyhow};
use chrono::Datelike;
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

pub const X_AXIS_LABEL: &str = "Années";
pub const Y_AXIS_LABEL: &str = "Précipitations en mm";

/// Microsoft Office (2013+) chart series palette.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Title and pixel size of a rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Précipitations".to_string(),
            width: 1000,
            height: 600,
        }
    }
}

/// Drawable piece of a curve between gaps.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// A value with gaps (or the curve ends) on both sides; drawn as a marker.
    Point((f64, f64)),
    /// Two or more consecutive values; drawn as a line.
    Path(Vec<(f64, f64)>),
}

pub fn marks(curve: &Curve) -> Vec<Mark> {
    curve
        .segments()
        .into_iter()
        .map(|segment| {
            if segment.len() == 1 {
                Mark::Point(segment[0])
            } else {
                Mark::Path(segment)
            }
        })
        .collect()
}

struct Bounds {
    x: (f64, f64),
    y: (f64, f64),
}

fn bounds(curves: &[Curve]) -> Result<Bounds> {
    let xs = curves.iter().flat_map(|c| c.points.iter().map(|p| p.0));
    let (x_min, x_max) = min_max(xs).ok_or_else(|| anyhow!("no data to plot"))?;
    let ys = curves
        .iter()
        .flat_map(|c| c.points.iter().filter_map(|p| p.1))
        .filter(|v| v.is_finite());
    let (y_min, y_max) = min_max(ys).ok_or_else(|| anyhow!("no numeric values to plot"))?;
    Ok(Bounds {
        x: widen(x_min, x_max),
        y: widen(y_min, y_max),
    })
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Draw `curves` into `out_path`: SVG for a `.svg` extension, PNG otherwise.
///
/// Only SVG output carries text (title, axis labels, legend names); PNG
/// output has no font rasterizer and shows curves, ticks and the legend box.
pub fn plot_curves<P: AsRef<Path>>(curves: &[Curve], out_path: P, opts: &ChartOptions) -> Result<()> {
    if curves.is_empty() {
        return Err(anyhow!("no curves to plot"));
    }
    let bounds = bounds(curves)?;
    let out_path = out_path.as_ref();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, (opts.width, opts.height)).into_drawing_area();
        draw_chart(root, curves, &bounds, opts)
    } else {
        log::warn!(
            "{} is rendered without text; use an .svg path for labels",
            out_path.display()
        );
        let root = BitMapBackend::new(out_path, (opts.width, opts.height)).into_drawing_area();
        draw_chart(root, curves, &bounds, opts)
    }
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    curves: &[Curve],
    bounds: &Bounds,
    opts: &ChartOptions,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(&opts.title, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
        .map_err(|e| anyhow!("{:?}", e))?;

    let date_axis = curves.iter().any(|c| c.kind == CurveKind::Series);
    let x_label_fmt = |x: &f64| {
        if date_axis {
            from_oa_date(*x)
                .map(|d| d.year().to_string())
                .unwrap_or_default()
        } else {
            format!("{:.1}", x)
        }
    };
    let y_label_fmt = |v: &f64| (v.round() as i64).to_formatted_string(&Locale::fr);

    chart
        .configure_mesh()
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .x_labels(12)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for (idx, curve) in curves.iter().enumerate() {
        let color = office_color(idx);
        let style = ShapeStyle {
            color,
            filled: false,
            stroke_width: 2,
        };

        let mut labelled = false;
        for mark in marks(curve) {
            let anno = match mark {
                Mark::Point(p) => {
                    chart.draw_series(std::iter::once(Circle::new(p, 3, style.filled())))
                }
                Mark::Path(path) => chart.draw_series(LineSeries::new(path, style)),
            }
            .map_err(|e| anyhow!("{:?}", e))?;

            // One legend entry per curve, not per mark.
            if !labelled {
                anno.label(curve.name.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color));
                labelled = true;
            }
        }
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .label_font(("sans-serif", 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
