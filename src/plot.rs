//! Prediction-curve rendering
//!
//! Writes one PNG with two side-by-side panels, each showing a fitted
//! prediction curve over its candidate grid with the optimum marked.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::optimizer::OptimalPoint;

/// Image dimensions for the two-panel layout
const PLOT_SIZE: (u32, u32) = (1200, 500);

/// Errors raised while rendering the plot
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("failed to render plot: {0}")]
    Render(String),
}

/// One panel's worth of curve data
#[derive(Debug, Clone, Copy)]
pub struct CurvePanel<'a> {
    /// Panel caption
    pub title: &'a str,
    /// X-axis description
    pub x_label: &'a str,
    /// Y-axis description
    pub y_label: &'a str,
    /// Candidate grid values
    pub grid: &'a [f64],
    /// Predicted production, parallel to `grid`
    pub predictions: &'a [f64],
    /// Optimum to mark on the curve
    pub optimum: OptimalPoint,
}

/// Render the two optimization panels side by side into one image file
pub fn render_side_by_side(
    path: &Path,
    gas_lift: &CurvePanel<'_>,
    choke: &CurvePanel<'_>,
) -> Result<(), PlotError> {
    render_impl(path, gas_lift, choke).map_err(|e| PlotError::Render(e.to_string()))?;
    info!("plot written to {}", path.display());
    Ok(())
}

fn render_impl(
    path: &Path,
    gas_lift: &CurvePanel<'_>,
    choke: &CurvePanel<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, 2));
    draw_panel(&panels[0], gas_lift, &BLUE)?;
    draw_panel(&panels[1], choke, &GREEN)?;

    root.present()?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &CurvePanel<'_>,
    color: &RGBColor,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = bounds(panel.grid);
    let (y_min, y_max) = bounds(panel.predictions);
    // Pad the y-range so the curve and marker stay clear of the frame.
    let pad = ((y_max - y_min) * 0.08).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label)
        .y_desc(panel.y_label)
        .draw()?;

    let curve: Vec<(f64, f64)> = panel
        .grid
        .iter()
        .zip(panel.predictions.iter())
        .map(|(&x, &y)| (x, y))
        .collect();

    let line_color = *color;
    chart
        .draw_series(LineSeries::new(curve, color))?
        .label("Prediction Curve")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_color));

    chart
        .draw_series(std::iter::once(Circle::new(
            (panel.optimum.control, panel.optimum.production),
            6,
            RED.filled(),
        )))?
        .label("Optimal Point")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;

    Ok(())
}

/// Finite min/max of a non-empty slice
fn bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel<'a>(grid: &'a [f64], predictions: &'a [f64]) -> CurvePanel<'a> {
        CurvePanel {
            title: "Gas Lift Optimization",
            x_label: "Gas Injection Rate (MMscf/day)",
            y_label: "Oil Production (bbl/day)",
            grid,
            predictions,
            optimum: OptimalPoint {
                control: grid[grid.len() / 2],
                production: predictions[predictions.len() / 2],
                grid_index: grid.len() / 2,
            },
        }
    }

    #[test]
    fn test_renders_non_empty_png() {
        let grid: Vec<f64> = (0..100).map(|i| f64::from(i) / 10.0).collect();
        let predictions: Vec<f64> = grid.iter().map(|&x| 200.0 + 50.0 * x).collect();
        let left = panel(&grid, &predictions);
        let right = panel(&grid, &predictions);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curves.png");
        render_side_by_side(&path, &left, &right).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0, "plot file is empty");
    }

    #[test]
    fn test_flat_curve_still_renders() {
        // Constant predictions exercise the degenerate y-range padding.
        let grid: Vec<f64> = (0..50).map(f64::from).collect();
        let predictions = vec![10.0; 50];
        let left = panel(&grid, &predictions);
        let right = panel(&grid, &predictions);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.png");
        render_side_by_side(&path, &left, &right).unwrap();
        assert!(path.exists());
    }
}
