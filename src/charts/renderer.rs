use crate::models::{Column, DataTable};
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 800;
const HISTOGRAM_BINS: usize = 30;

// Charts carry no text (titles, tick labels): text rendering would pull in
// system font discovery, which is not available on headless hosts. The
// report names each image, so the artifacts stay identifiable.

/// Pearson correlation matrix over pairwise complete observations.
pub fn correlation_matrix(columns: &[&Column]) -> Vec<Vec<f64>> {
    let series: Vec<Vec<Option<f64>>> = columns.iter().map(|c| c.numeric_cells()).collect();
    let n = series.len();

    let mut matrix = vec![vec![0.0; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = if i == j {
                1.0
            } else {
                pearson(&series[i], &series[j])
            };
        }
    }
    matrix
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        covariance += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        covariance / denominator
    }
}

/// Blue for negative, white around zero, red for positive.
fn heat_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    if v >= 0.0 {
        let fade = (255.0 * (1.0 - v)) as u8;
        RGBColor(255, fade, fade)
    } else {
        let fade = (255.0 * (1.0 + v)) as u8;
        RGBColor(fade, fade, 255)
    }
}

pub fn draw_correlation_heatmap(columns: &[&Column], path: &Path) -> Result<(), Box<dyn Error>> {
    let matrix = correlation_matrix(columns);
    let n = columns.len();

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;

    for (i, row) in matrix.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(j as f64, i as f64), (j as f64 + 1.0, i as f64 + 1.0)],
                heat_color(*value).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(j as f64, i as f64), (j as f64 + 1.0, i as f64 + 1.0)],
                BLACK.stroke_width(1),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

pub fn draw_distribution(column: &Column, path: &Path) -> Result<(), Box<dyn Error>> {
    let values = column.numbers();
    if values.is_empty() {
        return Err("no numeric values to plot".into());
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if (max - min).abs() < f64::EPSILON {
        1.0
    } else {
        max - min
    };
    let bin_width = span / HISTOGRAM_BINS as f64;

    let mut counts = vec![0u32; HISTOGRAM_BINS];
    for value in &values {
        let index = (((value - min) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
        counts[index] += 1;
    }
    let y_max = counts.iter().max().copied().unwrap_or(1).max(1);

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(min..min + span, 0u32..y_max + y_max / 10 + 1)?;

    chart.configure_mesh().draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(index, &count)| {
        let x0 = min + index as f64 * bin_width;
        Rectangle::new([(x0, 0), (x0 + bin_width, count)], BLUE.mix(0.5).filled())
    }))?;

    root.present()?;
    Ok(())
}

pub fn draw_boxplot(columns: &[&Column], path: &Path) -> Result<(), Box<dyn Error>> {
    let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
    let quartiles: Vec<Quartiles> = columns
        .iter()
        .map(|c| Quartiles::new(&c.numbers()))
        .collect();

    let all_values: Vec<f64> = columns.iter().flat_map(|c| c.numbers()).collect();
    if all_values.is_empty() {
        return Err("no numeric values to plot".into());
    }
    // Quartile whisker values are f32-valued, so the y-range is built in f32.
    let y_min = all_values.iter().cloned().fold(f64::INFINITY, f64::min) as f32;
    let y_max = all_values.iter().cloned().fold(f64::NEG_INFINITY, f64::max) as f32;
    let padding = ((y_max - y_min).abs()).max(1.0) * 0.1;

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(
            names[..].into_segmented(),
            (y_min - padding)..(y_max + padding),
        )?;

    chart.configure_mesh().disable_x_mesh().draw()?;

    chart.draw_series(
        names
            .iter()
            .zip(quartiles.iter())
            .map(|(name, quartile)| Boxplot::new_vertical(SegmentValue::CenterOf(name), quartile)),
    )?;

    root.present()?;
    Ok(())
}

pub fn draw_missing_data(table: &DataTable, path: &Path) -> Result<(), Box<dyn Error>> {
    let missing: Vec<(&str, u32)> = table
        .columns
        .iter()
        .filter(|c| c.missing_count() > 0)
        .map(|c| (c.name.as_str(), c.missing_count() as u32))
        .collect();

    if missing.is_empty() {
        return Err("no missing values to plot".into());
    }
    let y_max = missing.iter().map(|(_, count)| *count).max().unwrap_or(1);

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0f64..missing.len() as f64, 0u32..y_max + 1)?;

    chart.configure_mesh().disable_x_mesh().draw()?;

    chart.draw_series(missing.iter().enumerate().map(|(index, (_, count))| {
        Rectangle::new(
            [(index as f64 + 0.1, 0), (index as f64 + 0.9, *count)],
            RED.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
