use std::path::Path;

use plotters::prelude::*;

use crate::error::{PinnError, Result};
use crate::history::LossHistory;

/// 対数目盛で描画するときの下限
const LOG_FLOOR: f32 = 1e-12;

/// 学習過程の損失をグラフとしてPNGファイルに出力します。
pub fn plot_loss_history(history: &LossHistory, path: &Path) -> Result<()> {
    draw_loss_history(history, path).map_err(|e| PinnError::Plot(e.to_string()))
}

/// 予測値と厳密解を重ねたグラフをPNGファイルに出力します。
pub fn plot_field(
    name: &str,
    x: &[f32],
    predicted: &[f32],
    exact: &[f32],
    path: &Path,
) -> Result<()> {
    draw_field(name, x, predicted, exact, path).map_err(|e| PinnError::Plot(e.to_string()))
}

fn draw_loss_history(
    history: &LossHistory,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let records = history.records();
    let steps = records.last().map_or(1, |r| r.step.max(1));
    let series: [(&str, RGBColor, Vec<(usize, f32)>); 5] = [
        ("Total Loss", RED, records.iter().map(|r| (r.step, r.total)).collect()),
        ("PDE Loss", BLUE, records.iter().map(|r| (r.step, r.pde)).collect()),
        ("Boundary Loss", GREEN, records.iter().map(|r| (r.step, r.boundary)).collect()),
        (
            "Observation Loss",
            MAGENTA,
            records.iter().map(|r| (r.step, r.observation)).collect(),
        ),
        ("Test PDE Loss", CYAN, records.iter().map(|r| (r.step, r.test_pde)).collect()),
    ];
    let log_values = series
        .iter()
        .flat_map(|(_, _, points)| points.iter().map(|&(_, v)| v.max(LOG_FLOOR).log10()));
    let (min_log_loss, max_log_loss) = log_values.fold((f32::MAX, f32::MIN), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let (min_log_loss, max_log_loss) = if min_log_loss > max_log_loss {
        (-6.0, 0.0)
    } else {
        (min_log_loss - 0.5, max_log_loss + 0.5)
    };

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Loss History", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0..steps, min_log_loss..max_log_loss)?;
    chart
        .configure_mesh()
        .y_desc("Loss (log10 scale)")
        .x_desc("Epochs")
        .draw()?;
    for (label, color, points) in series {
        chart
            .draw_series(LineSeries::new(
                points
                    .into_iter()
                    .map(|(step, val)| (step, val.max(LOG_FLOOR).log10())),
                &color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_field(
    name: &str,
    x: &[f32],
    predicted: &[f32],
    exact: &[f32],
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let x_min = x.iter().copied().fold(f32::MAX, f32::min);
    let x_max = x.iter().copied().fold(f32::MIN, f32::max);
    let (y_min, y_max) = predicted
        .iter()
        .chain(exact)
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let pad = ((y_max - y_min) * 0.05).max(1e-3);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(name, ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, (y_min - pad)..(y_max + pad))?;
    chart.configure_mesh().x_desc("x").y_desc(name).draw()?;
    chart
        .draw_series(LineSeries::new(
            x.iter().copied().zip(predicted.iter().copied()),
            &RED,
        ))?
        .label(format!("{name}hat"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart
        .draw_series(LineSeries::new(
            x.iter().copied().zip(exact.iter().copied()),
            &BLUE,
        ))?
        .label(format!("{name}true"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
