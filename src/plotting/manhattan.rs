use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily};

use super::{chrom_ticks, dataset_color, y_axis_upper, PlotConfig, PlotDataset, COLOR_STRIPE};
use crate::layout::ChromLayout;

/// Draw the Manhattan scatter with highlight layers on the given drawing area.
pub fn draw_manhattan<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    datasets: &[PlotDataset],
    layout: &ChromLayout,
    config: &PlotConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let y_up = y_axis_upper(datasets, config.p_thresh);
    let y_low = -0.005 * y_up;
    let x_min = -0.1;
    let x_max = layout.x_end() + 0.1;

    let mut chart = ChartBuilder::on(root)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_low..y_up)?;

    // No grid, no automatic x ticks; chromosome labels are drawn by hand at
    // the chromosome midpoints. Only the left/bottom axes carry label areas,
    // so the top/right borders stay blank.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .x_desc("Chromosome")
        .y_desc(&config.y_label)
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 14))
        .axis_style(&BLACK)
        .draw()?;

    // Grey stripe over every second chromosome
    if config.striped_background {
        for c in layout.chroms.iter().filter(|c| c.ind % 2 == 1) {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(c.start, 0.0), (c.start + c.rel_size, y_up)],
                COLOR_STRIPE.mix(0.3).filled(),
            )))?;
        }
    }

    // Normal points for every dataset first, highlights on top afterwards
    for (i, ds) in datasets.iter().enumerate() {
        let color = dataset_color(i);
        chart.draw_series(ds.variants.iter().map(|v| {
            Circle::new((v.x_coord, v.log10p), 1, color.mix(ds.transparency).filled())
        }))?;
    }

    for (i, ds) in datasets.iter().enumerate() {
        let color = dataset_color(i);

        chart.draw_series(
            ds.variants
                .iter()
                .filter(|v| v.bold)
                .map(|v| Circle::new((v.x_coord, v.log10p), 3, color.filled())),
        )?;

        chart.draw_series(ds.variants.iter().filter(|v| v.outlined).map(|v| {
            Circle::new((v.x_coord, v.log10p), 4, color.filled())
        }))?;
        chart.draw_series(ds.variants.iter().filter(|v| v.outlined).map(|v| {
            Circle::new(
                (v.x_coord, v.log10p),
                4,
                ShapeStyle {
                    color: BLACK.to_rgba(),
                    filled: false,
                    stroke_width: 1,
                },
            )
        }))?;

        let annot_font = FontDesc::new(FontFamily::SansSerif, 15.0, FontStyle::Italic);
        for v in ds.variants.iter().filter(|v| !v.annot.is_empty()) {
            chart.draw_series(std::iter::once(
                EmptyElement::at((v.x_coord, v.log10p))
                    + Text::new(v.annot.clone(), (3, -14), annot_font.clone().color(&color)),
            ))?;
        }
    }

    // Significance threshold
    let threshold = -config.p_thresh.log10();
    chart.draw_series(DashedLineSeries::new(
        vec![(x_min, threshold), (x_max, threshold)],
        4,
        3,
        BLACK.mix(0.8).into(),
    ))?;

    // Chromosome name under the midpoint of each span
    let tick_style = ("sans-serif", 15)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (mid, label) in chrom_ticks(layout) {
        chart.draw_series(std::iter::once(
            EmptyElement::at((mid, y_low)) + Text::new(label, (0, 4), tick_style.clone()),
        ))?;
    }

    Ok(())
}
