mod manhattan;

use crate::layout::ChromLayout;
use crate::types::SelectedVariant;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// Output format for plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotFormat {
    Png,
    Svg,
}

impl PlotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        }
    }
}

/// Check that the output file name agrees with the chosen plot format, so a
/// `.png` path never receives SVG bytes (or vice versa).
pub fn validate_out_path(path: &str, format: PlotFormat) -> Result<()> {
    let ext = Path::new(path).extension().and_then(|e| e.to_str());
    match ext {
        Some(ext) if ext.eq_ignore_ascii_case(format.extension()) => Ok(()),
        Some(ext) => anyhow::bail!(
            "--out '{}' has extension '{}' but the plot format is '{}'",
            path,
            ext,
            format.extension()
        ),
        None => anyhow::bail!(
            "--out '{}' has no file extension; expected '.{}'",
            path,
            format.extension()
        ),
    }
}

/// Configuration for plot generation.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub format: PlotFormat,
    /// Significance threshold in p-value units
    pub p_thresh: f64,
    /// Shade every second chromosome's span
    pub striped_background: bool,
    pub y_label: String,
}

/// One dataset ready for drawing: mapped variants plus its point transparency.
pub struct PlotDataset<'a> {
    pub variants: &'a [SelectedVariant],
    pub transparency: f64,
}

// colors from http://mkweb.bcgsc.ca/colorblind/
pub const COLOR_BLUE: RGBColor = RGBColor(0, 114, 178); // #0072b2
pub const COLOR_ORANGE: RGBColor = RGBColor(230, 159, 0); // #e69f00
pub const COLOR_BLUISH_GREEN: RGBColor = RGBColor(0, 158, 115); // #009e73
pub const COLOR_REDDISH_PURPLE: RGBColor = RGBColor(204, 121, 167); // #cc79a7
pub const COLOR_VERMILLION: RGBColor = RGBColor(213, 94, 0); // #d55e00
pub const COLOR_SKY_BLUE: RGBColor = RGBColor(86, 180, 233); // #56b4e9
pub const COLOR_YELLOW: RGBColor = RGBColor(240, 228, 66); // #f0e442
pub const COLOR_STRIPE: RGBColor = RGBColor(174, 167, 159); // #aea79f

/// Dataset color cycle, indexed modulo its length.
pub const DATASET_COLORS: [RGBColor; 7] = [
    COLOR_BLUE,
    COLOR_ORANGE,
    COLOR_BLUISH_GREEN,
    COLOR_REDDISH_PURPLE,
    COLOR_VERMILLION,
    COLOR_SKY_BLUE,
    COLOR_YELLOW,
];

pub fn dataset_color(i: usize) -> RGBColor {
    DATASET_COLORS[i % DATASET_COLORS.len()]
}

/// Upper y-axis bound: the larger of the observed maximum -log10(p) and the
/// threshold line, scaled by 1.05.
fn y_axis_upper(datasets: &[PlotDataset], p_thresh: f64) -> f64 {
    let mut y_up = -p_thresh.log10();
    for ds in datasets {
        for v in ds.variants {
            if v.log10p > y_up {
                y_up = v.log10p;
            }
        }
    }
    y_up * 1.05
}

/// X tick positions (chromosome midpoints) and their labels.
fn chrom_ticks(layout: &ChromLayout) -> Vec<(f64, String)> {
    layout
        .chroms
        .iter()
        .map(|c| (c.start + 0.5 * c.rel_size, c.chrom.clone()))
        .collect()
}

/// Render the Manhattan plot and write it to `path`.
pub fn plot_manhattan(
    datasets: &[PlotDataset],
    layout: &ChromLayout,
    config: &PlotConfig,
    path: &Path,
) -> Result<()> {
    match config.format {
        PlotFormat::Png => {
            let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
            manhattan::draw_manhattan(&root, datasets, layout, config)?;
            root.present()?;
        }
        PlotFormat::Svg => {
            let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
            manhattan::draw_manhattan(&root, datasets, layout, config)?;
            root.present()?;
        }
    }
    Ok(())
}
