use anyhow::Result;
use clap::Parser;
use manplot::plotting::{self, PlotConfig, PlotDataset, PlotFormat};
use manplot::{config, coords, layout, select, sumstats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::path::Path;

#[derive(Parser)]
#[command(name = "manplot")]
#[command(version)]
#[command(about = "Draw a Manhattan plot from summary-statistics files", long_about = None)]
struct Args {
    /// Summary-statistics files (one or more)
    #[arg(required = true)]
    sumstats: Vec<String>,

    /// Column separator per sumstat file (tab, comma, space, semicolon or a single character)
    #[arg(long, num_args = 1.., default_values_t = vec!["tab".to_string()])]
    sep: Vec<String>,

    /// Column with variant ids per sumstat file
    #[arg(long, num_args = 1.., default_values_t = vec!["SNP".to_string()])]
    snp: Vec<String>,

    /// Column with variant chromosomes per sumstat file
    #[arg(long = "chr", num_args = 1.., default_values_t = vec!["CHR".to_string()])]
    chr: Vec<String>,

    /// Column with variant positions per sumstat file
    #[arg(long, num_args = 1.., default_values_t = vec!["BP".to_string()])]
    bp: Vec<String>,

    /// Column with variant p-values per sumstat file
    #[arg(long, num_args = 1.., default_values_t = vec!["PVAL".to_string()])]
    p: Vec<String>,

    /// Files with ids of variants to mark with outlined bold dots, 'NA' if absent.
    /// A single id column, no header
    #[arg(long, num_args = 1.., default_values_t = vec!["NA".to_string()])]
    outlined: Vec<String>,

    /// Files with ids of variants to mark with bold dots, 'NA' if absent.
    /// A single id column, no header
    #[arg(long, num_args = 1.., default_values_t = vec!["NA".to_string()])]
    bold: Vec<String>,

    /// Files with ids (1st column) and labels (2nd column) of variants to
    /// annotate, 'NA' if absent. No header
    #[arg(long, num_args = 1.., default_values_t = vec!["NA".to_string()])]
    annot: Vec<String>,

    /// Clumping output files with lead variants (columns 'is_locus_lead' and
    /// 'LEAD_SNP'); lead ids are added to the outlined set. 'NA' if absent
    #[arg(long, num_args = 1.., default_values_t = vec!["NA".to_string()])]
    lead: Vec<String>,

    /// Clumping output files with independent significant variants (column
    /// 'INDEP_SNP'); their ids are added to the bold set. 'NA' if absent
    #[arg(long, num_args = 1.., default_values_t = vec!["NA".to_string()])]
    indep: Vec<String>,

    /// Significance threshold for p-values
    #[arg(long = "p-thresh", default_value = "5e-8")]
    p_thresh: f64,

    /// Transparency level of points per sumstat file, in [0, 1]
    #[arg(long, num_args = 1.., default_values_t = vec![1.0])]
    transparency: Vec<f64>,

    /// Size of the gap between chromosomes in the figure
    #[arg(long = "between-chr-gap", default_value = "0.1")]
    between_chr_gap: f64,

    /// Fraction of variants to sample for plotting per sumstat file, in (0, 1]
    #[arg(long = "downsample-frac", num_args = 1.., default_values_t = vec![0.005])]
    downsample_frac: Vec<f64>,

    /// Chromosome ids to plot (e.g. 1,2,3 or 1-4,12,16-20 or 19-22,X,Y).
    /// The order in the figure follows the order in this argument
    #[arg(long, default_value = "1-22")]
    chr2use: String,

    /// Draw grey background for every second chromosome
    #[arg(long = "striped-background")]
    striped_background: bool,

    /// Random seed for the weighted downsampling
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Out file name
    #[arg(long, default_value = "manhattan.png")]
    out: String,

    /// Output image width in pixels
    #[arg(long, default_value = "2800")]
    width: u32,

    /// Output image height in pixels
    #[arg(long, default_value = "1000")]
    height: u32,

    /// Plot output format: "png" (default) or "svg"
    #[arg(long = "plot-format", default_value = "png")]
    plot_format: String,

    /// Y-axis label
    #[arg(long = "y-label", default_value = "-log10(conjFDR)")]
    y_label: String,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

macro_rules! progress {
    ($quiet:expr) => {
        if !$quiet {
            eprintln!();
        }
    };
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

fn parse_plot_format(s: &str) -> Result<PlotFormat> {
    match s.to_lowercase().as_str() {
        "png" => Ok(PlotFormat::Png),
        "svg" => Ok(PlotFormat::Svg),
        other => anyhow::bail!("Invalid --plot-format '{}'. Must be 'png' or 'svg'", other),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve and validate everything before touching any input data
    let format = parse_plot_format(&args.plot_format)?;
    plotting::validate_out_path(&args.out, format)?;
    if args.p_thresh <= 0.0 {
        anyhow::bail!("--p-thresh must be positive, got {}", args.p_thresh);
    }
    if args.between_chr_gap < 0.0 {
        anyhow::bail!(
            "--between-chr-gap must be non-negative, got {}",
            args.between_chr_gap
        );
    }
    let chr2use = config::parse_chromosome_list(&args.chr2use)?;
    let configs = config::build_dataset_configs(&config::RawOptions {
        sumstats: args.sumstats.clone(),
        sep: args.sep.clone(),
        snp: args.snp.clone(),
        chr: args.chr.clone(),
        bp: args.bp.clone(),
        p: args.p.clone(),
        outlined: args.outlined.clone(),
        bold: args.bold.clone(),
        lead: args.lead.clone(),
        indep: args.indep.clone(),
        annot: args.annot.clone(),
        downsample_frac: args.downsample_frac.clone(),
        transparency: args.transparency.clone(),
    })?;

    progress!(args.quiet, "Manhattan plot");
    progress!(args.quiet, "=========================================");
    for c in &configs {
        progress!(args.quiet, "Input sumstats: {}", c.sumstats);
    }
    progress!(args.quiet, "Chromosomes: {}", args.chr2use);
    progress!(args.quiet, "P threshold: {}", args.p_thresh);
    progress!(args.quiet, "Seed: {}", args.seed);
    progress!(args.quiet, "Output: {}", args.out);
    progress!(args.quiet);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let chr_set: HashSet<String> = chr2use.iter().cloned().collect();

    // filter -> select, one dataset at a time
    let mut datasets = Vec::with_capacity(configs.len());
    for c in &configs {
        let variants = sumstats::load_sumstats(c, &chr_set, args.quiet)?;
        let selected = select::select_variants(variants, c, &mut rng, args.quiet)?;
        datasets.push(selected);
        progress!(args.quiet);
    }

    // layout aggregates across datasets, then coordinates per dataset
    let chrom_layout = layout::compute_layout(&datasets, args.between_chr_gap, &chr2use)?;
    for ds in &mut datasets {
        coords::add_coords(ds, &chrom_layout)?;
    }

    progress!(args.quiet, "Making plot");
    let plot_config = PlotConfig {
        width: args.width,
        height: args.height,
        format,
        p_thresh: args.p_thresh,
        striped_background: args.striped_background,
        y_label: args.y_label.clone(),
    };
    let plot_datasets: Vec<PlotDataset> = datasets
        .iter()
        .zip(&configs)
        .map(|(ds, c)| PlotDataset {
            variants: ds,
            transparency: c.transparency,
        })
        .collect();
    plotting::plot_manhattan(&plot_datasets, &chrom_layout, &plot_config, Path::new(&args.out))?;

    progress!(args.quiet, "{} was generated", args.out);
    Ok(())
}
