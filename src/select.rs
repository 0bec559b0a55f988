use crate::config::DatasetConfig;
use crate::idlists;
use crate::types::{SelectedVariant, Variant};
use anyhow::{Context, Result};
use rand::Rng;
use std::collections::{HashMap, HashSet};

macro_rules! progress {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

/// Sampling weights proportional to -log10(p), normalized to sum to 1.
///
/// More significant variants are more likely to survive downsampling.
fn sampling_weights(variants: &[Variant]) -> Vec<f64> {
    let mut weights: Vec<f64> = variants.iter().map(|v| -v.pval.log10()).collect();
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in &mut weights {
            *w /= total;
        }
    }
    weights
}

/// Decide which variants of a filtered table appear in the plot.
///
/// Forced-include sets (outlined ∪ lead, bold ∪ indep, annotated) are unioned
/// with a weighted random sample of `downsample_frac * row_count` ids drawn
/// without replacement. Ids named in highlight files but absent from the
/// table are silently dropped. Input row order is preserved in the output.
pub fn select_variants(
    variants: Vec<Variant>,
    config: &DatasetConfig,
    rng: &mut impl Rng,
    quiet: bool,
) -> Result<Vec<SelectedVariant>> {
    progress!(quiet, "Preparing SNPs for plotting");

    let mut outlined_ids = idlists::read_id_list(&config.outlined_file)?;
    outlined_ids.extend(idlists::read_lead(&config.lead_file)?);
    let mut bold_ids = idlists::read_id_list(&config.bold_file)?;
    bold_ids.extend(idlists::read_indep(&config.indep_file)?);
    let annots = idlists::read_annot(&config.annot_file)?;

    let table_ids: HashSet<&str> = variants.iter().map(|v| v.id.as_str()).collect();
    outlined_ids.retain(|id| table_ids.contains(id.as_str()));
    bold_ids.retain(|id| table_ids.contains(id.as_str()));
    let annot_labels: HashMap<&str, &str> = annots
        .iter()
        .filter(|(id, _)| table_ids.contains(id.as_str()))
        .map(|(id, label)| (id.as_str(), label.as_str()))
        .collect();

    let n = (config.downsample_frac * variants.len() as f64).floor() as usize;
    let weights = sampling_weights(&variants);
    let sampled = rand::seq::index::sample_weighted(rng, variants.len(), |i| weights[i], n)
        .with_context(|| format!("Weighted downsampling of {} failed", config.sumstats))?;
    let sampled_rows: HashSet<usize> = sampled.into_iter().collect();

    let mut selected = Vec::new();
    for (i, v) in variants.into_iter().enumerate() {
        let outlined = outlined_ids.contains(&v.id);
        let bold = bold_ids.contains(&v.id);
        // annot-file membership forces inclusion even when the label is empty
        let annot = annot_labels.get(v.id.as_str()).copied();
        if outlined || bold || annot.is_some() || sampled_rows.contains(&i) {
            let annot = annot.unwrap_or("").to_string();
            selected.push(SelectedVariant::new(v, outlined, bold, annot));
        }
    }

    progress!(quiet, "{} outlined SNPs", outlined_ids.len());
    progress!(quiet, "{} bold SNPs", bold_ids.len());
    progress!(quiet, "{} annotated SNPs", annot_labels.len());
    progress!(quiet, "{} SNPs will be plotted in total", selected.len());
    Ok(selected)
}
