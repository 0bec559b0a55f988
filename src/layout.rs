use crate::types::{ChromSpan, SelectedVariant};
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Chromosome layout on the shared normalized x-axis.
///
/// Computed once per run from the union of all selected variants across all
/// datasets, then consumed read-only by the coordinate mapper and renderer.
#[derive(Debug, Clone)]
pub struct ChromLayout {
    pub chroms: Vec<ChromSpan>,
    /// Span of the chromosome at index 0; the unit of the x-axis
    pub ref_unit_size: f64,
}

impl ChromLayout {
    pub fn get(&self, chrom: &str) -> Option<&ChromSpan> {
        self.chroms.iter().find(|c| c.chrom == chrom)
    }

    /// Right edge of the last chromosome on the normalized axis.
    pub fn x_end(&self) -> f64 {
        self.chroms
            .last()
            .map(|c| c.start + c.rel_size)
            .unwrap_or(0.0)
    }
}

/// Lay out chromosomes left-to-right on a normalized x-axis.
///
/// Chromosomes are included and ordered according to `chr2use`, restricted to
/// labels actually present in any dataset. Per chromosome the position range
/// is aggregated across datasets; the first included chromosome defines the
/// unit size and starts at 0; each later chromosome starts after the previous
/// one plus `gap`. Every included chromosome must span more than one position,
/// keeping all relative sizes positive.
pub fn compute_layout(
    datasets: &[Vec<SelectedVariant>],
    gap: f64,
    chr2use: &[String],
) -> Result<ChromLayout> {
    if gap < 0.0 {
        bail!("--between-chr-gap must be non-negative, got {}", gap);
    }

    // position range per chromosome, aggregated over all datasets
    let mut ranges: HashMap<&str, (f64, f64)> = HashMap::new();
    for dataset in datasets {
        for v in dataset {
            let entry = ranges
                .entry(v.chrom.as_str())
                .or_insert((f64::INFINITY, f64::NEG_INFINITY));
            entry.0 = entry.0.min(v.pos);
            entry.1 = entry.1.max(v.pos);
        }
    }
    if ranges.is_empty() {
        bail!("No variants left to lay out");
    }

    // user-specified order filtered to chromosomes actually present
    let included: Vec<&String> = chr2use
        .iter()
        .filter(|c| ranges.contains_key(c.as_str()))
        .collect();
    if included.is_empty() {
        bail!("None of the requested chromosomes is present in the selected variants");
    }

    let (ref_min, ref_max) = ranges[included[0].as_str()];
    let ref_unit_size = ref_max - ref_min;

    let mut chroms = Vec::with_capacity(included.len());
    let mut cum_rel = 0.0;
    for (ind, chrom) in included.iter().enumerate() {
        let (min_pos, max_pos) = ranges[chrom.as_str()];
        // a single-position chromosome would collapse to rel_size 0 (and, for
        // the reference, divide the whole axis by zero)
        if max_pos - min_pos <= 0.0 {
            bail!(
                "Chromosome '{}' has zero span (single position); cannot place it on the x-axis",
                chrom
            );
        }
        let rel_size = (max_pos - min_pos) / ref_unit_size;
        chroms.push(ChromSpan {
            chrom: (*chrom).clone(),
            min_pos,
            max_pos,
            ind,
            rel_size,
            start: cum_rel + gap * ind as f64,
        });
        cum_rel += rel_size;
    }

    Ok(ChromLayout {
        chroms,
        ref_unit_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn variant(chrom: &str, pos: f64) -> SelectedVariant {
        SelectedVariant {
            id: format!("{}:{}", chrom, pos),
            chrom: chrom.to_string(),
            pos,
            pval: 0.01,
            outlined: false,
            bold: false,
            annot: String::new(),
            x_coord: f64::NAN,
            log10p: f64::NAN,
        }
    }

    fn order(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_chromosomes_with_gap() {
        // chr1 spans 0..1000, chr2 spans 0..500, gap 0.1
        let dataset = vec![
            variant("1", 0.0),
            variant("1", 1000.0),
            variant("2", 0.0),
            variant("2", 500.0),
        ];
        let layout = compute_layout(&[dataset], 0.1, &order(&["1", "2"])).unwrap();

        let c1 = layout.get("1").unwrap();
        assert_eq!(c1.start, 0.0);
        assert_relative_eq!(c1.rel_size, 1.0);

        let c2 = layout.get("2").unwrap();
        assert_relative_eq!(c2.start, 1.1);
        assert_relative_eq!(c2.rel_size, 0.5);
    }

    #[test]
    fn reference_chromosome_is_normalized() {
        let dataset = vec![
            variant("3", 500.0),
            variant("3", 2500.0),
            variant("7", 0.0),
            variant("7", 4000.0),
        ];
        let layout = compute_layout(&[dataset], 0.2, &order(&["3", "7"])).unwrap();
        let first = &layout.chroms[0];
        assert_eq!(first.chrom, "3");
        assert_eq!(first.start, 0.0);
        assert_relative_eq!(first.rel_size, 1.0);
        assert_relative_eq!(layout.ref_unit_size, 2000.0);
    }

    #[test]
    fn no_overlap_with_nonnegative_gap() {
        let dataset = vec![
            variant("1", 0.0),
            variant("1", 900.0),
            variant("2", 10.0),
            variant("2", 2000.0),
            variant("3", 5.0),
            variant("3", 150.0),
        ];
        for gap in [0.0, 0.1, 2.5] {
            let layout = compute_layout(
                std::slice::from_ref(&dataset),
                gap,
                &order(&["1", "2", "3"]),
            )
            .unwrap();
            for w in layout.chroms.windows(2) {
                assert!(w[1].start >= w[0].start + w[0].rel_size);
                assert!(w[1].start > w[0].start);
            }
        }
    }

    #[test]
    fn ranges_aggregate_across_datasets() {
        let a = vec![variant("1", 100.0), variant("1", 1000.0)];
        let b = vec![variant("1", 50.0), variant("1", 1200.0)];
        let layout = compute_layout(&[a, b], 0.1, &order(&["1"])).unwrap();
        let c1 = layout.get("1").unwrap();
        assert_eq!(c1.min_pos, 50.0);
        assert_eq!(c1.max_pos, 1200.0);
    }

    #[test]
    fn chr2use_controls_inclusion_and_order() {
        let dataset = vec![
            variant("1", 0.0),
            variant("1", 100.0),
            variant("2", 0.0),
            variant("2", 100.0),
            variant("X", 0.0),
            variant("X", 100.0),
        ];
        // "2" first makes it the reference; "1" is excluded entirely
        let layout = compute_layout(&[dataset], 0.1, &order(&["2", "X"])).unwrap();
        let labels: Vec<&str> = layout.chroms.iter().map(|c| c.chrom.as_str()).collect();
        assert_eq!(labels, vec!["2", "X"]);
        assert!(layout.get("1").is_none());
    }

    #[test]
    fn single_position_reference_is_an_error() {
        let dataset = vec![variant("1", 42.0)];
        let err = compute_layout(&[dataset], 0.1, &order(&["1"])).unwrap_err();
        assert!(err.to_string().contains("zero span"));
    }

    #[test]
    fn single_position_nonreference_is_an_error() {
        let dataset = vec![
            variant("1", 0.0),
            variant("1", 1000.0),
            variant("2", 42.0),
        ];
        let err = compute_layout(&[dataset], 0.1, &order(&["1", "2"])).unwrap_err();
        assert!(err.to_string().contains("zero span"));
        assert!(err.to_string().contains("'2'"));
    }

    #[test]
    fn absent_chromosomes_are_an_error() {
        let dataset = vec![variant("5", 0.0), variant("5", 10.0)];
        assert!(compute_layout(&[dataset], 0.1, &order(&["1", "2"])).is_err());
    }
}
