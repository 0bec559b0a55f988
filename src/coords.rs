use crate::layout::ChromLayout;
use crate::types::SelectedVariant;
use anyhow::{Context, Result};

/// Fill in plot coordinates for each selected variant.
///
/// x = (position - chromosome min) / reference unit size + chromosome start;
/// y = -log10(p). Pure function of the layout and the variant's own fields.
pub fn add_coords(variants: &mut [SelectedVariant], layout: &ChromLayout) -> Result<()> {
    for v in variants.iter_mut() {
        let span = layout
            .get(&v.chrom)
            .with_context(|| format!("Chromosome '{}' missing from layout", v.chrom))?;
        v.x_coord = (v.pos - span.min_pos) / layout.ref_unit_size + span.start;
        v.log10p = -v.pval.log10();
    }
    Ok(())
}
