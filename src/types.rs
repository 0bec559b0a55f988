/// A single variant read from a summary-statistics table
#[derive(Debug, Clone)]
pub struct Variant {
    pub id: String,
    pub chrom: String,
    pub pos: f64,
    pub pval: f64, // > 0, enforced by the table filter
}

/// A variant kept for plotting, with highlight flags and plot coordinates
#[derive(Debug, Clone)]
pub struct SelectedVariant {
    pub id: String,
    pub chrom: String,
    pub pos: f64,
    pub pval: f64,

    pub outlined: bool,
    pub bold: bool,
    pub annot: String, // empty = no label

    // filled in by the coordinate mapper
    pub x_coord: f64,
    pub log10p: f64,
}

impl SelectedVariant {
    pub fn new(v: Variant, outlined: bool, bold: bool, annot: String) -> Self {
        Self {
            id: v.id,
            chrom: v.chrom,
            pos: v.pos,
            pval: v.pval,
            outlined,
            bold,
            annot,
            x_coord: f64::NAN,
            log10p: f64::NAN,
        }
    }
}

/// Per-chromosome layout on the normalized x-axis
#[derive(Debug, Clone)]
pub struct ChromSpan {
    pub chrom: String,
    pub min_pos: f64,
    pub max_pos: f64,
    pub ind: usize,
    /// Span divided by the reference (first) chromosome's span
    pub rel_size: f64,
    /// Start offset on the normalized axis; the first chromosome starts at 0
    pub start: f64,
}
