use anyhow::{bail, Result};
use std::path::Path;

/// Fully resolved configuration for one input dataset.
///
/// List-valued CLI options are broadcast (single value) or matched one-to-one
/// against the sumstats files before the pipeline runs, so downstream code
/// never sees option lists.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub sumstats: String,
    pub delimiter: u8,
    pub snp_col: String,
    pub chr_col: String,
    pub bp_col: String,
    pub p_col: String,
    pub outlined_file: String,
    pub bold_file: String,
    pub lead_file: String,
    pub indep_file: String,
    pub annot_file: String,
    pub downsample_frac: f64,
    pub transparency: f64,
}

/// Raw list-valued options as parsed from the command line.
pub struct RawOptions {
    pub sumstats: Vec<String>,
    pub sep: Vec<String>,
    pub snp: Vec<String>,
    pub chr: Vec<String>,
    pub bp: Vec<String>,
    pub p: Vec<String>,
    pub outlined: Vec<String>,
    pub bold: Vec<String>,
    pub lead: Vec<String>,
    pub indep: Vec<String>,
    pub annot: Vec<String>,
    pub downsample_frac: Vec<f64>,
    pub transparency: Vec<f64>,
}

/// Broadcast a list option to one value per dataset.
///
/// A single value is repeated n times; a list of exactly n values is taken
/// as-is; anything else is rejected.
pub fn broadcast<T: Clone>(values: &[T], n: usize, option: &str) -> Result<Vec<T>> {
    if values.len() == n {
        Ok(values.to_vec())
    } else if values.len() == 1 {
        Ok(vec![values[0].clone(); n])
    } else {
        bail!(
            "{} should have a value for each sumstat file or a single value (got {}, expected 1 or {})",
            option,
            values.len(),
            n
        );
    }
}

/// Parse a separator argument into a single-byte csv delimiter.
pub fn parse_separator(sep: &str) -> Result<u8> {
    match sep {
        "\t" | "\\t" | "tab" => Ok(b'\t'),
        "," | "comma" => Ok(b','),
        ";" | "semicolon" => Ok(b';'),
        " " | "space" => Ok(b' '),
        s if s.len() == 1 => Ok(s.as_bytes()[0]),
        other => bail!("Invalid --sep '{}': expected a single character or tab/comma/space/semicolon", other),
    }
}

/// Expand a chromosome selection string into an ordered list of labels.
///
/// Comma-separated entries; an integer range like "1-22" expands to
/// "1","2",...,"22"; anything else ("X", "MT") is taken literally. The
/// resulting order is the plotting order.
pub fn parse_chromosome_list(chr2use: &str) -> Result<Vec<String>> {
    let mut chroms = Vec::new();
    for entry in chr2use.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            bail!("Empty entry in --chr2use '{}'", chr2use);
        }
        if let Some((lo, hi)) = entry.split_once('-') {
            let lo: u64 = lo
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid chromosome range '{}' in --chr2use", entry))?;
            let hi: u64 = hi
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid chromosome range '{}' in --chr2use", entry))?;
            if lo > hi {
                bail!("Invalid chromosome range '{}': start exceeds end", entry);
            }
            for c in lo..=hi {
                chroms.push(c.to_string());
            }
        } else {
            chroms.push(entry.to_string());
        }
    }
    Ok(chroms)
}

fn ensure_file_exists(path: &str, option: &str) -> Result<()> {
    if !Path::new(path).is_file() {
        bail!("{} file '{}' doesn't exist", option, path);
    }
    Ok(())
}

fn ensure_optional_file(path: &str, option: &str) -> Result<()> {
    if path != "NA" {
        ensure_file_exists(path, option)?;
    }
    Ok(())
}

/// Resolve raw list options into one `DatasetConfig` per sumstats file.
///
/// All validation happens here, before any input is read: file existence,
/// broadcast counts, separator syntax and numeric ranges.
pub fn build_dataset_configs(raw: &RawOptions) -> Result<Vec<DatasetConfig>> {
    let n = raw.sumstats.len();

    let sep = broadcast(&raw.sep, n, "--sep")?;
    let snp = broadcast(&raw.snp, n, "--snp")?;
    let chr = broadcast(&raw.chr, n, "--chr")?;
    let bp = broadcast(&raw.bp, n, "--bp")?;
    let p = broadcast(&raw.p, n, "--p")?;
    let outlined = broadcast(&raw.outlined, n, "--outlined")?;
    let bold = broadcast(&raw.bold, n, "--bold")?;
    let lead = broadcast(&raw.lead, n, "--lead")?;
    let indep = broadcast(&raw.indep, n, "--indep")?;
    let annot = broadcast(&raw.annot, n, "--annot")?;
    let downsample_frac = broadcast(&raw.downsample_frac, n, "--downsample-frac")?;
    let transparency = broadcast(&raw.transparency, n, "--transparency")?;

    let mut configs = Vec::with_capacity(n);
    for i in 0..n {
        ensure_file_exists(&raw.sumstats[i], "sumstats")?;
        ensure_optional_file(&outlined[i], "--outlined")?;
        ensure_optional_file(&bold[i], "--bold")?;
        ensure_optional_file(&lead[i], "--lead")?;
        ensure_optional_file(&indep[i], "--indep")?;
        ensure_optional_file(&annot[i], "--annot")?;

        if !(downsample_frac[i] > 0.0 && downsample_frac[i] <= 1.0) {
            bail!(
                "--downsample-frac must be in (0, 1], got {}",
                downsample_frac[i]
            );
        }
        if !(0.0..=1.0).contains(&transparency[i]) {
            bail!("--transparency must be in [0, 1], got {}", transparency[i]);
        }

        configs.push(DatasetConfig {
            sumstats: raw.sumstats[i].clone(),
            delimiter: parse_separator(&sep[i])?,
            snp_col: snp[i].clone(),
            chr_col: chr[i].clone(),
            bp_col: bp[i].clone(),
            p_col: p[i].clone(),
            outlined_file: outlined[i].clone(),
            bold_file: bold[i].clone(),
            lead_file: lead[i].clone(),
            indep_file: indep[i].clone(),
            annot_file: annot[i].clone(),
            downsample_frac: downsample_frac[i],
            transparency: transparency[i],
        });
    }
    Ok(configs)
}
