use crate::config::DatasetConfig;
use crate::types::Variant;
use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

macro_rules! progress {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

/// Open a sumstats file, transparently decompressing `.gz` inputs.
fn open_maybe_gzip(path: &Path) -> Result<Box<dyn Read>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open sumstats file: {}", path.display()))?;
    let is_gz = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
    if is_gz {
        Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn make_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner} [{elapsed_precise}] {pos} {msg}").unwrap(),
    );
    pb
}

/// Treat the usual table encodings of a missing value as missing.
fn is_missing(field: &str) -> bool {
    field.is_empty() || field.eq_ignore_ascii_case("na") || field.eq_ignore_ascii_case("nan")
}

/// Load and filter one summary-statistics table.
///
/// Only the id/chromosome/position/p-value columns are read. Rows are dropped
/// when the p-value is missing, when the chromosome is not in `chr2use`, or
/// when the p-value is not strictly positive. Fails if the file or any of the
/// four columns is absent.
pub fn load_sumstats(
    config: &DatasetConfig,
    chr2use: &HashSet<String>,
    quiet: bool,
) -> Result<Vec<Variant>> {
    let path = Path::new(&config.sumstats);
    progress!(quiet, "Filtering {}", config.sumstats);

    let reader = open_maybe_gzip(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .with_context(|| format!("Failed to read header of {}", config.sumstats))?
        .clone();
    let col_idx = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).with_context(|| {
            format!("Column '{}' not found in {}", name, config.sumstats)
        })
    };
    let snp_idx = col_idx(&config.snp_col)?;
    let chr_idx = col_idx(&config.chr_col)?;
    let bp_idx = col_idx(&config.bp_col)?;
    let p_idx = col_idx(&config.p_col)?;

    let pb = make_spinner(quiet);
    pb.set_message("rows read");

    let mut n_total: u64 = 0;
    let mut n_defined_p: u64 = 0;
    let mut n_in_chroms: u64 = 0;
    let mut variants = Vec::new();

    for (row, record) in rdr.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to parse {} row {}", config.sumstats, row + 2))?;
        n_total += 1;
        pb.inc(1);

        let get = |idx: usize| -> Result<&str> {
            record
                .get(idx)
                .with_context(|| format!("{} row {}: too few columns", config.sumstats, row + 2))
        };

        let p_field = get(p_idx)?;
        if is_missing(p_field) {
            continue;
        }
        n_defined_p += 1;

        let chrom = get(chr_idx)?;
        if !chr2use.contains(chrom) {
            continue;
        }
        n_in_chroms += 1;

        let pval: f64 = p_field.parse().with_context(|| {
            format!(
                "{} row {}: invalid p-value '{}'",
                config.sumstats,
                row + 2,
                p_field
            )
        })?;
        if !(pval > 0.0) {
            continue;
        }

        let pos_field = get(bp_idx)?;
        let pos: f64 = pos_field.parse().with_context(|| {
            format!(
                "{} row {}: invalid position '{}'",
                config.sumstats,
                row + 2,
                pos_field
            )
        })?;

        variants.push(Variant {
            id: get(snp_idx)?.to_string(),
            chrom: chrom.to_string(),
            pos,
            pval,
        });
    }
    pb.finish_and_clear();

    progress!(quiet, "{} SNPs in {}", n_total, config.sumstats);
    progress!(quiet, "{} SNPs with defined p-value", n_defined_p);
    progress!(quiet, "{} SNPs within specified chromosomes", n_in_chroms);
    progress!(quiet, "{} SNPs with non-zero p-value", variants.len());

    if variants.is_empty() {
        bail!("No variants left in {} after filtering", config.sumstats);
    }
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_config(path: &str) -> DatasetConfig {
        DatasetConfig {
            sumstats: path.to_string(),
            delimiter: b'\t',
            snp_col: "SNP".to_string(),
            chr_col: "CHR".to_string(),
            bp_col: "BP".to_string(),
            p_col: "PVAL".to_string(),
            outlined_file: "NA".to_string(),
            bold_file: "NA".to_string(),
            lead_file: "NA".to_string(),
            indep_file: "NA".to_string(),
            annot_file: "NA".to_string(),
            downsample_frac: 1.0,
            transparency: 1.0,
        }
    }

    fn write_sumstats(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn chroms(labels: &[&str]) -> HashSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_missing_and_nonpositive_pvalues() {
        let f = write_sumstats(
            "SNP\tCHR\tBP\tPVAL\n\
             rs1\t1\t100\t0.01\n\
             rs2\t1\t200\tNA\n\
             rs3\t1\t300\t0\n\
             rs4\t1\t400\t-1\n\
             rs5\t1\t500\t1e-8\n",
        );
        let config = test_config(f.path().to_str().unwrap());
        let variants = load_sumstats(&config, &chroms(&["1"]), true).unwrap();
        let ids: Vec<&str> = variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["rs1", "rs5"]);
        assert!(variants.iter().all(|v| v.pval > 0.0));
    }

    #[test]
    fn restricts_to_requested_chromosomes() {
        let f = write_sumstats(
            "SNP\tCHR\tBP\tPVAL\n\
             rs1\t1\t100\t0.01\n\
             rs2\t2\t200\t0.01\n\
             rs3\tX\t300\t0.01\n",
        );
        let config = test_config(f.path().to_str().unwrap());
        let variants = load_sumstats(&config, &chroms(&["1", "X"]), true).unwrap();
        let ids: Vec<&str> = variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["rs1", "rs3"]);
        assert_eq!(variants[1].chrom, "X");
    }

    #[test]
    fn missing_column_is_an_error() {
        let f = write_sumstats("SNP\tCHR\tBP\n rs1\t1\t100\n");
        let config = test_config(f.path().to_str().unwrap());
        let err = load_sumstats(&config, &chroms(&["1"]), true).unwrap_err();
        assert!(err.to_string().contains("PVAL"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let config = test_config("/no/such/file.tsv");
        assert!(load_sumstats(&config, &chroms(&["1"]), true).is_err());
    }

    #[test]
    fn reads_gzipped_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sumstats.tsv.gz");
        let file = File::create(&path).unwrap();
        let mut enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        enc.write_all(b"SNP\tCHR\tBP\tPVAL\nrs1\t1\t100\t0.05\n")
            .unwrap();
        enc.finish().unwrap();

        let config = test_config(path.to_str().unwrap());
        let variants = load_sumstats(&config, &chroms(&["1"]), true).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].id, "rs1");
    }
}
