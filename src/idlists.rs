//! Adapters extracting forced-include variant ids from the various highlight
//! file formats. Each reader treats the literal file name "NA" as an empty
//! set, so callers never special-case absent options.

use anyhow::{Context, Result};
use std::collections::HashSet;

fn tab_reader(fname: &str, has_headers: bool) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_path(fname)
        .with_context(|| format!("Failed to open '{}'", fname))
}

/// Read a headerless single-column list of variant ids (--outlined / --bold).
pub fn read_id_list(fname: &str) -> Result<HashSet<String>> {
    if fname == "NA" {
        return Ok(HashSet::new());
    }
    let mut rdr = tab_reader(fname, false)?;
    let mut ids = HashSet::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("{} row {}", fname, row + 1))?;
        let id = record
            .get(0)
            .with_context(|| format!("{} row {}: empty line", fname, row + 1))?;
        if !id.is_empty() {
            ids.insert(id.to_string());
        }
    }
    Ok(ids)
}

/// Read a headerless two-column id + label annotation file.
///
/// Returns (id, label) pairs in file order.
pub fn read_annot(fname: &str) -> Result<Vec<(String, String)>> {
    if fname == "NA" {
        return Ok(Vec::new());
    }
    let mut rdr = tab_reader(fname, false)?;
    let mut annots = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("{} row {}", fname, row + 1))?;
        let id = record
            .get(0)
            .with_context(|| format!("{} row {}: missing id column", fname, row + 1))?;
        let label = record
            .get(1)
            .with_context(|| format!("{} row {}: missing label column", fname, row + 1))?;
        annots.push((id.to_string(), label.to_string()));
    }
    Ok(annots)
}

/// Read lead-variant ids from a clumping output table.
///
/// The table has a header with a boolean `is_locus_lead` column and a
/// `LEAD_SNP` id column; ids are taken from rows flagged as locus leads.
pub fn read_lead(fname: &str) -> Result<HashSet<String>> {
    if fname == "NA" {
        return Ok(HashSet::new());
    }
    let mut rdr = tab_reader(fname, true)?;
    let headers = rdr.headers()?.clone();
    let lead_idx = headers
        .iter()
        .position(|h| h == "LEAD_SNP")
        .with_context(|| format!("Column 'LEAD_SNP' not found in {}", fname))?;
    let flag_idx = headers
        .iter()
        .position(|h| h == "is_locus_lead")
        .with_context(|| format!("Column 'is_locus_lead' not found in {}", fname))?;

    let mut ids = HashSet::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("{} row {}", fname, row + 2))?;
        let flag = record
            .get(flag_idx)
            .with_context(|| format!("{} row {}: missing is_locus_lead", fname, row + 2))?;
        if matches!(flag, "True" | "true" | "TRUE" | "1") {
            let id = record
                .get(lead_idx)
                .with_context(|| format!("{} row {}: missing LEAD_SNP", fname, row + 2))?;
            ids.insert(id.to_string());
        }
    }
    Ok(ids)
}

/// Read independent-significant variant ids from a clumping output table
/// (header with an `INDEP_SNP` id column).
pub fn read_indep(fname: &str) -> Result<HashSet<String>> {
    if fname == "NA" {
        return Ok(HashSet::new());
    }
    let mut rdr = tab_reader(fname, true)?;
    let headers = rdr.headers()?.clone();
    let indep_idx = headers
        .iter()
        .position(|h| h == "INDEP_SNP")
        .with_context(|| format!("Column 'INDEP_SNP' not found in {}", fname))?;

    let mut ids = HashSet::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("{} row {}", fname, row + 2))?;
        let id = record
            .get(indep_idx)
            .with_context(|| format!("{} row {}: missing INDEP_SNP", fname, row + 2))?;
        ids.insert(id.to_string());
    }
    Ok(ids)
}
