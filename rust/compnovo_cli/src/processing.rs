use crate::config::OutputConfig;
use crate::errors::CliError;
use compnovo::{
    CompNovo,
    Identification,
    Peak,
    PeptideCandidate,
    SearchStats,
    Spectrum,
};
use indicatif::{
    ParallelProgressIterator,
    ProgressStyle,
};
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use std::fs::File;
use std::io::{
    BufReader,
    BufWriter,
};
use std::path::Path;
use std::time::Instant;
use tracing::{
    info,
    warn,
};

/// One spectrum as read from the input file.
///
/// Exactly one of `precursor_mass` (neutral) or `precursor_mz` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub peaks: Vec<Peak>,
    #[serde(default)]
    pub precursor_mass: Option<f64>,
    #[serde(default)]
    pub precursor_mz: Option<f64>,
    pub precursor_charge: u8,
}

impl SpectrumRecord {
    pub fn to_spectrum(&self) -> Result<Spectrum, CliError> {
        let peaks = self.peaks.clone();
        match (self.precursor_mass, self.precursor_mz) {
            (Some(mass), None) => Ok(Spectrum::new(peaks, mass, self.precursor_charge)),
            (None, Some(mz)) => Ok(Spectrum::from_precursor_mz(
                peaks,
                mz,
                self.precursor_charge,
            )),
            _ => Err(CliError::ParseError {
                msg: format!(
                    "Spectrum {:?} needs exactly one of precursor_mass or precursor_mz",
                    self.id
                ),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpectrumResult {
    pub id: Option<String>,
    pub precursor_mass: f64,
    pub candidates: Vec<PeptideCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SearchStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn load_spectra(path: &Path) -> Result<Vec<SpectrumRecord>, CliError> {
    let file = File::open(path).map_err(|e| CliError::io(e, path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| CliError::ParseError {
        msg: format!("{}: {}", path.display(), e),
    })
}

pub fn main_loop(
    engine: &CompNovo,
    records: &[SpectrumRecord],
    output: &OutputConfig,
) -> Result<(), CliError> {
    let start = Instant::now();
    let spectra = records
        .iter()
        .map(SpectrumRecord::to_spectrum)
        .collect::<Result<Vec<Spectrum>, CliError>>()?;

    // Pairs share the id of their primary spectrum
    let stride = if engine.config().complementary_spectrum_enabled {
        2
    } else {
        1
    };
    let units = engine.search_units(&spectra);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| CliError::Config {
        source: e.to_string(),
    })?;
    let results: Vec<compnovo::errors::Result<Identification>> = units
        .par_iter()
        .progress_with_style(style)
        .map(|&(spectrum, complementary)| engine.identify_with_complement(spectrum, complementary))
        .collect();
    engine.log_summary(&results, start);

    let mut out = Vec::with_capacity(results.len());
    for (i, (result, (spectrum, _))) in results.into_iter().zip(units.iter()).enumerate() {
        let id = records[i * stride].id.clone();
        let entry = match result {
            Ok(ident) => SpectrumResult {
                id,
                precursor_mass: spectrum.precursor_mass,
                candidates: ident.candidates,
                stats: Some(ident.stats),
                error: None,
            },
            Err(e) => {
                warn!("Skipping spectrum {:?}: {}", id, e);
                SpectrumResult {
                    id,
                    precursor_mass: spectrum.precursor_mass,
                    candidates: Vec::new(),
                    stats: None,
                    error: Some(e.to_string()),
                }
            }
        };
        out.push(entry);
    }

    write_results(&out, &output.directory.join("candidates.json"))?;
    println!(
        "Processed {} spectra into {} results in {:?}",
        records.len(),
        out.len(),
        start.elapsed()
    );
    Ok(())
}

fn write_results(results: &[SpectrumResult], path: &Path) -> Result<(), CliError> {
    let file = File::create(path).map_err(|e| CliError::io(e, path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), results).map_err(|e| CliError::Io {
        source: e.to_string(),
        path: Some(path.to_string_lossy().to_string()),
    })?;
    info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}
