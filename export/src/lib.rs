//! CSV export of analysis results.
//!
//! One directory receives four files per pool:
//!
//! | file                                   | content                     |
//! |----------------------------------------|-----------------------------|
//! | `whirlpool_<d>_backward_metrics.csv`   | backward anonset per round  |
//! | `whirlpool_<d>_forward_metrics.csv`    | forward anonset per round   |
//! | `whirlpool_<d>_tx0s_metrics.csv`       | counterparty metrics per Tx0|
//! | `whirlpool_<d>_activity_metrics.csv`   | pool activity per UTC day   |

pub mod csv;
pub mod error;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wst_metrics::Analysis;
use wst_types::Denomination;

pub use error::ExportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricFile {
    Backward,
    Forward,
    Tx0s,
    Activity,
}

impl MetricFile {
    pub const ALL: [MetricFile; 4] = [Self::Backward, Self::Forward, Self::Tx0s, Self::Activity];

    pub fn file_name(&self, denomination: Denomination) -> String {
        let family = match self {
            Self::Backward => "backward",
            Self::Forward => "forward",
            Self::Tx0s => "tx0s",
            Self::Activity => "activity",
        };
        format!("whirlpool_{}_{family}_metrics.csv", denomination.code())
    }

    fn write<W: Write>(&self, out: W, analysis: &Analysis) -> io::Result<()> {
        match self {
            Self::Backward => csv::write_rounds(out, &analysis.backward.rounds),
            Self::Forward => csv::write_rounds(out, &analysis.forward.rounds),
            Self::Tx0s => csv::write_tx0s(out, &analysis.tx0s.metrics),
            Self::Activity => csv::write_activity(out, &analysis.activity),
        }
    }
}

/// Write every result family of `analysis` into `dir`, replacing older files.
///
/// Returns the paths written, in [`MetricFile::ALL`] order.
pub fn export_all(
    analysis: &Analysis,
    dir: &Path,
    denomination: Denomination,
) -> Result<Vec<PathBuf>, ExportError> {
    if !dir.is_dir() {
        return Err(ExportError::MissingDir(dir.to_path_buf()));
    }
    let mut written = Vec::with_capacity(MetricFile::ALL.len());
    for file in MetricFile::ALL {
        let path = dir.join(file.file_name(denomination));
        debug!(path = %path.display(), "exporting");
        write_file(&path, |out| file.write(out, analysis))?;
        written.push(path);
    }
    info!(%denomination, dir = %dir.display(), files = written.len(), "export complete");
    Ok(written)
}

fn write_file<F>(path: &Path, body: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let to_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut out = BufWriter::new(File::create(path).map_err(to_error)?);
    body(&mut out).map_err(to_error)?;
    out.flush().map_err(to_error)
}
