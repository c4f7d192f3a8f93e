use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::record::FeatureRecord;
use crate::error::Result;
use crate::logic::features;
use crate::logic::session::Session;

/// Extract every session and write one JSON record per line.
/// Returns the number of records written
pub fn features_to_jsonl(sessions: &[Session], target_path: &Path) -> Result<usize> {
    // Extract everything first so a bad session leaves no partial file
    let vectors = features::extract_all(sessions)?;

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Create target file (truncate if exists)
    let mut output = BufWriter::new(File::create(target_path)?);
    for (session, vector) in sessions.iter().zip(&vectors) {
        let record = FeatureRecord::from_vector(session.id(), vector);
        serde_json::to_writer(&mut output, &record)?;
        output.write_all(b"\n")?;
    }

    output.flush()?;
    log::info!("Exported {} feature records to {:?}", vectors.len(), target_path);
    Ok(vectors.len())
}

/// Read records back from a JSONL export, skipping blank lines
pub fn read_jsonl(path: &Path) -> Result<Vec<FeatureRecord>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}
