use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::Error;

/// Reads a feed file, choosing the format by extension
///
/// A malformed row fails the whole read.
pub fn read_records<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: DeserializeOwned,
{
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
        Some("csv") => {
            let file = File::open(path)?;
            csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(file)
                .deserialize()
                .collect::<Result<Vec<T>, _>>()
                .map_err(Error::from)
        }
        _ => Err(Error::InvalidData(format!(
            "Unsupported feed format: {} (expected .json or .csv)",
            path.display()
        ))),
    }
}
