use crate::error::{LocalizeError, Result};
use crate::map::{VehiclePosition, VehicleTrack};

use csv::ReaderBuilder;
use std::io::Read;

const SOURCE: &str = "vehicle coordinates";

/// Reads `image_name, lat, lon, x, y` rows after one header row.
///
/// Columns are taken by position; the header text is ignored.
pub fn read_vehicle_coords<R: Read>(reader: R, delimiter: u8) -> Result<VehicleTrack> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = vec![];
    for (i, record) in reader.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let record = record.map_err(|e| LocalizeError::malformed(SOURCE, line, e.to_string()))?;
        let row: VehiclePosition = record
            .deserialize(None)
            .map_err(|e| LocalizeError::malformed(SOURCE, line, e.to_string()))?;
        rows.push(row);
    }

    log::debug!("vehicle positions: {}", rows.len());
    Ok(VehicleTrack::new(rows))
}
