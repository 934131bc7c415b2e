// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::CsvError;
use super::{HousingRecord, LabeledRecord};

/// Flat on-disk layout of a labeled record. Booleans are written as `0`/`1`.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    neighborhood: String,
    year_built: i64,
    sqft: i64,
    bedrooms: i64,
    bathrooms: f64,
    overall_quality: i64,
    condition: String,
    garage_area: i64,
    has_pool: u8,
    has_basement: u8,
    sale_price: i64,
}

impl From<&LabeledRecord> for CsvRow {
    fn from(record: &LabeledRecord) -> Self {
        let f = &record.features;
        CsvRow {
            neighborhood: f.neighborhood.clone(),
            year_built: f.year_built,
            sqft: f.sqft,
            bedrooms: f.bedrooms,
            bathrooms: f.bathrooms,
            overall_quality: f.overall_quality,
            condition: f.condition.clone(),
            garage_area: f.garage_area,
            has_pool: f.has_pool as u8,
            has_basement: f.has_basement as u8,
            sale_price: record.sale_price,
        }
    }
}

impl CsvRow {
    fn into_record(self, row: usize) -> Result<LabeledRecord, CsvError> {
        let flag = |name: &str, value: u8| match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CsvError::InvalidRecord {
                row,
                reason: format!("{} must be 0 or 1, got {}", name, other),
            }),
        };

        Ok(LabeledRecord {
            features: HousingRecord {
                neighborhood: self.neighborhood,
                year_built: self.year_built,
                sqft: self.sqft,
                bedrooms: self.bedrooms,
                bathrooms: self.bathrooms,
                overall_quality: self.overall_quality,
                condition: self.condition,
                garage_area: self.garage_area,
                has_pool: flag("has_pool", self.has_pool)?,
                has_basement: flag("has_basement", self.has_basement)?,
            },
            sale_price: self.sale_price,
        })
    }
}

/// Writes labeled records to a CSV file with a header row.
pub fn write_dataset<P: AsRef<Path>>(path: P, records: &[LabeledRecord]) -> Result<(), CsvError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    debug!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

/// Reads labeled records previously written by [`write_dataset`].
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledRecord>, CsvError> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        records.push(result?.into_record(i + 1)?);
    }

    if records.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    const HEADER: &str = "neighborhood,year_built,sqft,bedrooms,bathrooms,overall_quality,\
                          condition,garage_area,has_pool,has_basement,sale_price\n";

    #[test]
    fn test_write_then_read_dataset() {
        let records = generate(25, 3).unwrap();
        let file = NamedTempFile::new().unwrap();

        write_dataset(file.path(), &records).unwrap();
        let loaded = read_dataset(file.path()).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_read_dataset_parses_rows() {
        let content = format!("{}Rural,1999,1500,3,2.5,6,Very Good,250,0,1,9000000\n", HEADER);
        let file = create_temp_csv(&content);

        let records = read_dataset(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.features.neighborhood, "Rural");
        assert_eq!(r.features.condition, "Very Good");
        assert_eq!(r.features.bathrooms, 2.5);
        assert!(!r.features.has_pool);
        assert!(r.features.has_basement);
        assert_eq!(r.sale_price, 9_000_000);
    }

    #[test]
    fn test_read_dataset_empty_file() {
        let file = create_temp_csv(HEADER);
        let result = read_dataset(file.path());
        assert!(matches!(result, Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_read_dataset_invalid_flag() {
        let content = format!("{}Rural,1999,1500,3,2.5,6,Good,250,2,1,9000000\n", HEADER);
        let file = create_temp_csv(&content);
        let result = read_dataset(file.path());
        assert!(matches!(result, Err(CsvError::InvalidRecord { row: 1, .. })));
    }

    #[test]
    fn test_read_dataset_invalid_number() {
        let content = format!("{}Rural,abc,1500,3,2.5,6,Good,250,0,1,9000000\n", HEADER);
        let file = create_temp_csv(&content);
        let result = read_dataset(file.path());
        assert!(matches!(result, Err(CsvError::CsvParse(_))));
    }

    #[test]
    fn test_read_dataset_missing_file() {
        let result = read_dataset("/nonexistent/path/dataset.csv");
        assert!(matches!(result, Err(CsvError::FileOpen(_))));
    }
}
