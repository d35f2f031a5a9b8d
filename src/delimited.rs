//! Functions for reading numeric CSV files.


use csv::ReaderBuilder;
use log::debug;
use ndarray::{Array2, ArrayD};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{NiioError, Result};
use crate::util::squeeze;


/// Read comma-separated rows of numbers without a header line into an array, squeezed.
///
/// All rows must have the same number of fields.
pub fn csv_from_reader<R: Read>(input: R) -> Result<ArrayD<f64>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input);

    let mut values: Vec<f64> = Vec::new();
    let mut num_rows = 0;
    let mut num_cols = 0;
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;
        num_cols = record.len();
        for (col_idx, field) in record.iter().enumerate() {
            let v = field.parse::<f64>().map_err(|_| {
                NiioError::InvalidData(format!(
                    "CSV field '{}' at row {}, column {} is not a number",
                    field,
                    row_idx + 1,
                    col_idx + 1
                ))
            })?;
            values.push(v);
        }
        num_rows += 1;
    }

    let data = Array2::from_shape_vec((num_rows, num_cols), values)?;
    Ok(squeeze(data.into_dyn()))
}


/// Load a CSV file of numbers.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<ArrayD<f64>> {
    let file = BufReader::new(File::open(&path)?);
    let data = csv_from_reader(file)?;
    debug!("Loaded CSV file '{}' of shape {:?}.", path.as_ref().display(), data.shape());
    Ok(data)
}
