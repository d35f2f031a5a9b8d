//! Utility functions used in all other niio modules.

use std::path::Path;

use ndarray::{concatenate, Array2, ArrayD, Axis, IxDyn};

use crate::error::{NiioError, Result};


/// Get the lower-cased extension of the file name, without the dot.
pub fn file_extension<P>(path: P) -> Option<String>
where
    P: AsRef<Path>,
{
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}


/// Remove all axes of length 1, like numpy's `squeeze`. An array whose axes all have length 1 becomes 0-dimensional.
pub fn squeeze(array: ArrayD<f64>) -> ArrayD<f64> {
    if !array.shape().contains(&1) {
        return array;
    }
    let shape: Vec<usize> = array.shape().iter().copied().filter(|&d| d != 1).collect();
    let values: Vec<f64> = array.iter().copied().collect();
    // Dropping length-1 axes never changes the logical element order.
    ArrayD::from_shape_vec(IxDyn(&shape), values).unwrap_or(array)
}


/// Stack arrays as columns, like numpy's `column_stack`. 0-d and 1-D arrays become single columns, 2-D arrays contribute all their columns.
pub fn column_stack(arrays: &[ArrayD<f64>]) -> Result<Array2<f64>> {
    if arrays.is_empty() {
        return Err(NiioError::EmptyInput("arrays to stack"));
    }
    let mut columns: Vec<Array2<f64>> = Vec::with_capacity(arrays.len());
    for array in arrays {
        let column = match array.ndim() {
            0 | 1 => {
                let n = array.len();
                Array2::from_shape_vec((n, 1), array.iter().copied().collect())?
            }
            2 => array.clone().into_dimensionality()?,
            d => {
                return Err(NiioError::InvalidData(format!(
                    "cannot column-stack a {}-dimensional array",
                    d
                )))
            }
        };
        columns.push(column);
    }
    let rows = columns[0].nrows();
    if let Some(bad) = columns.iter().find(|c| c.nrows() != rows) {
        return Err(NiioError::ShapeMismatch("stacked array rows", rows, bad.nrows()));
    }
    let views: Vec<_> = columns.iter().map(|c| c.view()).collect();
    Ok(concatenate(Axis(1), &views)?)
}
