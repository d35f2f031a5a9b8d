//! Conversion between Matlab `.mat` files and GIfTI `.func.gii` overlays.

use ndarray::{Array1, Axis};

use std::path::Path;

use crate::error::{NiioError, Result};
use crate::gifti::{load_gii, Hemisphere};
use crate::matlab::{load_mat, save_mat};
use crate::write::save;


/// Convert a `.mat` file to a `.func.gii` overlay.
///
/// A vector is written as a single data array, a `vertices x k` matrix as `k` data arrays.
pub fn mat_to_func<P: AsRef<Path>, Q: AsRef<Path>>(in_mat: P, out_func: Q, hemisphere: Hemisphere) -> Result<()> {
    let mat = load_mat(in_mat, &[])?;
    let columns: Vec<Array1<f64>> = match mat.ndim() {
        0 | 1 => vec![mat.iter().copied().collect()],
        2 => mat.axis_iter(Axis(1)).map(|c| c.iter().copied().collect()).collect(),
        d => {
            return Err(NiioError::InvalidData(format!(
                "cannot write a {}-dimensional array as a surface overlay",
                d
            )))
        }
    };
    let views: Vec<_> = columns.iter().map(|c| c.view()).collect();
    save(&views, out_func, hemisphere)
}


/// Convert a `.func.gii` or `.label.gii` file to a `.mat` file holding all data arrays as variable `data`.
pub fn func_to_mat<P: AsRef<Path>, Q: AsRef<Path>>(in_func: P, out_mat: Q) -> Result<()> {
    let func = load_gii(in_func, &[])?;
    save_mat(out_mat, &[("data", func.view())])
}
