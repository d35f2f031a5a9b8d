//! Writing of per-vertex data as GIfTI surface overlays.
//!
//! To view an overlay, load it together with a surface of the same hemisphere, e.g. with Connectome
//! Workbench: `wb_view BASENAME.func.gii SURFACEFILE.surf.gii`.

use ndarray::ArrayView1;

use std::path::Path;

use crate::colortable::read_colortable;
use crate::error::{NiioError, Result};
use crate::gifti::{GiftiDataArray, GiftiImage, GiftiLabelTable, Hemisphere};


/// Write one or more per-vertex scalar vectors as a float GIfTI overlay, one data array per vector.
///
/// # Errors
///
/// * [`NiioError::EmptyInput`] if `vectors` is empty.
/// * [`NiioError::ShapeMismatch`] if the vectors differ in length.
///
/// # Examples
///
/// ```no_run
/// use ndarray::array;
/// use niio::Hemisphere;
/// let ica_dmn = array![0.1, 0.7, 0.0];
/// niio::save(&[ica_dmn.view()], "DefaultMode.func.gii", Hemisphere::Left).unwrap();
/// ```
pub fn save<P: AsRef<Path>>(vectors: &[ArrayView1<f64>], path: P, hemisphere: Hemisphere) -> Result<()> {
    let first = vectors.first().ok_or(NiioError::EmptyInput("vectors to save"))?;
    if let Some(bad) = vectors.iter().find(|v| v.len() != first.len()) {
        return Err(NiioError::ShapeMismatch("overlay vector", first.len(), bad.len()));
    }
    let mut gii = GiftiImage::for_hemisphere(hemisphere);
    for v in vectors {
        gii.add_data_array(GiftiDataArray::from_scalars(v.view()));
    }
    gii.to_file(path)
}


/// Write a per-vertex label vector as a GIfTI label overlay with the given label table.
pub fn save_labels<P: AsRef<Path>>(
    labels: ArrayView1<i32>,
    path: P,
    hemisphere: Hemisphere,
    table: &GiftiLabelTable,
) -> Result<()> {
    let mut gii = GiftiImage::for_hemisphere(hemisphere);
    gii.label_table = Some(table.clone());
    gii.add_data_array(GiftiDataArray::from_labels(labels));
    gii.to_file(path)
}


/// Like [`save_labels`], reading the label table from a color table file (see [`crate::colortable`]).
pub fn save_labels_with_colormap<P: AsRef<Path>, Q: AsRef<Path>>(
    labels: ArrayView1<i32>,
    path: P,
    hemisphere: Hemisphere,
    colormap: Q,
) -> Result<()> {
    let table = read_colortable(colormap)?;
    save_labels(labels, path, hemisphere, &table)
}
