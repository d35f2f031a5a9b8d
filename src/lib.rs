//! Loading and saving of neuroimaging data files used in cortical surface mapping.
//!
//! Matlab, GIfTI, HDF5, pickle and CSV files are loaded into `ndarray` arrays with [`load`], per-vertex
//! data is written as GIfTI overlays with [`save`] and [`save_labels`], and the [`midline`](mod@midline) module maps
//! vertex indices between a surface and the same surface with its midline vertices removed.

pub mod colortable;
pub mod convert;
pub mod data;
pub mod delimited;
pub mod error;
pub mod gifti;
pub mod hdf;
pub mod load;
pub mod matlab;
pub mod midline;
pub mod pickle;
pub mod traits;
pub mod util;
pub mod write;

pub use colortable::read_colortable;
pub use convert::{func_to_mat, mat_to_func};
pub use data::LoadedData;
pub use error::{NiioError, Result};
pub use gifti::{
    load_gii, read_gifti, GiftiDataArray, GiftiDataType, GiftiImage, GiftiLabel, GiftiLabelTable, Hemisphere,
};
pub use load::{load, DataFormat, LoadOptions};
pub use matlab::{load_mat, save_mat};
pub use midline::{
    expand_labels, midline, midline_from_timeseries, remap_matching, remap_matching_between, ReducedSpace,
    MIDLINE_SENTINEL,
};
pub use traits::VertexColor;
pub use write::{save, save_labels, save_labels_with_colormap};
