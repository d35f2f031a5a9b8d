//! Loading of any supported data file, dispatched on the file extension.

use log::debug;

use std::path::Path;

use crate::data::LoadedData;
use crate::delimited::load_csv;
use crate::error::{NiioError, Result};
use crate::gifti::load_gii;
use crate::hdf::load_h5;
use crate::matlab::load_mat;
use crate::pickle::load_pickle;
use crate::util::file_extension;


/// Selects what to load from container files. Options that do not apply to a format are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keys to load from `.mat`, `.h5` and pickle files. Only the first one is used for `.mat` files.
    pub datasets: Vec<String>,
    /// Indices of the data arrays to load from `.gii` files. All arrays if empty.
    pub darrays: Vec<usize>,
    /// The HDF5 group holding the datasets. The file root if `None`.
    pub group: Option<String>,
}

impl LoadOptions {
    pub fn new() -> LoadOptions {
        LoadOptions::default()
    }

    pub fn dataset<S: Into<String>>(mut self, name: S) -> LoadOptions {
        self.datasets.push(name.into());
        self
    }

    pub fn darray(mut self, index: usize) -> LoadOptions {
        self.darrays.push(index);
        self
    }

    pub fn group<S: Into<String>>(mut self, name: S) -> LoadOptions {
        self.group = Some(name.into());
        self
    }
}


/// The file formats known to [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Mat,
    Gifti,
    Hdf5,
    Pickle,
    Csv,
}

impl DataFormat {
    /// Determine the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<DataFormat> {
        let unsupported = || NiioError::UnsupportedExtension(path.as_ref().display().to_string());
        match file_extension(&path).ok_or_else(unsupported)?.as_str() {
            "mat" => Ok(DataFormat::Mat),
            "gii" => Ok(DataFormat::Gifti),
            "h5" | "hdf5" => Ok(DataFormat::Hdf5),
            "p" | "pkl" | "pickle" => Ok(DataFormat::Pickle),
            "csv" => Ok(DataFormat::Csv),
            _ => Err(unsupported()),
        }
    }
}


/// Load a data file.
///
/// The format is determined by the file extension, see [`DataFormat::from_path`].
///
/// # Examples
///
/// ```no_run
/// use niio::{load, LoadOptions};
/// let thickness = load("/path/to/lh.thickness.func.gii", &LoadOptions::new()).unwrap();
/// let features = load("/path/to/features.h5", &LoadOptions::new().group("subject1").dataset("mean")).unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<LoadedData> {
    let format = DataFormat::from_path(&path)?;
    debug!("Loading '{}' as {:?}.", path.as_ref().display(), format);
    match format {
        DataFormat::Mat => Ok(LoadedData::Dense(load_mat(path, &opts.datasets)?)),
        DataFormat::Gifti => Ok(LoadedData::Dense(load_gii(path, &opts.darrays)?)),
        DataFormat::Hdf5 => Ok(LoadedData::Named(load_h5(path, &opts.datasets, opts.group.as_deref())?)),
        DataFormat::Pickle => load_pickle(path, &opts.datasets),
        DataFormat::Csv => Ok(LoadedData::Dense(load_csv(path)?)),
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formats_are_determined_by_extension() {
        assert_eq!(DataFormat::Gifti, DataFormat::from_path("lh.func.gii").unwrap());
        assert_eq!(DataFormat::Mat, DataFormat::from_path("/tmp/Corr.MAT").unwrap());
        assert_eq!(DataFormat::Hdf5, DataFormat::from_path("features.h5").unwrap());
        assert_eq!(DataFormat::Pickle, DataFormat::from_path("matching.p").unwrap());
        assert_eq!(DataFormat::Csv, DataFormat::from_path("table.csv").unwrap());
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        assert!(matches!(DataFormat::from_path("brain.nii"), Err(NiioError::UnsupportedExtension(_))));
        assert!(matches!(load("README", &LoadOptions::new()), Err(NiioError::UnsupportedExtension(_))));
    }

    #[test]
    fn options_are_built_fluently() {
        let opts = LoadOptions::new().dataset("mean").dataset("std").darray(2).group("subject1");
        assert_eq!(vec![String::from("mean"), String::from("std")], opts.datasets);
        assert_eq!(vec![2], opts.darrays);
        assert_eq!(Some(String::from("subject1")), opts.group);
    }

    #[test]
    fn missing_files_are_io_errors() {
        assert!(matches!(load("/no/such/file.csv", &LoadOptions::new()), Err(NiioError::Io(_))));
    }
}
