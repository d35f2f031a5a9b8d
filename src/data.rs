//! The in-memory result of loading a data file.

use ndarray::ArrayD;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{NiioError, Result};


/// Data loaded from a file: a single array, or a map from dataset name to array.
///
/// Which variant a file yields is decided by its format: `.mat`, `.gii` and `.csv` files are `Dense`,
/// `.h5` files are `Named`, pickles are `Named` if they hold a dict and `Dense` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedData {
    Dense(ArrayD<f64>),
    Named(BTreeMap<String, ArrayD<f64>>),
}

impl LoadedData {
    pub fn as_dense(&self) -> Option<&ArrayD<f64>> {
        match self {
            LoadedData::Dense(array) => Some(array),
            LoadedData::Named(_) => None,
        }
    }

    /// Get the single array. A map holding exactly one array yields that array.
    pub fn into_dense(self) -> Result<ArrayD<f64>> {
        match self {
            LoadedData::Dense(array) => Ok(array),
            LoadedData::Named(mut named) if named.len() == 1 => {
                let key = named.keys().next().cloned().unwrap_or_default();
                named.remove(&key).ok_or(NiioError::DatasetNotFound(key))
            }
            LoadedData::Named(named) => Err(NiioError::InvalidData(format!(
                "expected a single array, found {} named arrays",
                named.len()
            ))),
        }
    }

    pub fn into_named(self) -> Option<BTreeMap<String, ArrayD<f64>>> {
        match self {
            LoadedData::Named(named) => Some(named),
            LoadedData::Dense(_) => None,
        }
    }

    /// Get a named array.
    pub fn get(&self, name: &str) -> Result<&ArrayD<f64>> {
        match self {
            LoadedData::Named(named) => named.get(name).ok_or_else(|| NiioError::DatasetNotFound(name.to_string())),
            LoadedData::Dense(_) => Err(NiioError::DatasetNotFound(name.to_string())),
        }
    }
}

impl fmt::Display for LoadedData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadedData::Dense(array) => write!(f, "Array of shape {:?}.", array.shape()),
            LoadedData::Named(named) => write!(f, "{} named arrays: {:?}.", named.len(), named.keys().collect::<Vec<_>>()),
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn single_named_arrays_convert_to_dense() {
        let mut named = BTreeMap::new();
        named.insert(String::from("x"), array![1.0, 2.0].into_dyn());
        let data = LoadedData::Named(named);
        assert_eq!(array![1.0, 2.0].into_dyn(), *data.get("x").unwrap());
        assert!(matches!(data.get("y"), Err(NiioError::DatasetNotFound(_))));
        assert_eq!(array![1.0, 2.0].into_dyn(), data.into_dense().unwrap());
    }

    #[test]
    fn multiple_named_arrays_do_not_convert_to_dense() {
        let mut named = BTreeMap::new();
        named.insert(String::from("x"), array![1.0].into_dyn());
        named.insert(String::from("y"), array![2.0].into_dyn());
        assert!(LoadedData::Named(named).into_dense().is_err());
    }
}
