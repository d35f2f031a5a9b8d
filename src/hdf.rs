//! Loading of datasets from HDF5 files.
//!
//! HDF5 support links against the system HDF5 library and is only compiled with the `hdf5` feature.
//! Without it, [`load_h5`] fails with [`NiioError::FormatDisabled`].

use ndarray::ArrayD;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{NiioError, Result};


/// Load datasets from an HDF5 file into a map from dataset name to array.
///
/// With `group`, datasets are looked up inside that group instead of the file root. With `datasets`,
/// only those are loaded; otherwise every dataset of the group is. Members that are not datasets (e.g.,
/// nested groups) are skipped in that case.
#[cfg(feature = "hdf5")]
pub fn load_h5<P: AsRef<Path>>(
    path: P,
    datasets: &[String],
    group: Option<&str>,
) -> Result<BTreeMap<String, ArrayD<f64>>> {
    use log::{debug, warn};

    let file = hdf5::File::open(path.as_ref()).map_err(|e| NiioError::Hdf5(e.to_string()))?;
    let container: hdf5::Group = match group {
        Some(name) => file
            .group(name)
            .map_err(|_| NiioError::DatasetNotFound(format!("group {}", name)))?,
        None => file.as_group().map_err(|e| NiioError::Hdf5(e.to_string()))?,
    };

    let names: Vec<String> = if datasets.is_empty() {
        container.member_names().map_err(|e| NiioError::Hdf5(e.to_string()))?
    } else {
        datasets.to_vec()
    };

    let mut data = BTreeMap::new();
    for name in names {
        let dataset = match container.dataset(&name) {
            Ok(ds) => ds,
            Err(_) if datasets.is_empty() => {
                warn!("Skipping HDF5 member '{}', it is not a dataset.", name);
                continue;
            }
            Err(_) => return Err(NiioError::DatasetNotFound(name)),
        };
        let values = dataset.read_dyn::<f64>().map_err(|e| NiioError::Hdf5(e.to_string()))?;
        debug!("Loaded HDF5 dataset '{}' of shape {:?}.", name, values.shape());
        data.insert(name, values);
    }
    Ok(data)
}


#[cfg(not(feature = "hdf5"))]
pub fn load_h5<P: AsRef<Path>>(
    _path: P,
    _datasets: &[String],
    _group: Option<&str>,
) -> Result<BTreeMap<String, ArrayD<f64>>> {
    Err(NiioError::FormatDisabled("HDF5", "hdf5"))
}
