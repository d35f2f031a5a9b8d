//! Functions for reading and writing Matlab `.mat` files.
//!
//! Level 5 MAT files (the default up to Matlab 7.2) are parsed with the `matfile` crate. Files saved with
//! `-v7.3` are HDF5 containers in disguise and are read through the `hdf5` feature. Writing produces
//! uncompressed Level 5 files holding `double` matrices.

use byteordered::ByteOrdered;
use log::{debug, warn};
use matfile::{MatFile, NumericData};
use ndarray::{ArrayD, ArrayViewD, IxDyn, ShapeBuilder};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{NiioError, Result};
use crate::util::squeeze;

pub const MAT_HEADER_TEXT_LEN: usize = 116;
pub const MAT_HEADER_LEN: usize = 128;
pub const MAT_VERSION: i16 = 0x0100;

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;
const MX_DOUBLE_CLASS: u32 = 6;

const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1a, b'\n'];


/// Convert the (real part of the) numeric data of a MAT array to f64 values.
fn numeric_to_f64(data: &NumericData) -> Vec<f64> {
    fn conv<T: Copy + Into<f64>>(real: &[T]) -> Vec<f64> {
        real.iter().map(|&v| v.into()).collect()
    }
    match data {
        NumericData::Int8 { real, .. } => conv(real),
        NumericData::UInt8 { real, .. } => conv(real),
        NumericData::Int16 { real, .. } => conv(real),
        NumericData::UInt16 { real, .. } => conv(real),
        NumericData::Int32 { real, .. } => conv(real),
        NumericData::UInt32 { real, .. } => conv(real),
        NumericData::Int64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::Single { real, .. } => conv(real),
        NumericData::Double { real, .. } => real.clone(),
    }
}


/// Whether the header marks the file as HDF5-based (Matlab v7.3).
fn is_hdf5_mat(header: &[u8]) -> bool {
    header.starts_with(&HDF5_SIGNATURE) || String::from_utf8_lossy(header).starts_with("MATLAB 7.3")
}


/// Pick the key to load: the first requested one, or else the first key that does not start with '_'.
fn select_key<'a>(names: &'a [String], datasets: &'a [String]) -> Result<&'a str> {
    if let Some(requested) = datasets.first() {
        if datasets.len() > 1 {
            warn!("Only the first of {} requested keys is loaded from a .mat file.", datasets.len());
        }
        return names
            .iter()
            .find(|n| *n == requested)
            .map(|n| n.as_str())
            .ok_or_else(|| NiioError::DatasetNotFound(requested.clone()));
    }
    let skipped = names.iter().filter(|n| n.starts_with('_')).count();
    if skipped > 0 {
        warn!("Skipping {} private keys in .mat file.", skipped);
    }
    let public = names.len() - skipped;
    if public > 1 {
        warn!("Found {} keys in .mat file, loading the first one.", public);
    }
    names
        .iter()
        .find(|n| !n.starts_with('_'))
        .map(|n| n.as_str())
        .ok_or_else(|| NiioError::DatasetNotFound(String::from("<any non-private key>")))
}


/// Read a Level 5 MAT file from a reader, returning the selected array, squeezed.
pub fn mat_from_reader<R: Read>(input: R, datasets: &[String]) -> Result<ArrayD<f64>> {
    let mat = MatFile::parse(input).map_err(|e| NiioError::MatFile(format!("{:?}", e)))?;
    let names: Vec<String> = mat.arrays().iter().map(|a| a.name().to_string()).collect();
    let key = select_key(&names, datasets)?;
    let array = mat
        .find_by_name(key)
        .ok_or_else(|| NiioError::DatasetNotFound(key.to_string()))?;
    debug!("Loading key '{}' of shape {:?} from .mat file.", key, array.size());
    // Matlab stores arrays in column-major order.
    let data = ArrayD::from_shape_vec(IxDyn(array.size()).f(), numeric_to_f64(array.data()))?;
    Ok(squeeze(data))
}


/// Load one array from a `.mat` file, squeezed.
///
/// With `datasets`, the first named key is loaded; otherwise the first key not starting with `_`.
pub fn load_mat<P: AsRef<Path>>(path: P, datasets: &[String]) -> Result<ArrayD<f64>> {
    let mut file = BufReader::new(File::open(&path)?);
    let mut header = [0u8; MAT_HEADER_LEN];
    let read = file.read(&mut header)?;
    if is_hdf5_mat(&header[..read]) {
        debug!("'{}' is a v7.3 .mat file, reading it as HDF5.", path.as_ref().display());
        return load_mat_v73(path.as_ref(), datasets);
    }
    mat_from_reader((&header[..read]).chain(file), datasets)
}


#[cfg(feature = "hdf5")]
fn load_mat_v73(path: &Path, datasets: &[String]) -> Result<ArrayD<f64>> {
    let file = hdf5::File::open(path).map_err(|e| NiioError::Hdf5(e.to_string()))?;
    let names: Vec<String> = file
        .member_names()
        .map_err(|e| NiioError::Hdf5(e.to_string()))?
        .into_iter()
        .filter(|n| !n.starts_with('#'))
        .collect();
    let key = select_key(&names, datasets)?;
    let dataset = file.dataset(key).map_err(|_| NiioError::DatasetNotFound(key.to_string()))?;
    let data: ArrayD<f64> = dataset.read_dyn::<f64>().map_err(|e| NiioError::Hdf5(e.to_string()))?;
    // HDF5 sees the column-major Matlab array with its axes reversed.
    Ok(squeeze(data.reversed_axes()))
}

#[cfg(not(feature = "hdf5"))]
fn load_mat_v73(_path: &Path, _datasets: &[String]) -> Result<ArrayD<f64>> {
    Err(NiioError::FormatDisabled("Matlab v7.3 .mat", "hdf5"))
}


fn padded_len(len: usize) -> usize {
    (len + 7) / 8 * 8
}

fn matrix_data_len(name: &str, array: &ArrayViewD<f64>) -> usize {
    let ndims = array.ndim().max(2);
    let flags = 8 + 8;
    let dims = 8 + padded_len(4 * ndims);
    let name = 8 + padded_len(name.len());
    let real = 8 + 8 * array.len();
    flags + dims + name + real
}


/// Byte counts of Level 5 data elements are 32 bit.
fn size_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| NiioError::InvalidData(format!("{} of {} bytes exceeds the .mat size limit", what, len)))
}


/// Write named arrays to an uncompressed Level 5 MAT file as `double` matrices.
///
/// Arrays with fewer than 2 dimensions are stored as `1 x N` row vectors, as Matlab has no 1-D arrays.
pub fn save_mat<P: AsRef<Path>>(path: P, arrays: &[(&str, ArrayViewD<f64>)]) -> Result<()> {
    if arrays.is_empty() {
        return Err(NiioError::EmptyInput("arrays to save"));
    }
    let file = BufWriter::new(File::create(&path)?);
    mat_to_writer(file, arrays)?;
    debug!("Wrote {} arrays to .mat file '{}'.", arrays.len(), path.as_ref().display());
    Ok(())
}


pub fn mat_to_writer<W: Write>(output: W, arrays: &[(&str, ArrayViewD<f64>)]) -> Result<()> {
    let mut output = ByteOrdered::le(output);

    let mut text = format!("MATLAB 5.0 MAT-file, Platform: {}, Created by: niio", std::env::consts::OS).into_bytes();
    text.resize(MAT_HEADER_TEXT_LEN, b' ');
    output.write_all(&text)?;
    output.write_all(&[0u8; 8])?; // subsystem data offset
    output.write_i16(MAT_VERSION)?;
    output.write_all(b"IM")?;

    for (name, array) in arrays {
        if name.is_empty() || name.len() > 63 {
            return Err(NiioError::InvalidData(format!("invalid Matlab variable name '{}'", name)));
        }
        let dims: Vec<usize> = match array.ndim() {
            0 => vec![1, 1],
            1 => vec![1, array.len()],
            _ => array.shape().to_vec(),
        };

        let matrix_len = size_u32(matrix_data_len(name, array), "matrix")?;
        let real_len = size_u32(8 * array.len(), "real part")?;
        let dims = dims
            .iter()
            .map(|&d| {
                i32::try_from(d)
                    .map_err(|_| NiioError::InvalidData(format!("dimension {} of '{}' exceeds the .mat limit", d, name)))
            })
            .collect::<Result<Vec<i32>>>()?;

        output.write_u32(MI_MATRIX)?;
        output.write_u32(matrix_len)?;

        output.write_u32(MI_UINT32)?;
        output.write_u32(8)?;
        output.write_u32(MX_DOUBLE_CLASS)?;
        output.write_u32(0)?;

        output.write_u32(MI_INT32)?;
        output.write_u32((4 * dims.len()) as u32)?;
        for &d in &dims {
            output.write_i32(d)?;
        }
        output.write_all(&vec![0u8; padded_len(4 * dims.len()) - 4 * dims.len()])?;

        output.write_u32(MI_INT8)?;
        output.write_u32(name.len() as u32)?;
        output.write_all(name.as_bytes())?;
        output.write_all(&vec![0u8; padded_len(name.len()) - name.len()])?;

        output.write_u32(MI_DOUBLE)?;
        output.write_u32(real_len)?;
        // Column-major: iterating the transposed view in logical order.
        for &v in array.t().iter() {
            output.write_f64(v)?;
        }
    }
    output.flush()?;
    Ok(())
}
