//! Loading of numeric data from Python pickle files.
//!
//! Plain Python values are supported: numbers, (nested) lists and tuples of numbers, and dicts mapping
//! string keys to those. Pickled numpy objects reference Python classes and cannot be decoded.

use log::debug;
use ndarray::{ArrayD, IxDyn};
use serde_pickle::{DeOptions, HashableValue, Value};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::data::LoadedData;
use crate::error::{NiioError, Result};


fn scalar(value: &Value) -> Option<f64> {
    match value {
        Value::F64(v) => Some(*v),
        Value::I64(v) => Some(*v as f64),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Collect the shape of a nested list/tuple value and its values in row-major order.
fn flatten(value: &Value, depth: usize, shape: &mut Vec<usize>, out: &mut Vec<f64>) -> Result<()> {
    if let Some(v) = scalar(value) {
        if depth != shape.len() {
            return Err(NiioError::InvalidData(String::from("ragged nested lists in pickle")));
        }
        out.push(v);
        return Ok(());
    }
    let items = match value {
        Value::List(items) | Value::Tuple(items) => items,
        other => {
            return Err(NiioError::InvalidData(format!("pickled value {:?} is not numeric", other)))
        }
    };
    if depth == shape.len() {
        if !out.is_empty() {
            return Err(NiioError::InvalidData(String::from("ragged nested lists in pickle")));
        }
        shape.push(items.len());
    } else if shape[depth] != items.len() {
        return Err(NiioError::InvalidData(String::from("ragged nested lists in pickle")));
    }
    for item in items {
        flatten(item, depth + 1, shape, out)?;
    }
    Ok(())
}

/// Convert a pickled number or (nested) sequence of numbers to an array.
pub fn value_to_array(value: &Value) -> Result<ArrayD<f64>> {
    let mut shape = Vec::new();
    let mut values = Vec::new();
    flatten(value, 0, &mut shape, &mut values)?;
    let expected: usize = shape.iter().product();
    if expected != values.len() {
        return Err(NiioError::InvalidData(String::from("ragged nested lists in pickle")));
    }
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), values)?)
}

fn key_name(key: &HashableValue) -> Result<String> {
    match key {
        HashableValue::String(s) => Ok(s.clone()),
        HashableValue::Bytes(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        other => Err(NiioError::InvalidData(format!("pickled dict key {:?} is not a string", other))),
    }
}


/// Convert a pickled value to loaded data: a dict becomes a map of named arrays, anything else a single array.
pub fn value_to_data(value: &Value, datasets: &[String]) -> Result<LoadedData> {
    match value {
        Value::Dict(entries) => {
            let mut named = BTreeMap::new();
            for (key, item) in entries {
                let name = key_name(key)?;
                if datasets.is_empty() || datasets.contains(&name) {
                    named.insert(name, value_to_array(item)?);
                }
            }
            if let Some(missing) = datasets.iter().find(|d| !named.contains_key(*d)) {
                return Err(NiioError::DatasetNotFound(missing.clone()));
            }
            Ok(LoadedData::Named(named))
        }
        other => Ok(LoadedData::Dense(value_to_array(other)?)),
    }
}


pub fn pickle_from_reader<R: Read>(input: R, datasets: &[String]) -> Result<LoadedData> {
    let value = serde_pickle::value_from_reader(input, DeOptions::new())?;
    value_to_data(&value, datasets)
}


/// Load a pickle file. With `datasets`, only those keys of a pickled dict are kept.
pub fn load_pickle<P: AsRef<Path>>(path: P, datasets: &[String]) -> Result<LoadedData> {
    let data = pickle_from_reader(BufReader::new(File::open(&path)?), datasets)?;
    debug!("Loaded pickle file '{}'.", path.as_ref().display());
    Ok(data)
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    fn pickled(value: &Value) -> Vec<u8> {
        serde_pickle::value_to_vec(value, serde_pickle::SerOptions::new()).unwrap()
    }

    #[test]
    fn nested_lists_become_arrays() {
        let value = Value::List(vec![
            Value::List(vec![Value::I64(1), Value::F64(2.5)]),
            Value::Tuple(vec![Value::Bool(true), Value::I64(-4)]),
        ]);
        let data = pickle_from_reader(&pickled(&value)[..], &[]).unwrap();
        assert_eq!(LoadedData::Dense(array![[1.0, 2.5], [1.0, -4.0]].into_dyn()), data);
    }

    #[test]
    fn ragged_lists_are_rejected() {
        let value = Value::List(vec![
            Value::List(vec![Value::I64(1), Value::I64(2)]),
            Value::List(vec![Value::I64(3)]),
        ]);
        assert!(matches!(value_to_array(&value), Err(NiioError::InvalidData(_))));

        let mixed = Value::List(vec![Value::I64(1), Value::List(vec![Value::I64(3)])]);
        assert!(matches!(value_to_array(&mixed), Err(NiioError::InvalidData(_))));
    }

    #[test]
    fn dicts_become_named_arrays() {
        let mut entries = BTreeMap::new();
        entries.insert(
            HashableValue::String(String::from("mean")),
            Value::List(vec![Value::F64(0.5), Value::F64(1.5)]),
        );
        entries.insert(HashableValue::String(String::from("n")), Value::I64(12));
        let bytes = pickled(&Value::Dict(entries));

        match pickle_from_reader(&bytes[..], &[]).unwrap() {
            LoadedData::Named(named) => {
                assert_eq!(2, named.len());
                assert_eq!(array![0.5, 1.5].into_dyn(), named["mean"]);
                assert_eq!(0, named["n"].ndim());
            }
            other => panic!("expected named arrays, got {:?}", other),
        }

        match pickle_from_reader(&bytes[..], &[String::from("n")]).unwrap() {
            LoadedData::Named(named) => assert_eq!(vec![String::from("n")], named.keys().cloned().collect::<Vec<_>>()),
            other => panic!("expected named arrays, got {:?}", other),
        }

        assert!(matches!(
            pickle_from_reader(&bytes[..], &[String::from("std")]),
            Err(NiioError::DatasetNotFound(_))
        ));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let value = Value::List(vec![Value::String(String::from("lh"))]);
        assert!(matches!(pickle_from_reader(&pickled(&value)[..], &[]), Err(NiioError::InvalidData(_))));
    }
}
