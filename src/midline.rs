//! Functions for translating vertex indices between a full brain surface and the same surface with its
//! midline vertices removed.
//!
//! Computations like correlation matching are usually run only on the vertices that carry signal. Their
//! results live in the *reduced* index space: the non-midline vertices of the surface, renumbered densely
//! in ascending order. The functions in this module map such results back to the *full* index space of
//! the surface mesh, so they can be written as overlays.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::error::{NiioError, Result};

/// The value stored at midline positions of any vector reconstructed at full resolution.
pub const MIDLINE_SENTINEL: i8 = -1;


/// Get the indices of all vertices whose signal is exactly zero.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// let signal = array![1.0, 0.0, 3.0, 0.0, 5.0];
/// assert_eq!(vec![1, 3], niio::midline(signal.view()));
/// ```
pub fn midline<T>(signal: ArrayView1<T>) -> Vec<usize>
where
    T: Copy + Default + PartialEq,
{
    let zero = T::default();
    signal
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == zero)
        .map(|(idx, _)| idx)
        .collect()
}


/// Get the midline vertices of a `vertices x samples` signal matrix, i.e., the rows whose summed absolute signal is zero.
pub fn midline_from_timeseries(signal: ArrayView2<f64>) -> Vec<usize> {
    let magnitude: Array1<f64> = signal.map(|v| v.abs()).sum_axis(Axis(1));
    midline(magnitude.view())
}


/// The non-midline vertices of a surface with `full_size` vertices, in ascending order.
///
/// The position of a vertex in [`ReducedSpace::indices`] is its index in the reduced space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedSpace {
    full_size: usize,
    indices: Vec<usize>,
}

impl ReducedSpace {

    /// Build the reduced space of a surface with `full_size` vertices. Duplicate midline entries are allowed.
    ///
    /// # Errors
    ///
    /// [`NiioError::InvalidMidline`] if a midline vertex is not a vertex of the surface.
    pub fn new(full_size: usize, midline: &[usize]) -> Result<ReducedSpace> {
        let mut is_midline = vec![false; full_size];
        for &idx in midline {
            if idx >= full_size {
                return Err(NiioError::InvalidMidline(idx, full_size));
            }
            is_midline[idx] = true;
        }
        let indices = (0..full_size).filter(|&idx| !is_midline[idx]).collect();
        Ok(ReducedSpace { full_size, indices })
    }

    /// The reduced space of a surface without any midline vertices.
    pub fn full(full_size: usize) -> ReducedSpace {
        ReducedSpace { full_size, indices: (0..full_size).collect() }
    }

    pub fn full_size(&self) -> usize {
        self.full_size
    }

    /// Number of vertices in the reduced space.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The full-space index of every reduced-space position, strictly ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The midline vertices, i.e., the full-space indices not in the reduced space.
    pub fn midline(&self) -> Vec<usize> {
        let mut midline = Vec::with_capacity(self.full_size - self.indices.len());
        let mut kept = self.indices.iter().peekable();
        for idx in 0..self.full_size {
            if kept.peek() == Some(&&idx) {
                kept.next();
            } else {
                midline.push(idx);
            }
        }
        midline
    }

    /// Translate a reduced-space position to its full-space index.
    pub fn to_full(&self, position: i64) -> Result<usize> {
        usize::try_from(position)
            .ok()
            .and_then(|p| self.indices.get(p).copied())
            .ok_or(NiioError::IndexOutOfRange(position, self.indices.len()))
    }

    /// Translate a full-space index to its reduced-space position. Midline vertices have none.
    pub fn to_reduced(&self, full_index: usize) -> Option<usize> {
        self.indices.binary_search(&full_index).ok()
    }

    /// Scatter reduced-space values into a full-resolution vector, setting all midline positions to `fill`.
    ///
    /// # Errors
    ///
    /// [`NiioError::ShapeMismatch`] if `values` does not have one entry per reduced-space vertex.
    pub fn scatter<T: Copy>(&self, values: ArrayView1<T>, fill: T) -> Result<Array1<T>> {
        if values.len() != self.indices.len() {
            return Err(NiioError::ShapeMismatch("reduced-space values", self.indices.len(), values.len()));
        }
        let mut full = Array1::from_elem(self.full_size, fill);
        for (&idx, &value) in self.indices.iter().zip(values.iter()) {
            full[idx] = value;
        }
        Ok(full)
    }

    /// Extract the values of the reduced-space vertices from a full-resolution vector. Inverse of [`ReducedSpace::scatter`].
    pub fn gather<T: Copy>(&self, full: ArrayView1<T>) -> Result<Array1<T>> {
        if full.len() != self.full_size {
            return Err(NiioError::ShapeMismatch("full-space values", self.full_size, full.len()));
        }
        Ok(self.indices.iter().map(|&idx| full[idx]).collect())
    }
}


/// Reconstruct a full-resolution matching from one computed between the reduced spaces of two surfaces.
///
/// Entry `i` of `matching` is the target reduced-space position that source vertex `i` is matched to. Each
/// entry is translated to the target's full-space index. If `matching` only covers the source's reduced
/// space, it is scattered to full source resolution, with [`MIDLINE_SENTINEL`] at the source midline.
///
/// # Errors
///
/// * [`NiioError::IndexOutOfRange`] if an entry is not a position in the target's reduced space.
/// * [`NiioError::ShapeMismatch`] if `matching` has neither one entry per source reduced-space vertex nor one per source vertex.
/// * [`NiioError::InvalidMidline`] if a midline vertex is outside its surface.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// let matching = array![0, 2, 1, 3];
/// let full = niio::remap_matching(matching.view(), 6, &[2, 4], 6, &[2, 4]).unwrap();
/// assert_eq!(array![0, 3, -1, 1, -1, 5], full);
/// ```
pub fn remap_matching(
    matching: ArrayView1<i64>,
    source_full_size: usize,
    source_midline: &[usize],
    target_full_size: usize,
    target_midline: &[usize],
) -> Result<Array1<i64>> {
    let source = ReducedSpace::new(source_full_size, source_midline)?;
    let target = ReducedSpace::new(target_full_size, target_midline)?;
    remap_matching_between(matching, &source, &target)
}


/// Like [`remap_matching`], for callers that already built both reduced spaces.
pub fn remap_matching_between(
    matching: ArrayView1<i64>,
    source: &ReducedSpace,
    target: &ReducedSpace,
) -> Result<Array1<i64>> {
    let mut translated: Array1<i64> = Array1::zeros(matching.len());
    for (out, &position) in translated.iter_mut().zip(matching.iter()) {
        *out = target.to_full(position)? as i64;
    }

    if translated.len() == source.full_size() {
        Ok(translated)
    } else if translated.len() == source.len() {
        source.scatter(translated.view(), i64::from(MIDLINE_SENTINEL))
    } else {
        Err(NiioError::ShapeMismatch("matching", source.len(), translated.len()))
    }
}


/// Expand values computed on the non-midline vertices to a full-resolution vector of `full_size` entries.
/// Midline positions are set to [`MIDLINE_SENTINEL`].
///
/// # Errors
///
/// [`NiioError::ShapeMismatch`] if `trimmed_values` does not have `full_size - |midline|` entries.
pub fn expand_labels<T>(midline: &[usize], trimmed_values: ArrayView1<T>, full_size: usize) -> Result<Array1<T>>
where
    T: Copy + From<i8>,
{
    let space = ReducedSpace::new(full_size, midline)?;
    space.scatter(trimmed_values, T::from(MIDLINE_SENTINEL))
}
