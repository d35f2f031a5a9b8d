//! Functions for reading and writing GIfTI surface data files.
//!
//! A GIfTI file is an XML document holding one or more data arrays, typically one value per vertex of a
//! brain surface mesh. Files written by this module are per-vertex overlays: scalar maps (`.func.gii`) or
//! label maps (`.label.gii`) with a label table that names each label and assigns it a display color.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use byteordered::{ByteOrdered, Endianness};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use ndarray::{Array1, ArrayD, ArrayView1, IxDyn, ShapeBuilder};
use roxmltree::{Document, Node, ParsingOptions};

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{NiioError, Result};
use crate::util::{column_stack, squeeze};

pub const INTENT_NONE: &str = "NIFTI_INTENT_NONE";
pub const INTENT_LABEL: &str = "NIFTI_INTENT_LABEL";

/// Metadata key used by surface viewers to match an overlay to a hemisphere.
pub const META_ANATOMICAL_STRUCTURE: &str = "AnatomicalStructurePrimary";

const GIFTI_DOCTYPE: &str = r#"<!DOCTYPE GIFTI SYSTEM "http://www.nitrc.org/frs/download.php/115/gifti.dtd">"#;


/// The element type of a GIfTI data array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftiDataType {
    UInt8,
    Int32,
    Float32,
    Float64,
}

impl GiftiDataType {
    pub fn name(&self) -> &'static str {
        match self {
            GiftiDataType::UInt8 => "NIFTI_TYPE_UINT8",
            GiftiDataType::Int32 => "NIFTI_TYPE_INT32",
            GiftiDataType::Float32 => "NIFTI_TYPE_FLOAT32",
            GiftiDataType::Float64 => "NIFTI_TYPE_FLOAT64",
        }
    }

    pub fn from_name(name: &str) -> Result<GiftiDataType> {
        match name.trim() {
            "NIFTI_TYPE_UINT8" => Ok(GiftiDataType::UInt8),
            "NIFTI_TYPE_INT32" => Ok(GiftiDataType::Int32),
            "NIFTI_TYPE_FLOAT32" => Ok(GiftiDataType::Float32),
            "NIFTI_TYPE_FLOAT64" => Ok(GiftiDataType::Float64),
            other => Err(NiioError::InvalidGiftiFormat(format!("unsupported data type '{}'", other))),
        }
    }

    /// Size of one element in bytes.
    pub fn byte_size(&self) -> usize {
        match self {
            GiftiDataType::UInt8 => 1,
            GiftiDataType::Int32 | GiftiDataType::Float32 => 4,
            GiftiDataType::Float64 => 8,
        }
    }
}


/// A brain hemisphere, as stored in the `AnatomicalStructurePrimary` metadata of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    /// The GIfTI anatomical structure name, `CortexLeft` or `CortexRight`.
    pub fn structure_name(&self) -> &'static str {
        match self {
            Hemisphere::Left => "CortexLeft",
            Hemisphere::Right => "CortexRight",
        }
    }
}

impl FromStr for Hemisphere {
    type Err = NiioError;

    fn from_str(s: &str) -> Result<Hemisphere> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "lh" | "left" | "cortexleft" => Ok(Hemisphere::Left),
            "r" | "rh" | "right" | "cortexright" => Ok(Hemisphere::Right),
            _ => Err(NiioError::InvalidHemisphere(s.to_string())),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.structure_name())
    }
}


/// One entry of a label table. The color channels are in `[0, 1]`, as stored in GIfTI files.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftiLabel {
    pub key: i32,
    pub name: String,
    pub rgba: [f32; 4],
}

impl GiftiLabel {
    /// The label color as u8 RGBA values.
    pub fn rgba_u8(&self) -> [u8; 4] {
        let mut rgba = [0u8; 4];
        for (out, c) in rgba.iter_mut().zip(self.rgba.iter()) {
            *out = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        rgba
    }
}


/// Models the label table of a GIfTI label overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftiLabelTable {
    pub labels: Vec<GiftiLabel>,
}

impl GiftiLabelTable {
    pub fn new() -> GiftiLabelTable {
        GiftiLabelTable::default()
    }

    pub fn push(&mut self, label: GiftiLabel) {
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Get the label with the given key, if any.
    pub fn get(&self, key: i32) -> Option<&GiftiLabel> {
        self.labels.iter().find(|l| l.key == key)
    }

    /// Get the label names, in table order.
    pub fn names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }

    /// Get the colors for the given per-vertex labels, 3 (RGB) or 4 (RGBA) values per vertex.
    ///
    /// Vertices with a label that is not in the table get the color of the first table entry, or black if the table is empty.
    pub fn vertex_colors<I>(&self, labels: I, alpha: bool) -> Vec<u8>
    where
        I: IntoIterator<Item = i32>,
    {
        let fallback = self.labels.first().map(|l| l.rgba_u8()).unwrap_or([0, 0, 0, 255]);
        let mut colors = Vec::new();
        for key in labels {
            let rgba = self.get(key).map(|l| l.rgba_u8()).unwrap_or(fallback);
            let channels = if alpha { 4 } else { 3 };
            colors.extend_from_slice(&rgba[..channels]);
        }
        colors
    }
}

impl fmt::Display for GiftiLabelTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Label table with {} labels.", self.labels.len())
    }
}


/// A single data array of a GIfTI file. Values of all data types are held as `f64`, which represents them exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftiDataArray {
    pub intent: String,
    pub datatype: GiftiDataType,
    pub meta: Vec<(String, String)>,
    pub data: ArrayD<f64>,
}

impl GiftiDataArray {
    /// A float32 data array holding one scalar per vertex.
    pub fn from_scalars(values: ArrayView1<f64>) -> GiftiDataArray {
        GiftiDataArray {
            intent: String::from(INTENT_NONE),
            datatype: GiftiDataType::Float32,
            meta: Vec::new(),
            data: values.to_owned().into_dyn(),
        }
    }

    /// An int32 data array holding one label key per vertex.
    pub fn from_labels(labels: ArrayView1<i32>) -> GiftiDataArray {
        GiftiDataArray {
            intent: String::from(INTENT_LABEL),
            datatype: GiftiDataType::Int32,
            meta: Vec::new(),
            data: labels.mapv(f64::from).into_dyn(),
        }
    }

    pub fn is_label(&self) -> bool {
        self.intent == INTENT_LABEL
    }

    /// Get the values as label keys. Non-integer values are truncated.
    pub fn labels(&self) -> Array1<i32> {
        self.data.iter().map(|&v| v as i32).collect()
    }

    fn encode(&self) -> Result<String> {
        let mut raw: Vec<u8> = Vec::with_capacity(self.data.len() * self.datatype.byte_size());
        {
            let mut out = ByteOrdered::le(&mut raw);
            for &v in self.data.iter() {
                match self.datatype {
                    GiftiDataType::UInt8 => out.write_u8(v as u8)?,
                    GiftiDataType::Int32 => out.write_i32(v as i32)?,
                    GiftiDataType::Float32 => out.write_f32(v as f32)?,
                    GiftiDataType::Float64 => out.write_f64(v)?,
                }
            }
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        let compressed = encoder.finish()?;
        Ok(STANDARD.encode(compressed))
    }
}


/// Models a GIfTI file: file-level metadata, an optional label table and the data arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftiImage {
    pub meta: Vec<(String, String)>,
    pub label_table: Option<GiftiLabelTable>,
    pub darrays: Vec<GiftiDataArray>,
}

impl GiftiImage {
    pub fn new() -> GiftiImage {
        GiftiImage::default()
    }

    /// An empty image tagged with the anatomical structure of the given hemisphere.
    pub fn for_hemisphere(hemisphere: Hemisphere) -> GiftiImage {
        GiftiImage {
            meta: vec![(
                String::from(META_ANATOMICAL_STRUCTURE),
                String::from(hemisphere.structure_name()),
            )],
            ..GiftiImage::default()
        }
    }

    /// Get the value of a file-level metadata entry.
    pub fn meta_value(&self, name: &str) -> Option<&str> {
        self.meta.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// The hemisphere from the `AnatomicalStructurePrimary` metadata, if present and valid.
    pub fn hemisphere(&self) -> Option<Hemisphere> {
        self.meta_value(META_ANATOMICAL_STRUCTURE).and_then(|v| v.parse().ok())
    }

    pub fn add_data_array(&mut self, darray: GiftiDataArray) {
        self.darrays.push(darray);
    }

    /// Colors of the first label data array, looked up in the label table. Empty without a label array or table.
    pub(crate) fn label_colors(&self, alpha: bool) -> Vec<u8> {
        let table = match &self.label_table {
            Some(table) => table,
            None => return Vec::new(),
        };
        match self.darrays.iter().find(|da| da.is_label()) {
            Some(darray) => table.vertex_colors(darray.labels().iter().copied(), alpha),
            None => Vec::new(),
        }
    }

    /// Read a GIfTI image from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<GiftiImage> {
        let xml = std::fs::read_to_string(&path)?;
        let image = GiftiImage::parse(&xml)?;
        debug!("Read GIfTI file '{}' with {} data arrays.", path.as_ref().display(), image.darrays.len());
        Ok(image)
    }

    /// Parse a GIfTI image from its XML representation.
    pub fn parse(xml: &str) -> Result<GiftiImage> {
        let opts = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
        let doc = Document::parse_with_options(xml, opts)?;
        let root = doc.root_element();
        if !root.has_tag_name("GIFTI") {
            return Err(NiioError::InvalidGiftiFormat(format!(
                "root element is '{}', expected 'GIFTI'",
                root.tag_name().name()
            )));
        }

        let meta = root
            .children()
            .find(|n| n.has_tag_name("MetaData"))
            .map(parse_meta)
            .unwrap_or_default();
        let label_table = root
            .children()
            .find(|n| n.has_tag_name("LabelTable"))
            .map(parse_label_table)
            .transpose()?;
        let darrays = root
            .children()
            .filter(|n| n.has_tag_name("DataArray"))
            .map(parse_data_array)
            .collect::<Result<Vec<_>>>()?;

        if let Some(declared) = root.attribute("NumberOfDataArrays") {
            let declared: usize = parse_attr(declared, "NumberOfDataArrays")?;
            if declared != darrays.len() {
                return Err(NiioError::ShapeMismatch("GIfTI data arrays", declared, darrays.len()));
            }
        }

        Ok(GiftiImage { meta, label_table, darrays })
    }

    /// Write the image to a file as GIfTI XML, with gzip-compressed, base64-encoded, little-endian data.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = BufWriter::new(File::create(&path)?);
        self.to_writer(file)?;
        debug!("Wrote GIfTI file '{}' with {} data arrays.", path.as_ref().display(), self.darrays.len());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(writer, "{}", GIFTI_DOCTYPE)?;
        writeln!(writer, r#"<GIFTI Version="1.0" NumberOfDataArrays="{}">"#, self.darrays.len())?;
        write_meta(&mut writer, "  ", &self.meta)?;
        if let Some(table) = &self.label_table {
            writeln!(writer, "  <LabelTable>")?;
            for label in &table.labels {
                writeln!(
                    writer,
                    r#"    <Label Key="{}" Red="{:.6}" Green="{:.6}" Blue="{:.6}" Alpha="{:.6}">{}</Label>"#,
                    label.key, label.rgba[0], label.rgba[1], label.rgba[2], label.rgba[3], cdata(&label.name)
                )?;
            }
            writeln!(writer, "  </LabelTable>")?;
        }
        for darray in &self.darrays {
            let dims: String = darray
                .data
                .shape()
                .iter()
                .enumerate()
                .map(|(i, d)| format!(r#" Dim{}="{}""#, i, d))
                .collect();
            writeln!(
                writer,
                r#"  <DataArray Intent="{}" DataType="{}" ArrayIndexingOrder="RowMajorOrder" Dimensionality="{}"{} Encoding="GZipBase64Binary" Endian="LittleEndian" ExternalFileName="" ExternalFileOffset="">"#,
                darray.intent,
                darray.datatype.name(),
                darray.data.ndim(),
                dims
            )?;
            write_meta(&mut writer, "    ", &darray.meta)?;
            writeln!(writer, "    <Data>{}</Data>", darray.encode()?)?;
            writeln!(writer, "  </DataArray>")?;
        }
        writeln!(writer, "</GIFTI>")?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for GiftiImage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GIfTI image with {} data arrays", self.darrays.len())?;
        if let Some(hemi) = self.hemisphere() {
            write!(f, " for {}", hemi)?;
        }
        write!(f, ".")
    }
}


fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn write_meta<W: Write>(writer: &mut W, indent: &str, meta: &[(String, String)]) -> Result<()> {
    if meta.is_empty() {
        writeln!(writer, "{}<MetaData/>", indent)?;
        return Ok(());
    }
    writeln!(writer, "{}<MetaData>", indent)?;
    for (name, value) in meta {
        writeln!(
            writer,
            "{}  <MD><Name>{}</Name><Value>{}</Value></MD>",
            indent,
            cdata(name),
            cdata(value)
        )?;
    }
    writeln!(writer, "{}</MetaData>", indent)?;
    Ok(())
}

fn child_text(node: Node, tag: &str) -> String {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .unwrap_or("")
        .trim()
        .to_string()
}

fn parse_attr<T: FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| NiioError::InvalidGiftiFormat(format!("invalid value '{}' for attribute {}", raw, name)))
}

fn parse_meta(node: Node) -> Vec<(String, String)> {
    node.children()
        .filter(|n| n.has_tag_name("MD"))
        .map(|md| (child_text(md, "Name"), child_text(md, "Value")))
        .collect()
}

fn parse_label_table(node: Node) -> Result<GiftiLabelTable> {
    let mut table = GiftiLabelTable::new();
    for label in node.children().filter(|n| n.has_tag_name("Label")) {
        // Files written before GIfTI 1.0 use 'Index' instead of 'Key'.
        let key = label
            .attribute("Key")
            .or_else(|| label.attribute("Index"))
            .ok_or_else(|| NiioError::InvalidGiftiFormat(String::from("label without key")))?;
        let key: i32 = parse_attr(key, "Key")?;
        let mut rgba = [0.0, 0.0, 0.0, 1.0];
        for (channel, name) in rgba.iter_mut().zip(["Red", "Green", "Blue", "Alpha"]) {
            if let Some(raw) = label.attribute(name) {
                *channel = parse_attr(raw, name)?;
            }
        }
        let name = label.text().unwrap_or("").trim().to_string();
        table.push(GiftiLabel { key, name, rgba });
    }
    Ok(table)
}

fn parse_data_array(node: Node) -> Result<GiftiDataArray> {
    let datatype = GiftiDataType::from_name(
        node.attribute("DataType")
            .ok_or_else(|| NiioError::InvalidGiftiFormat(String::from("data array without DataType")))?,
    )?;
    let ndim: usize = parse_attr(node.attribute("Dimensionality").unwrap_or("1"), "Dimensionality")?;
    let dims = (0..ndim)
        .map(|i| {
            let name = format!("Dim{}", i);
            let raw = node
                .attribute(name.as_str())
                .ok_or_else(|| NiioError::InvalidGiftiFormat(format!("data array without {}", name)))?;
            parse_attr::<usize>(raw, &name)
        })
        .collect::<Result<Vec<usize>>>()?;
    let endian = match node.attribute("Endian").unwrap_or("LittleEndian") {
        "LittleEndian" => Endianness::Little,
        "BigEndian" => Endianness::Big,
        other => return Err(NiioError::InvalidGiftiFormat(format!("unsupported endianness '{}'", other))),
    };
    let column_major = node.attribute("ArrayIndexingOrder") == Some("ColumnMajorOrder");
    let encoding = node.attribute("Encoding").unwrap_or("ASCII");
    let text = node
        .children()
        .find(|n| n.has_tag_name("Data"))
        .and_then(|n| n.text())
        .unwrap_or("");

    let expected = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| NiioError::InvalidGiftiFormat(String::from("data array dimensions overflow")))?;
    let values: Vec<f64> = if expected == 0 {
        Vec::new()
    } else {
        match encoding {
            "ASCII" => text
                .split_whitespace()
                .map(|t| parse_attr::<f64>(t, "Data"))
                .collect::<Result<Vec<f64>>>()?,
            "Base64Binary" => decode_binary(&decode_base64(text)?, datatype, endian)?,
            "GZipBase64Binary" => {
                let compressed = decode_base64(text)?;
                let mut raw = Vec::new();
                ZlibDecoder::new(&compressed[..]).read_to_end(&mut raw)?;
                decode_binary(&raw, datatype, endian)?
            }
            other => {
                return Err(NiioError::InvalidGiftiFormat(format!("unsupported encoding '{}'", other)))
            }
        }
    };
    if values.len() != expected {
        return Err(NiioError::ShapeMismatch("GIfTI data array values", expected, values.len()));
    }

    let data = if column_major {
        ArrayD::from_shape_vec(IxDyn(&dims).f(), values)?
    } else {
        ArrayD::from_shape_vec(IxDyn(&dims), values)?
    };

    Ok(GiftiDataArray {
        intent: node.attribute("Intent").unwrap_or(INTENT_NONE).to_string(),
        datatype,
        meta: node
            .children()
            .find(|n| n.has_tag_name("MetaData"))
            .map(parse_meta)
            .unwrap_or_default(),
        data,
    })
}

fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

fn decode_binary(bytes: &[u8], datatype: GiftiDataType, endian: Endianness) -> Result<Vec<f64>> {
    let size = datatype.byte_size();
    if bytes.len() % size != 0 {
        return Err(NiioError::InvalidGiftiFormat(format!(
            "{} data bytes is not a multiple of the element size {}",
            bytes.len(),
            size
        )));
    }
    let mut input = ByteOrdered::runtime(bytes, endian);
    let mut values = Vec::with_capacity(bytes.len() / size);
    for _ in 0..bytes.len() / size {
        let v = match datatype {
            GiftiDataType::UInt8 => f64::from(input.read_u8()?),
            GiftiDataType::Int32 => f64::from(input.read_i32()?),
            GiftiDataType::Float32 => f64::from(input.read_f32()?),
            GiftiDataType::Float64 => input.read_f64()?,
        };
        values.push(v);
    }
    Ok(values)
}


/// Read a GIfTI file.
///
/// # Examples
///
/// ```no_run
/// let gii = niio::read_gifti("/path/to/lh.thickness.func.gii").unwrap();
/// println!("{}", gii);
/// ```
pub fn read_gifti<P: AsRef<Path>>(path: P) -> Result<GiftiImage> {
    GiftiImage::from_file(path)
}


/// Load the data of a GIfTI file as one array.
///
/// The data arrays with the given indices (all of them if `darrays` is empty) are squeezed and stacked as
/// columns, and the result is squeezed again: a file with a single per-vertex array yields a vector, a
/// file with `k` per-vertex arrays yields a `vertices x k` matrix.
pub fn load_gii<P: AsRef<Path>>(path: P, darrays: &[usize]) -> Result<ArrayD<f64>> {
    let image = read_gifti(&path)?;
    if image.darrays.is_empty() {
        return Err(NiioError::InvalidGiftiFormat(String::from("file contains no data arrays")));
    }
    let selected: Vec<usize> = if darrays.is_empty() {
        (0..image.darrays.len()).collect()
    } else {
        darrays.to_vec()
    };
    let arrays = selected
        .iter()
        .map(|&idx| {
            image.darrays
                .get(idx)
                .map(|da| squeeze(da.data.clone()))
                .ok_or_else(|| NiioError::DatasetNotFound(format!("data array {}", idx)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(squeeze(column_stack(&arrays)?.into_dyn()))
}


#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use tempfile::tempdir;

    const ASCII_GIFTI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE GIFTI SYSTEM "http://www.nitrc.org/frs/download.php/115/gifti.dtd">
<GIFTI Version="1.0" NumberOfDataArrays="1">
  <MetaData>
    <MD><Name><![CDATA[AnatomicalStructurePrimary]]></Name><Value><![CDATA[CortexRight]]></Value></MD>
  </MetaData>
  <DataArray Intent="NIFTI_INTENT_NONE" DataType="NIFTI_TYPE_FLOAT32" ArrayIndexingOrder="ColumnMajorOrder" Dimensionality="2" Dim0="3" Dim1="2" Encoding="ASCII" Endian="LittleEndian" ExternalFileName="" ExternalFileOffset="">
    <Data>1 2 3 4 5 6</Data>
  </DataArray>
</GIFTI>
"#;

    #[test]
    fn ascii_column_major_arrays_are_read_correctly() {
        let gii = GiftiImage::parse(ASCII_GIFTI).unwrap();
        assert_eq!(Some(Hemisphere::Right), gii.hemisphere());
        assert_eq!(1, gii.darrays.len());
        assert_eq!(array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]].into_dyn(), gii.darrays[0].data);
    }

    #[test]
    fn big_endian_base64_arrays_are_read_correctly() {
        let mut bytes = Vec::new();
        for v in [7i32, -2, 40000] {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
        let xml = format!(
            r#"<GIFTI NumberOfDataArrays="1"><DataArray Intent="NIFTI_INTENT_LABEL" DataType="NIFTI_TYPE_INT32" Dimensionality="1" Dim0="3" Encoding="Base64Binary" Endian="BigEndian"><Data>{}</Data></DataArray></GIFTI>"#,
            STANDARD.encode(&bytes)
        );
        let gii = GiftiImage::parse(&xml).unwrap();
        assert!(gii.darrays[0].is_label());
        assert_eq!(array![7, -2, 40000], gii.darrays[0].labels());
    }

    #[test]
    fn wrong_value_count_is_rejected() {
        let xml = r#"<GIFTI><DataArray DataType="NIFTI_TYPE_FLOAT32" Dimensionality="1" Dim0="4" Encoding="ASCII"><Data>1 2 3</Data></DataArray></GIFTI>"#;
        assert!(matches!(GiftiImage::parse(xml), Err(NiioError::ShapeMismatch(_, 4, 3))));
    }

    #[test]
    fn label_colors_need_a_label_array_and_a_table() {
        let mut gii = GiftiImage::for_hemisphere(Hemisphere::Right);
        gii.add_data_array(GiftiDataArray::from_labels(array![3, 7].view()));
        assert!(gii.label_colors(false).is_empty());

        let mut table = GiftiLabelTable::new();
        table.push(GiftiLabel { key: 3, name: String::from("V1"), rgba: [0.0, 1.0, 0.0, 1.0] });
        gii.label_table = Some(table);
        assert_eq!(vec![0, 255, 0, 0, 255, 0], gii.label_colors(false));
        assert_eq!(vec![0, 255, 0, 255, 0, 255, 0, 255], gii.label_colors(true));
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let xml = r#"<GIFTI><DataArray DataType="NIFTI_TYPE_FLOAT32" Dimensionality="2" Dim0="18446744073709551615" Dim1="2" Encoding="ASCII"><Data>1 2</Data></DataArray></GIFTI>"#;
        assert!(matches!(GiftiImage::parse(xml), Err(NiioError::InvalidGiftiFormat(_))));
    }

    #[test]
    fn external_file_encoding_is_rejected() {
        let xml = r#"<GIFTI><DataArray DataType="NIFTI_TYPE_FLOAT32" Dimensionality="1" Dim0="1" Encoding="ExternalFileBinary"><Data></Data></DataArray></GIFTI>"#;
        assert!(matches!(GiftiImage::parse(xml), Err(NiioError::InvalidGiftiFormat(_))));
    }

    #[test]
    fn non_gifti_documents_are_rejected() {
        assert!(matches!(GiftiImage::parse("<NIFTI/>"), Err(NiioError::InvalidGiftiFormat(_))));
        assert!(matches!(GiftiImage::parse("<GIFTI"), Err(NiioError::Xml(_))));
    }

    #[test]
    fn hemisphere_names_are_parsed() {
        assert_eq!(Hemisphere::Left, "L".parse().unwrap());
        assert_eq!(Hemisphere::Left, "CortexLeft".parse().unwrap());
        assert_eq!(Hemisphere::Right, "rh".parse().unwrap());
        assert_eq!("CortexRight", Hemisphere::Right.to_string());
        assert!(matches!("both".parse::<Hemisphere>(), Err(NiioError::InvalidHemisphere(_))));
    }

    #[test]
    fn images_survive_a_write_read_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lh.test.label.gii");

        let mut table = GiftiLabelTable::new();
        table.push(GiftiLabel { key: 0, name: String::from("???"), rgba: [0.0, 0.0, 0.0, 0.0] });
        table.push(GiftiLabel { key: 3, name: String::from("V1 <primary>"), rgba: [1.0, 0.5, 0.0, 1.0] });

        let mut gii = GiftiImage::for_hemisphere(Hemisphere::Left);
        gii.label_table = Some(table.clone());
        gii.add_data_array(GiftiDataArray::from_labels(array![0, 3, 3, 0].view()));
        gii.add_data_array(GiftiDataArray::from_scalars(array![0.25, -1.5, 2.0, 1e-3].view()));
        gii.to_file(&path).unwrap();

        let read = read_gifti(&path).unwrap();
        assert_eq!(Some(Hemisphere::Left), read.hemisphere());
        assert_eq!(Some(&table), read.label_table.as_ref());
        assert_eq!(2, read.darrays.len());
        assert_eq!(GiftiDataType::Int32, read.darrays[0].datatype);
        assert_eq!(array![0, 3, 3, 0], read.darrays[0].labels());
        assert_abs_diff_eq!(
            array![0.25, -1.5, 2.0, 1e-3].into_dyn(),
            read.darrays[1].data,
            epsilon = 1e-6
        );
    }

    #[test]
    fn load_gii_stacks_selected_arrays_as_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rh.multi.func.gii");
        let mut gii = GiftiImage::for_hemisphere(Hemisphere::Right);
        gii.add_data_array(GiftiDataArray::from_scalars(array![1.0, 2.0, 3.0].view()));
        gii.add_data_array(GiftiDataArray::from_scalars(array![4.0, 5.0, 6.0].view()));
        gii.to_file(&path).unwrap();

        let all = load_gii(&path, &[]).unwrap();
        assert_eq!(array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]].into_dyn(), all);

        let second = load_gii(&path, &[1]).unwrap();
        assert_eq!(array![4.0, 5.0, 6.0].into_dyn(), second);

        assert!(matches!(load_gii(&path, &[2]), Err(NiioError::DatasetNotFound(_))));
    }

    #[test]
    fn label_tables_give_vertex_colors() {
        let mut table = GiftiLabelTable::new();
        table.push(GiftiLabel { key: 0, name: String::from("unknown"), rgba: [0.0, 0.0, 0.0, 1.0] });
        table.push(GiftiLabel { key: 5, name: String::from("motor"), rgba: [1.0, 0.0, 1.0, 1.0] });

        assert_eq!(vec![255, 0, 255, 0, 0, 0, 0, 0, 0], table.vertex_colors(vec![5, 0, 17], false));
        assert_eq!(8, table.vertex_colors(vec![5, 5], true).len());
        assert_eq!(vec![String::from("unknown"), String::from("motor")], table.names());
    }
}
