//! Reading of label color tables from text files.
//!
//! A color table file holds two lines per label: the label name, then the label key and its color as
//! `key red green blue alpha`, all integers, with the color channels in `0..=255`.
//!
//! ```text
//! Default
//! 0 255 255 255 0
//! V1
//! 1 220 20 10 255
//! ```

use log::debug;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{NiioError, Result};
use crate::gifti::{GiftiLabel, GiftiLabelTable};


/// Parse a color table from a reader. Line numbers in errors are 1-based.
pub fn colortable_from_reader<R: Read>(input: R) -> Result<GiftiLabelTable> {
    let mut lines: Vec<String> = Vec::new();
    for line in BufReader::new(input).lines() {
        lines.push(line?);
    }
    while lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        lines.pop();
    }
    if lines.len() % 2 != 0 {
        return Err(NiioError::InvalidColortable(
            lines.len(),
            String::from("label name without key and color line"),
        ));
    }

    let mut table = GiftiLabelTable::new();
    for (pair_idx, pair) in lines.chunks(2).enumerate() {
        let color_line = 2 * pair_idx + 2;
        let fields = pair[1]
            .split_whitespace()
            .map(|f| {
                f.parse::<i32>().map_err(|_| {
                    NiioError::InvalidColortable(color_line, format!("'{}' is not an integer", f))
                })
            })
            .collect::<Result<Vec<i32>>>()?;
        if fields.len() != 5 {
            return Err(NiioError::InvalidColortable(
                color_line,
                format!("expected 'key red green blue alpha', found {} values", fields.len()),
            ));
        }
        let mut rgba = [0.0f32; 4];
        for (channel, &value) in rgba.iter_mut().zip(&fields[1..]) {
            if !(0..=255).contains(&value) {
                return Err(NiioError::InvalidColortable(
                    color_line,
                    format!("color value {} is outside 0..=255", value),
                ));
            }
            *channel = value as f32 / 255.0;
        }
        table.push(GiftiLabel {
            key: fields[0],
            name: pair[0].trim().to_string(),
            rgba,
        });
    }
    Ok(table)
}


/// Read a label color table file, see the module documentation for the format.
pub fn read_colortable<P: AsRef<Path>>(path: P) -> Result<GiftiLabelTable> {
    let table = colortable_from_reader(File::open(&path)?)?;
    debug!("Read color table '{}' with {} labels.", path.as_ref().display(), table.len());
    Ok(table)
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn colortables_are_parsed() {
        let text = "Default\n0 255 255 255 0\n  V1 \n1 255 0 51 255\n\n";
        let table = colortable_from_reader(text.as_bytes()).unwrap();

        assert_eq!(2, table.len());
        assert_eq!("Default", table.labels[0].name);
        assert_eq!([1.0, 1.0, 1.0, 0.0], table.labels[0].rgba);
        assert_eq!("V1", table.labels[1].name);
        assert_eq!(1, table.labels[1].key);
        assert_eq!([255, 0, 51, 255], table.labels[1].rgba_u8());
    }

    #[test]
    fn dangling_names_are_rejected() {
        let text = "Default\n0 255 255 255 0\nV1\n";
        assert!(matches!(colortable_from_reader(text.as_bytes()), Err(NiioError::InvalidColortable(3, _))));
    }

    #[test]
    fn malformed_color_lines_are_rejected() {
        let short = "Default\n0 255 255\n";
        assert!(matches!(colortable_from_reader(short.as_bytes()), Err(NiioError::InvalidColortable(2, _))));

        let text = "Default\n0 255 red 255 0\n";
        assert!(matches!(colortable_from_reader(text.as_bytes()), Err(NiioError::InvalidColortable(2, _))));

        let range = "Default\n0 256 0 0 0\n";
        assert!(matches!(colortable_from_reader(range.as_bytes()), Err(NiioError::InvalidColortable(2, _))));
    }

    #[test]
    fn missing_colortable_files_are_io_errors() {
        assert!(matches!(read_colortable("/no/such/colortable.txt"), Err(NiioError::Io(_))));
    }
}
