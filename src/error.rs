use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum NiioError {
        /// The file extension does not map to any known loader.
        UnsupportedExtension(path: String) {
            display("Unsupported file extension: '{}'", path)
        }

        /// The format is known, but support for it was not compiled in.
        FormatDisabled(format: &'static str, feature: &'static str) {
            display("Reading {} files requires the '{}' feature", format, feature)
        }

        /// A requested dataset, key, data array or group is not in the container.
        DatasetNotFound(name: String) {
            display("File does not have dataset '{}'", name)
        }

        /// A vertex index lies outside the index space it is looked up in.
        IndexOutOfRange(index: i64, len: usize) {
            display("Index {} is out of range for an index space of size {}", index, len)
        }

        ShapeMismatch(what: &'static str, expected: usize, found: usize) {
            display("Shape mismatch for {}: expected {}, found {}", what, expected, found)
        }

        EmptyInput(what: &'static str) {
            display("No {} given", what)
        }

        InvalidMidline(index: usize, full_size: usize) {
            display("Midline vertex {} is outside the surface of {} vertices", index, full_size)
        }

        InvalidHemisphere(name: String) {
            display("Invalid hemisphere '{}', expected one of L, R, CortexLeft, CortexRight", name)
        }

        /// Invalid GIfTI file: bad structure or unsupported encoding.
        InvalidGiftiFormat(msg: String) {
            display("Invalid GIfTI file: {}", msg)
        }

        InvalidColortable(line: usize, msg: String) {
            display("Invalid color table at line {}: {}", line, msg)
        }

        /// The file parsed, but its content cannot be represented as numeric arrays.
        InvalidData(msg: String) {
            display("Invalid data: {}", msg)
        }

        MatFile(msg: String) {
            display("Cannot read Matlab file: {}", msg)
        }

        Hdf5(msg: String) {
            display("HDF5 error: {}", msg)
        }

        Xml(err: roxmltree::Error) {
            from()
            display("XML error: {}", err)
            source(err)
        }

        Base64(err: base64::DecodeError) {
            from()
            display("Base64 decoding error: {}", err)
            source(err)
        }

        Csv(err: csv::Error) {
            from()
            display("CSV error: {}", err)
            source(err)
        }

        Pickle(err: serde_pickle::Error) {
            from()
            display("Pickle error: {}", err)
            source(err)
        }

        Shape(err: ndarray::ShapeError) {
            from()
            display("Array shape error: {}", err)
            source(err)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            display("I/O error: {}", err)
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, NiioError>;
