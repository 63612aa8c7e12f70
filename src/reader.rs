//! This module reads the raw `HRTF` fields from `SOFA` files (Spatially
//! Oriented Format for Acoustics) through the HDF5 container they are stored
//! in.
//!
//! Only the three fields needed by the player are decoded: the sampling rate,
//! the source positions and the impulse responses. Every numeric type is
//! coerced to `f64` when read.

use crate::Error;

use std::fmt;
use std::path::Path;

use hdf5::types::{TypeDescriptor, VarLenAscii, VarLenUnicode};
use serde::{Serialize, Serializer};

/// Impulse responses, shape `(M, R, N)`.
pub const DATA_IR: &str = "Data.IR";
/// Source positions, shape `(M, 3)`.
pub const SOURCE_POSITION: &str = "SourcePosition";
/// Sampling rate in Hz, stored as a one element array.
pub const DATA_SAMPLING_RATE: &str = "Data.SamplingRate";

/// The fields every convertible file must contain.
pub const EXPECTED_FIELDS: [&str; 3] = [DATA_IR, SOURCE_POSITION, DATA_SAMPLING_RATE];

const DEFAULT_VALIDATE: bool = true;

#[derive(Clone, Debug)]
pub struct OpenOptions {
    validate: bool,
}

impl OpenOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Check that the number of source positions matches the number of
    /// impulse responses and that there are exactly two receivers. Default
    /// value is `true`.
    ///
    /// NaN and infinite values are rejected as well, JSON has no numbers for
    /// them.
    ///
    /// With validation turned off, mismatched counts are passed through, only
    /// the first two receivers are read and non-finite values are written as
    /// `null` with a warning.
    pub fn validate(&mut self, validate: bool) -> &mut Self {
        self.validate = validate;
        self
    }

    /// Open a SOFA file at `path` with open options specified in `self`
    ///
    /// ~~~no_run
    /// use sofa2json::OpenOptions;
    ///
    /// let sofa = OpenOptions::new()
    ///     .validate(false)
    ///     .open("my/sofa/file.sofa")
    ///     .unwrap();
    /// ~~~
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<SofaFile, Error> {
        let path = path.as_ref();
        let file = hdf5::File::open(path)?;

        log::debug!("opened {}", path.display());

        Ok(SofaFile {
            file,
            validate: self.validate,
        })
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        OpenOptions {
            validate: DEFAULT_VALIDATE,
        }
    }
}

/// Left and right impulse response for one measurement position.
///
/// Serializes as `[left, right]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HrirPair {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

impl Serialize for HrirPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.left, &self.right).serialize(serializer)
    }
}

/// The three fields of a SOFA file the player needs.
#[derive(Clone, Debug, PartialEq)]
pub struct Hrtf {
    pub sampling_rate: f64,
    /// `[azimuth, elevation, radius]` per measurement
    pub positions: Vec<[f64; 3]>,
    /// Same order as `positions`
    pub responses: Vec<HrirPair>,
}

/// Shape and element type of a dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    pub shape: Vec<usize>,
    pub dtype: String,
}

impl fmt::Display for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_shape(&self.shape), self.dtype)
    }
}

/// An open SOFA file. The underlying HDF5 handle is released on drop.
pub struct SofaFile {
    file: hdf5::File,
    validate: bool,
}

impl SofaFile {
    /// Open a SOFA file with the default open options
    ///
    /// ~~~no_run
    /// use sofa2json::SofaFile;
    ///
    /// let sofa = SofaFile::open("my/sofa/file.sofa").unwrap();
    /// ~~~
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SofaFile, Error> {
        OpenOptions::new().open(path)
    }

    /// Names of all top level members, sorted.
    pub fn field_names(&self) -> Result<Vec<String>, Error> {
        let mut names = self.file.member_names()?;
        names.sort();
        Ok(names)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.file.link_exists(name)
    }

    pub fn field_info(&self, name: &str) -> Result<FieldInfo, Error> {
        let dataset = self.dataset(name)?;
        dataset_info(&dataset)
    }

    /// The underlying HDF5 root group.
    pub fn root(&self) -> &hdf5::Group {
        &self.file
    }

    /// First element of `Data.SamplingRate` as a plain `f64`.
    pub fn sampling_rate(&self) -> Result<f64, Error> {
        let values = self.dataset(DATA_SAMPLING_RATE)?.read_raw::<f64>()?;
        let fs = first_element(&values)?;

        self.check_finite(DATA_SAMPLING_RATE, &[fs])?;
        Ok(fs)
    }

    /// First element of `Data.SamplingRate` formatted as stored: integers
    /// without a fraction, floats with one.
    pub fn sampling_rate_literal(&self) -> Result<String, Error> {
        let dataset = self.dataset(DATA_SAMPLING_RATE)?;
        let descriptor = dataset.dtype()?.to_descriptor()?;

        let literal = match descriptor {
            TypeDescriptor::Integer(_) => first_literal(dataset.read_raw::<i64>()?)?,
            TypeDescriptor::Unsigned(_) => first_literal(dataset.read_raw::<u64>()?)?,
            TypeDescriptor::Boolean => first_literal(dataset.read_raw::<bool>()?)?,
            TypeDescriptor::Float(_) => {
                format!("{:?}", first_element(&dataset.read_raw::<f64>()?)?)
            }
            TypeDescriptor::VarLenUnicode => {
                first_literal(dataset.read_raw::<VarLenUnicode>()?)?
            }
            TypeDescriptor::VarLenAscii => first_literal(dataset.read_raw::<VarLenAscii>()?)?,
            other => format!("<{}>", describe_type(&other)),
        };

        Ok(literal)
    }

    /// `SourcePosition` rows in file order.
    pub fn source_positions(&self) -> Result<Vec<[f64; 3]>, Error> {
        let dataset = self.dataset(SOURCE_POSITION)?;
        let shape = dataset.shape();
        let values = dataset.read_raw::<f64>()?;
        self.check_finite(SOURCE_POSITION, &values)?;

        positions_from_raw(&shape, &values)
    }

    /// `Data.IR` split into left/right pairs in file order.
    pub fn impulse_responses(&self) -> Result<Vec<HrirPair>, Error> {
        let dataset = self.dataset(DATA_IR)?;
        let shape = dataset.shape();
        let values = dataset.read_raw::<f64>()?;
        self.check_finite(DATA_IR, &values)?;

        responses_from_raw(&shape, &values, self.validate)
    }

    /// Read all three fields.
    pub fn read_hrtf(&self) -> Result<Hrtf, Error> {
        let sampling_rate = self.sampling_rate()?;
        let positions = self.source_positions()?;
        let responses = self.impulse_responses()?;

        if self.validate && positions.len() != responses.len() {
            return Err(Error::PositionCountMismatch {
                positions: positions.len(),
                responses: responses.len(),
            });
        }

        if positions.len() != responses.len() {
            log::warn!(
                "{} source positions but {} impulse responses",
                positions.len(),
                responses.len()
            );
        }

        Ok(Hrtf {
            sampling_rate,
            positions,
            responses,
        })
    }

    fn check_finite(&self, field: &'static str, values: &[f64]) -> Result<(), Error> {
        let Some(index) = values.iter().position(|v| !v.is_finite()) else {
            return Ok(());
        };

        let err = Error::NonFiniteValue {
            field,
            index,
            value: values[index],
        };

        if self.validate {
            return Err(err);
        }

        log::warn!("{}, written as null", err);
        Ok(())
    }

    fn dataset(&self, name: &str) -> Result<hdf5::Dataset, Error> {
        if !self.file.link_exists(name) {
            return Err(Error::MissingField(name.to_owned()));
        }

        Ok(self.file.dataset(name)?)
    }
}

pub(crate) fn dataset_info(dataset: &hdf5::Dataset) -> Result<FieldInfo, Error> {
    let descriptor = dataset.dtype()?.to_descriptor()?;

    Ok(FieldInfo {
        shape: dataset.shape(),
        dtype: describe_type(&descriptor),
    })
}

/// numpy style names for the numeric types, debug output for the rest
fn describe_type(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Integer(size) => format!("int{}", *size as usize * 8),
        TypeDescriptor::Unsigned(size) => format!("uint{}", *size as usize * 8),
        TypeDescriptor::Float(size) => format!("float{}", *size as usize * 8),
        TypeDescriptor::Boolean => "bool".to_owned(),
        other => format!("{:?}", other),
    }
}

/// Tuple notation: `(2,)`, `(2, 3)`.
fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_owned(),
        [n] => format!("({},)", n),
        dims => {
            let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", dims.join(", "))
        }
    }
}

fn first_element(values: &[f64]) -> Result<f64, Error> {
    values.first().copied().ok_or(Error::EmptySamplingRate)
}

fn first_literal<T: fmt::Display>(values: Vec<T>) -> Result<String, Error> {
    values
        .first()
        .map(|v| v.to_string())
        .ok_or(Error::EmptySamplingRate)
}

fn positions_from_raw(shape: &[usize], values: &[f64]) -> Result<Vec<[f64; 3]>, Error> {
    if shape.len() != 2 || shape[1] != 3 {
        return Err(Error::InvalidDimensions {
            field: SOURCE_POSITION,
            expected: "(M, 3)",
            found: shape.to_vec(),
        });
    }

    Ok(values
        .chunks_exact(3)
        .map(|row| [row[0], row[1], row[2]])
        .collect())
}

fn responses_from_raw(
    shape: &[usize],
    values: &[f64],
    validate: bool,
) -> Result<Vec<HrirPair>, Error> {
    let &[measurements, receivers, samples] = shape else {
        return Err(Error::InvalidDimensions {
            field: DATA_IR,
            expected: "(M, 2, N)",
            found: shape.to_vec(),
        });
    };

    if receivers < 2 || (validate && receivers != 2) {
        return Err(Error::InvalidChannelCount(receivers));
    }

    let stride = receivers * samples;
    let mut responses = Vec::with_capacity(measurements);

    for m in 0..measurements {
        let base = m * stride;
        let left = &values[base..base + samples];
        let right = &values[base + samples..base + 2 * samples];

        responses.push(HrirPair {
            left: left.to_vec(),
            right: right.to_vec(),
        });
    }

    Ok(responses)
}
