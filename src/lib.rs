//! # sofa2json
//!
//! SOFA to JSON converter
//!
//! This crate reads `HRTF` data from `SOFA` files (Spatially Oriented Format
//! for Acoustics, stored as HDF5) and writes the sampling rate, source
//! positions and impulse responses into the positional `leaves` JSON layout
//! expected by the web player.
//!
//! The [`inspect`] module prints a diagnostic report about the structure of a
//! SOFA file without ever failing.
//!
//! [`inspect`]: `crate::inspect`
//!
//! # Example
//!
//! ```no_run
//! use sofa2json::reader::OpenOptions;
//! use sofa2json::convert::Converter;
//!
//! // Read the three fields directly
//! let sofa = OpenOptions::new()
//!     .validate(true)
//!     .open("my/sofa/file.sofa")
//!     .unwrap();
//!
//! let hrtf = sofa.read_hrtf().unwrap();
//! println!("{} positions at {} Hz", hrtf.positions.len(), hrtf.sampling_rate);
//!
//! // Or convert the whole file in one go
//! Converter::new()
//!     .pretty(false)
//!     .convert("my/sofa/file.sofa", "hrtf.json")
//!     .unwrap();
//! ```

pub use crate::{
    convert::convert,
    error::Error,
    inspect::inspect,
    leaves::{Leaves, Slot},
    reader::{Hrtf, HrirPair, OpenOptions, SofaFile},
};

pub mod convert;
pub mod inspect;
pub mod leaves;
pub mod reader;

mod error;

#[cfg(test)]
pub(crate) mod test_utils;
