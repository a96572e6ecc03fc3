use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Broad category of failure, mirroring the error kinds a chunk filter can
/// surface to its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  /// The 20-word parameter block does not have the shape the filter expects.
  BadParameterCount,
  /// The element class/size/sign/order combination has no matching element
  /// kind, or the order is neither little- nor big-endian.
  BadType,
  /// A parameter has a value outside its legal domain (e.g. a fixed minbits
  /// greater than `8 * size`, or the reserved float E-scale tag).
  BadValue,
  /// The host's native byte order could not be classified as LE or BE.
  BadEndianness,
  /// Allocating the output buffer failed.
  OutOfMemory,
  /// The container could not supply the dataset's fill value at set-local
  /// time even though it reported one as present.
  FillGetFailed,
}

/// The error type returned by every fallible operation in this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaleOffsetError {
  pub kind: ErrorKind,
  pub message: String,
}

impl ScaleOffsetError {
  pub fn new<S: AsRef<str>>(kind: ErrorKind, message: S) -> Self {
    ScaleOffsetError {
      kind,
      message: message.as_ref().to_string(),
    }
  }

  pub fn bad_parameter_count<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::BadParameterCount, message)
  }

  pub fn bad_type<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::BadType, message)
  }

  pub fn bad_value<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::BadValue, message)
  }

  pub fn bad_endianness<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::BadEndianness, message)
  }

  pub fn out_of_memory<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::OutOfMemory, message)
  }

  pub fn fill_get_failed<S: AsRef<str>>(message: S) -> Self {
    Self::new(ErrorKind::FillGetFailed, message)
  }
}

impl Display for ScaleOffsetError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "scaleoffset {:?} error: {}", self.kind, &self.message)
  }
}

impl Error for ScaleOffsetError {}

pub type ScaleOffsetResult<T> = Result<T, ScaleOffsetError>;
