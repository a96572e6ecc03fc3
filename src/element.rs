use crate::errors::{ScaleOffsetError, ScaleOffsetResult};

/// Broad numeric family of a chunk's elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementClass {
  Integer,
  Float,
}

/// Integer signedness. Meaningless for `ElementClass::Float`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
  Unsigned,
  TwosComplement,
}

/// Byte order, either as stored on disk or as used by the host CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
  Little,
  Big,
}

impl ByteOrder {
  /// The byte order of the host this code is compiled for. A compile-time
  /// constant, not a mutable global symbol consulted at runtime (Design
  /// Notes: "Global endianness constant").
  pub const NATIVE: ByteOrder = if cfg!(target_endian = "big") {
    ByteOrder::Big
  } else {
    ByteOrder::Little
  };

  /// Decodes the `order` parameter word (0 = LE, 1 = BE). Any other tag is
  /// neither little- nor big-endian and is rejected outright.
  pub fn from_tag(tag: u32) -> ScaleOffsetResult<Self> {
    match tag {
      0 => Ok(ByteOrder::Little),
      1 => Ok(ByteOrder::Big),
      other => Err(ScaleOffsetError::bad_endianness(format!(
        "order tag {} is neither little- nor big-endian",
        other,
      ))),
    }
  }
}

/// The triple that describes how a chunk's elements are laid out, as
/// supplied by the surrounding container's datatype system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
  pub class: ElementClass,
  pub size: u8,
  pub sign: Sign,
  pub stored_order: ByteOrder,
}

/// The closed set of element kinds the codec actually knows how to pack.
/// Derived from a `TypeDescriptor` by matching `(class, size, sign)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
  U8,
  U16,
  U32,
  U64,
  I8,
  I16,
  I32,
  I64,
  F32,
  F64,
}

impl ElementKind {
  pub fn bit_size(self) -> u32 {
    (self.byte_size() as u32) * 8
  }

  pub fn byte_size(self) -> usize {
    match self {
      ElementKind::U8 | ElementKind::I8 => 1,
      ElementKind::U16 | ElementKind::I16 => 2,
      ElementKind::U32 | ElementKind::I32 | ElementKind::F32 => 4,
      ElementKind::U64 | ElementKind::I64 | ElementKind::F64 => 8,
    }
  }

  pub fn class(self) -> ElementClass {
    match self {
      ElementKind::F32 | ElementKind::F64 => ElementClass::Float,
      _ => ElementClass::Integer,
    }
  }

  /// Derives the element kind from a type descriptor's class/size/sign.
  /// Fails if no supported kind matches -- e.g. a 3-byte integer, or a
  /// floating-point size other than 4 or 8.
  pub fn from_descriptor(desc: &TypeDescriptor) -> ScaleOffsetResult<Self> {
    use ElementClass::*;
    use Sign::*;
    let kind = match (desc.class, desc.size, desc.sign) {
      (Integer, 1, Unsigned) => ElementKind::U8,
      (Integer, 2, Unsigned) => ElementKind::U16,
      (Integer, 4, Unsigned) => ElementKind::U32,
      (Integer, 8, Unsigned) => ElementKind::U64,
      (Integer, 1, TwosComplement) => ElementKind::I8,
      (Integer, 2, TwosComplement) => ElementKind::I16,
      (Integer, 4, TwosComplement) => ElementKind::I32,
      (Integer, 8, TwosComplement) => ElementKind::I64,
      (Float, 4, _) => ElementKind::F32,
      (Float, 8, _) => ElementKind::F64,
      _ => {
        return Err(ScaleOffsetError::bad_type(format!(
          "no element kind matches class={:?} size={} sign={:?}",
          desc.class, desc.size, desc.sign,
        )))
      }
    };
    Ok(kind)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_derive_all_integer_kinds() {
    for &size in &[1u8, 2, 4, 8] {
      for &sign in &[Sign::Unsigned, Sign::TwosComplement] {
        let desc = TypeDescriptor {
          class: ElementClass::Integer,
          size,
          sign,
          stored_order: ByteOrder::Little,
        };
        assert!(ElementKind::from_descriptor(&desc).is_ok());
      }
    }
  }

  #[test]
  fn test_derive_float_kinds() {
    for &size in &[4u8, 8] {
      let desc = TypeDescriptor {
        class: ElementClass::Float,
        size,
        sign: Sign::Unsigned,
        stored_order: ByteOrder::Big,
      };
      assert!(ElementKind::from_descriptor(&desc).is_ok());
    }
  }

  #[test]
  fn test_unsupported_size_rejected() {
    let desc = TypeDescriptor {
      class: ElementClass::Integer,
      size: 3,
      sign: Sign::Unsigned,
      stored_order: ByteOrder::Little,
    };
    assert!(ElementKind::from_descriptor(&desc).is_err());
  }
}
