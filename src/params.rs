use crate::constants::{FILL_BYTES_LEN, N_PARAM_WORDS};
use crate::element::{ByteOrder, ElementClass, Sign, TypeDescriptor};
use crate::errors::{ScaleOffsetError, ScaleOffsetResult};

/// How a chunk's dynamic range is reduced to a bit count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleType {
  /// Decimal-digit rescale for floats: multiply by `10^scale_factor`, round,
  /// then bit-pack the integer codes.
  FloatDScale,
  /// Reserved tag for the fixed-minimum-bits float mode. Never implemented;
  /// `set_local`/`apply` reject it outright.
  FloatEScale,
  /// Integer bit-packing: `scale_factor` is either 0 (compute minbits per
  /// chunk) or a user-fixed minbits.
  IntMinBits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillState {
  Undefined,
  Defined,
}

/// The parameter block negotiated once per dataset and frozen thereafter.
/// Corresponds 1:1 to the 20-word layout in the external interface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
  pub scale_type: ScaleType,
  pub scale_factor: i32,
  pub d_nelmts: u32,
  pub class: ElementClass,
  pub size: u8,
  pub sign: Sign,
  pub order: ByteOrder,
  pub fill_state: FillState,
  pub fill_bytes: [u8; FILL_BYTES_LEN],
}

impl Params {
  pub fn type_descriptor(&self) -> TypeDescriptor {
    TypeDescriptor {
      class: self.class,
      size: self.size,
      sign: self.sign,
      stored_order: self.order,
    }
  }

  /// Serializes to the 20-word parameter block (§6.2).
  pub fn to_words(&self) -> [u32; N_PARAM_WORDS] {
    let mut words = [0u32; N_PARAM_WORDS];
    words[0] = match self.scale_type {
      ScaleType::FloatDScale => 0,
      ScaleType::FloatEScale => 1,
      ScaleType::IntMinBits => 2,
    };
    words[1] = self.scale_factor as u32;
    words[2] = self.d_nelmts;
    words[3] = match self.class {
      ElementClass::Integer => 0,
      ElementClass::Float => 1,
    };
    words[4] = self.size as u32;
    words[5] = match self.sign {
      Sign::Unsigned => 0,
      Sign::TwosComplement => 1,
    };
    words[6] = match self.order {
      ByteOrder::Little => 0,
      ByteOrder::Big => 1,
    };
    words[7] = match self.fill_state {
      FillState::Undefined => 0,
      FillState::Defined => 1,
    };
    for (i, &b) in self.fill_bytes.iter().enumerate() {
      words[8 + i] = b as u32;
    }
    words
  }

  /// Parses a 20-word parameter block. Fails with `BadParameterCount` if the
  /// slice isn't exactly `N_PARAM_WORDS` long.
  pub fn from_words(words: &[u32]) -> ScaleOffsetResult<Self> {
    if words.len() != N_PARAM_WORDS {
      return Err(ScaleOffsetError::bad_parameter_count(format!(
        "expected {} parameter words, got {}",
        N_PARAM_WORDS,
        words.len(),
      )));
    }

    let scale_type = match words[0] {
      0 => ScaleType::FloatDScale,
      1 => ScaleType::FloatEScale,
      _ => ScaleType::IntMinBits,
    };
    let class = match words[3] {
      0 => ElementClass::Integer,
      _ => ElementClass::Float,
    };
    let sign = match words[5] {
      0 => Sign::Unsigned,
      _ => Sign::TwosComplement,
    };
    let order = ByteOrder::from_tag(words[6])?;
    let fill_state = match words[7] {
      0 => FillState::Undefined,
      _ => FillState::Defined,
    };
    let mut fill_bytes = [0u8; FILL_BYTES_LEN];
    for i in 0..FILL_BYTES_LEN {
      fill_bytes[i] = words[8 + i] as u8;
    }

    Ok(Params {
      scale_type,
      scale_factor: words[1] as i32,
      d_nelmts: words[2],
      class,
      size: words[4] as u8,
      sign,
      order,
      fill_state,
      fill_bytes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Params {
    Params {
      scale_type: ScaleType::IntMinBits,
      scale_factor: 0,
      d_nelmts: 1000,
      class: ElementClass::Integer,
      size: 4,
      sign: Sign::TwosComplement,
      order: ByteOrder::Little,
      fill_state: FillState::Defined,
      fill_bytes: [7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    }
  }

  #[test]
  fn test_round_trip_words() {
    let params = sample();
    let words = params.to_words();
    assert_eq!(words.len(), N_PARAM_WORDS);
    let back = Params::from_words(&words).unwrap();
    assert_eq!(back, params);
  }

  #[test]
  fn test_bad_parameter_count() {
    let words = vec![0u32; 19];
    assert!(Params::from_words(&words).is_err());
  }
}
