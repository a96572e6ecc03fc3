use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::constants::HEADER_LEN;
use crate::element::{ByteOrder, ElementClass, ElementKind};
use crate::endian::swap_elements_in_place;
use crate::errors::{ScaleOffsetError, ScaleOffsetResult};
use crate::header::ChunkHeader;
use crate::params::{FillState, Params, ScaleType};
use crate::pipeline::float::{self, FloatElement};
use crate::pipeline::integer::{self, IntegerElement};
use crate::pipeline::PipelineOutcome;
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
  Compress,
  Decompress,
}

/// Applies the filter to `input`, returning the transformed buffer. On any
/// error the caller keeps its existing buffer untouched -- this function
/// never mutates `input` in place, so there is nothing to roll back (§4.2,
/// failure semantics).
pub fn apply(direction: Direction, params: &Params, input: &[u8]) -> ScaleOffsetResult<Vec<u8>> {
  let kind = ElementKind::from_descriptor(&params.type_descriptor())?;
  let bits = kind.bit_size();
  let size = kind.byte_size();

  let scale_factor = match (params.class, params.scale_type) {
    (ElementClass::Integer, ScaleType::IntMinBits) => params.scale_factor.max(0),
    (ElementClass::Float, ScaleType::FloatDScale) => params.scale_factor,
    (ElementClass::Float, ScaleType::FloatEScale) => {
      return Err(ScaleOffsetError::bad_value(
        "the fixed-minimum-bits float mode is reserved but not implemented",
      ))
    }
    _ => {
      return Err(ScaleOffsetError::bad_value(format!(
        "scale_type {:?} does not match element class {:?}",
        params.scale_type, params.class,
      )))
    }
  };

  let fixed_minbits = match params.class {
    ElementClass::Integer if scale_factor > 0 => {
      if scale_factor as u32 > bits {
        return Err(ScaleOffsetError::bad_value(format!(
          "fixed minbits {} exceeds element width {}",
          scale_factor, bits,
        )));
      }
      Some(scale_factor as u32)
    }
    _ => None,
  };

  if params.class == ElementClass::Integer && scale_factor == bits as i32 {
    trace!("scaleoffset apply: scale_factor == 8*size, passthrough");
    return Ok(input.to_vec());
  }

  let need_convert = params.order != ByteOrder::NATIVE;

  match direction {
    Direction::Compress => compress(kind, size, bits, params, fixed_minbits, scale_factor, need_convert, input),
    Direction::Decompress => decompress(kind, size, bits, params, scale_factor, need_convert, input),
  }
}

fn decode_int_fill<T: IntegerElement>(params: &Params) -> Option<T> {
  match params.fill_state {
    FillState::Defined => Some(T::from_le_bytes(&params.fill_bytes)),
    FillState::Undefined => None,
  }
}

fn decode_float_fill<F: FloatElement>(params: &Params) -> Option<F> {
  match params.fill_state {
    FillState::Defined => Some(F::from_le_bytes(&params.fill_bytes)),
    FillState::Undefined => None,
  }
}

/// Loads `size` native-order bytes into a `u64` register: the low bits of
/// the register, independent of the host's own endianness. Every pipeline
/// always writes non-negative codes into the low bits of their native
/// container, so this is the one place the packer needs to know about host
/// endianness at all.
fn load_register(bytes: &[u8], size: usize) -> u64 {
  let mut buf = [0u8; 8];
  if cfg!(target_endian = "big") {
    buf[8 - size..].copy_from_slice(bytes);
  } else {
    buf[..size].copy_from_slice(bytes);
  }
  u64::from_ne_bytes(buf)
}

fn store_register(value: u64, size: usize, out: &mut [u8]) {
  let buf = value.to_ne_bytes();
  if cfg!(target_endian = "big") {
    out.copy_from_slice(&buf[8 - size..]);
  } else {
    out.copy_from_slice(&buf[..size]);
  }
}

#[allow(clippy::too_many_arguments)]
fn compress(
  kind: ElementKind,
  size: usize,
  bits: u32,
  params: &Params,
  fixed_minbits: Option<u32>,
  scale_factor: i32,
  need_convert: bool,
  input: &[u8],
) -> ScaleOffsetResult<Vec<u8>> {
  let mut work = input.to_vec();
  if need_convert {
    swap_elements_in_place(&mut work, size);
  }

  let outcome = match kind {
    ElementKind::U8 => integer::preprocess::<u8>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::U16 => integer::preprocess::<u16>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::U32 => integer::preprocess::<u32>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::U64 => integer::preprocess::<u64>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::I8 => integer::preprocess::<i8>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::I16 => integer::preprocess::<i16>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::I32 => integer::preprocess::<i32>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::I64 => integer::preprocess::<i64>(&mut work, decode_int_fill(params), fixed_minbits),
    ElementKind::F32 => float::preprocess::<f32>(&mut work, decode_float_fill(params), scale_factor),
    ElementKind::F64 => float::preprocess::<f64>(&mut work, decode_float_fill(params), scale_factor),
  };

  trace!("scaleoffset compress: minbits={} minval={}", outcome.minbits, outcome.minval);

  let header = ChunkHeader::new(outcome.minbits, outcome.minval);
  let mut out = Vec::with_capacity(HEADER_LEN + work.len() + 1);
  header.write_to(&mut out);

  if outcome.minbits == bits {
    out.extend_from_slice(&work);
  } else if outcome.minbits > 0 {
    let mut writer = BitWriter::with_capacity((work.len() * outcome.minbits as usize) / size / 8 + 1);
    for chunk in work.chunks_exact(size) {
      writer.write_bits(load_register(chunk, size), outcome.minbits);
    }
    writer.finish_byte();
    out.extend_from_slice(&writer.pop());
  }

  Ok(out)
}

fn decompress(
  kind: ElementKind,
  size: usize,
  bits: u32,
  params: &Params,
  scale_factor: i32,
  need_convert: bool,
  input: &[u8],
) -> ScaleOffsetResult<Vec<u8>> {
  let header = ChunkHeader::parse_from(input)?;
  let payload = &input[HEADER_LEN..];
  let n = params.d_nelmts as usize;
  let mut work = vec![0u8; n * size];

  if header.minbits == bits {
    let need = n * size;
    if payload.len() < need {
      return Err(ScaleOffsetError::bad_value("truncated chunk payload"));
    }
    work.copy_from_slice(&payload[..need]);
  } else if header.minbits > 0 {
    let mut reader = BitReader::new(payload);
    for chunk in work.chunks_exact_mut(size) {
      let code = reader.read_bits(header.minbits);
      store_register(code, size, chunk);
    }
  }

  let outcome = PipelineOutcome {
    minbits: header.minbits,
    minval: header.minval,
  };

  match kind {
    ElementKind::U8 => integer::postprocess::<u8>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::U16 => integer::postprocess::<u16>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::U32 => integer::postprocess::<u32>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::U64 => integer::postprocess::<u64>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::I8 => integer::postprocess::<i8>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::I16 => integer::postprocess::<i16>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::I32 => integer::postprocess::<i32>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::I64 => integer::postprocess::<i64>(&mut work, outcome, decode_int_fill(params)),
    ElementKind::F32 => float::postprocess::<f32>(&mut work, outcome, decode_float_fill(params), scale_factor),
    ElementKind::F64 => float::postprocess::<f64>(&mut work, outcome, decode_float_fill(params), scale_factor),
  }

  if need_convert {
    swap_elements_in_place(&mut work, size);
  }

  Ok(work)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::element::{ElementClass, Sign};
  use crate::params::FillState;

  fn int_params(size: u8, sign: Sign, order: ByteOrder, fill: Option<u64>, fixed_minbits: i32) -> Params {
    let mut fill_bytes = [0u8; 12];
    let fill_state = match fill {
      Some(f) => {
        fill_bytes[..8].copy_from_slice(&f.to_le_bytes());
        FillState::Defined
      }
      None => FillState::Undefined,
    };
    Params {
      scale_type: ScaleType::IntMinBits,
      scale_factor: fixed_minbits,
      d_nelmts: 0,
      class: ElementClass::Integer,
      size,
      sign,
      order,
      fill_state,
      fill_bytes,
    }
  }

  #[test]
  fn test_s1_u8_round_trip_via_apply() {
    let values: Vec<u8> = vec![10, 11, 10, 12, 11];
    let mut params = int_params(1, Sign::Unsigned, ByteOrder::NATIVE, None, 0);
    params.d_nelmts = values.len() as u32;

    let compressed = apply(Direction::Compress, &params, &values).unwrap();
    let header = ChunkHeader::parse_from(&compressed).unwrap();
    assert_eq!(header.minbits, 2);
    assert_eq!(header.minval, 10);

    let decompressed = apply(Direction::Decompress, &params, &compressed).unwrap();
    assert_eq!(decompressed, values);
  }

  #[test]
  fn test_s2_i16_with_fill_round_trip() {
    let values: Vec<i16> = vec![5, -1, 7, -1, 6];
    let mut buf = Vec::new();
    for v in &values {
      buf.extend_from_slice(&v.to_ne_bytes());
    }
    let mut params = int_params(2, Sign::TwosComplement, ByteOrder::NATIVE, Some((-1i16) as u16 as u64), 0);
    params.d_nelmts = values.len() as u32;

    let compressed = apply(Direction::Compress, &params, &buf).unwrap();
    let decompressed = apply(Direction::Decompress, &params, &compressed).unwrap();
    let restored: Vec<i16> = decompressed
      .chunks_exact(2)
      .map(|c| i16::from_ne_bytes([c[0], c[1]]))
      .collect();
    assert_eq!(restored, values);
  }

  #[test]
  fn test_no_op_passthrough_when_scale_factor_is_full_width() {
    let values: Vec<u8> = vec![1, 2, 3, 4];
    let mut params = int_params(1, Sign::Unsigned, ByteOrder::NATIVE, None, 8);
    params.d_nelmts = values.len() as u32;

    let out = apply(Direction::Compress, &params, &values).unwrap();
    assert_eq!(out, values);
  }

  #[test]
  fn test_s6_be_stored_on_le_host() {
    let values: Vec<u32> = vec![0x0102_0304, 0x0102_0308];
    let mut stored = Vec::new();
    for v in &values {
      stored.extend_from_slice(&v.to_be_bytes());
    }
    let mut params = int_params(4, Sign::Unsigned, ByteOrder::Big, None, 0);
    params.d_nelmts = values.len() as u32;

    let compressed = apply(Direction::Compress, &params, &stored).unwrap();
    let decompressed = apply(Direction::Decompress, &params, &compressed).unwrap();
    assert_eq!(decompressed, stored);
  }

  #[test]
  fn test_fixed_minbits_rejects_width_overflow() {
    let values: Vec<u8> = vec![1, 2, 3];
    let mut params = int_params(1, Sign::Unsigned, ByteOrder::NATIVE, None, 9);
    params.d_nelmts = values.len() as u32;
    assert!(apply(Direction::Compress, &params, &values).is_err());
  }

  #[test]
  fn test_float_e_scale_is_rejected() {
    let params = Params {
      scale_type: ScaleType::FloatEScale,
      scale_factor: 0,
      d_nelmts: 4,
      class: ElementClass::Float,
      size: 4,
      sign: Sign::Unsigned,
      order: ByteOrder::NATIVE,
      fill_state: FillState::Undefined,
      fill_bytes: [0u8; 12],
    };
    let buf = vec![0u8; 16];
    assert!(apply(Direction::Compress, &params, &buf).is_err());
  }
}
