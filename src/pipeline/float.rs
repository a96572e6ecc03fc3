use crate::pipeline::integer::IntegerElement;
use crate::pipeline::{log2_ceil, PipelineOutcome};

/// `f32` or `f64`, rescaled by a decimal factor into an integer container of
/// the same byte width (§4.4, D-scale mode only).
pub trait FloatElement: Copy {
  const SIZE: usize;
  type Container: IntegerElement;

  fn from_ne_bytes(bytes: &[u8]) -> Self;
  fn write_ne_bytes(self, out: &mut [u8]);
  /// Decodes a value from the parameter block's little-endian fill region.
  fn from_le_bytes(bytes: &[u8]) -> Self;

  fn to_f64(self) -> f64;
  fn from_f64(v: f64) -> Self;

  /// Raw IEEE-754 bit pattern, zero-extended into a `u64` register. Used
  /// only for carrying `minval` through the chunk header.
  fn to_bits_u64(self) -> u64;
  fn from_bits_u64(v: u64) -> Self;
}

impl FloatElement for f32 {
  const SIZE: usize = 4;
  type Container = i32;

  fn from_ne_bytes(bytes: &[u8]) -> Self {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    f32::from_ne_bytes(buf)
  }

  fn write_ne_bytes(self, out: &mut [u8]) {
    out[..4].copy_from_slice(&self.to_ne_bytes());
  }

  fn from_le_bytes(bytes: &[u8]) -> Self {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    f32::from_le_bytes(buf)
  }

  fn to_f64(self) -> f64 {
    self as f64
  }

  fn from_f64(v: f64) -> Self {
    v as f32
  }

  fn to_bits_u64(self) -> u64 {
    self.to_bits() as u64
  }

  fn from_bits_u64(v: u64) -> Self {
    f32::from_bits(v as u32)
  }
}

impl FloatElement for f64 {
  const SIZE: usize = 8;
  type Container = i64;

  fn from_ne_bytes(bytes: &[u8]) -> Self {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    f64::from_ne_bytes(buf)
  }

  fn write_ne_bytes(self, out: &mut [u8]) {
    out[..8].copy_from_slice(&self.to_ne_bytes());
  }

  fn from_le_bytes(bytes: &[u8]) -> Self {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    f64::from_le_bytes(buf)
  }

  fn to_f64(self) -> f64 {
    self
  }

  fn from_f64(v: f64) -> Self {
    v
  }

  fn to_bits_u64(self) -> u64 {
    self.to_bits()
  }

  fn from_bits_u64(v: u64) -> Self {
    f64::from_bits(v)
  }
}

/// Rounds to the nearest integer, ties away from zero (never banker's
/// rounding; Design Notes call this out explicitly).
fn round_half_away_from_zero(x: f64) -> f64 {
  if x >= 0.0 {
    (x + 0.5).floor()
  } else {
    (x - 0.5).ceil()
  }
}

fn is_fill_match<F: FloatElement>(elem: F, fill: Option<F>, fill_thresh: f64) -> bool {
  match fill {
    Some(f) => (elem.to_f64() - f.to_f64()).abs() < fill_thresh,
    None => false,
  }
}

/// Preprocesses a float chunk in place under D-scale rescaling (§4.4).
///
/// Each element's code is its own independently-rounded `round(x * 10^D)`,
/// offset by the similarly-rounded code of the chunk minimum -- not a single
/// rounding of `(x - min) * 10^D`. This is what the worked example (S4) in
/// the data model actually walks through (`[123, 124, 124]` minus `123`,
/// not minus `123.4`), and it is also why `minval` is stored as the bit
/// pattern of an *integer* register (point 5): the header carries
/// `round(min * 10^D)` itself, and decoding reconstructs `x` purely from
/// `(code + minval) / 10^D`, never consulting the original float minimum.
pub fn preprocess<F: FloatElement>(buf: &mut [u8], fill: Option<F>, d_scale: i32) -> PipelineOutcome {
  let size = F::SIZE;
  let pow = 10f64.powi(d_scale);
  let fill_thresh = 10f64.powi(-d_scale);

  let mut min_v: Option<f64> = None;
  let mut max_v: Option<f64> = None;
  for chunk in buf.chunks_exact(size) {
    let elem = F::from_ne_bytes(chunk);
    if is_fill_match(elem, fill, fill_thresh) {
      continue;
    }
    let v = elem.to_f64();
    min_v = Some(min_v.map_or(v, |m| m.min(v)));
    max_v = Some(max_v.map_or(v, |m| m.max(v)));
  }
  let (min_v, max_v) = match (min_v, max_v) {
    (Some(a), Some(b)) => (a, b),
    _ => (0.0, 0.0),
  };

  let min_code = round_half_away_from_zero(min_v * pow) as i128;
  let max_code = round_half_away_from_zero(max_v * pow) as i128;
  let minval = F::Container::from_wide(min_code).to_u64_bits();

  let range_code = max_code - min_code;
  let overflow_threshold = (1i128 << (size * 8 - 1)) as i128;
  if range_code > overflow_threshold {
    return PipelineOutcome {
      minbits: (size * 8) as u32,
      minval,
    };
  }

  let span = (range_code + 1) as u64;
  let minbits = if fill.is_some() {
    log2_ceil(span + 1)
  } else {
    log2_ceil(span)
  };

  if minbits == (size * 8) as u32 || minbits == 0 {
    return PipelineOutcome { minbits, minval };
  }

  let sentinel = (1u64 << minbits) - 1;
  for chunk in buf.chunks_exact_mut(size) {
    let elem = F::from_ne_bytes(chunk);
    let code = if is_fill_match(elem, fill, fill_thresh) {
      sentinel
    } else {
      (round_half_away_from_zero(elem.to_f64() * pow) as i128 - min_code) as u64
    };
    F::Container::from_wide(code as i128).write_ne_bytes(chunk);
  }

  PipelineOutcome { minbits, minval }
}

/// Inverse of [`preprocess`].
pub fn postprocess<F: FloatElement>(buf: &mut [u8], outcome: PipelineOutcome, fill: Option<F>, d_scale: i32) {
  let size = F::SIZE;
  if outcome.minbits == (size * 8) as u32 {
    return;
  }

  let min_code = F::Container::from_u64_bits(outcome.minval).to_wide();
  let pow = 10f64.powi(d_scale);
  if outcome.minbits == 0 {
    let v = F::from_f64((min_code as f64) / pow);
    for chunk in buf.chunks_exact_mut(size) {
      v.write_ne_bytes(chunk);
    }
    return;
  }

  let sentinel = (1u64 << outcome.minbits) - 1;
  for chunk in buf.chunks_exact_mut(size) {
    let code = F::Container::from_ne_bytes(chunk).to_u64_bits();
    let value = match fill {
      Some(f) if code == sentinel => f,
      _ => F::from_f64(((code as i128 + min_code) as f64) / pow),
    };
    value.write_ne_bytes(chunk);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn to_buf<F: FloatElement>(values: &[F]) -> Vec<u8> {
    let mut buf = vec![0u8; values.len() * F::SIZE];
    for (chunk, &v) in buf.chunks_exact_mut(F::SIZE).zip(values) {
      v.write_ne_bytes(chunk);
    }
    buf
  }

  fn from_buf<F: FloatElement>(buf: &[u8]) -> Vec<F> {
    buf.chunks_exact(F::SIZE).map(F::from_ne_bytes).collect()
  }

  #[test]
  fn test_s4_f64_d_scale_no_fill() {
    let values: Vec<f64> = vec![1.234, 1.235, 1.236];
    let mut buf = to_buf(&values);
    let outcome = preprocess::<f64>(&mut buf, None, 2);
    assert_eq!(outcome.minbits, 1);

    postprocess::<f64>(&mut buf, outcome, None, 2);
    let restored = from_buf::<f64>(&buf);
    for (r, v) in restored.iter().zip(&values) {
      assert!((r - v).abs() <= 0.005 + 1e-6);
    }
  }

  #[test]
  fn test_s5_f32_with_fill() {
    let fill = 9.9f32;
    let values: Vec<f32> = vec![1.0, 9.9, 1.1, 9.9, 1.2];
    let mut buf = to_buf(&values);
    let outcome = preprocess::<f32>(&mut buf, Some(fill), 1);

    postprocess::<f32>(&mut buf, outcome, Some(fill), 1);
    let restored = from_buf::<f32>(&buf);
    assert_eq!(restored[1], fill);
    assert_eq!(restored[3], fill);
    for &i in &[0usize, 2, 4] {
      assert!((restored[i] - values[i]).abs() <= 0.05 + 1e-4);
    }
  }

  #[test]
  fn test_round_half_away_from_zero() {
    assert_eq!(round_half_away_from_zero(2.5), 3.0);
    assert_eq!(round_half_away_from_zero(-2.5), -3.0);
    assert_eq!(round_half_away_from_zero(0.4), 0.0);
  }
}
