use crate::constants::{HEADER_LEN, HEADER_MINVAL_REGION};
use crate::errors::{ScaleOffsetError, ScaleOffsetResult};
use std::cmp::min;
use std::mem::size_of;

/// The 21-byte little-endian prefix on every compressed chunk (§6.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
  pub minbits: u32,
  /// Width, in bytes, that `minval` was serialized with. Always
  /// `size_of::<u64>()` when this codec writes a header, but a decoder must
  /// honor whatever value is actually stored (Invariant 4).
  pub minval_size: u8,
  /// The bit pattern of `minval`, held in a `u64`-sized register regardless
  /// of the element's own width.
  pub minval: u64,
}

impl ChunkHeader {
  pub fn new(minbits: u32, minval: u64) -> Self {
    ChunkHeader {
      minbits,
      minval_size: size_of::<u64>() as u8,
      minval,
    }
  }

  pub fn write_to(&self, out: &mut Vec<u8>) {
    out.extend_from_slice(&self.minbits.to_le_bytes());
    out.push(self.minval_size);
    let mut minval_region = [0u8; HEADER_MINVAL_REGION];
    let minval_bytes = self.minval.to_le_bytes();
    let n = min(self.minval_size as usize, minval_bytes.len());
    minval_region[..n].copy_from_slice(&minval_bytes[..n]);
    out.extend_from_slice(&minval_region);
  }

  /// Parses a header from the front of `bytes`. Honors the stored
  /// `minval_size` rather than assuming 8, per Invariant 4: a decoder reads
  /// `min(size_of::<u64>(), stored_minval_size)` bytes of `minval`.
  pub fn parse_from(bytes: &[u8]) -> ScaleOffsetResult<Self> {
    if bytes.len() < HEADER_LEN {
      return Err(ScaleOffsetError::bad_value(format!(
        "chunk header requires {} bytes, got {}",
        HEADER_LEN,
        bytes.len(),
      )));
    }
    let minbits = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let minval_size = bytes[4];
    let region = &bytes[5..5 + HEADER_MINVAL_REGION];

    let usable = min(minval_size as usize, size_of::<u64>());
    let mut minval_bytes = [0u8; 8];
    minval_bytes[..usable].copy_from_slice(&region[..usable]);
    let minval = u64::from_le_bytes(minval_bytes);

    Ok(ChunkHeader {
      minbits,
      minval_size,
      minval,
    })
  }
}
