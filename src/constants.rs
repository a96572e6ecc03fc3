/// Number of 32-bit words in the frozen parameter block: 8 scalar meta words
/// (indices 0..7) plus 12 one-byte-per-word fill value slots (indices 8..19).
pub const N_PARAM_WORDS: usize = 20;

/// Number of fill-value bytes carried in the parameter block, one per word.
pub const FILL_BYTES_LEN: usize = 12;

/// Byte length of the per-chunk header: `minbits(4) | minval_size(1) | minval_bytes(16)`.
pub const HEADER_LEN: usize = 21;

/// Number of header bytes reserved for the serialized `minval`, of which only
/// the low `minval_size` are meaningful.
pub const HEADER_MINVAL_REGION: usize = 16;

/// Display name (see External Interfaces, filter identity).
pub const FILTER_NAME: &str = "scaleoffset";

/// Registry-assigned filter id tag (§6.3).
pub const FILTER_ID: u16 = 6;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_param_words_cover_fill_region() {
    assert_eq!(N_PARAM_WORDS, 8 + FILL_BYTES_LEN);
  }

  #[test]
  fn test_header_len() {
    assert_eq!(HEADER_LEN, 4 + 1 + HEADER_MINVAL_REGION);
  }
}
