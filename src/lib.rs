//! Scale-offset bit-packing filter for numeric array chunks.
//!
//! Bit-packs fixed-width integer or floating-point samples using the
//! minimum number of bits needed to represent the `[min, max]` range of a
//! chunk, optionally after a decimal rescale for floats. See [`filter::apply`]
//! for the entry point and [`negotiator`] for dataset registration.

pub mod bit_reader;
pub mod bit_writer;
mod bits;
pub mod constants;
pub mod element;
pub mod endian;
pub mod errors;
pub mod filter;
pub mod header;
pub mod negotiator;
pub mod params;
pub mod pipeline;

pub use constants::{FILTER_ID, FILTER_NAME};
pub use element::{ByteOrder, ElementClass, ElementKind, Sign, TypeDescriptor};
pub use errors::{ErrorKind, ScaleOffsetError, ScaleOffsetResult};
pub use filter::{apply, Direction};
pub use header::ChunkHeader;
pub use negotiator::{can_apply, set_local, FillSource, ScaleRequest, SpaceDescriptor};
pub use params::{FillState, Params, ScaleType};
