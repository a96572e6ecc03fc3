use crate::element::{ByteOrder, ElementClass, ElementKind, TypeDescriptor};
use crate::errors::{ScaleOffsetError, ScaleOffsetResult};
use crate::params::{FillState, Params, ScaleType};
use log::debug;

/// The chunk-layout fact the negotiator needs from the dataspace system,
/// which this crate does not otherwise depend on.
pub trait SpaceDescriptor {
  fn element_count(&self) -> u32;
}

/// The fill-value facts the negotiator needs from the property system.
pub trait FillSource {
  fn fill_defined(&self) -> bool;
  /// Writes the fill value into the low `size` bytes of `out`, in the
  /// source's own byte order, returning `Some(size)`. `None` if the source
  /// reports a fill as defined but cannot actually produce it.
  fn fill_bytes(&self, out: &mut [u8; 12]) -> Option<usize>;
  fn byte_order(&self) -> ByteOrder;
}

/// The scale selection a caller makes at registration time, before any
/// per-chunk data exists to derive it from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleRequest {
  pub scale_type: ScaleType,
  pub scale_factor: i32,
}

/// Succeeds iff the element's class, size, and order could plausibly be
/// packed by this filter at all (§4.1, can-apply). Deeper validation --
/// rejecting `FloatEScale`, checking `scale_factor` bounds -- happens later
/// in [`crate::filter::apply`], once the user's scale request is known.
pub fn can_apply(type_desc: &TypeDescriptor) -> ScaleOffsetResult<()> {
  if type_desc.size == 0 {
    return Err(ScaleOffsetError::bad_type("element size must be nonzero"));
  }
  match type_desc.stored_order {
    ByteOrder::Little | ByteOrder::Big => {}
  }
  ElementKind::from_descriptor(type_desc)?;
  Ok(())
}

/// Freezes a dataset's filter parameters (§4.1, set-local). Reads element
/// count from `space`, copies the type descriptor into the local slots, and
/// if a fill value is defined, fetches and stores it little-endian --
/// reversing it first if the source reports big-endian bytes.
pub fn set_local<S: SpaceDescriptor, F: FillSource>(
  type_desc: &TypeDescriptor,
  space: &S,
  fill: &F,
  request: ScaleRequest,
) -> ScaleOffsetResult<Params> {
  can_apply(type_desc)?;

  let (fill_state, fill_bytes) = if fill.fill_defined() {
    let mut bytes = [0u8; 12];
    let n = fill
      .fill_bytes(&mut bytes)
      .ok_or_else(|| ScaleOffsetError::fill_get_failed("dataset reports a fill value but did not supply one"))?;
    if fill.byte_order() != ByteOrder::NATIVE {
      bytes[..n].reverse();
    }
    (FillState::Defined, bytes)
  } else {
    (FillState::Undefined, [0u8; 12])
  };

  let params = Params {
    scale_type: request.scale_type,
    scale_factor: request.scale_factor,
    d_nelmts: space.element_count(),
    class: type_desc.class,
    size: type_desc.size,
    sign: type_desc.sign,
    order: type_desc.stored_order,
    fill_state,
    fill_bytes,
  };

  debug!(
    "scaleoffset set_local: class={:?} size={} sign={:?} order={:?} fill_state={:?} d_nelmts={}",
    params.class, params.size, params.sign, params.order, params.fill_state, params.d_nelmts,
  );

  Ok(params)
}
