//! The serializable contract and the sequence codec.
//!
//! A [`Serializable`] value reads and writes itself through one method. The
//! stream's direction decides whether each `stream_*` call fills the field or
//! emits it, so the two layouts cannot drift apart.
//!
//! Sequences are a count in a caller-chosen width followed by that many
//! elements.

use crate::bitstream::BitStream;
use crate::{Error, Result};

/// Count width used when a sequence has no dedicated width.
pub const DEFAULT_COUNT_BITS: u8 = 32;

/// A value with one symmetric bit layout.
pub trait Serializable {
    /// Drains `self` from a decode stream or emits it to an encode stream.
    fn serialize(&mut self, s: &mut BitStream<'_>) -> Result<()>;
}

/// Largest count representable in `bits` bits.
#[inline]
pub fn max_count(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Streams a count field. Encode fails with [`Error::CapacityExceeded`]
/// when `count` needs more than `bits` bits.
pub fn stream_count(s: &mut BitStream<'_>, count: &mut usize, bits: u8) -> Result<()> {
    let mut raw = *count as u64;
    if !s.is_decoding() && raw > max_count(bits) {
        return Err(Error::capacity(raw, bits));
    }
    s.stream(&mut raw, bits)?;
    *count = usize::try_from(raw).map_err(|_| Error::capacity(raw, bits))?;
    Ok(())
}

/// Serializes `items` as a `count_bits`-wide count followed by each element.
///
/// On decode `items` is cleared and refilled with exactly `count` elements.
pub fn serialize_sequence<T>(s: &mut BitStream<'_>, items: &mut Vec<T>, count_bits: u8) -> Result<()>
where
    T: Serializable + Default,
{
    serialize_sequence_with(s, items, count_bits, |item, s| item.serialize(s))
}

/// Like [`serialize_sequence`], but each element is handled by `f`.
///
/// Used for elements that need context the trait cannot carry (e.g. a
/// definition registry).
pub fn serialize_sequence_with<T, F>(
    s: &mut BitStream<'_>,
    items: &mut Vec<T>,
    count_bits: u8,
    mut f: F,
) -> Result<()>
where
    T: Default,
    F: FnMut(&mut T, &mut BitStream<'_>) -> Result<()>,
{
    let mut count = items.len();
    stream_count(s, &mut count, count_bits)?;

    if s.is_decoding() {
        items.clear();
        // Kapazität nicht blind aus dem Stream übernehmen
        items.reserve(count.min(1024));
        for _ in 0..count {
            let mut item = T::default();
            f(&mut item, s)?;
            items.push(item);
        }
    } else {
        for item in items.iter_mut() {
            f(item, s)?;
        }
    }
    Ok(())
}
