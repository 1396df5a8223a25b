//! Additive save checksum.
//!
//! The checksum is the byte sum of the whole unmasked buffer, starting at
//! index 1 and skipping the checksum field itself, plus a per-build constant.
//! Some builds also add the first byte of the buffer a second time.

use crate::byte_view::ByteView;
use crate::error::Result;
use crate::layout::ByteRange;

/// Build-specific parameters of the checksum formula.
pub trait ChecksumFormula {
    fn checksum_constant(&self) -> u32;

    /// Whether the buffer's first byte is added on top of the raw sum.
    fn adds_first_byte(&self) -> bool;
}

/// Sum of every byte of the full underlying buffer from index 1, excluding the
/// checksum `field` (given relative to the view's bias).
pub fn raw_sum<B: AsRef<[u8]>>(view: &ByteView<B>, field: ByteRange) -> u32 {
    let skip = field.shifted(view.bias());
    view.as_bytes()
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(i, _)| !skip.contains(*i))
        .fold(0u32, |acc, (_, &b)| acc.wrapping_add(u32::from(b)))
}

pub fn first_byte<B: AsRef<[u8]>>(view: &ByteView<B>) -> u8 {
    view.as_bytes().first().copied().unwrap_or(0)
}

/// Combine a precomputed raw sum with a build's formula.
pub fn expected_from_raw<F: ChecksumFormula>(raw: u32, first: u8, formula: &F) -> u32 {
    let mut sum = raw.wrapping_add(formula.checksum_constant());
    if formula.adds_first_byte() {
        sum = sum.wrapping_add(u32::from(first));
    }
    sum
}

pub fn expected<B: AsRef<[u8]>, F: ChecksumFormula>(
    view: &ByteView<B>,
    field: ByteRange,
    formula: &F,
) -> u32 {
    expected_from_raw(raw_sum(view, field), first_byte(view), formula)
}

pub fn stored<B: AsRef<[u8]>>(view: &ByteView<B>, field: ByteRange) -> Result<u32> {
    view.read_u32(field.start)
}

pub fn verify<B: AsRef<[u8]>, F: ChecksumFormula>(
    view: &ByteView<B>,
    field: ByteRange,
    formula: &F,
) -> Result<bool> {
    Ok(stored(view, field)? == expected(view, field, formula))
}
