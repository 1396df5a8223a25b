//! Single-byte XOR obfuscation keyed by a mask stored inside the buffer.
//!
//! The mask is a u32 at a fixed position, but only its low byte is used as the
//! key. Every byte of the buffer is XORed with that key, including the mask
//! field itself, and the original mask value is then written back. The field is
//! therefore self-referential: it reads the same before and after the
//! transform, which is what makes masking and unmasking the same operation.

use crate::byte_view::ByteView;
use crate::error::Result;

/// XOR `buf` in place with the low byte of the mask at `mask_offset`, then
/// restore the mask field. Returns the mask value.
pub fn apply_mask(buf: &mut [u8], mask_offset: usize) -> Result<u32> {
    let mask = ByteView::new(&*buf, 0)?.read_u32(mask_offset)?;
    let key = (mask & 0xff) as u8;
    for b in buf.iter_mut() {
        *b ^= key;
    }
    ByteView::new(&mut *buf, 0)?.write_u32(mask_offset, mask)?;
    Ok(mask)
}

/// Decode a masked dump in place.
pub fn unmask(buf: &mut [u8], mask_offset: usize) -> Result<u32> {
    apply_mask(buf, mask_offset)
}

/// Re-obscure an unmasked buffer in place.
pub fn mask(buf: &mut [u8], mask_offset: usize) -> Result<u32> {
    apply_mask(buf, mask_offset)
}

#[cfg(test)]
mod tests {
    use super::{mask, unmask};

    fn sample() -> Vec<u8> {
        let mut buf: Vec<u8> = (0..64u32).map(|i| (i * 37 + 11) as u8).collect();
        buf[8..12].copy_from_slice(&0x1234_56c3u32.to_le_bytes());
        buf
    }

    #[test]
    fn unmask_xors_every_byte_except_the_mask_field() {
        let original = sample();
        let mut buf = original.clone();
        let m = unmask(&mut buf, 8).expect("mask field in range");

        assert_eq!(m, 0x1234_56c3);
        assert_eq!(&buf[8..12], &original[8..12]);
        for (i, (&a, &b)) in buf.iter().zip(original.iter()).enumerate() {
            if (8..12).contains(&i) {
                continue;
            }
            assert_eq!(a, b ^ 0xc3, "byte {i}");
        }
    }

    #[test]
    fn mask_and_unmask_round_trip() {
        let original = sample();
        let mut buf = original.clone();
        unmask(&mut buf, 8).expect("unmask");
        mask(&mut buf, 8).expect("mask");
        assert_eq!(buf, original);

        mask(&mut buf, 8).expect("mask");
        unmask(&mut buf, 8).expect("unmask");
        assert_eq!(buf, original);
    }

    #[test]
    fn mask_field_outside_buffer_is_rejected() {
        let mut buf = vec![0u8; 10];
        assert!(unmask(&mut buf, 8).is_err());
        assert_eq!(buf, vec![0u8; 10]);
    }
}
