use std::ops::Range;

use crate::error::{Result, SaveError};

/// Little-endian accessor over a byte buffer, offset by a bias.
///
/// All offsets passed to the read and write methods are relative to the bias.
/// Accesses that would run past the end of the buffer fail with
/// [`SaveError::OutOfRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView<B> {
    inner: B,
    bias: usize,
}

impl<B: AsRef<[u8]>> ByteView<B> {
    pub fn new(inner: B, bias: usize) -> Result<Self> {
        let len = inner.as_ref().len();
        if bias > len {
            return Err(SaveError::OutOfRange {
                offset: bias,
                width: 0,
                len,
            });
        }
        Ok(Self { inner, bias })
    }

    pub fn bias(&self) -> usize {
        self.bias
    }

    /// The whole underlying buffer, ignoring the bias.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_ref()
    }

    /// Number of bytes reachable from the bias.
    pub fn len(&self) -> usize {
        self.as_bytes().len() - self.bias
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    pub fn read_bytes(&self, offset: usize, n: usize) -> Result<&[u8]> {
        let range = self.range(offset, n)?;
        Ok(&self.as_bytes()[range])
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        let [b] = self.read_array::<1>(offset)?;
        Ok(b)
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array(offset)?))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(offset)?))
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(offset, N)?);
        Ok(out)
    }

    fn range(&self, offset: usize, width: usize) -> Result<Range<usize>> {
        let out_of_range = || SaveError::OutOfRange {
            offset,
            width,
            len: self.len(),
        };
        let start = self.bias.checked_add(offset).ok_or_else(out_of_range)?;
        let end = start.checked_add(width).ok_or_else(out_of_range)?;
        if end > self.as_bytes().len() {
            return Err(out_of_range());
        }
        Ok(start..end)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ByteView<B> {
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.inner.as_mut()
    }

    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let range = self.range(offset, bytes.len())?;
        self.as_bytes_mut()[range].copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) -> Result<()> {
        self.write_bytes(offset, &[value])
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) -> Result<()> {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) -> Result<()> {
        self.write_bytes(offset, &value.to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::ByteView;
    use crate::error::SaveError;

    #[test]
    fn reads_are_little_endian_and_biased() {
        let bytes = [0xaa, 0xbb, 0x01, 0x02, 0x03, 0x04];
        let view = ByteView::new(&bytes[..], 2).expect("bias within buffer");

        assert_eq!(view.len(), 4);
        assert_eq!(view.read_u8(0).expect("u8"), 0x01);
        assert_eq!(view.read_u16(0).expect("u16"), 0x0201);
        assert_eq!(view.read_u32(0).expect("u32"), 0x0403_0201);
        assert_eq!(view.as_bytes()[0], 0xaa);
    }

    #[test]
    fn access_past_the_end_is_out_of_range() {
        let bytes = [0u8; 8];
        let view = ByteView::new(&bytes[..], 4).expect("bias within buffer");

        assert!(view.read_u32(0).is_ok());
        assert_eq!(
            view.read_u32(1),
            Err(SaveError::OutOfRange {
                offset: 1,
                width: 4,
                len: 4
            })
        );
        assert!(view.read_u8(usize::MAX).is_err());
    }

    #[test]
    fn bias_past_the_end_is_rejected() {
        let bytes = [0u8; 4];
        assert!(ByteView::new(&bytes[..], 4).is_ok());
        assert!(ByteView::new(&bytes[..], 5).is_err());
    }

    #[test]
    fn writes_land_at_biased_offsets() {
        let mut view = ByteView::new(vec![0u8; 8], 2).expect("bias within buffer");
        view.write_u16(1, 0xbeef).expect("u16 write");
        view.write_u8(5, 0x7f).expect("u8 write");

        assert_eq!(view.as_bytes(), &[0, 0, 0, 0xef, 0xbe, 0, 0, 0x7f]);
        assert!(view.write_u32(3, 1).is_err());
        assert_eq!(view.into_inner()[7], 0x7f);
    }
}
