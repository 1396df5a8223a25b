/// Half-open byte range `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, pos: usize) -> bool {
        (self.start..self.end).contains(&pos)
    }

    /// The same range moved forward by `bias` bytes.
    pub fn shifted(&self, bias: usize) -> Self {
        Self {
            start: self.start + bias,
            end: self.end + bias,
        }
    }
}

/// Fixed positions and sizes describing one game family's save region.
///
/// `mask_offset` and `start_offset_field` are absolute buffer positions.
/// `checksum` and `game_name` are relative to the discovered start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SramLayout {
    pub family: &'static str,
    /// Length of the payload that is masked and checksummed.
    pub sram_end: usize,
    /// Size of the full on-device save image.
    pub device_size: usize,
    pub mask_offset: usize,
    pub start_offset_field: usize,
    pub max_start_offset: u32,
    /// The checksum is stored as a u32; `len()` bytes are skipped when summing.
    pub checksum: ByteRange,
    pub game_name: ByteRange,
    pub game_name_literal: &'static [u8],
}

impl SramLayout {
    /// Whether `start` is a usable start offset for this family.
    pub fn accepts_start_offset(&self, start: u32) -> bool {
        start <= self.max_start_offset && start % 4 == 0
    }
}
