//! Address decomposition into tag, set index, and block offset.
//!
//! ```text
//!          X bits          Y bits         Z bits
//!  ****** TAG ******|**** INDEX ****|*** OFFSET ***|
//! ```
//!
//! Both the block size and the set count are validated as powers of two at
//! construction, so every per-access operation is a shift or a mask.

use crate::error::ConfigError;

/// Splits addresses into `(tag, set index, offset)` for one cache geometry.
#[derive(Debug, Clone, Copy)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
    block_mask: u64,
    set_mask: u64,
}

impl AddressDecoder {
    /// Builds a decoder for the given block size and set count.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either value is zero or not a power of
    /// two. Checked here once, never per access.
    pub fn new(block_bytes: usize, sets: usize) -> Result<Self, ConfigError> {
        if !block_bytes.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(block_bytes));
        }
        if !sets.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(sets));
        }
        Ok(Self {
            offset_bits: block_bytes.trailing_zeros(),
            index_bits: sets.trailing_zeros(),
            block_mask: block_bytes as u64 - 1,
            set_mask: sets as u64 - 1,
        })
    }

    /// Byte offset of `addr` within its block.
    pub fn offset(&self, addr: u64) -> u64 {
        addr & self.block_mask
    }

    /// Set index of `addr`.
    pub fn set_index(&self, addr: u64) -> usize {
        ((addr >> self.offset_bits) & self.set_mask) as usize
    }

    /// Tag of `addr`: the address bits above the index and offset fields.
    pub fn tag(&self, addr: u64) -> u64 {
        addr >> (self.offset_bits + self.index_bits)
    }

    /// Reconstructs the base address of the block identified by
    /// `(set, tag)`. Inverse of [`set_index`](Self::set_index) and
    /// [`tag`](Self::tag) for offset 0.
    pub fn block_addr(&self, set: usize, tag: u64) -> u64 {
        (tag << (self.offset_bits + self.index_bits)) | ((set as u64) << self.offset_bits)
    }
}
