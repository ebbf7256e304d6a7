//! # Memory collaborator
//!
//! The core only needs two things from memory: reading a whole word when
//! fetching or loading, and copying a buffer in when the host loads a BIOS.
//! Alignment and addressability are the implementor's problem.

/// Size of the BIOS region, used as the default size of [`InternalMemory`].
pub const BIOS_SIZE: usize = 0x0000_4000;

pub trait Memory {
    fn read_word(&self, address: u32) -> u32;

    fn write_array(&mut self, bytes: &[u8], start_address: u32);
}

/// Flat little-endian byte array starting at address 0.
///
/// Reads outside the backing buffer return 0, writes grow it.
#[derive(Clone)]
pub struct InternalMemory {
    data: Vec<u8>,
}

impl Default for InternalMemory {
    fn default() -> Self {
        Self::with_size(BIOS_SIZE)
    }
}

impl InternalMemory {
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    #[must_use]
    pub fn read_at(&self, address: usize) -> u8 {
        self.data.get(address).copied().unwrap_or_else(|| {
            tracing::debug!("read on unmapped memory 0x{address:08X}");
            0
        })
    }

    pub fn write_word(&mut self, address: u32, value: u32) {
        self.write_array(&value.to_le_bytes(), address);
    }
}

impl Memory for InternalMemory {
    fn read_word(&self, address: u32) -> u32 {
        if address & 3 != 0 {
            tracing::warn!("read_word has address not word aligned: 0x{address:08X}");
        }

        let byte = |offset: u32| self.read_at(address.wrapping_add(offset) as usize);
        u32::from_le_bytes([byte(0), byte(1), byte(2), byte(3)])
    }

    fn write_array(&mut self, bytes: &[u8], start_address: u32) {
        let start = start_address as usize;
        let end = start + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(bytes);
    }
}
