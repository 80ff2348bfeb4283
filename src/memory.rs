use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AsmError, Result};

/// Bytes addressable by one image.
pub const IMAGE_SIZE: usize = 256;
/// Cells per row of the Logisim image format.
pub const ROW_SIZE: usize = 16;
/// Every instruction occupies one 64-bit word.
pub const WORD_SIZE: usize = 8;

/// An 8-bit image address. Displays as an 8-digit binary string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Addr(pub u8);

impl Addr {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

impl fmt::LowerHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Address the instruction at `ordinal` will be written to, available
/// before any instruction is encoded.
pub fn predict_address(ordinal: usize) -> Result<Addr> {
    let at = ordinal
        .checked_mul(WORD_SIZE)
        .filter(|at| at + WORD_SIZE <= IMAGE_SIZE)
        .ok_or(AsmError::Capacity {
            at: ordinal.saturating_mul(WORD_SIZE),
            requested: WORD_SIZE,
        })?;
    Ok(Addr(at as u8))
}

/// A 256-byte RAM or ROM image filled front to back by a write cursor.
#[derive(Clone, Serialize, Deserialize)]
pub struct MemoryImage {
    mem: Vec<u8>,
    cursor: usize,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self {
            mem: vec![0; IMAGE_SIZE],
            cursor: 0,
        }
    }

    /// Write `bytes` at the cursor, least-significant byte first, and return
    /// the address of the first byte. Nothing is written on error.
    pub fn write(&mut self, bytes: &[u8]) -> Result<Addr> {
        let size = bytes.len();
        if !size.is_power_of_two() || size > ROW_SIZE {
            return Err(AsmError::WriteSize(size));
        }
        let at = self.cursor;
        if at + size > IMAGE_SIZE {
            return Err(AsmError::Capacity { at, requested: size });
        }
        self.mem[at..at + size].copy_from_slice(bytes);
        self.cursor += size;
        Ok(Addr(at as u8))
    }

    pub fn write_u8(&mut self, val: u8) -> Result<Addr> {
        self.write(&[val])
    }

    pub fn write_u64(&mut self, val: u64) -> Result<Addr> {
        self.write(&val.to_le_bytes())
    }

    pub fn read_u8(&self, addr: u8) -> u8 {
        self.mem[addr as usize]
    }

    pub fn read_u64(&self, addr: u8) -> Option<u64> {
        let off = addr as usize;
        let bytes = self.mem.get(off..off + WORD_SIZE)?;
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(bytes);
        Some(u64::from_le_bytes(word))
    }

    /// Bytes written so far.
    pub fn used(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        IMAGE_SIZE - self.cursor
    }

    /// Rows in ascending address order as `(base address, cells)`.
    pub fn rows(&self) -> impl Iterator<Item = (u8, &[u8])> {
        self.mem
            .chunks(ROW_SIZE)
            .enumerate()
            .map(|(i, row)| ((i * ROW_SIZE) as u8, row))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mem
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryImage")
            .field("used", &self.cursor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_advance_cursor_little_endian() {
        let mut img = MemoryImage::new();
        assert_eq!(img.write_u8(0xAA).unwrap(), Addr(0));
        assert_eq!(img.write(&0x0403u16.to_le_bytes()).unwrap(), Addr(1));
        assert_eq!(img.read_u8(1), 0x03);
        assert_eq!(img.read_u8(2), 0x04);
        assert_eq!(img.used(), 3);
    }

    #[test]
    fn rejects_odd_sizes() {
        let mut img = MemoryImage::new();
        assert_eq!(img.write(&[0; 3]), Err(AsmError::WriteSize(3)));
        assert_eq!(img.write(&[0; 32]), Err(AsmError::WriteSize(32)));
        assert_eq!(img.write(&[]), Err(AsmError::WriteSize(0)));
        assert_eq!(img.used(), 0);
    }

    #[test]
    fn overflow_leaves_image_untouched() {
        let mut img = MemoryImage::new();
        for _ in 0..31 {
            img.write_u64(u64::MAX).unwrap();
        }
        img.write_u8(1).unwrap();
        let before = img.as_bytes().to_vec();
        assert_eq!(
            img.write_u64(0x1122),
            Err(AsmError::Capacity { at: 249, requested: 8 })
        );
        assert_eq!(img.as_bytes(), &before[..]);
        assert_eq!(img.remaining(), 7);
    }

    #[test]
    fn addr_renders_binary() {
        assert_eq!(Addr(16).to_string(), "00010000");
        assert_eq!(format!("{:02x}", Addr(0xf8)), "f8");
    }

    #[test]
    fn prediction_bounds() {
        assert_eq!(predict_address(0).unwrap(), Addr(0));
        assert_eq!(predict_address(31).unwrap(), Addr(248));
        assert!(matches!(predict_address(32), Err(AsmError::Capacity { at: 256, .. })));
    }
}
