use byteorder::{ByteOrder, NativeEndian};
use bytemuck::Pod;

use super::bit::from_bytes;
use super::traceback_error::{ErrorKind, TracebackError};
use super::types::VirtualAddress;

/// Bounds-checked access to a region of readable memory. Every dereference
/// the walker and formatter perform goes through this seam; an address
/// outside the region is a `CorruptFrame` error, never a fault.
pub trait MemoryReader {
    fn read_memory(
        &self,
        address: VirtualAddress,
        amount: usize,
    ) -> Result<Vec<u8>, TracebackError>;
}

pub fn read_memory_as<T: Pod>(
    memory: &dyn MemoryReader,
    address: VirtualAddress,
) -> Result<T, TracebackError> {
    let data = memory.read_memory(address, size_of::<T>())?;
    Ok(from_bytes(&data))
}

/// Reads the current process's own address space, restricted to one
/// validated region.
pub struct ProcessMemory {
    low: VirtualAddress,
    high: VirtualAddress,
}

impl ProcessMemory {
    pub fn new(low: VirtualAddress, high: VirtualAddress) -> Result<Self, TracebackError> {
        if low >= high {
            return TracebackError::err("Empty memory region", ErrorKind::InvalidAddress);
        }
        Ok(Self { low, high })
    }

    /// Region of the calling thread's stack, from /proc/self/maps.
    #[cfg(target_os = "linux")]
    pub fn current_stack() -> Result<Self, TracebackError> {
        use std::fs::File;
        use std::io::{BufRead, BufReader};

        let file = File::open("/proc/self/maps")
            .map_err(|_| TracebackError::new("Could not open /proc/self/maps", ErrorKind::InvalidAddress))?;
        for line in BufReader::new(file).lines() {
            let line = line
                .map_err(|_| TracebackError::new("Could not read /proc/self/maps", ErrorKind::InvalidAddress))?;
            if !line.ends_with("[stack]") {
                continue;
            }
            let range = line.split_whitespace().next().unwrap_or_default();
            let (low, high) = range.split_once('-').unwrap_or_default();
            let low = u64::from_str_radix(low, 16)
                .map_err(|_| TracebackError::new("Invalid format", ErrorKind::InvalidAddress))?;
            let high = u64::from_str_radix(high, 16)
                .map_err(|_| TracebackError::new("Invalid format", ErrorKind::InvalidAddress))?;
            return ProcessMemory::new(VirtualAddress::new(low), VirtualAddress::new(high));
        }
        return TracebackError::err("No stack mapping found", ErrorKind::InvalidAddress);
    }
}

impl MemoryReader for ProcessMemory {
    fn read_memory(
        &self,
        address: VirtualAddress,
        amount: usize,
    ) -> Result<Vec<u8>, TracebackError> {
        if address.is_null() {
            return TracebackError::err("Read at null address", ErrorKind::InvalidAddress);
        }
        let end = address + amount as i64;
        if address < self.low || end > self.high {
            return TracebackError::err("Read outside mapped region", ErrorKind::CorruptFrame);
        }
        let slice =
            unsafe { std::slice::from_raw_parts(address.addr() as *const u8, amount) };
        Ok(slice.to_vec())
    }
}

/// An owned byte buffer standing in for a stack region at a fixed base
/// address. The demo binary and the tests assemble synthetic stacks in one
/// of these.
pub struct MemoryImage {
    base: VirtualAddress,
    bytes: Vec<u8>,
}

impl MemoryImage {
    pub fn new(base: VirtualAddress, size: usize) -> Self {
        Self {
            base,
            bytes: vec![0; size],
        }
    }

    pub fn base(&self) -> VirtualAddress {
        self.base
    }

    fn range_of(&self, address: VirtualAddress, amount: usize) -> Result<usize, TracebackError> {
        if address < self.base {
            return TracebackError::err("Read outside mapped region", ErrorKind::CorruptFrame);
        }
        let offset = (address.addr() - self.base.addr()) as usize;
        if offset + amount > self.bytes.len() {
            return TracebackError::err("Read outside mapped region", ErrorKind::CorruptFrame);
        }
        Ok(offset)
    }

    pub fn write_word(
        &mut self,
        address: VirtualAddress,
        value: u64,
    ) -> Result<(), TracebackError> {
        let offset = self.range_of(address, size_of::<u64>())?;
        NativeEndian::write_u64(&mut self.bytes[offset..offset + size_of::<u64>()], value);
        Ok(())
    }

    pub fn write_bytes(
        &mut self,
        address: VirtualAddress,
        data: &[u8],
    ) -> Result<(), TracebackError> {
        let offset = self.range_of(address, data.len())?;
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

impl MemoryReader for MemoryImage {
    fn read_memory(
        &self,
        address: VirtualAddress,
        amount: usize,
    ) -> Result<Vec<u8>, TracebackError> {
        if address.is_null() {
            return TracebackError::err("Read at null address", ErrorKind::InvalidAddress);
        }
        let offset = self.range_of(address, amount)?;
        Ok(self.bytes[offset..offset + amount].to_vec())
    }
}
