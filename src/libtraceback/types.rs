use std::{
    fmt::LowerHex,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use bytemuck::{Pod, Zeroable};
use num_enum::FromPrimitive;

/// Bounds of a generated symbol table, matching the build-time generator.
pub const MAX_FUNCTIONS: usize = 256;
pub const MAX_ARGS: usize = 31;

/// Rendering caps for string-typed argument values.
pub const MAX_STRING_PRINT_LEN: usize = 25;
pub const MAX_ARRAY_PRINT_NUM: usize = 3;

/// Default frame limit; a chain that runs past it is treated as corrupt.
pub const MAX_FRAME_DEPTH: usize = 64;

pub const WORD_SIZE: usize = size_of::<u64>();

#[repr(transparent)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct VirtualAddress {
    addr: u64,
}

unsafe impl Pod for VirtualAddress {}

unsafe impl Zeroable for VirtualAddress {}

impl VirtualAddress {
    pub fn new(addr: u64) -> Self {
        Self { addr }
    }

    pub fn null() -> Self {
        VirtualAddress::default()
    }

    pub fn addr(&self) -> u64 {
        self.addr
    }

    pub fn is_null(&self) -> bool {
        self.addr == 0
    }
}

impl LowerHex for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(&self.addr, f)
    }
}

impl From<u64> for VirtualAddress {
    fn from(value: u64) -> Self {
        Self { addr: value }
    }
}

impl Add<i64> for VirtualAddress {
    type Output = VirtualAddress;

    fn add(self, rhs: i64) -> Self::Output {
        Self {
            addr: (self.addr as i128 + rhs as i128) as u64,
        }
    }
}

impl AddAssign<i64> for VirtualAddress {
    fn add_assign(&mut self, rhs: i64) {
        self.addr = (self.addr as i128 + rhs as i128) as u64;
    }
}

impl Sub<i64> for VirtualAddress {
    type Output = VirtualAddress;

    fn sub(self, rhs: i64) -> Self::Output {
        Self {
            addr: (self.addr as i128 - rhs as i128) as u64,
        }
    }
}

impl SubAssign<i64> for VirtualAddress {
    fn sub_assign(&mut self, rhs: i64) {
        self.addr = (self.addr as i128 - rhs as i128) as u64;
    }
}

/// Argument type tag as emitted by the symbol generator. Tags the generator
/// does not know come through as arbitrary numbers and fold to `Unknown`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum ArgType {
    Char = 0,
    Int = 1,
    Float = 2,
    Double = 3,
    String = 4,
    StringArray = 5,
    VoidStar = 6,
    #[num_enum(default)]
    Unknown = 7,
}
