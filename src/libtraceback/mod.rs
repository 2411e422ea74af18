#![allow(dead_code)]

use std::io::Write;

use memory::MemoryReader;
use stack::StackWalker;
use symbols::SymbolTable;
use traceback_error::TracebackError;
pub use utils::ResultLogExt;

pub mod arch;
mod bit;
pub mod format;
pub mod memory;
pub mod stack;
pub mod symbols;
pub mod traceback_error;
pub mod types;
mod utils;

/// Print a traceback of the current call stack to `out`, starting at the
/// caller's frame and ending at the root function. Requires frame-pointer
/// linkage in the build (`-C force-frame-pointers=yes`).
pub fn traceback(
    symbols: &SymbolTable,
    memory: &dyn MemoryReader,
    out: &mut dyn Write,
) -> Result<(), TracebackError> {
    let walker = StackWalker::builder()
        .symbols(symbols)
        .memory(memory)
        .build();
    return walker.walk(out, arch::current_frame_base());
}
