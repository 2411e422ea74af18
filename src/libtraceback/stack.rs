use std::io::Write;

use typed_builder::TypedBuilder;

use super::format::{emit, format_arg_list};
use super::memory::{MemoryReader, read_memory_as};
use super::symbols::SymbolTable;
use super::traceback_error::{ErrorKind, TracebackError};
use super::types::{MAX_FRAME_DEPTH, VirtualAddress, WORD_SIZE};

/// What to do when a return address matches no table entry: print the raw
/// address and keep following the chain, or stop the walk with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    Advance,
    Abort,
}

/// One `Function <name>(<args>) in` line for a resolved frame. Argument
/// values are read relative to `frame_base`.
pub fn print_frame(
    out: &mut dyn Write,
    symbols: &SymbolTable,
    memory: &dyn MemoryReader,
    function_index: usize,
    frame_base: VirtualAddress,
) -> Result<(), TracebackError> {
    let func = symbols.function_at(function_index)?;
    if frame_base.is_null() {
        return TracebackError::err("Null frame base", ErrorKind::InvalidAddress);
    }
    emit(out, format_args!("Function {}(", func.name))?;
    format_arg_list(out, memory, &func.args, frame_base)?;
    return emit(out, format_args!(") in\n"));
}

#[derive(TypedBuilder)]
pub struct StackWalker<'a> {
    symbols: &'a SymbolTable,
    memory: &'a dyn MemoryReader,
    #[builder(default = MAX_FRAME_DEPTH)]
    max_frames: usize,
    #[builder(default = String::from("main"), setter(into))]
    root_name: String,
    #[builder(default = UnresolvedPolicy::Advance)]
    on_unresolved: UnresolvedPolicy,
}

impl<'a> StackWalker<'a> {
    /// Walk the saved-frame-base chain starting at `start_frame_base`,
    /// printing one line per frame in callee-to-caller order. Ends on the
    /// frame whose function name carries the root prefix; a chain that is
    /// null, cyclic, or longer than `max_frames` is reported as corrupt.
    pub fn walk(
        &self,
        out: &mut dyn Write,
        start_frame_base: VirtualAddress,
    ) -> Result<(), TracebackError> {
        let mut frame_base = start_frame_base;
        for _ in 0..self.max_frames {
            if frame_base.is_null() {
                return TracebackError::err("Null frame base", ErrorKind::InvalidAddress);
            }
            let return_address: u64 =
                read_memory_as(self.memory, frame_base + WORD_SIZE as i64)?;
            let return_address = VirtualAddress::new(return_address);
            log::trace!(
                "walk... frame_base={frame_base:#x} return_address={return_address:#x}"
            );

            let Some(index) = self.symbols.resolve(return_address) else {
                log::warn!("No function contains return address {return_address:#x}");
                if self.on_unresolved == UnresolvedPolicy::Abort {
                    return TracebackError::err(
                        "Unresolved return address",
                        ErrorKind::UnresolvedSymbol,
                    );
                }
                emit(out, format_args!("Function 0x{return_address:x}(...), in\n"))?;
                frame_base = self.advance(frame_base)?;
                continue;
            };

            // Arguments live in the caller's activation record, so step to
            // the saved frame base before printing.
            frame_base = self.advance(frame_base)?;
            print_frame(out, self.symbols, self.memory, index, frame_base)?;

            let func = self.symbols.function_at(index)?;
            if func.name.starts_with(self.root_name.as_str()) {
                return Ok(());
            }
        }
        return TracebackError::err(
            "Frame limit exceeded before reaching root",
            ErrorKind::CorruptFrame,
        );
    }

    fn advance(&self, frame_base: VirtualAddress) -> Result<VirtualAddress, TracebackError> {
        let next: u64 = read_memory_as(self.memory, frame_base)?;
        let next = VirtualAddress::new(next);
        if next == frame_base {
            return TracebackError::err("Frame chain does not advance", ErrorKind::CorruptFrame);
        }
        Ok(next)
    }
}
