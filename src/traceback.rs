#![allow(dead_code)]

use libtraceback::ResultLogExt;
use libtraceback::memory::MemoryImage;
use libtraceback::stack::StackWalker;
use libtraceback::symbols::{ArgSymbol, FunctionSymbol, SymbolTable};
use libtraceback::traceback_error::TracebackError;
use libtraceback::types::{ArgType, VirtualAddress};

mod tests;

const MAIN_ADDR: u64 = 0x401000;
const ADD_ADDR: u64 = 0x401200;
const GREET_ADDR: u64 = 0x401400;
const TRACEBACK_ADDR: u64 = 0x401600;

const STACK_BASE: u64 = 0x7f0000;

fn demo_symbols() -> Result<SymbolTable, TracebackError> {
    SymbolTable::new(vec![
        FunctionSymbol::builder()
            .name("main")
            .address(VirtualAddress::new(MAIN_ADDR))
            .args(vec![
                ArgSymbol::builder()
                    .name("argc")
                    .offset(16)
                    .arg_type(ArgType::Int)
                    .build(),
                ArgSymbol::builder()
                    .name("argv")
                    .offset(24)
                    .arg_type(ArgType::StringArray)
                    .build(),
            ])
            .build(),
        FunctionSymbol::builder()
            .name("add")
            .address(VirtualAddress::new(ADD_ADDR))
            .args(vec![
                ArgSymbol::builder()
                    .name("a")
                    .offset(16)
                    .arg_type(ArgType::Int)
                    .build(),
                ArgSymbol::builder()
                    .name("b")
                    .offset(20)
                    .arg_type(ArgType::Int)
                    .build(),
            ])
            .build(),
        FunctionSymbol::builder()
            .name("greet")
            .address(VirtualAddress::new(GREET_ADDR))
            .args(vec![
                ArgSymbol::builder()
                    .name("name")
                    .offset(16)
                    .arg_type(ArgType::String)
                    .build(),
            ])
            .build(),
        FunctionSymbol::builder()
            .name("traceback")
            .address(VirtualAddress::new(TRACEBACK_ADDR))
            .build(),
    ])
}

/// A stack image as a frame-pointer build of `main -> add -> greet ->
/// traceback` would leave it: each frame stores the caller's frame base at
/// its own base and the return address one word above.
fn demo_stack() -> Result<(MemoryImage, VirtualAddress), TracebackError> {
    let base = VirtualAddress::new(STACK_BASE);
    let mut image = MemoryImage::new(base, 0x200);

    let fb0 = base;
    let fb1 = base + 0x40;
    let fb2 = base + 0x80;
    let fb3 = base + 0xc0;
    let argv_addr = base + 0x140;
    let name_addr = base + 0x180;
    let argv0_addr = base + 0x1a0;

    // traceback's frame: linkage back into greet
    image.write_word(fb0, fb1.addr())?;
    image.write_word(fb0 + 8, GREET_ADDR + 0x50)?;

    // greet's frame and its `name` argument
    image.write_word(fb1, fb2.addr())?;
    image.write_word(fb1 + 8, ADD_ADDR + 0x80)?;
    image.write_word(fb1 + 16, name_addr.addr())?;

    // add's frame and its `a`, `b` arguments
    image.write_word(fb2, fb3.addr())?;
    image.write_word(fb2 + 8, MAIN_ADDR + 0x80)?;
    image.write_bytes(fb2 + 16, &2i32.to_ne_bytes())?;
    image.write_bytes(fb2 + 20, &3i32.to_ne_bytes())?;

    // main's frame: root of the chain
    image.write_word(fb3, 0)?;
    image.write_bytes(fb3 + 16, &1i32.to_ne_bytes())?;
    image.write_word(fb3 + 24, argv_addr.addr())?;

    image.write_word(argv_addr, argv0_addr.addr())?;
    image.write_word(argv_addr + 8, 0)?;
    image.write_bytes(name_addr, b"Harry Bovik\0")?;
    image.write_bytes(argv0_addr, b"traceback\0")?;

    Ok((image, fb0))
}

fn run() -> Result<(), TracebackError> {
    let symbols = demo_symbols()?;
    let (memory, start_frame_base) = demo_stack()?;
    let walker = StackWalker::builder()
        .symbols(&symbols)
        .memory(&memory)
        .build();
    return walker.walk(&mut std::io::stdout(), start_frame_base);
}

fn main() {
    env_logger::init();
    run().log_error();
}
