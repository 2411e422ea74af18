use std::io::Write;

use super::memory::{MemoryReader, read_memory_as};
use super::symbols::ArgSymbol;
use super::traceback_error::{ErrorKind, TracebackError};
use super::types::{ArgType, MAX_ARRAY_PRINT_NUM, MAX_STRING_PRINT_LEN, VirtualAddress, WORD_SIZE};

pub(crate) fn emit(out: &mut dyn Write, text: std::fmt::Arguments) -> Result<(), TracebackError> {
    out.write_fmt(text)
        .map_err(|_| TracebackError::new("Could not write to output", ErrorKind::NoOutput))
}

/// Quoted rendering of a NUL-terminated byte string, capped at
/// `MAX_STRING_PRINT_LEN` characters with a `...` marker when characters
/// remain past the cap.
pub fn print_quoted_string(
    out: &mut dyn Write,
    memory: &dyn MemoryReader,
    address: VirtualAddress,
) -> Result<(), TracebackError> {
    emit(out, format_args!("\""))?;
    let mut printed = 0;
    while printed < MAX_STRING_PRINT_LEN {
        let byte: u8 = read_memory_as(memory, address + printed as i64)?;
        if byte == 0 {
            return emit(out, format_args!("\""));
        }
        out.write_all(&[byte])
            .map_err(|_| TracebackError::new("Could not write to output", ErrorKind::NoOutput))?;
        printed += 1;
    }
    let next: u8 = read_memory_as(memory, address + printed as i64)?;
    if next != 0 {
        emit(out, format_args!("..."))?;
    }
    return emit(out, format_args!("\""));
}

/// Braced rendering of a null-terminated array of string pointers, capped
/// at `MAX_ARRAY_PRINT_NUM` elements with a `, ...` marker when a fourth
/// non-null entry exists.
pub fn print_string_array(
    out: &mut dyn Write,
    memory: &dyn MemoryReader,
    address: VirtualAddress,
) -> Result<(), TracebackError> {
    emit(out, format_args!("{{"))?;
    let mut count = 0;
    loop {
        let element: u64 = read_memory_as(memory, address + (count * WORD_SIZE) as i64)?;
        if element == 0 {
            break;
        }
        if count == MAX_ARRAY_PRINT_NUM {
            emit(out, format_args!(", ..."))?;
            break;
        }
        if count != 0 {
            emit(out, format_args!(", "))?;
        }
        print_quoted_string(out, memory, VirtualAddress::new(element))?;
        count += 1;
    }
    return emit(out, format_args!("}}"));
}

/// One `<type> <name>=<value>` token, with the value read at
/// `frame_base + offset` and rendered per the argument's type tag.
pub fn format_arg(
    out: &mut dyn Write,
    memory: &dyn MemoryReader,
    arg: &ArgSymbol,
    frame_base: VirtualAddress,
) -> Result<(), TracebackError> {
    let value_addr = frame_base + arg.offset;
    match arg.arg_type {
        ArgType::Char => {
            let value: u8 = read_memory_as(memory, value_addr)?;
            if (0x20..=0x7e).contains(&value) {
                emit(out, format_args!("char {}='{}'", arg.name, value as char))
            } else {
                emit(out, format_args!("char {}=\\{}", arg.name, value as i8))
            }
        }
        ArgType::Int => {
            let value: i32 = read_memory_as(memory, value_addr)?;
            emit(out, format_args!("int {}={}", arg.name, value))
        }
        ArgType::Float => {
            let value: f32 = read_memory_as(memory, value_addr)?;
            emit(out, format_args!("float {}={:.6}", arg.name, value))
        }
        ArgType::Double => {
            let value: f64 = read_memory_as(memory, value_addr)?;
            emit(out, format_args!("double {}={:.6}", arg.name, value))
        }
        ArgType::String => {
            emit(out, format_args!("char *{}=", arg.name))?;
            let target: u64 = read_memory_as(memory, value_addr)?;
            print_quoted_string(out, memory, VirtualAddress::new(target))
        }
        ArgType::StringArray => {
            emit(out, format_args!("char **{}=", arg.name))?;
            let target: u64 = read_memory_as(memory, value_addr)?;
            print_string_array(out, memory, VirtualAddress::new(target))
        }
        ArgType::VoidStar => {
            let value: u64 = read_memory_as(memory, value_addr)?;
            emit(out, format_args!("void *{}=0v{:x}", arg.name, value))
        }
        ArgType::Unknown => {
            let value: u64 = read_memory_as(memory, value_addr)?;
            emit(out, format_args!("UNKNOWN {}=0x{:x}", arg.name, value))
        }
    }
}

/// Comma-joined rendering of a full argument list, or the literal `void`
/// for an empty one.
pub fn format_arg_list(
    out: &mut dyn Write,
    memory: &dyn MemoryReader,
    args: &[ArgSymbol],
    frame_base: VirtualAddress,
) -> Result<(), TracebackError> {
    if args.is_empty() {
        return emit(out, format_args!("void"));
    }
    for (i, arg) in args.iter().enumerate() {
        if i != 0 {
            emit(out, format_args!(", "))?;
        }
        format_arg(out, memory, arg, frame_base)?;
    }
    Ok(())
}
