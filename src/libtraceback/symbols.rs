use typed_builder::TypedBuilder;

use super::traceback_error::{ErrorKind, TracebackError};
use super::types::{ArgType, MAX_ARGS, MAX_FUNCTIONS, VirtualAddress};

#[derive(Debug, Clone, TypedBuilder)]
pub struct ArgSymbol {
    #[builder(setter(into))]
    pub name: String,
    pub offset: i64,
    pub arg_type: ArgType,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct FunctionSymbol {
    #[builder(setter(into))]
    pub name: String,
    pub address: VirtualAddress,
    #[builder(default)]
    pub args: Vec<ArgSymbol>,
}

/// The compiled-in function table. Built once from generator output, sorted
/// by ascending code address, immutable afterwards.
pub struct SymbolTable {
    functions: Vec<FunctionSymbol>,
}

impl SymbolTable {
    pub fn new(functions: Vec<FunctionSymbol>) -> Result<Self, TracebackError> {
        if functions.len() > MAX_FUNCTIONS {
            return TracebackError::err(
                "Function table exceeds maximum count",
                ErrorKind::InvalidIndex,
            );
        }
        for func in &functions {
            if func.args.len() > MAX_ARGS {
                return TracebackError::err(
                    "Argument list exceeds maximum count",
                    ErrorKind::InvalidIndex,
                );
            }
        }
        if functions.windows(2).any(|w| w[0].address >= w[1].address) {
            return TracebackError::err(
                "Function table not sorted by ascending address",
                ErrorKind::InvalidAddress,
            );
        }
        Ok(Self { functions })
    }

    /// Index of the function whose code range contains `return_address`:
    /// the entry with the greatest starting address still at or below it.
    /// An address below the first entry, or at or above the last entry's
    /// start with no higher entry to cross, resolves to `None`.
    pub fn resolve(&self, return_address: VirtualAddress) -> Option<usize> {
        for (i, func) in self.functions.iter().enumerate() {
            if func.address > return_address {
                if i == 0 {
                    return None;
                }
                return Some(i - 1);
            }
        }
        return None;
    }

    pub fn function_at(&self, index: usize) -> Result<&FunctionSymbol, TracebackError> {
        self.functions
            .get(index)
            .ok_or_else(|| TracebackError::new("Invalid function index", ErrorKind::InvalidIndex))
    }

    pub fn size(&self) -> usize {
        self.functions.len()
    }

    pub fn empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[test]
fn resolve_prefers_greatest_lower_entry() {
    let table = SymbolTable::new(vec![
        FunctionSymbol::builder()
            .name("alpha")
            .address(VirtualAddress::new(0x1000))
            .build(),
        FunctionSymbol::builder()
            .name("beta")
            .address(VirtualAddress::new(0x2000))
            .build(),
    ])
    .unwrap();
    assert_eq!(table.resolve(VirtualAddress::new(0x1800)), Some(0));
    assert_eq!(table.resolve(VirtualAddress::new(0x0800)), None);
}
