//! Address-to-name lookup consumed by the live formatter.

use alloc::string::String;

use bitflags::bitflags;

use crate::instruction::Instruction;
use crate::output::FormatterTextKind;

bitflags! {
    /// How a resolved symbol is written.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SymbolFlags: u8 {
        /// The symbol is relative to something else; never append its address.
        const RELATIVE = 1 << 0;
        /// Written as `-symbol` inside a memory operand.
        const SIGNED = 1 << 1;
    }
}

/// A resolved symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolResult {
    /// Address the symbol names. When it differs from the looked-up address
    /// the difference is written as `+N` or `-N`.
    pub address: u64,
    pub text: String,
    /// Text kind passed to the output sink.
    pub kind: FormatterTextKind,
    pub flags: SymbolFlags,
}

impl SymbolResult {
    pub fn new(address: u64, text: impl Into<String>) -> Self {
        SymbolResult {
            address,
            text: text.into(),
            kind: FormatterTextKind::Label,
            flags: SymbolFlags::empty(),
        }
    }

    pub fn with_kind(mut self, kind: FormatterTextKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Maps addresses and immediates to symbol names.
///
/// `operand` is the formatter operand, `instruction_operand` the instruction
/// operand it came from. `size` is the width of the value in bytes.
/// Returning `None` makes the formatter print the number.
pub trait SymbolResolver {
    fn symbol(
        &self,
        instruction: &Instruction,
        operand: usize,
        instruction_operand: Option<usize>,
        address: u64,
        size: usize,
    ) -> Option<SymbolResult>;
}

/// Resolver that never finds a symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymbols;

impl SymbolResolver for NoSymbols {
    fn symbol(
        &self,
        _instruction: &Instruction,
        _operand: usize,
        _instruction_operand: Option<usize>,
        _address: u64,
        _size: usize,
    ) -> Option<SymbolResult> {
        None
    }
}

impl<F> SymbolResolver for F
where
    F: Fn(u64) -> Option<SymbolResult>,
{
    fn symbol(
        &self,
        _instruction: &Instruction,
        _operand: usize,
        _instruction_operand: Option<usize>,
        address: u64,
        _size: usize,
    ) -> Option<SymbolResult> {
        self(address)
    }
}
