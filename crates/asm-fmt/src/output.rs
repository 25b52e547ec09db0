//! Output sink for rendered instruction text.
//!
//! Every piece of text the live formatter emits goes through
//! [`FormatterOutput::write`] tagged with a [`FormatterTextKind`], so a
//! caller can colorize or collect tokens. The provided hooks receive the
//! extra context (register, decorator, number value) before falling back to
//! `write`.

use alloc::string::String;

use crate::instruction::Instruction;
use crate::register::Register;

/// Category of a piece of emitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatterTextKind {
    /// Whitespace and other filler.
    Text,
    /// `db`, `dw`, `dd`, `dq`.
    Directive,
    Prefix,
    Mnemonic,
    /// `byte`, `near`, `rel`, `to`, …
    Keyword,
    /// `+`, `-`, `*`.
    Operator,
    /// `,`, `[`, `]`, `:`, `{`, `}`.
    Punctuation,
    Number,
    Register,
    /// Body of a `{…}` decorator.
    Decorator,
    /// Selector half of a far branch target.
    SelectorValue,
    /// Jump target address.
    LabelAddress,
    /// Call target address.
    FunctionAddress,
    /// Data symbol.
    Data,
    /// Jump target symbol.
    Label,
    /// Call target symbol.
    Function,
}

/// Prefix written before the mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefixKind {
    Es,
    Cs,
    Ss,
    Ds,
    Fs,
    Gs,
    Lock,
    Rep,
    Repe,
    Repne,
    OperandSize,
    AddressSize,
    Xacquire,
    Xrelease,
    Bnd,
    Notrack,
}

impl PrefixKind {
    /// Prefix kind of a segment override.
    pub(crate) fn segment(register: Register) -> PrefixKind {
        match register {
            Register::Es => PrefixKind::Es,
            Register::Cs => PrefixKind::Cs,
            Register::Ss => PrefixKind::Ss,
            Register::Fs => PrefixKind::Fs,
            Register::Gs => PrefixKind::Gs,
            _ => PrefixKind::Ds,
        }
    }
}

/// `{…}` decorator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecoratorKind {
    /// `{1to16}`.
    Broadcast,
    /// `{rn-sae}` and the other rounding modes.
    RoundingControl,
    /// `{sae}`.
    SuppressAllExceptions,
    /// `{z}`.
    ZeroingMasking,
}

/// Width and signedness of a written number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
}

/// Receives formatted text.
///
/// Only [`write`](Self::write) is required. The other methods are hooks that
/// carry extra context and default to `write` with the matching text kind.
/// `operand` is the formatter operand index. `instruction_operand` is the
/// instruction operand it came from, or `None` for operands the formatter
/// added (`xmm0` after `blendvps`, `{sae}`).
pub trait FormatterOutput {
    fn write(&mut self, text: &str, kind: FormatterTextKind);

    fn write_prefix(&mut self, _instruction: &Instruction, text: &str, _prefix: PrefixKind) {
        self.write(text, FormatterTextKind::Prefix);
    }

    fn write_mnemonic(&mut self, _instruction: &Instruction, text: &str) {
        self.write(text, FormatterTextKind::Mnemonic);
    }

    #[allow(clippy::too_many_arguments)]
    fn write_number(
        &mut self,
        _instruction: &Instruction,
        _operand: usize,
        _instruction_operand: Option<usize>,
        text: &str,
        _value: u64,
        _number_kind: NumberKind,
        kind: FormatterTextKind,
    ) {
        self.write(text, kind);
    }

    fn write_decorator(
        &mut self,
        _instruction: &Instruction,
        _operand: usize,
        _instruction_operand: Option<usize>,
        text: &str,
        _decorator: DecoratorKind,
    ) {
        self.write(text, FormatterTextKind::Decorator);
    }

    fn write_register(
        &mut self,
        _instruction: &Instruction,
        _operand: usize,
        _instruction_operand: Option<usize>,
        text: &str,
        _register: Register,
    ) {
        self.write(text, FormatterTextKind::Register);
    }
}

impl FormatterOutput for String {
    fn write(&mut self, text: &str, _kind: FormatterTextKind) {
        self.push_str(text);
    }
}

const MAX_FIRST_OPERAND_CHAR_INDEX: usize = 256;

/// Pads from `column` to the first operand column.
///
/// With `tab_size == 0` only spaces are written, and at least one. Otherwise
/// tabs are written up to the last tab stop before the target column and
/// spaces fill the rest.
pub(crate) fn add_tabs<O: FormatterOutput + ?Sized>(
    output: &mut O,
    mut column: usize,
    first_operand_char_index: usize,
    tab_size: usize,
) {
    let first = first_operand_char_index.min(MAX_FIRST_OPERAND_CHAR_INDEX);
    let mut pad = String::new();
    if tab_size == 0 {
        let spaces = first.saturating_sub(column).max(1);
        pad.extend(core::iter::repeat(' ').take(spaces));
    } else {
        let end = first.max(column + 1);
        let last_stop = end / tab_size * tab_size;
        while column < last_stop {
            pad.push('\t');
            column = (column / tab_size + 1) * tab_size;
        }
        pad.extend(core::iter::repeat(' ').take(end.saturating_sub(column)));
    }
    output.write(&pad, FormatterTextKind::Text);
}
