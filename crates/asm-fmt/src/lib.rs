//! # asm-fmt: x86/x64 Instruction Text Rendering
//!
//! `asm-fmt` turns x86/x64 instructions into text. It has two modes:
//!
//! - **Signature mode** renders the reference-manual form of an opcode,
//!   such as `VADDPS zmm1 {k1}{z}, zmm2, zmm3/m512/m32bcst{er}`.
//! - **Live mode** renders a concrete [`Instruction`] in NASM syntax, such
//!   as `lock add [rbx+10h],eax`.
//!
//! ## Quick Start
//!
//! ```rust
//! use asm_fmt::{Code, Instruction, MemoryOperand, NasmFormatter, PrefixFlags, Register};
//!
//! assert_eq!(
//!     Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er.op_code().signature(),
//!     "VADDPS zmm1 {k1}{z}, zmm2, zmm3/m512/m32bcst{er}"
//! );
//!
//! let instr = Instruction::new(Code::Add_rm32_r32)
//!     .with_memory(0, MemoryOperand::base(Register::Rbx).with_displacement(0x10, 1))
//!     .unwrap()
//!     .with_prefixes(PrefixFlags::LOCK);
//! let mut out = String::new();
//! NasmFormatter::new().format(&instr, &mut out);
//! assert_eq!(out, "lock add [rbx+10h],eax");
//! ```
//!
//! ## Features
//!
//! - **One renderer**: operand-kind tags and per-opcode exception lists
//!   drive a single dispatcher instead of per-instruction code.
//! - **Token output**: every piece of text reaches a [`FormatterOutput`]
//!   tagged with its [`FormatterTextKind`].
//! - **Pluggable numbers and symbols**: see [`NumberFormatter`] and
//!   [`SymbolResolver`].
//! - **`no_std` + `alloc`**.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// ── Pedantic lint policy ─────────────────────────────────────────────────
// Rendering narrows and sign-reinterprets integers between operand widths
// (u64→i8, i64→u32) on purpose, and the opcode table repeats match arms.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::match_same_arms,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::too_many_arguments,
    clippy::single_match_else,
    clippy::manual_let_else,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

extern crate alloc;

/// Opcode set and static operand metadata.
pub mod code;
/// Configuration and instruction-building errors.
pub mod error;
/// Operand walk and disambiguation indices.
pub mod index;
/// Concrete instructions and their builders.
pub mod instruction;
/// Memory operand sizes.
pub mod memory_size;
/// NASM renderer.
pub mod nasm;
/// Number-to-text conversion.
pub mod number;
/// Live operand resolution.
pub mod op_info;
/// Operand kind tags.
pub mod op_kind;
/// Formatter options.
pub mod options;
/// Output sink and text kinds.
pub mod output;
pub(crate) mod quirks;
/// Registers.
pub mod register;
/// Opcode signatures.
pub mod signature;
/// Symbol lookup.
pub mod symbol;

// Re-exports
pub use code::{Code, OpCodeFlags, OpCodeInfo};
pub use error::{FormatterError, OperandCategory};
pub use instruction::{
    CodeSize, Instruction, MemoryOperand, OperandValue, PrefixFlags, RoundingControl,
    MAX_DECLARE_BYTES, MAX_OP_COUNT,
};
pub use memory_size::MemorySize;
pub use nasm::NasmFormatter;
pub use number::{DefaultNumberFormatter, NumberFormatter, NumberFormattingOptions};
pub use op_info::{InstrOpInfo, InstrOpInfoFlags, InstrOpKind};
pub use op_kind::{OpKind, OperandKind};
pub use options::{FormatterOptions, MemorySizeOptions, NumberBase};
pub use output::{DecoratorKind, FormatterOutput, FormatterTextKind, NumberKind, PrefixKind};
pub use quirks::OpCodeQuirks;
pub use register::{Register, RegisterClass};
pub use signature::SignatureFormatter;
pub use symbol::{NoSymbols, SymbolFlags, SymbolResolver, SymbolResult};

use alloc::string::String;

/// Renders `instruction` with a default [`NasmFormatter`].
///
/// # Examples
///
/// ```rust
/// use asm_fmt::{format_nasm, Code, Instruction, Register};
///
/// let instr = Instruction::new(Code::Push_r64).with_register(0, Register::Rbx).unwrap();
/// assert_eq!(format_nasm(&instr), "push rbx");
/// ```
pub fn format_nasm(instruction: &Instruction) -> String {
    let mut out = String::new();
    NasmFormatter::new().format(instruction, &mut out);
    out
}
