//! NASM-syntax renderer for concrete instructions.
//!
//! ```
//! use asm_fmt::{Code, Instruction, MemoryOperand, NasmFormatter, Register};
//!
//! let instr = Instruction::new(Code::Mov_r32_rm32)
//!     .with_memory(1, MemoryOperand::base(Register::Rbx).with_displacement(0x10, 1))
//!     .unwrap();
//! let mut out = String::new();
//! NasmFormatter::new().format(&instr, &mut out);
//! assert_eq!(out, "mov eax,[rbx+10h]");
//! ```

use alloc::borrow::Cow;
use alloc::string::String;

use crate::code::OpCodeFlags;
use crate::instruction::{CodeSize, Instruction, PrefixFlags};
use crate::memory_size::MemorySize;
use crate::number::{DefaultNumberFormatter, NumberFormatter, NumberFormattingOptions};
use crate::op_info::{BracketSize, InstrOpInfo, InstrOpInfoFlags, InstrOpKind};
use crate::op_kind::OperandKind;
use crate::options::{FormatterOptions, MemorySizeOptions};
use crate::output::{add_tabs, DecoratorKind, FormatterOutput, FormatterTextKind, NumberKind, PrefixKind};
use crate::quirks::OpCodeQuirks;
use crate::register::Register;
use crate::symbol::{NoSymbols, SymbolFlags, SymbolResolver, SymbolResult};

/// Renders [`Instruction`]s in NASM syntax.
///
/// Format methods take `&self`; options are changed through
/// [`options_mut`](Self::options_mut) between calls.
#[derive(Debug, Clone, Default)]
pub struct NasmFormatter<R = NoSymbols, N = DefaultNumberFormatter> {
    options: FormatterOptions,
    symbol_resolver: R,
    number_formatter: N,
}

impl NasmFormatter {
    /// A formatter with NASM default options.
    pub fn new() -> Self {
        Self::with_options(FormatterOptions::default())
    }

    pub fn with_options(options: FormatterOptions) -> Self {
        log::trace!(
            "nasm formatter: base {}, memory sizes {:?}",
            options.number_base(),
            options.memory_size_options()
        );
        NasmFormatter {
            options,
            symbol_resolver: NoSymbols,
            number_formatter: DefaultNumberFormatter,
        }
    }
}

impl<R, N> NasmFormatter<R, N> {
    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut FormatterOptions {
        &mut self.options
    }

    /// Replaces the symbol resolver.
    pub fn with_symbol_resolver<S: SymbolResolver>(self, symbol_resolver: S) -> NasmFormatter<S, N> {
        log::trace!("nasm formatter: symbol resolver installed");
        NasmFormatter {
            options: self.options,
            symbol_resolver,
            number_formatter: self.number_formatter,
        }
    }

    /// Replaces the number formatter.
    pub fn with_number_formatter<M: NumberFormatter>(self, number_formatter: M) -> NasmFormatter<R, M> {
        log::trace!("nasm formatter: number formatter installed");
        NasmFormatter {
            options: self.options,
            symbol_resolver: self.symbol_resolver,
            number_formatter,
        }
    }
}

impl<R: SymbolResolver, N: NumberFormatter> NasmFormatter<R, N> {
    /// Writes prefixes, mnemonic and operands.
    pub fn format<O: FormatterOutput + ?Sized>(&self, instruction: &Instruction, output: &mut O) {
        let op_info = InstrOpInfo::new(&self.options, instruction);
        let column = self.write_mnemonic(instruction, output, &op_info);
        if op_info.op_count() != 0 {
            add_tabs(
                output,
                column,
                self.options.first_operand_char_index,
                self.options.tab_size() as usize,
            );
            self.write_operands(instruction, output, &op_info);
        }
    }

    /// Writes the prefixes and the mnemonic.
    pub fn format_mnemonic<O: FormatterOutput + ?Sized>(&self, instruction: &Instruction, output: &mut O) {
        let op_info = InstrOpInfo::new(&self.options, instruction);
        self.write_mnemonic(instruction, output, &op_info);
    }

    /// Number of operands [`format_operand`](Self::format_operand) accepts.
    pub fn operand_count(&self, instruction: &Instruction) -> usize {
        InstrOpInfo::new(&self.options, instruction).op_count()
    }

    /// Writes formatter operand `operand`, with its decorators.
    ///
    /// # Panics
    ///
    /// Panics if `operand >= self.operand_count(instruction)`.
    pub fn format_operand<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        operand: usize,
    ) {
        let op_info = InstrOpInfo::new(&self.options, instruction);
        if operand >= op_info.op_count() {
            panic!(
                "{:?}: operand {} out of range (count {})",
                instruction.code(),
                operand,
                op_info.op_count()
            );
        }
        self.write_operand(instruction, output, &op_info, operand);
    }

    /// Writes `,` and the optional space after it.
    pub fn format_operand_separator<O: FormatterOutput + ?Sized>(&self, _instruction: &Instruction, output: &mut O) {
        output.write(",", FormatterTextKind::Punctuation);
        if self.options.space_after_operand_separator {
            output.write(" ", FormatterTextKind::Text);
        }
    }

    /// Writes every operand, separated.
    pub fn format_all_operands<O: FormatterOutput + ?Sized>(&self, instruction: &Instruction, output: &mut O) {
        let op_info = InstrOpInfo::new(&self.options, instruction);
        self.write_operands(instruction, output, &op_info);
    }

    /// Register name in the configured case.
    pub fn format_register(&self, register: Register) -> String {
        String::from(self.register_text(register))
    }

    pub fn format_i8(&self, value: i8) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_i8(&self.options, &number_options, value, self.options.leading_zeros)
    }

    pub fn format_i16(&self, value: i16) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_i16(&self.options, &number_options, value, self.options.leading_zeros)
    }

    pub fn format_i32(&self, value: i32) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_i32(&self.options, &number_options, value, self.options.leading_zeros)
    }

    pub fn format_i64(&self, value: i64) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_i64(&self.options, &number_options, value, self.options.leading_zeros)
    }

    pub fn format_u8(&self, value: u8) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_u8(&self.options, &number_options, value, self.options.leading_zeros)
    }

    pub fn format_u16(&self, value: u16) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_u16(&self.options, &number_options, value, self.options.leading_zeros)
    }

    pub fn format_u32(&self, value: u32) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_u32(&self.options, &number_options, value, self.options.leading_zeros)
    }

    pub fn format_u64(&self, value: u64) -> String {
        let number_options = NumberFormattingOptions::immediate(&self.options);
        self.number_formatter
            .format_u64(&self.options, &number_options, value, self.options.leading_zeros)
    }

    // ── Case ───────────────────────────────────────────────────────────

    fn cased<'t>(&self, text: &'t str, upper: bool) -> Cow<'t, str> {
        if upper || self.options.uppercase_all {
            Cow::Owned(text.to_ascii_uppercase())
        } else {
            Cow::Borrowed(text)
        }
    }

    fn register_text(&self, register: Register) -> Cow<'static, str> {
        self.cased(register.name(), self.options.uppercase_registers)
    }

    fn write_keyword<O: FormatterOutput + ?Sized>(&self, output: &mut O, keyword: &str) {
        output.write(&self.cased(keyword, self.options.uppercase_keywords), FormatterTextKind::Keyword);
    }

    fn write_register<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        operand: usize,
        instruction_operand: Option<usize>,
        register: Register,
    ) {
        let text = self.register_text(register);
        output.write_register(instruction, operand, instruction_operand, &text, register);
    }

    fn write_decorator<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        operand: usize,
        instruction_operand: Option<usize>,
        text: &str,
        decorator: DecoratorKind,
    ) {
        output.write("{", FormatterTextKind::Punctuation);
        let text = self.cased(text, self.options.uppercase_decorators);
        output.write_decorator(instruction, operand, instruction_operand, &text, decorator);
        output.write("}", FormatterTextKind::Punctuation);
    }

    // ── Prefixes and mnemonic ──────────────────────────────────────────

    /// Writes prefixes and mnemonic, returning the column after them.
    fn write_mnemonic<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        op_info: &InstrOpInfo,
    ) -> usize {
        let info = instruction.code().op_code();
        let quirks = info.quirks();
        let flags = op_info.flags();
        let string_op = info.op_kinds().iter().any(|kind| kind.is_string_pointer());
        let useless = self.options.show_useless_prefixes;
        let mut column = 0;

        if let Some(text) = flags.op_size().keyword() {
            self.write_prefix(instruction, output, text, PrefixKind::OperandSize, &mut column);
        }
        if let Some(text) = flags.addr_size().keyword() {
            self.write_prefix(instruction, output, text, PrefixKind::AddressSize, &mut column);
        }

        let segment = instruction.segment_prefix();
        let notrack = quirks.contains(OpCodeQuirks::NOTRACK_BRANCH) && segment == Some(Register::Ds);
        if let Some(segment) = segment {
            let shows_memory = op_info.operands().iter().any(|op| op.kind == InstrOpKind::Memory);
            if !notrack && !shows_memory && (string_op || useless) {
                self.write_prefix(instruction, output, segment.name(), PrefixKind::segment(segment), &mut column);
            }
        }

        if instruction.prefixes().contains(PrefixFlags::XACQUIRE) {
            self.write_prefix(instruction, output, "xacquire", PrefixKind::Xacquire, &mut column);
        }
        if instruction.prefixes().contains(PrefixFlags::XRELEASE) {
            self.write_prefix(instruction, output, "xrelease", PrefixKind::Xrelease, &mut column);
        }
        if instruction.has_lock_prefix() {
            self.write_prefix(instruction, output, "lock", PrefixKind::Lock, &mut column);
        }
        if instruction.has_repe_prefix() && (string_op || useless) {
            if quirks.contains(OpCodeQuirks::REPE_CAPABLE) {
                self.write_prefix(instruction, output, "repe", PrefixKind::Repe, &mut column);
            } else {
                self.write_prefix(instruction, output, "rep", PrefixKind::Rep, &mut column);
            }
        }
        let bnd = flags.contains(InstrOpInfoFlags::BND_PREFIX);
        if instruction.has_repne_prefix() && !bnd && (string_op || useless) {
            self.write_prefix(instruction, output, "repne", PrefixKind::Repne, &mut column);
        }
        if notrack {
            self.write_prefix(instruction, output, "notrack", PrefixKind::Notrack, &mut column);
        }
        if bnd {
            self.write_prefix(instruction, output, "bnd", PrefixKind::Bnd, &mut column);
        }

        if column != 0 {
            output.write(" ", FormatterTextKind::Text);
            column += 1;
        }
        let mnemonic = op_info.mnemonic();
        if flags.contains(InstrOpInfoFlags::MNEMONIC_IS_DIRECTIVE) {
            let text = self.cased(mnemonic, self.options.uppercase_keywords);
            output.write(&text, FormatterTextKind::Directive);
            column += text.len();
        } else {
            let text = self.cased(mnemonic, self.options.uppercase_mnemonics);
            output.write_mnemonic(instruction, &text);
            column += text.len();
        }
        column
    }

    fn write_prefix<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        text: &str,
        kind: PrefixKind,
        column: &mut usize,
    ) {
        if *column != 0 {
            output.write(" ", FormatterTextKind::Text);
            *column += 1;
        }
        let text = self.cased(text, self.options.uppercase_prefixes);
        output.write_prefix(instruction, &text, kind);
        *column += text.len();
    }

    // ── Operands ───────────────────────────────────────────────────────

    fn write_operands<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        op_info: &InstrOpInfo,
    ) {
        for operand in 0..op_info.op_count() {
            if operand != 0 {
                self.format_operand_separator(instruction, output);
            }
            self.write_operand(instruction, output, op_info, operand);
        }
    }

    fn write_operand<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        op_info: &InstrOpInfo,
        operand: usize,
    ) {
        let op = *op_info.operand(operand);
        let source = op.instruction_operand;
        let flags = op_info.flags();
        match op.kind {
            InstrOpKind::Register => {
                let Some(register) = op.register else {
                    panic!(
                        "{:?}: operand {} has no register",
                        instruction.code(),
                        operand
                    );
                };
                if operand == 0 && flags.contains(InstrOpInfoFlags::REGISTER_TO) {
                    self.write_keyword(output, "to");
                    output.write(" ", FormatterTextKind::Text);
                }
                self.write_register(instruction, output, operand, source, register);
                let span = source.map(|i| instruction.operand_kind(i));
                if matches!(span, Some(OperandKind::Xmmp3Vvvv | OperandKind::Zmmp3Vvvv)) {
                    output.write("+", FormatterTextKind::Operator);
                    output.write("3", FormatterTextKind::Number);
                }
            }
            InstrOpKind::NearBranch16 | InstrOpKind::NearBranch32 | InstrOpKind::NearBranch64 => {
                self.write_near_branch(instruction, output, op_info, operand, source);
            }
            InstrOpKind::FarBranch16 | InstrOpKind::FarBranch32 => {
                self.write_far_branch(instruction, output, operand, source, op.kind);
            }
            InstrOpKind::Immediate8
            | InstrOpKind::Immediate8_2nd
            | InstrOpKind::Immediate16
            | InstrOpKind::Immediate32
            | InstrOpKind::Immediate64
            | InstrOpKind::Immediate8to16
            | InstrOpKind::Immediate8to32
            | InstrOpKind::Immediate8to64
            | InstrOpKind::Immediate32to64 => {
                self.write_immediate(instruction, output, op_info, operand, source, op.kind);
            }
            InstrOpKind::Memory => {
                self.write_memory(instruction, output, op_info, operand, source);
            }
            InstrOpKind::Sae => {
                self.write_decorator(instruction, output, operand, source, "sae", DecoratorKind::SuppressAllExceptions);
            }
            InstrOpKind::RnSae => {
                self.write_decorator(instruction, output, operand, source, "rn-sae", DecoratorKind::RoundingControl);
            }
            InstrOpKind::RdSae => {
                self.write_decorator(instruction, output, operand, source, "rd-sae", DecoratorKind::RoundingControl);
            }
            InstrOpKind::RuSae => {
                self.write_decorator(instruction, output, operand, source, "ru-sae", DecoratorKind::RoundingControl);
            }
            InstrOpKind::RzSae => {
                self.write_decorator(instruction, output, operand, source, "rz-sae", DecoratorKind::RoundingControl);
            }
            InstrOpKind::DeclareByte
            | InstrOpKind::DeclareWord
            | InstrOpKind::DeclareDword
            | InstrOpKind::DeclareQword => {
                let index = source.unwrap_or(operand);
                let value = instruction.declare_value(index);
                let (size, number_kind) = match op.kind {
                    InstrOpKind::DeclareByte => (1, NumberKind::UInt8),
                    InstrOpKind::DeclareWord => (2, NumberKind::UInt16),
                    InstrOpKind::DeclareDword => (4, NumberKind::UInt32),
                    _ => (8, NumberKind::UInt64),
                };
                let number_options = NumberFormattingOptions::immediate(&self.options);
                let text = self.number_formatter.format_number(
                    &self.options,
                    &number_options,
                    value,
                    size,
                    number_options.leading_zeros,
                );
                output.write_number(instruction, operand, source, &text, value, number_kind, FormatterTextKind::Number);
            }
        }

        if operand == 0 {
            if let Some(mask) = instruction.op_mask() {
                output.write("{", FormatterTextKind::Punctuation);
                self.write_register(instruction, output, operand, source, mask);
                output.write("}", FormatterTextKind::Punctuation);
            }
            if instruction.zeroing_masking() {
                self.write_decorator(instruction, output, operand, source, "z", DecoratorKind::ZeroingMasking);
            }
        }
    }

    fn write_near_branch<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        op_info: &InstrOpInfo,
        operand: usize,
        source: Option<usize>,
    ) {
        let index = source.unwrap_or(operand);
        if self.options.show_branch_size {
            for keyword in op_info.flags().branch_size().keywords() {
                self.write_keyword(output, keyword);
                output.write(" ", FormatterTextKind::Text);
            }
        }

        let target = instruction.near_branch_target(index);
        let width = instruction.near_branch_width(instruction.operand_kind(index));
        let is_call = instruction.code().op_code().flags().contains(OpCodeFlags::CALL);
        if let Some(symbol) = self
            .symbol_resolver
            .symbol(instruction, operand, source, target, width)
        {
            self.write_symbol(instruction, output, operand, source, target, &symbol);
            return;
        }

        let number_options = NumberFormattingOptions::branch(&self.options);
        let text = self.number_formatter.format_number(
            &self.options,
            &number_options,
            target,
            width,
            self.options.branch_leading_zeros,
        );
        let kind = if is_call {
            FormatterTextKind::FunctionAddress
        } else {
            FormatterTextKind::LabelAddress
        };
        output.write_number(instruction, operand, source, &text, target, unsigned_kind(width), kind);
    }

    fn write_far_branch<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        operand: usize,
        source: Option<usize>,
        kind: InstrOpKind,
    ) {
        let index = source.unwrap_or(operand);
        let (selector, offset) = instruction.far_branch(index);
        let number_options = NumberFormattingOptions::branch(&self.options);
        let leading_zeros = self.options.branch_leading_zeros;

        let text = self
            .number_formatter
            .format_u16(&self.options, &number_options, selector, leading_zeros);
        output.write_number(
            instruction,
            operand,
            source,
            &text,
            u64::from(selector),
            NumberKind::UInt16,
            FormatterTextKind::SelectorValue,
        );
        output.write(":", FormatterTextKind::Punctuation);

        let width = if kind == InstrOpKind::FarBranch32 { 4 } else { 2 };
        let offset = u64::from(offset);
        if let Some(symbol) = self
            .symbol_resolver
            .symbol(instruction, operand, source, offset, width)
        {
            self.write_symbol(instruction, output, operand, source, offset, &symbol);
            return;
        }
        let text = self
            .number_formatter
            .format_number(&self.options, &number_options, offset, width, leading_zeros);
        let text_kind = if instruction.code().op_code().is_call() {
            FormatterTextKind::FunctionAddress
        } else {
            FormatterTextKind::LabelAddress
        };
        output.write_number(instruction, operand, source, &text, offset, unsigned_kind(width), text_kind);
    }

    fn write_immediate<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        op_info: &InstrOpInfo,
        operand: usize,
        source: Option<usize>,
        kind: InstrOpKind,
    ) {
        let index = source.unwrap_or(operand);
        let value = instruction.immediate(index);
        let (width, sign_extended) = match kind {
            InstrOpKind::Immediate8 | InstrOpKind::Immediate8_2nd => (1, false),
            InstrOpKind::Immediate16 => (2, false),
            InstrOpKind::Immediate8to16 => (2, true),
            InstrOpKind::Immediate32 => (4, false),
            InstrOpKind::Immediate8to32 => (4, true),
            InstrOpKind::Immediate64 => (8, false),
            _ => (8, true),
        };

        if sign_extended && self.options.nasm_show_sign_extended_immediate_size {
            if let Some(keyword) = op_info.flags().sign_extend().keyword() {
                self.write_keyword(output, keyword);
                output.write(" ", FormatterTextKind::Text);
            }
        }

        if let Some(symbol) = self
            .symbol_resolver
            .symbol(instruction, operand, source, value, width)
        {
            self.write_symbol(instruction, output, operand, source, value, &symbol);
            return;
        }

        let number_options = NumberFormattingOptions::immediate(&self.options);
        let negative = self.options.signed_immediate_operands && is_negative(value, width);
        let (magnitude, number_kind) = if negative {
            output.write("-", FormatterTextKind::Operator);
            (negate(value, width), signed_kind(width))
        } else {
            (value, unsigned_kind(width))
        };
        let text = self.number_formatter.format_number(
            &self.options,
            &number_options,
            magnitude,
            width,
            number_options.leading_zeros,
        );
        output.write_number(instruction, operand, source, &text, value, number_kind, FormatterTextKind::Number);
    }

    // ── Memory ─────────────────────────────────────────────────────────

    fn write_memory<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        op_info: &InstrOpInfo,
        operand: usize,
        source: Option<usize>,
    ) {
        let memory = *instruction.memory();
        let mut flags = op_info.flags();
        let mut base = memory.base;
        let index = memory.index;
        let mut displacement = memory.displacement as u64;
        let mut displacement_size = usize::from(memory.displacement_size);
        let address_size = instruction.address_size();
        let mut rel = false;

        let abs_address = match base {
            Some(Register::Rip) => instruction.next_ip().wrapping_add(displacement),
            Some(Register::Eip) => u64::from((instruction.next_ip() as u32).wrapping_add(displacement as u32)),
            _ => displacement,
        };
        match base {
            Some(Register::Rip) if !self.options.rip_relative_addresses => {
                displacement = abs_address;
                displacement_size = 8;
                base = None;
                rel = true;
            }
            Some(Register::Eip) if !self.options.rip_relative_addresses => {
                displacement = abs_address;
                displacement_size = 4;
                base = None;
                flags = flags.with_bracket_size(BracketSize::Dword);
                rel = true;
            }
            _ => {}
        }

        let use_scale = address_size != 2
            && index.is_some()
            && (memory.scale != 1 || self.options.always_show_scale || base.is_none());

        self.write_memory_size(output, op_info.memory_size(), flags);

        output.write("[", FormatterTextKind::Punctuation);
        if self.options.space_after_memory_bracket {
            output.write(" ", FormatterTextKind::Text);
        }
        if let Some(keyword) = flags.bracket_size().keyword() {
            self.write_keyword(output, keyword);
            output.write(" ", FormatterTextKind::Text);
        }
        if rel {
            self.write_keyword(output, "rel");
            output.write(" ", FormatterTextKind::Text);
        }

        let segment = instruction.memory_segment();
        let default_segment = base.map_or(Register::Ds, Register::default_segment);
        let notrack = instruction.code().op_code().quirks().contains(OpCodeQuirks::NOTRACK_BRANCH)
            && instruction.segment_prefix() == Some(Register::Ds)
            && !(matches!(instruction.code_size(), CodeSize::Code16 | CodeSize::Code32)
                && matches!(base, Some(Register::Bp | Register::Ebp | Register::Esp)));
        let overridden = instruction.segment_prefix().is_some() && segment != default_segment && !notrack;
        if self.options.always_show_segment_register || overridden {
            self.write_register(instruction, output, operand, source, segment);
            output.write(":", FormatterTextKind::Punctuation);
        }

        let mut need_plus = false;
        if let Some(base) = base {
            self.write_register(instruction, output, operand, source, base);
            need_plus = true;
        }

        if let Some(index) = index {
            if need_plus {
                self.write_add_operator(output, "+");
            }
            need_plus = true;
            if !use_scale {
                self.write_register(instruction, output, operand, source, index);
            } else if self.options.scale_before_index {
                self.write_scale(instruction, output, operand, source, memory.scale);
                self.write_mul_operator(output);
                self.write_register(instruction, output, operand, source, index);
            } else {
                self.write_register(instruction, output, operand, source, index);
                self.write_mul_operator(output);
                self.write_scale(instruction, output, operand, source, memory.scale);
            }
        }

        let symbol = self
            .symbol_resolver
            .symbol(instruction, operand, source, abs_address, address_size);

        if let Some(symbol) = symbol {
            let operator = if symbol.flags.contains(SymbolFlags::SIGNED) { "-" } else { "+" };
            if need_plus {
                self.write_add_operator(output, operator);
            } else if operator == "-" {
                output.write("-", FormatterTextKind::Operator);
            }
            self.write_symbol(instruction, output, operand, source, abs_address, &symbol);
        } else if !need_plus
            || (displacement_size != 0 && (self.options.show_zero_displacements || displacement != 0))
        {
            let original = displacement;
            let signed = need_plus && self.options.signed_memory_displacements;
            let (value, negative) = match address_size {
                8 if signed && (displacement as i64) < 0 => ((displacement as i64).unsigned_abs(), true),
                4 if signed && (displacement as u32 as i32) < 0 => {
                    (u64::from((displacement as u32 as i32).unsigned_abs()), true)
                }
                2 if signed && (displacement as u16 as i16) < 0 => {
                    (u64::from((displacement as u16 as i16).unsigned_abs()), true)
                }
                8 => (displacement, false),
                4 => (u64::from(displacement as u32), false),
                _ => (u64::from(displacement as u16), false),
            };
            if need_plus {
                self.write_add_operator(output, if negative { "-" } else { "+" });
                if self.options.displacement_leading_zeros {
                    displacement_size = address_size;
                }
            }
            let width = if displacement_size <= 1 && value <= u64::from(u8::MAX) {
                1
            } else if displacement_size <= 2 && value <= u64::from(u16::MAX) {
                2
            } else if displacement_size <= 4 && value <= u64::from(u32::MAX) {
                4
            } else {
                8
            };
            let number_options = NumberFormattingOptions::displacement(&self.options);
            let text = self.number_formatter.format_number(
                &self.options,
                &number_options,
                value,
                width,
                self.options.displacement_leading_zeros,
            );
            let number_kind = if signed {
                signed_kind(address_size)
            } else {
                unsigned_kind(address_size)
            };
            output.write_number(instruction, operand, source, &text, original, number_kind, FormatterTextKind::Number);
        }

        if self.options.space_after_memory_bracket {
            output.write(" ", FormatterTextKind::Text);
        }
        output.write("]", FormatterTextKind::Punctuation);

        if let Some(bcst) = op_info.memory_size().info().bcst_to {
            self.write_decorator(instruction, output, operand, source, bcst, DecoratorKind::Broadcast);
        }
    }

    fn write_memory_size<O: FormatterOutput + ?Sized>(
        &self,
        output: &mut O,
        memory_size: MemorySize,
        flags: InstrOpInfoFlags,
    ) {
        if flags.contains(InstrOpInfoFlags::MEM_SIZE_NOTHING) {
            return;
        }
        let Some(keyword) = memory_size.info().keyword else {
            return;
        };
        let show = match self.options.memory_size_options() {
            MemorySizeOptions::Never => false,
            MemorySizeOptions::Always => true,
            MemorySizeOptions::Default => flags.contains(InstrOpInfoFlags::SHOW_NO_MEM_SIZE_FORCE_SIZE),
            MemorySizeOptions::Minimum => flags.contains(InstrOpInfoFlags::SHOW_MIN_MEM_SIZE_FORCE_SIZE),
        };
        if !show {
            return;
        }
        if let Some(far) = flags.far_mem_size().keyword() {
            self.write_keyword(output, far);
            output.write(" ", FormatterTextKind::Text);
        }
        self.write_keyword(output, keyword);
        output.write(" ", FormatterTextKind::Text);
    }

    fn write_add_operator<O: FormatterOutput + ?Sized>(&self, output: &mut O, operator: &str) {
        let spaced = self.options.space_between_memory_add_operators;
        if spaced {
            output.write(" ", FormatterTextKind::Text);
        }
        output.write(operator, FormatterTextKind::Operator);
        if spaced {
            output.write(" ", FormatterTextKind::Text);
        }
    }

    fn write_mul_operator<O: FormatterOutput + ?Sized>(&self, output: &mut O) {
        let spaced = self.options.space_between_memory_mul_operators;
        if spaced {
            output.write(" ", FormatterTextKind::Text);
        }
        output.write("*", FormatterTextKind::Operator);
        if spaced {
            output.write(" ", FormatterTextKind::Text);
        }
    }

    fn write_scale<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        operand: usize,
        source: Option<usize>,
        scale: u8,
    ) {
        let text = match scale {
            2 => "2",
            4 => "4",
            8 => "8",
            _ => "1",
        };
        output.write_number(
            instruction,
            operand,
            source,
            text,
            u64::from(scale),
            NumberKind::Int32,
            FormatterTextKind::Number,
        );
    }

    /// Writes a resolved symbol, its distance from `address` and optionally
    /// the address itself.
    fn write_symbol<O: FormatterOutput + ?Sized>(
        &self,
        instruction: &Instruction,
        output: &mut O,
        operand: usize,
        source: Option<usize>,
        address: u64,
        symbol: &SymbolResult,
    ) {
        output.write(&symbol.text, symbol.kind);

        let number_options = NumberFormattingOptions::immediate(&self.options);
        let distance = address.wrapping_sub(symbol.address) as i64;
        if distance != 0 {
            output.write(if distance < 0 { "-" } else { "+" }, FormatterTextKind::Operator);
            let magnitude = distance.unsigned_abs();
            let text = self
                .number_formatter
                .format_u64(&self.options, &number_options, magnitude, false);
            output.write_number(instruction, operand, source, &text, magnitude, NumberKind::Int64, FormatterTextKind::Number);
        }

        if self.options.show_symbol_address && !symbol.flags.contains(SymbolFlags::RELATIVE) {
            output.write(" ", FormatterTextKind::Text);
            output.write("(", FormatterTextKind::Punctuation);
            let text = self
                .number_formatter
                .format_u64(&self.options, &number_options, address, self.options.leading_zeros);
            output.write_number(instruction, operand, source, &text, address, NumberKind::UInt64, FormatterTextKind::Number);
            output.write(")", FormatterTextKind::Punctuation);
        }
    }
}

fn unsigned_kind(width: usize) -> NumberKind {
    match width {
        1 => NumberKind::UInt8,
        2 => NumberKind::UInt16,
        4 => NumberKind::UInt32,
        _ => NumberKind::UInt64,
    }
}

fn signed_kind(width: usize) -> NumberKind {
    match width {
        1 => NumberKind::Int8,
        2 => NumberKind::Int16,
        4 => NumberKind::Int32,
        _ => NumberKind::Int64,
    }
}

fn is_negative(value: u64, width: usize) -> bool {
    match width {
        1 => (value as u8 as i8) < 0,
        2 => (value as u16 as i16) < 0,
        4 => (value as u32 as i32) < 0,
        _ => (value as i64) < 0,
    }
}

/// Magnitude of a negative `width`-byte value.
fn negate(value: u64, width: usize) -> u64 {
    match width {
        1 => u64::from((value as u8 as i8).unsigned_abs()),
        2 => u64::from((value as u16 as i16).unsigned_abs()),
        4 => u64::from((value as u32 as i32).unsigned_abs()),
        _ => (value as i64).unsigned_abs(),
    }
}
