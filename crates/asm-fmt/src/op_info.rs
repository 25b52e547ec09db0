//! Live operand resolution for the NASM renderer.
//!
//! [`InstrOpInfo::new`] walks the opcode's [`OperandLayout`] once and turns
//! it into the operands that are actually printed for one instruction: the
//! implicit string pointers and a leading `st0` disappear, `{sae}`/`{er}`
//! become operands of their own, and the implicit `xmm0`/`edx, eax`
//! operands are appended. Everything the prefix and memory renderers need
//! to know about the instance is packed into [`InstrOpInfoFlags`].

use bitflags::bitflags;

use crate::code::{Code, OpCodeFlags};
use crate::index::{MemoryShape, OperandLayout, OperandShape};
use crate::instruction::{CodeSize, Instruction, RoundingControl, MAX_DECLARE_BYTES};
use crate::memory_size::MemorySize;
use crate::op_kind::{OpKind, OperandKind};
use crate::options::FormatterOptions;
use crate::quirks::OpCodeQuirks;
use crate::register::Register;

/// Most operands one instruction can render (a full `db` line).
pub const MAX_RENDERED_OPERANDS: usize = MAX_DECLARE_BYTES;

/// Kind of a rendered operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrOpKind {
    Register,
    NearBranch16,
    NearBranch32,
    NearBranch64,
    FarBranch16,
    FarBranch32,
    Immediate8,
    Immediate8_2nd,
    Immediate16,
    Immediate32,
    Immediate64,
    Immediate8to16,
    Immediate8to32,
    Immediate8to64,
    Immediate32to64,
    Memory,
    /// `{sae}`.
    Sae,
    /// `{rn-sae}`.
    RnSae,
    /// `{rd-sae}`.
    RdSae,
    /// `{ru-sae}`.
    RuSae,
    /// `{rz-sae}`.
    RzSae,
    DeclareByte,
    DeclareWord,
    DeclareDword,
    DeclareQword,
}

impl From<OpKind> for InstrOpKind {
    fn from(kind: OpKind) -> Self {
        match kind {
            OpKind::Register => InstrOpKind::Register,
            OpKind::NearBranch16 => InstrOpKind::NearBranch16,
            OpKind::NearBranch32 => InstrOpKind::NearBranch32,
            OpKind::NearBranch64 => InstrOpKind::NearBranch64,
            OpKind::FarBranch16 => InstrOpKind::FarBranch16,
            OpKind::FarBranch32 => InstrOpKind::FarBranch32,
            OpKind::Immediate8 => InstrOpKind::Immediate8,
            OpKind::Immediate8_2nd => InstrOpKind::Immediate8_2nd,
            OpKind::Immediate16 => InstrOpKind::Immediate16,
            OpKind::Immediate32 => InstrOpKind::Immediate32,
            OpKind::Immediate64 => InstrOpKind::Immediate64,
            OpKind::Immediate8to16 => InstrOpKind::Immediate8to16,
            OpKind::Immediate8to32 => InstrOpKind::Immediate8to32,
            OpKind::Immediate8to64 => InstrOpKind::Immediate8to64,
            OpKind::Immediate32to64 => InstrOpKind::Immediate32to64,
            OpKind::Memory => InstrOpKind::Memory,
        }
    }
}

// ── Packed multi-bit fields ─────────────────────────────────────────────

/// Operand-size prefix written before the mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpSize {
    #[default]
    None = 0,
    O16 = 1,
    O32 = 2,
    O64 = 3,
}

impl OpSize {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            OpSize::None => None,
            OpSize::O16 => Some("o16"),
            OpSize::O32 => Some("o32"),
            OpSize::O64 => Some("o64"),
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => OpSize::O16,
            2 => OpSize::O32,
            3 => OpSize::O64,
            _ => OpSize::None,
        }
    }
}

/// Address-size prefix written before the mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddrSize {
    #[default]
    None = 0,
    A16 = 1,
    A32 = 2,
    A64 = 3,
}

impl AddrSize {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            AddrSize::None => None,
            AddrSize::A16 => Some("a16"),
            AddrSize::A32 => Some("a32"),
            AddrSize::A64 => Some("a64"),
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => AddrSize::A16,
            2 => AddrSize::A32,
            3 => AddrSize::A64,
            _ => AddrSize::None,
        }
    }
}

/// Keywords written before a near branch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BranchSizeInfo {
    #[default]
    None = 0,
    Near = 1,
    NearWord = 2,
    NearDword = 3,
    Word = 4,
    Dword = 5,
    Short = 6,
}

impl BranchSizeInfo {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            BranchSizeInfo::None => &[],
            BranchSizeInfo::Near => &["near"],
            BranchSizeInfo::NearWord => &["near", "word"],
            BranchSizeInfo::NearDword => &["near", "dword"],
            BranchSizeInfo::Word => &["word"],
            BranchSizeInfo::Dword => &["dword"],
            BranchSizeInfo::Short => &["short"],
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => BranchSizeInfo::Near,
            2 => BranchSizeInfo::NearWord,
            3 => BranchSizeInfo::NearDword,
            4 => BranchSizeInfo::Word,
            5 => BranchSizeInfo::Dword,
            6 => BranchSizeInfo::Short,
            _ => BranchSizeInfo::None,
        }
    }
}

/// Size keyword written inside the brackets (`[dword rel 1000h]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BracketSize {
    #[default]
    None = 0,
    Word = 1,
    Dword = 2,
    Qword = 3,
}

impl BracketSize {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            BracketSize::None => None,
            BracketSize::Word => Some("word"),
            BracketSize::Dword => Some("dword"),
            BracketSize::Qword => Some("qword"),
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => BracketSize::Word,
            2 => BracketSize::Dword,
            3 => BracketSize::Qword,
            _ => BracketSize::None,
        }
    }
}

/// Width qualifier of a far memory pointer (`call word far [eax]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FarMemSize {
    #[default]
    None = 0,
    Word = 1,
    Dword = 2,
}

impl FarMemSize {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            FarMemSize::None => None,
            FarMemSize::Word => Some("word"),
            FarMemSize::Dword => Some("dword"),
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => FarMemSize::Word,
            2 => FarMemSize::Dword,
            _ => FarMemSize::None,
        }
    }
}

/// Source and destination width of a sign-extended immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignExtendInfo {
    #[default]
    None = 0,
    Sex1to2 = 1,
    Sex1to4 = 2,
    Sex1to8 = 3,
    Sex2 = 4,
    Sex4 = 5,
    Sex4to8 = 6,
}

impl SignExtendInfo {
    /// Keyword written before the immediate when the size is shown.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            SignExtendInfo::None => None,
            SignExtendInfo::Sex1to2 | SignExtendInfo::Sex1to4 | SignExtendInfo::Sex1to8 => {
                Some("byte")
            }
            SignExtendInfo::Sex2 => Some("word"),
            SignExtendInfo::Sex4 => Some("dword"),
            SignExtendInfo::Sex4to8 => Some("qword"),
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => SignExtendInfo::Sex1to2,
            2 => SignExtendInfo::Sex1to4,
            3 => SignExtendInfo::Sex1to8,
            4 => SignExtendInfo::Sex2,
            5 => SignExtendInfo::Sex4,
            6 => SignExtendInfo::Sex4to8,
            _ => SignExtendInfo::None,
        }
    }
}

const OP_SIZE_SHIFT: u32 = 0;
const OP_SIZE_MASK: u32 = 3;
const ADDR_SIZE_SHIFT: u32 = 2;
const ADDR_SIZE_MASK: u32 = 3;
const BRANCH_SIZE_SHIFT: u32 = 4;
const BRANCH_SIZE_MASK: u32 = 7;
const BRACKET_SIZE_SHIFT: u32 = 7;
const BRACKET_SIZE_MASK: u32 = 3;
const FAR_MEM_SIZE_SHIFT: u32 = 9;
const FAR_MEM_SIZE_MASK: u32 = 3;
const SIGN_EXTEND_SHIFT: u32 = 11;
const SIGN_EXTEND_MASK: u32 = 7;

bitflags! {
    /// Per-instance rendering flags.
    ///
    /// Bits 0..14 hold the multi-bit fields, read and written through the
    /// typed accessors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstrOpInfoFlags: u32 {
        /// The memory operand never gets a size keyword.
        const MEM_SIZE_NOTHING = 1 << 14;
        /// Size keyword is needed under the default policy.
        const SHOW_NO_MEM_SIZE_FORCE_SIZE = 1 << 15;
        /// Size keyword is needed even under the minimum policy.
        const SHOW_MIN_MEM_SIZE_FORCE_SIZE = 1 << 16;
        /// Mnemonic is a data directive.
        const MNEMONIC_IS_DIRECTIVE = 1 << 17;
        /// `repne` is written as `bnd`.
        const BND_PREFIX = 1 << 18;
        /// Operand 0 is preceded by `to`.
        const REGISTER_TO = 1 << 19;

        const _ = !0;
    }
}

impl InstrOpInfoFlags {
    fn field(self, shift: u32, mask: u32) -> u32 {
        (self.bits() >> shift) & mask
    }

    fn with_field(self, shift: u32, mask: u32, value: u32) -> Self {
        let bits = (self.bits() & !(mask << shift)) | ((value & mask) << shift);
        InstrOpInfoFlags::from_bits_retain(bits)
    }

    pub fn op_size(self) -> OpSize {
        OpSize::from_bits(self.field(OP_SIZE_SHIFT, OP_SIZE_MASK))
    }

    pub fn with_op_size(self, value: OpSize) -> Self {
        self.with_field(OP_SIZE_SHIFT, OP_SIZE_MASK, value as u32)
    }

    pub fn addr_size(self) -> AddrSize {
        AddrSize::from_bits(self.field(ADDR_SIZE_SHIFT, ADDR_SIZE_MASK))
    }

    pub fn with_addr_size(self, value: AddrSize) -> Self {
        self.with_field(ADDR_SIZE_SHIFT, ADDR_SIZE_MASK, value as u32)
    }

    pub fn branch_size(self) -> BranchSizeInfo {
        BranchSizeInfo::from_bits(self.field(BRANCH_SIZE_SHIFT, BRANCH_SIZE_MASK))
    }

    pub fn with_branch_size(self, value: BranchSizeInfo) -> Self {
        self.with_field(BRANCH_SIZE_SHIFT, BRANCH_SIZE_MASK, value as u32)
    }

    pub fn bracket_size(self) -> BracketSize {
        BracketSize::from_bits(self.field(BRACKET_SIZE_SHIFT, BRACKET_SIZE_MASK))
    }

    pub fn with_bracket_size(self, value: BracketSize) -> Self {
        self.with_field(BRACKET_SIZE_SHIFT, BRACKET_SIZE_MASK, value as u32)
    }

    pub fn far_mem_size(self) -> FarMemSize {
        FarMemSize::from_bits(self.field(FAR_MEM_SIZE_SHIFT, FAR_MEM_SIZE_MASK))
    }

    pub fn with_far_mem_size(self, value: FarMemSize) -> Self {
        self.with_field(FAR_MEM_SIZE_SHIFT, FAR_MEM_SIZE_MASK, value as u32)
    }

    pub fn sign_extend(self) -> SignExtendInfo {
        SignExtendInfo::from_bits(self.field(SIGN_EXTEND_SHIFT, SIGN_EXTEND_MASK))
    }

    pub fn with_sign_extend(self, value: SignExtendInfo) -> Self {
        self.with_field(SIGN_EXTEND_SHIFT, SIGN_EXTEND_MASK, value as u32)
    }
}

/// One rendered operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstrOperand {
    pub kind: InstrOpKind,
    /// Register for [`InstrOpKind::Register`] operands.
    pub register: Option<Register>,
    /// Instruction operand (or declare value) this came from. `None` for
    /// operands the formatter adds.
    pub instruction_operand: Option<usize>,
}

impl InstrOperand {
    const EMPTY: InstrOperand = InstrOperand {
        kind: InstrOpKind::Register,
        register: None,
        instruction_operand: None,
    };
}

/// What the NASM renderer prints for one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrOpInfo {
    mnemonic: &'static str,
    flags: InstrOpInfoFlags,
    memory_size: MemorySize,
    op_count: usize,
    operands: [InstrOperand; MAX_RENDERED_OPERANDS],
}

impl InstrOpInfo {
    pub fn new(options: &FormatterOptions, instruction: &Instruction) -> Self {
        let code = instruction.code();
        let info = code.op_code();
        let mut op_info = InstrOpInfo {
            mnemonic: info.mnemonic(),
            flags: InstrOpInfoFlags::empty(),
            memory_size: if instruction.is_broadcast() {
                info.broadcast_memory_size()
            } else {
                info.memory_size()
            },
            op_count: 0,
            operands: [InstrOperand::EMPTY; MAX_RENDERED_OPERANDS],
        };

        if info.flags().contains(OpCodeFlags::DIRECTIVE) {
            op_info.flags |= InstrOpInfoFlags::MNEMONIC_IS_DIRECTIVE;
            let kind = match code {
                Code::DeclareByte => InstrOpKind::DeclareByte,
                Code::DeclareWord => InstrOpKind::DeclareWord,
                Code::DeclareDword => InstrOpKind::DeclareDword,
                _ => InstrOpKind::DeclareQword,
            };
            for i in 0..instruction.declare_data_len() {
                op_info.push(kind, None, Some(i));
            }
            return op_info;
        }

        let layout = OperandLayout::new(code);
        let quirks = layout.quirks();
        let start = if quirks.contains(OpCodeQuirks::START_AT_OP1) && !options.prefer_st0 {
            1
        } else {
            0
        };
        let end = if quirks.contains(OpCodeQuirks::REGISTER_TO) {
            op_info.flags |= InstrOpInfoFlags::REGISTER_TO;
            layout.end().min(1)
        } else {
            layout.end()
        };
        let sae_er = sae_er_kind(instruction, quirks);

        let mut state = layout.initial_state();
        for operand in 0..end {
            let shape = layout.shape(operand, &mut state);
            if operand < start {
                continue;
            }
            match shape {
                OperandShape::StringPointer => {}
                OperandShape::Memory(MemoryShape::Vsib { .. } | MemoryShape::Mib | MemoryShape::Sibmem) => {
                    op_info.flags |= InstrOpInfoFlags::MEM_SIZE_NOTHING;
                    op_info.push(InstrOpKind::Memory, None, Some(operand));
                }
                _ => {
                    let kind = InstrOpKind::from(instruction.op_kind(operand));
                    let register = instruction.op_register(operand);
                    op_info.push(kind, register, Some(operand));
                }
            }
            if let (Some(kind), Some(at)) = (sae_er, layout.sae_er_index()) {
                if at == operand {
                    op_info.push(kind, None, None);
                }
            }
        }

        if quirks.contains(OpCodeQuirks::APPEND_XMM0) {
            op_info.push(InstrOpKind::Register, Some(Register::Xmm0), None);
        }
        if quirks.contains(OpCodeQuirks::APPEND_EDX_EAX) {
            op_info.push(InstrOpKind::Register, Some(Register::Edx), None);
            op_info.push(InstrOpKind::Register, Some(Register::Eax), None);
        }

        op_info.flags = op_info.flags.with_op_size(op_size(instruction));
        op_info.flags = op_info.flags.with_addr_size(addr_size(instruction));
        op_info.flags = op_info.flags.with_branch_size(branch_size(instruction));
        op_info.flags = op_info.flags.with_far_mem_size(far_mem_size(instruction));
        op_info.flags = op_info.flags.with_sign_extend(sign_extend(instruction));
        if instruction.has_repne_prefix() && info.is_branch() {
            op_info.flags |= InstrOpInfoFlags::BND_PREFIX;
        }
        op_info.flags |= op_info.force_flags(instruction);
        op_info
    }

    fn push(&mut self, kind: InstrOpKind, register: Option<Register>, instruction_operand: Option<usize>) {
        if let Some(slot) = self.operands.get_mut(self.op_count) {
            *slot = InstrOperand {
                kind,
                register,
                instruction_operand,
            };
            self.op_count += 1;
        }
    }

    /// Size-keyword force bits for the memory operand, if one is rendered.
    fn force_flags(&self, instruction: &Instruction) -> InstrOpInfoFlags {
        if self.flags.contains(InstrOpInfoFlags::MEM_SIZE_NOTHING) {
            return InstrOpInfoFlags::empty();
        }
        if !self.operands().iter().any(|op| op.kind == InstrOpKind::Memory) {
            return InstrOpInfoFlags::empty();
        }
        let size = self.memory_size;
        if size.info().keyword.is_none() {
            return InstrOpInfoFlags::MEM_SIZE_NOTHING;
        }
        if size.is_broadcast() {
            return InstrOpInfoFlags::empty();
        }
        if matches!(size, MemorySize::SegPtr16 | MemorySize::SegPtr32 | MemorySize::SegPtr64)
            && !instruction.code().op_code().is_branch()
        {
            return InstrOpInfoFlags::MEM_SIZE_NOTHING;
        }

        let registers = self.operands().iter().filter_map(|op| op.register);
        let mut any_register = false;
        let mut same_size = false;
        let mut other_gpr = false;
        for register in registers {
            any_register = true;
            if register.size() == size.size() {
                same_size = true;
            } else if register.is_gpr() {
                other_gpr = true;
            }
        }

        let mut flags = InstrOpInfoFlags::empty();
        if !same_size {
            flags |= InstrOpInfoFlags::SHOW_NO_MEM_SIZE_FORCE_SIZE;
            if !any_register || other_gpr {
                flags |= InstrOpInfoFlags::SHOW_MIN_MEM_SIZE_FORCE_SIZE;
            }
        }
        flags
    }

    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    pub fn flags(&self) -> InstrOpInfoFlags {
        self.flags
    }

    /// Size of the rendered memory operand (the element size when broadcast).
    pub fn memory_size(&self) -> MemorySize {
        self.memory_size
    }

    pub fn op_count(&self) -> usize {
        self.op_count
    }

    pub fn operands(&self) -> &[InstrOperand] {
        &self.operands[..self.op_count]
    }

    /// Rendered operand `operand`.
    ///
    /// # Panics
    ///
    /// Panics if `operand >= self.op_count()`.
    pub fn operand(&self, operand: usize) -> &InstrOperand {
        match self.operands().get(operand) {
            Some(op) => op,
            None => panic!(
                "operand {} out of range (count {})",
                operand, self.op_count
            ),
        }
    }
}

/// Extra `{sae}`/`{er}` operand. Rounding implies sae and wins.
fn sae_er_kind(instruction: &Instruction, quirks: OpCodeQuirks) -> Option<InstrOpKind> {
    let rounding = match instruction.rounding_control() {
        RoundingControl::None => None,
        RoundingControl::RoundToNearest => Some(InstrOpKind::RnSae),
        RoundingControl::RoundDown => Some(InstrOpKind::RdSae),
        RoundingControl::RoundUp => Some(InstrOpKind::RuSae),
        RoundingControl::RoundTowardZero => Some(InstrOpKind::RzSae),
    };
    match rounding {
        Some(_) if quirks.contains(OpCodeQuirks::NO_ER_DECORATOR) => None,
        Some(kind) => Some(kind),
        None if instruction.suppress_all_exceptions() => Some(InstrOpKind::Sae),
        None => None,
    }
}

fn op_size(instruction: &Instruction) -> OpSize {
    let flags = instruction.code().op_code().flags();
    let code16 = instruction.code_size() == CodeSize::Code16;
    if flags.contains(OpCodeFlags::OP_SIZE_16) && !code16 {
        OpSize::O16
    } else if flags.contains(OpCodeFlags::OP_SIZE_32) && code16 {
        OpSize::O32
    } else if flags.contains(OpCodeFlags::OP_SIZE_64) {
        OpSize::O64
    } else {
        OpSize::None
    }
}

/// `a16`/`a32`/`a64` on string instructions whose pointer width differs
/// from the code size. Other instructions show it through their registers.
fn addr_size(instruction: &Instruction) -> AddrSize {
    let kinds = instruction.code().op_code().op_kinds();
    if !kinds.iter().any(|kind| kind.is_string_pointer()) {
        return AddrSize::None;
    }
    let size = instruction.address_size();
    if size == instruction.code_size().address_size() {
        return AddrSize::None;
    }
    match size {
        2 => AddrSize::A16,
        4 => AddrSize::A32,
        _ => AddrSize::A64,
    }
}

fn branch_size(instruction: &Instruction) -> BranchSizeInfo {
    let info = instruction.code().op_code();
    let Some(&kind) = info.op_kinds().first() else {
        return BranchSizeInfo::None;
    };
    let code16 = instruction.code_size() == CodeSize::Code16;
    let cond = info.flags().contains(OpCodeFlags::COND_JUMP);
    match kind {
        OperandKind::Br16_1 | OperandKind::Br32_1 | OperandKind::Br64_1 => BranchSizeInfo::Short,
        OperandKind::Br16_2 if code16 => {
            if cond {
                BranchSizeInfo::Near
            } else {
                BranchSizeInfo::None
            }
        }
        OperandKind::Br16_2 if info.is_call() => BranchSizeInfo::Word,
        OperandKind::Br16_2 => BranchSizeInfo::NearWord,
        OperandKind::Br32_4 if code16 => {
            if info.is_call() {
                BranchSizeInfo::Dword
            } else {
                BranchSizeInfo::NearDword
            }
        }
        OperandKind::Br32_4 | OperandKind::Br64_4 if cond => BranchSizeInfo::Near,
        OperandKind::Xbegin2 if !code16 => BranchSizeInfo::Word,
        OperandKind::Xbegin4 if code16 => BranchSizeInfo::Dword,
        _ => BranchSizeInfo::None,
    }
}

fn far_mem_size(instruction: &Instruction) -> FarMemSize {
    let info = instruction.code().op_code();
    if !info.is_branch() || !instruction.has_memory_operand() {
        return FarMemSize::None;
    }
    let code16 = instruction.code_size() == CodeSize::Code16;
    match info.memory_size() {
        MemorySize::SegPtr16 if !code16 => FarMemSize::Word,
        MemorySize::SegPtr32 if code16 => FarMemSize::Dword,
        _ => FarMemSize::None,
    }
}

fn sign_extend(instruction: &Instruction) -> SignExtendInfo {
    let kinds = instruction.code().op_code().op_kinds();
    kinds
        .iter()
        .find_map(|kind| match kind {
            OperandKind::Imm8Sex16 => Some(SignExtendInfo::Sex1to2),
            OperandKind::Imm8Sex32 => Some(SignExtendInfo::Sex1to4),
            OperandKind::Imm8Sex64 => Some(SignExtendInfo::Sex1to8),
            OperandKind::Imm32Sex64 => Some(SignExtendInfo::Sex4to8),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{MemoryOperand, PrefixFlags};
    use alloc::vec::Vec;

    fn build(instruction: &Instruction) -> InstrOpInfo {
        InstrOpInfo::new(&FormatterOptions::default(), instruction)
    }

    fn kinds(op_info: &InstrOpInfo) -> Vec<InstrOpKind> {
        op_info.operands().iter().map(|op| op.kind).collect()
    }

    #[test]
    fn packed_fields_are_independent() {
        let flags = InstrOpInfoFlags::empty()
            .with_op_size(OpSize::O64)
            .with_branch_size(BranchSizeInfo::Short)
            .with_sign_extend(SignExtendInfo::Sex4to8)
            .with_far_mem_size(FarMemSize::Dword)
            | InstrOpInfoFlags::BND_PREFIX;
        assert_eq!(flags.op_size(), OpSize::O64);
        assert_eq!(flags.addr_size(), AddrSize::None);
        assert_eq!(flags.branch_size(), BranchSizeInfo::Short);
        assert_eq!(flags.sign_extend(), SignExtendInfo::Sex4to8);
        assert_eq!(flags.far_mem_size(), FarMemSize::Dword);
        assert!(flags.contains(InstrOpInfoFlags::BND_PREFIX));

        let flags = flags.with_op_size(OpSize::None).with_bracket_size(BracketSize::Dword);
        assert_eq!(flags.op_size(), OpSize::None);
        assert_eq!(flags.bracket_size(), BracketSize::Dword);
        assert_eq!(flags.branch_size(), BranchSizeInfo::Short);
    }

    #[test]
    fn plain_operands_map_one_to_one() {
        let op_info = build(&Instruction::new(Code::Add_rm32_imm8));
        assert_eq!(op_info.mnemonic(), "add");
        assert_eq!(kinds(&op_info), [InstrOpKind::Register, InstrOpKind::Immediate8to32]);
        assert_eq!(op_info.operand(0).register, Some(Register::Eax));
        assert_eq!(op_info.operand(1).instruction_operand, Some(1));
        assert_eq!(op_info.flags().sign_extend(), SignExtendInfo::Sex1to4);
    }

    #[test]
    fn string_pointers_are_dropped() {
        assert_eq!(build(&Instruction::new(Code::Movsb_m8_m8)).op_count(), 0);
        let op_info = build(&Instruction::new(Code::Maskmovq_rDI_mm_mm));
        assert_eq!(op_info.op_count(), 2);
        assert_eq!(op_info.operand(0).instruction_operand, Some(1));
    }

    #[test]
    fn st0_is_dropped_unless_preferred() {
        let instr = Instruction::new(Code::Fcom_st0_sti).with_register(1, Register::St3).unwrap();
        let op_info = build(&instr);
        assert_eq!(op_info.op_count(), 1);
        assert_eq!(op_info.operand(0).register, Some(Register::St3));

        let mut options = FormatterOptions::default();
        options.prefer_st0 = true;
        assert_eq!(InstrOpInfo::new(&options, &instr).op_count(), 2);
    }

    #[test]
    fn register_to_keeps_destination_only() {
        let op_info = build(&Instruction::new(Code::Fadd_sti_st0));
        assert_eq!(op_info.op_count(), 1);
        assert!(op_info.flags().contains(InstrOpInfoFlags::REGISTER_TO));
    }

    #[test]
    fn augmentations_have_no_source_operand() {
        let op_info = build(&Instruction::new(Code::Blendvps_xmm_xmmm128));
        assert_eq!(op_info.op_count(), 3);
        assert_eq!(op_info.operand(2).register, Some(Register::Xmm0));
        assert_eq!(op_info.operand(2).instruction_operand, None);

        let op_info = build(&Instruction::new(Code::Tpause_r32));
        let registers: Vec<_> = op_info.operands().iter().map(|op| op.register).collect();
        assert_eq!(registers, [Some(Register::Eax), Some(Register::Edx), Some(Register::Eax)]);
    }

    #[test]
    fn sae_goes_before_trailing_imm8() {
        let instr = Instruction::new(Code::EVEX_Vcmpps_kr_k1_zmm_zmmm512b32_imm8_sae)
            .with_suppress_all_exceptions(true)
            .unwrap();
        assert_eq!(
            kinds(&build(&instr)),
            [
                InstrOpKind::Register,
                InstrOpKind::Register,
                InstrOpKind::Register,
                InstrOpKind::Sae,
                InstrOpKind::Immediate8,
            ]
        );
    }

    #[test]
    fn rounding_wins_unless_suppressed() {
        let instr = Instruction::new(Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er)
            .with_rounding_control(RoundingControl::RoundDown)
            .unwrap();
        assert_eq!(kinds(&build(&instr)).last(), Some(&InstrOpKind::RdSae));

        let instr = Instruction::new(Code::EVEX_Vcvtsi2sd_xmm_xmm_rm32_er)
            .with_rounding_control(RoundingControl::RoundUp)
            .unwrap();
        assert_eq!(build(&instr).op_count(), 3);
    }

    #[test]
    fn branch_keywords() {
        let short = Instruction::new(Code::Jmp_rel8_64);
        assert_eq!(build(&short).flags().branch_size(), BranchSizeInfo::Short);
        let near_jcc = Instruction::new(Code::Je_rel32_64);
        assert_eq!(build(&near_jcc).flags().branch_size(), BranchSizeInfo::Near);
        let jmp = Instruction::new(Code::Jmp_rel32_64);
        assert_eq!(build(&jmp).flags().branch_size(), BranchSizeInfo::None);
        let call16 = Instruction::new(Code::Call_rel16);
        assert_eq!(build(&call16).flags().branch_size(), BranchSizeInfo::Word);
        let jmp32 = Instruction::new(Code::Jmp_rel32_32).with_code_size(CodeSize::Code16);
        assert_eq!(build(&jmp32).flags().branch_size(), BranchSizeInfo::NearDword);
    }

    #[test]
    fn op_size_follows_code_size() {
        assert_eq!(build(&Instruction::new(Code::Retfw)).flags().op_size(), OpSize::O16);
        let retfd = Instruction::new(Code::Retfd);
        assert_eq!(build(&retfd).flags().op_size(), OpSize::None);
        let retfd16 = retfd.with_code_size(CodeSize::Code16);
        assert_eq!(build(&retfd16).flags().op_size(), OpSize::O32);
        assert_eq!(build(&Instruction::new(Code::Retfq)).flags().op_size(), OpSize::O64);
    }

    #[test]
    fn string_address_size() {
        let instr = Instruction::new(Code::Movsb_m8_m8)
            .with_memory(1, MemoryOperand::base(Register::Esi))
            .unwrap();
        assert_eq!(build(&instr).flags().addr_size(), AddrSize::A32);
        assert_eq!(build(&Instruction::new(Code::Movsb_m8_m8)).flags().addr_size(), AddrSize::None);
    }

    #[test]
    fn memory_size_forcing() {
        let lone = Instruction::new(Code::Push_rm64)
            .with_memory(0, MemoryOperand::base(Register::Rax))
            .unwrap();
        let flags = build(&lone).flags();
        assert!(flags.contains(InstrOpInfoFlags::SHOW_NO_MEM_SIZE_FORCE_SIZE));
        assert!(flags.contains(InstrOpInfoFlags::SHOW_MIN_MEM_SIZE_FORCE_SIZE));

        let same = Instruction::new(Code::Add_rm32_r32)
            .with_memory(0, MemoryOperand::base(Register::Rax))
            .unwrap();
        assert!(!build(&same).flags().contains(InstrOpInfoFlags::SHOW_NO_MEM_SIZE_FORCE_SIZE));

        let movzx = Instruction::new(Code::Movzx_r32_rm8)
            .with_memory(1, MemoryOperand::base(Register::Rax))
            .unwrap();
        assert!(build(&movzx).flags().contains(InstrOpInfoFlags::SHOW_MIN_MEM_SIZE_FORCE_SIZE));

        let lea = Instruction::new(Code::Lea_r64_m);
        assert!(!build(&lea).flags().contains(InstrOpInfoFlags::SHOW_NO_MEM_SIZE_FORCE_SIZE));
    }

    #[test]
    fn broadcast_is_never_forced() {
        let instr = Instruction::new(Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er)
            .with_memory(2, MemoryOperand::base(Register::Rax))
            .unwrap()
            .with_broadcast(true)
            .unwrap();
        let op_info = build(&instr);
        assert_eq!(op_info.memory_size(), MemorySize::Broadcast512_Float32);
        assert!(!op_info.flags().contains(InstrOpInfoFlags::SHOW_NO_MEM_SIZE_FORCE_SIZE));
    }

    #[test]
    fn vsib_has_no_size() {
        let op_info = build(&Instruction::new(Code::EVEX_Vgatherdps_zmm_k1_vm32z));
        assert!(op_info.flags().contains(InstrOpInfoFlags::MEM_SIZE_NOTHING));
    }

    #[test]
    fn far_memory_qualifier() {
        let call = Instruction::new(Code::Call_m1616);
        assert_eq!(build(&call).flags().far_mem_size(), FarMemSize::Word);
        let les = Instruction::new(Code::Les_r32_m1632);
        assert!(build(&les).flags().contains(InstrOpInfoFlags::MEM_SIZE_NOTHING));
    }

    #[test]
    fn declarations_render_values() {
        let instr = Instruction::declare_words(&[1, 2, 3]).unwrap();
        let op_info = build(&instr);
        assert_eq!(op_info.mnemonic(), "dw");
        assert!(op_info.flags().contains(InstrOpInfoFlags::MNEMONIC_IS_DIRECTIVE));
        assert_eq!(kinds(&op_info), [InstrOpKind::DeclareWord; 3]);
        assert_eq!(op_info.operand(2).instruction_operand, Some(2));
    }

    #[test]
    fn bnd_on_branches() {
        let instr = Instruction::new(Code::Jmp_rel32_64).with_prefixes(PrefixFlags::REPNE);
        assert!(build(&instr).flags().contains(InstrOpInfoFlags::BND_PREFIX));
        let instr = Instruction::new(Code::Cmpsb_m8_m8).with_prefixes(PrefixFlags::REPNE);
        assert!(!build(&instr).flags().contains(InstrOpInfoFlags::BND_PREFIX));
    }
}
