//! A concrete instruction: opcode plus operand values.
//!
//! [`Instruction::new`] fills every operand with a valid default (the first
//! register of its class, a zero immediate, an empty memory operand), so any
//! instruction value can be rendered. The `with_*` builders validate each
//! value against the opcode's operand kinds and return a
//! [`FormatterError`] when it does not fit.

use bitflags::bitflags;

use crate::code::Code;
use crate::error::{FormatterError, OperandCategory};
use crate::op_kind::{OpKind, OperandKind};
use crate::output::DecoratorKind;
use crate::register::{Register, RegisterClass};

/// Most operands an opcode declares.
pub const MAX_OP_COUNT: usize = 5;

/// Capacity of a data declaration, in bytes.
pub const MAX_DECLARE_BYTES: usize = 16;

/// Bitness of the code an instruction was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodeSize {
    /// Treated as 64-bit.
    Unknown,
    Code16,
    Code32,
    #[default]
    Code64,
}

impl CodeSize {
    /// Default address and operand width in bytes.
    pub fn address_size(self) -> usize {
        match self {
            CodeSize::Code16 => 2,
            CodeSize::Code32 => 4,
            CodeSize::Code64 | CodeSize::Unknown => 8,
        }
    }
}

/// Static rounding mode of an EVEX instruction (`{rn-sae}` …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundingControl {
    #[default]
    None,
    RoundToNearest,
    RoundDown,
    RoundUp,
    RoundTowardZero,
}

bitflags! {
    /// Legacy prefixes present on the instruction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PrefixFlags: u8 {
        const LOCK = 1 << 0;
        /// `F3`: `rep` / `repe`.
        const REPE = 1 << 1;
        /// `F2`: `repne`, or `bnd` on branches.
        const REPNE = 1 << 2;
        const XACQUIRE = 1 << 3;
        const XRELEASE = 1 << 4;
    }
}

/// Address of the instruction's memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryOperand {
    pub base: Option<Register>,
    pub index: Option<Register>,
    /// 1, 2, 4 or 8.
    pub scale: u8,
    pub displacement: i64,
    /// Encoded displacement width in bytes (0 when there is none).
    pub displacement_size: u8,
}

impl Default for MemoryOperand {
    fn default() -> Self {
        MemoryOperand {
            base: None,
            index: None,
            scale: 1,
            displacement: 0,
            displacement_size: 0,
        }
    }
}

impl MemoryOperand {
    /// `[base]`.
    pub fn base(base: Register) -> Self {
        MemoryOperand {
            base: Some(base),
            ..MemoryOperand::default()
        }
    }

    /// `[address]` with no base or index.
    pub fn absolute(address: u64, displacement_size: u8) -> Self {
        MemoryOperand {
            displacement: address as i64,
            displacement_size,
            ..MemoryOperand::default()
        }
    }

    pub fn with_index(mut self, index: Register, scale: u8) -> Self {
        self.index = Some(index);
        self.scale = scale;
        self
    }

    pub fn with_displacement(mut self, displacement: i64, displacement_size: u8) -> Self {
        self.displacement = displacement;
        self.displacement_size = displacement_size;
        self
    }
}

/// Value held by one operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandValue {
    /// Slot beyond the opcode's operand count.
    #[default]
    None,
    Register(Register),
    /// Immediate, already truncated or sign-extended to its kind.
    Immediate(u64),
    /// Absolute near branch target.
    NearBranch(u64),
    FarBranch { selector: u16, offset: u32 },
    /// The instruction's [`MemoryOperand`].
    Memory,
}

/// A concrete instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    code: Code,
    code_size: CodeSize,
    ip: u64,
    len: u8,
    operands: [OperandValue; MAX_OP_COUNT],
    memory: MemoryOperand,
    segment_prefix: Option<Register>,
    prefixes: PrefixFlags,
    op_mask: Option<Register>,
    zeroing_masking: bool,
    broadcast: bool,
    rounding_control: RoundingControl,
    suppress_all_exceptions: bool,
    declare_data: [u8; MAX_DECLARE_BYTES],
    declare_len: u8,
}

impl Instruction {
    /// A 64-bit instruction at IP 0 with every operand set to its default.
    pub fn new(code: Code) -> Self {
        let mut operands = [OperandValue::None; MAX_OP_COUNT];
        for (slot, &kind) in operands.iter_mut().zip(code.op_code().op_kinds()) {
            *slot = default_value(kind);
        }
        Instruction {
            code,
            code_size: CodeSize::default(),
            ip: 0,
            len: 0,
            operands,
            memory: MemoryOperand::default(),
            segment_prefix: None,
            prefixes: PrefixFlags::empty(),
            op_mask: None,
            zeroing_masking: false,
            broadcast: false,
            rounding_control: RoundingControl::None,
            suppress_all_exceptions: false,
            declare_data: [0; MAX_DECLARE_BYTES],
            declare_len: 0,
        }
    }

    // ── Data declarations ──────────────────────────────────────────────

    /// `db` with up to 16 values.
    pub fn declare_bytes(values: &[u8]) -> Result<Self, FormatterError> {
        Self::declare(Code::DeclareByte, 1, values.iter().map(|&v| u64::from(v)), values.len())
    }

    /// `dw` with up to 8 values.
    pub fn declare_words(values: &[u16]) -> Result<Self, FormatterError> {
        Self::declare(Code::DeclareWord, 2, values.iter().map(|&v| u64::from(v)), values.len())
    }

    /// `dd` with up to 4 values.
    pub fn declare_dwords(values: &[u32]) -> Result<Self, FormatterError> {
        Self::declare(Code::DeclareDword, 4, values.iter().map(|&v| u64::from(v)), values.len())
    }

    /// `dq` with up to 2 values.
    pub fn declare_qwords(values: &[u64]) -> Result<Self, FormatterError> {
        Self::declare(Code::DeclareQword, 8, values.iter().copied(), values.len())
    }

    fn declare(
        code: Code,
        element_size: usize,
        values: impl Iterator<Item = u64>,
        count: usize,
    ) -> Result<Self, FormatterError> {
        let max = MAX_DECLARE_BYTES / element_size;
        if count > max {
            return Err(FormatterError::TooManyDeclareValues { max, got: count });
        }
        let mut instruction = Instruction::new(code);
        for (i, value) in values.enumerate() {
            let bytes = value.to_le_bytes();
            instruction.declare_data[i * element_size..(i + 1) * element_size]
                .copy_from_slice(&bytes[..element_size]);
        }
        instruction.declare_len = count as u8;
        Ok(instruction)
    }

    /// Element width of a data declaration, 0 for instructions.
    fn declare_element_size(&self) -> usize {
        match self.code {
            Code::DeclareByte => 1,
            Code::DeclareWord => 2,
            Code::DeclareDword => 4,
            Code::DeclareQword => 8,
            _ => 0,
        }
    }

    /// Number of values in a data declaration.
    pub fn declare_data_len(&self) -> usize {
        usize::from(self.declare_len)
    }

    /// Value `index` of a data declaration, zero-extended.
    ///
    /// # Panics
    ///
    /// Panics if the instruction is not a declaration or `index` is out of range.
    pub fn declare_value(&self, index: usize) -> u64 {
        let size = self.declare_element_size();
        assert!(
            size != 0 && index < self.declare_data_len(),
            "{:?}: declare value {} out of range (count {})",
            self.code,
            index,
            self.declare_len
        );
        let mut bytes = [0u8; 8];
        bytes[..size].copy_from_slice(&self.declare_data[index * size..(index + 1) * size]);
        u64::from_le_bytes(bytes)
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn code_size(&self) -> CodeSize {
        self.code_size
    }

    pub fn ip(&self) -> u64 {
        self.ip
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the next instruction, the base of RIP-relative operands.
    pub fn next_ip(&self) -> u64 {
        self.ip.wrapping_add(u64::from(self.len))
    }

    /// Number of operands: the opcode's declared count, or the value count of
    /// a data declaration.
    pub fn op_count(&self) -> usize {
        if self.declare_element_size() != 0 {
            self.declare_data_len()
        } else {
            self.code.op_code().op_count()
        }
    }

    /// Static kind of operand `operand`.
    ///
    /// # Panics
    ///
    /// Panics if `operand` is out of range.
    pub fn operand_kind(&self, operand: usize) -> OperandKind {
        self.code.op_code().op_kind(operand)
    }

    /// Value held by operand `operand`.
    ///
    /// # Panics
    ///
    /// Panics if `operand` is out of range.
    pub fn operand(&self, operand: usize) -> OperandValue {
        let count = self.code.op_code().op_count();
        match self.operands.get(operand) {
            Some(value) if operand < count => *value,
            _ => panic!(
                "{:?}: operand {} out of range (count {})",
                self.code, operand, count
            ),
        }
    }

    /// Live kind of operand `operand`.
    ///
    /// # Panics
    ///
    /// Panics if `operand` is out of range.
    pub fn op_kind(&self, operand: usize) -> OpKind {
        let kind = self.operand_kind(operand);
        match self.operand(operand) {
            OperandValue::Register(_) | OperandValue::None => OpKind::Register,
            OperandValue::Memory => OpKind::Memory,
            OperandValue::FarBranch { .. } => {
                if kind == OperandKind::FarBr4_2 {
                    OpKind::FarBranch32
                } else {
                    OpKind::FarBranch16
                }
            }
            OperandValue::NearBranch(_) => match self.near_branch_width(kind) {
                2 => OpKind::NearBranch16,
                4 => OpKind::NearBranch32,
                _ => OpKind::NearBranch64,
            },
            OperandValue::Immediate(_) => match kind {
                OperandKind::Imm8Sex16 => OpKind::Immediate8to16,
                OperandKind::Imm8Sex32 => OpKind::Immediate8to32,
                OperandKind::Imm8Sex64 => OpKind::Immediate8to64,
                OperandKind::Imm16 => OpKind::Immediate16,
                OperandKind::Imm32 => OpKind::Immediate32,
                OperandKind::Imm32Sex64 => OpKind::Immediate32to64,
                OperandKind::Imm64 => OpKind::Immediate64,
                _ if self.is_second_imm8(operand) => OpKind::Immediate8_2nd,
                _ => OpKind::Immediate8,
            },
        }
    }

    /// Whether operand `operand` is the second of two immediates (`enter imm16, imm8`).
    fn is_second_imm8(&self, operand: usize) -> bool {
        let kinds = self.code.op_code().op_kinds();
        operand > 0
            && kinds[operand] == OperandKind::Imm8
            && matches!(kinds[operand - 1], OperandKind::Imm8 | OperandKind::Imm16)
    }

    /// Width in bytes of the near branch target of a branch kind.
    pub(crate) fn near_branch_width(&self, kind: OperandKind) -> usize {
        match kind {
            OperandKind::Br16_1 | OperandKind::Br16_2 | OperandKind::BrDisp2 => 2,
            OperandKind::Br32_1 | OperandKind::Br32_4 | OperandKind::BrDisp4 => 4,
            OperandKind::Xbegin2 | OperandKind::Xbegin4 => self.code_size.address_size(),
            _ => 8,
        }
    }

    /// Register held by operand `operand`, if it holds one.
    pub fn op_register(&self, operand: usize) -> Option<Register> {
        match self.operand(operand) {
            OperandValue::Register(register) => Some(register),
            _ => None,
        }
    }

    /// Immediate held by operand `operand`.
    ///
    /// # Panics
    ///
    /// Panics if the operand is not an immediate.
    pub fn immediate(&self, operand: usize) -> u64 {
        match self.operand(operand) {
            OperandValue::Immediate(value) => value,
            other => panic!(
                "{:?}: operand {} is not an immediate ({:?})",
                self.code, operand, other
            ),
        }
    }

    /// Near branch target held by operand `operand`.
    ///
    /// # Panics
    ///
    /// Panics if the operand is not a near branch.
    pub fn near_branch_target(&self, operand: usize) -> u64 {
        match self.operand(operand) {
            OperandValue::NearBranch(target) => target,
            other => panic!(
                "{:?}: operand {} is not a near branch ({:?})",
                self.code, operand, other
            ),
        }
    }

    /// `(selector, offset)` of a far branch operand.
    ///
    /// # Panics
    ///
    /// Panics if the operand is not a far branch.
    pub fn far_branch(&self, operand: usize) -> (u16, u32) {
        match self.operand(operand) {
            OperandValue::FarBranch { selector, offset } => (selector, offset),
            other => panic!(
                "{:?}: operand {} is not a far branch ({:?})",
                self.code, operand, other
            ),
        }
    }

    pub fn memory(&self) -> &MemoryOperand {
        &self.memory
    }

    /// Whether any operand is the memory operand.
    pub fn has_memory_operand(&self) -> bool {
        self.operands.contains(&OperandValue::Memory)
    }

    pub fn segment_prefix(&self) -> Option<Register> {
        self.segment_prefix
    }

    /// Segment the memory operand is read through: the override, or the
    /// base register's default.
    pub fn memory_segment(&self) -> Register {
        match (self.segment_prefix, self.memory.base) {
            (Some(segment), _) => segment,
            (None, Some(base)) => base.default_segment(),
            (None, None) => Register::Ds,
        }
    }

    /// Address width of the memory operand in bytes.
    ///
    /// Taken from the base register, then a general-purpose index register,
    /// then a 2, 4 or 8 byte displacement, and finally the code size.
    pub fn address_size(&self) -> usize {
        if let Some(base) = self.memory.base {
            return base.size();
        }
        if let Some(index) = self.memory.index.filter(|index| index.is_gpr()) {
            return index.size();
        }
        match self.memory.displacement_size {
            8 | 4 | 2 => usize::from(self.memory.displacement_size),
            _ => self.code_size.address_size(),
        }
    }

    pub fn prefixes(&self) -> PrefixFlags {
        self.prefixes
    }

    pub fn has_lock_prefix(&self) -> bool {
        self.prefixes.contains(PrefixFlags::LOCK)
    }

    pub fn has_repe_prefix(&self) -> bool {
        self.prefixes.contains(PrefixFlags::REPE)
    }

    pub fn has_repne_prefix(&self) -> bool {
        self.prefixes.contains(PrefixFlags::REPNE)
    }

    /// Write mask on operand 0, `None` when unmasked.
    pub fn op_mask(&self) -> Option<Register> {
        self.op_mask
    }

    pub fn zeroing_masking(&self) -> bool {
        self.zeroing_masking
    }

    /// Whether the memory operand is a `{1toN}` broadcast.
    pub fn is_broadcast(&self) -> bool {
        self.broadcast
    }

    pub fn rounding_control(&self) -> RoundingControl {
        self.rounding_control
    }

    pub fn suppress_all_exceptions(&self) -> bool {
        self.suppress_all_exceptions
    }

    // ── Builders ───────────────────────────────────────────────────────

    pub fn with_code_size(mut self, code_size: CodeSize) -> Self {
        self.code_size = code_size;
        self
    }

    pub fn with_ip(mut self, ip: u64) -> Self {
        self.ip = ip;
        self
    }

    /// Sets the encoded length (at most 15 bytes are meaningful).
    pub fn with_len(mut self, len: u8) -> Self {
        self.len = len;
        self
    }

    pub fn with_prefixes(mut self, prefixes: PrefixFlags) -> Self {
        self.prefixes = prefixes;
        self
    }

    fn kind_at(&self, operand: usize) -> Result<OperandKind, FormatterError> {
        let info = self.code.op_code();
        info.op_kinds()
            .get(operand)
            .copied()
            .ok_or(FormatterError::InvalidOperand {
                code: self.code,
                operand,
                count: info.op_count(),
            })
    }

    fn mismatch(&self, operand: usize, kind: OperandKind) -> FormatterError {
        FormatterError::OperandKindMismatch {
            code: self.code,
            operand,
            expected: kind.category(),
        }
    }

    /// Sets a register operand.
    ///
    /// Register-or-memory operands switch to their register form. Fixed
    /// register operands only accept their own register.
    pub fn with_register(mut self, operand: usize, register: Register) -> Result<Self, FormatterError> {
        let kind = self.kind_at(operand)?;
        let Some(class) = kind.register_class() else {
            return Err(self.mismatch(operand, kind));
        };
        let valid = match kind.fixed_register() {
            Some(fixed) => fixed == register,
            None => class.contains(register) && !(kind == OperandKind::Kp1Reg && register.number() % 2 != 0),
        };
        if !valid {
            return Err(FormatterError::InvalidRegister {
                code: self.code,
                operand,
                register,
            });
        }
        self.operands[operand] = OperandValue::Register(register);
        Ok(self)
    }

    /// Sets the memory operand and makes `operand` refer to it.
    ///
    /// String instructions also accept a memory operand on their implicit
    /// pointer; only its base register is used, to pick the address size.
    pub fn with_memory(mut self, operand: usize, memory: MemoryOperand) -> Result<Self, FormatterError> {
        let kind = self.kind_at(operand)?;
        if !kind.accepts_memory() && !kind.is_string_pointer() {
            return Err(self.mismatch(operand, kind));
        }
        if !matches!(memory.scale, 1 | 2 | 4 | 8) {
            return Err(FormatterError::InvalidScale(memory.scale));
        }
        if !matches!(memory.displacement_size, 0 | 1 | 2 | 4 | 8) {
            return Err(FormatterError::InvalidDisplacementSize(memory.displacement_size));
        }
        if let Some(base) = memory.base {
            let valid = matches!(
                base.class(),
                RegisterClass::Gpr16 | RegisterClass::Gpr32 | RegisterClass::Gpr64
            ) || (base.class() == RegisterClass::InstructionPointer && memory.index.is_none());
            if !valid {
                return Err(FormatterError::InvalidRegister {
                    code: self.code,
                    operand,
                    register: base,
                });
            }
        }
        if let Some(index) = memory.index {
            let vsib = matches!(
                kind,
                OperandKind::MemVsib32x
                    | OperandKind::MemVsib64x
                    | OperandKind::MemVsib32y
                    | OperandKind::MemVsib64y
                    | OperandKind::MemVsib32z
                    | OperandKind::MemVsib64z
            );
            let valid = if vsib {
                index.is_vector()
            } else {
                matches!(
                    index.class(),
                    RegisterClass::Gpr16 | RegisterClass::Gpr32 | RegisterClass::Gpr64
                )
            };
            if !valid {
                return Err(FormatterError::InvalidRegister {
                    code: self.code,
                    operand,
                    register: index,
                });
            }
        }

        // one memory operand per instruction
        for (i, slot) in self.operands.iter_mut().enumerate() {
            if i != operand && *slot == OperandValue::Memory && !self.code.op_code().op_kind(i).is_string_pointer() {
                *slot = default_value(self.code.op_code().op_kind(i));
            }
        }
        self.operands[operand] = OperandValue::Memory;
        self.memory = memory;
        Ok(self)
    }

    /// Sets an immediate, truncated or sign-extended to the operand's width.
    pub fn with_immediate(mut self, operand: usize, value: u64) -> Result<Self, FormatterError> {
        let kind = self.kind_at(operand)?;
        let value = match kind {
            OperandKind::Imm2M2z => value & 0b11,
            OperandKind::Imm8 => value & 0xFF,
            OperandKind::Imm8Sex16 => u64::from(value as u8 as i8 as i16 as u16),
            OperandKind::Imm8Sex32 => u64::from(value as u8 as i8 as i32 as u32),
            OperandKind::Imm8Sex64 => value as u8 as i8 as i64 as u64,
            OperandKind::Imm16 => value & 0xFFFF,
            OperandKind::Imm32 => value & 0xFFFF_FFFF,
            OperandKind::Imm32Sex64 => value as u32 as i32 as i64 as u64,
            OperandKind::Imm64 => value,
            _ => return Err(self.mismatch(operand, kind)),
        };
        self.operands[operand] = OperandValue::Immediate(value);
        Ok(self)
    }

    /// Sets a near branch target, truncated to the branch width.
    pub fn with_near_branch(mut self, operand: usize, target: u64) -> Result<Self, FormatterError> {
        let kind = self.kind_at(operand)?;
        if kind.category() != OperandCategory::NearBranch {
            return Err(self.mismatch(operand, kind));
        }
        let target = match self.near_branch_width(kind) {
            2 => target & 0xFFFF,
            4 => target & 0xFFFF_FFFF,
            _ => target,
        };
        self.operands[operand] = OperandValue::NearBranch(target);
        Ok(self)
    }

    /// Sets a far branch `selector:offset`. A `ptr16:16` offset is truncated to 16 bits.
    pub fn with_far_branch(mut self, operand: usize, selector: u16, offset: u32) -> Result<Self, FormatterError> {
        let kind = self.kind_at(operand)?;
        let offset = match kind {
            OperandKind::FarBr2_2 => offset & 0xFFFF,
            OperandKind::FarBr4_2 => offset,
            _ => return Err(self.mismatch(operand, kind)),
        };
        self.operands[operand] = OperandValue::FarBranch { selector, offset };
        Ok(self)
    }

    /// Sets (or with `None` clears) the segment override prefix.
    pub fn with_segment_prefix(mut self, segment: Option<Register>) -> Result<Self, FormatterError> {
        if let Some(register) = segment.filter(|r| !r.is_segment()) {
            return Err(FormatterError::InvalidSegment(register));
        }
        self.segment_prefix = segment;
        Ok(self)
    }

    /// Sets the write mask. `k0` clears it.
    pub fn with_op_mask(mut self, register: Register) -> Result<Self, FormatterError> {
        if register.class() != RegisterClass::K || !self.code.op_code().can_use_op_mask_register() {
            return Err(FormatterError::InvalidOpMask {
                code: self.code,
                register,
            });
        }
        self.op_mask = (register != Register::K0).then_some(register);
        Ok(self)
    }

    fn decorator(&self, allowed: bool, enable: bool, decorator: DecoratorKind) -> Result<(), FormatterError> {
        if enable && !allowed {
            return Err(FormatterError::UnsupportedDecorator {
                code: self.code,
                decorator,
            });
        }
        Ok(())
    }

    pub fn with_zeroing_masking(mut self, zeroing: bool) -> Result<Self, FormatterError> {
        let allowed = self.code.op_code().can_use_zeroing_masking();
        self.decorator(allowed, zeroing, DecoratorKind::ZeroingMasking)?;
        self.zeroing_masking = zeroing;
        Ok(self)
    }

    pub fn with_broadcast(mut self, broadcast: bool) -> Result<Self, FormatterError> {
        let allowed = self.code.op_code().can_broadcast();
        self.decorator(allowed, broadcast, DecoratorKind::Broadcast)?;
        self.broadcast = broadcast;
        Ok(self)
    }

    pub fn with_rounding_control(mut self, rounding: RoundingControl) -> Result<Self, FormatterError> {
        let allowed = self.code.op_code().can_use_rounding_control();
        self.decorator(allowed, rounding != RoundingControl::None, DecoratorKind::RoundingControl)?;
        self.rounding_control = rounding;
        Ok(self)
    }

    pub fn with_suppress_all_exceptions(mut self, sae: bool) -> Result<Self, FormatterError> {
        let allowed = self.code.op_code().can_suppress_all_exceptions();
        self.decorator(allowed, sae, DecoratorKind::SuppressAllExceptions)?;
        self.suppress_all_exceptions = sae;
        Ok(self)
    }
}

/// Initial value of an operand slot of kind `kind`.
fn default_value(kind: OperandKind) -> OperandValue {
    if kind.requires_memory() || kind.is_string_pointer() {
        return OperandValue::Memory;
    }
    if let Some(register) = kind.fixed_register() {
        return OperandValue::Register(register);
    }
    if let Some(class) = kind.register_class() {
        return OperandValue::Register(class.first());
    }
    match kind.category() {
        OperandCategory::NearBranch => OperandValue::NearBranch(0),
        OperandCategory::FarBranch => OperandValue::FarBranch { selector: 0, offset: 0 },
        _ if kind == OperandKind::Imm8Const1 => OperandValue::Immediate(1),
        _ => OperandValue::Immediate(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_defaults() {
        let instr = Instruction::new(Code::Add_rm32_imm8);
        assert_eq!(instr.operand(0), OperandValue::Register(Register::Eax));
        assert_eq!(instr.operand(1), OperandValue::Immediate(0));
        assert_eq!(instr.op_kind(1), OpKind::Immediate8to32);

        let instr = Instruction::new(Code::Shl_rm32_1);
        assert_eq!(instr.immediate(1), 1);

        let instr = Instruction::new(Code::Lea_r64_m);
        assert_eq!(instr.op_kind(1), OpKind::Memory);
        assert!(instr.has_memory_operand());
    }

    #[test]
    fn register_validation() {
        let instr = Instruction::new(Code::Push_r64);
        assert!(instr.clone().with_register(0, Register::Rbx).is_ok());
        assert_eq!(
            instr.clone().with_register(0, Register::Eax),
            Err(FormatterError::InvalidRegister {
                code: Code::Push_r64,
                operand: 0,
                register: Register::Eax
            })
        );
        assert_eq!(
            instr.with_register(1, Register::Rax),
            Err(FormatterError::InvalidOperand {
                code: Code::Push_r64,
                operand: 1,
                count: 1
            })
        );
        assert!(Instruction::new(Code::Add_EAX_imm32)
            .with_register(0, Register::Ecx)
            .is_err());
    }

    #[test]
    fn memory_switches_register_or_memory() {
        let instr = Instruction::new(Code::Add_rm32_r32)
            .with_memory(0, MemoryOperand::base(Register::Rbx).with_displacement(0x10, 1))
            .unwrap();
        assert_eq!(instr.op_kind(0), OpKind::Memory);
        assert_eq!(instr.memory().base, Some(Register::Rbx));

        let instr = instr.with_register(0, Register::Ecx).unwrap();
        assert_eq!(instr.op_kind(0), OpKind::Register);
        assert!(!instr.has_memory_operand());
    }

    #[test]
    fn memory_validation() {
        let bad_scale = MemoryOperand::base(Register::Rax).with_index(Register::Rcx, 3);
        assert_eq!(
            Instruction::new(Code::Lea_r64_m).with_memory(1, bad_scale),
            Err(FormatterError::InvalidScale(3))
        );
        assert!(Instruction::new(Code::Push_r64)
            .with_memory(0, MemoryOperand::default())
            .is_err());
        let vsib = MemoryOperand::base(Register::Rax).with_index(Register::Xmm1, 4);
        assert!(Instruction::new(Code::VEX_Vgatherdps_xmm_vm32x_xmm)
            .with_memory(1, vsib)
            .is_ok());
        assert!(Instruction::new(Code::Lea_r64_m).with_memory(1, vsib).is_err());
    }

    #[test]
    fn immediates_are_sized() {
        let instr = Instruction::new(Code::Add_rm64_imm8)
            .with_immediate(1, 0xFF)
            .unwrap();
        assert_eq!(instr.immediate(1), u64::MAX);

        let instr = Instruction::new(Code::Add_rm32_imm8)
            .with_immediate(1, 0x80)
            .unwrap();
        assert_eq!(instr.immediate(1), 0xFFFF_FF80);

        let instr = Instruction::new(Code::Mov_rm32_imm32)
            .with_immediate(1, 0x1_2345_6789)
            .unwrap();
        assert_eq!(instr.immediate(1), 0x2345_6789);

        assert!(Instruction::new(Code::Shl_rm32_1).with_immediate(1, 2).is_err());
    }

    #[test]
    fn second_imm8() {
        let instr = Instruction::new(Code::Enterq_imm16_imm8);
        assert_eq!(instr.op_kind(0), OpKind::Immediate16);
        assert_eq!(instr.op_kind(1), OpKind::Immediate8_2nd);
        let instr = Instruction::new(Code::VEX_Vpermil2ps_xmm_xmm_xmmm128_xmm_imm4);
        assert_eq!(instr.op_kind(4), OpKind::Immediate8);
    }

    #[test]
    fn branch_targets() {
        let instr = Instruction::new(Code::Jmp_rel16)
            .with_near_branch(0, 0x1_2345)
            .unwrap();
        assert_eq!(instr.near_branch_target(0), 0x2345);
        assert_eq!(instr.op_kind(0), OpKind::NearBranch16);

        let instr = Instruction::new(Code::Xbegin_rel32).with_code_size(CodeSize::Code32);
        assert_eq!(instr.op_kind(0), OpKind::NearBranch32);

        let instr = Instruction::new(Code::Jmp_ptr1616)
            .with_far_branch(0, 0x10, 0x1_2345)
            .unwrap();
        assert_eq!(instr.far_branch(0), (0x10, 0x2345));
        assert_eq!(instr.op_kind(0), OpKind::FarBranch16);
    }

    #[test]
    fn decorators_need_capability() {
        let code = Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er;
        let instr = Instruction::new(code)
            .with_op_mask(Register::K1)
            .and_then(|i| i.with_zeroing_masking(true))
            .and_then(|i| i.with_rounding_control(RoundingControl::RoundDown))
            .unwrap();
        assert_eq!(instr.op_mask(), Some(Register::K1));
        assert!(instr.zeroing_masking());

        assert_eq!(
            Instruction::new(Code::Addps_xmm_xmmm128).with_broadcast(true),
            Err(FormatterError::UnsupportedDecorator {
                code: Code::Addps_xmm_xmmm128,
                decorator: DecoratorKind::Broadcast
            })
        );
        assert!(Instruction::new(code).with_op_mask(Register::Rax).is_err());
        assert_eq!(
            Instruction::new(code).with_op_mask(Register::K0).unwrap().op_mask(),
            None
        );
    }

    #[test]
    fn address_size_sources() {
        let instr = Instruction::new(Code::Lea_r64_m);
        assert_eq!(instr.address_size(), 8);
        let instr = instr
            .with_memory(1, MemoryOperand::base(Register::Ebx))
            .unwrap();
        assert_eq!(instr.address_size(), 4);
        let instr = Instruction::new(Code::Lea_r32_m)
            .with_code_size(CodeSize::Code16)
            .with_memory(1, MemoryOperand::absolute(0x1234, 4))
            .unwrap();
        assert_eq!(instr.address_size(), 4);
    }

    #[test]
    fn memory_segment_defaults() {
        let instr = Instruction::new(Code::Mov_r64_rm64)
            .with_memory(1, MemoryOperand::base(Register::Rbp))
            .unwrap();
        assert_eq!(instr.memory_segment(), Register::Ss);
        let instr = instr.with_segment_prefix(Some(Register::Fs)).unwrap();
        assert_eq!(instr.memory_segment(), Register::Fs);
        assert_eq!(
            instr.with_segment_prefix(Some(Register::Rax)),
            Err(FormatterError::InvalidSegment(Register::Rax))
        );
    }

    #[test]
    fn declarations() {
        let instr = Instruction::declare_words(&[0x1234, 0xFFFF]).unwrap();
        assert_eq!(instr.op_count(), 2);
        assert_eq!(instr.declare_value(1), 0xFFFF);
        assert_eq!(
            Instruction::declare_qwords(&[1, 2, 3]),
            Err(FormatterError::TooManyDeclareValues { max: 2, got: 3 })
        );
    }

    #[test]
    #[should_panic(expected = "operand 3 out of range")]
    fn operand_out_of_range_panics() {
        let _ = Instruction::new(Code::Add_rm32_r32).operand(3);
    }
}
