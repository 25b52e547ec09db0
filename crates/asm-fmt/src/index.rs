//! Operand-kind dispatch and disambiguation indices.
//!
//! [`OperandLayout`] is computed once per opcode. It knows which operands
//! are rendered, how many operands of each register class the opcode has,
//! and which exceptions apply. Walking the operands left to right with
//! [`OperandLayout::shape`] yields one [`OperandShape`] per operand, with
//! the suffix that keeps repeated register-class operands apart. Both the
//! signature renderer and the live renderer consume these shapes.

use crate::code::{Code, OpCodeInfo};
use crate::op_kind::{OpKind, OperandKind};
use crate::quirks::OpCodeQuirks;
use crate::register::{Register, RegisterClass};

/// Suffix written after a register-class token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    None,
    /// `xmm2`, `k1`, `bnd2`.
    Number(u8),
    /// `r32a`, `r64b`.
    Letter(char),
}

/// Memory addressing shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryShape {
    Plain,
    /// MPX `mib` (base + index, scale ignored).
    Mib,
    /// `moffs` absolute offset.
    Offset,
    /// Vector-indexed (`vm32x`).
    Vsib { index: RegisterClass, element_bits: u8 },
    /// Memory with a mandatory index register.
    Sibmem,
}

impl MemoryShape {
    /// Signature token for shapes that do not print as `m<size>`.
    pub fn token(self) -> Option<&'static str> {
        match self {
            MemoryShape::Plain | MemoryShape::Offset => None,
            MemoryShape::Mib => Some("mib"),
            MemoryShape::Sibmem => Some("sibmem"),
            MemoryShape::Vsib { index, element_bits } => Some(match (element_bits, index) {
                (32, RegisterClass::Xmm) => "vm32x",
                (64, RegisterClass::Xmm) => "vm64x",
                (32, RegisterClass::Ymm) => "vm32y",
                (64, RegisterClass::Ymm) => "vm64y",
                (32, _) => "vm32z",
                _ => "vm64z",
            }),
        }
    }
}

/// Immediate operand shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmediateShape {
    Imm2,
    Imm8,
    /// The constant `1`.
    Const1,
    Imm8Sex16,
    Imm8Sex32,
    Imm8Sex64,
    Imm16,
    Imm32,
    Imm32Sex64,
    Imm64,
}

impl ImmediateShape {
    pub fn token(self) -> &'static str {
        match self {
            ImmediateShape::Imm2 => "imm2",
            ImmediateShape::Imm8
            | ImmediateShape::Imm8Sex16
            | ImmediateShape::Imm8Sex32
            | ImmediateShape::Imm8Sex64 => "imm8",
            ImmediateShape::Const1 => "1",
            ImmediateShape::Imm16 => "imm16",
            ImmediateShape::Imm32 | ImmediateShape::Imm32Sex64 => "imm32",
            ImmediateShape::Imm64 => "imm64",
        }
    }

    /// Live kind of an immediate of this shape.
    pub fn op_kind(self) -> OpKind {
        match self {
            ImmediateShape::Imm2 | ImmediateShape::Imm8 | ImmediateShape::Const1 => {
                OpKind::Immediate8
            }
            ImmediateShape::Imm8Sex16 => OpKind::Immediate8to16,
            ImmediateShape::Imm8Sex32 => OpKind::Immediate8to32,
            ImmediateShape::Imm8Sex64 => OpKind::Immediate8to64,
            ImmediateShape::Imm16 => OpKind::Immediate16,
            ImmediateShape::Imm32 => OpKind::Immediate32,
            ImmediateShape::Imm32Sex64 => OpKind::Immediate32to64,
            ImmediateShape::Imm64 => OpKind::Immediate64,
        }
    }
}

/// Width of a near branch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchTarget {
    Near16,
    Near32,
    Near64,
    /// Follows the code size (`xbegin`).
    CodeSize,
}

/// What one operand position renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// Register from a register file. `span` is 1 for `k+1`, 3 for `zmm+3`.
    Register { class: RegisterClass, suffix: Suffix, span: u8 },
    /// Register or memory, decided per instance.
    RegisterOrMemory { class: RegisterClass, suffix: Suffix },
    /// Fixed implicit register.
    Fixed(Register),
    /// x87 stack register. `bare` prints `ST` without a slot.
    St { sti: bool, bare: bool },
    Memory(MemoryShape),
    /// `selector:offset`.
    FarBranch { offset_bits: u8 },
    /// Relative (or for `jmpe`, absolute) near branch.
    NearBranch { displacement_bytes: u8, target: BranchTarget, absolute: bool },
    Immediate(ImmediateShape),
    /// Implicit string pointer, never printed.
    StringPointer,
}

/// Disambiguation counters for one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexState {
    vector: u8,
    mask: u8,
    bound: u8,
    r32: u8,
    r64: u8,
}

/// Per-opcode operand walk.
#[derive(Debug, Clone, Copy)]
pub struct OperandLayout {
    info: &'static OpCodeInfo,
    quirks: OpCodeQuirks,
    start: usize,
    count: usize,
    vector_count: u8,
    mask_count: u8,
    bound_count: u8,
    r32_count: u8,
    r64_count: u8,
}

impl OperandLayout {
    pub fn new(code: Code) -> Self {
        let info = code.op_code();
        let quirks = info.quirks();
        let kinds = info.op_kinds();
        let mut layout = OperandLayout {
            info,
            quirks,
            start: 0,
            count: kinds.len(),
            vector_count: 0,
            mask_count: u8::from(info.can_use_op_mask_register()),
            bound_count: 0,
            r32_count: 0,
            r64_count: 0,
        };
        if quirks.contains(OpCodeQuirks::START_AT_OP1) {
            layout.start = 1;
        }
        for &kind in kinds {
            if kind.suppresses_operands() {
                layout.count = 0;
            }
            match kind {
                OperandKind::R32Reg
                | OperandKind::R32Rm
                | OperandKind::R32Opcode
                | OperandKind::R32Vvvv => layout.r32_count += 1,
                OperandKind::R64Reg
                | OperandKind::R64Rm
                | OperandKind::R64Opcode
                | OperandKind::R64Vvvv => layout.r64_count += 1,
                OperandKind::BndReg | OperandKind::BndOrMemMpx => layout.bound_count += 1,
                OperandKind::KReg
                | OperandKind::Kp1Reg
                | OperandKind::KRm
                | OperandKind::KVvvv
                | OperandKind::KOrMem => layout.mask_count += 1,
                _ if is_vector_kind(kind) => layout.vector_count += 1,
                _ => {}
            }
        }
        layout
    }

    pub fn code(&self) -> Code {
        self.info.code()
    }

    pub fn info(&self) -> &'static OpCodeInfo {
        self.info
    }

    pub fn quirks(&self) -> OpCodeQuirks {
        self.quirks
    }

    /// First rendered operand.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last rendered operand (0 for string instructions).
    pub fn end(&self) -> usize {
        self.count
    }

    /// Operand after which `{sae}`/`{er}` is written.
    pub fn sae_er_index(&self) -> Option<usize> {
        let last = self.count.checked_sub(1)?;
        if self.info.op_kind(last) == OperandKind::Imm8 {
            last.checked_sub(1)
        } else {
            Some(last)
        }
    }

    /// Fresh counters, with the vector slot pre-claimed where operand 0 is
    /// counted as the first vector.
    pub fn initial_state(&self) -> IndexState {
        let mut state = IndexState::default();
        let first = self.info.op_kinds().first().copied();
        if matches!(first, Some(OperandKind::KReg | OperandKind::Kp1Reg)) && self.info.op_count() > 2 {
            state.vector += 1;
        }
        if self.quirks.contains(OpCodeQuirks::PRE_INC_VEC_INDEX) {
            state.vector += 1;
        }
        state
    }

    /// Shape of operand `operand`, advancing the counters in `state`.
    ///
    /// Operands must be visited in order, from [`start`](Self::start).
    pub fn shape(&self, operand: usize, state: &mut IndexState) -> OperandShape {
        use OperandShape as S;
        let kind = self.info.op_kind(operand);
        match kind {
            OperandKind::FarBr2_2 => S::FarBranch { offset_bits: 16 },
            OperandKind::FarBr4_2 => S::FarBranch { offset_bits: 32 },
            OperandKind::MemOffs => S::Memory(MemoryShape::Offset),
            OperandKind::Mem => S::Memory(MemoryShape::Plain),
            OperandKind::MemMpx if self.quirks.contains(OpCodeQuirks::MIB) => {
                S::Memory(MemoryShape::Mib)
            }
            OperandKind::MemMpx => S::Memory(MemoryShape::Plain),
            OperandKind::MemMib => S::Memory(MemoryShape::Mib),
            OperandKind::MemVsib32x => vsib(RegisterClass::Xmm, 32),
            OperandKind::MemVsib64x => vsib(RegisterClass::Xmm, 64),
            OperandKind::MemVsib32y => vsib(RegisterClass::Ymm, 32),
            OperandKind::MemVsib64y => vsib(RegisterClass::Ymm, 64),
            OperandKind::MemVsib32z => vsib(RegisterClass::Zmm, 32),
            OperandKind::MemVsib64z => vsib(RegisterClass::Zmm, 64),
            OperandKind::Sibmem => S::Memory(MemoryShape::Sibmem),

            OperandKind::R8OrMem => gpr_or_mem(RegisterClass::Gpr8),
            OperandKind::R16OrMem | OperandKind::R16RegMem => gpr_or_mem(RegisterClass::Gpr16),
            OperandKind::R32OrMem | OperandKind::R32OrMemMpx | OperandKind::R32RegMem => {
                gpr_or_mem(RegisterClass::Gpr32)
            }
            OperandKind::R64OrMem | OperandKind::R64OrMemMpx | OperandKind::R64RegMem => {
                gpr_or_mem(RegisterClass::Gpr64)
            }
            OperandKind::MmOrMem => self.vector_or_mem(RegisterClass::Mm, state),
            OperandKind::XmmOrMem => self.vector_or_mem(RegisterClass::Xmm, state),
            OperandKind::YmmOrMem => self.vector_or_mem(RegisterClass::Ymm, state),
            OperandKind::ZmmOrMem => self.vector_or_mem(RegisterClass::Zmm, state),
            OperandKind::BndOrMemMpx => S::RegisterOrMemory {
                class: RegisterClass::Bnd,
                suffix: self.next_bound(state),
            },
            OperandKind::KOrMem => S::RegisterOrMemory {
                class: RegisterClass::K,
                suffix: self.next_mask(state),
            },

            OperandKind::R8Reg | OperandKind::R8Opcode => register(RegisterClass::Gpr8, Suffix::None),
            OperandKind::R16Reg | OperandKind::R16Rm | OperandKind::R16Opcode => {
                register(RegisterClass::Gpr16, Suffix::None)
            }
            OperandKind::R32Reg
            | OperandKind::R32Rm
            | OperandKind::R32Opcode
            | OperandKind::R32Vvvv => {
                let suffix = letter(self.r32_count, &mut state.r32);
                register(RegisterClass::Gpr32, suffix)
            }
            OperandKind::R64Reg
            | OperandKind::R64Rm
            | OperandKind::R64Opcode
            | OperandKind::R64Vvvv => {
                let suffix = letter(self.r64_count, &mut state.r64);
                register(RegisterClass::Gpr64, suffix)
            }
            OperandKind::SegReg => register(RegisterClass::Segment, Suffix::None),
            OperandKind::KReg | OperandKind::KRm | OperandKind::KVvvv => {
                register(RegisterClass::K, self.next_mask(state))
            }
            OperandKind::Kp1Reg => S::Register {
                class: RegisterClass::K,
                suffix: self.next_mask(state),
                span: 1,
            },
            OperandKind::MmReg | OperandKind::MmRm => {
                register(RegisterClass::Mm, self.next_vector(state))
            }
            OperandKind::XmmReg
            | OperandKind::XmmRm
            | OperandKind::XmmVvvv
            | OperandKind::XmmIs4
            | OperandKind::XmmIs5 => register(RegisterClass::Xmm, self.next_vector(state)),
            OperandKind::Xmmp3Vvvv => S::Register {
                class: RegisterClass::Xmm,
                suffix: self.next_vector(state),
                span: 3,
            },
            OperandKind::YmmReg
            | OperandKind::YmmRm
            | OperandKind::YmmVvvv
            | OperandKind::YmmIs4
            | OperandKind::YmmIs5 => register(RegisterClass::Ymm, self.next_vector(state)),
            OperandKind::ZmmReg | OperandKind::ZmmRm | OperandKind::ZmmVvvv => {
                register(RegisterClass::Zmm, self.next_vector(state))
            }
            OperandKind::Zmmp3Vvvv => S::Register {
                class: RegisterClass::Zmm,
                suffix: self.next_vector(state),
                span: 3,
            },
            OperandKind::TmmReg | OperandKind::TmmRm | OperandKind::TmmVvvv => {
                register(RegisterClass::Tmm, self.next_vector(state))
            }
            OperandKind::CrReg => register(RegisterClass::Cr, Suffix::None),
            OperandKind::DrReg => register(RegisterClass::Dr, Suffix::None),
            OperandKind::TrReg => register(RegisterClass::Tr, Suffix::None),
            OperandKind::BndReg => register(RegisterClass::Bnd, self.next_bound(state)),

            OperandKind::Es => S::Fixed(Register::Es),
            OperandKind::Cs => S::Fixed(Register::Cs),
            OperandKind::Ss => S::Fixed(Register::Ss),
            OperandKind::Ds => S::Fixed(Register::Ds),
            OperandKind::Fs => S::Fixed(Register::Fs),
            OperandKind::Gs => S::Fixed(Register::Gs),
            OperandKind::Al => S::Fixed(Register::Al),
            OperandKind::Cl => S::Fixed(Register::Cl),
            OperandKind::Ax => S::Fixed(Register::Ax),
            OperandKind::Dx => S::Fixed(Register::Dx),
            OperandKind::Eax => S::Fixed(Register::Eax),
            OperandKind::Rax => S::Fixed(Register::Rax),
            OperandKind::St0 => S::St {
                sti: false,
                bare: operand == 0 && self.quirks.contains(OpCodeQuirks::ST0_BARE),
            },
            OperandKind::StiOpcode => S::St { sti: true, bare: false },

            OperandKind::Imm2M2z => S::Immediate(ImmediateShape::Imm2),
            OperandKind::Imm8 => S::Immediate(ImmediateShape::Imm8),
            OperandKind::Imm8Const1 => S::Immediate(ImmediateShape::Const1),
            OperandKind::Imm8Sex16 => S::Immediate(ImmediateShape::Imm8Sex16),
            OperandKind::Imm8Sex32 => S::Immediate(ImmediateShape::Imm8Sex32),
            OperandKind::Imm8Sex64 => S::Immediate(ImmediateShape::Imm8Sex64),
            OperandKind::Imm16 => S::Immediate(ImmediateShape::Imm16),
            OperandKind::Imm32 => S::Immediate(ImmediateShape::Imm32),
            OperandKind::Imm32Sex64 => S::Immediate(ImmediateShape::Imm32Sex64),
            OperandKind::Imm64 => S::Immediate(ImmediateShape::Imm64),

            OperandKind::SegRSI
            | OperandKind::EsRDI
            | OperandKind::SegRDI
            | OperandKind::SegRBXAl => S::StringPointer,

            OperandKind::Br16_1 => near(1, BranchTarget::Near16, false),
            OperandKind::Br32_1 => near(1, BranchTarget::Near32, false),
            OperandKind::Br64_1 => near(1, BranchTarget::Near64, false),
            OperandKind::Br16_2 => near(2, BranchTarget::Near16, false),
            OperandKind::Br32_4 => near(4, BranchTarget::Near32, false),
            OperandKind::Br64_4 => near(4, BranchTarget::Near64, false),
            OperandKind::Xbegin2 => near(2, BranchTarget::CodeSize, false),
            OperandKind::Xbegin4 => near(4, BranchTarget::CodeSize, false),
            OperandKind::BrDisp2 => near(2, BranchTarget::Near16, true),
            OperandKind::BrDisp4 => near(4, BranchTarget::Near32, true),
        }
    }

    /// Index printed inside the opmask decorator on operand 0. Always shown.
    pub fn mask_decorator(&self, state: &mut IndexState) -> u8 {
        state.mask += 1;
        self.swap_mask(state.mask)
    }

    fn swap_mask(&self, index: u8) -> u8 {
        if self.quirks.contains(OpCodeQuirks::OP_MASK_IS_K1) {
            swap12(index)
        } else {
            index
        }
    }

    fn next_mask(&self, state: &mut IndexState) -> Suffix {
        state.mask += 1;
        if self.mask_count > 1 {
            Suffix::Number(self.swap_mask(state.mask))
        } else {
            Suffix::None
        }
    }

    fn next_vector(&self, state: &mut IndexState) -> Suffix {
        if self.quirks.contains(OpCodeQuirks::NO_VEC_INDEX) {
            return Suffix::None;
        }
        state.vector += 1;
        if self.vector_count <= 1 {
            return Suffix::None;
        }
        let index = if self.quirks.contains(OpCodeQuirks::SWAP_VEC_INDEX12) {
            swap12(state.vector)
        } else {
            state.vector
        };
        Suffix::Number(index)
    }

    fn vector_or_mem(&self, class: RegisterClass, state: &mut IndexState) -> OperandShape {
        OperandShape::RegisterOrMemory { class, suffix: self.next_vector(state) }
    }

    fn next_bound(&self, state: &mut IndexState) -> Suffix {
        if self.bound_count <= 1 {
            return Suffix::None;
        }
        state.bound += 1;
        Suffix::Number(state.bound)
    }
}

fn is_vector_kind(kind: OperandKind) -> bool {
    matches!(
        kind,
        OperandKind::MmOrMem
            | OperandKind::XmmOrMem
            | OperandKind::YmmOrMem
            | OperandKind::ZmmOrMem
            | OperandKind::MmReg
            | OperandKind::MmRm
            | OperandKind::XmmReg
            | OperandKind::XmmRm
            | OperandKind::XmmVvvv
            | OperandKind::Xmmp3Vvvv
            | OperandKind::XmmIs4
            | OperandKind::XmmIs5
            | OperandKind::YmmReg
            | OperandKind::YmmRm
            | OperandKind::YmmVvvv
            | OperandKind::YmmIs4
            | OperandKind::YmmIs5
            | OperandKind::ZmmReg
            | OperandKind::ZmmRm
            | OperandKind::ZmmVvvv
            | OperandKind::Zmmp3Vvvv
            | OperandKind::TmmReg
            | OperandKind::TmmRm
            | OperandKind::TmmVvvv
    )
}

fn swap12(index: u8) -> u8 {
    match index {
        1 => 2,
        2 => 1,
        n => n,
    }
}

fn letter(count: u8, index: &mut u8) -> Suffix {
    if count <= 1 {
        return Suffix::None;
    }
    let suffix = Suffix::Letter(char::from(b'a' + *index));
    *index += 1;
    suffix
}

fn register(class: RegisterClass, suffix: Suffix) -> OperandShape {
    OperandShape::Register { class, suffix, span: 0 }
}

fn gpr_or_mem(class: RegisterClass) -> OperandShape {
    OperandShape::RegisterOrMemory { class, suffix: Suffix::None }
}

fn vsib(index: RegisterClass, element_bits: u8) -> OperandShape {
    OperandShape::Memory(MemoryShape::Vsib { index, element_bits })
}

fn near(displacement_bytes: u8, target: BranchTarget, absolute: bool) -> OperandShape {
    OperandShape::NearBranch { displacement_bytes, target, absolute }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn walk(code: Code) -> Vec<OperandShape> {
        let layout = OperandLayout::new(code);
        let mut state = layout.initial_state();
        (layout.start()..layout.end())
            .map(|i| layout.shape(i, &mut state))
            .collect()
    }

    fn suffixes(code: Code) -> Vec<Suffix> {
        walk(code)
            .into_iter()
            .filter_map(|shape| match shape {
                OperandShape::Register { suffix, .. } | OperandShape::RegisterOrMemory { suffix, .. } => {
                    Some(suffix)
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn three_vectors_are_numbered_in_order() {
        assert_eq!(
            suffixes(Code::VEX_Vaddps_ymm_ymm_ymmm256),
            [Suffix::Number(1), Suffix::Number(2), Suffix::Number(3)]
        );
    }

    #[test]
    fn lone_vector_is_not_numbered() {
        assert_eq!(
            suffixes(Code::EVEX_Vpbroadcastd_xmm_k1z_r32),
            [Suffix::None, Suffix::None]
        );
        // pre-increment does not force a suffix on a lone vector
        assert_eq!(suffixes(Code::Pextrd_rm32_xmm_imm8)[1], Suffix::None);
    }

    #[test]
    fn swap_list_exchanges_one_and_two() {
        assert_eq!(
            suffixes(Code::Movaps_xmmm128_xmm),
            [Suffix::Number(2), Suffix::Number(1)]
        );
    }

    #[test]
    fn no_vec_index_list_suppresses_numbers() {
        assert_eq!(suffixes(Code::Pxor_mm_mmm64), [Suffix::None, Suffix::None]);
    }

    #[test]
    fn mask_destination_claims_first_vector_slot() {
        assert_eq!(
            suffixes(Code::EVEX_Vcmpps_kr_k1_zmm_zmmm512b32_imm8_sae),
            [Suffix::Number(1), Suffix::Number(2), Suffix::Number(3)]
        );
    }

    #[test]
    fn op_mask_is_k1_swaps_mask_indices() {
        let layout = OperandLayout::new(Code::EVEX_Vptestmd_kr_k1_zmm_zmmm512b32);
        let mut state = layout.initial_state();
        assert_eq!(
            layout.shape(0, &mut state),
            OperandShape::Register { class: RegisterClass::K, suffix: Suffix::Number(2), span: 0 }
        );
        assert_eq!(layout.mask_decorator(&mut state), 1);

        let layout = OperandLayout::new(Code::EVEX_Vcmpps_kr_k1_zmm_zmmm512b32_imm8_sae);
        let mut state = layout.initial_state();
        let _ = layout.shape(0, &mut state);
        assert_eq!(layout.mask_decorator(&mut state), 2);
    }

    #[test]
    fn gpr_letters_only_when_repeated() {
        assert_eq!(
            suffixes(Code::Andn_r64_r64_rm64),
            [Suffix::Letter('a'), Suffix::Letter('b'), Suffix::None]
        );
        assert_eq!(suffixes(Code::Bswap_r32), [Suffix::None]);
    }

    #[test]
    fn bound_index_needs_two_bound_operands() {
        assert_eq!(
            suffixes(Code::Bndmov_bnd_bndm128),
            [Suffix::Number(1), Suffix::Number(2)]
        );
        assert_eq!(suffixes(Code::Bndcl_bnd_rm64)[0], Suffix::None);
    }

    #[test]
    fn string_instructions_render_no_operands() {
        assert!(walk(Code::Movsb_m8_m8).is_empty());
        assert_eq!(OperandLayout::new(Code::Maskmovq_rDI_mm_mm).end(), 3);
    }

    #[test]
    fn fpu_compare_starts_at_operand_one() {
        let layout = OperandLayout::new(Code::Fcom_st0_sti);
        assert_eq!(layout.start(), 1);
        assert_eq!(walk(Code::Fcomi_st0_sti)[0], OperandShape::St { sti: false, bare: true });
    }

    #[test]
    fn sae_er_skips_trailing_imm8() {
        assert_eq!(
            OperandLayout::new(Code::EVEX_Vcmpps_kr_k1_zmm_zmmm512b32_imm8_sae).sae_er_index(),
            Some(2)
        );
        assert_eq!(OperandLayout::new(Code::Movsb_m8_m8).sae_er_index(), None);
    }
}
