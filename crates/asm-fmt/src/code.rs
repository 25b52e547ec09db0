//! The closed opcode set and its static operand metadata.
//!
//! Every [`Code`] maps to one [`OpCodeInfo`]: the ordered operand kinds, the
//! memory sizes of its memory operand, and its capability flags. The table
//! is generated once by [`op_codes!`] and never mutated.

use bitflags::bitflags;

use crate::memory_size::MemorySize;
use crate::op_kind::OperandKind;
use crate::quirks::{self, OpCodeQuirks};

bitflags! {
    /// Static capabilities and classification of an opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct OpCodeFlags: u32 {
        /// Memory operand may be a `{1toN}` broadcast.
        const BROADCAST = 1 << 0;
        /// Operand 0 may carry an opmask `{k}`.
        const OPMASK = 1 << 1;
        /// Opmask may be combined with `{z}`.
        const ZEROING = 1 << 2;
        /// `{sae}` allowed.
        const SAE = 1 << 3;
        /// `{er}` rounding control allowed.
        const ROUNDING = 1 << 4;
        /// Pseudo opcode (`INVALID`, `db`, …).
        const NOT_INSTRUCTION = 1 << 5;
        /// Data declaration directive.
        const DIRECTIVE = 1 << 6;
        /// x87 instruction.
        const FPU = 1 << 7;
        /// Near or far call.
        const CALL = 1 << 8;
        /// Unconditional jump.
        const JUMP = 1 << 9;
        /// Conditional jump, `loop`, `jrcxz`.
        const COND_JUMP = 1 << 10;
        /// Near or far return.
        const RETURN = 1 << 11;
        /// Needs `o16` outside 16-bit code.
        const OP_SIZE_16 = 1 << 12;
        /// Needs `o32` inside 16-bit code.
        const OP_SIZE_32 = 1 << 13;
        /// Always needs `o64`.
        const OP_SIZE_64 = 1 << 14;
    }
}

/// Static description of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCodeInfo {
    code: Code,
    mnemonic: &'static str,
    op_kinds: &'static [OperandKind],
    memory_size: MemorySize,
    broadcast_memory_size: MemorySize,
    flags: OpCodeFlags,
}

impl OpCodeInfo {
    /// The opcode this info describes.
    pub fn code(&self) -> Code {
        self.code
    }

    /// Lowercase live (NASM) mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    /// Number of declared operands (0–5).
    pub fn op_count(&self) -> usize {
        self.op_kinds.len()
    }

    /// Kind of operand `operand`.
    ///
    /// # Panics
    ///
    /// Panics if `operand >= self.op_count()`.
    pub fn op_kind(&self, operand: usize) -> OperandKind {
        match self.op_kinds.get(operand) {
            Some(kind) => *kind,
            None => panic!(
                "{:?}: operand {} out of range (count {})",
                self.code,
                operand,
                self.op_kinds.len()
            ),
        }
    }

    /// All declared operand kinds, in order.
    pub fn op_kinds(&self) -> &'static [OperandKind] {
        self.op_kinds
    }

    /// Size of the memory operand when it is not broadcast.
    pub fn memory_size(&self) -> MemorySize {
        self.memory_size
    }

    /// Size of the memory operand when it is broadcast.
    pub fn broadcast_memory_size(&self) -> MemorySize {
        self.broadcast_memory_size
    }

    pub fn flags(&self) -> OpCodeFlags {
        self.flags
    }

    pub fn can_broadcast(&self) -> bool {
        self.flags.contains(OpCodeFlags::BROADCAST)
    }

    pub fn can_use_op_mask_register(&self) -> bool {
        self.flags.contains(OpCodeFlags::OPMASK)
    }

    pub fn can_use_zeroing_masking(&self) -> bool {
        self.flags.contains(OpCodeFlags::ZEROING)
    }

    pub fn can_suppress_all_exceptions(&self) -> bool {
        self.flags.contains(OpCodeFlags::SAE)
    }

    pub fn can_use_rounding_control(&self) -> bool {
        self.flags.contains(OpCodeFlags::ROUNDING)
    }

    /// `false` for `INVALID` and the data declarations.
    pub fn is_instruction(&self) -> bool {
        !self.flags.contains(OpCodeFlags::NOT_INSTRUCTION)
    }

    pub fn is_fpu(&self) -> bool {
        self.flags.contains(OpCodeFlags::FPU)
    }

    pub fn is_call(&self) -> bool {
        self.flags.contains(OpCodeFlags::CALL)
    }

    /// Calls, jumps and returns: the instructions a `bnd` prefix applies to.
    pub fn is_branch(&self) -> bool {
        self.flags.intersects(
            OpCodeFlags::CALL | OpCodeFlags::JUMP | OpCodeFlags::COND_JUMP | OpCodeFlags::RETURN,
        )
    }

    /// Whether opmask register is printed as `k2 {k1}` rather than `k1 {k2}`.
    pub fn is_op_mask_register_swapped(&self) -> bool {
        self.quirks().contains(OpCodeQuirks::OP_MASK_IS_K1)
    }

    /// Per-opcode formatting exceptions.
    pub fn quirks(&self) -> OpCodeQuirks {
        quirks::of(self.code)
    }
}

macro_rules! op_codes {
    ($( $code:ident => ($mnemonic:literal, [$($kind:ident),*], $mem:ident, $bcst:ident, [$($flag:ident),*]) ),* $(,)?) => {
        /// An x86/x64 opcode: mnemonic plus operand form.
        ///
        /// Variant names follow the `Mnemonic_operands` convention used by
        /// opcode reference tables (`Add_rm32_r32`, `EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er`).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[allow(non_camel_case_types)]
        #[repr(u16)]
        pub enum Code {
            $( $code, )*
        }

        const OP_CODES: &[OpCodeInfo] = &[$(
            OpCodeInfo {
                code: Code::$code,
                mnemonic: $mnemonic,
                op_kinds: &[$(OperandKind::$kind),*],
                memory_size: MemorySize::$mem,
                broadcast_memory_size: MemorySize::$bcst,
                flags: OpCodeFlags::empty()$(.union(OpCodeFlags::$flag))*,
            },
        )*];
    };
}

op_codes! {
    // ── Pseudo opcodes ──────────────────────────────────────────────────
    INVALID => ("(bad)", [], Unknown, Unknown, [NOT_INSTRUCTION]),
    DeclareByte => ("db", [], Unknown, Unknown, [NOT_INSTRUCTION, DIRECTIVE]),
    DeclareWord => ("dw", [], Unknown, Unknown, [NOT_INSTRUCTION, DIRECTIVE]),
    DeclareDword => ("dd", [], Unknown, Unknown, [NOT_INSTRUCTION, DIRECTIVE]),
    DeclareQword => ("dq", [], Unknown, Unknown, [NOT_INSTRUCTION, DIRECTIVE]),

    // ── Integer ALU and moves ───────────────────────────────────────────
    Add_rm8_r8 => ("add", [R8OrMem, R8Reg], UInt8, Unknown, []),
    Add_rm16_r16 => ("add", [R16OrMem, R16Reg], UInt16, Unknown, []),
    Add_rm32_r32 => ("add", [R32OrMem, R32Reg], UInt32, Unknown, []),
    Add_rm64_r64 => ("add", [R64OrMem, R64Reg], UInt64, Unknown, []),
    Add_r32_rm32 => ("add", [R32Reg, R32OrMem], UInt32, Unknown, []),
    Add_AL_imm8 => ("add", [Al, Imm8], Unknown, Unknown, []),
    Add_EAX_imm32 => ("add", [Eax, Imm32], Unknown, Unknown, []),
    Add_RAX_imm32 => ("add", [Rax, Imm32Sex64], Unknown, Unknown, []),
    Add_rm8_imm8 => ("add", [R8OrMem, Imm8], UInt8, Unknown, []),
    Add_rm16_imm8 => ("add", [R16OrMem, Imm8Sex16], UInt16, Unknown, []),
    Add_rm32_imm8 => ("add", [R32OrMem, Imm8Sex32], UInt32, Unknown, []),
    Add_rm64_imm8 => ("add", [R64OrMem, Imm8Sex64], UInt64, Unknown, []),
    Add_rm32_imm32 => ("add", [R32OrMem, Imm32], UInt32, Unknown, []),
    Add_rm64_imm32 => ("add", [R64OrMem, Imm32Sex64], UInt64, Unknown, []),
    Xadd_rm32_r32 => ("xadd", [R32OrMem, R32Reg], UInt32, Unknown, []),
    Cmpxchg8b_m64 => ("cmpxchg8b", [Mem], UInt64, Unknown, []),
    Cmpxchg16b_m128 => ("cmpxchg16b", [Mem], UInt128, Unknown, []),
    Mov_rm8_r8 => ("mov", [R8OrMem, R8Reg], UInt8, Unknown, []),
    Mov_rm32_r32 => ("mov", [R32OrMem, R32Reg], UInt32, Unknown, []),
    Mov_rm64_r64 => ("mov", [R64OrMem, R64Reg], UInt64, Unknown, []),
    Mov_r32_rm32 => ("mov", [R32Reg, R32OrMem], UInt32, Unknown, []),
    Mov_r64_rm64 => ("mov", [R64Reg, R64OrMem], UInt64, Unknown, []),
    Mov_r32_imm32 => ("mov", [R32Opcode, Imm32], Unknown, Unknown, []),
    Mov_r64_imm64 => ("mov", [R64Opcode, Imm64], Unknown, Unknown, []),
    Mov_rm8_imm8 => ("mov", [R8OrMem, Imm8], UInt8, Unknown, []),
    Mov_rm16_imm16 => ("mov", [R16OrMem, Imm16], UInt16, Unknown, []),
    Mov_rm32_imm32 => ("mov", [R32OrMem, Imm32], UInt32, Unknown, []),
    Mov_rm64_imm32 => ("mov", [R64OrMem, Imm32Sex64], UInt64, Unknown, []),
    Mov_AL_moffs8 => ("mov", [Al, MemOffs], UInt8, Unknown, []),
    Mov_EAX_moffs32 => ("mov", [Eax, MemOffs], UInt32, Unknown, []),
    Mov_RAX_moffs64 => ("mov", [Rax, MemOffs], UInt64, Unknown, []),
    Mov_r32m16_Sreg => ("mov", [R32RegMem, SegReg], UInt16, Unknown, []),
    Mov_Sreg_r32m16 => ("mov", [SegReg, R32RegMem], UInt16, Unknown, []),
    Mov_r64_cr => ("mov", [R64Rm, CrReg], Unknown, Unknown, []),
    Mov_cr_r64 => ("mov", [CrReg, R64Rm], Unknown, Unknown, []),
    Mov_r64_dr => ("mov", [R64Rm, DrReg], Unknown, Unknown, []),
    Mov_dr_r64 => ("mov", [DrReg, R64Rm], Unknown, Unknown, []),
    Mov_r32_tr => ("mov", [R32Rm, TrReg], Unknown, Unknown, []),
    Mov_tr_r32 => ("mov", [TrReg, R32Rm], Unknown, Unknown, []),
    Movzx_r32_rm8 => ("movzx", [R32Reg, R8OrMem], UInt8, Unknown, []),
    Movzx_r32_rm16 => ("movzx", [R32Reg, R16OrMem], UInt16, Unknown, []),
    Movsxd_r64_rm32 => ("movsxd", [R64Reg, R32OrMem], UInt32, Unknown, []),
    Lea_r32_m => ("lea", [R32Reg, Mem], Unknown, Unknown, []),
    Lea_r64_m => ("lea", [R64Reg, Mem], Unknown, Unknown, []),
    Xchg_r32_EAX => ("xchg", [R32Opcode, Eax], Unknown, Unknown, []),
    Inc_rm32 => ("inc", [R32OrMem], UInt32, Unknown, []),
    Neg_rm64 => ("neg", [R64OrMem], UInt64, Unknown, []),
    Imul_r32_rm32_imm8 => ("imul", [R32Reg, R32OrMem, Imm8Sex32], UInt32, Unknown, []),
    Shl_rm32_1 => ("shl", [R32OrMem, Imm8Const1], UInt32, Unknown, []),
    Shl_rm32_CL => ("shl", [R32OrMem, Cl], UInt32, Unknown, []),
    Shl_rm32_imm8 => ("shl", [R32OrMem, Imm8], UInt32, Unknown, []),
    Shld_rm32_r32_imm8 => ("shld", [R32OrMem, R32Reg, Imm8], UInt32, Unknown, []),
    Andn_r32_r32_rm32 => ("andn", [R32Reg, R32Vvvv, R32OrMem], UInt32, Unknown, []),
    Andn_r64_r64_rm64 => ("andn", [R64Reg, R64Vvvv, R64OrMem], UInt64, Unknown, []),
    Mulx_r64_r64_rm64 => ("mulx", [R64Reg, R64Vvvv, R64OrMem], UInt64, Unknown, []),
    Bswap_r32 => ("bswap", [R32Opcode], Unknown, Unknown, []),
    Bswap_r64 => ("bswap", [R64Opcode], Unknown, Unknown, []),
    Bound_r16_m1616 => ("bound", [R16Reg, Mem], Bound16_WordWord, Unknown, []),
    Bound_r32_m3232 => ("bound", [R32Reg, Mem], Bound32_DwordDword, Unknown, []),
    Les_r32_m1632 => ("les", [R32Reg, Mem], SegPtr32, Unknown, []),
    Lss_r64_m1664 => ("lss", [R64Reg, Mem], SegPtr64, Unknown, []),

    // ── Stack ───────────────────────────────────────────────────────────
    Push_r64 => ("push", [R64Opcode], Unknown, Unknown, []),
    Pop_r64 => ("pop", [R64Opcode], Unknown, Unknown, []),
    Push_rm64 => ("push", [R64OrMem], UInt64, Unknown, []),
    Pushq_imm8 => ("push", [Imm8Sex64], Unknown, Unknown, []),
    Pushq_imm32 => ("push", [Imm32Sex64], Unknown, Unknown, []),
    Pushw_ES => ("push", [Es], Unknown, Unknown, []),
    Pushd_CS => ("push", [Cs], Unknown, Unknown, []),
    Pushd_SS => ("push", [Ss], Unknown, Unknown, []),
    Pushd_DS => ("push", [Ds], Unknown, Unknown, []),
    Pushq_FS => ("push", [Fs], Unknown, Unknown, []),
    Pushq_GS => ("push", [Gs], Unknown, Unknown, []),
    Pushad => ("pushad", [], Unknown, Unknown, []),
    Popad => ("popad", [], Unknown, Unknown, []),
    Pushfd => ("pushfd", [], Unknown, Unknown, []),
    Pushfq => ("pushfq", [], Unknown, Unknown, []),
    Popfd => ("popfd", [], Unknown, Unknown, []),
    Popfq => ("popfq", [], Unknown, Unknown, []),
    Enterq_imm16_imm8 => ("enter", [Imm16, Imm8], Unknown, Unknown, []),

    // ── I/O, interrupts, misc ───────────────────────────────────────────
    In_AL_imm8 => ("in", [Al, Imm8], Unknown, Unknown, []),
    In_AL_DX => ("in", [Al, Dx], Unknown, Unknown, []),
    In_EAX_DX => ("in", [Eax, Dx], Unknown, Unknown, []),
    Out_DX_AX => ("out", [Dx, Ax], Unknown, Unknown, []),
    Int_imm8 => ("int", [Imm8], Unknown, Unknown, []),
    Int3 => ("int3", [], Unknown, Unknown, []),
    Iretd => ("iretd", [], Unknown, Unknown, [RETURN]),
    Iretq => ("iretq", [], Unknown, Unknown, [RETURN]),
    Nopd => ("nop", [], Unknown, Unknown, []),
    Nop_rm32 => ("nop", [R32OrMem], UInt32, Unknown, []),
    Hlt => ("hlt", [], Unknown, Unknown, []),
    Lgdt_m1664 => ("lgdt", [Mem], Fword10, Unknown, []),
    Lidt_m1632 => ("lidt", [Mem], Fword6, Unknown, []),
    Sgdt_m1632_16 => ("sgdt", [Mem], Fword6, Unknown, []),
    Sgdt_m1632 => ("sgdt", [Mem], Fword6, Unknown, []),
    Sgdt_m1664 => ("sgdt", [Mem], Fword10, Unknown, []),
    Sidt_m1632_16 => ("sidt", [Mem], Fword6, Unknown, []),
    Sidt_m1632 => ("sidt", [Mem], Fword6, Unknown, []),
    Sidt_m1664 => ("sidt", [Mem], Fword10, Unknown, []),
    Fxsave_m512byte => ("fxsave", [Mem], Fxsave_512Byte, Unknown, []),
    Fxsave64_m512byte => ("fxsave64", [Mem], Fxsave64_512Byte, Unknown, []),
    Xsave_mem => ("xsave", [Mem], Xsave, Unknown, []),
    Xsave64_mem => ("xsave64", [Mem], Xsave64, Unknown, []),
    Tpause_r32 => ("tpause", [R32Rm], Unknown, Unknown, []),
    Tpause_r64 => ("tpause", [R64Rm], Unknown, Unknown, []),
    Umwait_r32 => ("umwait", [R32Rm], Unknown, Unknown, []),
    Umwait_r64 => ("umwait", [R64Rm], Unknown, Unknown, []),

    // ── Branches ────────────────────────────────────────────────────────
    Jmp_rel8_16 => ("jmp", [Br16_1], Unknown, Unknown, [JUMP]),
    Jmp_rel8_32 => ("jmp", [Br32_1], Unknown, Unknown, [JUMP]),
    Jmp_rel8_64 => ("jmp", [Br64_1], Unknown, Unknown, [JUMP]),
    Jmp_rel16 => ("jmp", [Br16_2], Unknown, Unknown, [JUMP]),
    Jmp_rel32_32 => ("jmp", [Br32_4], Unknown, Unknown, [JUMP]),
    Jmp_rel32_64 => ("jmp", [Br64_4], Unknown, Unknown, [JUMP]),
    Je_rel8_64 => ("je", [Br64_1], Unknown, Unknown, [COND_JUMP]),
    Je_rel16 => ("je", [Br16_2], Unknown, Unknown, [COND_JUMP]),
    Je_rel32_32 => ("je", [Br32_4], Unknown, Unknown, [COND_JUMP]),
    Je_rel32_64 => ("je", [Br64_4], Unknown, Unknown, [COND_JUMP]),
    Jne_rel8_64 => ("jne", [Br64_1], Unknown, Unknown, [COND_JUMP]),
    Loop_rel8_64_RCX => ("loop", [Br64_1], Unknown, Unknown, [COND_JUMP]),
    Jrcxz_rel8_64 => ("jrcxz", [Br64_1], Unknown, Unknown, [COND_JUMP]),
    Call_rel16 => ("call", [Br16_2], Unknown, Unknown, [CALL]),
    Call_rel32_32 => ("call", [Br32_4], Unknown, Unknown, [CALL]),
    Call_rel32_64 => ("call", [Br64_4], Unknown, Unknown, [CALL]),
    Call_ptr1616 => ("call", [FarBr2_2], Unknown, Unknown, [CALL]),
    Call_ptr1632 => ("call", [FarBr4_2], Unknown, Unknown, [CALL]),
    Jmp_ptr1616 => ("jmp", [FarBr2_2], Unknown, Unknown, [JUMP]),
    Jmp_ptr1632 => ("jmp", [FarBr4_2], Unknown, Unknown, [JUMP]),
    Call_rm16 => ("call", [R16OrMem], UInt16, Unknown, [CALL]),
    Call_rm32 => ("call", [R32OrMem], UInt32, Unknown, [CALL]),
    Call_rm64 => ("call", [R64OrMem], UInt64, Unknown, [CALL]),
    Jmp_rm16 => ("jmp", [R16OrMem], UInt16, Unknown, [JUMP]),
    Jmp_rm32 => ("jmp", [R32OrMem], UInt32, Unknown, [JUMP]),
    Jmp_rm64 => ("jmp", [R64OrMem], UInt64, Unknown, [JUMP]),
    Call_m1616 => ("call", [Mem], SegPtr16, Unknown, [CALL]),
    Call_m1632 => ("call", [Mem], SegPtr32, Unknown, [CALL]),
    Call_m1664 => ("call", [Mem], SegPtr64, Unknown, [CALL]),
    Jmp_m1632 => ("jmp", [Mem], SegPtr32, Unknown, [JUMP]),
    Xbegin_rel16 => ("xbegin", [Xbegin2], Unknown, Unknown, []),
    Xbegin_rel32 => ("xbegin", [Xbegin4], Unknown, Unknown, []),
    Jmpe_disp16 => ("jmpe", [BrDisp2], Unknown, Unknown, [JUMP]),
    Jmpe_disp32 => ("jmpe", [BrDisp4], Unknown, Unknown, [JUMP]),
    Retnw => ("ret", [], Unknown, Unknown, [RETURN, OP_SIZE_16]),
    Retnd => ("ret", [], Unknown, Unknown, [RETURN]),
    Retnq => ("ret", [], Unknown, Unknown, [RETURN]),
    Retnq_imm16 => ("ret", [Imm16], Unknown, Unknown, [RETURN]),
    Retfw => ("retf", [], Unknown, Unknown, [RETURN, OP_SIZE_16]),
    Retfw_imm16 => ("retf", [Imm16], Unknown, Unknown, [RETURN, OP_SIZE_16]),
    Retfd => ("retf", [], Unknown, Unknown, [RETURN, OP_SIZE_32]),
    Retfd_imm16 => ("retf", [Imm16], Unknown, Unknown, [RETURN, OP_SIZE_32]),
    Retfq => ("retf", [], Unknown, Unknown, [RETURN, OP_SIZE_64]),
    Retfq_imm16 => ("retf", [Imm16], Unknown, Unknown, [RETURN, OP_SIZE_64]),

    // ── String instructions ─────────────────────────────────────────────
    Movsb_m8_m8 => ("movsb", [EsRDI, SegRSI], UInt8, Unknown, []),
    Movsd_m32_m32 => ("movsd", [EsRDI, SegRSI], UInt32, Unknown, []),
    Movsq_m64_m64 => ("movsq", [EsRDI, SegRSI], UInt64, Unknown, []),
    Stosb_m8_AL => ("stosb", [EsRDI, Al], UInt8, Unknown, []),
    Stosq_m64_RAX => ("stosq", [EsRDI, Rax], UInt64, Unknown, []),
    Lodsb_AL_m8 => ("lodsb", [Al, SegRSI], UInt8, Unknown, []),
    Cmpsb_m8_m8 => ("cmpsb", [SegRSI, EsRDI], UInt8, Unknown, []),
    Cmpsd_m32_m32 => ("cmpsd", [SegRSI, EsRDI], UInt32, Unknown, []),
    Scasb_AL_m8 => ("scasb", [Al, EsRDI], UInt8, Unknown, []),
    Scasd_EAX_m32 => ("scasd", [Eax, EsRDI], UInt32, Unknown, []),
    Insb_m8_DX => ("insb", [EsRDI, Dx], UInt8, Unknown, []),
    Outsb_DX_m8 => ("outsb", [Dx, SegRSI], UInt8, Unknown, []),
    Xlat_m8 => ("xlatb", [SegRBXAl], UInt8, Unknown, []),
    Maskmovq_rDI_mm_mm => ("maskmovq", [SegRDI, MmReg, MmRm], Packed64, Unknown, []),
    Maskmovdqu_rDI_xmm_xmm => ("maskmovdqu", [SegRDI, XmmReg, XmmRm], Packed128, Unknown, []),

    // ── x87 ─────────────────────────────────────────────────────────────
    Fadd_m32fp => ("fadd", [Mem], Float32, Unknown, [FPU]),
    Fadd_m64fp => ("fadd", [Mem], Float64, Unknown, [FPU]),
    Fld_m32fp => ("fld", [Mem], Float32, Unknown, [FPU]),
    Fld_m80fp => ("fld", [Mem], Float80, Unknown, [FPU]),
    Fild_m16int => ("fild", [Mem], Int16, Unknown, [FPU]),
    Fild_m32int => ("fild", [Mem], Int32, Unknown, [FPU]),
    Fild_m64int => ("fild", [Mem], Int64, Unknown, [FPU]),
    Fbld_m80bcd => ("fbld", [Mem], Bcd, Unknown, [FPU]),
    Fldenv_m14byte => ("fldenv", [Mem], FpuEnv14, Unknown, [FPU]),
    Fldenv_m28byte => ("fldenv", [Mem], FpuEnv28, Unknown, [FPU]),
    Frstor_m94byte => ("frstor", [Mem], FpuState94, Unknown, [FPU]),
    Fnsave_m108byte => ("fnsave", [Mem], FpuState108, Unknown, [FPU]),
    Fldcw_m2byte => ("fldcw", [Mem], UInt16, Unknown, [FPU]),
    Fnstcw_m2byte => ("fnstcw", [Mem], UInt16, Unknown, [FPU]),
    Fstcw_m2byte => ("fstcw", [Mem], UInt16, Unknown, [FPU]),
    Fnstsw_m2byte => ("fnstsw", [Mem], UInt16, Unknown, [FPU]),
    Fstsw_m2byte => ("fstsw", [Mem], UInt16, Unknown, [FPU]),
    Fnstsw_AX => ("fnstsw", [Ax], Unknown, Unknown, [FPU]),
    Fadd_st0_sti => ("fadd", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fadd_sti_st0 => ("fadd", [StiOpcode, St0], Unknown, Unknown, [FPU]),
    Fmul_sti_st0 => ("fmul", [StiOpcode, St0], Unknown, Unknown, [FPU]),
    Fcom_st0_sti => ("fcom", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fcomp_st0_sti => ("fcomp", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fld_st0_sti => ("fld", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fucom_st0_sti => ("fucom", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fucomp_st0_sti => ("fucomp", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fxch_st0_sti => ("fxch", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fcomi_st0_sti => ("fcomi", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fcomip_st0_sti => ("fcomip", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fucomi_st0_sti => ("fucomi", [St0, StiOpcode], Unknown, Unknown, [FPU]),
    Fucomip_st0_sti => ("fucomip", [St0, StiOpcode], Unknown, Unknown, [FPU]),

    // ── MMX and legacy SSE2 integer ─────────────────────────────────────
    Punpcklbw_mm_mmm32 => ("punpcklbw", [MmReg, MmOrMem], UInt32, Unknown, []),
    Punpcklwd_mm_mmm32 => ("punpcklwd", [MmReg, MmOrMem], UInt32, Unknown, []),
    Punpckldq_mm_mmm32 => ("punpckldq", [MmReg, MmOrMem], UInt32, Unknown, []),
    Packsswb_mm_mmm64 => ("packsswb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pcmpgtb_mm_mmm64 => ("pcmpgtb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pcmpgtw_mm_mmm64 => ("pcmpgtw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pcmpgtd_mm_mmm64 => ("pcmpgtd", [MmReg, MmOrMem], Packed64, Unknown, []),
    Packuswb_mm_mmm64 => ("packuswb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Punpckhbw_mm_mmm64 => ("punpckhbw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Punpckhwd_mm_mmm64 => ("punpckhwd", [MmReg, MmOrMem], Packed64, Unknown, []),
    Punpckhdq_mm_mmm64 => ("punpckhdq", [MmReg, MmOrMem], Packed64, Unknown, []),
    Packssdw_mm_mmm64 => ("packssdw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Movd_mm_rm32 => ("movd", [MmReg, R32OrMem], UInt32, Unknown, []),
    Movq_mm_rm64 => ("movq", [MmReg, R64OrMem], UInt64, Unknown, []),
    Movq_mm_mmm64 => ("movq", [MmReg, MmOrMem], UInt64, Unknown, []),
    Psrlw_mm_imm8 => ("psrlw", [MmRm, Imm8], Unknown, Unknown, []),
    Psraw_mm_imm8 => ("psraw", [MmRm, Imm8], Unknown, Unknown, []),
    Psllw_mm_imm8 => ("psllw", [MmRm, Imm8], Unknown, Unknown, []),
    Psrld_mm_imm8 => ("psrld", [MmRm, Imm8], Unknown, Unknown, []),
    Psrad_mm_imm8 => ("psrad", [MmRm, Imm8], Unknown, Unknown, []),
    Pslld_mm_imm8 => ("pslld", [MmRm, Imm8], Unknown, Unknown, []),
    Psrlq_mm_imm8 => ("psrlq", [MmRm, Imm8], Unknown, Unknown, []),
    Psllq_mm_imm8 => ("psllq", [MmRm, Imm8], Unknown, Unknown, []),
    Pcmpeqb_mm_mmm64 => ("pcmpeqb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pcmpeqw_mm_mmm64 => ("pcmpeqw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pcmpeqd_mm_mmm64 => ("pcmpeqd", [MmReg, MmOrMem], Packed64, Unknown, []),
    Movd_rm32_mm => ("movd", [R32OrMem, MmReg], UInt32, Unknown, []),
    Movq_rm64_mm => ("movq", [R64OrMem, MmReg], UInt64, Unknown, []),
    Movq_mmm64_mm => ("movq", [MmOrMem, MmReg], UInt64, Unknown, []),
    Pinsrw_mm_r32m16_imm8 => ("pinsrw", [MmReg, R32OrMem, Imm8], UInt16, Unknown, []),
    Pinsrw_mm_r64m16_imm8 => ("pinsrw", [MmReg, R64OrMem, Imm8], UInt16, Unknown, []),
    Pextrw_r32_mm_imm8 => ("pextrw", [R32Reg, MmRm, Imm8], Unknown, Unknown, []),
    Pextrw_r64_mm_imm8 => ("pextrw", [R64Reg, MmRm, Imm8], Unknown, Unknown, []),
    Psrlw_mm_mmm64 => ("psrlw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psrld_mm_mmm64 => ("psrld", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psrlq_mm_mmm64 => ("psrlq", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddq_mm_mmm64 => ("paddq", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pmullw_mm_mmm64 => ("pmullw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pmovmskb_r32_mm => ("pmovmskb", [R32Reg, MmRm], Unknown, Unknown, []),
    Pmovmskb_r64_mm => ("pmovmskb", [R64Reg, MmRm], Unknown, Unknown, []),
    Psubusb_mm_mmm64 => ("psubusb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psubusw_mm_mmm64 => ("psubusw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pand_mm_mmm64 => ("pand", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddusb_mm_mmm64 => ("paddusb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddusw_mm_mmm64 => ("paddusw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pandn_mm_mmm64 => ("pandn", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psraw_mm_mmm64 => ("psraw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psrad_mm_mmm64 => ("psrad", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pmulhw_mm_mmm64 => ("pmulhw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Movntq_m64_mm => ("movntq", [Mem, MmReg], Packed64, Unknown, []),
    Psubsb_mm_mmm64 => ("psubsb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psubsw_mm_mmm64 => ("psubsw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Por_mm_mmm64 => ("por", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddsb_mm_mmm64 => ("paddsb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddsw_mm_mmm64 => ("paddsw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pxor_mm_mmm64 => ("pxor", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psllw_mm_mmm64 => ("psllw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pslld_mm_mmm64 => ("pslld", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psllq_mm_mmm64 => ("psllq", [MmReg, MmOrMem], Packed64, Unknown, []),
    Pmaddwd_mm_mmm64 => ("pmaddwd", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psubb_mm_mmm64 => ("psubb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psubw_mm_mmm64 => ("psubw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Psubd_mm_mmm64 => ("psubd", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddb_mm_mmm64 => ("paddb", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddw_mm_mmm64 => ("paddw", [MmReg, MmOrMem], Packed64, Unknown, []),
    Paddd_mm_mmm64 => ("paddd", [MmReg, MmOrMem], Packed64, Unknown, []),
    Cvtpi2ps_xmm_mmm64 => ("cvtpi2ps", [XmmReg, MmOrMem], Packed64, Unknown, []),
    Cvtpi2pd_xmm_mmm64 => ("cvtpi2pd", [XmmReg, MmOrMem], Packed64, Unknown, []),
    Cvttps2pi_mm_xmmm64 => ("cvttps2pi", [MmReg, XmmOrMem], Packed64, Unknown, []),
    Cvttpd2pi_mm_xmmm128 => ("cvttpd2pi", [MmReg, XmmOrMem], Packed128, Unknown, []),
    Cvtps2pi_mm_xmmm64 => ("cvtps2pi", [MmReg, XmmOrMem], Packed64, Unknown, []),
    Cvtpd2pi_mm_xmmm128 => ("cvtpd2pi", [MmReg, XmmOrMem], Packed128, Unknown, []),
    Movmskps_r32_xmm => ("movmskps", [R32Reg, XmmRm], Unknown, Unknown, []),
    Movmskps_r64_xmm => ("movmskps", [R64Reg, XmmRm], Unknown, Unknown, []),
    Movmskpd_r32_xmm => ("movmskpd", [R32Reg, XmmRm], Unknown, Unknown, []),
    Movmskpd_r64_xmm => ("movmskpd", [R64Reg, XmmRm], Unknown, Unknown, []),
    Movd_xmm_rm32 => ("movd", [XmmReg, R32OrMem], UInt32, Unknown, []),
    Movq_xmm_rm64 => ("movq", [XmmReg, R64OrMem], UInt64, Unknown, []),
    Movd_rm32_xmm => ("movd", [R32OrMem, XmmReg], UInt32, Unknown, []),
    Movq_rm64_xmm => ("movq", [R64OrMem, XmmReg], UInt64, Unknown, []),
    Pinsrw_xmm_r32m16_imm8 => ("pinsrw", [XmmReg, R32OrMem, Imm8], UInt16, Unknown, []),
    Pinsrw_xmm_r64m16_imm8 => ("pinsrw", [XmmReg, R64OrMem, Imm8], UInt16, Unknown, []),
    Pextrw_r32_xmm_imm8 => ("pextrw", [R32Reg, XmmRm, Imm8], Unknown, Unknown, []),
    Pextrw_r64_xmm_imm8 => ("pextrw", [R64Reg, XmmRm, Imm8], Unknown, Unknown, []),
    Pextrw_r32m16_xmm_imm8 => ("pextrw", [R32OrMem, XmmReg, Imm8], UInt16, Unknown, []),
    Pextrw_r64m16_xmm_imm8 => ("pextrw", [R64OrMem, XmmReg, Imm8], UInt16, Unknown, []),
    Pmovmskb_r32_xmm => ("pmovmskb", [R32Reg, XmmRm], Unknown, Unknown, []),
    Pmovmskb_r64_xmm => ("pmovmskb", [R64Reg, XmmRm], Unknown, Unknown, []),
    Movdq2q_mm_xmm => ("movdq2q", [MmReg, XmmRm], Unknown, Unknown, []),
    Movq2dq_xmm_mm => ("movq2dq", [XmmReg, MmRm], Unknown, Unknown, []),

    // ── SSE / AVX moves (store forms print source before destination) ──
    Movups_xmmm128_xmm => ("movups", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovups_xmmm128_xmm => ("vmovups", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovups_ymmm256_ymm => ("vmovups", [YmmOrMem, YmmReg], Packed256, Unknown, []),
    EVEX_Vmovups_xmmm128_k1z_xmm => ("vmovups", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovups_ymmm256_k1z_ymm => ("vmovups", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovups_zmmm512_k1z_zmm => ("vmovups", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    Movupd_xmmm128_xmm => ("movupd", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovupd_xmmm128_xmm => ("vmovupd", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovupd_ymmm256_ymm => ("vmovupd", [YmmOrMem, YmmReg], Packed256, Unknown, []),
    EVEX_Vmovupd_xmmm128_k1z_xmm => ("vmovupd", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovupd_ymmm256_k1z_ymm => ("vmovupd", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovupd_zmmm512_k1z_zmm => ("vmovupd", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    Movss_xmmm32_xmm => ("movss", [XmmOrMem, XmmReg], Float32, Unknown, []),
    VEX_Vmovlps_xmm_xmm_m64 => ("vmovlps", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    EVEX_Vmovlps_xmm_xmm_m64 => ("vmovlps", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    VEX_Vmovlpd_xmm_xmm_m64 => ("vmovlpd", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    EVEX_Vmovlpd_xmm_xmm_m64 => ("vmovlpd", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    VEX_Vmovhps_xmm_xmm_m64 => ("vmovhps", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    EVEX_Vmovhps_xmm_xmm_m64 => ("vmovhps", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    VEX_Vmovhpd_xmm_xmm_m64 => ("vmovhpd", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    EVEX_Vmovhpd_xmm_xmm_m64 => ("vmovhpd", [XmmReg, XmmVvvv, Mem], UInt64, Unknown, []),
    Movaps_xmmm128_xmm => ("movaps", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovaps_xmmm128_xmm => ("vmovaps", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovaps_ymmm256_ymm => ("vmovaps", [YmmOrMem, YmmReg], Packed256, Unknown, []),
    EVEX_Vmovaps_xmmm128_k1z_xmm => ("vmovaps", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovaps_ymmm256_k1z_ymm => ("vmovaps", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovaps_zmmm512_k1z_zmm => ("vmovaps", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    Movapd_xmmm128_xmm => ("movapd", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovapd_xmmm128_xmm => ("vmovapd", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovapd_ymmm256_ymm => ("vmovapd", [YmmOrMem, YmmReg], Packed256, Unknown, []),
    EVEX_Vmovapd_xmmm128_k1z_xmm => ("vmovapd", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovapd_ymmm256_k1z_ymm => ("vmovapd", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovapd_zmmm512_k1z_zmm => ("vmovapd", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    Movq_xmmm64_xmm => ("movq", [XmmOrMem, XmmReg], UInt64, Unknown, []),
    Movdqa_xmmm128_xmm => ("movdqa", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovdqa_xmmm128_xmm => ("vmovdqa", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovdqa_ymmm256_ymm => ("vmovdqa", [YmmOrMem, YmmReg], Packed256, Unknown, []),
    EVEX_Vmovdqa32_xmmm128_k1z_xmm => ("vmovdqa32", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqa32_ymmm256_k1z_ymm => ("vmovdqa32", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqa32_zmmm512_k1z_zmm => ("vmovdqa32", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqa64_xmmm128_k1z_xmm => ("vmovdqa64", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqa64_ymmm256_k1z_ymm => ("vmovdqa64", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqa64_zmmm512_k1z_zmm => ("vmovdqa64", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    Movdqu_xmmm128_xmm => ("movdqu", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovdqu_xmmm128_xmm => ("vmovdqu", [XmmOrMem, XmmReg], Packed128, Unknown, []),
    VEX_Vmovdqu_ymmm256_ymm => ("vmovdqu", [YmmOrMem, YmmReg], Packed256, Unknown, []),
    EVEX_Vmovdqu32_xmmm128_k1z_xmm => ("vmovdqu32", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu32_ymmm256_k1z_ymm => ("vmovdqu32", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu32_zmmm512_k1z_zmm => ("vmovdqu32", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu64_xmmm128_k1z_xmm => ("vmovdqu64", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu64_ymmm256_k1z_ymm => ("vmovdqu64", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu64_zmmm512_k1z_zmm => ("vmovdqu64", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu8_xmmm128_k1z_xmm => ("vmovdqu8", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu8_ymmm256_k1z_ymm => ("vmovdqu8", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu8_zmmm512_k1z_zmm => ("vmovdqu8", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu16_xmmm128_k1z_xmm => ("vmovdqu16", [XmmOrMem, XmmReg], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu16_ymmm256_k1z_ymm => ("vmovdqu16", [YmmOrMem, YmmReg], Packed256, Unknown, [OPMASK, ZEROING]),
    EVEX_Vmovdqu16_zmmm512_k1z_zmm => ("vmovdqu16", [ZmmOrMem, ZmmReg], Packed512, Unknown, [OPMASK, ZEROING]),

    // ── Vector extracts and mask moves ──────────────────────────────────
    Pextrb_r32m8_xmm_imm8 => ("pextrb", [R32OrMem, XmmReg, Imm8], UInt8, Unknown, []),
    Pextrb_r64m8_xmm_imm8 => ("pextrb", [R64OrMem, XmmReg, Imm8], UInt8, Unknown, []),
    Pextrd_rm32_xmm_imm8 => ("pextrd", [R32OrMem, XmmReg, Imm8], UInt32, Unknown, []),
    Pextrq_rm64_xmm_imm8 => ("pextrq", [R64OrMem, XmmReg, Imm8], UInt64, Unknown, []),
    VEX_Vpextrb_r32m8_xmm_imm8 => ("vpextrb", [R32OrMem, XmmReg, Imm8], UInt8, Unknown, []),
    VEX_Vpextrb_r64m8_xmm_imm8 => ("vpextrb", [R64OrMem, XmmReg, Imm8], UInt8, Unknown, []),
    VEX_Vpextrd_rm32_xmm_imm8 => ("vpextrd", [R32OrMem, XmmReg, Imm8], UInt32, Unknown, []),
    VEX_Vpextrq_rm64_xmm_imm8 => ("vpextrq", [R64OrMem, XmmReg, Imm8], UInt64, Unknown, []),
    VEX_Vpextrw_r32m16_xmm_imm8 => ("vpextrw", [R32OrMem, XmmReg, Imm8], UInt16, Unknown, []),
    VEX_Vpextrw_r64m16_xmm_imm8 => ("vpextrw", [R64OrMem, XmmReg, Imm8], UInt16, Unknown, []),
    EVEX_Vpextrb_r32m8_xmm_imm8 => ("vpextrb", [R32OrMem, XmmReg, Imm8], UInt8, Unknown, []),
    EVEX_Vpextrb_r64m8_xmm_imm8 => ("vpextrb", [R64OrMem, XmmReg, Imm8], UInt8, Unknown, []),
    EVEX_Vpextrd_rm32_xmm_imm8 => ("vpextrd", [R32OrMem, XmmReg, Imm8], UInt32, Unknown, []),
    EVEX_Vpextrq_rm64_xmm_imm8 => ("vpextrq", [R64OrMem, XmmReg, Imm8], UInt64, Unknown, []),
    EVEX_Vpextrw_r32m16_xmm_imm8 => ("vpextrw", [R32OrMem, XmmReg, Imm8], UInt16, Unknown, []),
    EVEX_Vpextrw_r64m16_xmm_imm8 => ("vpextrw", [R64OrMem, XmmReg, Imm8], UInt16, Unknown, []),
    VEX_Vmovmskps_r32_xmm => ("vmovmskps", [R32Reg, XmmRm], Unknown, Unknown, []),
    VEX_Vmovmskps_r64_xmm => ("vmovmskps", [R64Reg, XmmRm], Unknown, Unknown, []),
    VEX_Vmovmskps_r32_ymm => ("vmovmskps", [R32Reg, YmmRm], Unknown, Unknown, []),
    VEX_Vmovmskps_r64_ymm => ("vmovmskps", [R64Reg, YmmRm], Unknown, Unknown, []),
    VEX_Vmovmskpd_r32_xmm => ("vmovmskpd", [R32Reg, XmmRm], Unknown, Unknown, []),
    VEX_Vmovmskpd_r64_xmm => ("vmovmskpd", [R64Reg, XmmRm], Unknown, Unknown, []),
    VEX_Vmovmskpd_r32_ymm => ("vmovmskpd", [R32Reg, YmmRm], Unknown, Unknown, []),
    VEX_Vmovmskpd_r64_ymm => ("vmovmskpd", [R64Reg, YmmRm], Unknown, Unknown, []),

    // ── SSE / AVX / AVX-512 arithmetic ──────────────────────────────────
    Addps_xmm_xmmm128 => ("addps", [XmmReg, XmmOrMem], Packed128, Unknown, []),
    Cvtsi2sd_xmm_rm32 => ("cvtsi2sd", [XmmReg, R32OrMem], UInt32, Unknown, []),
    Blendvps_xmm_xmmm128 => ("blendvps", [XmmReg, XmmOrMem], Packed128, Unknown, []),
    Blendvpd_xmm_xmmm128 => ("blendvpd", [XmmReg, XmmOrMem], Packed128, Unknown, []),
    Pblendvb_xmm_xmmm128 => ("pblendvb", [XmmReg, XmmOrMem], Packed128, Unknown, []),
    Sha256rnds2_xmm_xmmm128 => ("sha256rnds2", [XmmReg, XmmOrMem], Packed128, Unknown, []),
    VEX_Vaddps_ymm_ymm_ymmm256 => ("vaddps", [YmmReg, YmmVvvv, YmmOrMem], Packed256, Unknown, []),
    VEX_Vblendvps_xmm_xmm_xmmm128_xmm => ("vblendvps", [XmmReg, XmmVvvv, XmmOrMem, XmmIs4], Packed128, Unknown, []),
    VEX_Vblendvps_ymm_ymm_ymmm256_ymm => ("vblendvps", [YmmReg, YmmVvvv, YmmOrMem, YmmIs4], Packed256, Unknown, []),
    VEX_Vpermil2ps_xmm_xmm_xmmm128_xmm_imm4 => ("vpermil2ps", [XmmReg, XmmVvvv, XmmOrMem, XmmIs5, Imm2M2z], Packed128, Unknown, []),
    VEX_Vpermil2ps_ymm_ymm_ymmm256_ymm_imm4 => ("vpermil2ps", [YmmReg, YmmVvvv, YmmOrMem, YmmIs5, Imm2M2z], Packed256, Unknown, []),
    EVEX_Vaddps_xmm_k1z_xmm_xmmm128b32 => ("vaddps", [XmmReg, XmmVvvv, XmmOrMem], Packed128, Broadcast128_Float32, [BROADCAST, OPMASK, ZEROING]),
    EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er => ("vaddps", [ZmmReg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_Float32, [BROADCAST, OPMASK, ZEROING, ROUNDING]),
    EVEX_Vaddpd_ymm_k1z_ymm_ymmm256b64 => ("vaddpd", [YmmReg, YmmVvvv, YmmOrMem], Packed256, Broadcast256_Float64, [BROADCAST, OPMASK, ZEROING]),
    EVEX_Vaddss_xmm_k1z_xmm_xmmm32_er => ("vaddss", [XmmReg, XmmVvvv, XmmOrMem], Float32, Unknown, [OPMASK, ZEROING, ROUNDING]),
    EVEX_Vpaddd_zmm_k1z_zmm_zmmm512b32 => ("vpaddd", [ZmmReg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_UInt32, [BROADCAST, OPMASK, ZEROING]),
    EVEX_Vmaxps_zmm_k1z_zmm_zmmm512b32_sae => ("vmaxps", [ZmmReg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_Float32, [BROADCAST, OPMASK, ZEROING, SAE]),
    EVEX_Vcmpps_kr_k1_zmm_zmmm512b32_imm8_sae => ("vcmpps", [KReg, ZmmVvvv, ZmmOrMem, Imm8], Packed512, Broadcast512_Float32, [BROADCAST, OPMASK, SAE]),
    EVEX_Vcvtsi2sd_xmm_xmm_rm32_er => ("vcvtsi2sd", [XmmReg, XmmVvvv, R32OrMem], UInt32, Unknown, [ROUNDING]),
    EVEX_Vcvtsi2sd_xmm_xmm_rm64_er => ("vcvtsi2sd", [XmmReg, XmmVvvv, R64OrMem], UInt64, Unknown, [ROUNDING]),
    EVEX_Vcvtusi2sd_xmm_xmm_rm32_er => ("vcvtusi2sd", [XmmReg, XmmVvvv, R32OrMem], UInt32, Unknown, [ROUNDING]),
    EVEX_Vcvtusi2sd_xmm_xmm_rm64_er => ("vcvtusi2sd", [XmmReg, XmmVvvv, R64OrMem], UInt64, Unknown, [ROUNDING]),
    EVEX_Vpbroadcastd_xmm_k1z_r32 => ("vpbroadcastd", [XmmReg, R32Rm], Unknown, Unknown, [OPMASK, ZEROING]),
    EVEX_Vp2intersectd_kp1_zmm_zmmm512b32 => ("vp2intersectd", [Kp1Reg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_UInt32, [BROADCAST]),
    EVEX_V4fmaddps_zmm_k1z_zmmp3_m128 => ("v4fmaddps", [ZmmReg, Zmmp3Vvvv, Mem], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_Vp4dpwssd_zmm_k1z_zmmp3_m128 => ("vp4dpwssd", [ZmmReg, Zmmp3Vvvv, Mem], Packed128, Unknown, [OPMASK, ZEROING]),
    EVEX_V4fmaddss_xmm_k1z_xmmp3_m128 => ("v4fmaddss", [XmmReg, Xmmp3Vvvv, Mem], Packed128, Unknown, [OPMASK, ZEROING]),

    // ── Gather / scatter ────────────────────────────────────────────────
    VEX_Vgatherdps_xmm_vm32x_xmm => ("vgatherdps", [XmmReg, MemVsib32x, XmmVvvv], Float32, Unknown, []),
    VEX_Vpgatherqq_xmm_vm64x_xmm => ("vpgatherqq", [XmmReg, MemVsib64x, XmmVvvv], UInt64, Unknown, []),
    VEX_Vgatherdps_ymm_vm32y_ymm => ("vgatherdps", [YmmReg, MemVsib32y, YmmVvvv], Float32, Unknown, []),
    VEX_Vpgatherqq_ymm_vm64y_ymm => ("vpgatherqq", [YmmReg, MemVsib64y, YmmVvvv], UInt64, Unknown, []),
    EVEX_Vgatherdps_zmm_k1_vm32z => ("vgatherdps", [ZmmReg, MemVsib32z], Float32, Unknown, [OPMASK]),
    EVEX_Vscatterqpd_vm64z_k1_zmm => ("vscatterqpd", [MemVsib64z, ZmmReg], Float64, Unknown, [OPMASK]),

    // ── Opmask ──────────────────────────────────────────────────────────
    Kmovw_kr_km16 => ("kmovw", [KReg, KOrMem], UInt16, Unknown, []),
    Kmovw_r32_kr => ("kmovw", [R32Reg, KRm], Unknown, Unknown, []),
    Kandw_kr_kr_kr => ("kandw", [KReg, KVvvv, KRm], Unknown, Unknown, []),
    Kortestw_kr_kr => ("kortestw", [KReg, KRm], Unknown, Unknown, []),
    EVEX_Vfpclassps_kr_k1_xmmm128b32_imm8 => ("vfpclassps", [KReg, XmmOrMem, Imm8], Packed128, Broadcast128_Float32, [BROADCAST, OPMASK]),
    EVEX_Vfpclassps_kr_k1_ymmm256b32_imm8 => ("vfpclassps", [KReg, YmmOrMem, Imm8], Packed256, Broadcast256_Float32, [BROADCAST, OPMASK]),
    EVEX_Vfpclassps_kr_k1_zmmm512b32_imm8 => ("vfpclassps", [KReg, ZmmOrMem, Imm8], Packed512, Broadcast512_Float32, [BROADCAST, OPMASK]),
    EVEX_Vfpclasspd_kr_k1_xmmm128b64_imm8 => ("vfpclasspd", [KReg, XmmOrMem, Imm8], Packed128, Broadcast128_Float64, [BROADCAST, OPMASK]),
    EVEX_Vfpclasspd_kr_k1_ymmm256b64_imm8 => ("vfpclasspd", [KReg, YmmOrMem, Imm8], Packed256, Broadcast256_Float64, [BROADCAST, OPMASK]),
    EVEX_Vfpclasspd_kr_k1_zmmm512b64_imm8 => ("vfpclasspd", [KReg, ZmmOrMem, Imm8], Packed512, Broadcast512_Float64, [BROADCAST, OPMASK]),
    EVEX_Vfpclassss_kr_k1_xmmm32_imm8 => ("vfpclassss", [KReg, XmmOrMem, Imm8], Float32, Unknown, [OPMASK]),
    EVEX_Vfpclasssd_kr_k1_xmmm64_imm8 => ("vfpclasssd", [KReg, XmmOrMem, Imm8], Float64, Unknown, [OPMASK]),
    EVEX_Vptestmb_kr_k1_xmm_xmmm128 => ("vptestmb", [KReg, XmmVvvv, XmmOrMem], Packed128, Unknown, [OPMASK]),
    EVEX_Vptestmb_kr_k1_ymm_ymmm256 => ("vptestmb", [KReg, YmmVvvv, YmmOrMem], Packed256, Unknown, [OPMASK]),
    EVEX_Vptestmb_kr_k1_zmm_zmmm512 => ("vptestmb", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Unknown, [OPMASK]),
    EVEX_Vptestmw_kr_k1_xmm_xmmm128 => ("vptestmw", [KReg, XmmVvvv, XmmOrMem], Packed128, Unknown, [OPMASK]),
    EVEX_Vptestmw_kr_k1_ymm_ymmm256 => ("vptestmw", [KReg, YmmVvvv, YmmOrMem], Packed256, Unknown, [OPMASK]),
    EVEX_Vptestmw_kr_k1_zmm_zmmm512 => ("vptestmw", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Unknown, [OPMASK]),
    EVEX_Vptestnmb_kr_k1_xmm_xmmm128 => ("vptestnmb", [KReg, XmmVvvv, XmmOrMem], Packed128, Unknown, [OPMASK]),
    EVEX_Vptestnmb_kr_k1_ymm_ymmm256 => ("vptestnmb", [KReg, YmmVvvv, YmmOrMem], Packed256, Unknown, [OPMASK]),
    EVEX_Vptestnmb_kr_k1_zmm_zmmm512 => ("vptestnmb", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Unknown, [OPMASK]),
    EVEX_Vptestnmw_kr_k1_xmm_xmmm128 => ("vptestnmw", [KReg, XmmVvvv, XmmOrMem], Packed128, Unknown, [OPMASK]),
    EVEX_Vptestnmw_kr_k1_ymm_ymmm256 => ("vptestnmw", [KReg, YmmVvvv, YmmOrMem], Packed256, Unknown, [OPMASK]),
    EVEX_Vptestnmw_kr_k1_zmm_zmmm512 => ("vptestnmw", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Unknown, [OPMASK]),
    EVEX_Vptestmd_kr_k1_xmm_xmmm128b32 => ("vptestmd", [KReg, XmmVvvv, XmmOrMem], Packed128, Broadcast128_UInt32, [BROADCAST, OPMASK]),
    EVEX_Vptestmd_kr_k1_ymm_ymmm256b32 => ("vptestmd", [KReg, YmmVvvv, YmmOrMem], Packed256, Broadcast256_UInt32, [BROADCAST, OPMASK]),
    EVEX_Vptestmd_kr_k1_zmm_zmmm512b32 => ("vptestmd", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_UInt32, [BROADCAST, OPMASK]),
    EVEX_Vptestmq_kr_k1_xmm_xmmm128b64 => ("vptestmq", [KReg, XmmVvvv, XmmOrMem], Packed128, Broadcast128_UInt64, [BROADCAST, OPMASK]),
    EVEX_Vptestmq_kr_k1_ymm_ymmm256b64 => ("vptestmq", [KReg, YmmVvvv, YmmOrMem], Packed256, Broadcast256_UInt64, [BROADCAST, OPMASK]),
    EVEX_Vptestmq_kr_k1_zmm_zmmm512b64 => ("vptestmq", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_UInt64, [BROADCAST, OPMASK]),
    EVEX_Vptestnmd_kr_k1_xmm_xmmm128b32 => ("vptestnmd", [KReg, XmmVvvv, XmmOrMem], Packed128, Broadcast128_UInt32, [BROADCAST, OPMASK]),
    EVEX_Vptestnmd_kr_k1_ymm_ymmm256b32 => ("vptestnmd", [KReg, YmmVvvv, YmmOrMem], Packed256, Broadcast256_UInt32, [BROADCAST, OPMASK]),
    EVEX_Vptestnmd_kr_k1_zmm_zmmm512b32 => ("vptestnmd", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_UInt32, [BROADCAST, OPMASK]),
    EVEX_Vptestnmq_kr_k1_xmm_xmmm128b64 => ("vptestnmq", [KReg, XmmVvvv, XmmOrMem], Packed128, Broadcast128_UInt64, [BROADCAST, OPMASK]),
    EVEX_Vptestnmq_kr_k1_ymm_ymmm256b64 => ("vptestnmq", [KReg, YmmVvvv, YmmOrMem], Packed256, Broadcast256_UInt64, [BROADCAST, OPMASK]),
    EVEX_Vptestnmq_kr_k1_zmm_zmmm512b64 => ("vptestnmq", [KReg, ZmmVvvv, ZmmOrMem], Packed512, Broadcast512_UInt64, [BROADCAST, OPMASK]),

    // ── MPX ─────────────────────────────────────────────────────────────
    Bndmk_bnd_m64 => ("bndmk", [BndReg, MemMpx], UInt64, Unknown, []),
    Bndcl_bnd_rm64 => ("bndcl", [BndReg, R64OrMemMpx], UInt64, Unknown, []),
    Bndcu_bnd_rm32 => ("bndcu", [BndReg, R32OrMemMpx], UInt32, Unknown, []),
    Bndmov_bnd_bndm128 => ("bndmov", [BndReg, BndOrMemMpx], UInt128, Unknown, []),
    Bndmov_bndm128_bnd => ("bndmov", [BndOrMemMpx, BndReg], UInt128, Unknown, []),
    Bndldx_bnd_mib => ("bndldx", [BndReg, MemMpx], Unknown, Unknown, []),
    Bndstx_mib_bnd => ("bndstx", [MemMpx, BndReg], Unknown, Unknown, []),

    // ── AMX ─────────────────────────────────────────────────────────────
    Tileloadd_tmm_sibmem => ("tileloadd", [TmmReg, Sibmem], Unknown, Unknown, []),
    Tdpbssd_tmm_tmm_tmm => ("tdpbssd", [TmmReg, TmmRm, TmmVvvv], Unknown, Unknown, []),
}

impl Code {
    /// Number of opcodes.
    pub const COUNT: usize = OP_CODES.len();

    /// Static operand metadata for this opcode.
    pub fn op_code(self) -> &'static OpCodeInfo {
        &OP_CODES[self as usize]
    }

    /// Every opcode, in declaration order.
    pub fn values() -> impl Iterator<Item = Code> {
        OP_CODES.iter().map(|info| info.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_discriminant() {
        for (i, info) in OP_CODES.iter().enumerate() {
            assert_eq!(info.code as usize, i, "{:?} out of place", info.code);
        }
    }

    #[test]
    fn every_opcode_has_a_mnemonic_and_at_most_five_operands() {
        for code in Code::values() {
            let info = code.op_code();
            assert!(!info.mnemonic().is_empty(), "{code:?}");
            assert!(info.op_count() <= 5, "{code:?}");
        }
    }

    #[test]
    fn broadcast_capable_opcodes_have_a_broadcast_size() {
        for code in Code::values() {
            let info = code.op_code();
            assert_eq!(
                info.can_broadcast(),
                info.broadcast_memory_size().is_broadcast(),
                "{code:?}"
            );
        }
    }

    #[test]
    fn zeroing_implies_opmask() {
        for code in Code::values() {
            let info = code.op_code();
            if info.can_use_zeroing_masking() {
                assert!(info.can_use_op_mask_register(), "{code:?}");
            }
        }
    }

    #[test]
    fn capability_queries() {
        let info = Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er.op_code();
        assert!(info.can_broadcast());
        assert!(info.can_use_rounding_control());
        assert!(!info.can_suppress_all_exceptions());
        assert_eq!(info.op_kind(2), OperandKind::ZmmOrMem);
        assert!(Code::Call_rel32_64.op_code().is_call());
        assert!(Code::Retnq.op_code().is_branch());
        assert!(!Code::DeclareByte.op_code().is_instruction());
    }

    #[test]
    #[should_panic(expected = "operand 2 out of range")]
    fn op_kind_out_of_range_panics() {
        let _ = Code::Add_rm32_r32.op_code().op_kind(2);
    }
}
