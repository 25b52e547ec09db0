//! Operand kind tags: the static per-opcode shape and the live per-instance kind.

use crate::error::OperandCategory;
use crate::register::{Register, RegisterClass};

/// How one operand of an opcode is encoded and interpreted.
///
/// This is a static property of the opcode: every operand position of a
/// [`Code`](crate::Code) has exactly one kind, fixed in the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandKind {
    // ── Far pointers and memory shapes ──
    /// `ptr16:16` far branch target.
    FarBr2_2,
    /// `ptr16:32` far branch target.
    FarBr4_2,
    /// `moffs` absolute memory offset.
    MemOffs,
    /// Plain memory (ModRM.mod != 11).
    Mem,
    /// MPX memory (no 16-bit addressing).
    MemMpx,
    /// MPX `mib` memory (base + index, no scale).
    MemMib,
    /// VSIB with 32-bit xmm indices.
    MemVsib32x,
    /// VSIB with 64-bit xmm indices.
    MemVsib64x,
    /// VSIB with 32-bit ymm indices.
    MemVsib32y,
    /// VSIB with 64-bit ymm indices.
    MemVsib64y,
    /// VSIB with 32-bit zmm indices.
    MemVsib32z,
    /// VSIB with 64-bit zmm indices.
    MemVsib64z,

    // ── Register-or-memory (ModRM.rm) ──
    R8OrMem,
    R16OrMem,
    R32OrMem,
    R32OrMemMpx,
    R64OrMem,
    R64OrMemMpx,
    MmOrMem,
    XmmOrMem,
    YmmOrMem,
    ZmmOrMem,
    BndOrMemMpx,
    KOrMem,

    // ── General-purpose registers ──
    /// 8-bit GPR in ModRM.reg.
    R8Reg,
    /// 8-bit GPR in the low opcode bits.
    R8Opcode,
    R16Reg,
    /// 16-bit GPR in ModRM.reg where ModRM.rm may be a memory operand.
    R16RegMem,
    R16Rm,
    R16Opcode,
    R32Reg,
    R32RegMem,
    R32Rm,
    R32Opcode,
    /// 32-bit GPR in VEX.vvvv.
    R32Vvvv,
    R64Reg,
    R64RegMem,
    R64Rm,
    R64Opcode,
    R64Vvvv,

    // ── Other register files ──
    SegReg,
    KReg,
    /// Opmask pair `k+1`.
    Kp1Reg,
    KRm,
    KVvvv,
    MmReg,
    MmRm,
    XmmReg,
    XmmRm,
    XmmVvvv,
    /// Four consecutive xmm registers `xmm+3`.
    Xmmp3Vvvv,
    /// xmm register in imm8[7:4].
    XmmIs4,
    /// xmm register in imm8[7:4] with imm8[1:0] as an extra immediate.
    XmmIs5,
    YmmReg,
    YmmRm,
    YmmVvvv,
    YmmIs4,
    YmmIs5,
    ZmmReg,
    ZmmRm,
    ZmmVvvv,
    /// Four consecutive zmm registers `zmm+3`.
    Zmmp3Vvvv,
    CrReg,
    DrReg,
    TrReg,
    BndReg,

    // ── Fixed implicit registers ──
    Es,
    Cs,
    Ss,
    Ds,
    Fs,
    Gs,
    Al,
    Cl,
    Ax,
    Dx,
    Eax,
    Rax,
    /// Top of the x87 stack.
    St0,
    /// x87 stack slot selected by the low opcode bits.
    StiOpcode,

    // ── Immediates ──
    /// 2-bit immediate in imm8[1:0] (`vpermil2ps`).
    Imm2M2z,
    Imm8,
    /// The constant `1` (`shl r/m32, 1`).
    Imm8Const1,
    Imm8Sex16,
    Imm8Sex32,
    Imm8Sex64,
    Imm16,
    Imm32,
    Imm32Sex64,
    Imm64,

    // ── Implicit string pointers ──
    /// `seg:[rSI]`.
    SegRSI,
    /// `es:[rDI]`.
    EsRDI,
    /// `seg:[rDI]` (`maskmovq`).
    SegRDI,
    /// `seg:[rBX+al]` (`xlatb`).
    SegRBXAl,

    // ── Branch targets ──
    Br16_1,
    Br32_1,
    Br64_1,
    Br16_2,
    Br32_4,
    Br64_4,
    Xbegin2,
    Xbegin4,
    /// `jmpe disp16`.
    BrDisp2,
    /// `jmpe disp32`.
    BrDisp4,

    // ── AMX ──
    /// SIB memory with mandatory index (`tileloadd`).
    Sibmem,
    TmmReg,
    TmmRm,
    TmmVvvv,
}

impl OperandKind {
    /// Whether this kind is one of the implicit string pointers that
    /// suppress every operand of the instruction.
    pub fn suppresses_operands(self) -> bool {
        matches!(
            self,
            OperandKind::SegRSI | OperandKind::EsRDI | OperandKind::SegRBXAl
        )
    }

    /// Whether a live instance of this kind may be a memory operand.
    pub fn accepts_memory(self) -> bool {
        matches!(
            self,
            OperandKind::MemOffs
                | OperandKind::Mem
                | OperandKind::MemMpx
                | OperandKind::MemMib
                | OperandKind::MemVsib32x
                | OperandKind::MemVsib64x
                | OperandKind::MemVsib32y
                | OperandKind::MemVsib64y
                | OperandKind::MemVsib32z
                | OperandKind::MemVsib64z
                | OperandKind::R8OrMem
                | OperandKind::R16OrMem
                | OperandKind::R32OrMem
                | OperandKind::R32OrMemMpx
                | OperandKind::R64OrMem
                | OperandKind::R64OrMemMpx
                | OperandKind::MmOrMem
                | OperandKind::XmmOrMem
                | OperandKind::YmmOrMem
                | OperandKind::ZmmOrMem
                | OperandKind::BndOrMemMpx
                | OperandKind::KOrMem
                | OperandKind::R16RegMem
                | OperandKind::R32RegMem
                | OperandKind::R64RegMem
                | OperandKind::Sibmem
        )
    }

    /// Whether a live instance of this kind must be a memory operand.
    pub fn requires_memory(self) -> bool {
        matches!(
            self,
            OperandKind::MemOffs
                | OperandKind::Mem
                | OperandKind::MemMpx
                | OperandKind::MemMib
                | OperandKind::MemVsib32x
                | OperandKind::MemVsib64x
                | OperandKind::MemVsib32y
                | OperandKind::MemVsib64y
                | OperandKind::MemVsib32z
                | OperandKind::MemVsib64z
                | OperandKind::Sibmem
        )
    }
}

/// Concrete kind of one operand of a live [`Instruction`](crate::Instruction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpKind {
    /// A register.
    #[default]
    Register,
    NearBranch16,
    NearBranch32,
    NearBranch64,
    FarBranch16,
    FarBranch32,
    Immediate8,
    /// Second 8-bit immediate (`enter`, `extrq`).
    Immediate8_2nd,
    Immediate16,
    Immediate32,
    Immediate64,
    /// 8-bit immediate sign-extended to 16 bits.
    Immediate8to16,
    Immediate8to32,
    Immediate8to64,
    /// 32-bit immediate sign-extended to 64 bits.
    Immediate32to64,
    /// The instruction's memory operand.
    Memory,
}

impl OpKind {
    /// Whether this is any immediate kind.
    pub fn is_immediate(self) -> bool {
        matches!(
            self,
            OpKind::Immediate8
                | OpKind::Immediate8_2nd
                | OpKind::Immediate16
                | OpKind::Immediate32
                | OpKind::Immediate64
                | OpKind::Immediate8to16
                | OpKind::Immediate8to32
                | OpKind::Immediate8to64
                | OpKind::Immediate32to64
        )
    }
}

impl OperandKind {
    /// Register file a register operand of this kind draws from.
    ///
    /// Fixed registers report their own class; use
    /// [`fixed_register`](Self::fixed_register) to tell them apart.
    pub fn register_class(self) -> Option<RegisterClass> {
        use OperandKind as K;
        Some(match self {
            K::R8OrMem | K::R8Reg | K::R8Opcode | K::Al | K::Cl => RegisterClass::Gpr8,
            K::R16OrMem | K::R16Reg | K::R16RegMem | K::R16Rm | K::R16Opcode | K::Ax | K::Dx => {
                RegisterClass::Gpr16
            }
            K::R32OrMem
            | K::R32OrMemMpx
            | K::R32Reg
            | K::R32RegMem
            | K::R32Rm
            | K::R32Opcode
            | K::R32Vvvv
            | K::Eax => RegisterClass::Gpr32,
            K::R64OrMem
            | K::R64OrMemMpx
            | K::R64Reg
            | K::R64RegMem
            | K::R64Rm
            | K::R64Opcode
            | K::R64Vvvv
            | K::Rax => RegisterClass::Gpr64,
            K::SegReg | K::Es | K::Cs | K::Ss | K::Ds | K::Fs | K::Gs => RegisterClass::Segment,
            K::St0 | K::StiOpcode => RegisterClass::St,
            K::MmOrMem | K::MmReg | K::MmRm => RegisterClass::Mm,
            K::XmmOrMem
            | K::XmmReg
            | K::XmmRm
            | K::XmmVvvv
            | K::Xmmp3Vvvv
            | K::XmmIs4
            | K::XmmIs5 => RegisterClass::Xmm,
            K::YmmOrMem | K::YmmReg | K::YmmRm | K::YmmVvvv | K::YmmIs4 | K::YmmIs5 => {
                RegisterClass::Ymm
            }
            K::ZmmOrMem | K::ZmmReg | K::ZmmRm | K::ZmmVvvv | K::Zmmp3Vvvv => RegisterClass::Zmm,
            K::KOrMem | K::KReg | K::Kp1Reg | K::KRm | K::KVvvv => RegisterClass::K,
            K::BndOrMemMpx | K::BndReg => RegisterClass::Bnd,
            K::CrReg => RegisterClass::Cr,
            K::DrReg => RegisterClass::Dr,
            K::TrReg => RegisterClass::Tr,
            K::TmmReg | K::TmmRm | K::TmmVvvv => RegisterClass::Tmm,
            _ => return None,
        })
    }

    /// The one register an implicit-register kind always names.
    pub fn fixed_register(self) -> Option<Register> {
        use OperandKind as K;
        Some(match self {
            K::Es => Register::Es,
            K::Cs => Register::Cs,
            K::Ss => Register::Ss,
            K::Ds => Register::Ds,
            K::Fs => Register::Fs,
            K::Gs => Register::Gs,
            K::Al => Register::Al,
            K::Cl => Register::Cl,
            K::Ax => Register::Ax,
            K::Dx => Register::Dx,
            K::Eax => Register::Eax,
            K::Rax => Register::Rax,
            K::St0 => Register::St0,
            _ => return None,
        })
    }

    /// What a live operand of this kind holds.
    pub fn category(self) -> OperandCategory {
        use OperandKind as K;
        match self {
            K::FarBr2_2 | K::FarBr4_2 => OperandCategory::FarBranch,
            K::Br16_1
            | K::Br32_1
            | K::Br64_1
            | K::Br16_2
            | K::Br32_4
            | K::Br64_4
            | K::Xbegin2
            | K::Xbegin4
            | K::BrDisp2
            | K::BrDisp4 => OperandCategory::NearBranch,
            K::Imm2M2z
            | K::Imm8
            | K::Imm8Sex16
            | K::Imm8Sex32
            | K::Imm8Sex64
            | K::Imm16
            | K::Imm32
            | K::Imm32Sex64
            | K::Imm64 => OperandCategory::Immediate,
            K::Imm8Const1 | K::SegRSI | K::EsRDI | K::SegRDI | K::SegRBXAl => {
                OperandCategory::Implicit
            }
            _ if self.fixed_register().is_some() => OperandCategory::Implicit,
            _ if self.requires_memory() => OperandCategory::Memory,
            _ => OperandCategory::Register,
        }
    }

    /// Whether this kind is an implicit string pointer (`[rsi]`, `es:[rdi]`).
    pub fn is_string_pointer(self) -> bool {
        matches!(
            self,
            OperandKind::SegRSI | OperandKind::EsRDI | OperandKind::SegRDI | OperandKind::SegRBXAl
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_pointers_suppress_operands() {
        assert!(OperandKind::SegRSI.suppresses_operands());
        assert!(OperandKind::EsRDI.suppresses_operands());
        assert!(OperandKind::SegRBXAl.suppresses_operands());
        assert!(!OperandKind::SegRDI.suppresses_operands());
    }

    #[test]
    fn memory_acceptance() {
        assert!(OperandKind::XmmOrMem.accepts_memory());
        assert!(!OperandKind::XmmOrMem.requires_memory());
        assert!(OperandKind::MemVsib32z.requires_memory());
        assert!(!OperandKind::XmmReg.accepts_memory());
    }

    #[test]
    fn register_classes() {
        assert_eq!(OperandKind::R32RegMem.register_class(), Some(RegisterClass::Gpr32));
        assert_eq!(OperandKind::Kp1Reg.register_class(), Some(RegisterClass::K));
        assert_eq!(OperandKind::Eax.fixed_register(), Some(Register::Eax));
        assert_eq!(OperandKind::StiOpcode.fixed_register(), None);
        assert_eq!(OperandKind::Imm8.register_class(), None);
    }

    #[test]
    fn categories() {
        assert_eq!(OperandKind::Mem.category(), OperandCategory::Memory);
        assert_eq!(OperandKind::XmmOrMem.category(), OperandCategory::Register);
        assert_eq!(OperandKind::Cl.category(), OperandCategory::Implicit);
        assert_eq!(OperandKind::Imm8Const1.category(), OperandCategory::Implicit);
        assert_eq!(OperandKind::Xbegin4.category(), OperandCategory::NearBranch);
        assert_eq!(OperandKind::FarBr4_2.category(), OperandCategory::FarBranch);
    }

    #[test]
    fn immediate_kinds() {
        assert!(OpKind::Immediate32to64.is_immediate());
        assert!(!OpKind::Memory.is_immediate());
        assert!(!OpKind::NearBranch64.is_immediate());
    }
}
