//! x86/x64 register file: every register a formatted operand can name.

use core::fmt;

macro_rules! registers {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal ),* $(,)?) => {
        /// An x86/x64 register.
        ///
        /// Variants are laid out class by class in encoding order, so a
        /// register's number inside its class is its distance from the first
        /// register of that class.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u16)]
        pub enum Register {
            $( $(#[$meta])* $variant, )*
        }

        const NAMES: &[&str] = &[$( $name, )*];
        const ALL: &[Register] = &[$( Register::$variant, )*];
    };
}

registers! {
    // -- 8-bit general-purpose registers --
    /// AL: low byte of the accumulator.
    Al => "al", Cl => "cl", Dl => "dl", Bl => "bl",
    /// AH: legacy high byte (not addressable with REX).
    Ah => "ah", Ch => "ch", Dh => "dh", Bh => "bh",
    Spl => "spl", Bpl => "bpl", Sil => "sil", Dil => "dil",
    R8b => "r8b", R9b => "r9b", R10b => "r10b", R11b => "r11b",
    R12b => "r12b", R13b => "r13b", R14b => "r14b", R15b => "r15b",

    // -- 16-bit general-purpose registers --
    Ax => "ax", Cx => "cx", Dx => "dx", Bx => "bx",
    Sp => "sp", Bp => "bp", Si => "si", Di => "di",
    R8w => "r8w", R9w => "r9w", R10w => "r10w", R11w => "r11w",
    R12w => "r12w", R13w => "r13w", R14w => "r14w", R15w => "r15w",

    // -- 32-bit general-purpose registers --
    Eax => "eax", Ecx => "ecx", Edx => "edx", Ebx => "ebx",
    Esp => "esp", Ebp => "ebp", Esi => "esi", Edi => "edi",
    R8d => "r8d", R9d => "r9d", R10d => "r10d", R11d => "r11d",
    R12d => "r12d", R13d => "r13d", R14d => "r14d", R15d => "r15d",

    // -- 64-bit general-purpose registers --
    /// RAX: 64-bit accumulator.
    Rax => "rax", Rcx => "rcx", Rdx => "rdx", Rbx => "rbx",
    /// RSP: 64-bit stack pointer.
    Rsp => "rsp", Rbp => "rbp", Rsi => "rsi", Rdi => "rdi",
    R8 => "r8", R9 => "r9", R10 => "r10", R11 => "r11",
    R12 => "r12", R13 => "r13", R14 => "r14", R15 => "r15",

    // -- Instruction pointers (only valid as a memory base) --
    /// EIP: 32-bit instruction pointer.
    Eip => "eip",
    /// RIP: 64-bit instruction pointer.
    Rip => "rip",

    // -- Segment registers, in encoding order --
    Es => "es", Cs => "cs", Ss => "ss", Ds => "ds", Fs => "fs", Gs => "gs",

    // -- x87 stack --
    St0 => "st0", St1 => "st1", St2 => "st2", St3 => "st3",
    St4 => "st4", St5 => "st5", St6 => "st6", St7 => "st7",

    // -- MMX --
    Mm0 => "mm0", Mm1 => "mm1", Mm2 => "mm2", Mm3 => "mm3",
    Mm4 => "mm4", Mm5 => "mm5", Mm6 => "mm6", Mm7 => "mm7",

    // -- SSE / AVX-512 128-bit --
    Xmm0 => "xmm0", Xmm1 => "xmm1", Xmm2 => "xmm2", Xmm3 => "xmm3",
    Xmm4 => "xmm4", Xmm5 => "xmm5", Xmm6 => "xmm6", Xmm7 => "xmm7",
    Xmm8 => "xmm8", Xmm9 => "xmm9", Xmm10 => "xmm10", Xmm11 => "xmm11",
    Xmm12 => "xmm12", Xmm13 => "xmm13", Xmm14 => "xmm14", Xmm15 => "xmm15",
    Xmm16 => "xmm16", Xmm17 => "xmm17", Xmm18 => "xmm18", Xmm19 => "xmm19",
    Xmm20 => "xmm20", Xmm21 => "xmm21", Xmm22 => "xmm22", Xmm23 => "xmm23",
    Xmm24 => "xmm24", Xmm25 => "xmm25", Xmm26 => "xmm26", Xmm27 => "xmm27",
    Xmm28 => "xmm28", Xmm29 => "xmm29", Xmm30 => "xmm30", Xmm31 => "xmm31",

    // -- AVX / AVX-512 256-bit --
    Ymm0 => "ymm0", Ymm1 => "ymm1", Ymm2 => "ymm2", Ymm3 => "ymm3",
    Ymm4 => "ymm4", Ymm5 => "ymm5", Ymm6 => "ymm6", Ymm7 => "ymm7",
    Ymm8 => "ymm8", Ymm9 => "ymm9", Ymm10 => "ymm10", Ymm11 => "ymm11",
    Ymm12 => "ymm12", Ymm13 => "ymm13", Ymm14 => "ymm14", Ymm15 => "ymm15",
    Ymm16 => "ymm16", Ymm17 => "ymm17", Ymm18 => "ymm18", Ymm19 => "ymm19",
    Ymm20 => "ymm20", Ymm21 => "ymm21", Ymm22 => "ymm22", Ymm23 => "ymm23",
    Ymm24 => "ymm24", Ymm25 => "ymm25", Ymm26 => "ymm26", Ymm27 => "ymm27",
    Ymm28 => "ymm28", Ymm29 => "ymm29", Ymm30 => "ymm30", Ymm31 => "ymm31",

    // -- AVX-512 512-bit --
    Zmm0 => "zmm0", Zmm1 => "zmm1", Zmm2 => "zmm2", Zmm3 => "zmm3",
    Zmm4 => "zmm4", Zmm5 => "zmm5", Zmm6 => "zmm6", Zmm7 => "zmm7",
    Zmm8 => "zmm8", Zmm9 => "zmm9", Zmm10 => "zmm10", Zmm11 => "zmm11",
    Zmm12 => "zmm12", Zmm13 => "zmm13", Zmm14 => "zmm14", Zmm15 => "zmm15",
    Zmm16 => "zmm16", Zmm17 => "zmm17", Zmm18 => "zmm18", Zmm19 => "zmm19",
    Zmm20 => "zmm20", Zmm21 => "zmm21", Zmm22 => "zmm22", Zmm23 => "zmm23",
    Zmm24 => "zmm24", Zmm25 => "zmm25", Zmm26 => "zmm26", Zmm27 => "zmm27",
    Zmm28 => "zmm28", Zmm29 => "zmm29", Zmm30 => "zmm30", Zmm31 => "zmm31",

    // -- AVX-512 opmask --
    /// K0: cannot be used as a write mask.
    K0 => "k0", K1 => "k1", K2 => "k2", K3 => "k3",
    K4 => "k4", K5 => "k5", K6 => "k6", K7 => "k7",

    // -- MPX bounds --
    Bnd0 => "bnd0", Bnd1 => "bnd1", Bnd2 => "bnd2", Bnd3 => "bnd3",

    // -- Control, debug and test registers --
    Cr0 => "cr0", Cr1 => "cr1", Cr2 => "cr2", Cr3 => "cr3",
    Cr4 => "cr4", Cr5 => "cr5", Cr6 => "cr6", Cr7 => "cr7",
    Cr8 => "cr8", Cr9 => "cr9", Cr10 => "cr10", Cr11 => "cr11",
    Cr12 => "cr12", Cr13 => "cr13", Cr14 => "cr14", Cr15 => "cr15",
    Dr0 => "dr0", Dr1 => "dr1", Dr2 => "dr2", Dr3 => "dr3",
    Dr4 => "dr4", Dr5 => "dr5", Dr6 => "dr6", Dr7 => "dr7",
    Dr8 => "dr8", Dr9 => "dr9", Dr10 => "dr10", Dr11 => "dr11",
    Dr12 => "dr12", Dr13 => "dr13", Dr14 => "dr14", Dr15 => "dr15",
    Tr0 => "tr0", Tr1 => "tr1", Tr2 => "tr2", Tr3 => "tr3",
    Tr4 => "tr4", Tr5 => "tr5", Tr6 => "tr6", Tr7 => "tr7",

    // -- AMX tiles --
    Tmm0 => "tmm0", Tmm1 => "tmm1", Tmm2 => "tmm2", Tmm3 => "tmm3",
    Tmm4 => "tmm4", Tmm5 => "tmm5", Tmm6 => "tmm6", Tmm7 => "tmm7",
}

/// Register file a register belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterClass {
    /// 8-bit general-purpose.
    Gpr8,
    /// 16-bit general-purpose.
    Gpr16,
    /// 32-bit general-purpose.
    Gpr32,
    /// 64-bit general-purpose.
    Gpr64,
    /// RIP / EIP.
    InstructionPointer,
    /// ES … GS.
    Segment,
    /// x87 stack.
    St,
    /// MMX.
    Mm,
    /// 128-bit vector.
    Xmm,
    /// 256-bit vector.
    Ymm,
    /// 512-bit vector.
    Zmm,
    /// AVX-512 opmask.
    K,
    /// MPX bound.
    Bnd,
    /// Control register.
    Cr,
    /// Debug register.
    Dr,
    /// Test register.
    Tr,
    /// AMX tile.
    Tmm,
}

impl RegisterClass {
    /// First register of this class.
    pub fn first(self) -> Register {
        match self {
            RegisterClass::Gpr8 => Register::Al,
            RegisterClass::Gpr16 => Register::Ax,
            RegisterClass::Gpr32 => Register::Eax,
            RegisterClass::Gpr64 => Register::Rax,
            RegisterClass::InstructionPointer => Register::Eip,
            RegisterClass::Segment => Register::Es,
            RegisterClass::St => Register::St0,
            RegisterClass::Mm => Register::Mm0,
            RegisterClass::Xmm => Register::Xmm0,
            RegisterClass::Ymm => Register::Ymm0,
            RegisterClass::Zmm => Register::Zmm0,
            RegisterClass::K => Register::K0,
            RegisterClass::Bnd => Register::Bnd0,
            RegisterClass::Cr => Register::Cr0,
            RegisterClass::Dr => Register::Dr0,
            RegisterClass::Tr => Register::Tr0,
            RegisterClass::Tmm => Register::Tmm0,
        }
    }

    /// Last register of this class.
    pub fn last(self) -> Register {
        match self {
            RegisterClass::Gpr8 => Register::R15b,
            RegisterClass::Gpr16 => Register::R15w,
            RegisterClass::Gpr32 => Register::R15d,
            RegisterClass::Gpr64 => Register::R15,
            RegisterClass::InstructionPointer => Register::Rip,
            RegisterClass::Segment => Register::Gs,
            RegisterClass::St => Register::St7,
            RegisterClass::Mm => Register::Mm7,
            RegisterClass::Xmm => Register::Xmm31,
            RegisterClass::Ymm => Register::Ymm31,
            RegisterClass::Zmm => Register::Zmm31,
            RegisterClass::K => Register::K7,
            RegisterClass::Bnd => Register::Bnd3,
            RegisterClass::Cr => Register::Cr15,
            RegisterClass::Dr => Register::Dr15,
            RegisterClass::Tr => Register::Tr7,
            RegisterClass::Tmm => Register::Tmm7,
        }
    }

    /// Whether `reg` belongs to this class.
    pub fn contains(self, reg: Register) -> bool {
        self.first() <= reg && reg <= self.last()
    }

    /// Lowercase class token used in opcode signatures (`r32`, `xmm`, `k`, …).
    pub fn signature_token(self) -> &'static str {
        match self {
            RegisterClass::Gpr8 => "r8",
            RegisterClass::Gpr16 => "r16",
            RegisterClass::Gpr32 => "r32",
            RegisterClass::Gpr64 => "r64",
            RegisterClass::InstructionPointer => "rip",
            RegisterClass::Segment => "Sreg",
            RegisterClass::St => "ST",
            RegisterClass::Mm => "mm",
            RegisterClass::Xmm => "xmm",
            RegisterClass::Ymm => "ymm",
            RegisterClass::Zmm => "zmm",
            RegisterClass::K => "k",
            RegisterClass::Bnd => "bnd",
            RegisterClass::Cr => "cr",
            RegisterClass::Dr => "dr",
            RegisterClass::Tr => "tr",
            RegisterClass::Tmm => "tmm",
        }
    }

    /// Whether this class counts toward the vector disambiguation index.
    pub fn is_vector(self) -> bool {
        matches!(
            self,
            RegisterClass::Mm
                | RegisterClass::Xmm
                | RegisterClass::Ymm
                | RegisterClass::Zmm
                | RegisterClass::Tmm
        )
    }
}

const CLASSES: [RegisterClass; 17] = [
    RegisterClass::Gpr8,
    RegisterClass::Gpr16,
    RegisterClass::Gpr32,
    RegisterClass::Gpr64,
    RegisterClass::InstructionPointer,
    RegisterClass::Segment,
    RegisterClass::St,
    RegisterClass::Mm,
    RegisterClass::Xmm,
    RegisterClass::Ymm,
    RegisterClass::Zmm,
    RegisterClass::K,
    RegisterClass::Bnd,
    RegisterClass::Cr,
    RegisterClass::Dr,
    RegisterClass::Tr,
    RegisterClass::Tmm,
];

impl Register {
    /// Number of registers.
    pub const COUNT: usize = ALL.len();

    /// Every register, in declaration order.
    pub fn all() -> &'static [Register] {
        ALL
    }

    /// Lowercase NASM display name.
    pub fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    /// The register file this register belongs to.
    pub fn class(self) -> RegisterClass {
        let mut found = RegisterClass::Gpr8;
        for class in CLASSES {
            if class.contains(self) {
                found = class;
                break;
            }
        }
        found
    }

    /// Register number inside its class (`Xmm7` → 7, `R9d` → 9).
    pub fn number(self) -> usize {
        self as usize - self.class().first() as usize
    }

    /// `number`-th register of `class`, if it exists.
    pub fn from_class(class: RegisterClass, number: usize) -> Option<Register> {
        let index = class.first() as usize + number;
        if index > class.last() as usize {
            return None;
        }
        ALL.get(index).copied()
    }

    /// Register width in bytes.
    pub fn size(self) -> usize {
        match self.class() {
            RegisterClass::Gpr8 => 1,
            RegisterClass::Gpr16 | RegisterClass::Segment => 2,
            RegisterClass::Gpr32 | RegisterClass::Tr => 4,
            RegisterClass::Gpr64 | RegisterClass::Mm | RegisterClass::K => 8,
            RegisterClass::Cr | RegisterClass::Dr => 8,
            RegisterClass::InstructionPointer => {
                if self == Register::Eip {
                    4
                } else {
                    8
                }
            }
            RegisterClass::St => 10,
            RegisterClass::Xmm | RegisterClass::Bnd => 16,
            RegisterClass::Ymm => 32,
            RegisterClass::Zmm => 64,
            RegisterClass::Tmm => 1024,
        }
    }

    /// Whether this is a general-purpose register of any width.
    pub fn is_gpr(self) -> bool {
        matches!(
            self.class(),
            RegisterClass::Gpr8 | RegisterClass::Gpr16 | RegisterClass::Gpr32 | RegisterClass::Gpr64
        )
    }

    /// Whether this is XMM, YMM or ZMM (usable as a VSIB index).
    pub fn is_vector(self) -> bool {
        matches!(
            self.class(),
            RegisterClass::Xmm | RegisterClass::Ymm | RegisterClass::Zmm
        )
    }

    /// Whether this is a segment register.
    pub fn is_segment(self) -> bool {
        self.class() == RegisterClass::Segment
    }

    /// Segment used when a memory operand with this base has no override.
    pub fn default_segment(self) -> Register {
        match self {
            Register::Bp | Register::Ebp | Register::Rbp | Register::Sp | Register::Esp
            | Register::Rsp => Register::Ss,
            _ => Register::Ds,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
