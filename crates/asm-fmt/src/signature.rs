//! Reference-manual style opcode signatures (`ADD r/m32, r32`).

use alloc::string::String;
use core::fmt::Write as _;

use crate::code::{Code, OpCodeInfo};
use crate::index::{IndexState, MemoryShape, OperandLayout, OperandShape, Suffix};
use crate::memory_size::MemorySize;
use crate::quirks::OpCodeQuirks;
use crate::register::RegisterClass;

/// Renders the static signature of one opcode.
///
/// Register classes print lowercase with their disambiguation suffix, fixed
/// registers uppercase, register-or-memory operands as `xmm2/m128`, and
/// broadcastable memory as `m512/m32bcst`.
#[derive(Debug)]
pub struct SignatureFormatter {
    layout: OperandLayout,
    state: IndexState,
    out: String,
}

impl SignatureFormatter {
    pub fn new(code: Code) -> Self {
        let layout = OperandLayout::new(code);
        SignatureFormatter {
            state: layout.initial_state(),
            layout,
            out: String::new(),
        }
    }

    /// Consumes the formatter and returns the signature.
    pub fn format(mut self) -> String {
        let info = self.layout.info();
        if !info.is_instruction() {
            return String::from(match info.code() {
                Code::DeclareByte => "<db>",
                Code::DeclareWord => "<dw>",
                Code::DeclareDword => "<dd>",
                Code::DeclareQword => "<dq>",
                _ => "<invalid>",
            });
        }

        if self.layout.quirks().contains(OpCodeQuirks::RETF_AS_RET) {
            self.out.push_str("RET");
        } else {
            self.write_upper(info.mnemonic());
        }

        let (start, end) = (self.layout.start(), self.layout.end());
        if start < end {
            self.out.push(' ');
            let sae_er = self.layout.sae_er_index();
            let mut add_comma = false;
            for operand in start..end {
                if add_comma {
                    self.out.push_str(", ");
                }
                add_comma = true;

                let shape = self.layout.shape(operand, &mut self.state);
                if shape == OperandShape::StringPointer {
                    add_comma = false;
                } else {
                    self.write_shape(shape);
                }

                if operand == 0 && info.can_use_op_mask_register() {
                    let k = self.layout.mask_decorator(&mut self.state);
                    let _ = write!(self.out, " {{k{k}}}");
                    if info.can_use_zeroing_masking() {
                        self.out.push_str("{z}");
                    }
                }
                if Some(operand) == sae_er {
                    if info.can_suppress_all_exceptions() {
                        self.out.push_str("{sae}");
                    }
                    if info.can_use_rounding_control()
                        && !self.layout.quirks().contains(OpCodeQuirks::NO_ER_DECORATOR)
                    {
                        self.out.push_str("{er}");
                    }
                }
            }
        }

        let quirks = self.layout.quirks();
        if quirks.contains(OpCodeQuirks::APPEND_XMM0) {
            self.out.push_str(", <XMM0>");
        } else if quirks.contains(OpCodeQuirks::APPEND_EDX_EAX) {
            self.out.push_str(", <edx>, <eax>");
        }

        self.out
    }

    fn write_shape(&mut self, shape: OperandShape) {
        match shape {
            OperandShape::Register { class, suffix, span } => {
                self.write_class(class, suffix);
                if span != 0 {
                    let _ = write!(self.out, "+{span}");
                }
            }
            OperandShape::RegisterOrMemory { class, suffix } => {
                if let Some(bits) = gpr_bits(class) {
                    self.out.push('r');
                    let memory_bits = self.layout.info().memory_size().size() * 8;
                    if memory_bits != bits {
                        let _ = write!(self.out, "{bits}");
                    }
                } else {
                    self.write_class(class, suffix);
                }
                self.out.push('/');
                self.write_memory();
            }
            OperandShape::Fixed(register) => self.write_upper(register.name()),
            OperandShape::St { sti, bare } => {
                self.out.push_str("ST");
                if !bare {
                    self.out.push_str(if sti { "(i)" } else { "(0)" });
                }
            }
            OperandShape::Memory(MemoryShape::Offset) => {
                self.out.push_str("moffs");
                self.write_memory_size(self.layout.info().memory_size());
            }
            OperandShape::Memory(memory) => match memory.token() {
                Some(token) => self.out.push_str(token),
                None => self.write_memory(),
            },
            OperandShape::FarBranch { offset_bits } => {
                let _ = write!(self.out, "ptr16:{offset_bits}");
            }
            OperandShape::NearBranch { displacement_bytes, absolute, .. } => {
                let prefix = if absolute { "disp" } else { "rel" };
                let _ = write!(self.out, "{prefix}{}", u32::from(displacement_bytes) * 8);
            }
            OperandShape::Immediate(immediate) => self.out.push_str(immediate.token()),
            OperandShape::StringPointer => {}
        }
    }

    fn write_class(&mut self, class: RegisterClass, suffix: Suffix) {
        self.out.push_str(class.signature_token());
        match suffix {
            Suffix::None => {}
            Suffix::Number(n) => {
                let _ = write!(self.out, "{n}");
            }
            Suffix::Letter(c) => self.out.push(c),
        }
    }

    fn write_memory(&mut self) {
        let info = self.layout.info();
        self.out.push('m');
        self.write_memory_size(info.memory_size());
        if info.can_broadcast() {
            self.out.push_str("/m");
            self.write_memory_size(info.broadcast_memory_size());
            self.out.push_str("bcst");
        }
    }

    fn write_memory_size(&mut self, size: MemorySize) {
        let info = self.layout.info();
        if self.layout.quirks().contains(OpCodeQuirks::MEM_2BYTE) {
            self.out.push_str("2byte");
            return;
        }
        let sgdt = self.layout.quirks().contains(OpCodeQuirks::SGDT_SIDT);
        match size {
            MemorySize::Bound16_WordWord => self.out.push_str("16&16"),
            MemorySize::Bound32_DwordDword => self.out.push_str("32&32"),
            MemorySize::FpuEnv14 => self.out.push_str("14byte"),
            MemorySize::FpuEnv28 => self.out.push_str("28byte"),
            MemorySize::FpuState94 => self.out.push_str("94byte"),
            MemorySize::FpuState108 => self.out.push_str("108byte"),
            MemorySize::Fxsave_512Byte | MemorySize::Fxsave64_512Byte => {
                self.out.push_str("512byte");
            }
            // "m" is already written
            MemorySize::Xsave | MemorySize::Xsave64 => self.out.push_str("em"),
            MemorySize::SegPtr16 => self.out.push_str("16:16"),
            MemorySize::SegPtr32 => self.out.push_str("16:32"),
            MemorySize::SegPtr64 => self.out.push_str("16:64"),
            MemorySize::Fword6 if !sgdt => self.out.push_str("16&32"),
            MemorySize::Fword10 if !sgdt => self.out.push_str("16&64"),
            MemorySize::Fword6 | MemorySize::Fword10 => {}
            _ => {
                let bytes = size.size();
                if bytes != 0 {
                    let _ = write!(self.out, "{}", bytes * 8);
                }
            }
        }

        if info.is_fpu() {
            match size {
                MemorySize::Int16 | MemorySize::Int32 | MemorySize::Int64 => {
                    self.out.push_str("int");
                }
                MemorySize::Float32 | MemorySize::Float64 | MemorySize::Float80 => {
                    self.out.push_str("fp");
                }
                MemorySize::Bcd => self.out.push_str("bcd"),
                _ => {}
            }
        }
    }

    fn write_upper(&mut self, text: &str) {
        self.out.extend(text.chars().map(|c| c.to_ascii_uppercase()));
    }
}

fn gpr_bits(class: RegisterClass) -> Option<usize> {
    match class {
        RegisterClass::Gpr8 => Some(8),
        RegisterClass::Gpr16 => Some(16),
        RegisterClass::Gpr32 => Some(32),
        RegisterClass::Gpr64 => Some(64),
        _ => None,
    }
}

impl OpCodeInfo {
    /// Reference-manual signature, e.g. `VADDPS zmm1 {k1}{z}, zmm2, zmm3/m512/m32bcst{er}`.
    pub fn signature(&self) -> String {
        SignatureFormatter::new(self.code()).format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(code: Code) -> String {
        code.op_code().signature()
    }

    #[test]
    fn gpr_forms() {
        assert_eq!(sig(Code::Add_rm32_r32), "ADD r/m32, r32");
        assert_eq!(sig(Code::Mov_r32m16_Sreg), "MOV r32/m16, Sreg");
        assert_eq!(sig(Code::Movzx_r32_rm16), "MOVZX r32, r/m16");
        assert_eq!(sig(Code::Andn_r64_r64_rm64), "ANDN r64a, r64b, r/m64");
    }

    #[test]
    fn evex_decorators() {
        assert_eq!(
            sig(Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er),
            "VADDPS zmm1 {k1}{z}, zmm2, zmm3/m512/m32bcst{er}"
        );
        assert_eq!(
            sig(Code::EVEX_Vcmpps_kr_k1_zmm_zmmm512b32_imm8_sae),
            "VCMPPS k1 {k2}, zmm2, zmm3/m512/m32bcst{sae}, imm8"
        );
        assert_eq!(
            sig(Code::EVEX_Vptestmd_kr_k1_zmm_zmmm512b32),
            "VPTESTMD k2 {k1}, zmm2, zmm3/m512/m32bcst"
        );
    }

    #[test]
    fn rounding_suppressed_for_32bit_integer_source() {
        assert_eq!(
            sig(Code::EVEX_Vcvtsi2sd_xmm_xmm_rm32_er),
            "VCVTSI2SD xmm1, xmm2, r/m32"
        );
        assert_eq!(
            sig(Code::EVEX_Vcvtsi2sd_xmm_xmm_rm64_er),
            "VCVTSI2SD xmm1, xmm2, r/m64{er}"
        );
    }

    #[test]
    fn fpu_forms() {
        assert_eq!(sig(Code::Fld_m80fp), "FLD m80fp");
        assert_eq!(sig(Code::Fild_m16int), "FILD m16int");
        assert_eq!(sig(Code::Fbld_m80bcd), "FBLD m80bcd");
        assert_eq!(sig(Code::Fnstcw_m2byte), "FNSTCW m2byte");
        assert_eq!(sig(Code::Fcom_st0_sti), "FCOM ST(i)");
        assert_eq!(sig(Code::Fcomip_st0_sti), "FCOMIP ST, ST(i)");
        assert_eq!(sig(Code::Fadd_sti_st0), "FADD ST(i), ST(0)");
    }

    #[test]
    fn special_memory_tokens() {
        assert_eq!(sig(Code::Bound_r32_m3232), "BOUND r32, m32&32");
        assert_eq!(sig(Code::Lss_r64_m1664), "LSS r64, m16:64");
        assert_eq!(sig(Code::Lgdt_m1664), "LGDT m16&64");
        assert_eq!(sig(Code::Sgdt_m1632), "SGDT m");
        assert_eq!(sig(Code::Xsave_mem), "XSAVE mem");
        assert_eq!(sig(Code::Fxsave64_m512byte), "FXSAVE64 m512byte");
        assert_eq!(sig(Code::Fnsave_m108byte), "FNSAVE m108byte");
    }

    #[test]
    fn pseudo_opcodes() {
        assert_eq!(sig(Code::INVALID), "<invalid>");
        assert_eq!(sig(Code::DeclareQword), "<dq>");
    }

    #[test]
    fn augmentations() {
        assert_eq!(sig(Code::Blendvps_xmm_xmmm128), "BLENDVPS xmm1, xmm2/m128, <XMM0>");
        assert_eq!(sig(Code::Umwait_r64), "UMWAIT r64, <edx>, <eax>");
    }
}
