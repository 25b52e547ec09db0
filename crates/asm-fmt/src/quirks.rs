//! Per-opcode formatting exceptions.
//!
//! Each list below is a closed set of opcodes that share one rendering
//! exception. The lists are kept as literal data: membership is a fact about
//! the opcode, not something derivable from its operand kinds. They are
//! folded at compile time into one bitset per opcode.

use bitflags::bitflags;

use crate::code::Code;

bitflags! {
    /// Rendering exceptions attached to an opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpCodeQuirks: u32 {
        /// Mask indices 1 and 2 are swapped (`k2 {k1}`).
        const OP_MASK_IS_K1 = 1 << 0;
        /// Vector operands are never numbered.
        const NO_VEC_INDEX = 1 << 1;
        /// Vector indices 1 and 2 are swapped.
        const SWAP_VEC_INDEX12 = 1 << 2;
        /// Vector counter starts at 1 instead of 0.
        const PRE_INC_VEC_INDEX = 1 << 3;
        /// Operand 0 (`ST(0)`) is not printed.
        const START_AT_OP1 = 1 << 4;
        /// Operand 0 prints as bare `ST`.
        const ST0_BARE = 1 << 5;
        /// `{er}` is not printed even though rounding is supported.
        const NO_ER_DECORATOR = 1 << 6;
        /// Implicit `XMM0` operand is appended.
        const APPEND_XMM0 = 1 << 7;
        /// Implicit `EDX`, `EAX` operands are appended.
        const APPEND_EDX_EAX = 1 << 8;
        /// Indirect branch that honours a `notrack` (DS) prefix.
        const NOTRACK_BRANCH = 1 << 9;
        /// `rep` prints as `repe`.
        const REPE_CAPABLE = 1 << 10;
        /// Destination `st(i)` is written as `to st(i)`.
        const REGISTER_TO = 1 << 11;
        /// `fword` memory prints as bare `m`.
        const SGDT_SIDT = 1 << 12;
        /// Memory prints as `m2byte`.
        const MEM_2BYTE = 1 << 13;
        /// MPX memory prints as `mib`.
        const MIB = 1 << 14;
        /// Signature mnemonic is `RET`.
        const RETF_AS_RET = 1 << 15;
    }
}

const OP_MASK_IS_K1: &[Code] = &[
    Code::EVEX_Vfpclassps_kr_k1_xmmm128b32_imm8,
    Code::EVEX_Vfpclassps_kr_k1_ymmm256b32_imm8,
    Code::EVEX_Vfpclassps_kr_k1_zmmm512b32_imm8,
    Code::EVEX_Vfpclasspd_kr_k1_xmmm128b64_imm8,
    Code::EVEX_Vfpclasspd_kr_k1_ymmm256b64_imm8,
    Code::EVEX_Vfpclasspd_kr_k1_zmmm512b64_imm8,
    Code::EVEX_Vfpclassss_kr_k1_xmmm32_imm8,
    Code::EVEX_Vfpclasssd_kr_k1_xmmm64_imm8,
    Code::EVEX_Vptestmb_kr_k1_xmm_xmmm128,
    Code::EVEX_Vptestmb_kr_k1_ymm_ymmm256,
    Code::EVEX_Vptestmb_kr_k1_zmm_zmmm512,
    Code::EVEX_Vptestmw_kr_k1_xmm_xmmm128,
    Code::EVEX_Vptestmw_kr_k1_ymm_ymmm256,
    Code::EVEX_Vptestmw_kr_k1_zmm_zmmm512,
    Code::EVEX_Vptestnmb_kr_k1_xmm_xmmm128,
    Code::EVEX_Vptestnmb_kr_k1_ymm_ymmm256,
    Code::EVEX_Vptestnmb_kr_k1_zmm_zmmm512,
    Code::EVEX_Vptestnmw_kr_k1_xmm_xmmm128,
    Code::EVEX_Vptestnmw_kr_k1_ymm_ymmm256,
    Code::EVEX_Vptestnmw_kr_k1_zmm_zmmm512,
    Code::EVEX_Vptestmd_kr_k1_xmm_xmmm128b32,
    Code::EVEX_Vptestmd_kr_k1_ymm_ymmm256b32,
    Code::EVEX_Vptestmd_kr_k1_zmm_zmmm512b32,
    Code::EVEX_Vptestmq_kr_k1_xmm_xmmm128b64,
    Code::EVEX_Vptestmq_kr_k1_ymm_ymmm256b64,
    Code::EVEX_Vptestmq_kr_k1_zmm_zmmm512b64,
    Code::EVEX_Vptestnmd_kr_k1_xmm_xmmm128b32,
    Code::EVEX_Vptestnmd_kr_k1_ymm_ymmm256b32,
    Code::EVEX_Vptestnmd_kr_k1_zmm_zmmm512b32,
    Code::EVEX_Vptestnmq_kr_k1_xmm_xmmm128b64,
    Code::EVEX_Vptestnmq_kr_k1_ymm_ymmm256b64,
    Code::EVEX_Vptestnmq_kr_k1_zmm_zmmm512b64,
];

const PRE_INC_VEC_INDEX: &[Code] = &[
    Code::VEX_Vpextrw_r32m16_xmm_imm8,
    Code::VEX_Vpextrw_r64m16_xmm_imm8,
    Code::EVEX_Vpextrw_r32m16_xmm_imm8,
    Code::EVEX_Vpextrw_r64m16_xmm_imm8,
    Code::VEX_Vmovmskpd_r32_xmm,
    Code::VEX_Vmovmskpd_r64_xmm,
    Code::VEX_Vmovmskpd_r32_ymm,
    Code::VEX_Vmovmskpd_r64_ymm,
    Code::VEX_Vmovmskps_r32_xmm,
    Code::VEX_Vmovmskps_r64_xmm,
    Code::VEX_Vmovmskps_r32_ymm,
    Code::VEX_Vmovmskps_r64_ymm,
    Code::Pextrb_r32m8_xmm_imm8,
    Code::Pextrb_r64m8_xmm_imm8,
    Code::Pextrd_rm32_xmm_imm8,
    Code::Pextrq_rm64_xmm_imm8,
    Code::VEX_Vpextrb_r32m8_xmm_imm8,
    Code::VEX_Vpextrb_r64m8_xmm_imm8,
    Code::VEX_Vpextrd_rm32_xmm_imm8,
    Code::VEX_Vpextrq_rm64_xmm_imm8,
    Code::EVEX_Vpextrb_r32m8_xmm_imm8,
    Code::EVEX_Vpextrb_r64m8_xmm_imm8,
    Code::EVEX_Vpextrd_rm32_xmm_imm8,
    Code::EVEX_Vpextrq_rm64_xmm_imm8,
];

const NO_VEC_INDEX: &[Code] = &[
    Code::Pxor_mm_mmm64,
    Code::Punpckldq_mm_mmm32,
    Code::Punpcklwd_mm_mmm32,
    Code::Punpcklbw_mm_mmm32,
    Code::Punpckhdq_mm_mmm64,
    Code::Punpckhwd_mm_mmm64,
    Code::Punpckhbw_mm_mmm64,
    Code::Psubusb_mm_mmm64,
    Code::Psubusw_mm_mmm64,
    Code::Psubsw_mm_mmm64,
    Code::Psubsb_mm_mmm64,
    Code::Psubd_mm_mmm64,
    Code::Psubw_mm_mmm64,
    Code::Psubb_mm_mmm64,
    Code::Psrlq_mm_imm8,
    Code::Psrlq_mm_mmm64,
    Code::Psrld_mm_imm8,
    Code::Psrld_mm_mmm64,
    Code::Psrlw_mm_imm8,
    Code::Psrlw_mm_mmm64,
    Code::Psrad_mm_imm8,
    Code::Psrad_mm_mmm64,
    Code::Psraw_mm_imm8,
    Code::Psraw_mm_mmm64,
    Code::Psllq_mm_imm8,
    Code::Psllq_mm_mmm64,
    Code::Pslld_mm_imm8,
    Code::Pslld_mm_mmm64,
    Code::Psllw_mm_mmm64,
    Code::Por_mm_mmm64,
    Code::Pmullw_mm_mmm64,
    Code::Pmulhw_mm_mmm64,
    Code::Pmovmskb_r32_mm,
    Code::Pmovmskb_r64_mm,
    Code::Pmovmskb_r32_xmm,
    Code::Pmovmskb_r64_xmm,
    Code::Pmaddwd_mm_mmm64,
    Code::Pinsrw_mm_r32m16_imm8,
    Code::Pinsrw_mm_r64m16_imm8,
    Code::Pinsrw_xmm_r32m16_imm8,
    Code::Pinsrw_xmm_r64m16_imm8,
    Code::Pextrw_r32_xmm_imm8,
    Code::Pextrw_r64_xmm_imm8,
    Code::Pextrw_r32m16_xmm_imm8,
    Code::Pextrw_r64m16_xmm_imm8,
    Code::Pextrw_r32_mm_imm8,
    Code::Pextrw_r64_mm_imm8,
    Code::Cvtpd2pi_mm_xmmm128,
    Code::Cvtpi2pd_xmm_mmm64,
    Code::Cvtpi2ps_xmm_mmm64,
    Code::Cvtps2pi_mm_xmmm64,
    Code::Cvttpd2pi_mm_xmmm128,
    Code::Cvttps2pi_mm_xmmm64,
    Code::Movd_mm_rm32,
    Code::Movq_mm_rm64,
    Code::Movd_rm32_mm,
    Code::Movq_rm64_mm,
    Code::Movd_xmm_rm32,
    Code::Movq_xmm_rm64,
    Code::Movd_rm32_xmm,
    Code::Movq_rm64_xmm,
    Code::Movdq2q_mm_xmm,
    Code::Movmskpd_r32_xmm,
    Code::Movmskpd_r64_xmm,
    Code::Movmskps_r32_xmm,
    Code::Movmskps_r64_xmm,
    Code::Movntq_m64_mm,
    Code::Movq_mm_mmm64,
    Code::Movq_mmm64_mm,
    Code::Movq2dq_xmm_mm,
    Code::Packuswb_mm_mmm64,
    Code::Paddb_mm_mmm64,
    Code::Paddw_mm_mmm64,
    Code::Paddd_mm_mmm64,
    Code::Paddq_mm_mmm64,
    Code::Paddsb_mm_mmm64,
    Code::Paddsw_mm_mmm64,
    Code::Paddusb_mm_mmm64,
    Code::Paddusw_mm_mmm64,
    Code::Pand_mm_mmm64,
    Code::Pandn_mm_mmm64,
    Code::Pcmpeqb_mm_mmm64,
    Code::Pcmpeqw_mm_mmm64,
    Code::Pcmpeqd_mm_mmm64,
    Code::Pcmpgtb_mm_mmm64,
    Code::Pcmpgtw_mm_mmm64,
    Code::Pcmpgtd_mm_mmm64,
];

const SWAP_VEC_INDEX12: &[Code] = &[
    Code::Movapd_xmmm128_xmm,
    Code::VEX_Vmovapd_xmmm128_xmm,
    Code::VEX_Vmovapd_ymmm256_ymm,
    Code::EVEX_Vmovapd_xmmm128_k1z_xmm,
    Code::EVEX_Vmovapd_ymmm256_k1z_ymm,
    Code::EVEX_Vmovapd_zmmm512_k1z_zmm,
    Code::Movaps_xmmm128_xmm,
    Code::VEX_Vmovaps_xmmm128_xmm,
    Code::VEX_Vmovaps_ymmm256_ymm,
    Code::EVEX_Vmovaps_xmmm128_k1z_xmm,
    Code::EVEX_Vmovaps_ymmm256_k1z_ymm,
    Code::EVEX_Vmovaps_zmmm512_k1z_zmm,
    Code::Movdqa_xmmm128_xmm,
    Code::VEX_Vmovdqa_xmmm128_xmm,
    Code::VEX_Vmovdqa_ymmm256_ymm,
    Code::EVEX_Vmovdqa32_xmmm128_k1z_xmm,
    Code::EVEX_Vmovdqa32_ymmm256_k1z_ymm,
    Code::EVEX_Vmovdqa32_zmmm512_k1z_zmm,
    Code::EVEX_Vmovdqa64_xmmm128_k1z_xmm,
    Code::EVEX_Vmovdqa64_ymmm256_k1z_ymm,
    Code::EVEX_Vmovdqa64_zmmm512_k1z_zmm,
    Code::Movdqu_xmmm128_xmm,
    Code::VEX_Vmovdqu_xmmm128_xmm,
    Code::VEX_Vmovdqu_ymmm256_ymm,
    Code::EVEX_Vmovdqu8_xmmm128_k1z_xmm,
    Code::EVEX_Vmovdqu8_ymmm256_k1z_ymm,
    Code::EVEX_Vmovdqu8_zmmm512_k1z_zmm,
    Code::EVEX_Vmovdqu16_xmmm128_k1z_xmm,
    Code::EVEX_Vmovdqu16_ymmm256_k1z_ymm,
    Code::EVEX_Vmovdqu16_zmmm512_k1z_zmm,
    Code::EVEX_Vmovdqu32_xmmm128_k1z_xmm,
    Code::EVEX_Vmovdqu32_ymmm256_k1z_ymm,
    Code::EVEX_Vmovdqu32_zmmm512_k1z_zmm,
    Code::EVEX_Vmovdqu64_xmmm128_k1z_xmm,
    Code::EVEX_Vmovdqu64_ymmm256_k1z_ymm,
    Code::EVEX_Vmovdqu64_zmmm512_k1z_zmm,
    Code::VEX_Vmovhpd_xmm_xmm_m64,
    Code::EVEX_Vmovhpd_xmm_xmm_m64,
    Code::VEX_Vmovhps_xmm_xmm_m64,
    Code::EVEX_Vmovhps_xmm_xmm_m64,
    Code::VEX_Vmovlpd_xmm_xmm_m64,
    Code::EVEX_Vmovlpd_xmm_xmm_m64,
    Code::VEX_Vmovlps_xmm_xmm_m64,
    Code::EVEX_Vmovlps_xmm_xmm_m64,
    Code::Movq_xmmm64_xmm,
    Code::Movss_xmmm32_xmm,
    Code::Movupd_xmmm128_xmm,
    Code::VEX_Vmovupd_xmmm128_xmm,
    Code::VEX_Vmovupd_ymmm256_ymm,
    Code::EVEX_Vmovupd_xmmm128_k1z_xmm,
    Code::EVEX_Vmovupd_ymmm256_k1z_ymm,
    Code::EVEX_Vmovupd_zmmm512_k1z_zmm,
    Code::Movups_xmmm128_xmm,
    Code::VEX_Vmovups_xmmm128_xmm,
    Code::VEX_Vmovups_ymmm256_ymm,
    Code::EVEX_Vmovups_xmmm128_k1z_xmm,
    Code::EVEX_Vmovups_ymmm256_k1z_ymm,
    Code::EVEX_Vmovups_zmmm512_k1z_zmm,
];

const START_AT_OP1: &[Code] = &[
    Code::Fcom_st0_sti,
    Code::Fcomp_st0_sti,
    Code::Fld_st0_sti,
    Code::Fucom_st0_sti,
    Code::Fucomp_st0_sti,
    Code::Fxch_st0_sti,
];

const ST0_BARE: &[Code] = &[
    Code::Fcomi_st0_sti,
    Code::Fcomip_st0_sti,
    Code::Fucomi_st0_sti,
    Code::Fucomip_st0_sti,
];

const NO_ER_DECORATOR: &[Code] = &[
    Code::EVEX_Vcvtsi2sd_xmm_xmm_rm32_er,
    Code::EVEX_Vcvtusi2sd_xmm_xmm_rm32_er,
];

const APPEND_XMM0: &[Code] = &[
    Code::Blendvpd_xmm_xmmm128,
    Code::Blendvps_xmm_xmmm128,
    Code::Pblendvb_xmm_xmmm128,
    Code::Sha256rnds2_xmm_xmmm128,
];

const APPEND_EDX_EAX: &[Code] = &[
    Code::Tpause_r32,
    Code::Tpause_r64,
    Code::Umwait_r32,
    Code::Umwait_r64,
];

const NOTRACK_BRANCH: &[Code] = &[
    Code::Call_rm16,
    Code::Call_rm32,
    Code::Call_rm64,
    Code::Jmp_rm16,
    Code::Jmp_rm32,
    Code::Jmp_rm64,
];

const REPE_CAPABLE: &[Code] = &[
    Code::Cmpsb_m8_m8,
    Code::Cmpsd_m32_m32,
    Code::Scasb_AL_m8,
    Code::Scasd_EAX_m32,
];

const REGISTER_TO: &[Code] = &[Code::Fadd_sti_st0, Code::Fmul_sti_st0];

const SGDT_SIDT: &[Code] = &[
    Code::Sgdt_m1632_16,
    Code::Sgdt_m1632,
    Code::Sgdt_m1664,
    Code::Sidt_m1632_16,
    Code::Sidt_m1632,
    Code::Sidt_m1664,
];

const MEM_2BYTE: &[Code] = &[
    Code::Fldcw_m2byte,
    Code::Fnstcw_m2byte,
    Code::Fstcw_m2byte,
    Code::Fnstsw_m2byte,
    Code::Fstsw_m2byte,
];

const MIB: &[Code] = &[Code::Bndldx_bnd_mib, Code::Bndstx_mib_bnd];

const RETF_AS_RET: &[Code] = &[
    Code::Retfw,
    Code::Retfw_imm16,
    Code::Retfd,
    Code::Retfd_imm16,
    Code::Retfq,
    Code::Retfq_imm16,
];

const fn mark(
    mut table: [OpCodeQuirks; Code::COUNT],
    codes: &[Code],
    quirk: OpCodeQuirks,
) -> [OpCodeQuirks; Code::COUNT] {
    let mut i = 0;
    while i < codes.len() {
        let index = codes[i] as usize;
        table[index] = table[index].union(quirk);
        i += 1;
    }
    table
}

const fn build() -> [OpCodeQuirks; Code::COUNT] {
    let mut table = [OpCodeQuirks::empty(); Code::COUNT];
    table = mark(table, OP_MASK_IS_K1, OpCodeQuirks::OP_MASK_IS_K1);
    table = mark(table, PRE_INC_VEC_INDEX, OpCodeQuirks::PRE_INC_VEC_INDEX);
    table = mark(table, NO_VEC_INDEX, OpCodeQuirks::NO_VEC_INDEX);
    table = mark(table, SWAP_VEC_INDEX12, OpCodeQuirks::SWAP_VEC_INDEX12);
    table = mark(table, START_AT_OP1, OpCodeQuirks::START_AT_OP1);
    table = mark(table, ST0_BARE, OpCodeQuirks::ST0_BARE);
    table = mark(table, NO_ER_DECORATOR, OpCodeQuirks::NO_ER_DECORATOR);
    table = mark(table, APPEND_XMM0, OpCodeQuirks::APPEND_XMM0);
    table = mark(table, APPEND_EDX_EAX, OpCodeQuirks::APPEND_EDX_EAX);
    table = mark(table, NOTRACK_BRANCH, OpCodeQuirks::NOTRACK_BRANCH);
    table = mark(table, REPE_CAPABLE, OpCodeQuirks::REPE_CAPABLE);
    table = mark(table, REGISTER_TO, OpCodeQuirks::REGISTER_TO);
    table = mark(table, SGDT_SIDT, OpCodeQuirks::SGDT_SIDT);
    table = mark(table, MEM_2BYTE, OpCodeQuirks::MEM_2BYTE);
    table = mark(table, MIB, OpCodeQuirks::MIB);
    table = mark(table, RETF_AS_RET, OpCodeQuirks::RETF_AS_RET);
    table
}

static QUIRKS: [OpCodeQuirks; Code::COUNT] = build();

/// Rendering exceptions for `code`.
pub(crate) fn of(code: Code) -> OpCodeQuirks {
    QUIRKS[code as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_folded() {
        assert!(of(Code::EVEX_Vptestmb_kr_k1_xmm_xmmm128).contains(OpCodeQuirks::OP_MASK_IS_K1));
        assert!(of(Code::Pxor_mm_mmm64).contains(OpCodeQuirks::NO_VEC_INDEX));
        assert!(of(Code::Movaps_xmmm128_xmm).contains(OpCodeQuirks::SWAP_VEC_INDEX12));
        assert!(of(Code::Pextrd_rm32_xmm_imm8).contains(OpCodeQuirks::PRE_INC_VEC_INDEX));
        assert!(of(Code::Fxch_st0_sti).contains(OpCodeQuirks::START_AT_OP1));
        assert!(of(Code::Retfq_imm16).contains(OpCodeQuirks::RETF_AS_RET));
        assert!(of(Code::Add_rm32_r32).is_empty());
    }

    #[test]
    fn lists_have_no_duplicates() {
        let lists: [&[Code]; 16] = [
            OP_MASK_IS_K1,
            PRE_INC_VEC_INDEX,
            NO_VEC_INDEX,
            SWAP_VEC_INDEX12,
            START_AT_OP1,
            ST0_BARE,
            NO_ER_DECORATOR,
            APPEND_XMM0,
            APPEND_EDX_EAX,
            NOTRACK_BRANCH,
            REPE_CAPABLE,
            REGISTER_TO,
            SGDT_SIDT,
            MEM_2BYTE,
            MIB,
            RETF_AS_RET,
        ];
        for list in lists {
            for (i, a) in list.iter().enumerate() {
                assert!(!list[i + 1..].contains(a), "{a:?} listed twice");
            }
        }
    }

    #[test]
    fn exception_list_sizes() {
        assert_eq!(OP_MASK_IS_K1.len(), 32);
        assert_eq!(PRE_INC_VEC_INDEX.len(), 24);
        assert_eq!(SWAP_VEC_INDEX12.len(), 58);
    }
}
