//! Opcode signatures across operand families.

use asm_fmt::{Code, SignatureFormatter};

fn sig(code: Code) -> String {
    code.op_code().signature()
}

// ─── General-purpose registers ──────────────────────────────────────────────

#[test]
fn gpr_letters_follow_class_count() {
    assert_eq!(sig(Code::Mulx_r64_r64_rm64), "MULX r64a, r64b, r/m64");
    // r/m32 does not take part in the letter count
    assert_eq!(sig(Code::Shld_rm32_r32_imm8), "SHLD r/m32, r32, imm8");
    assert_eq!(sig(Code::Mov_r32_imm32), "MOV r32, imm32");
}

#[test]
fn register_or_memory_width_only_when_it_differs() {
    assert_eq!(sig(Code::Movsxd_r64_rm32), "MOVSXD r64, r/m32");
    assert_eq!(sig(Code::Mov_Sreg_r32m16), "MOV Sreg, r32/m16");
    assert_eq!(sig(Code::VEX_Vpextrw_r32m16_xmm_imm8), "VPEXTRW r32/m16, xmm, imm8");
}

#[test]
fn system_registers() {
    assert_eq!(sig(Code::Mov_r64_cr), "MOV r64, cr");
    assert_eq!(sig(Code::Mov_r32_tr), "MOV r32, tr");
}

#[test]
fn fixed_registers_are_uppercase() {
    assert_eq!(sig(Code::In_AL_DX), "IN AL, DX");
    assert_eq!(sig(Code::Shl_rm32_CL), "SHL r/m32, CL");
    assert_eq!(sig(Code::Mov_AL_moffs8), "MOV AL, moffs8");
}

// ─── Immediates and branches ────────────────────────────────────────────────

#[test]
fn immediates() {
    assert_eq!(sig(Code::Shl_rm32_1), "SHL r/m32, 1");
    assert_eq!(sig(Code::Pushq_imm8), "PUSH imm8");
    assert_eq!(sig(Code::Add_rm16_imm8), "ADD r/m16, imm8");
    assert_eq!(sig(Code::Add_rm64_imm32), "ADD r/m64, imm32");
}

#[test]
fn branches() {
    assert_eq!(sig(Code::Jmp_rel8_64), "JMP rel8");
    assert_eq!(sig(Code::Call_rel32_32), "CALL rel32");
    assert_eq!(sig(Code::Jmp_ptr1632), "JMP ptr16:32");
    assert_eq!(sig(Code::Jmpe_disp32), "JMPE disp32");
}

#[test]
fn far_returns_print_ret() {
    assert_eq!(sig(Code::Retfq_imm16), "RET imm16");
    assert_eq!(sig(Code::Retfw), "RET");
}

// ─── Memory ─────────────────────────────────────────────────────────────────

#[test]
fn memory_sizes() {
    assert_eq!(sig(Code::Cmpxchg16b_m128), "CMPXCHG16B m128");
    assert_eq!(sig(Code::Lea_r64_m), "LEA r64, m");
    assert_eq!(sig(Code::Sidt_m1664), "SIDT m");
    assert_eq!(sig(Code::Fstsw_m2byte), "FSTSW m2byte");
}

#[test]
fn string_instructions_drop_implicit_operands() {
    assert_eq!(sig(Code::Scasb_AL_m8), "SCASB");
    assert_eq!(sig(Code::Xlat_m8), "XLATB");
    // rDI is not printed but the register operands are
    assert_eq!(sig(Code::Maskmovq_rDI_mm_mm), "MASKMOVQ mm1, mm2");
}

#[test]
fn vsib_and_sibmem() {
    assert_eq!(sig(Code::EVEX_Vgatherdps_zmm_k1_vm32z), "VGATHERDPS zmm {k1}, vm32z");
    assert_eq!(sig(Code::EVEX_Vscatterqpd_vm64z_k1_zmm), "VSCATTERQPD vm64z {k1}, zmm");
    assert_eq!(sig(Code::Tileloadd_tmm_sibmem), "TILELOADD tmm, sibmem");
}

// ─── x87 ────────────────────────────────────────────────────────────────────

#[test]
fn fpu_memory_suffixes() {
    assert_eq!(sig(Code::Fadd_m32fp), "FADD m32fp");
    assert_eq!(sig(Code::Fild_m64int), "FILD m64int");
}

#[test]
fn fpu_stack_forms() {
    assert_eq!(sig(Code::Fxch_st0_sti), "FXCH ST(i)");
    assert_eq!(sig(Code::Fld_st0_sti), "FLD ST(i)");
    assert_eq!(sig(Code::Fucomi_st0_sti), "FUCOMI ST, ST(i)");
    assert_eq!(sig(Code::Fmul_sti_st0), "FMUL ST(i), ST(0)");
}

// ─── Vector registers ───────────────────────────────────────────────────────

#[test]
fn legacy_mmx_forms_are_not_numbered() {
    assert_eq!(sig(Code::Punpcklbw_mm_mmm32), "PUNPCKLBW mm, mm/m32");
    assert_eq!(sig(Code::Cvtpi2ps_xmm_mmm64), "CVTPI2PS xmm, mm/m64");
    assert_eq!(sig(Code::Movq2dq_xmm_mm), "MOVQ2DQ xmm, mm");
    assert_eq!(sig(Code::Movd_xmm_rm32), "MOVD xmm, r/m32");
}

#[test]
fn store_forms_swap_vector_numbers() {
    assert_eq!(sig(Code::Movaps_xmmm128_xmm), "MOVAPS xmm2/m128, xmm1");
    assert_eq!(sig(Code::VEX_Vmovups_ymmm256_ymm), "VMOVUPS ymm2/m256, ymm1");
    assert_eq!(
        sig(Code::EVEX_Vmovups_zmmm512_k1z_zmm),
        "VMOVUPS zmm2/m512 {k1}{z}, zmm1"
    );
}

#[test]
fn lone_vector_after_gpr_destination() {
    assert_eq!(sig(Code::Pextrd_rm32_xmm_imm8), "PEXTRD r/m32, xmm, imm8");
    assert_eq!(sig(Code::EVEX_Vpbroadcastd_xmm_k1z_r32), "VPBROADCASTD xmm {k1}{z}, r32");
}

#[test]
fn four_and_five_operand_forms() {
    assert_eq!(
        sig(Code::VEX_Vblendvps_xmm_xmm_xmmm128_xmm),
        "VBLENDVPS xmm1, xmm2, xmm3/m128, xmm4"
    );
    assert_eq!(
        sig(Code::VEX_Vpermil2ps_xmm_xmm_xmmm128_xmm_imm4),
        "VPERMIL2PS xmm1, xmm2, xmm3/m128, xmm4, imm2"
    );
}

#[test]
fn register_blocks() {
    assert_eq!(
        sig(Code::EVEX_V4fmaddps_zmm_k1z_zmmp3_m128),
        "V4FMADDPS zmm1 {k1}{z}, zmm2+3, m128"
    );
}

#[test]
fn scalar_rounding() {
    assert_eq!(
        sig(Code::EVEX_Vaddss_xmm_k1z_xmm_xmmm32_er),
        "VADDSS xmm1 {k1}{z}, xmm2, xmm3/m32{er}"
    );
}

#[test]
fn implicit_xmm0_is_appended() {
    assert_eq!(sig(Code::Sha256rnds2_xmm_xmmm128), "SHA256RNDS2 xmm1, xmm2/m128, <XMM0>");
}

// ─── Mask, bound and tile registers ─────────────────────────────────────────

#[test]
fn mask_registers() {
    assert_eq!(sig(Code::Kmovw_kr_km16), "KMOVW k1, k2/m16");
    assert_eq!(sig(Code::Kandw_kr_kr_kr), "KANDW k1, k2, k3");
    assert_eq!(sig(Code::Kortestw_kr_kr), "KORTESTW k1, k2");
}

#[test]
fn mask_destination_swaps_with_write_mask() {
    assert_eq!(
        sig(Code::EVEX_Vfpclassps_kr_k1_zmmm512b32_imm8),
        "VFPCLASSPS k2 {k1}, zmm/m512/m32bcst, imm8"
    );
    assert_eq!(
        sig(Code::EVEX_Vptestmb_kr_k1_zmm_zmmm512),
        "VPTESTMB k2 {k1}, zmm2, zmm3/m512"
    );
}

#[test]
fn bound_registers() {
    assert_eq!(sig(Code::Bndmov_bnd_bndm128), "BNDMOV bnd1, bnd2/m128");
    assert_eq!(sig(Code::Bndldx_bnd_mib), "BNDLDX bnd, mib");
    assert_eq!(sig(Code::Bndstx_mib_bnd), "BNDSTX mib, bnd");
}

#[test]
fn tile_registers() {
    assert_eq!(sig(Code::Tdpbssd_tmm_tmm_tmm), "TDPBSSD tmm1, tmm2, tmm3");
}

// ─── Formatter ──────────────────────────────────────────────────────────────

#[test]
fn formatter_matches_op_code_helper() {
    for code in [Code::Add_rm32_r32, Code::Kandw_kr_kr_kr, Code::DeclareWord] {
        assert_eq!(SignatureFormatter::new(code).format(), sig(code));
    }
    assert_eq!(sig(Code::DeclareWord), "<dw>");
}

#[test]
fn signatures_are_stable_across_calls() {
    let code = Code::EVEX_Vptestmb_kr_k1_zmm_zmmm512;
    assert_eq!(sig(code), sig(code));
}
