#![cfg(not(target_arch = "wasm32"))]
//! Cross-validation against iced-x86.
//!
//! Each case pairs machine code with the equivalent hand-built
//! [`Instruction`]. iced-x86 decodes and formats the bytes with its NASM
//! formatter; both renderers run with default options and must agree.

use asm_fmt::{
    format_nasm, Code, Instruction, MemoryOperand, PrefixFlags, Register, RoundingControl,
};
use iced_x86::{Decoder, DecoderOptions, Formatter, NasmFormatter as IcedNasm};

// ─── Helpers ──────────────────────────────────────────────────────────────────

const IP: u64 = 0x1000;

/// Decode one 64-bit instruction at [`IP`] and format it with iced-x86.
fn iced_text(bytes: &[u8]) -> String {
    let mut decoder = Decoder::with_ip(64, bytes, IP, DecoderOptions::NONE);
    let instr = decoder.decode();
    assert!(!instr.is_invalid(), "iced-x86 decoded INVALID for {bytes:02X?}");
    assert_eq!(
        instr.len(),
        bytes.len(),
        "iced-x86 decoded {} bytes of {:02X?}",
        instr.len(),
        bytes
    );

    let mut formatter = IcedNasm::new();
    let mut output = String::new();
    formatter.format(&instr, &mut output);
    output
}

/// Assert that `instr`, placed at [`IP`] with the length of `bytes`, renders
/// exactly as iced-x86 renders `bytes`.
fn verify(bytes: &[u8], instr: Instruction) {
    let instr = instr.with_ip(IP).with_len(bytes.len() as u8);
    let expected = iced_text(bytes);
    let actual = format_nasm(&instr);
    assert_eq!(actual, expected, "mismatch for {bytes:02X?}");
}

fn reg(code: Code, assignments: &[(usize, Register)]) -> Instruction {
    assignments
        .iter()
        .fold(Instruction::new(code), |instr, &(operand, register)| {
            instr
                .with_register(operand, register)
                .unwrap_or_else(|e| panic!("{code:?}: {e}"))
        })
}

fn mem(code: Code, operand: usize, memory: MemoryOperand) -> Instruction {
    Instruction::new(code)
        .with_memory(operand, memory)
        .unwrap_or_else(|e| panic!("{code:?}: {e}"))
}

// ─── Operand-less and register forms ────────────────────────────────────────

#[test]
fn no_operands() {
    verify(&[0x90], Instruction::new(Code::Nopd));
    verify(&[0xC3], Instruction::new(Code::Retnq));
}

#[test]
fn register_forms() {
    verify(&[0x53], reg(Code::Push_r64, &[(0, Register::Rbx)]));
    verify(
        &[0x01, 0xC8],
        reg(Code::Add_rm32_r32, &[(0, Register::Eax), (1, Register::Ecx)]),
    );
    verify(
        &[0x48, 0x89, 0xD8],
        reg(Code::Mov_rm64_r64, &[(0, Register::Rax), (1, Register::Rbx)]),
    );
    verify(
        &[0xC4, 0xE2, 0x78, 0xF2, 0xC1],
        reg(
            Code::Andn_r32_r32_rm32,
            &[(0, Register::Eax), (1, Register::Eax), (2, Register::Ecx)],
        ),
    );
}

// ─── Immediates ─────────────────────────────────────────────────────────────

#[test]
fn immediates() {
    verify(
        &[0x6B, 0xC1, 0x05],
        reg(Code::Imul_r32_rm32_imm8, &[(1, Register::Ecx)])
            .with_immediate(2, 5)
            .unwrap(),
    );
    verify(
        &[0x48, 0x83, 0xC1, 0xFF],
        reg(Code::Add_rm64_imm8, &[(0, Register::Rcx)])
            .with_immediate(1, 0xFF)
            .unwrap(),
    );
    verify(
        &[0x48, 0xB8, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11],
        Instruction::new(Code::Mov_r64_imm64)
            .with_immediate(1, 0x1122_3344_5566_7788)
            .unwrap(),
    );
}

// ─── Memory ─────────────────────────────────────────────────────────────────

#[test]
fn based_memory() {
    verify(
        &[0x8B, 0x43, 0x10],
        mem(
            Code::Mov_r32_rm32,
            1,
            MemoryOperand::base(Register::Rbx).with_displacement(0x10, 1),
        ),
    );
    verify(
        &[0x8B, 0x04, 0x88],
        mem(
            Code::Mov_r32_rm32,
            1,
            MemoryOperand::base(Register::Rax).with_index(Register::Rcx, 4),
        ),
    );
}

#[test]
fn size_keywords() {
    verify(
        &[0xC7, 0x00, 0x05, 0x00, 0x00, 0x00],
        mem(Code::Mov_rm32_imm32, 0, MemoryOperand::base(Register::Rax))
            .with_immediate(1, 5)
            .unwrap(),
    );
    verify(
        &[0x0F, 0xB6, 0x00],
        mem(Code::Movzx_r32_rm8, 1, MemoryOperand::base(Register::Rax)),
    );
}

#[test]
fn rip_relative() {
    verify(
        &[0x48, 0x8D, 0x05, 0x10, 0x00, 0x00, 0x00],
        mem(
            Code::Lea_r64_m,
            1,
            MemoryOperand::base(Register::Rip).with_displacement(0x10, 4),
        ),
    );
}

#[test]
fn segment_override() {
    verify(
        &[0x64, 0x8B, 0x00],
        mem(Code::Mov_r32_rm32, 1, MemoryOperand::base(Register::Rax))
            .with_segment_prefix(Some(Register::Fs))
            .unwrap(),
    );
}

// ─── Prefixes ───────────────────────────────────────────────────────────────

#[test]
fn lock_and_rep() {
    verify(
        &[0xF0, 0x01, 0x43, 0x10],
        mem(
            Code::Add_rm32_r32,
            0,
            MemoryOperand::base(Register::Rbx).with_displacement(0x10, 1),
        )
        .with_prefixes(PrefixFlags::LOCK),
    );
    verify(
        &[0xF3, 0xA4],
        Instruction::new(Code::Movsb_m8_m8).with_prefixes(PrefixFlags::REPE),
    );
}

// ─── Branches ───────────────────────────────────────────────────────────────

#[test]
fn near_branches() {
    verify(
        &[0xEB, 0x10],
        Instruction::new(Code::Jmp_rel8_64)
            .with_near_branch(0, 0x1012)
            .unwrap(),
    );
    verify(
        &[0xE8, 0x00, 0x01, 0x00, 0x00],
        Instruction::new(Code::Call_rel32_64)
            .with_near_branch(0, 0x1105)
            .unwrap(),
    );
}

// ─── EVEX ───────────────────────────────────────────────────────────────────

#[test]
fn evex_registers() {
    let code = Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er;
    let plain = reg(
        code,
        &[(0, Register::Zmm1), (1, Register::Zmm2), (2, Register::Zmm3)],
    );
    verify(&[0x62, 0xF1, 0x6C, 0x48, 0x58, 0xCB], plain.clone());

    let masked = plain
        .with_op_mask(Register::K1)
        .unwrap()
        .with_zeroing_masking(true)
        .unwrap();
    verify(&[0x62, 0xF1, 0x6C, 0xC9, 0x58, 0xCB], masked);
}

#[test]
fn evex_rounding() {
    // EVEX.b with a register source selects static rounding; L'L = 01 is round-down
    let instr = reg(
        Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er,
        &[(0, Register::Zmm1), (1, Register::Zmm2), (2, Register::Zmm3)],
    )
    .with_rounding_control(RoundingControl::RoundDown)
    .unwrap();
    verify(&[0x62, 0xF1, 0x6C, 0x38, 0x58, 0xCB], instr);
}
