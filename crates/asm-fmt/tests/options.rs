//! Formatter options as seen in rendered text, plus their validation.

use asm_fmt::{
    Code, FormatterError, FormatterOptions, Instruction, MemoryOperand, MemorySizeOptions,
    NasmFormatter, NumberBase, PrefixFlags, Register,
};

fn render(options: &FormatterOptions, instruction: &Instruction) -> String {
    let mut out = String::new();
    NasmFormatter::with_options(options.clone()).format(instruction, &mut out);
    out
}

fn mov_imm(value: u64) -> Instruction {
    Instruction::new(Code::Mov_r32_imm32)
        .with_immediate(1, value)
        .unwrap()
}

fn load(memory: MemoryOperand) -> Instruction {
    Instruction::new(Code::Mov_r32_rm32)
        .with_memory(1, memory)
        .unwrap()
}

fn lea(memory: MemoryOperand) -> Instruction {
    Instruction::new(Code::Lea_r64_m).with_memory(1, memory).unwrap()
}

// ─── Case ───────────────────────────────────────────────────────────────────

#[test]
fn uppercase_all_leaves_number_suffixes_alone() {
    let mut options = FormatterOptions::default();
    options.uppercase_all = true;
    let instr = load(MemoryOperand::base(Register::Rbx).with_displacement(0x10, 1));
    assert_eq!(render(&options, &instr), "MOV EAX,[RBX+10h]");
}

#[test]
fn individual_case_toggles() {
    let instr = Instruction::new(Code::Add_rm32_r32)
        .with_memory(0, MemoryOperand::base(Register::Rbx))
        .unwrap()
        .with_prefixes(PrefixFlags::LOCK);

    let mut prefixes = FormatterOptions::default();
    prefixes.uppercase_prefixes = true;
    assert_eq!(render(&prefixes, &instr), "LOCK add [rbx],eax");

    let mut registers = FormatterOptions::default();
    registers.uppercase_registers = true;
    assert_eq!(render(&registers, &instr), "lock add [RBX],EAX");

    let mut keywords = FormatterOptions::default()
        .with_memory_size_options(MemorySizeOptions::Always);
    keywords.uppercase_keywords = true;
    assert_eq!(render(&keywords, &instr), "lock add DWORD [rbx],eax");
}

// ─── Numbers ────────────────────────────────────────────────────────────────

#[test]
fn hex_digits_and_affixes() {
    let instr = mov_imm(0xAB);
    assert_eq!(render(&FormatterOptions::default(), &instr), "mov eax,0ABh");

    let mut lower = FormatterOptions::default();
    lower.uppercase_hex = false;
    assert_eq!(render(&lower, &instr), "mov eax,0abh");

    let mut c_style = FormatterOptions::default();
    c_style.hex_prefix = String::from("0x");
    c_style.hex_suffix = String::new();
    assert_eq!(render(&c_style, &instr), "mov eax,0xAB");

    let mut bare = FormatterOptions::default();
    bare.add_leading_zero_to_hex_numbers = false;
    assert_eq!(render(&bare, &instr), "mov eax,ABh");
}

#[test]
fn small_hex_numbers() {
    let instr = mov_imm(5);
    assert_eq!(render(&FormatterOptions::default(), &instr), "mov eax,5");

    let mut options = FormatterOptions::default();
    options.small_hex_numbers_in_decimal = false;
    assert_eq!(render(&options, &instr), "mov eax,5h");
}

#[test]
fn other_bases() {
    let decimal = FormatterOptions::default().with_number_base(NumberBase::Decimal);
    assert_eq!(render(&decimal, &mov_imm(0xAB)), "mov eax,171");

    let octal = FormatterOptions::default().with_number_base(NumberBase::Octal);
    assert_eq!(render(&octal, &mov_imm(8)), "mov eax,10o");

    let mut binary = FormatterOptions::default();
    binary.set_number_base(2).unwrap();
    assert_eq!(render(&binary, &mov_imm(5)), "mov eax,101b");
}

#[test]
fn leading_zeros_pad_immediates_to_their_width() {
    let mut options = FormatterOptions::default();
    options.leading_zeros = true;
    assert_eq!(render(&options, &mov_imm(0x10)), "mov eax,00000010h");
}

#[test]
fn digit_groups() {
    let mut options = FormatterOptions::default();
    options.digit_separator = String::from("_");
    assert_eq!(render(&options, &mov_imm(0x1234_5678)), "mov eax,1234_5678h");

    let mut wide = options.clone();
    wide.set_hex_digit_group_size(0).unwrap();
    assert_eq!(render(&wide, &mov_imm(0x1234_5678)), "mov eax,12345678h");
}

#[test]
fn sign_extended_immediates() {
    let instr = Instruction::new(Code::Add_rm64_imm8)
        .with_register(0, Register::Rcx)
        .unwrap()
        .with_immediate(1, 0xFF)
        .unwrap();
    assert_eq!(
        render(&FormatterOptions::default(), &instr),
        "add rcx,0FFFFFFFFFFFFFFFFh"
    );

    let mut options = FormatterOptions::default();
    options.signed_immediate_operands = true;
    options.nasm_show_sign_extended_immediate_size = true;
    assert_eq!(render(&options, &instr), "add rcx,byte -1");
}

// ─── Memory operands ────────────────────────────────────────────────────────

#[test]
fn scale_placement() {
    let memory = MemoryOperand::base(Register::Rax).with_index(Register::Rcx, 1);
    assert_eq!(render(&FormatterOptions::default(), &lea(memory)), "lea rax,[rax+rcx]");

    let mut always = FormatterOptions::default();
    always.always_show_scale = true;
    assert_eq!(render(&always, &lea(memory)), "lea rax,[rax+rcx*1]");

    let scaled = MemoryOperand::base(Register::Rax).with_index(Register::Rcx, 8);
    let mut before = FormatterOptions::default();
    before.scale_before_index = true;
    assert_eq!(render(&before, &lea(scaled)), "lea rax,[rax+8*rcx]");
}

#[test]
fn memory_operator_spacing() {
    let mut options = FormatterOptions::default();
    options.space_between_memory_add_operators = true;
    options.space_between_memory_mul_operators = true;
    let memory = MemoryOperand::base(Register::Rax)
        .with_index(Register::Rcx, 8)
        .with_displacement(-8, 1);
    assert_eq!(render(&options, &lea(memory)), "lea rax,[rax + rcx * 8 - 8]");
}

#[test]
fn segment_register_display() {
    let mut options = FormatterOptions::default();
    options.always_show_segment_register = true;
    assert_eq!(
        render(&options, &load(MemoryOperand::base(Register::Rbx))),
        "mov eax,[ds:rbx]"
    );
    assert_eq!(
        render(&options, &load(MemoryOperand::base(Register::Rsp))),
        "mov eax,[ss:rsp]"
    );
}

#[test]
fn zero_displacements() {
    let instr = load(MemoryOperand::base(Register::Rbx).with_displacement(0, 1));
    assert_eq!(render(&FormatterOptions::default(), &instr), "mov eax,[rbx]");

    let mut options = FormatterOptions::default();
    options.show_zero_displacements = true;
    assert_eq!(render(&options, &instr), "mov eax,[rbx+0]");
}

#[test]
fn rip_relative_forms() {
    let instr = lea(MemoryOperand::base(Register::Rip).with_displacement(0x10, 4))
        .with_ip(0x1000)
        .with_len(7);
    assert_eq!(render(&FormatterOptions::default(), &instr), "lea rax,[rel 1017h]");

    let mut options = FormatterOptions::default();
    options.rip_relative_addresses = true;
    assert_eq!(render(&options, &instr), "lea rax,[rip+10h]");
}

#[test]
fn memory_size_policies() {
    let instr = Instruction::new(Code::Movzx_r32_rm16)
        .with_memory(1, MemoryOperand::base(Register::Rax))
        .unwrap();
    let with = |policy: MemorySizeOptions| {
        render(&FormatterOptions::default().with_memory_size_options(policy), &instr)
    };
    assert_eq!(with(MemorySizeOptions::Default), "movzx eax,word [rax]");
    assert_eq!(with(MemorySizeOptions::Always), "movzx eax,word [rax]");
    assert_eq!(with(MemorySizeOptions::Never), "movzx eax,[rax]");
}

// ─── Branches ───────────────────────────────────────────────────────────────

#[test]
fn branch_size_and_padding() {
    let instr = Instruction::new(Code::Jmp_rel8_64)
        .with_near_branch(0, 0x1012)
        .unwrap();
    assert_eq!(
        render(&FormatterOptions::default(), &instr),
        "jmp short 0000000000001012h"
    );

    let mut options = FormatterOptions::default();
    options.show_branch_size = false;
    options.branch_leading_zeros = false;
    assert_eq!(render(&options, &instr), "jmp 1012h");
}

// ─── x87 ────────────────────────────────────────────────────────────────────

#[test]
fn prefer_st0_prints_implicit_destination() {
    let instr = Instruction::new(Code::Fcom_st0_sti)
        .with_register(1, Register::St3)
        .unwrap();
    assert_eq!(render(&FormatterOptions::default(), &instr), "fcom st3");

    let mut options = FormatterOptions::default();
    options.prefer_st0 = true;
    assert_eq!(render(&options, &instr), "fcom st0,st3");
}

// ─── Layout ─────────────────────────────────────────────────────────────────

#[test]
fn first_operand_column_with_spaces() {
    let instr = Instruction::new(Code::Mov_r32_rm32)
        .with_register(1, Register::Ecx)
        .unwrap();
    let mut options = FormatterOptions::default();
    options.first_operand_char_index = 8;
    assert_eq!(render(&options, &instr), "mov     eax,ecx");
}

// ─── Validation ─────────────────────────────────────────────────────────────

#[test]
fn rejected_values_leave_options_unchanged() {
    let mut options = FormatterOptions::default();
    assert_eq!(
        options.set_number_base(12),
        Err(FormatterError::InvalidNumberBase(12))
    );
    assert_eq!(
        options.set_memory_size_options(9),
        Err(FormatterError::InvalidMemorySizeOptions(9))
    );
    assert_eq!(
        options.set_decimal_digit_group_size(100),
        Err(FormatterError::InvalidDigitGroupSize { base: 10, size: 100 })
    );
    assert_eq!(
        options.set_octal_digit_group_size(65),
        Err(FormatterError::InvalidDigitGroupSize { base: 8, size: 65 })
    );
    assert_eq!(options.set_tab_size(64), Err(FormatterError::InvalidTabSize(64)));
    assert_eq!(options, FormatterOptions::default());
}

#[test]
fn accepted_bounds() {
    let mut options = FormatterOptions::default();
    options.set_memory_size_options(3).unwrap();
    assert_eq!(options.memory_size_options(), MemorySizeOptions::Never);
    options.set_decimal_digit_group_size(64).unwrap();
    assert_eq!(options.decimal_digit_group_size(), 64);
    options.set_tab_size(32).unwrap();
    assert_eq!(options.tab_size(), 32);
}

#[test]
fn parsing_and_display() {
    assert_eq!("hex".parse::<NumberBase>(), Ok(NumberBase::Hexadecimal));
    assert_eq!(" dec ".parse::<NumberBase>(), Ok(NumberBase::Decimal));
    assert_eq!("bin".parse::<NumberBase>(), Ok(NumberBase::Binary));
    assert_eq!(
        "base64".parse::<NumberBase>(),
        Err(FormatterError::InvalidNumberBase(0))
    );
    assert_eq!(NumberBase::Hexadecimal.to_string(), "16");
    assert_eq!(NumberBase::try_from(8), Ok(NumberBase::Octal));

    assert_eq!("Minimum".parse::<MemorySizeOptions>(), Ok(MemorySizeOptions::Minimum));
    assert_eq!("1".parse::<MemorySizeOptions>(), Ok(MemorySizeOptions::Always));
    assert_eq!(
        "sometimes".parse::<MemorySizeOptions>(),
        Err(FormatterError::InvalidMemorySizeOptions(u32::MAX))
    );
}

#[cfg(feature = "std")]
#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    let err = FormatterError::InvalidTabSize(40);
    assert_error(&err);
    assert_eq!(err.to_string(), "invalid tab size 40 (expected 0..=32)");
}

#[test]
fn formatter_exposes_its_options() {
    let options = FormatterOptions::default().with_number_base(NumberBase::Decimal);
    let formatter = NasmFormatter::with_options(options.clone());
    assert_eq!(formatter.options(), &options);
    assert_eq!(formatter.format_u32(300), "300");
    assert_eq!(formatter.format_i8(-5), "-5");
    assert_eq!(formatter.format_register(Register::Zmm7), "zmm7");
}
