#![no_main]
use libfuzzer_sys::fuzz_target;

use asm_fmt::{
    Code, CodeSize, FormatterOptions, Instruction, MemoryOperand, NasmFormatter, PrefixFlags,
    Register, RoundingControl,
};

fn pick<T: Copy>(items: &[T], byte: u8) -> T {
    items[usize::from(byte) % items.len()]
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 24 {
        return;
    }
    let word = |i: usize| u64::from_le_bytes(data[i..i + 8].try_into().unwrap_or([0; 8]));

    let code = Code::values()
        .nth(usize::from(u16::from_le_bytes([data[0], data[1]])) % Code::COUNT)
        .unwrap_or(Code::INVALID);
    let registers = Register::all();
    let sizes = [CodeSize::Code16, CodeSize::Code32, CodeSize::Code64, CodeSize::Unknown];
    let rounding = [
        RoundingControl::None,
        RoundingControl::RoundToNearest,
        RoundingControl::RoundDown,
        RoundingControl::RoundUp,
        RoundingControl::RoundTowardZero,
    ];

    // Signature mode must render every opcode.
    let _ = code.op_code().signature();

    let mut instr = Instruction::new(code)
        .with_code_size(pick(&sizes, data[2]))
        .with_ip(word(8))
        .with_len(data[3] % 16)
        .with_prefixes(PrefixFlags::from_bits_truncate(data[4]));

    // Builders may reject values; keep whatever was accepted.
    let operand = usize::from(data[5] % 5);
    let memory = MemoryOperand {
        base: (data[6] & 1 != 0).then(|| pick(registers, data[6] >> 1)),
        index: (data[7] & 1 != 0).then(|| pick(registers, data[7] >> 1)),
        scale: 1 << (data[6] >> 6),
        displacement: word(16) as i64,
        displacement_size: pick(&[0, 1, 2, 4, 8], data[7] >> 5),
    };
    let register = pick(registers, data[5]);
    instr = instr.clone().with_register(operand, register).unwrap_or(instr);
    instr = instr.clone().with_memory(operand, memory).unwrap_or(instr);
    instr = instr.clone().with_immediate(operand, word(8)).unwrap_or(instr);
    instr = instr.clone().with_near_branch(operand, word(16)).unwrap_or(instr);
    instr = instr.clone().with_op_mask(pick(registers, data[4])).unwrap_or(instr);
    instr = instr.clone().with_zeroing_masking(data[3] & 0x80 != 0).unwrap_or(instr);
    instr = instr.clone().with_broadcast(data[3] & 0x40 != 0).unwrap_or(instr);
    instr = instr.clone().with_rounding_control(pick(&rounding, data[2] >> 2)).unwrap_or(instr);
    instr = instr.clone().with_suppress_all_exceptions(data[2] & 0x80 != 0).unwrap_or(instr);
    instr = instr
        .clone()
        .with_segment_prefix((data[4] & 0x80 != 0).then(|| pick(registers, data[5] >> 2)))
        .unwrap_or(instr);

    let mut options = FormatterOptions::default();
    options.uppercase_all = data[6] & 2 != 0;
    options.signed_immediate_operands = data[6] & 4 != 0;
    options.leading_zeros = data[6] & 8 != 0;
    options.show_useless_prefixes = data[6] & 16 != 0;
    options.rip_relative_addresses = data[6] & 32 != 0;
    options.prefer_st0 = data[7] & 2 != 0;
    options.always_show_segment_register = data[7] & 4 != 0;
    options.nasm_show_sign_extended_immediate_size = data[7] & 8 != 0;
    options.digit_separator = if data[7] & 16 != 0 { String::from("_") } else { String::new() };
    options.first_operand_char_index = usize::from(data[1]);
    let _ = options.set_number_base(pick(&[2, 8, 10, 16], data[0]));
    let _ = options.set_memory_size_options(u32::from(data[1] % 4));
    let _ = options.set_tab_size(u32::from(data[2] % 9));
    let _ = options.set_hex_digit_group_size(u32::from(data[3] % 8));

    let formatter = NasmFormatter::with_options(options);
    let mut out = String::new();
    formatter.format(&instr, &mut out);
    for operand in 0..formatter.operand_count(&instr) {
        out.clear();
        formatter.format_operand(&instr, &mut out, operand);
    }
});
