//! Performance benchmarks for `asm_fmt`.
//!
//! Measures:
//! - Single instruction latency for common operand shapes
//! - Whole-table throughput in live and signature mode
//! - Cost of non-default options and custom output sinks
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use asm_fmt::{
    Code, FormatterOptions, FormatterOutput, FormatterTextKind, Instruction, MemoryOperand,
    MemorySizeOptions, NasmFormatter, NumberBase, PrefixFlags, Register, SignatureFormatter,
    SymbolResult,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn sample_instructions() -> Vec<(&'static str, Instruction)> {
    let memory = MemoryOperand::base(Register::Rax)
        .with_index(Register::Rcx, 8)
        .with_displacement(0x10, 1);
    vec![
        ("nop", Instruction::new(Code::Nopd)),
        (
            "add_reg_reg",
            Instruction::new(Code::Add_rm64_r64)
                .with_register(1, Register::Rbx)
                .unwrap(),
        ),
        (
            "mov_mem",
            Instruction::new(Code::Mov_rm64_r64)
                .with_memory(0, memory)
                .unwrap()
                .with_register(1, Register::Rdx)
                .unwrap(),
        ),
        (
            "lock_add_mem",
            Instruction::new(Code::Add_rm32_r32)
                .with_memory(0, MemoryOperand::base(Register::Rbx))
                .unwrap()
                .with_prefixes(PrefixFlags::LOCK),
        ),
        (
            "call_rel32",
            Instruction::new(Code::Call_rel32_64)
                .with_ip(0x1000)
                .with_len(5)
                .with_near_branch(0, 0x2000)
                .unwrap(),
        ),
        (
            "vaddps_avx512_masked",
            Instruction::new(Code::EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er)
                .with_memory(2, MemoryOperand::base(Register::Rsi))
                .unwrap()
                .with_broadcast(true)
                .unwrap()
                .with_op_mask(Register::K2)
                .unwrap()
                .with_zeroing_masking(true)
                .unwrap(),
        ),
    ]
}

/// Every opcode with default operand values.
fn all_instructions() -> Vec<Instruction> {
    Code::values().map(Instruction::new).collect()
}

/// Sink that only counts bytes.
#[derive(Default)]
struct Counter(usize);

impl FormatterOutput for Counter {
    fn write(&mut self, text: &str, _kind: FormatterTextKind) {
        self.0 += text.len();
    }
}

// ─── Single-Instruction Latency ──────────────────────────────────────────────

fn bench_single_instruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_instruction");
    let formatter = NasmFormatter::new();
    let mut out = String::with_capacity(64);

    for (name, instr) in sample_instructions() {
        group.bench_function(name, |b| {
            b.iter(|| {
                out.clear();
                formatter.format(black_box(&instr), &mut out);
            })
        });
    }

    group.finish();
}

// ─── Whole-Table Throughput ──────────────────────────────────────────────────

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    let instructions = all_instructions();
    group.throughput(Throughput::Elements(instructions.len() as u64));

    let formatter = NasmFormatter::new();
    group.bench_function("nasm_all_codes", |b| {
        let mut out = String::with_capacity(64);
        b.iter(|| {
            for instr in &instructions {
                out.clear();
                formatter.format(black_box(instr), &mut out);
            }
        })
    });

    group.bench_function("nasm_all_codes_counting_sink", |b| {
        b.iter(|| {
            let mut counter = Counter::default();
            for instr in &instructions {
                formatter.format(black_box(instr), &mut counter);
            }
            counter.0
        })
    });

    group.bench_function("signature_all_codes", |b| {
        b.iter(|| {
            let mut total = 0;
            for code in Code::values() {
                total += SignatureFormatter::new(black_box(code)).format().len();
            }
            total
        })
    });

    group.finish();
}

// ─── Options and Symbols ─────────────────────────────────────────────────────

fn bench_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("options");
    let samples = sample_instructions();

    let mut options = FormatterOptions::default()
        .with_number_base(NumberBase::Decimal)
        .with_memory_size_options(MemorySizeOptions::Always);
    options.uppercase_all = true;
    options.space_after_operand_separator = true;
    options.digit_separator = String::from("_");
    options.first_operand_char_index = 10;
    options.set_tab_size(8).unwrap();
    let custom = NasmFormatter::with_options(options);

    group.bench_function("custom_options", |b| {
        let mut out = String::with_capacity(64);
        b.iter(|| {
            for (_, instr) in &samples {
                out.clear();
                custom.format(black_box(instr), &mut out);
            }
        })
    });

    let symbols = NasmFormatter::new().with_symbol_resolver(|address: u64| {
        (address == 0x2000).then(|| SymbolResult::new(0x2000, "target"))
    });
    group.bench_function("symbol_resolver", |b| {
        let mut out = String::with_capacity(64);
        b.iter(|| {
            for (_, instr) in &samples {
                out.clear();
                symbols.format(black_box(instr), &mut out);
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_single_instruction, bench_throughput, bench_options);
criterion_main!(benches);
