//! Formatter configuration.
//!
//! [`FormatterOptions`] is plain data. Toggles and affix strings are public
//! fields; bounded values (number base, memory-size policy, digit group and
//! tab sizes) sit behind validated setters that reject out-of-range input with
//! a [`FormatterError`], so a render call never sees an invalid value.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::error::FormatterError;

/// Radix used for immediates, displacements and branch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberBase {
    Binary,
    Octal,
    Decimal,
    #[default]
    Hexadecimal,
}

impl NumberBase {
    pub fn radix(self) -> u32 {
        match self {
            NumberBase::Binary => 2,
            NumberBase::Octal => 8,
            NumberBase::Decimal => 10,
            NumberBase::Hexadecimal => 16,
        }
    }
}

impl TryFrom<u32> for NumberBase {
    type Error = FormatterError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(NumberBase::Binary),
            8 => Ok(NumberBase::Octal),
            10 => Ok(NumberBase::Decimal),
            16 => Ok(NumberBase::Hexadecimal),
            _ => Err(FormatterError::InvalidNumberBase(value)),
        }
    }
}

/// Parses `2`/`8`/`10`/`16` or `bin`/`oct`/`dec`/`hex` (long names too).
/// Unrecognised words report base 0.
impl FromStr for NumberBase {
    type Err = FormatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(radix) = s.parse::<u32>() {
            return NumberBase::try_from(radix);
        }
        match s.to_ascii_lowercase().as_str() {
            "bin" | "binary" => Ok(NumberBase::Binary),
            "oct" | "octal" => Ok(NumberBase::Octal),
            "dec" | "decimal" => Ok(NumberBase::Decimal),
            "hex" | "hexadecimal" => Ok(NumberBase::Hexadecimal),
            _ => Err(FormatterError::InvalidNumberBase(0)),
        }
    }
}

impl fmt::Display for NumberBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.radix())
    }
}

/// When a memory operand gets its `byte`/`dword`/… size keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemorySizeOptions {
    /// Only when no register operand implies the size.
    #[default]
    Default,
    Always,
    /// Only when no register operand has the same size as the memory.
    Minimum,
    Never,
}

impl TryFrom<u32> for MemorySizeOptions {
    type Error = FormatterError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MemorySizeOptions::Default),
            1 => Ok(MemorySizeOptions::Always),
            2 => Ok(MemorySizeOptions::Minimum),
            3 => Ok(MemorySizeOptions::Never),
            _ => Err(FormatterError::InvalidMemorySizeOptions(value)),
        }
    }
}

impl FromStr for MemorySizeOptions {
    type Err = FormatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u32>() {
            return MemorySizeOptions::try_from(value);
        }
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(MemorySizeOptions::Default),
            "always" => Ok(MemorySizeOptions::Always),
            "minimum" => Ok(MemorySizeOptions::Minimum),
            "never" => Ok(MemorySizeOptions::Never),
            _ => Err(FormatterError::InvalidMemorySizeOptions(u32::MAX)),
        }
    }
}

const MAX_DIGIT_GROUP_SIZE: u32 = 64;
const MAX_TAB_SIZE: u32 = 32;

/// Formatter options with NASM defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatterOptions {
    pub uppercase_prefixes: bool,
    pub uppercase_mnemonics: bool,
    pub uppercase_registers: bool,
    pub uppercase_keywords: bool,
    pub uppercase_decorators: bool,
    /// Overrides every other case option.
    pub uppercase_all: bool,
    /// Hex digits `A`-`F` in uppercase.
    pub uppercase_hex: bool,

    /// Column of the first operand (clamped to 256). 0 means one space after
    /// the mnemonic.
    pub first_operand_char_index: usize,

    /// `mov eax, ecx` instead of `mov eax,ecx`.
    pub space_after_operand_separator: bool,
    /// `[ rax ]` instead of `[rax]`.
    pub space_after_memory_bracket: bool,
    /// `[rax + rcx]` instead of `[rax+rcx]`.
    pub space_between_memory_add_operators: bool,
    /// `[rcx * 4]` instead of `[rcx*4]`.
    pub space_between_memory_mul_operators: bool,
    /// `[4*rcx]` instead of `[rcx*4]`.
    pub scale_before_index: bool,
    /// `[rax+rcx*1]` instead of `[rax+rcx]`.
    pub always_show_scale: bool,
    /// `ds:[rax]` even without a segment override.
    pub always_show_segment_register: bool,
    /// `[rax+0h]` when the encoding carries a zero displacement.
    pub show_zero_displacements: bool,

    pub hex_prefix: String,
    pub hex_suffix: String,
    pub decimal_prefix: String,
    pub decimal_suffix: String,
    pub octal_prefix: String,
    pub octal_suffix: String,
    pub binary_prefix: String,
    pub binary_suffix: String,
    /// Inserted between digit groups. Empty disables grouping.
    pub digit_separator: String,

    /// Pad numbers to their full width (`0000000Ah`).
    pub leading_zeros: bool,
    /// Hex values `0..=9` print in decimal, without affixes.
    pub small_hex_numbers_in_decimal: bool,
    /// `0FFh` instead of `FFh` when the prefix is empty.
    pub add_leading_zero_to_hex_numbers: bool,
    /// Pad branch targets to the branch width.
    pub branch_leading_zeros: bool,
    /// Pad displacements that follow a base or index to the address width.
    pub displacement_leading_zeros: bool,
    /// `-1` instead of `0FFFFFFFFh` for immediates.
    pub signed_immediate_operands: bool,
    /// `[rax-8]` instead of `[rax+0FFFFFFFFFFFFFFF8h]`.
    pub signed_memory_displacements: bool,

    /// `jmp short 10h` instead of `jmp 10h`.
    pub show_branch_size: bool,
    /// `[rip+10h]` instead of `[rel 1017h]`.
    pub rip_relative_addresses: bool,
    /// `fcom st0,st1` instead of `fcom st1`.
    pub prefer_st0: bool,
    /// Append `(address)` after a resolved symbol.
    pub show_symbol_address: bool,
    /// Keep prefixes that have no effect on the instruction.
    pub show_useless_prefixes: bool,
    /// `add rcx,byte -1` instead of `add rcx,-1`.
    pub nasm_show_sign_extended_immediate_size: bool,

    number_base: NumberBase,
    memory_size_options: MemorySizeOptions,
    hex_digit_group_size: u32,
    decimal_digit_group_size: u32,
    octal_digit_group_size: u32,
    binary_digit_group_size: u32,
    tab_size: u32,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        FormatterOptions {
            uppercase_prefixes: false,
            uppercase_mnemonics: false,
            uppercase_registers: false,
            uppercase_keywords: false,
            uppercase_decorators: false,
            uppercase_all: false,
            uppercase_hex: true,
            first_operand_char_index: 0,
            space_after_operand_separator: false,
            space_after_memory_bracket: false,
            space_between_memory_add_operators: false,
            space_between_memory_mul_operators: false,
            scale_before_index: false,
            always_show_scale: false,
            always_show_segment_register: false,
            show_zero_displacements: false,
            hex_prefix: String::new(),
            hex_suffix: String::from("h"),
            decimal_prefix: String::new(),
            decimal_suffix: String::new(),
            octal_prefix: String::new(),
            octal_suffix: String::from("o"),
            binary_prefix: String::new(),
            binary_suffix: String::from("b"),
            digit_separator: String::new(),
            leading_zeros: false,
            small_hex_numbers_in_decimal: true,
            add_leading_zero_to_hex_numbers: true,
            branch_leading_zeros: true,
            displacement_leading_zeros: false,
            signed_immediate_operands: false,
            signed_memory_displacements: true,
            show_branch_size: true,
            rip_relative_addresses: false,
            prefer_st0: false,
            show_symbol_address: false,
            show_useless_prefixes: false,
            nasm_show_sign_extended_immediate_size: false,
            number_base: NumberBase::Hexadecimal,
            memory_size_options: MemorySizeOptions::Default,
            hex_digit_group_size: 4,
            decimal_digit_group_size: 3,
            octal_digit_group_size: 4,
            binary_digit_group_size: 4,
            tab_size: 0,
        }
    }
}

impl FormatterOptions {
    /// NASM defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_base(&self) -> NumberBase {
        self.number_base
    }

    /// Sets the number base from its radix (2, 8, 10 or 16).
    pub fn set_number_base(&mut self, radix: u32) -> Result<(), FormatterError> {
        match NumberBase::try_from(radix) {
            Ok(base) => {
                self.number_base = base;
                Ok(())
            }
            Err(err) => {
                log::debug!("rejected number base {}", radix);
                Err(err)
            }
        }
    }

    /// Typed counterpart of [`set_number_base`](Self::set_number_base); cannot fail.
    pub fn with_number_base(mut self, base: NumberBase) -> Self {
        self.number_base = base;
        self
    }

    pub fn memory_size_options(&self) -> MemorySizeOptions {
        self.memory_size_options
    }

    /// Sets the memory-size policy from its numeric value (`0..=3`).
    pub fn set_memory_size_options(&mut self, value: u32) -> Result<(), FormatterError> {
        match MemorySizeOptions::try_from(value) {
            Ok(options) => {
                self.memory_size_options = options;
                Ok(())
            }
            Err(err) => {
                log::debug!("rejected memory size option {}", value);
                Err(err)
            }
        }
    }

    pub fn with_memory_size_options(mut self, options: MemorySizeOptions) -> Self {
        self.memory_size_options = options;
        self
    }

    pub fn hex_digit_group_size(&self) -> u32 {
        self.hex_digit_group_size
    }

    pub fn set_hex_digit_group_size(&mut self, size: u32) -> Result<(), FormatterError> {
        self.hex_digit_group_size = check_group_size(16, size)?;
        Ok(())
    }

    pub fn decimal_digit_group_size(&self) -> u32 {
        self.decimal_digit_group_size
    }

    pub fn set_decimal_digit_group_size(&mut self, size: u32) -> Result<(), FormatterError> {
        self.decimal_digit_group_size = check_group_size(10, size)?;
        Ok(())
    }

    pub fn octal_digit_group_size(&self) -> u32 {
        self.octal_digit_group_size
    }

    pub fn set_octal_digit_group_size(&mut self, size: u32) -> Result<(), FormatterError> {
        self.octal_digit_group_size = check_group_size(8, size)?;
        Ok(())
    }

    pub fn binary_digit_group_size(&self) -> u32 {
        self.binary_digit_group_size
    }

    pub fn set_binary_digit_group_size(&mut self, size: u32) -> Result<(), FormatterError> {
        self.binary_digit_group_size = check_group_size(2, size)?;
        Ok(())
    }

    /// Tab width used to reach [`first_operand_char_index`](Self::first_operand_char_index).
    /// 0 pads with spaces only.
    pub fn tab_size(&self) -> u32 {
        self.tab_size
    }

    pub fn set_tab_size(&mut self, size: u32) -> Result<(), FormatterError> {
        if size > MAX_TAB_SIZE {
            log::debug!("rejected tab size {}", size);
            return Err(FormatterError::InvalidTabSize(size));
        }
        self.tab_size = size;
        Ok(())
    }

    /// Prefix, suffix and group size for the active number base.
    pub(crate) fn base_affixes(&self, base: NumberBase) -> (&str, &str, u32) {
        match base {
            NumberBase::Hexadecimal => (&self.hex_prefix, &self.hex_suffix, self.hex_digit_group_size),
            NumberBase::Decimal => (
                &self.decimal_prefix,
                &self.decimal_suffix,
                self.decimal_digit_group_size,
            ),
            NumberBase::Octal => (&self.octal_prefix, &self.octal_suffix, self.octal_digit_group_size),
            NumberBase::Binary => (
                &self.binary_prefix,
                &self.binary_suffix,
                self.binary_digit_group_size,
            ),
        }
    }
}

fn check_group_size(base: u32, size: u32) -> Result<u32, FormatterError> {
    if size > MAX_DIGIT_GROUP_SIZE {
        log::debug!("rejected digit group size {} for base {}", size, base);
        return Err(FormatterError::InvalidDigitGroupSize { base, size });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nasm_defaults() {
        let options = FormatterOptions::default();
        assert_eq!(options.hex_suffix, "h");
        assert_eq!(options.octal_suffix, "o");
        assert_eq!(options.binary_suffix, "b");
        assert!(options.hex_prefix.is_empty());
        assert!(options.uppercase_hex);
        assert!(options.small_hex_numbers_in_decimal);
        assert!(options.branch_leading_zeros);
        assert!(options.signed_memory_displacements);
        assert!(!options.signed_immediate_operands);
        assert!(options.show_branch_size);
        assert!(!options.rip_relative_addresses);
        assert_eq!(options.number_base(), NumberBase::Hexadecimal);
        assert_eq!(options.memory_size_options(), MemorySizeOptions::Default);
        assert_eq!(options.hex_digit_group_size(), 4);
        assert_eq!(options.decimal_digit_group_size(), 3);
        assert_eq!(options.tab_size(), 0);
    }

    #[test]
    fn number_base_setter_validates() {
        let mut options = FormatterOptions::default();
        assert!(options.set_number_base(10).is_ok());
        assert_eq!(options.number_base(), NumberBase::Decimal);
        assert_eq!(
            options.set_number_base(3),
            Err(FormatterError::InvalidNumberBase(3))
        );
        assert_eq!(options.number_base(), NumberBase::Decimal);
    }

    #[test]
    fn number_base_parsing() {
        assert_eq!("16".parse::<NumberBase>(), Ok(NumberBase::Hexadecimal));
        assert_eq!("Octal".parse::<NumberBase>(), Ok(NumberBase::Octal));
        assert_eq!(
            "7".parse::<NumberBase>(),
            Err(FormatterError::InvalidNumberBase(7))
        );
        assert_eq!(NumberBase::Binary.to_string(), "2");
    }

    #[test]
    fn memory_size_options_conversions() {
        assert_eq!(MemorySizeOptions::try_from(2), Ok(MemorySizeOptions::Minimum));
        assert_eq!(
            MemorySizeOptions::try_from(4),
            Err(FormatterError::InvalidMemorySizeOptions(4))
        );
        assert_eq!("never".parse(), Ok(MemorySizeOptions::Never));
    }

    #[test]
    fn bounded_sizes() {
        let mut options = FormatterOptions::default();
        assert!(options.set_tab_size(8).is_ok());
        assert_eq!(options.set_tab_size(33), Err(FormatterError::InvalidTabSize(33)));
        assert_eq!(options.tab_size(), 8);
        assert!(options.set_binary_digit_group_size(64).is_ok());
        assert_eq!(
            options.set_hex_digit_group_size(65),
            Err(FormatterError::InvalidDigitGroupSize { base: 16, size: 65 })
        );
    }

    #[test]
    fn affixes_follow_base() {
        let options = FormatterOptions::default();
        assert_eq!(options.base_affixes(NumberBase::Hexadecimal), ("", "h", 4));
        assert_eq!(options.base_affixes(NumberBase::Decimal), ("", "", 3));
    }
}
