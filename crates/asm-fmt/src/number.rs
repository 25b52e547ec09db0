//! Number-to-text conversion.

use alloc::string::String;
use alloc::vec::Vec;

use crate::options::{FormatterOptions, NumberBase};

/// Per-operand number settings, derived from [`FormatterOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormattingOptions<'a> {
    pub number_base: NumberBase,
    pub prefix: &'a str,
    pub suffix: &'a str,
    pub digit_separator: &'a str,
    /// 0 disables grouping.
    pub digit_group_size: u32,
    pub uppercase_hex: bool,
    pub small_hex_numbers_in_decimal: bool,
    pub add_leading_zero_to_hex_numbers: bool,
    pub leading_zeros: bool,
    /// Negative values print as `-magnitude`.
    pub signed_number: bool,
    /// Pad displacements to the address width.
    pub displacement_leading_zeros: bool,
}

impl<'a> NumberFormattingOptions<'a> {
    fn new(options: &'a FormatterOptions, leading_zeros: bool, signed_number: bool, displacement_leading_zeros: bool) -> Self {
        let number_base = options.number_base();
        let (prefix, suffix, digit_group_size) = options.base_affixes(number_base);
        NumberFormattingOptions {
            number_base,
            prefix,
            suffix,
            digit_separator: &options.digit_separator,
            digit_group_size,
            uppercase_hex: options.uppercase_hex,
            small_hex_numbers_in_decimal: options.small_hex_numbers_in_decimal,
            add_leading_zero_to_hex_numbers: options.add_leading_zero_to_hex_numbers,
            leading_zeros,
            signed_number,
            displacement_leading_zeros,
        }
    }

    /// Settings for an immediate operand.
    pub fn immediate(options: &'a FormatterOptions) -> Self {
        Self::new(options, options.leading_zeros, options.signed_immediate_operands, false)
    }

    /// Settings for a memory displacement.
    pub fn displacement(options: &'a FormatterOptions) -> Self {
        Self::new(
            options,
            options.leading_zeros,
            options.signed_memory_displacements,
            options.displacement_leading_zeros,
        )
    }

    /// Settings for a branch target.
    pub fn branch(options: &'a FormatterOptions) -> Self {
        Self::new(options, options.branch_leading_zeros, false, false)
    }
}

/// Turns numbers into text.
///
/// Only [`format_number`](Self::format_number) is required; the sized helpers
/// forward to it.
pub trait NumberFormatter {
    /// Formats `value`, an unsigned number `size` bytes wide.
    /// `leading_zeros` pads it to the full width.
    fn format_number(
        &self,
        options: &FormatterOptions,
        number_options: &NumberFormattingOptions<'_>,
        value: u64,
        size: usize,
        leading_zeros: bool,
    ) -> String;

    fn format_u8(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: u8, leading_zeros: bool) -> String {
        self.format_number(options, number_options, u64::from(value), 1, leading_zeros)
    }

    fn format_u16(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: u16, leading_zeros: bool) -> String {
        self.format_number(options, number_options, u64::from(value), 2, leading_zeros)
    }

    fn format_u32(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: u32, leading_zeros: bool) -> String {
        self.format_number(options, number_options, u64::from(value), 4, leading_zeros)
    }

    fn format_u64(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: u64, leading_zeros: bool) -> String {
        self.format_number(options, number_options, value, 8, leading_zeros)
    }

    fn format_i8(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: i8, leading_zeros: bool) -> String {
        signed(value < 0, self.format_u8(options, number_options, value.unsigned_abs(), leading_zeros))
    }

    fn format_i16(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: i16, leading_zeros: bool) -> String {
        signed(value < 0, self.format_u16(options, number_options, value.unsigned_abs(), leading_zeros))
    }

    fn format_i32(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: i32, leading_zeros: bool) -> String {
        signed(value < 0, self.format_u32(options, number_options, value.unsigned_abs(), leading_zeros))
    }

    fn format_i64(&self, options: &FormatterOptions, number_options: &NumberFormattingOptions<'_>, value: i64, leading_zeros: bool) -> String {
        signed(value < 0, self.format_u64(options, number_options, value.unsigned_abs(), leading_zeros))
    }
}

fn signed(negative: bool, magnitude: String) -> String {
    if negative {
        let mut text = String::with_capacity(magnitude.len() + 1);
        text.push('-');
        text.push_str(&magnitude);
        text
    } else {
        magnitude
    }
}

/// NASM-style numbers: `0FFh`, `10h`, small hex values as plain decimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNumberFormatter;

impl NumberFormatter for DefaultNumberFormatter {
    fn format_number(
        &self,
        _options: &FormatterOptions,
        number_options: &NumberFormattingOptions<'_>,
        value: u64,
        size: usize,
        leading_zeros: bool,
    ) -> String {
        let bits = size * 8;
        let (digits, prefix, suffix) = match number_options.number_base {
            NumberBase::Hexadecimal if number_options.small_hex_numbers_in_decimal && value <= 9 => {
                return String::from(char::from(b'0' + value as u8));
            }
            NumberBase::Hexadecimal => {
                let min = if leading_zeros { (bits + 3) / 4 } else { 1 };
                let mut digits = to_digits(value, 16, min, number_options.uppercase_hex);
                let starts_with_letter = digits.first().is_some_and(|d| !d.is_ascii_digit());
                if starts_with_letter
                    && number_options.add_leading_zero_to_hex_numbers
                    && number_options.prefix.is_empty()
                {
                    digits.insert(0, b'0');
                }
                (digits, number_options.prefix, number_options.suffix)
            }
            NumberBase::Decimal => (
                to_digits(value, 10, 1, false),
                number_options.prefix,
                number_options.suffix,
            ),
            NumberBase::Octal => {
                let min = if leading_zeros { (bits + 2) / 3 } else { 1 };
                (to_digits(value, 8, min, false), number_options.prefix, number_options.suffix)
            }
            NumberBase::Binary => {
                let min = if leading_zeros { bits } else { 1 };
                (to_digits(value, 2, min, false), number_options.prefix, number_options.suffix)
            }
        };

        let mut text = String::with_capacity(prefix.len() + digits.len() * 2 + suffix.len());
        text.push_str(prefix);
        push_grouped(
            &mut text,
            &digits,
            number_options.digit_group_size as usize,
            number_options.digit_separator,
        );
        text.push_str(suffix);
        text
    }
}

/// Digits of `value`, most significant first, at least `min` of them.
fn to_digits(mut value: u64, radix: u64, min: usize, uppercase: bool) -> Vec<u8> {
    let table: &[u8; 16] = if uppercase {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut digits = Vec::with_capacity(64);
    while value != 0 || digits.len() < min.max(1) {
        digits.push(table[(value % radix) as usize]);
        value /= radix;
    }
    digits.reverse();
    digits
}

fn push_grouped(text: &mut String, digits: &[u8], group: usize, separator: &str) {
    let grouping = group != 0 && !separator.is_empty();
    for (i, &digit) in digits.iter().enumerate() {
        let remaining = digits.len() - i;
        if grouping && i != 0 && remaining % group == 0 {
            text.push_str(separator);
        }
        text.push(char::from(digit));
    }
}
