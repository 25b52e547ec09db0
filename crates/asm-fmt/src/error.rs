//! Configuration and instruction-building errors.
//!
//! Rendering itself never fails. Every value a render call reads has been
//! validated when it was stored, either by an options setter or by an
//! [`Instruction`](crate::Instruction) builder method.

use core::fmt;

use crate::code::Code;
use crate::output::DecoratorKind;
use crate::register::Register;

/// What an operand position accepts, carried by [`FormatterError::OperandKindMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandCategory {
    Register,
    Memory,
    Immediate,
    NearBranch,
    FarBranch,
    /// Fixed or implicit operand that takes no value.
    Implicit,
}

impl fmt::Display for OperandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandCategory::Register => write!(f, "register"),
            OperandCategory::Memory => write!(f, "memory"),
            OperandCategory::Immediate => write!(f, "immediate"),
            OperandCategory::NearBranch => write!(f, "near branch"),
            OperandCategory::FarBranch => write!(f, "far branch"),
            OperandCategory::Implicit => write!(f, "implicit operand"),
        }
    }
}

/// Rejected configuration value or instruction field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatterError {
    /// Number base other than 2, 8, 10 or 16.
    InvalidNumberBase(u32),

    /// Memory-size display policy outside `0..=3`.
    InvalidMemorySizeOptions(u32),

    /// Digit group size outside `0..=64`.
    InvalidDigitGroupSize {
        /// Base the group size applies to.
        base: u32,
        /// Rejected size.
        size: u32,
    },

    /// Tab size outside `0..=32`.
    InvalidTabSize(u32),

    /// Operand index beyond the opcode's operand count.
    InvalidOperand {
        /// Opcode being built.
        code: Code,
        /// Rejected operand index.
        operand: usize,
        /// Number of operands the opcode declares.
        count: usize,
    },

    /// Value does not fit the operand's kind.
    OperandKindMismatch {
        /// Opcode being built.
        code: Code,
        /// Operand index.
        operand: usize,
        /// What the operand accepts.
        expected: OperandCategory,
    },

    /// Register is not in the register file the operand draws from.
    InvalidRegister {
        /// Opcode being built.
        code: Code,
        /// Operand index.
        operand: usize,
        /// Rejected register.
        register: Register,
    },

    /// Memory scale other than 1, 2, 4 or 8.
    InvalidScale(u8),

    /// Displacement size other than 0, 1, 2, 4 or 8 bytes.
    InvalidDisplacementSize(u8),

    /// Segment prefix that is not a segment register.
    InvalidSegment(Register),

    /// Decorator the opcode cannot carry.
    UnsupportedDecorator {
        /// Opcode being built.
        code: Code,
        /// Rejected decorator.
        decorator: DecoratorKind,
    },

    /// Opmask register other than `k1`..`k7`, or on an opcode without opmask support.
    InvalidOpMask {
        /// Opcode being built.
        code: Code,
        /// Rejected register.
        register: Register,
    },

    /// More declare-data values than fit in one directive.
    TooManyDeclareValues {
        /// Capacity for the element width.
        max: usize,
        /// Number supplied.
        got: usize,
    },
}

impl fmt::Display for FormatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatterError::InvalidNumberBase(base) => {
                write!(f, "invalid number base {} (expected 2, 8, 10 or 16)", base)
            }
            FormatterError::InvalidMemorySizeOptions(value) => {
                write!(f, "invalid memory size option {} (expected 0..=3)", value)
            }
            FormatterError::InvalidDigitGroupSize { base, size } => {
                write!(f, "invalid digit group size {} for base {}", size, base)
            }
            FormatterError::InvalidTabSize(size) => {
                write!(f, "invalid tab size {} (expected 0..=32)", size)
            }
            FormatterError::InvalidOperand {
                code,
                operand,
                count,
            } => {
                write!(
                    f,
                    "{:?}: operand {} out of range (count {})",
                    code, operand, count
                )
            }
            FormatterError::OperandKindMismatch {
                code,
                operand,
                expected,
            } => {
                write!(f, "{:?}: operand {} expects {}", code, operand, expected)
            }
            FormatterError::InvalidRegister {
                code,
                operand,
                register,
            } => {
                write!(
                    f,
                    "{:?}: register '{}' is not valid for operand {}",
                    code, register, operand
                )
            }
            FormatterError::InvalidScale(scale) => {
                write!(f, "invalid scale {} (expected 1, 2, 4 or 8)", scale)
            }
            FormatterError::InvalidDisplacementSize(size) => {
                write!(f, "invalid displacement size {} (expected 0, 1, 2, 4 or 8)", size)
            }
            FormatterError::InvalidSegment(register) => {
                write!(f, "'{}' is not a segment register", register)
            }
            FormatterError::UnsupportedDecorator { code, decorator } => {
                write!(f, "{:?}: {:?} decorator is not supported", code, decorator)
            }
            FormatterError::InvalidOpMask { code, register } => {
                write!(f, "{:?}: '{}' cannot be used as an opmask", code, register)
            }
            FormatterError::TooManyDeclareValues { max, got } => {
                write!(f, "too many declare values: {} (max {})", got, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormatterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_number_base_display() {
        assert_eq!(
            format!("{}", FormatterError::InvalidNumberBase(3)),
            "invalid number base 3 (expected 2, 8, 10 or 16)"
        );
    }

    #[test]
    fn invalid_operand_display() {
        let err = FormatterError::InvalidOperand {
            code: Code::Add_rm32_r32,
            operand: 2,
            count: 2,
        };
        assert_eq!(
            format!("{}", err),
            "Add_rm32_r32: operand 2 out of range (count 2)"
        );
    }

    #[test]
    fn kind_mismatch_display() {
        let err = FormatterError::OperandKindMismatch {
            code: Code::Lea_r64_m,
            operand: 1,
            expected: OperandCategory::Memory,
        };
        assert_eq!(format!("{}", err), "Lea_r64_m: operand 1 expects memory");
    }

    #[test]
    fn invalid_register_display() {
        let err = FormatterError::InvalidRegister {
            code: Code::Push_r64,
            operand: 0,
            register: Register::Eax,
        };
        assert_eq!(
            format!("{}", err),
            "Push_r64: register 'eax' is not valid for operand 0"
        );
    }

    #[test]
    fn decorator_display() {
        let err = FormatterError::UnsupportedDecorator {
            code: Code::Addps_xmm_xmmm128,
            decorator: DecoratorKind::Broadcast,
        };
        assert_eq!(
            format!("{}", err),
            "Addps_xmm_xmmm128: Broadcast decorator is not supported"
        );
        assert_eq!(
            format!("{}", FormatterError::InvalidSegment(Register::Rax)),
            "'rax' is not a segment register"
        );
    }

    #[test]
    fn declare_values_display() {
        let err = FormatterError::TooManyDeclareValues { max: 16, got: 17 };
        assert_eq!(format!("{}", err), "too many declare values: 17 (max 16)");
    }
}
