use crate::error::{AsmError, Result};
use crate::isa::OperandKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(u8),
    Immediate(i8),
    Label(String),
}

impl Operand {
    /// Read `token` as the operand kind its slot expects.
    pub fn parse(kind: OperandKind, token: &str) -> Result<Self> {
        match kind {
            OperandKind::Register => parse_register(token).map(Operand::Register),
            OperandKind::Immediate => parse_signed_byte(token).map(Operand::Immediate),
            OperandKind::Label => parse_label(token).map(|l| Operand::Label(l.to_string())),
        }
    }
}

fn bad(token: &str, kind: OperandKind) -> AsmError {
    AsmError::BadOperand {
        token: token.to_string(),
        expected: kind.describe(),
    }
}

pub fn parse_register(token: &str) -> Result<u8> {
    token
        .strip_prefix('X')
        .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse::<u8>().ok())
        .ok_or_else(|| bad(token, OperandKind::Register))
}

/// Decimal integer in `-128..=127`. Out-of-range integers are a range
/// error; anything that is not an integer at all is a bad operand.
pub fn parse_signed_byte(token: &str) -> Result<i8> {
    let digits = token.strip_prefix(&['+', '-'][..]).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad(token, OperandKind::Immediate));
    }
    token
        .parse::<i8>()
        .map_err(|_| AsmError::Range { value: token.to_string() })
}

pub fn parse_label(token: &str) -> Result<&str> {
    if is_identifier(token) {
        Ok(token)
    } else {
        Err(bad(token, OperandKind::Label))
    }
}

pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Two's-complement byte of a signed value.
pub fn to_byte(v: i8) -> u8 {
    v as u8
}
