//! Second pass: classify each `.text` line and emit its 64-bit word.

use tracing::{debug, info};

use crate::error::{AsmError, Result};
use crate::isa::{Category, Mnemonic, OPCODE_BITS};
use crate::labels::Resolver;
use crate::memory::{Addr, MemoryImage};
use crate::operand::{to_byte, Operand};
use crate::source::{split_label, SourceLine};

/// One parsed instruction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Parse `[label:]MNEMONIC op,op,...`. The label, if any, is dropped.
    pub fn parse(line: &str) -> Result<Self> {
        let (_, body) = split_label(line);
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        let mnemonic: Mnemonic = name.parse()?;
        let tokens: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(str::trim).collect()
        };
        let kinds = mnemonic.category().operands();
        if tokens.len() != kinds.len() {
            return Err(AsmError::OperandCount {
                mnemonic: mnemonic.name(),
                expected: kinds.len(),
                found: tokens.len(),
            });
        }
        let operands = kinds
            .iter()
            .zip(tokens)
            .map(|(kind, tok)| Operand::parse(*kind, tok))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { mnemonic, operands })
    }

    pub fn category(&self) -> Category {
        self.mnemonic.category()
    }

    /// Build the word: opcode template, then fields A, B, C.
    /// RETURN carries `link_register` in field A.
    pub fn encode(&self, labels: &Resolver<'_>, link_register: u8) -> Result<u64> {
        let field = |i: usize| -> Result<u8> {
            match &self.operands[i] {
                Operand::Register(r) => Ok(*r),
                Operand::Immediate(v) => Ok(to_byte(*v)),
                Operand::Label(name) => labels.resolve(name).map(Addr::value),
            }
        };
        let (a, b, c) = match self.category() {
            Category::RegRegReg | Category::RegRegOffset => (field(2)?, field(1)?, field(0)?),
            Category::Store => (field(2)?, field(0)?, field(1)?),
            Category::RegAddress | Category::RegReg | Category::RegImm => (field(1)?, 0, field(0)?),
            Category::Jump => (field(0)?, 0, 0),
            Category::CondJump => (field(1)?, field(0)?, 0),
            Category::Return => (link_register, 0, 0),
        };
        Ok(pack(self.mnemonic.opcode(), a, b, c))
    }
}

pub fn pack(opcode: u64, a: u8, b: u8, c: u8) -> u64 {
    debug_assert!(opcode < 1 << OPCODE_BITS);
    (opcode << 24) | (u64::from(a) << 16) | (u64::from(b) << 8) | u64::from(c)
}

/// An instruction as placed in ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub addr: Addr,
    pub word: u64,
    pub line: SourceLine,
}

/// Encode every `.text` line into `rom`, stopping at the first error.
pub fn encode_text(
    text: &[SourceLine],
    labels: &Resolver<'_>,
    rom: &mut MemoryImage,
    link_register: u8,
) -> Result<Vec<Encoded>> {
    let mut out = Vec::with_capacity(text.len());
    for line in text {
        let at = |e: AsmError| e.at(line.number, &line.text);
        let inst = Instruction::parse(&line.text).map_err(at)?;
        let word = inst.encode(labels, link_register).map_err(at)?;
        let addr = rom.write_u64(word).map_err(at)?;
        debug!(addr = %addr, "{} -> {word:016x}", inst.mnemonic);
        out.push(Encoded {
            addr,
            word,
            line: line.clone(),
        });
    }
    info!(instructions = out.len(), bytes = rom.used(), "text segment encoded");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::LabelTable;

    #[test]
    fn parse_splits_operands() {
        let inst = Instruction::parse("top:STORE X1,X2,-4").unwrap();
        assert_eq!(inst.mnemonic, Mnemonic::Store);
        assert_eq!(
            inst.operands,
            vec![Operand::Register(1), Operand::Register(2), Operand::Immediate(-4)]
        );
        assert_eq!(Instruction::parse("RETURN").unwrap().operands, vec![]);
    }

    #[test]
    fn operand_count_checked() {
        assert_eq!(
            Instruction::parse("ADD X1,X2"),
            Err(AsmError::OperandCount { mnemonic: "ADD", expected: 3, found: 2 })
        );
        assert_eq!(
            Instruction::parse("RETURN X1"),
            Err(AsmError::OperandCount { mnemonic: "RETURN", expected: 0, found: 1 })
        );
    }

    #[test]
    fn pack_layout() {
        assert_eq!(pack(0x01, 0xaa, 0xbb, 0xcc), 0x01aa_bbcc);
    }

    #[test]
    fn words_are_written_in_order() {
        let empty = LabelTable::new();
        let r = Resolver::new(&empty, &empty);
        let text = vec![SourceLine::new(2, "SET X1,X2"), SourceLine::new(3, "RETURN")];
        let mut rom = MemoryImage::new();
        let enc = encode_text(&text, &r, &mut rom, 30).unwrap();
        assert_eq!(enc[1].addr, Addr(8));
        assert_eq!(rom.read_u64(8), Some(enc[1].word));
        assert_eq!(rom.used(), 16);
    }
}
