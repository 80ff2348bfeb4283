use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AsmError;

/// Default link register read by RETURN.
pub const LINK_REGISTER: u8 = 30;

/// Bits in an opcode template; the remaining 24 bits of a word are operand fields.
pub const OPCODE_BITS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mnemonic {
    Add,
    AddSetFlag,
    Sub,
    SubSetFlag,
    And,
    Or,
    Load,
    Store,
    Address,
    Set,
    SetImm,
    Branch,
    BranchLink,
    BranchIfZero,
    BranchIfNotZero,
    Return,
}

/// Operand-layout shape shared by a group of mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// dest, src1, src2
    RegRegReg,
    /// dest, base, offset
    RegRegOffset,
    /// dest, label
    RegAddress,
    /// src1, src2, offset
    Store,
    /// dest, src
    RegReg,
    /// dest, imm8
    RegImm,
    /// label
    Jump,
    /// src, label
    CondJump,
    /// no operands
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Register,
    Immediate,
    Label,
}

impl OperandKind {
    pub fn describe(self) -> &'static str {
        match self {
            OperandKind::Register => "a register (X<n>)",
            OperandKind::Immediate => "a signed 8-bit integer",
            OperandKind::Label => "a label",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub mnemonic: Mnemonic,
    pub name: &'static str,
    pub opcode: u64,
}

pub const TABLE: &[InstrDesc] = &[
    InstrDesc { mnemonic: Mnemonic::Add, name: "ADD", opcode: 0b00001000_00000000_10000000_10000000_00000000 },
    InstrDesc { mnemonic: Mnemonic::AddSetFlag, name: "ADD_SETFLAG", opcode: 0b10001000_00000000_10000000_01000000_00000000 },
    InstrDesc { mnemonic: Mnemonic::Sub, name: "SUB", opcode: 0b00001000_00000000_01000000_00100000_00000000 },
    InstrDesc { mnemonic: Mnemonic::SubSetFlag, name: "SUB_SETFLAG", opcode: 0b10001000_00000000_01000000_00010000_00000000 },
    InstrDesc { mnemonic: Mnemonic::And, name: "AND", opcode: 0b00001000_00000000_00100000_00001000_00000000 },
    InstrDesc { mnemonic: Mnemonic::Or, name: "OR", opcode: 0b00001000_00000000_00010000_00000100_00000000 },
    InstrDesc { mnemonic: Mnemonic::Load, name: "LOAD", opcode: 0b01000100_00000000_10000000_00000010_00000000 },
    InstrDesc { mnemonic: Mnemonic::Store, name: "STORE", opcode: 0b01010000_01000000_10000000_00000001_00000000 },
    InstrDesc { mnemonic: Mnemonic::Address, name: "ADDRESS", opcode: 0b01001000_00000000_00000100_00000000_00000001 },
    InstrDesc { mnemonic: Mnemonic::Set, name: "SET", opcode: 0b00001000_00000000_00000100_00000000_10000000 },
    InstrDesc { mnemonic: Mnemonic::SetImm, name: "SET::IMM", opcode: 0b01001000_00000000_00000100_00000000_01000000 },
    InstrDesc { mnemonic: Mnemonic::Branch, name: "BRANCH", opcode: 0b01000001_00000000_00001000_00000000_00100000 },
    InstrDesc { mnemonic: Mnemonic::BranchLink, name: "BRANCH_LINK", opcode: 0b01000001_00000000_00001000_00000000_00010000 },
    InstrDesc { mnemonic: Mnemonic::BranchIfZero, name: "BRANCH_IF_ZERO", opcode: 0b01000010_00000000_00000010_00000000_00001000 },
    InstrDesc { mnemonic: Mnemonic::BranchIfNotZero, name: "BRANCH_IF_NOT_ZERO", opcode: 0b01000010_00000000_00000010_00000000_00000100 },
    InstrDesc { mnemonic: Mnemonic::Return, name: "RETURN", opcode: 0b00000000_10000000_00000100_00000000_00000010 },
];

impl Mnemonic {
    fn desc(self) -> &'static InstrDesc {
        // TABLE is ordered like the enum.
        &TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.desc().name
    }

    /// 40-bit opcode template occupying the top of the encoded word.
    pub fn opcode(self) -> u64 {
        self.desc().opcode
    }

    pub fn category(self) -> Category {
        use Mnemonic::*;
        match self {
            Add | AddSetFlag | Sub | SubSetFlag | And | Or => Category::RegRegReg,
            Load => Category::RegRegOffset,
            Address => Category::RegAddress,
            Store => Category::Store,
            Set => Category::RegReg,
            SetImm => Category::RegImm,
            Branch | BranchLink => Category::Jump,
            BranchIfZero | BranchIfNotZero => Category::CondJump,
            Return => Category::Return,
        }
    }
}

impl FromStr for Mnemonic {
    type Err = AsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TABLE
            .iter()
            .find(|d| d.name == s)
            .map(|d| d.mnemonic)
            .ok_or_else(|| AsmError::UnknownInstruction(s.to_string()))
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Category {
    /// Operand kinds in source order.
    pub fn operands(self) -> &'static [OperandKind] {
        use OperandKind::*;
        match self {
            Category::RegRegReg => &[Register, Register, Register],
            Category::RegRegOffset => &[Register, Register, Immediate],
            Category::RegAddress => &[Register, Label],
            Category::Store => &[Register, Register, Immediate],
            Category::RegReg => &[Register, Register],
            Category::RegImm => &[Register, Immediate],
            Category::Jump => &[Label],
            Category::CondJump => &[Register, Label],
            Category::Return => &[],
        }
    }

    pub fn arity(self) -> usize {
        self.operands().len()
    }

    /// One-based category number as used in the ISA documentation.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}
