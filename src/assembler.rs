use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data::encode_data;
use crate::encoder::{encode_text, Encoded};
use crate::error::Result;
use crate::isa::LINK_REGISTER;
use crate::labels::{prescan, DuplicateLabels, LabelTable, Resolver};
use crate::memory::MemoryImage;
use crate::source::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsmConfig {
    pub duplicate_labels: DuplicateLabels,
    /// Register RETURN jumps through.
    pub link_register: u8,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            duplicate_labels: DuplicateLabels::Reject,
            link_register: LINK_REGISTER,
        }
    }
}

/// Both images and label tables of a successful run.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub ram: MemoryImage,
    pub rom: MemoryImage,
    pub data_labels: LabelTable,
    pub text_labels: LabelTable,
    pub instructions: Vec<Encoded>,
}

#[derive(Serialize)]
struct Symbols<'a> {
    text: &'a LabelTable,
    data: &'a LabelTable,
}

impl Assembly {
    pub fn symbols_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Symbols {
            text: &self.text_labels,
            data: &self.data_labels,
        })
    }
}

pub struct Assembler {
    cfg: AsmConfig,
}

impl Assembler {
    pub fn new(cfg: AsmConfig) -> Self {
        Self { cfg }
    }

    pub fn assemble(&self, source: &str) -> Result<Assembly> {
        let program = Program::parse(source)?;
        self.assemble_program(&program)
    }

    /// Data segment, then the label prescan, then encoding. Nothing is
    /// returned unless every phase succeeds.
    pub fn assemble_program(&self, program: &Program) -> Result<Assembly> {
        let policy = self.cfg.duplicate_labels;

        let mut ram = MemoryImage::new();
        let data_labels = encode_data(&program.data, &mut ram, policy)?;

        let text_labels = prescan(&program.text, policy)?;
        for (name, _) in text_labels.iter().filter(|(n, _)| data_labels.contains(n)) {
            warn!(label = name, "defined in both .text and .data; .text wins");
        }
        info!(labels = text_labels.len(), "text labels predicted");

        let mut rom = MemoryImage::new();
        let resolver = Resolver::new(&text_labels, &data_labels);
        let instructions = encode_text(&program.text, &resolver, &mut rom, self.cfg.link_register)?;

        Ok(Assembly {
            ram,
            rom,
            data_labels,
            text_labels,
            instructions,
        })
    }
}

/// Assemble with the default configuration.
pub fn assemble(source: &str) -> Result<Assembly> {
    Assembler::new(AsmConfig::default()).assemble(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_partial_json() {
        let cfg: AsmConfig = serde_json::from_str(r#"{"duplicate_labels":"last_wins"}"#).unwrap();
        assert_eq!(cfg.duplicate_labels, DuplicateLabels::LastWins);
        assert_eq!(cfg.link_register, 30);
    }

    #[test]
    fn symbols_export() {
        let asm = assemble(".text\nend:RETURN\n.data\nfoo:5\n").unwrap();
        let v: serde_json::Value = serde_json::from_str(&asm.symbols_json().unwrap()).unwrap();
        assert_eq!(v["text"]["end"], 0);
        assert_eq!(v["data"]["foo"], 0);
    }
}
