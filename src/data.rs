use tracing::{debug, info};

use crate::error::{AsmError, Result};
use crate::labels::{DuplicateLabels, LabelTable};
use crate::memory::MemoryImage;
use crate::operand::{parse_label, parse_signed_byte, to_byte};
use crate::source::SourceLine;

/// `label:value` from the `.data` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDecl {
    pub label: String,
    pub value: i8,
}

impl DataDecl {
    pub fn parse(s: &str) -> Result<Self> {
        let (label, value) = s
            .split_once(':')
            .ok_or_else(|| AsmError::Syntax(format!("expected `label:value`, found `{s}`")))?;
        let label = parse_label(label)?;
        let value = parse_signed_byte(value)?;
        Ok(Self {
            label: label.to_string(),
            value,
        })
    }

    pub fn byte(&self) -> u8 {
        to_byte(self.value)
    }
}

/// Write one byte per declaration into `ram` and return the data label table.
pub fn encode_data(
    data: &[SourceLine],
    ram: &mut MemoryImage,
    policy: DuplicateLabels,
) -> Result<LabelTable> {
    let mut table = LabelTable::new();
    for line in data {
        let at = |e: AsmError| e.at(line.number, &line.text);
        let decl = DataDecl::parse(&line.text).map_err(at)?;
        let addr = ram.write_u8(decl.byte()).map_err(at)?;
        table.insert(&decl.label, addr, policy).map_err(at)?;
        debug!(label = %decl.label, value = decl.value, addr = %addr, "data");
    }
    info!(bytes = ram.used(), labels = table.len(), "data segment encoded");
    Ok(table)
}
