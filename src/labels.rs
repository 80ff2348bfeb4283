use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AsmError, Result};
use crate::memory::{predict_address, Addr};
use crate::source::SourceLine;

/// What to do when a segment defines the same label twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLabels {
    #[default]
    Reject,
    LastWins,
}

/// Label name to address for one segment. Written by a single pass, read-only after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable {
    labels: BTreeMap<String, Addr>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, addr: Addr, policy: DuplicateLabels) -> Result<()> {
        if let Some(prev) = self.labels.insert(name.to_string(), addr) {
            match policy {
                DuplicateLabels::Reject => {
                    self.labels.insert(name.to_string(), prev);
                    return Err(AsmError::DuplicateLabel(name.to_string()));
                }
                DuplicateLabels::LastWins => {
                    debug!(label = name, old = %prev, new = %addr, "label redefined");
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Addr> {
        self.labels.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Addr)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// First pass over `.text`: every labelled line gets the address its
/// instruction will land on, counting all lines, labelled or not.
pub fn prescan(text: &[SourceLine], policy: DuplicateLabels) -> Result<LabelTable> {
    let mut table = LabelTable::new();
    for (ordinal, line) in text.iter().enumerate() {
        let (Some(name), _) = line.split_label() else {
            continue;
        };
        let addr = predict_address(ordinal).map_err(|e| e.at(line.number, &line.text))?;
        table
            .insert(name, addr, policy)
            .map_err(|e| e.at(line.number, &line.text))?;
        debug!(label = name, addr = %addr, "predicted");
    }
    Ok(table)
}

/// Resolves label operands against the instruction table, then the data table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub text: &'a LabelTable,
    pub data: &'a LabelTable,
}

impl<'a> Resolver<'a> {
    pub fn new(text: &'a LabelTable, data: &'a LabelTable) -> Self {
        Self { text, data }
    }

    pub fn resolve(&self, name: &str) -> Result<Addr> {
        self.text
            .get(name)
            .or_else(|| self.data.get(name))
            .ok_or_else(|| AsmError::UndefinedLabel(name.to_string()))
    }
}
