use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Value `{value}` does not fit in a signed byte (-128..=127)")]
    Range { value: String },

    #[error("`{mnemonic}` takes {expected} operand(s), found {found}")]
    OperandCount {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Unknown instruction: `{0}`")]
    UnknownInstruction(String),

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("Re-defined label: `{0}`")]
    DuplicateLabel(String),

    #[error("Cannot parse `{token}` as {expected}")]
    BadOperand { token: String, expected: &'static str },

    #[error("Out of memory: {requested} byte(s) at {at:#04x} exceeds the 256-byte image")]
    Capacity { at: usize, requested: usize },

    #[error("Invalid write size {0}: must be 1, 2, 4, 8 or 16 bytes")]
    WriteSize(usize),

    #[error("line {line}: {source}\n  | {text}")]
    AtLine {
        line: usize,
        text: String,
        #[source]
        source: Box<AsmError>,
    },
}

impl AsmError {
    /// Attach the source line an error was raised on.
    pub fn at(self, line: usize, text: &str) -> Self {
        match self {
            located @ AsmError::AtLine { .. } => located,
            other => AsmError::AtLine {
                line,
                text: text.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, with any line location stripped.
    pub fn root(&self) -> &AsmError {
        match self {
            AsmError::AtLine { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            AsmError::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T, E = AsmError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_wraps_once() {
        let err = AsmError::UndefinedLabel("end".into())
            .at(4, "BRANCH end")
            .at(9, "ignored");
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.root(), &AsmError::UndefinedLabel("end".into()));
        assert!(err.to_string().starts_with("line 4: Undefined label: `end`"));
    }
}
