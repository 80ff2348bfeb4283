//! Line cleanup and `.text` / `.data` segmentation.

use crate::error::{AsmError, Result};
use crate::operand::is_identifier;

pub const TEXT_MARKER: &str = ".text";
pub const DATA_MARKER: &str = ".data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based physical line number.
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Split a leading `name:` marker off the line.
    pub fn split_label(&self) -> (Option<&str>, &str) {
        split_label(&self.text)
    }
}

/// `("name", rest)` if `s` starts with an identifier followed by a single
/// `:`. `SET::IMM` is not a label.
pub fn split_label(s: &str) -> (Option<&str>, &str) {
    if let Some(idx) = s.find(':') {
        let (name, rest) = (&s[..idx], &s[idx + 1..]);
        if is_identifier(name) && !rest.starts_with(':') {
            return (Some(name), rest);
        }
    }
    (None, s)
}

fn clean(raw: &str) -> String {
    let code = raw.split('#').next().unwrap_or_default().trim();
    let mut out = String::with_capacity(code.len());
    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == ',' || c == ':' {
            while chars.next_if(|n| n.is_whitespace()).is_some() {}
        }
    }
    out
}

/// Strip comments and blank lines, normalise spacing after `,` and `:`,
/// and merge bare `name:` lines into the line that follows them.
pub fn preprocess(text: &str) -> Result<Vec<SourceLine>> {
    let mut lines = Vec::new();
    let mut pending: Option<SourceLine> = None;
    for (idx, raw) in text.lines().enumerate() {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            continue;
        }
        let line = SourceLine::new(idx + 1, cleaned);
        if let Some(label) = pending.take() {
            if line.text == TEXT_MARKER || line.text == DATA_MARKER {
                return Err(AsmError::Syntax(format!(
                    "label `{}` is followed by a segment marker",
                    label.text
                ))
                .at(label.number, &label.text));
            }
            lines.push(SourceLine::new(label.number, format!("{}{}", label.text, line.text)));
            continue;
        }
        let bare_label = matches!(line.split_label(), (Some(_), ""));
        if bare_label {
            pending = Some(line);
        } else {
            lines.push(line);
        }
    }
    if let Some(label) = pending {
        return Err(AsmError::Syntax(format!("label `{}` is not followed by anything", label.text))
            .at(label.number, &label.text));
    }
    Ok(lines)
}

/// Cleaned source split into its two segments.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub text: Vec<SourceLine>,
    pub data: Vec<SourceLine>,
}

impl Program {
    pub fn parse(source: &str) -> Result<Self> {
        Self::from_lines(preprocess(source)?)
    }

    pub fn from_lines(lines: Vec<SourceLine>) -> Result<Self> {
        let text_at = lines.iter().position(|l| l.text == TEXT_MARKER).ok_or_else(|| {
            AsmError::Syntax("missing `.text` segment".into())
        })?;
        let data_at = lines.iter().position(|l| l.text == DATA_MARKER).ok_or_else(|| {
            AsmError::Syntax("missing `.data` segment".into())
        })?;
        if data_at < text_at {
            let marker = &lines[data_at];
            return Err(AsmError::Syntax("`.data` must follow `.text`".into())
                .at(marker.number, &marker.text));
        }
        let mut lines = lines;
        let data = lines.split_off(data_at + 1);
        lines.truncate(data_at);
        let text = lines.split_off(text_at + 1);
        Ok(Self { text, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[SourceLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn cleans_and_merges_labels() {
        let src = "\
# header comment
.text
  start:
    ADD X1, X2,   X3   # sum
loop:  SET::IMM X4, -1

.data
count: 5
";
        let lines = preprocess(src).unwrap();
        assert_eq!(
            texts(&lines),
            vec![".text", "start:ADD X1,X2,X3", "loop:SET::IMM X4,-1", ".data", "count:5"]
        );
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn double_colon_is_not_a_label() {
        assert_eq!(split_label("SET::IMM X1,2"), (None, "SET::IMM X1,2"));
        assert_eq!(split_label("a:SET::IMM X1,2"), (Some("a"), "SET::IMM X1,2"));
    }

    #[test]
    fn dangling_label_is_rejected() {
        let err = preprocess(".text\nRETURN\nend:\n").unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err.root(), AsmError::Syntax(_)));
    }

    #[test]
    fn segments() {
        let p = Program::parse("ignored\n.text\nRETURN\n.data\nx:1\ny:2").unwrap();
        assert_eq!(texts(&p.text), vec!["RETURN"]);
        assert_eq!(texts(&p.data), vec!["x:1", "y:2"]);
    }

    #[test]
    fn segment_markers_required_in_order() {
        assert!(matches!(Program::parse(".data\nx:1"), Err(AsmError::Syntax(_))));
        assert!(matches!(Program::parse(".text\nRETURN"), Err(AsmError::Syntax(_))));
        let err = Program::parse(".data\n.text\n").unwrap_err();
        assert!(matches!(err.root(), AsmError::Syntax(_)));
    }
}
