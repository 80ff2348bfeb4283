use crate::encoder::Encoded;
use crate::labels::LabelTable;

/// `aa: wwwwwwwwwwwwwwww  source`
pub fn fmt_encoded(e: &Encoded) -> String {
    format!("{:02x}: {:016x}  {}", e.addr, e.word, e.line.text)
}

/// Full-width bit string of an instruction word.
pub fn fmt_bits(word: u64) -> String {
    format!("{word:064b}")
}

pub fn fmt_labels(title: &str, table: &LabelTable) -> String {
    let mut out = format!("{title}:\n");
    for (name, addr) in table.iter() {
        out.push_str(&format!("  {addr} ({addr:02x})  {name}\n"));
    }
    out
}
