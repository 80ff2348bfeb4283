//! Logisim "v3.0 hex words addressed" rendering of a [`MemoryImage`].

use std::fmt::Write as _;
use std::io;

use crate::memory::MemoryImage;

pub const HEADER: &str = "v3.0 hex words addressed";

/// Render `img` as a header line followed by one `aa: bb bb ..` line per row.
pub fn render(img: &MemoryImage) -> String {
    let mut out = String::with_capacity(HEADER.len() + 16 * 52);
    out.push_str(HEADER);
    out.push('\n');
    for (base, cells) in img.rows() {
        // Writing into a String cannot fail.
        let _ = write!(out, "{base:02x}:");
        for cell in cells {
            let _ = write!(out, " {cell:02x}");
        }
        out.push('\n');
    }
    out
}

pub fn write_image<W: io::Write>(mut out: W, img: &MemoryImage) -> io::Result<()> {
    out.write_all(render(img).as_bytes())?;
    out.flush()
}
