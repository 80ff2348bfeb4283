use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ikea_asm::image::write_image;
use ikea_asm::listing::{fmt_encoded, fmt_labels};
use ikea_asm::{AsmConfig, Assembler, DuplicateLabels, MemoryImage};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble an IKEA source file into Logisim RAM and ROM images"
)]
struct Opts {
    /// Source file to assemble (must end in .ikea)
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
    /// Output path for the .data image (RAM)
    #[arg(short = 'a', long, value_name = "FILE")]
    ram: PathBuf,
    /// Output path for the .text image (ROM)
    #[arg(short = 'o', long, value_name = "FILE")]
    rom: PathBuf,
    /// Export both label tables as JSON
    #[arg(long, value_name = "FILE")]
    symbols: Option<PathBuf>,
    /// Print the encoded instructions and label tables
    #[arg(long)]
    dump: bool,
    /// Let a later label definition replace an earlier one instead of failing
    #[arg(long)]
    allow_redefine: bool,
}

fn write_image_file(path: &Path, img: &MemoryImage) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_image(BufWriter::new(file), img).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    if !opts.file.exists() {
        bail!("source file {} does not exist", opts.file.display());
    }
    if opts.file.extension().and_then(|e| e.to_str()) != Some("ikea") {
        bail!("{} is not a .ikea file", opts.file.display());
    }
    let source = fs::read_to_string(&opts.file)
        .with_context(|| format!("reading {}", opts.file.display()))?;

    let cfg = AsmConfig {
        duplicate_labels: if opts.allow_redefine {
            DuplicateLabels::LastWins
        } else {
            DuplicateLabels::Reject
        },
        ..AsmConfig::default()
    };
    let asm = Assembler::new(cfg)
        .assemble(&source)
        .with_context(|| format!("assembling {}", opts.file.display()))?;

    write_image_file(&opts.ram, &asm.ram)?;
    write_image_file(&opts.rom, &asm.rom)?;
    info!(
        ram = %opts.ram.display(),
        rom = %opts.rom.display(),
        data_bytes = asm.ram.used(),
        text_bytes = asm.rom.used(),
        "images written"
    );

    if let Some(path) = &opts.symbols {
        fs::write(path, asm.symbols_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if opts.dump {
        for e in &asm.instructions {
            println!("{}", fmt_encoded(e));
        }
        print!("{}", fmt_labels("text labels", &asm.text_labels));
        print!("{}", fmt_labels("data labels", &asm.data_labels));
    }

    Ok(())
}
