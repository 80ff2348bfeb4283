pub mod assembler;
pub mod data;
pub mod encoder;
pub mod error;
pub mod image;
pub mod isa;
pub mod labels;
pub mod listing;
pub mod memory;
pub mod operand;
pub mod source;

pub use assembler::{assemble, AsmConfig, Assembler, Assembly};
pub use error::AsmError;
pub use labels::{DuplicateLabels, LabelTable};
pub use memory::{Addr, MemoryImage};
