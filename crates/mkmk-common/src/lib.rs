mod file;
mod identifier;

pub use file::{FileHandle, FileKind};
pub use identifier::Identifier;
