//! Source generators for McuCore headers.

pub mod keep_literal;

pub use keep_literal::{KeepLiteralEmitter, KeepSize, FRAGMENT_LEN};

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("fragment length {0} is too short, need at least 2")]
    FragmentTooShort(usize),
}
