//! The canonical pointer type and the bidirectional canonical/original
//! pointer map the normalizer populates and every downstream phase reads
//! `canonPath` values against.

mod map;
mod pointer;

pub use map::PtrMap;
pub use pointer::{CanonPointer, PointerError};
