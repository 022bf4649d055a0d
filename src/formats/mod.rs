//! File format adapters
//!
//! Reading fragment lists and writing chains.

pub mod fragments;
pub mod output;

pub use fragments::{read_fragment_bytes, read_fragment_file, read_fragments, FragmentRecord};
pub use output::{write_chain, ChainWriter};
