//! Command implementations for the plasmid CLI

pub mod align;
pub mod trim;
