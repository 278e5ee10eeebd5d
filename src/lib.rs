//! Pantry catalog core library exports

pub mod arch;
pub mod catalog;
