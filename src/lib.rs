//! Journal of daily activities rated by mood, energy and meaning, with analytics on top.
//! Entries are kept per owner in plain json lines files, so the journal can be inspected and
//! backed up without any tooling.
//!

pub mod analysis;
pub mod cli;
pub mod entry;
pub mod utils;
