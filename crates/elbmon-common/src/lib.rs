//! Value types shared by the elbmon crates.

pub mod types;
