//! File output for resolved estimates.

pub mod export;
