//! Command implementations for the spool CLI

pub mod send;
pub mod serve;
