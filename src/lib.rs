//! deadexports - find exported symbols nothing else in a TypeScript or
//! JavaScript project uses.
//!
//! This crate parses every module a `tsconfig.json` covers, records which
//! exports each module consumes from the others, and reports the exports
//! no module consumes.

pub mod analysis;
pub mod config;
pub mod export;
pub mod graph;
pub mod parser;
pub mod runner;
