//! Naming tables, index arithmetic and the column generator.

pub mod catalog;
pub mod columns;
