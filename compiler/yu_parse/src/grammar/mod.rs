//! Grammar productions, split by area.
//!
//! - [`decl`]: program-level declarations (var/const, function, class,
//!   enum, import) and generic parameter lists
//! - [`stmt`]: statements (if/while/for/block/return/switch/...)
//! - [`expr`]: Pratt expression parsing with compound-operator synthesis
//! - [`ty`]: type expressions and generic applications

mod decl;
mod expr;
mod stmt;
mod ty;
