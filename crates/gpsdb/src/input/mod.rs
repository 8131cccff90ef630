//! Table loading, persistence and the in-memory table model.

mod parser;
mod table;

pub use parser::{read_table, write_table, Parser, ParserConfig};
pub use table::{Cell, Change, ChangeLog, Table, PLACEHOLDER};
