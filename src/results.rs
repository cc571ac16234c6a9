//! Decoded query results shared by every backend.

mod exec;
mod result_set;
mod row;

pub use exec::ExecOutcome;
pub use result_set::ResultSet;
pub use row::DbRow;
