/// What a non-mapped statement reported back from the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Rows inserted, updated or deleted by the statement.
    pub rows_affected: u64,
    /// Row id generated by the last insert on this connection, when the driver reports one.
    ///
    /// `SQLite` fills this after every statement (it is the connection's
    /// `last_insert_rowid`); Postgres never does, ids come back through `RETURNING`.
    pub last_insert_id: Option<i64>,
}

impl ExecOutcome {
    #[must_use]
    pub fn new(rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        Self {
            rows_affected,
            last_insert_id,
        }
    }
}
