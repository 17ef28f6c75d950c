use thiserror::Error;

#[derive(Debug, Error)]
pub enum DropError {
    #[error("Storage error: {0}")]
    Storage(rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for DropError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DropError::Constraint(err.to_string())
            }
            other => DropError::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_failure_is_classified() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY)").unwrap();
        conn.execute("INSERT INTO t (id) VALUES (1)", []).unwrap();
        let err: DropError = conn
            .execute("INSERT INTO t (id) VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DropError::Constraint(_)));
    }

    #[test]
    fn test_other_failures_are_storage() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: DropError = conn
            .execute("SELECT * FROM missing_table", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DropError::Storage(_)));
    }
}
