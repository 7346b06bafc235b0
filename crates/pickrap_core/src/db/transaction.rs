//! Scoped transaction helper for multi-statement writes.
//!
//! # Invariants
//! - The closure result decides the outcome: `Ok` commits, `Err` rolls back.
//! - A panic inside the closure drops the transaction, which rolls back.
//! - Writes take the reserved lock up front (`BEGIN IMMEDIATE`).

use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fmt::Display;

/// Runs `work` inside one immediate transaction on `conn`.
///
/// `scope` is a short label used in log lines only.
///
/// # Errors
/// - Returns the closure error unchanged after rolling back.
/// - Returns SQLite errors from `BEGIN`/`COMMIT` converted into `E`.
pub fn run_in_transaction<T, E, F>(conn: &Connection, scope: &str, work: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<rusqlite::Error> + Display,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    match work(&tx) {
        Ok(value) => {
            tx.commit()?;
            debug!("event=tx_commit module=db status=ok scope={scope}");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(
                    "event=tx_rollback module=db status=error scope={scope} error={rollback_err}"
                );
            } else {
                debug!("event=tx_rollback module=db status=ok scope={scope} cause={err}");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::run_in_transaction;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE items (name TEXT NOT NULL UNIQUE);")
            .unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM items;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn ok_result_commits_all_statements() {
        let conn = setup();
        run_in_transaction::<_, rusqlite::Error, _>(&conn, "test", |tx| {
            tx.execute("INSERT INTO items (name) VALUES ('a');", [])?;
            tx.execute("INSERT INTO items (name) VALUES ('b');", [])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count(&conn), 2);
    }

    #[test]
    fn err_result_rolls_back_earlier_statements() {
        let conn = setup();
        let result = run_in_transaction::<(), rusqlite::Error, _>(&conn, "test", |tx| {
            tx.execute("INSERT INTO items (name) VALUES ('a');", [])?;
            tx.execute("INSERT INTO items (name) VALUES ('a');", [])?;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(count(&conn), 0);
    }

    #[test]
    fn connection_is_reusable_after_rollback() {
        let conn = setup();
        let _ = run_in_transaction::<(), rusqlite::Error, _>(&conn, "test", |_| {
            Err(rusqlite::Error::QueryReturnedNoRows)
        });
        run_in_transaction::<_, rusqlite::Error, _>(&conn, "test", |tx| {
            tx.execute("INSERT INTO items (name) VALUES ('c');", [])
        })
        .unwrap();
        assert_eq!(count(&conn), 1);
    }
}
