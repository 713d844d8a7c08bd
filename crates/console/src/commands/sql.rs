//! Ad hoc SQL against the marketplace database.
//!
//! Statements run unparameterized, exactly as typed; this is an operator
//! tool, not a console action.

use std::io::Write;

use marketplace_console::config::ConnectionArgs;

use super::{AppError, connect};

/// Run a query and print its rows as tab-separated text or JSON.
///
/// # Errors
///
/// Returns an error if connecting or the query fails.
pub async fn query(statement: &str, json: bool, args: &ConnectionArgs) -> Result<(), AppError> {
    let executor = connect(args).await?;
    let mut out = std::io::stdout().lock();

    if json {
        let table = executor.query_table(sqlx::query(statement)).await?;
        writeln!(out, "{:#}", table.to_json())?;
    } else {
        let rows = executor
            .query_and_print(sqlx::query(statement), &mut out)
            .await?;
        writeln!(out, "({rows} rows)")?;
    }

    executor.close().await;
    Ok(())
}

/// Run a statement and print the number of affected rows.
///
/// # Errors
///
/// Returns an error if connecting or the statement fails.
pub async fn exec(statement: &str, args: &ConnectionArgs) -> Result<(), AppError> {
    let executor = connect(args).await?;
    let affected = executor.execute_update(sqlx::query(statement)).await?;
    executor.close().await;

    writeln!(std::io::stdout(), "{affected} rows affected")?;
    Ok(())
}
