//! Interactive console session.

use std::io::Write;

use marketplace_console::config::ConnectionArgs;
use marketplace_console::console::StdConsole;
use marketplace_console::menu::Menu;

use super::{AppError, connect};

/// Run the menus on stdin/stdout until the user exits.
///
/// The connection is closed even when the menu fails.
///
/// # Errors
///
/// Returns an error if connecting fails or the console breaks.
pub async fn run(args: &ConnectionArgs) -> Result<(), AppError> {
    let executor = connect(args).await?;
    let mut console = StdConsole::stdio();

    let result = Menu::new(executor.pool(), &mut console).run().await;

    write!(console.out(), "Disconnecting from database...")?;
    console.out().flush()?;
    executor.close().await;
    writeln!(console.out(), "Done\n\nBye !")?;

    result?;
    Ok(())
}
