pub mod message_db;
pub mod models;

pub use message_db::MessageStore;
pub use models::StoredMessage;

use std::fs;
use std::path::Path;

/// Ensure the parent directory of a database path exists.
pub fn ensure_db_dir(path: &str) -> std::io::Result<()> {
    if path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
