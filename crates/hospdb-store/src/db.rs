//! Database connection management
//!
//! Resolves a connection URL to a SQLite location and keeps one long-lived
//! connection alive, reopening it when it has been closed.

#![allow(clippy::result_large_err)]

use std::fmt;
use std::path::{Path, PathBuf};

use hospdb_core_types::Sensitive;
use rusqlite::Connection;
use serde::Deserialize;

use crate::errors::{fetch_failure, unsupported_url, Result};

/// Connection parameters supplied at service construction
///
/// User and password are carried for parity with server-backed stores; SQLite
/// does not authenticate. The password never appears in `Debug` output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: Sensitive<String>,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            password: Sensitive::new(password.into()),
        }
    }

    /// Private in-memory database (lost when the connection closes)
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:", "", "")
    }

    /// # Errors
    /// * `FetchFailed` - If the URL carries a scheme other than `sqlite`
    pub fn location(&self) -> Result<SqliteLocation> {
        SqliteLocation::parse(&self.url)
    }
}

/// Where a SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    Memory,
    File(PathBuf),
}

impl SqliteLocation {
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>`, `sqlite:<path>`
    /// or a bare filesystem path
    ///
    /// # Errors
    /// * `FetchFailed` - For empty URLs and non-sqlite schemes (`postgres://...`)
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url == ":memory:" || url == "sqlite::memory:" {
            return Ok(SqliteLocation::Memory);
        }

        let path = if let Some(rest) = url.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = url.strip_prefix("sqlite:") {
            rest
        } else if url.contains("://") {
            return Err(unsupported_url(url));
        } else {
            url
        };

        if path.is_empty() {
            return Err(unsupported_url(url));
        }
        Ok(SqliteLocation::File(PathBuf::from(path)))
    }
}

impl fmt::Display for SqliteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqliteLocation::Memory => f.write_str(":memory:"),
            SqliteLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| fetch_failure("connect", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|e| fetch_failure("connect", e))?;
    configure(&conn)?;
    Ok(conn)
}

/// Open whatever the location names
pub fn open_location(location: &SqliteLocation) -> Result<Connection> {
    match location {
        SqliteLocation::Memory => open_in_memory(),
        SqliteLocation::File(path) => open(path),
    }
}

/// Configure a connection
///
/// Foreign keys are off by default in SQLite; the schema's cascade and
/// set-null rules depend on them.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| fetch_failure("configure", e))?;

    Ok(())
}

/// Connection liveness manager
///
/// Holds at most one connection. Every operation goes through
/// [`ConnectionManager::connection`], which reopens from the stored
/// configuration when the handle has been closed. There is no retry limit and
/// no backoff: a failed reopen surfaces as a fetch failure and the next call
/// tries again.
///
/// Reopening an in-memory location yields a new, empty database.
///
/// Not thread-safe (no Arc/Mutex); callers that share a manager across
/// threads must synchronize externally.
pub struct ConnectionManager {
    config: ConnectionConfig,
    location: SqliteLocation,
    conn: Option<Connection>,
}

impl ConnectionManager {
    /// Resolve the URL and open the first connection
    ///
    /// # Errors
    /// * `FetchFailed` - If the URL is not a SQLite location or the open fails
    pub fn connect(config: ConnectionConfig) -> Result<Self> {
        let location = config.location()?;
        let conn = open_location(&location)?;
        tracing::debug!(location = %location, user = %config.user, "connection opened");
        Ok(Self {
            config,
            location,
            conn: Some(conn),
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn location(&self) -> &SqliteLocation {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// A usable connection, reopened first if it was closed
    ///
    /// # Errors
    /// * `FetchFailed` - If reopening fails
    pub fn connection(&mut self) -> Result<&mut Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::debug!(location = %self.location, "reopening closed connection");
                open_location(&self.location)?
            }
        };
        Ok(self.conn.insert(conn))
    }

    /// Close the held connection; a later `connection()` reopens it
    ///
    /// Closing an already closed manager is a no-op.
    ///
    /// # Errors
    /// * `FetchFailed` - If SQLite refuses to close; the handle is kept open
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            if let Err((conn, err)) = conn.close() {
                self.conn = Some(conn);
                return Err(fetch_failure("close", err));
            }
            tracing::debug!(location = %self.location, "connection closed");
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("config", &self.config)
            .field("location", &self.location)
            .field("open", &self.is_open())
            .finish()
    }
}
