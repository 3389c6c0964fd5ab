//! Credential-gated access to a remote store.
//!
//! A missing credential does not fail construction. The session is left
//! unestablished, a warning is logged, and every store call made through it
//! fails with [`StoreError::NoSession`].

use crate::store::{RemoteStore, StoreError, StoreResult};

/// Environment variable consulted by [`SessionConfig::from_env`].
pub const ACCESS_TOKEN_ENV: &str = "SHEETLINK_ACCESS_TOKEN";

/// Configuration for opening a remote document.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Key or URL of the remote document.
    pub document: String,
    /// Access credential. `None` leaves the session unestablished.
    pub access_token: Option<String>,
}

impl SessionConfig {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            access_token: None,
        }
    }

    /// Take the access token from [`ACCESS_TOKEN_ENV`], if set and non-empty.
    pub fn from_env(document: impl Into<String>) -> Self {
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());
        Self {
            document: document.into(),
            access_token,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// A remote store reached through an authenticated session.
#[derive(Debug)]
pub struct Session<S> {
    document: String,
    store: Option<S>,
}

impl<S: RemoteStore> Session<S> {
    /// Establish a session with `connect`, which receives the document key
    /// and the access token.
    ///
    /// Connection failures propagate. A missing token does not: the session
    /// is returned unestablished.
    pub fn establish<F>(config: SessionConfig, connect: F) -> StoreResult<Self>
    where
        F: FnOnce(&str, &str) -> StoreResult<S>,
    {
        let Some(token) = config.access_token.as_deref() else {
            tracing::warn!(
                document = %config.document,
                "no access token configured (set {ACCESS_TOKEN_ENV}); remote calls will fail"
            );
            return Ok(Self {
                document: config.document,
                store: None,
            });
        };

        let store = connect(&config.document, token)?;
        tracing::info!(document = %config.document, "remote session established");
        Ok(Self {
            document: config.document,
            store: Some(store),
        })
    }

    pub fn is_established(&self) -> bool {
        self.store.is_some()
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// The underlying store, if the session was established.
    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    fn live(&mut self) -> StoreResult<&mut S> {
        self.store.as_mut().ok_or(StoreError::NoSession)
    }
}

impl<S: RemoteStore> RemoteStore for Session<S> {
    fn list_sheets(&mut self) -> StoreResult<Vec<String>> {
        self.live()?.list_sheets()
    }

    fn sheet_extent(&mut self, sheet: u32) -> StoreResult<(u32, u32)> {
        self.live()?.sheet_extent(sheet)
    }

    fn read_display_string(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        self.live()?.read_display_string(sheet, row, col)
    }

    fn read_numeric_value(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        self.live()?.read_numeric_value(sheet, row, col)
    }

    fn write_cell(&mut self, sheet: u32, row: u32, col: u32, value: &str) -> StoreResult<()> {
        self.live()?.write_cell(sheet, row, col, value)
    }

    fn persist(&mut self, sheet: u32) -> StoreResult<()> {
        self.live()?.persist(sheet)
    }
}
