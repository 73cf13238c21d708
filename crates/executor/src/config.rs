//! Repository configuration
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! connection_string = "memory://"
//! database = "testdata"
//! collection = "companies"
//! # "unacknowledged", "acknowledged" (default) or "journaled"
//! write_concern = "acknowledged"
//! ```
//!
//! The call wrapper cannot be expressed in TOML; it defaults to identity and
//! is attached with [`RepositoryConfig::with_wrapper`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use quarry_storage::WriteConcern;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Callable run around every terminal store call
///
/// The wrapper receives the operation as a thunk and must invoke it at most
/// once. Retry, timing, or tracing spans belong here. The default runs the
/// thunk directly.
#[derive(Clone)]
pub struct CallWrapper(Arc<dyn Fn(&mut dyn FnMut()) + Send + Sync>);

impl CallWrapper {
    /// Wrap with a custom callable
    pub fn new(wrapper: impl Fn(&mut dyn FnMut()) + Send + Sync + 'static) -> Self {
        Self(Arc::new(wrapper))
    }

    /// Run the thunk directly
    pub fn identity() -> Self {
        Self::new(|thunk| thunk())
    }

    /// Invoke the wrapper around `thunk`
    pub fn call(&self, thunk: &mut dyn FnMut()) {
        (self.0)(thunk)
    }
}

impl Default for CallWrapper {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for CallWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallWrapper")
    }
}

fn default_connection_string() -> String {
    "memory://".to_string()
}

/// Connection, collection and execution settings for one repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Where the store lives
    #[serde(default = "default_connection_string")]
    pub connection_string: String,
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
    /// Safe-write mode forwarded unmodified to the store
    #[serde(default)]
    pub write_concern: WriteConcern,
    /// Wrapper around terminal store calls
    #[serde(skip)]
    pub wrapper: CallWrapper,
}

impl RepositoryConfig {
    /// Config for `database.collection` with default settings
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            connection_string: default_connection_string(),
            database: database.into(),
            collection: collection.into(),
            write_concern: WriteConcern::default(),
            wrapper: CallWrapper::default(),
        }
    }

    /// Set the connection string
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = connection_string.into();
        self
    }

    /// Set the write concern
    pub fn with_write_concern(mut self, write_concern: WriteConcern) -> Self {
        self.write_concern = write_concern;
        self
    }

    /// Set the call wrapper
    pub fn with_wrapper(mut self, wrapper: impl Fn(&mut dyn FnMut()) + Send + Sync + 'static) -> Self {
        self.wrapper = CallWrapper::new(wrapper);
        self
    }

    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            reason: e.to_string(),
        })
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text (the wrapper is omitted)
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config {
            reason: e.to_string(),
        })
    }
}
