use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Largest page a single list call may request.
pub const MAX_LIST_LIMIT: usize = 1000;

/// Parameters of one list call against a single namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub prefix: Option<String>,
    /// Resumption token from a previous page of the same listing.
    pub cursor: Option<String>,
    pub limit: usize,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: Option<impl Into<String>>) -> Self {
        self.prefix = prefix.map(Into::into);
        self
    }

    pub fn cursor(mut self, cursor: Option<impl Into<String>>) -> Self {
        self.cursor = cursor.map(Into::into);
        self
    }

    /// Set the page size, clamped into `1..=MAX_LIST_LIMIT`.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_LIST_LIMIT);
        self
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            cursor: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// One page of keys returned by a list call.
///
/// `complete` is `true` exactly when `cursor` is `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPage {
    pub keys: Vec<String>,
    pub cursor: Option<String>,
    pub complete: bool,
}

impl KeyPage {
    /// A final page: no cursor, nothing left to fetch.
    pub fn last(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: None,
            complete: true,
        }
    }

    /// An intermediate page carrying the cursor for the next call.
    pub fn partial(keys: Vec<String>, cursor: String) -> Self {
        Self {
            keys,
            cursor: Some(cursor),
            complete: false,
        }
    }
}
