use std::fmt;

use kvr_types::StoreId;

/// The two ways a caller can name a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamespaceReference {
    /// A raw store identifier, e.g. `COURT_OF_APPEAL_KV`.
    StoreId(StoreId),
    /// A human-readable namespace name, e.g. `court-of-appeal`.
    Name(String),
}

impl NamespaceReference {
    /// Interpretations of a caller-supplied string, in resolution order:
    /// raw store id first, then name.
    ///
    /// A blank input yields only the name form, which never resolves.
    pub fn candidates(input: &str) -> Vec<Self> {
        let mut out = Vec::with_capacity(2);
        if let Ok(id) = StoreId::new(input) {
            out.push(Self::StoreId(id));
        }
        out.push(Self::Name(input.to_string()));
        out
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::StoreId(id) => id.as_str(),
            Self::Name(name) => name,
        }
    }
}

impl fmt::Display for NamespaceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreId(id) => write!(f, "store id {id}"),
            Self::Name(name) => write!(f, "name {name}"),
        }
    }
}
