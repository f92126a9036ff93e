use serde::{Deserialize, Serialize};

use crate::namespace::StoreId;

/// A classification key (mail-folder path) and the namespace that owns it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationMapping {
    pub classification_key: String,
    pub store_id: StoreId,
    pub human_name: String,
}
