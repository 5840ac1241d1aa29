use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Store-assigned identity of a history record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(String);

impl_id!(HistoryId);
