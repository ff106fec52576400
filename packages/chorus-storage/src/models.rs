use serde::{Deserialize, Serialize};

/// One document returned by a similarity query, with the source tag it was
/// filtered by as provenance. Exists only within one retrieval's result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
	pub text: String,
	pub source_tag: String,
}
