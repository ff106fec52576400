/// Payload field carrying a document's raw text.
pub const TEXT_FIELD: &str = "text";
/// Payload field partitioning the corpus by persona.
pub const SOURCE_TAG_FIELD: &str = "source";

use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, Filter, Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind,
};

use crate::{Result, models::RetrievedDocument};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &chorus_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Similarity query restricted to one persona's documents, most-similar
	/// first. Points without a text payload are skipped rather than surfaced
	/// as empty documents.
	pub async fn query_by_embedding(
		&self,
		vector: Vec<f32>,
		source_tag: &str,
		limit: u32,
	) -> Result<Vec<RetrievedDocument>> {
		if vector.len() != self.vector_dim as usize {
			return Err(crate::Error::InvalidArgument(format!(
				"Query vector has {} dimensions; the collection expects {}.",
				vector.len(),
				self.vector_dim,
			)));
		}

		let filter =
			Filter::all([Condition::matches(SOURCE_TAG_FIELD, source_tag.to_string())]);
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.filter(filter)
			.with_payload(true)
			.limit(limit as u64);
		let response = self.client.query(search).await?;
		let documents = response
			.result
			.iter()
			.filter_map(|point| document_from_point(point, source_tag))
			.collect();

		Ok(documents)
	}
}

fn document_from_point(point: &ScoredPoint, source_tag: &str) -> Option<RetrievedDocument> {
	let text = payload_string(&point.payload, TEXT_FIELD)?;

	Some(RetrievedDocument { text, source_tag: source_tag.to_string() })
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key).and_then(|value| value.kind.as_ref()) {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}
