use color_eyre::eyre;
use tracing::warn;

use crate::{ChorusService, persona::PersonaProfile};

/// Stand-in context entry recorded when the archive cannot be queried at
/// all. Retrieval failure degrades the run; it never aborts it.
pub const RETRIEVAL_PLACEHOLDER: &str = "(archive unreachable - no context)";

/// Outcome of one persona-scoped context lookup. `docs` is always
/// well-formed: empty when nothing matched the persona's source tag, a
/// single placeholder entry when retrieval itself failed. A failed lookup
/// additionally carries the failure description so the executor can record
/// it in-band.
pub(crate) struct RetrievedContext {
	pub(crate) docs: Vec<String>,
	pub(crate) failure: Option<String>,
}

impl ChorusService {
	pub(crate) async fn retrieve_context(
		&self,
		question: &str,
		profile: &PersonaProfile,
	) -> RetrievedContext {
		match self.try_retrieve(question, profile).await {
			Ok(docs) => RetrievedContext { docs, failure: None },
			Err(err) => {
				warn!(
					error = %err,
					source_tag = profile.source_tag,
					"Context retrieval failed; degrading to placeholder context."
				);

				RetrievedContext {
					docs: vec![RETRIEVAL_PLACEHOLDER.to_string()],
					failure: Some(err.to_string()),
				}
			},
		}
	}

	async fn try_retrieve(
		&self,
		question: &str,
		profile: &PersonaProfile,
	) -> color_eyre::Result<Vec<String>> {
		// The hints are a fixed relevance bias appended to the raw query,
		// not a replacement for it.
		let search_term = format!("{question} {hints}", hints = profile.keyword_hints);
		let vector = self
			.providers
			.embedding
			.embed_query(&self.cfg.providers.embedding, &search_term)
			.await?;

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(eyre::eyre!(
				"Embedding vector has {} dimensions; the collection expects {}.",
				vector.len(),
				self.cfg.storage.qdrant.vector_dim,
			));
		}

		// Near-duplicate rows are common in the archive, so fetch wider than
		// needed and deduplicate client-side before truncating.
		let desired = self.cfg.retrieval.context_docs;
		let fetch_limit = desired * self.cfg.retrieval.fetch_multiplier;
		let hits = self
			.providers
			.search
			.query_by_embedding(vector, profile.source_tag, fetch_limit)
			.await?;
		let docs = chorus_domain::dedup::dedup_trimmed(
			hits.into_iter().map(|hit| hit.text),
			desired as usize,
		);

		Ok(docs)
	}
}
