//! In-memory provider doubles and a ready-made config for exercising the
//! pipeline without any external service. Everything the service reaches
//! for sits behind a provider trait, so no infrastructure is provisioned.

use std::{collections::HashMap, sync::Arc};

use serde_json::Map;

use chorus_config::{
	Config, EmbeddingProviderConfig, GenerationProviderConfig, Qdrant, Retrieval, Service, Storage,
};
use chorus_service::{
	BoxFuture, EmbeddingProvider, GenerationProvider, Providers, VectorSearchProvider,
};
use chorus_storage::models::RetrievedDocument;

pub const TEST_VECTOR_DIM: u32 = 8;

pub struct StubEmbedding;
impl EmbeddingProvider for StubEmbedding {
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		let vec = vec![0.0; cfg.dimensions as usize];

		Box::pin(async move { Ok(vec) })
	}
}

pub struct StubGeneration {
	pub reply: String,
}
impl GenerationProvider for StubGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a GenerationProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		let reply = self.reply.clone();

		Box::pin(async move { Ok(reply) })
	}
}

pub struct FailingGeneration;
impl GenerationProvider for FailingGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a GenerationProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("generation capability down")) })
	}
}

pub struct StubSearch {
	docs_by_tag: HashMap<String, Vec<String>>,
}
impl StubSearch {
	pub fn empty() -> Self {
		Self { docs_by_tag: HashMap::new() }
	}

	pub fn with_docs(entries: &[(&str, &[&str])]) -> Self {
		let docs_by_tag = entries
			.iter()
			.map(|(tag, docs)| {
				(tag.to_string(), docs.iter().map(|doc| doc.to_string()).collect())
			})
			.collect();

		Self { docs_by_tag }
	}
}
impl VectorSearchProvider for StubSearch {
	fn query_by_embedding<'a>(
		&'a self,
		_vector: Vec<f32>,
		source_tag: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RetrievedDocument>>> {
		let hits = self
			.docs_by_tag
			.get(source_tag)
			.map(|docs| {
				docs.iter()
					.take(limit as usize)
					.map(|text| RetrievedDocument {
						text: text.clone(),
						source_tag: source_tag.to_string(),
					})
					.collect()
			})
			.unwrap_or_default();

		Box::pin(async move { Ok(hits) })
	}
}

pub struct FailingSearch;
impl VectorSearchProvider for FailingSearch {
	fn query_by_embedding<'a>(
		&'a self,
		_vector: Vec<f32>,
		_source_tag: &'a str,
		_limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RetrievedDocument>>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("vector store unreachable")) })
	}
}

pub fn stub_providers(reply: &str) -> Providers {
	Providers::new(
		Arc::new(StubEmbedding),
		Arc::new(StubGeneration { reply: reply.to_string() }),
		Arc::new(StubSearch::empty()),
	)
}

pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://localhost:6334".to_string(),
				collection: "project_archive".to_string(),
				vector_dim: TEST_VECTOR_DIM,
			},
		},
		providers: chorus_config::Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "stub".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "stub-embedding".to_string(),
				dimensions: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			generation: GenerationProviderConfig {
				provider_id: "stub".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "stub-generation".to_string(),
				temperature: 0.7,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		retrieval: Retrieval { context_docs: 3, fetch_multiplier: 5 },
	}
}
