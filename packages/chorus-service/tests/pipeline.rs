use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use serde_json::Map;

use chorus_config::{
	Config, EmbeddingProviderConfig, GenerationProviderConfig, Qdrant, Retrieval, Service, Storage,
};
use chorus_service::{
	AskRequest, BoxFuture, ChorusService, EmbeddingProvider, GenerationProvider, Providers,
	RETRIEVAL_PLACEHOLDER, ServiceError, VectorSearchProvider, persona::Persona,
};
use chorus_storage::models::RetrievedDocument;

const VECTOR_DIM: u32 = 4;

struct StubEmbedding;
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

struct MisdimensionedEmbedding;
impl EmbeddingProvider for MisdimensionedEmbedding {
	fn embed_query<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async move { Ok(vec![0.0; VECTOR_DIM as usize + 1]) })
	}
}

struct StubSearch {
	docs_by_tag: HashMap<String, Vec<String>>,
}
impl StubSearch {
	fn new(entries: &[(&str, &[&str])]) -> Self {
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

struct FailingSearch;
impl VectorSearchProvider for FailingSearch {
	fn query_by_embedding<'a>(
		&'a self,
		_vector: Vec<f32>,
		_source_tag: &'a str,
		_limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RetrievedDocument>>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("connection refused")) })
	}
}

struct StubGeneration {
	reply: String,
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

struct SpyGeneration {
	prompts: Arc<Mutex<Vec<String>>>,
	reply: String,
}
impl GenerationProvider for SpyGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		self.prompts.lock().expect("Prompt log poisoned.").push(prompt.to_string());

		let reply = self.reply.clone();

		Box::pin(async move { Ok(reply) })
	}
}

struct FailingGeneration;
impl GenerationProvider for FailingGeneration {
	fn generate<'a>(
		&'a self,
		_cfg: &'a GenerationProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Err(color_eyre::eyre::eyre!("quota exhausted")) })
	}
}

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:5000".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://localhost:6334".to_string(),
				collection: "project_archive".to_string(),
				vector_dim: VECTOR_DIM,
			},
		},
		providers: chorus_config::Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "p".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/".to_string(),
				model: "m".to_string(),
				dimensions: VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			generation: GenerationProviderConfig {
				provider_id: "p".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "key".to_string(),
				path: "/".to_string(),
				model: "m".to_string(),
				temperature: 0.7,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		retrieval: Retrieval { context_docs: 3, fetch_multiplier: 5 },
	}
}

fn service_with(
	search: Arc<dyn VectorSearchProvider>,
	generation: Arc<dyn GenerationProvider>,
) -> ChorusService {
	let providers = Providers::new(Arc::new(StubEmbedding), generation, search);

	ChorusService::with_providers(test_config(), providers)
}

fn persona_ids() -> Vec<&'static str> {
	Persona::EXECUTION_ORDER.iter().map(|persona| persona.id()).collect()
}

#[tokio::test]
async fn log_has_one_entry_per_persona_in_configured_order() {
	let service = service_with(
		Arc::new(StubSearch::new(&[])),
		Arc::new(StubGeneration { reply: "A measured reaction.".to_string() }),
	);
	let response = service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");

	let logged: Vec<&str> = response.logs.iter().map(|entry| entry.persona.as_str()).collect();

	assert_eq!(logged, persona_ids());

	for entry in &response.logs {
		assert_eq!(entry.thought, "A measured reaction.");
	}

	assert_eq!(response.synthesis, "A measured reaction.");
}

#[tokio::test]
async fn retriever_deduplicates_trim_equal_documents() {
	let service = service_with(
		Arc::new(StubSearch::new(&[(
			"survivor_context",
			&["fear spread fast", "  fear spread fast ", "lockdown diaries"],
		)])),
		Arc::new(StubGeneration { reply: "Noted.".to_string() }),
	);
	let response = service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");
	let survivor = &response.logs[0];

	assert_eq!(survivor.persona, "Survivor");
	assert_eq!(
		survivor.context_used,
		vec!["fear spread fast".to_string(), "lockdown diaries".to_string()]
	);
}

#[tokio::test]
async fn retriever_truncates_to_desired_count() {
	let service = service_with(
		Arc::new(StubSearch::new(&[(
			"survivor_context",
			&["one", "two", "three", "four", "five", "six"],
		)])),
		Arc::new(StubGeneration { reply: "Noted.".to_string() }),
	);
	let response = service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");

	assert_eq!(
		response.logs[0].context_used,
		vec!["one".to_string(), "two".to_string(), "three".to_string()]
	);
}

#[tokio::test]
async fn contexts_are_scoped_to_each_persona_source_tag() {
	let service = service_with(
		Arc::new(StubSearch::new(&[
			("survivor_context", &["wash your hands"]),
			("speculator_context", &["buy the dip"]),
			("auteur_context", &["strands connect us"]),
		])),
		Arc::new(StubGeneration { reply: "Noted.".to_string() }),
	);
	let response = service
		.ask(AskRequest { question: "What did the pandemic change?".to_string() })
		.await
		.expect("Ask failed.");

	assert_eq!(response.logs[0].context_used, vec!["wash your hands".to_string()]);
	assert_eq!(response.logs[1].context_used, vec!["buy the dip".to_string()]);
	assert_eq!(response.logs[2].context_used, vec!["strands connect us".to_string()]);
}

#[tokio::test]
async fn zero_matches_yield_empty_context_not_an_error() {
	let service = service_with(
		Arc::new(StubSearch::new(&[])),
		Arc::new(StubGeneration { reply: "Nothing in the archive moves me.".to_string() }),
	);
	let response = service
		.ask(AskRequest { question: "What comes next?".to_string() })
		.await
		.expect("Ask failed.");

	for entry in &response.logs {
		assert!(entry.context_used.is_empty());
		assert!(!entry.thought.is_empty());
	}
}

#[tokio::test]
async fn store_failure_degrades_to_placeholder_and_error_thought() {
	let service = service_with(
		Arc::new(FailingSearch),
		Arc::new(StubGeneration { reply: "Working from memory alone.".to_string() }),
	);
	let response = service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");

	assert_eq!(response.logs.len(), Persona::EXECUTION_ORDER.len());

	for entry in &response.logs {
		assert_eq!(entry.context_used, vec![RETRIEVAL_PLACEHOLDER.to_string()]);
		assert!(entry.thought.contains("retrieval error"));
	}

	// Synthesis still runs over the degraded log.
	assert_eq!(response.synthesis, "Working from memory alone.");
}

#[tokio::test]
async fn misdimensioned_embedding_degrades_to_placeholder_context() {
	let providers = Providers::new(
		Arc::new(MisdimensionedEmbedding),
		Arc::new(StubGeneration { reply: "Noted.".to_string() }),
		Arc::new(StubSearch::new(&[("survivor_context", &["fear spread fast"])])),
	);
	let service = ChorusService::with_providers(test_config(), providers);
	let response = service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");

	assert_eq!(response.logs[0].context_used, vec![RETRIEVAL_PLACEHOLDER.to_string()]);
	assert!(response.logs[0].thought.contains("retrieval error"));
}

#[tokio::test]
async fn generation_failure_degrades_to_error_text() {
	let service = service_with(
		Arc::new(StubSearch::new(&[("survivor_context", &["fear spread fast"])])),
		Arc::new(FailingGeneration),
	);
	let response = service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");

	assert_eq!(response.logs.len(), Persona::EXECUTION_ORDER.len());

	for entry in &response.logs {
		assert!(entry.thought.contains("generation error"));
	}

	assert_eq!(response.logs[0].context_used, vec!["fear spread fast".to_string()]);
	assert!(response.synthesis.contains("synthesis error"));
}

#[tokio::test]
async fn leading_thought_labels_are_stripped() {
	let service = service_with(
		Arc::new(StubSearch::new(&[])),
		Arc::new(StubGeneration { reply: "Thought: fear became a habit.".to_string() }),
	);
	let response = service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");

	for entry in &response.logs {
		assert_eq!(entry.thought, "fear became a habit.");
	}
}

#[tokio::test]
async fn prompts_carry_context_question_and_log_framing() {
	let prompts = Arc::new(Mutex::new(Vec::new()));
	let generation = Arc::new(SpyGeneration {
		prompts: prompts.clone(),
		reply: "A reaction.".to_string(),
	});
	let service = service_with(
		Arc::new(StubSearch::new(&[("survivor_context", &["fear spread fast"])])),
		generation,
	);

	service
		.ask(AskRequest { question: "How did fear evolve?".to_string() })
		.await
		.expect("Ask failed.");

	let prompts = prompts.lock().expect("Prompt log poisoned.");

	// One generation call per persona plus the synthesis call.
	assert_eq!(prompts.len(), Persona::EXECUTION_ORDER.len() + 1);
	assert!(prompts[0].contains("agent Survivor"));
	assert!(prompts[0].contains("- fear spread fast"));
	assert!(prompts[0].contains("How did fear evolve?"));

	let synthesis_prompt = prompts.last().expect("Missing synthesis prompt.");

	assert!(synthesis_prompt.contains("AGENT Survivor: A reaction."));
	assert!(synthesis_prompt.contains("AGENT Auteur: A reaction."));
	assert!(synthesis_prompt.contains("How did fear evolve?"));
}

#[tokio::test]
async fn blank_question_is_rejected() {
	let service = service_with(
		Arc::new(StubSearch::new(&[])),
		Arc::new(StubGeneration { reply: "A reaction.".to_string() }),
	);
	let result = service.ask(AskRequest { question: "   ".to_string() }).await;

	assert!(matches!(result, Err(ServiceError::InvalidRequest { .. })));
}
