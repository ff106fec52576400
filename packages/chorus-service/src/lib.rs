pub mod ask;
pub mod persona;

mod executor;
mod prompts;
mod retrieve;
mod synthesize;

use std::{future::Future, pin::Pin, sync::Arc};

pub use ask::{AskRequest, AskResponse};
pub use executor::AgentResult;
pub use retrieve::RETRIEVAL_PLACEHOLDER;

use chorus_config::{Config, EmbeddingProviderConfig, GenerationProviderConfig};
use chorus_providers::{embedding, generation};
use chorus_storage::{models::RetrievedDocument, qdrant::QdrantStore};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait VectorSearchProvider
where
	Self: Send + Sync,
{
	fn query_by_embedding<'a>(
		&'a self,
		vector: Vec<f32>,
		source_tag: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RetrievedDocument>>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	UnknownPersona { id: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::UnknownPersona { id } => write!(f, "Unknown persona: {id:?}."),
		}
	}
}

impl std::error::Error for ServiceError {}

/// Outbound capability handles, constructed once at process start and
/// injected into the service. Shared across requests; none of them carries
/// per-request state.
#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
	pub search: Arc<dyn VectorSearchProvider>,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed_query<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(embedding::embed_query(cfg, text))
	}
}

impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(generation::generate(cfg, prompt))
	}
}

struct QdrantSearch {
	store: Arc<QdrantStore>,
}

impl VectorSearchProvider for QdrantSearch {
	fn query_by_embedding<'a>(
		&'a self,
		vector: Vec<f32>,
		source_tag: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RetrievedDocument>>> {
		Box::pin(async move {
			self.store
				.query_by_embedding(vector, source_tag, limit)
				.await
				.map_err(color_eyre::Report::new)
		})
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
		search: Arc<dyn VectorSearchProvider>,
	) -> Self {
		Self { embedding, generation, search }
	}

	pub fn live(store: Arc<QdrantStore>) -> Self {
		let provider = Arc::new(DefaultProviders);

		Self {
			embedding: provider.clone(),
			generation: provider,
			search: Arc::new(QdrantSearch { store }),
		}
	}
}

pub struct ChorusService {
	pub cfg: Config,
	pub providers: Providers,
}
impl ChorusService {
	pub fn new(cfg: Config, store: QdrantStore) -> Self {
		Self { providers: Providers::live(Arc::new(store)), cfg }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}
}
