use std::sync::Arc;

use chorus_service::ChorusService;
use chorus_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ChorusService>,
}
impl AppState {
	pub fn new(config: chorus_config::Config) -> color_eyre::Result<Self> {
		let store = QdrantStore::new(&config.storage.qdrant)?;
		let service = ChorusService::new(config, store);

		Ok(Self { service: Arc::new(service) })
	}
}
