use std::sync::Arc;

use gv_service::GeneService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<GeneService>,
}
impl AppState {
	pub fn new(config: gv_config::Config) -> color_eyre::Result<Self> {
		let service = GeneService::new(config)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: GeneService) -> Self {
		Self { service: Arc::new(service) }
	}
}
