pub mod aggregate;
pub mod format;
pub mod query;
pub mod rank;

mod error;

pub use aggregate::{GeneAggregate, PhenotypeMatch, aggregate};
pub use error::{Error, Result};
pub use format::{GeneResult, format_genes};
pub use query::{QueryRequest, QueryResult, SearchMetadata};
pub use rank::{fused_score, rank};

use std::{future::Future, pin::Pin, sync::Arc};

use gv_config::{Config, EmbeddingProviderConfig};
use gv_providers::embedding;
use gv_storage::{models::PhenotypeRecord, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbour phenotype lookup by free text.
pub trait PhenotypeIndex
where
	Self: Send + Sync,
{
	/// Up to `k` records ordered closest first. Distances are non-negative; smaller is closer.
	fn search<'a>(
		&'a self,
		query: &'a str,
		k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchHit>>>;

	fn count(&self) -> BoxFuture<'_, color_eyre::Result<u64>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
	pub record: PhenotypeRecord,
	pub distance: f32,
}

/// Embeds the query through the configured provider and searches the Qdrant collection.
pub struct QdrantPhenotypeIndex {
	pub store: QdrantStore,
	pub embedding: EmbeddingProviderConfig,
}
impl QdrantPhenotypeIndex {
	pub fn new(cfg: &Config) -> Result<Self> {
		let store = QdrantStore::new(&cfg.storage.qdrant)?;

		Ok(Self { store, embedding: cfg.providers.embedding.clone() })
	}

	async fn search_text(&self, query: &str, k: u32) -> color_eyre::Result<Vec<SearchHit>> {
		let texts = vec![query.to_string()];
		let mut vectors = embedding::embed(&self.embedding, &texts).await?;
		let Some(vector) = vectors.pop() else {
			return Err(color_eyre::eyre::eyre!("Embedding provider returned no vector."));
		};
		let hits = self.store.search(vector, u64::from(k)).await?;

		Ok(hits.into_iter().map(|(record, distance)| SearchHit { record, distance }).collect())
	}

	async fn count_points(&self) -> color_eyre::Result<u64> {
		Ok(self.store.count().await?)
	}
}
impl PhenotypeIndex for QdrantPhenotypeIndex {
	fn search<'a>(
		&'a self,
		query: &'a str,
		k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchHit>>> {
		Box::pin(self.search_text(query, k))
	}

	fn count(&self) -> BoxFuture<'_, color_eyre::Result<u64>> {
		Box::pin(self.count_points())
	}
}

pub struct GeneService {
	pub cfg: Config,
	pub index: Arc<dyn PhenotypeIndex>,
}
impl GeneService {
	pub fn new(cfg: Config) -> Result<Self> {
		let index = QdrantPhenotypeIndex::new(&cfg)?;

		Ok(Self::with_index(cfg, Arc::new(index)))
	}

	pub fn with_index(cfg: Config, index: Arc<dyn PhenotypeIndex>) -> Self {
		Self { cfg, index }
	}

	/// Number of phenotype records behind the index.
	pub async fn phenotypes_indexed(&self) -> Result<u64> {
		self.index.count().await.map_err(|err| Error::Search { message: err.to_string() })
	}
}
