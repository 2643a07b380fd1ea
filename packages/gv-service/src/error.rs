pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Search failed: {message}")]
	Search { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<gv_storage::Error> for Error {
	fn from(err: gv_storage::Error) -> Self {
		match err {
			gv_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			gv_storage::Error::Qdrant(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}
