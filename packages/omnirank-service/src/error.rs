pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Adapter error in {backend}: {message}")]
	Adapter { backend: String, message: String },
	#[error("Malformed URL: {url:?}.")]
	MalformedUrl { url: String },
	#[error("Duplicate candidate in {source_name}: {key:?}.")]
	DuplicateCandidate { source_name: String, key: String },
	#[error("Invalid configuration: {message}")]
	Config { message: String },
}
impl Error {
	pub(crate) fn adapter(backend: &str, err: color_eyre::Report) -> Self {
		Self::Adapter { backend: backend.to_string(), message: format!("{err:#}") }
	}
}

impl From<omnirank_config::Error> for Error {
	fn from(err: omnirank_config::Error) -> Self {
		Self::Config { message: err.to_string() }
	}
}

impl From<omnirank_domain::Error> for Error {
	fn from(err: omnirank_domain::Error) -> Self {
		Self::Config { message: err.to_string() }
	}
}
