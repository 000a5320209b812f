use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read fixture at {path:?}.")]
	ReadFixture { path: PathBuf, source: std::io::Error },

	#[error("Failed to parse fixture.")]
	ParseFixture(#[from] serde_json::Error),
}
