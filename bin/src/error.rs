#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error(transparent)]
	PrimitivesError(#[from] datadex_primitives::Error),

	#[error(transparent)]
	ConfigError(#[from] datadex_primitives::config::Error),

	#[error(transparent)]
	IpfsError(#[from] datadex_primitives::ipfs::Error),

	#[error(transparent)]
	MarketError(#[from] datadex_market::Error),

	#[error("Io Error, err: {0}")]
	IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
