#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Chain Error, err: {0}")]
	ChainError(#[from] crate::chain::Error),

	#[error("Web3 Error, err: {0}")]
	Web3Error(#[from] web3::Error),

	#[error("Web3 Contract Error, err: {0}")]
	Web3ContractError(#[from] web3::contract::Error),

	#[error("Fetch IPFS Error, err: {0}")]
	IpfsError(#[from] crate::ipfs::Error),

	#[error("Config Error, err: {0}")]
	ConfigError(#[from] crate::config::Error),

	#[error("Invalid amount Error, err: {0}")]
	AmountError(#[from] crate::utils::Error),

	#[error("Parse private key Error, err: {0}")]
	PrivateKeyError(#[from] secp256k1::Error),

	#[error("Unexpect Error, err: {0}")]
	OtherError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
