use std::{fs::File, path::PathBuf, str::FromStr};

use secp256k1::SecretKey;
use web3::{
	contract::Contract,
	signing::{Key, SecretKeyRef},
	transports::Http,
	types::Address,
};

use crate::{
	chain::{ChainClient, ChainConfig},
	ipfs::{IpfsClient, IpfsConfig},
	Deserialize, Serialize,
};

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct Config {
	pub chain: ChainConfig,
	pub ipfs: IpfsConfig,
}

impl Config {
	pub fn load_from_json(config_path: &PathBuf) -> Result<Self> {
		let file = File::open(config_path)?;
		let res = serde_json::from_reader(file)?;
		Ok(res)
	}
}

/// Everything the handlers need, constructed exactly once at startup and
/// passed by reference afterwards. Components never rebuild clients or
/// contracts on their own.
#[derive(Clone, Debug)]
pub struct ConfigInstance {
	pub chain_client: ChainClient,
	pub market_contract: Contract<Http>,
	pub token_contract: Contract<Http>,
	pub ipfs_client: IpfsClient,
	pub signer: SecretKey,
	// identity derived from the signing key
	pub signer_address: Address,
}

impl ConfigInstance {
	pub fn build(config: &Config) -> crate::Result<Self> {
		let chain_client = ChainClient::new(&config.chain.url)?;
		let market_contract = chain_client.market_contract(&config.chain.market_contract)?;
		let token_contract = chain_client.token_contract(&config.chain.token_contract)?;
		let ipfs_client = IpfsClient::new(&config.ipfs)?;
		let signer = SecretKey::from_str(&config.chain.private_key)?;
		let signer_address = SecretKeyRef::new(&signer).address();
		Ok(ConfigInstance {
			chain_client,
			market_contract,
			token_contract,
			ipfs_client,
			signer,
			signer_address,
		})
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Open Config File Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Json Parse to Config Error: {0}")]
	JsonParseError(#[from] serde_json::Error),
	#[error("Other Error: {0}")]
	OtherError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
