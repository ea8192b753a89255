use web3::{
	self as web3,
	api::Eth,
	contract::{Contract, Error as Web3ContractErr},
	ethabi,
	transports::Http,
	types::Address,
	Web3,
};

use super::{Deserialize, Serialize, U64};

pub const CHAIN_LOG_TARGET: &str = "Chain";
pub const MARKET_QUERY_LOG_TARGET: &str = "MarketQuery";
pub const MARKET_SUBMIT_LOG_TARGET: &str = "MarketSubmit";

// number of mined blocks to wait before a submitted transaction is
// considered confirmed
pub const TRANSACTION_CONFIRMATIONS: usize = 2;

// marketplace contract functions
pub const GET_TASK_DETAILS: &str = "getTaskDetails";
pub const GET_AVAILABLE_TASKS: &str = "getAvailableTasks";
pub const CREATE_TASK: &str = "createTask";
pub const CLAIM_TASK: &str = "claimTask";
pub const SUBMIT_ANNOTATION: &str = "submitAnnotation";
pub const CLAIM_REWARD: &str = "claimReward";

// reward token (ERC-20) functions
pub const ALLOWANCE_QUERY: &str = "allowance";
pub const BALANCE_QUERY: &str = "balanceOf";
pub const INCREASE_ALLOWANCE: &str = "increaseAllowance";

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct ChainConfig {
	pub url: String,
	// where tasks are created, claimed and verified
	pub market_contract: String,
	// the ERC-20 token tasks pay their reward in
	pub token_contract: String,
	pub private_key: String,
}

#[derive(Clone, Debug)]
pub struct ChainClient {
	inner: Web3<Http>,
}

impl ChainClient {
	pub fn new(url: &str) -> Result<Self> {
		if url.starts_with("http") {
			let web3 = Web3::new(Http::new(url)?);
			Ok(ChainClient { inner: web3 })
		} else {
			Err(Error::ClientCreationError("Wrong chain connection url".to_owned()))
		}
	}

	pub fn eth(&self) -> Eth<Http> {
		self.inner.eth()
	}

	pub async fn best_number(&self) -> Result<U64> {
		let maybe_best = self.eth().block_number().await;
		maybe_best.map_err(|e| e.into())
	}

	// get the task marketplace contract
	pub fn market_contract(&self, contract_addr: &str) -> Result<Contract<Http>> {
		let address = utils::trim_address_str(contract_addr)?;
		let contract = Contract::from_json(
			self.inner.eth(),
			address,
			include_bytes!("../contracts/DataDex.json"),
		)?;
		Ok(contract)
	}

	// get the reward token contract
	pub fn token_contract(&self, contract_addr: &str) -> Result<Contract<Http>> {
		let address = utils::trim_address_str(contract_addr)?;
		let contract = Contract::from_json(
			self.inner.eth(),
			address,
			include_bytes!("../contracts/DataToken.json"),
		)?;
		Ok(contract)
	}
}

pub mod utils {
	use super::*;

	pub fn trim_address_str(addr: &str) -> Result<Address> {
		let addr = if addr.starts_with("0x") { &addr[2..] } else { addr };
		let hex_res =
			hex::decode(addr).map_err(|e| Error::InvalidEthereumAddress(format!("{:}", e)))?;
		// check length
		if hex_res.len() != 20 {
			return Err(Error::InvalidEthereumAddress(format!(
				"Address is not equal to 20 bytes: {:}",
				addr
			)))
		}
		let address = Address::from_slice(&hex_res);
		Ok(address)
	}
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Chain connection Error: {0}")]
	ClientCreationError(String),

	#[error("Web3 Client Error, err: {0}")]
	Web3Error(#[from] web3::Error),

	#[error("Web3 Contract Error, err: {0}")]
	Web3ContractError(#[from] Web3ContractErr),

	#[error("Ethereum Abi Error, err: {0}")]
	EthAbiError(#[from] ethabi::Error),

	#[error("Invalid Ethereum Address: {0}")]
	InvalidEthereumAddress(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bundled_abis_not_empty() {
		let market = include_bytes!("../contracts/DataDex.json");
		let token = include_bytes!("../contracts/DataToken.json");
		assert!(market.len() != 0);
		assert!(token.len() != 0);
	}

	#[test]
	fn trim_address_should_accept_mixed_case() {
		let lower = utils::trim_address_str("0x72b5fc9eced3157674a187d30c7d36bdad950b9d").unwrap();
		let upper = utils::trim_address_str("0x72B5FC9ECED3157674A187D30C7D36BDAD950B9D").unwrap();
		assert_eq!(lower, upper);
	}

	#[test]
	fn trim_address_should_reject_wrong_length() {
		let res = utils::trim_address_str("0x72b5fc9e");
		assert!(res.is_err());
	}
}
