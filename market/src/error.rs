use datadex_primitives::H256;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Web3 Client Error, err: {0}")]
	Web3Error(#[from] web3::Error),

	#[error("Web3 Contract Error, err: {0}")]
	Web3ContractError(#[from] web3::contract::Error),

	#[error("Transaction {0:?} reverted by contract")]
	Reverted(H256),

	#[error("Unknown task status ordinal: {0}")]
	UnknownStatus(u8),

	#[error("Invalid input: {0}")]
	Validation(String),
}

/// Coarse error taxonomy used for user-facing messaging. Transport and
/// revert failures are surfaced verbatim and never retried automatically;
/// validation failures are normalized before any transaction is proposed.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum ErrorKind {
	Transport,
	Revert,
	Validation,
	UnknownStatus,
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			// an rpc-level rejection means the node executed the call and
			// the contract refused it
			Error::Web3Error(web3::Error::Rpc(_)) => ErrorKind::Revert,
			Error::Web3Error(_) => ErrorKind::Transport,
			Error::Web3ContractError(web3::contract::Error::Api(web3::Error::Rpc(_))) =>
				ErrorKind::Revert,
			Error::Web3ContractError(_) => ErrorKind::Transport,
			Error::Reverted(_) => ErrorKind::Revert,
			Error::UnknownStatus(_) => ErrorKind::UnknownStatus,
			Error::Validation(_) => ErrorKind::Validation,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_should_classify_per_taxonomy() {
		assert_eq!(Error::Web3Error(web3::Error::Unreachable).kind(), ErrorKind::Transport);
		assert_eq!(Error::Reverted(H256::zero()).kind(), ErrorKind::Revert);
		assert_eq!(Error::UnknownStatus(7).kind(), ErrorKind::UnknownStatus);
		assert_eq!(Error::Validation("empty dataset reference".into()).kind(), ErrorKind::Validation);
	}
}
