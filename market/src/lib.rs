use secp256k1::SecretKey;
use web3::{
	contract::{Contract, Options as Web3Options},
	transports::Http,
	types::TransactionReceipt,
};

use datadex_primitives::{
	chain::{
		ALLOWANCE_QUERY, BALANCE_QUERY, CLAIM_REWARD, CLAIM_TASK, CREATE_TASK, GET_AVAILABLE_TASKS,
		GET_TASK_DETAILS, INCREASE_ALLOWANCE, MARKET_QUERY_LOG_TARGET, MARKET_SUBMIT_LOG_TARGET,
		SUBMIT_ANNOTATION, TRANSACTION_CONFIRMATIONS,
	},
	utils::format_units,
	Address, AllowanceState, Amount, AvailableTasks, ConfigInstance, TaskId, TaskRecord, U64,
};

pub use allowance::{reconcile, Reconciliation};
pub use error::{Error, ErrorKind, Result};
pub use form::{BlockReason, RequestSeq, Step, TaskForm};
pub use status::{classify, permitted_actions, Action};

pub mod allowance;
pub mod error;
pub mod form;
pub mod status;

/// Read a single task record.
pub async fn get_task_details(contract: &Contract<Http>, task_id: TaskId) -> Result<TaskRecord> {
	let record: TaskRecord =
		contract.query(GET_TASK_DETAILS, (task_id,), None, Web3Options::default(), None).await?;
	log::debug!(
		target: MARKET_QUERY_LOG_TARGET,
		"task #{:} fetched | status ordinal: {:} | reward: {:}",
		record.id,
		record.status,
		format_units(record.reward_amount)
	);
	Ok(record)
}

/// Read every task currently offered for annotation.
pub async fn get_available_tasks(contract: &Contract<Http>) -> Result<Vec<TaskRecord>> {
	let tasks: AvailableTasks =
		contract.query(GET_AVAILABLE_TASKS, (), None, Web3Options::default(), None).await?;
	log::info!(target: MARKET_QUERY_LOG_TARGET, "{:} tasks available", tasks.0.len());
	Ok(tasks.0)
}

/// Amount the owner has pre-authorized the marketplace to spend.
pub async fn allowance(
	token: &Contract<Http>,
	owner: Address,
	spender: Address,
) -> Result<Amount> {
	let amount: Amount =
		token.query(ALLOWANCE_QUERY, (owner, spender), None, Web3Options::default(), None).await?;
	Ok(amount)
}

pub async fn balance_of(token: &Contract<Http>, who: Address) -> Result<Amount> {
	let amount: Amount =
		token.query(BALANCE_QUERY, (who,), None, Web3Options::default(), None).await?;
	Ok(amount)
}

/// The allowance + balance watcher: both token reads paired into one
/// `AllowanceState` snapshot for the given identity.
pub async fn check_allowance(config: &ConfigInstance, owner: Address) -> Result<AllowanceState> {
	let spender = config.market_contract.address();
	let allowance = allowance(&config.token_contract, owner, spender).await?;
	let balance = balance_of(&config.token_contract, owner).await?;
	log::debug!(
		target: MARKET_QUERY_LOG_TARGET,
		"allowance of {:?} towards {:?}: {:} | balance: {:}",
		owner,
		spender,
		format_units(allowance),
		format_units(balance)
	);
	Ok(AllowanceState { allowance, balance })
}

/// Raise the marketplace spending pre-authorization by `added_value`.
pub async fn increase_allowance(
	token: &Contract<Http>,
	signer: &SecretKey,
	spender: Address,
	added_value: Amount,
) -> Result<TransactionReceipt> {
	log::info!(
		target: MARKET_SUBMIT_LOG_TARGET,
		"increase allowance of {:?} by {:}",
		spender,
		format_units(added_value)
	);
	send(token, INCREASE_ALLOWANCE, (spender, added_value), signer).await
}

/// Create a task; the reward must already be approved for spending.
pub async fn create_task(
	market: &Contract<Http>,
	signer: &SecretKey,
	dataset_cid: &str,
	reward_amount: Amount,
	instructions: &str,
) -> Result<TransactionReceipt> {
	if dataset_cid.is_empty() {
		return Err(Error::Validation("empty dataset reference".to_owned()))
	}
	log::info!(
		target: MARKET_SUBMIT_LOG_TARGET,
		"create task | dataset cid: {:} | reward: {:}",
		dataset_cid,
		format_units(reward_amount)
	);
	send(
		market,
		CREATE_TASK,
		(dataset_cid.to_owned(), reward_amount, instructions.to_owned()),
		signer,
	)
	.await
}

pub async fn claim_task(
	market: &Contract<Http>,
	signer: &SecretKey,
	task_id: TaskId,
) -> Result<TransactionReceipt> {
	log::info!(target: MARKET_SUBMIT_LOG_TARGET, "claim task #{:}", task_id);
	send(market, CLAIM_TASK, (task_id,), signer).await
}

pub async fn submit_annotation(
	market: &Contract<Http>,
	signer: &SecretKey,
	task_id: TaskId,
	result_cid: &str,
) -> Result<TransactionReceipt> {
	if result_cid.is_empty() {
		return Err(Error::Validation("empty result reference".to_owned()))
	}
	log::info!(
		target: MARKET_SUBMIT_LOG_TARGET,
		"submit annotation for task #{:} | result cid: {:}",
		task_id,
		result_cid
	);
	send(market, SUBMIT_ANNOTATION, (task_id, result_cid.to_owned()), signer).await
}

pub async fn claim_reward(
	market: &Contract<Http>,
	signer: &SecretKey,
	task_id: TaskId,
) -> Result<TransactionReceipt> {
	log::info!(target: MARKET_SUBMIT_LOG_TARGET, "claim reward for task #{:}", task_id);
	send(market, CLAIM_REWARD, (task_id,), signer).await
}

// send a signed contract call and wait until it is confirmed; a receipt
// with zero status is a contract rejection, not a success
async fn send(
	contract: &Contract<Http>,
	func: &str,
	params: impl web3::contract::tokens::Tokenize,
	signer: &SecretKey,
) -> Result<TransactionReceipt> {
	let receipt = contract
		.signed_call_with_confirmations(
			func,
			params,
			Web3Options::default(),
			TRANSACTION_CONFIRMATIONS,
			signer,
		)
		.await?;

	if receipt.status == Some(U64::zero()) {
		log::error!(
			target: MARKET_SUBMIT_LOG_TARGET,
			"tx {:?} for {:} reverted in block {:?}",
			receipt.transaction_hash,
			func,
			receipt.block_number
		);
		return Err(Error::Reverted(receipt.transaction_hash))
	}

	log::info!(
		target: MARKET_SUBMIT_LOG_TARGET,
		"tx {:?} for {:} confirmed in block {:?}",
		receipt.transaction_hash,
		func,
		receipt.block_number
	);
	Ok(receipt)
}
