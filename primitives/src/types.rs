use web3::{
	contract::{tokens::Detokenize, Error as Web3ContractErr},
	ethabi::Token,
	types::{Address, U256},
};

use super::{Deserialize, Serialize};

pub type TaskId = U256;
// token amount in the smallest unit (18 fractional digits)
pub type Amount = U256;

/// Lifecycle of a task as encoded by the marketplace contract. The ordinal
/// values mirror the contract enum and must not be reordered.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Deserialize, Serialize)]
pub enum TaskStatus {
	Created = 0,
	Claimed = 1,
	Submitted = 2,
	Verified = 3,
	Canceled = 4,
	Rejected = 5,
}

impl TaskStatus {
	pub fn from_ordinal(ordinal: u8) -> Option<Self> {
		match ordinal {
			0 => Some(TaskStatus::Created),
			1 => Some(TaskStatus::Claimed),
			2 => Some(TaskStatus::Submitted),
			3 => Some(TaskStatus::Verified),
			4 => Some(TaskStatus::Canceled),
			5 => Some(TaskStatus::Rejected),
			_ => None,
		}
	}

	pub fn ordinal(self) -> u8 {
		self as u8
	}

	pub fn name(self) -> &'static str {
		match self {
			TaskStatus::Created => "Created",
			TaskStatus::Claimed => "Claimed",
			TaskStatus::Submitted => "Submitted",
			TaskStatus::Verified => "Verified",
			TaskStatus::Canceled => "Canceled",
			TaskStatus::Rejected => "Rejected",
		}
	}
}

impl std::fmt::Display for TaskStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

// rendering must survive ordinals the contract may add later
pub fn status_label(ordinal: u8) -> &'static str {
	TaskStatus::from_ordinal(ordinal).map(TaskStatus::name).unwrap_or("Unknown")
}

/// On-chain task record. `status` keeps the raw ordinal so that fetching a
/// record never fails on a value outside the known set; classification
/// happens at the point of use.
#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct TaskRecord {
	pub id: TaskId,
	pub requestor: Address,
	// zero until the task is claimed
	pub annotator: Address,
	pub ipfs_cid: String,
	pub reward_amount: Amount,
	pub instructions: String,
	pub status: u8,
}

impl TaskRecord {
	pub fn has_annotator(&self) -> bool {
		self.annotator != Address::zero()
	}

	pub fn from_token(token: Token) -> std::result::Result<Self, Web3ContractErr> {
		let fields = match token {
			Token::Tuple(fields) => fields,
			other =>
				return Err(invalid_output(format!("task record expected tuple, got {:?}", other))),
		};
		if fields.len() != 7 {
			return Err(invalid_output(format!(
				"task record expected 7 fields, got {}",
				fields.len()
			)))
		}
		let mut fields = fields.into_iter();
		Ok(TaskRecord {
			id: take_uint(fields.next(), "id")?,
			requestor: take_address(fields.next(), "requestor")?,
			annotator: take_address(fields.next(), "annotator")?,
			ipfs_cid: take_string(fields.next(), "ipfsCid")?,
			reward_amount: take_uint(fields.next(), "rewardAmount")?,
			instructions: take_string(fields.next(), "instructions")?,
			status: take_uint(fields.next(), "status")?.low_u64() as u8,
		})
	}
}

impl Detokenize for TaskRecord {
	fn from_tokens(mut tokens: Vec<Token>) -> std::result::Result<Self, Web3ContractErr> {
		// a struct return decodes as a single tuple output
		let token =
			if tokens.len() == 1 { tokens.remove(0) } else { Token::Tuple(tokens) };
		TaskRecord::from_token(token)
	}
}

/// Decoded result of `getAvailableTasks`.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct AvailableTasks(pub Vec<TaskRecord>);

impl Detokenize for AvailableTasks {
	fn from_tokens(mut tokens: Vec<Token>) -> std::result::Result<Self, Web3ContractErr> {
		if tokens.len() != 1 {
			return Err(invalid_output(format!(
				"task list expected single output, got {}",
				tokens.len()
			)))
		}
		let items = match tokens.remove(0) {
			Token::Array(items) => items,
			other =>
				return Err(invalid_output(format!("task list expected array, got {:?}", other))),
		};
		let records =
			items.into_iter().map(TaskRecord::from_token).collect::<Result<Vec<_>, _>>()?;
		Ok(AvailableTasks(records))
	}
}

/// Allowance and balance of the connected identity towards the marketplace
/// contract. Ephemeral, recomputed on every identity or reward change.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default)]
pub struct AllowanceState {
	pub allowance: Amount,
	pub balance: Amount,
}

fn invalid_output(msg: String) -> Web3ContractErr {
	Web3ContractErr::InvalidOutputType(msg)
}

fn take_uint(token: Option<Token>, field: &str) -> std::result::Result<U256, Web3ContractErr> {
	match token {
		Some(Token::Uint(value)) => Ok(value),
		other => Err(invalid_output(format!("field {} expected uint, got {:?}", field, other))),
	}
}

fn take_address(token: Option<Token>, field: &str) -> std::result::Result<Address, Web3ContractErr> {
	match token {
		Some(Token::Address(value)) => Ok(value),
		other => Err(invalid_output(format!("field {} expected address, got {:?}", field, other))),
	}
}

fn take_string(token: Option<Token>, field: &str) -> std::result::Result<String, Web3ContractErr> {
	match token {
		Some(Token::String(value)) => Ok(value),
		other => Err(invalid_output(format!("field {} expected string, got {:?}", field, other))),
	}
}
