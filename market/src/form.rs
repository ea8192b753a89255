use std::fmt;

use datadex_primitives::{ipfs, utils::parse_units, Address, AllowanceState, Amount};

use crate::allowance::{reconcile, Reconciliation};

pub const FORM_LOG_TARGET: &str = "TaskForm";

/// Why the form cannot currently offer any transaction.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum BlockReason {
	NoIdentity,
	ZeroReward,
}

impl fmt::Display for BlockReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BlockReason::NoIdentity => write!(f, "no-identity"),
			BlockReason::ZeroReward => write!(f, "zero-reward"),
		}
	}
}

/// The single actionable step the creation flow offers at a time.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub enum Step {
	Blocked(BlockReason),
	NeedsDatasetUpload,
	NeedsApproval { shortfall: Amount },
	ReadyToCreate,
}

/// Monotonically increasing request-sequence guard for overlapping
/// asynchronous reads: a response is applied only if it originated from
/// the most recently issued request.
#[derive(Default, Eq, PartialEq, Clone, Copy, Debug)]
pub struct RequestSeq {
	issued: u64,
	applied: u64,
}

impl RequestSeq {
	pub fn issue(&mut self) -> u64 {
		self.issued += 1;
		self.issued
	}

	pub fn try_apply(&mut self, seq: u64) -> bool {
		if seq == self.issued {
			self.applied = seq;
			true
		} else {
			false
		}
	}

	pub fn in_flight(&self) -> bool {
		self.applied < self.issued
	}
}

/// Session-local state of the create-task flow. Nothing here persists: a
/// confirmed creation resets every field and the next step is recomputed
/// from scratch.
#[derive(Clone, Debug, Default)]
pub struct TaskForm {
	identity: Option<Address>,
	instructions: String,
	dataset_cid: String,
	reward_input: String,
	// parsed smallest-unit amount; zero when the input is unparseable,
	// which blocks submission
	reward_amount: Amount,
	allowance: AllowanceState,
	allowance_seq: RequestSeq,
}

impl TaskForm {
	pub fn new(identity: Option<Address>) -> Self {
		TaskForm { identity, ..Default::default() }
	}

	pub fn identity(&self) -> Option<Address> {
		self.identity
	}

	// an identity change invalidates any fetched allowance snapshot
	pub fn set_identity(&mut self, identity: Option<Address>) {
		if self.identity != identity {
			self.identity = identity;
			self.allowance = AllowanceState::default();
		}
	}

	pub fn set_instructions(&mut self, instructions: &str) {
		self.instructions = instructions.to_owned();
	}

	pub fn instructions(&self) -> &str {
		&self.instructions
	}

	pub fn set_dataset_reference(&mut self, reference: &str) {
		self.dataset_cid = ipfs::strip_scheme(reference).to_owned();
	}

	pub fn dataset_cid(&self) -> &str {
		&self.dataset_cid
	}

	/// Record the reward input. An unparseable amount is normalized to
	/// zero locally, which keeps every transaction blocked.
	pub fn set_reward(&mut self, input: &str) {
		self.reward_input = input.to_owned();
		self.reward_amount = match parse_units(input) {
			Ok(amount) => amount,
			Err(e) => {
				log::warn!(target: FORM_LOG_TARGET, "reward input rejected: {:}", e);
				Amount::zero()
			},
		};
	}

	pub fn reward_amount(&self) -> Amount {
		self.reward_amount
	}

	pub fn allowance_state(&self) -> AllowanceState {
		self.allowance
	}

	/// Start an allowance/balance check; the returned sequence number must
	/// accompany the response.
	pub fn begin_allowance_check(&mut self) -> u64 {
		self.allowance_seq.issue()
	}

	/// Apply a finished allowance check. Returns false (and leaves state
	/// untouched) when a newer check was issued in the meantime.
	pub fn apply_allowance_check(&mut self, seq: u64, state: AllowanceState) -> bool {
		if self.allowance_seq.try_apply(seq) {
			self.allowance = state;
			true
		} else {
			log::debug!(
				target: FORM_LOG_TARGET,
				"allowance response #{:} superseded, dropped",
				seq
			);
			false
		}
	}

	pub fn checking_allowance(&self) -> bool {
		self.allowance_seq.in_flight()
	}

	/// A confirmed approval raises the local allowance to the requested
	/// reward immediately; the next authoritative read reconciles it.
	pub fn confirm_approval(&mut self) {
		self.allowance.allowance = self.reward_amount;
	}

	/// A confirmed creation resets the form to its initial empty state.
	pub fn confirm_created(&mut self) {
		*self = TaskForm::new(self.identity);
	}

	pub fn reconcile(&self) -> Reconciliation {
		reconcile(self.reward_amount, &self.allowance)
	}

	/// Derive the one step currently actionable.
	pub fn next_step(&self) -> Step {
		if self.identity.is_none() {
			return Step::Blocked(BlockReason::NoIdentity)
		}
		if self.reward_amount.is_zero() {
			return Step::Blocked(BlockReason::ZeroReward)
		}
		if self.dataset_cid.is_empty() {
			return Step::NeedsDatasetUpload
		}
		let reconciliation = self.reconcile();
		if reconciliation.requires_approval {
			return Step::NeedsApproval { shortfall: reconciliation.shortfall }
		}
		Step::ReadyToCreate
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use datadex_primitives::U256;

	fn connected_form() -> TaskForm {
		TaskForm::new(Some(Address::from_low_u64_be(1)))
	}

	#[test]
	fn creation_happy_path_walks_approval_then_ready() {
		let mut form = connected_form();
		form.set_dataset_reference("ipfs://QmFoo");
		form.set_reward("50");

		let seq = form.begin_allowance_check();
		assert!(form.checking_allowance());
		let applied = form
			.apply_allowance_check(seq, AllowanceState { allowance: U256::zero(), balance: U256::from(100u64) * U256::exp10(18) });
		assert!(applied);
		assert!(!form.checking_allowance());

		let expected_shortfall = U256::from(50u64) * U256::exp10(18);
		assert_eq!(form.next_step(), Step::NeedsApproval { shortfall: expected_shortfall });

		form.confirm_approval();
		assert_eq!(form.next_step(), Step::ReadyToCreate);
	}

	#[test]
	fn zero_reward_blocks_everything() {
		let mut form = connected_form();
		form.set_dataset_reference("QmFoo");
		form.set_reward("0");
		assert_eq!(form.next_step(), Step::Blocked(BlockReason::ZeroReward));

		// unparseable input normalizes to zero and blocks as well
		form.set_reward("fifty");
		assert_eq!(form.reward_amount(), Amount::zero());
		assert_eq!(form.next_step(), Step::Blocked(BlockReason::ZeroReward));
	}

	#[test]
	fn missing_identity_blocks_first() {
		let mut form = TaskForm::new(None);
		form.set_dataset_reference("QmFoo");
		form.set_reward("50");
		assert_eq!(form.next_step(), Step::Blocked(BlockReason::NoIdentity));
	}

	#[test]
	fn missing_dataset_requires_upload() {
		let mut form = connected_form();
		form.set_reward("50");
		assert_eq!(form.next_step(), Step::NeedsDatasetUpload);
	}

	#[test]
	fn dataset_reference_scheme_is_stripped() {
		let mut form = connected_form();
		form.set_dataset_reference("ipfs://QmFoo");
		assert_eq!(form.dataset_cid(), "QmFoo");
	}

	#[test]
	fn stale_allowance_response_is_dropped() {
		let mut form = connected_form();
		form.set_reward("50");

		let first = form.begin_allowance_check();
		let second = form.begin_allowance_check();

		let stale = AllowanceState { allowance: U256::exp10(18), balance: U256::zero() };
		assert!(!form.apply_allowance_check(first, stale));
		assert_eq!(form.allowance_state(), AllowanceState::default());
		assert!(form.checking_allowance());

		let fresh = AllowanceState { allowance: U256::exp10(20), balance: U256::exp10(20) };
		assert!(form.apply_allowance_check(second, fresh));
		assert_eq!(form.allowance_state(), fresh);
	}

	#[test]
	fn confirmed_creation_resets_fields_but_keeps_identity() {
		let mut form = connected_form();
		form.set_dataset_reference("QmFoo");
		form.set_instructions("label the street signs");
		form.set_reward("50");
		form.confirm_created();

		assert_eq!(form.identity(), Some(Address::from_low_u64_be(1)));
		assert_eq!(form.dataset_cid(), "");
		assert_eq!(form.instructions(), "");
		assert_eq!(form.reward_amount(), Amount::zero());
		assert_eq!(form.next_step(), Step::Blocked(BlockReason::ZeroReward));
	}

	#[test]
	fn identity_change_invalidates_allowance_snapshot() {
		let mut form = connected_form();
		form.set_reward("50");
		let seq = form.begin_allowance_check();
		form.apply_allowance_check(
			seq,
			AllowanceState { allowance: U256::exp10(20), balance: U256::exp10(20) },
		);

		form.set_identity(Some(Address::from_low_u64_be(2)));
		assert_eq!(form.allowance_state(), AllowanceState::default());
	}
}
