use std::collections::BTreeSet;

use datadex_primitives::{Address, TaskRecord, TaskStatus};

use crate::error::{Error, Result};

pub const STATUS_LOG_TARGET: &str = "TaskStatus";

/// Transaction a viewer may be offered against a task.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Debug)]
pub enum Action {
	Claim,
	Submit,
	ClaimReward,
}

/// Classify a record into its typed status. An ordinal outside the known
/// set is an `UnknownStatus` error, never a silent default.
pub fn classify(record: &TaskRecord) -> Result<TaskStatus> {
	TaskStatus::from_ordinal(record.status).ok_or(Error::UnknownStatus(record.status))
}

/// Actions the connected identity may take on a task.
///
/// Submission is deliberately open while the task is still `Created`: the
/// contract accepts an annotation from an account that never claimed the
/// task, and the client mirrors that. A `Claimed` task can be re-claimed
/// only by its own annotator, which the contract treats as a no-op.
///
/// A record with an unknown status ordinal yields the empty set so that
/// rendering can degrade instead of failing.
pub fn permitted_actions(record: &TaskRecord, viewer: Address) -> BTreeSet<Action> {
	let mut actions = BTreeSet::new();
	let status = match TaskStatus::from_ordinal(record.status) {
		Some(status) => status,
		None => {
			log::warn!(
				target: STATUS_LOG_TARGET,
				"unknown status ordinal {:} on task #{:}, offering no actions",
				record.status,
				record.id
			);
			return actions
		},
	};

	match status {
		TaskStatus::Created => {
			actions.insert(Action::Claim);
			actions.insert(Action::Submit);
		},
		TaskStatus::Claimed => {
			if viewer == record.annotator {
				actions.insert(Action::Claim);
			}
			actions.insert(Action::Submit);
		},
		TaskStatus::Verified =>
			if viewer == record.annotator {
				actions.insert(Action::ClaimReward);
			},
		TaskStatus::Submitted | TaskStatus::Canceled | TaskStatus::Rejected => {},
	}

	actions
}

#[cfg(test)]
mod tests {
	use super::*;
	use datadex_primitives::chain::utils::trim_address_str;

	fn record(status: u8, annotator: Address) -> TaskRecord {
		TaskRecord {
			id: 1.into(),
			requestor: Address::from_low_u64_be(10),
			annotator,
			ipfs_cid: "QmFoo".to_owned(),
			reward_amount: 1.into(),
			instructions: String::new(),
			status,
		}
	}

	#[test]
	fn submit_permitted_only_while_created_or_claimed() {
		let viewer = Address::from_low_u64_be(1);
		for status in 0u8..6 {
			let actions = permitted_actions(&record(status, Address::zero()), viewer);
			assert_eq!(actions.contains(&Action::Submit), status <= 1, "status {}", status);
		}
	}

	#[test]
	fn claim_reward_requires_verified_and_annotator() {
		let annotator = Address::from_low_u64_be(2);
		let stranger = Address::from_low_u64_be(3);

		let verified = record(TaskStatus::Verified.ordinal(), annotator);
		assert!(permitted_actions(&verified, annotator).contains(&Action::ClaimReward));
		assert!(!permitted_actions(&verified, stranger).contains(&Action::ClaimReward));

		for status in [0u8, 1, 2, 4, 5] {
			let actions = permitted_actions(&record(status, annotator), annotator);
			assert!(!actions.contains(&Action::ClaimReward), "status {}", status);
		}
	}

	#[test]
	fn identity_comparison_ignores_hex_case() {
		// identities reach the model as parsed addresses, so case in the
		// textual form cannot matter
		let lower = trim_address_str("0x72b5fc9eced3157674a187d30c7d36bdad950b9d").unwrap();
		let upper = trim_address_str("0x72B5FC9ECED3157674A187D30C7D36BDAD950B9D").unwrap();
		let verified = record(TaskStatus::Verified.ordinal(), lower);
		assert!(permitted_actions(&verified, upper).contains(&Action::ClaimReward));
	}

	#[test]
	fn reclaim_only_by_same_annotator() {
		let annotator = Address::from_low_u64_be(2);
		let stranger = Address::from_low_u64_be(3);
		let claimed = record(TaskStatus::Claimed.ordinal(), annotator);

		assert!(permitted_actions(&claimed, annotator).contains(&Action::Claim));
		assert!(!permitted_actions(&claimed, stranger).contains(&Action::Claim));
		// anyone may claim a freshly created task
		let created = record(TaskStatus::Created.ordinal(), Address::zero());
		assert!(permitted_actions(&created, stranger).contains(&Action::Claim));
	}

	#[test]
	fn unknown_status_yields_empty_set_not_fault() {
		let viewer = Address::from_low_u64_be(1);
		let odd = record(7, viewer);
		assert!(permitted_actions(&odd, viewer).is_empty());
		assert!(matches!(classify(&odd), Err(Error::UnknownStatus(7))));
	}

	#[test]
	fn terminal_statuses_offer_nothing() {
		let annotator = Address::from_low_u64_be(2);
		for status in [TaskStatus::Canceled, TaskStatus::Rejected] {
			assert!(permitted_actions(&record(status.ordinal(), annotator), annotator).is_empty());
		}
	}
}
