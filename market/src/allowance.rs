use datadex_primitives::{AllowanceState, Amount};

/// Outcome of comparing a requested reward against the current allowance
/// and balance. Pure data; recomputed on every input change.
#[derive(Eq, PartialEq, Clone, Copy, Debug)]
pub struct Reconciliation {
	// the marketplace may not yet spend the full reward
	pub requires_approval: bool,
	// how much allowance is missing
	pub shortfall: Amount,
	// display-only: approval is independent of funds
	pub insufficient_funds: bool,
}

/// Decide whether a spending pre-authorization must be requested before
/// task creation can proceed. The wallet balance never influences the
/// approval decision; it only flags a distinct insufficient-funds
/// condition for display.
pub fn reconcile(requested: Amount, state: &AllowanceState) -> Reconciliation {
	Reconciliation {
		requires_approval: state.allowance < requested,
		shortfall: requested.saturating_sub(state.allowance),
		insufficient_funds: state.balance < requested,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use datadex_primitives::U256;

	fn state(allowance: u64, balance: u64) -> AllowanceState {
		AllowanceState { allowance: allowance.into(), balance: balance.into() }
	}

	#[test]
	fn approval_required_iff_allowance_below_request() {
		for (requested, allowance) in [(0u64, 0u64), (1, 0), (50, 49), (50, 50), (50, 51), (0, 7)] {
			let res = reconcile(requested.into(), &state(allowance, 0));
			assert_eq!(res.requires_approval, allowance < requested);
		}
	}

	#[test]
	fn shortfall_is_clamped_difference() {
		let res = reconcile(50.into(), &state(20, 0));
		assert_eq!(res.shortfall, U256::from(30u64));

		let res = reconcile(20.into(), &state(50, 0));
		assert_eq!(res.shortfall, U256::zero());
	}

	#[test]
	fn shortfall_zero_iff_no_approval_required() {
		for (requested, allowance) in [(0u64, 0u64), (1, 0), (50, 49), (50, 50), (50, 51)] {
			let res = reconcile(requested.into(), &state(allowance, 100));
			assert_eq!(res.shortfall.is_zero(), !res.requires_approval);
		}
	}

	#[test]
	fn balance_never_affects_approval() {
		for balance in [0u64, 10, 50, 1000] {
			let res = reconcile(50.into(), &state(50, balance));
			assert!(!res.requires_approval);
			assert_eq!(res.insufficient_funds, balance < 50);
		}
	}

	#[test]
	fn reconcile_is_pure() {
		let requested = Amount::from(50u64);
		let state = state(20, 10);
		assert_eq!(reconcile(requested, &state), reconcile(requested, &state));
	}
}
