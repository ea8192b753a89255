use web3::types::U256;

use crate::Amount;

// fractional digits of the reward token
pub const TOKEN_DECIMALS: usize = 18;

/// Parse a user-entered decimal amount ("50", "0.25") into the token's
/// smallest unit. Rejects anything that is not a plain non-negative decimal.
pub fn parse_units(value: &str) -> Result<Amount> {
	let value = value.trim();
	let (int_part, frac_part) = match value.split_once('.') {
		Some((i, f)) => (i, f),
		None => (value, ""),
	};
	if int_part.is_empty() && frac_part.is_empty() {
		return Err(Error::InvalidAmount(value.to_owned()))
	}
	if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit())
	{
		return Err(Error::InvalidAmount(value.to_owned()))
	}
	if frac_part.len() > TOKEN_DECIMALS {
		return Err(Error::TooManyDecimals(value.to_owned()))
	}

	let int_units = if int_part.is_empty() {
		U256::zero()
	} else {
		U256::from_dec_str(int_part).map_err(|_| Error::InvalidAmount(value.to_owned()))?
	};
	let scaled = int_units
		.checked_mul(U256::exp10(TOKEN_DECIMALS))
		.ok_or_else(|| Error::AmountOverflow(value.to_owned()))?;

	let frac_units = if frac_part.is_empty() {
		U256::zero()
	} else {
		let raw =
			U256::from_dec_str(frac_part).map_err(|_| Error::InvalidAmount(value.to_owned()))?;
		raw * U256::exp10(TOKEN_DECIMALS - frac_part.len())
	};

	scaled.checked_add(frac_units).ok_or_else(|| Error::AmountOverflow(value.to_owned()))
}

/// Render a smallest-unit amount back as a decimal string for display.
pub fn format_units(amount: Amount) -> String {
	let base = U256::exp10(TOKEN_DECIMALS);
	let int_part = amount / base;
	let frac_part = amount % base;
	if frac_part.is_zero() {
		return int_part.to_string()
	}
	let mut frac = frac_part.to_string();
	while frac.len() < TOKEN_DECIMALS {
		frac.insert(0, '0');
	}
	format!("{}.{}", int_part, frac.trim_end_matches('0'))
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Invalid decimal amount: {0}")]
	InvalidAmount(String),

	#[error("Too many fractional digits in amount: {0}")]
	TooManyDecimals(String),

	#[error("Amount out of range: {0}")]
	AmountOverflow(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_units_should_scale_integers() {
		assert_eq!(parse_units("50").unwrap(), U256::from(50u64) * U256::exp10(18));
		assert_eq!(parse_units("0").unwrap(), U256::zero());
	}

	#[test]
	fn parse_units_should_scale_fractions() {
		assert_eq!(parse_units("0.5").unwrap(), U256::from(5u64) * U256::exp10(17));
		assert_eq!(parse_units(".5").unwrap(), U256::from(5u64) * U256::exp10(17));
		assert_eq!(parse_units("1.000000000000000001").unwrap(), U256::exp10(18) + U256::one());
	}

	#[test]
	fn parse_units_should_reject_garbage() {
		assert!(parse_units("").is_err());
		assert!(parse_units(".").is_err());
		assert!(parse_units("abc").is_err());
		assert!(parse_units("-1").is_err());
		assert!(parse_units("1.2.3").is_err());
		assert!(parse_units("1.0000000000000000001").is_err());
	}

	#[test]
	fn format_units_should_trim_trailing_zeros() {
		assert_eq!(format_units(U256::from(50u64) * U256::exp10(18)), "50");
		assert_eq!(format_units(U256::from(5u64) * U256::exp10(17)), "0.5");
		assert_eq!(format_units(U256::exp10(18) + U256::one()), "1.000000000000000001");
		assert_eq!(format_units(U256::zero()), "0");
	}

	#[test]
	fn parse_format_should_agree() {
		for input in ["50", "0.5", "12.34"] {
			assert_eq!(format_units(parse_units(input).unwrap()), input);
		}
	}
}
