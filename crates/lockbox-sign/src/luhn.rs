//! Generalized Luhn check digits for bases 2, 8, 10, and 16
//!
//! The two operations double digits at *opposite* reversed-index
//! parities: `check_number` validates input whose check digit already
//! occupies position 0, while `compute_check_digit` runs before the
//! digit is appended, which shifts every position by one. Making the
//! parities match would break the algorithm.

use lockbox_core::{LockboxError, LockboxResult};

const SUPPORTED_MODULI: [u32; 4] = [2, 8, 10, 16];

const HEX_DIGITS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

/// Parse `number` into digit values for the given base, validating both
/// the modulus and the character set.
fn digit_values(number: &str, modulus: u32) -> LockboxResult<Vec<u32>> {
    if !SUPPORTED_MODULI.contains(&modulus) {
        return Err(LockboxError::InvalidArgument(format!(
            "unsupported modulus {modulus}, expected 2, 8, 10, or 16"
        )));
    }
    if number.is_empty() {
        return Err(LockboxError::InvalidArgument(
            "number is empty".to_string(),
        ));
    }
    number
        .chars()
        .map(|c| {
            c.to_digit(modulus).ok_or_else(|| {
                LockboxError::InvalidArgument(format!(
                    "character {c:?} is not a base-{modulus} digit"
                ))
            })
        })
        .collect()
}

/// Double digits at one reversed-index parity, fold overflow back into
/// range by subtracting `modulus - 1`, and sum.
fn luhn_sum(digits: &[u32], modulus: u32, double_odd: bool) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| if (i % 2 != 0) == double_odd { d * 2 } else { d })
        .map(|d| if d > modulus - 1 { d - (modulus - 1) } else { d })
        .sum()
}

/// Validate a number that already carries its Luhn check digit.
pub fn check_number(number: &str, modulus: u32) -> LockboxResult<bool> {
    let digits = digit_values(number, modulus)?;
    Ok(luhn_sum(&digits, modulus, true) % modulus == 0)
}

/// Compute the Luhn check digit to append to `number`, as a single
/// uppercase hex character.
pub fn compute_check_digit(number: &str, modulus: u32) -> LockboxResult<char> {
    let digits = digit_values(number, modulus)?;
    let sum = luhn_sum(&digits, modulus, false);
    let value = (modulus - (sum % modulus)) % modulus;
    Ok(HEX_DIGITS[value as usize])
}
