use anchor_lang::prelude::*;

#[error_code]
pub enum MathErrorCode {
    #[msg("Math overflow")]
    MathOverflow,
    #[msg("Amount must be a finite, non-negative number")]
    InvalidAmount,
}

/// Converts a human-entered amount to the token's native fixed-point units
///
/// The conversion works on the shortest decimal representation of `amount`
/// rather than on `amount * 10^decimals`, so `0.1` with 6 decimals is exactly
/// `100_000`. Digits beyond `decimals` are rounded half up.
///
/// # Errors
/// * `MathErrorCode::InvalidAmount` - If `amount` is negative, NaN or infinite
/// * `MathErrorCode::MathOverflow` - If the result does not fit in a `u64`
pub fn ui_amount_to_native(amount: f64, decimals: u8) -> Result<u64> {
    require!(
        amount.is_finite() && amount >= 0.0,
        MathErrorCode::InvalidAmount
    );

    // f64's Display never uses exponent notation
    let repr = amount.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let scale = 10_u128
        .checked_pow(decimals as u32)
        .ok_or(MathErrorCode::MathOverflow)?;
    let mut native = parse_digits(int_part)?
        .checked_mul(scale)
        .ok_or(MathErrorCode::MathOverflow)?;

    let kept = frac_part.len().min(decimals as usize);
    let mut frac_digits = frac_part[..kept].to_string();
    while frac_digits.len() < decimals as usize {
        frac_digits.push('0');
    }
    native = native
        .checked_add(parse_digits(&frac_digits)?)
        .ok_or(MathErrorCode::MathOverflow)?;

    if frac_part[kept..].chars().next().is_some_and(|c| c >= '5') {
        native = native.checked_add(1).ok_or(MathErrorCode::MathOverflow)?;
    }

    u64::try_from(native).map_err(|_| error!(MathErrorCode::MathOverflow))
}

/// Converts native fixed-point units back to a human amount
pub fn native_to_ui_amount(native: u64, decimals: u8) -> f64 {
    native as f64 / 10_f64.powi(decimals as i32)
}

/// Scales a ratio by `scale` and floors it, e.g. a vote multiplier of 1.5 with
/// scale 10000 becomes 15000
pub fn scale_ratio_floor(ratio: f64, scale: u32) -> Result<u32> {
    require!(ratio.is_finite() && ratio >= 0.0, MathErrorCode::InvalidAmount);

    let scaled = (ratio * scale as f64).floor();
    require!(scaled <= u32::MAX as f64, MathErrorCode::MathOverflow);

    Ok(scaled as u32)
}

/// Converts an integer-valued form number to `T`, rejecting fractions and
/// out-of-range values
pub fn checked_integer<T: TryFrom<u64>>(value: f64) -> Result<T> {
    require!(
        value.is_finite() && value >= 0.0 && value.fract() == 0.0,
        MathErrorCode::InvalidAmount
    );
    require!(value <= u64::MAX as f64, MathErrorCode::MathOverflow);

    T::try_from(value as u64).map_err(|_| error!(MathErrorCode::MathOverflow))
}

fn parse_digits(digits: &str) -> Result<u128> {
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<u128>()
        .map_err(|_| error!(MathErrorCode::MathOverflow))
}
