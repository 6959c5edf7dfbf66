use thiserror::Error;

pub const DEFAULT_AMOUNT_OZ: f64 = 64.0;
pub const MAX_AMOUNT_OZ: f64 = 10_000.0;

#[derive(Debug, Error, PartialEq)]
#[error("amount_oz must be a number between 0 and 10000")]
pub struct AmountOutOfRange;

pub fn resolve_amount(requested: Option<f64>) -> Result<f64, AmountOutOfRange> {
    let amount = match requested {
        Some(value) => value,
        None => return Ok(DEFAULT_AMOUNT_OZ),
    };
    if !amount.is_finite() || amount < 0.0 || amount > MAX_AMOUNT_OZ {
        return Err(AmountOutOfRange);
    }
    Ok(amount)
}

pub fn window_start(now: i64, window_seconds: i64) -> i64 {
    if window_seconds <= 0 {
        return now;
    }
    now - now.rem_euclid(window_seconds)
}

pub fn month_key(created_at: i64) -> String {
    match chrono::DateTime::from_timestamp(created_at, 0) {
        Some(ts) => ts.format("%Y-%m").to_string(),
        None => "1970-01".to_string(),
    }
}
