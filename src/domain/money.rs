/// Money is represented as integer cents to avoid floating-point drift.
/// Balances accumulate exactly: 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable amount string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    // unsigned_abs: i64::MIN has no i64 absolute value
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Convert an evaluated amount into cents, rounding half away from zero
/// to two decimal places.
///
/// This is the single crossing point from expression arithmetic (f64)
/// into ledger arithmetic (exact integer cents). Returns `None` for
/// non-finite values and for magnitudes that do not fit the cent range.
pub fn cents_from_f64(value: f64) -> Option<Cents> {
    if !value.is_finite() {
        return None;
    }
    let scaled = (value * 100.0).round();
    // i64::MAX as f64 rounds up, so compare against the exact bound.
    if scaled < -(2f64.powi(63)) || scaled >= 2f64.powi(63) {
        return None;
    }
    Some(scaled as Cents)
}
