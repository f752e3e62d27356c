/// Amounts are always integer minor units (cents).
pub type Cents = i64;

/// Render cents as a plain decimal string with two fractional digits, e.g. `-12.05`.
///
/// Only used for log output; amounts cross every boundary as integers.
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
