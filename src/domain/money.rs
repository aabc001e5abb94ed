//! Monetary amount formatting.
//!
//! Amounts are carried as integer paise throughout the system. Documents
//! render them with a fixed textual prefix rather than a locale-dependent
//! currency symbol, so generated bytes do not vary by renderer or locale.

/// Formats an amount in paise as `Rs. <rupees>.<paise>`.
///
/// # Examples
///
/// ```
/// use amcdesk::domain::money::format_paise;
///
/// assert_eq!(format_paise(99_900), "Rs. 999.00");
/// assert_eq!(format_paise(50), "Rs. 0.50");
/// ```
pub fn format_paise(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("{}Rs. {}.{:02}", sign, abs / 100, abs % 100)
}
