use alloy_primitives::{utils::format_ether, U256};

/// Formats a wei amount as ether, keeping at least one fractional digit.
///
/// `1_000_000_000_000_000_000` becomes `"1.0"`, `1_500_000_000_000_000_000`
/// becomes `"1.5"`.
pub fn format_balance(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    }
}
