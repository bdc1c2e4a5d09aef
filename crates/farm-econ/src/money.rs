//! Currency formatting for notifications and the finance view.

/// Group digits with commas, e.g. `400000` -> `"400,000"`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Dollar amount with grouped digits, e.g. `"$5,000"`.
pub fn format_money(n: u64) -> String {
    format!("${}", format_thousands(n))
}

/// Short balance label: `$1.2M`, `$5K` or `$999`.
///
/// Ties round away from zero, so `7500` prints as `$8K` and `-7500` as
/// `$-8K`. Negative amounts keep their sign after the `$`.
pub fn format_compact(amount: i64) -> String {
    let abs = amount.unsigned_abs();
    if abs >= 1_000_000 {
        let tenths = (amount as f64 / 100_000.0).round();
        format!("${:.1}M", tenths / 10.0)
    } else if abs >= 1_000 {
        format!("${}K", (amount as f64 / 1_000.0).round())
    } else if amount < 0 {
        format!("$-{}", format_thousands(abs))
    } else {
        format!("${}", format_thousands(abs))
    }
}

/// Signed ledger amount: `+$3K` for credits, `$-1K` for debits.
pub fn format_delta(amount: i64) -> String {
    if amount >= 0 {
        format!("+{}", format_compact(amount))
    } else {
        format_compact(amount)
    }
}
