/// Fraction digits used when rendering a dollar amount.
///
/// Summary tables show whole dollars; receipts and financial views show cents.
/// Callers pick per display context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPrecision {
    Whole,
    Cents,
}

impl CurrencyPrecision {
    const fn digits(self) -> usize {
        match self {
            Self::Whole => 0,
            Self::Cents => 2,
        }
    }
}

/// Format `amount` as US dollars with thousands separators, e.g. `$12,500.00`.
pub fn format_usd(amount: f64, precision: CurrencyPrecision) -> String {
    let digits = precision.digits();
    let scale = 10_f64.powi(digits as i32);
    let scaled = (amount.abs() * scale).round();
    let negative = amount < 0.0 && scaled > 0.0;

    let units = (scaled / scale).trunc() as u64;
    let fraction = (scaled - units as f64 * scale) as u64;

    let mut out = String::with_capacity(16);
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(units));
    if digits > 0 {
        out.push('.');
        out.push_str(&format!("{fraction:0digits$}"));
    }
    out
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (idx, ch) in raw.chars().enumerate() {
        if idx > 0 && (raw.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Render a homeowner count the way tables show it, e.g. `12,400`.
pub fn format_count(value: u64) -> String {
    group_thousands(value)
}
