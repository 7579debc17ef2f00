use rust_decimal::{Decimal, RoundingStrategy};

pub const RUPEE_SYMBOL: &str = "₹";

const MAX_FRACTION_DIGITS: u32 = 3;

/// Formats an amount as Indian rupees with en-IN digit grouping, e.g. `₹1,00,000`.
///
/// At most three fraction digits are kept and trailing zeros are dropped.
pub fn format_inr(amount: Decimal) -> String {
    format!("{RUPEE_SYMBOL}{}", group_en_in(amount))
}

/// en-IN grouping: the last three integer digits form one group, the rest are grouped in pairs.
pub fn group_en_in(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + integer.len() / 2 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_integer(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_integer(integer: &str) -> String {
    if integer.len() <= 3 {
        return integer.to_string();
    }

    let (head, tail) = integer.split_at(integer.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
