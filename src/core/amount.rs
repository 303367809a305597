use crate::domain::model::Amount;
use regex::Regex;
use std::sync::LazyLock;

// 例: "12,345円"、"1,000円 (50ポイント)"、"1,000円（50ポイント）"
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9][0-9,]*)円(?:\s*[(（]([0-9][0-9,]*)ポイント[)）])?").unwrap()
});

/// 解析畫面上的金額文字；不是金額時回傳 `None`
pub fn parse_amount(text: &str) -> Option<Amount> {
    let caps = AMOUNT_PATTERN.captures(text)?;
    let currency_units = parse_grouped(caps.get(1)?.as_str())?;
    let point_units = match caps.get(2) {
        Some(points) => parse_grouped(points.as_str())?,
        None => 0,
    };
    Some(Amount::new(currency_units, point_units))
}

pub fn format_amount(amount: Amount) -> String {
    format!(
        "{}円 ({}ポイント)",
        group_thousands(amount.currency_units),
        group_thousands(amount.point_units)
    )
}

fn parse_grouped(digits: &str) -> Option<u64> {
    digits.replace(',', "").parse().ok()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
