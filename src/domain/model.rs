use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// 金額：現金（円）與點數（ポイント）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub currency_units: u64,
    pub point_units: u64,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        currency_units: 0,
        point_units: 0,
    };

    pub fn new(currency_units: u64, point_units: u64) -> Self {
        Self {
            currency_units,
            point_units,
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount {
            currency_units: self.currency_units.saturating_add(rhs.currency_units),
            point_units: self.point_units.saturating_add(rhs.point_units),
        }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::core::amount::format_amount(*self))
    }
}

/// 一筆待處理的投資信託委託
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub name: String,
    pub status: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub orders: Vec<Order>,
    pub total: Amount,
}

impl OrderSummary {
    pub fn new(orders: Vec<Order>) -> Self {
        let total = orders.iter().map(|order| &order.amount).sum();
        Self { orders, total }
    }
}
