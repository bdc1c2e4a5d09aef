//! Crop silos and the sell ticket opened against one of them.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CropSilo {
    pub id: String,
    pub label: String,
    /// Stored quantity.
    pub stock: u64,
}

impl CropSilo {
    pub fn new(id: impl Into<String>, label: impl Into<String>, stock: u64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            stock,
        }
    }

    /// Match by id or, case-insensitively, by label.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id == key || self.label.eq_ignore_ascii_case(key)
    }
}

/// Silos shown in the top bar of a new session.
pub fn sample_silos() -> Vec<CropSilo> {
    vec![
        CropSilo::new("1", "Wheat", 1_240),
        CropSilo::new("2", "Corn", 892),
        CropSilo::new("3", "Soy", 2_103),
        CropSilo::new("4", "Barley", 456),
        CropSilo::new("5", "Oats", 718),
    ]
}

/// Amount selected for sale; never exceeds the silo stock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SellTicket {
    stock: u64,
    amount: u64,
}

impl SellTicket {
    pub fn new(stock: u64) -> Self {
        Self { stock, amount: 0 }
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Set the slider, clamped to the available stock. Returns the stored amount.
    pub fn set_amount(&mut self, amount: u64) -> u64 {
        self.amount = amount.min(self.stock);
        self.amount
    }

    pub fn sell_all(&mut self) -> u64 {
        self.set_amount(self.stock)
    }

    /// Proceeds at `price`. Informational; nothing is debited.
    pub fn quote(&self, price: Decimal) -> Decimal {
        Decimal::from(self.amount) * price
    }
}
