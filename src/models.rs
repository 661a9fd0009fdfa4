use serde::Serialize;

/// A cash register (KKT) known to the account on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Register {
    pub registration_id: String,
    pub address: String,
}

/// A normalized fiscal receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// Always 0; identity is assigned downstream.
    pub id: i64,
    /// Fiscal sign (FP)
    pub fp: String,
    /// Fiscal document number (FD)
    pub fd: String,
    /// RFC 3339 timestamp
    pub date: String,
    pub products: Vec<Product>,
    pub link: String,
    pub price: i64,
    /// Always 0; upstream tax buckets are not mapped here.
    pub vat_price: i64,
}

/// A receipt line item. Carries the receipt's FP/FD/FN and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: String,
    pub quantity: i64,
    pub price: i64,
    pub vat: i64,
    pub vat_price: i64,
    pub total_price: i64,
    pub fp: String,
    pub fd: String,
    pub r#fn: String,
    pub time: String,
}
