//! JSON bodies exchanged with the OFD-Ya API.
//!
//! Upstream omits fields and sends `null` freely, so every field falls back to
//! its zero value instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Serialize)]
pub struct RegistersRequest {
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsRequest {
    pub date: String,
    pub fiscal_drive_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeLinkRequest {
    pub fiscal_drive_number: String,
    pub fiscal_document_number: i64,
}

/// Response of the register (KKT) listing endpoint.
///
/// Registers are keyed by registration id. A `BTreeMap` keeps the iteration
/// order stable regardless of how upstream orders the keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegisterListing {
    #[serde(rename = "KKT", deserialize_with = "null_as_default")]
    pub registers: BTreeMap<String, Vec<RegisterDetail>>,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last: String,
    /// Ignored when flattening; the enclosing map key is authoritative.
    #[serde(rename = "kktregid", deserialize_with = "null_as_default")]
    pub kkt_reg_id: String,
    pub turnover: i64,
    pub receipt_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentListing {
    pub count: i64,
    #[serde(rename = "items", deserialize_with = "null_as_default")]
    pub documents: Vec<Document>,
}

/// A fiscal document (receipt) as recorded by a register.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    /// Unix timestamp of the receipt
    pub date_time: i64,
    pub provision_sum: i64,
    pub fiscal_document_format_ver: i64,
    pub code: i64,
    /// FN
    #[serde(deserialize_with = "null_as_default")]
    pub fiscal_drive_number: String,
    pub shift_number: i64,
    pub receiving_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub operator: String,
    pub request_number: i64,
    pub ecash_total_sum: i64,
    /// FD
    pub fiscal_document_number: i64,
    pub taxation_type: i64,
    pub nds_no: i64,
    pub nds0: i64,
    pub nds10: i64,
    pub nds18: i64,
    pub nds20: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub user_inn: String,
    pub credit_sum: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub kkt_reg_id: String,
    pub cash_total_sum: i64,
    pub total_sum: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub authority_uri: String,
    #[serde(deserialize_with = "null_as_default")]
    pub retail_address: String,
    /// FP
    pub fiscal_sign: i64,
    pub operation_type: i64,
    pub prepaid_sum: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub retail_place: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<DocumentItem>,
}

impl Document {
    /// Sum of the VAT buckets reported upstream, saturating at the `i64` bounds.
    pub fn tax_total(&self) -> i64 {
        [self.nds0, self.nds10, self.nds18, self.nds20]
            .into_iter()
            .fold(self.nds_no, i64::saturating_add)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentItem {
    pub quantity: Option<Quantity>,
    pub price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub sum: i64,
    pub product_type: i64,
    pub payment_type: i64,
}

/// Item quantity, sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl Quantity {
    /// Whole units of the quantity.
    ///
    /// The fractional part is dropped. Anything that is not a number yields 0.
    pub fn whole_units(&self) -> i64 {
        match self {
            Quantity::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(truncate))
                .unwrap_or(0),
            Quantity::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate))
                    .unwrap_or(0)
            }
        }
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChequeLink {
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
}
