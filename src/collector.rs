//! Top-level receipt collection across every register of the account.

use crate::config::ErrorPolicy;
use crate::errors::{AppError, AppResult, RegisterFailure};
use crate::models::Receipt;
use crate::upstream::OfdClient;
use chrono::NaiveDate;
use tracing::{error, info};

/// Receipts gathered for one date, possibly incomplete.
///
/// When `error` is set, `receipts` holds whatever was collected before (or
/// despite) the failure and must not be treated as the full day.
#[derive(Debug)]
pub struct ReceiptBatch {
    pub receipts: Vec<Receipt>,
    pub error: Option<AppError>,
}

impl ReceiptBatch {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Discards partial results on failure.
    pub fn into_result(self) -> AppResult<Vec<Receipt>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.receipts),
        }
    }
}

impl OfdClient {
    /// Collects the receipts of every register for `date`.
    ///
    /// Registers are processed one at a time in listing order, and receipts
    /// keep that order. A failed register lookup ends the run with no receipts.
    /// A failed document listing either ends the run
    /// ([`ErrorPolicy::FailFast`]) or is recorded while the remaining
    /// registers are processed ([`ErrorPolicy::Continue`]).
    pub async fn collect_receipts(&self, date: NaiveDate) -> ReceiptBatch {
        let registers = match self.fetch_registers(date).await {
            Ok(registers) => registers,
            Err(e) => {
                return ReceiptBatch {
                    receipts: Vec::new(),
                    error: Some(e),
                }
            }
        };

        let mut receipts = Vec::new();
        let mut failures = Vec::new();

        for register in &registers {
            match self
                .receipts_for_register(&register.registration_id, date)
                .await
            {
                Ok(batch) => receipts.extend(batch),
                Err(e) => match self.error_policy {
                    ErrorPolicy::FailFast => {
                        error!(
                            registration_id = %register.registration_id,
                            collected = receipts.len(),
                            "Stopping receipt collection"
                        );
                        return ReceiptBatch {
                            receipts,
                            error: Some(e),
                        };
                    }
                    ErrorPolicy::Continue => failures.push(RegisterFailure {
                        registration_id: register.registration_id.clone(),
                        error: e,
                    }),
                },
            }
        }

        info!(
            date = %date,
            registers = registers.len(),
            receipts = receipts.len(),
            failed_registers = failures.len(),
            "Receipt collection finished"
        );

        ReceiptBatch {
            receipts,
            error: (!failures.is_empty()).then(|| AppError::RegisterFailures(failures)),
        }
    }
}
