use super::schema::{RegisterListing, RegistersRequest};
use super::OfdClient;
use crate::constants::REGISTERS_PATH;
use crate::errors::AppResult;
use crate::models::Register;
use crate::utils::format_request_date;
use chrono::NaiveDate;
use tracing::{error, info};

impl OfdClient {
    /// Lists the cash registers known to the account on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    /// The failure is logged before it is returned.
    pub async fn fetch_registers(&self, date: NaiveDate) -> AppResult<Vec<Register>> {
        let request = RegistersRequest {
            date: format_request_date(date),
        };

        let listing: RegisterListing = self
            .post_json(REGISTERS_PATH, &request)
            .await
            .inspect_err(|e| error!(date = %date, error = %e, "Register lookup failed"))?;

        let registers = flatten_registers(listing);
        info!(date = %date, registers = registers.len(), "Registers fetched");
        Ok(registers)
    }
}

/// Flattens the upstream register map into a list.
///
/// Each element of a map value becomes one [`Register`], identified by the
/// map key it was found under. Nothing is emitted when `count` is not positive.
pub fn flatten_registers(listing: RegisterListing) -> Vec<Register> {
    if listing.count <= 0 {
        return Vec::new();
    }

    listing
        .registers
        .into_iter()
        .flat_map(|(registration_id, details)| {
            details.into_iter().map(move |detail| Register {
                registration_id: registration_id.clone(),
                address: detail.address,
            })
        })
        .collect()
}
