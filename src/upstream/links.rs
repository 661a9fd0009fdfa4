use super::schema::{ChequeLink, ChequeLinkRequest, Document};
use super::OfdClient;
use crate::constants::CHEQUE_LINK_PATH;
use crate::errors::AppResult;
use futures::stream::{self, StreamExt};
use tracing::warn;

impl OfdClient {
    /// Fetches the public cheque link of a single fiscal document.
    ///
    /// Returns an empty string when upstream omits the `link` field.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn fetch_link(
        &self,
        registration_id: &str,
        fiscal_document_number: i64,
    ) -> AppResult<String> {
        let request = ChequeLinkRequest {
            fiscal_drive_number: registration_id.to_string(),
            fiscal_document_number,
        };
        let link: ChequeLink = self.post_json(CHEQUE_LINK_PATH, &request).await?;
        Ok(link.link)
    }

    /// Resolves the links of `documents`, in order.
    ///
    /// Up to `link_concurrency` lookups run at once. A failed lookup is logged
    /// and yields an empty link.
    pub(crate) async fn resolve_links(
        &self,
        registration_id: &str,
        documents: &[Document],
    ) -> Vec<String> {
        stream::iter(documents)
            .map(|document| async move {
                let fd = document.fiscal_document_number;
                match self.fetch_link(registration_id, fd).await {
                    Ok(link) => link,
                    Err(e) => {
                        warn!(
                            registration_id = registration_id,
                            fiscal_document_number = fd,
                            error = %e,
                            "Cheque link lookup failed, keeping receipt without link"
                        );
                        String::new()
                    }
                }
            })
            .buffered(self.link_concurrency)
            .collect()
            .await
    }
}
