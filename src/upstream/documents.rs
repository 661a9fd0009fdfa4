use super::schema::{Document, DocumentListing, DocumentsRequest};
use super::OfdClient;
use crate::constants::DOCUMENTS_PATH;
use crate::errors::AppResult;
use crate::models::{Product, Receipt};
use crate::utils::{format_request_date, format_timestamp};
use chrono::{FixedOffset, NaiveDate};
use tracing::{debug, error, info};

impl OfdClient {
    /// Fetches the raw fiscal documents recorded by one register on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn fetch_documents(
        &self,
        registration_id: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<Document>> {
        let request = DocumentsRequest {
            date: format_request_date(date),
            fiscal_drive_number: registration_id.to_string(),
        };

        let listing: DocumentListing = self
            .post_json(DOCUMENTS_PATH, &request)
            .await
            .inspect_err(|e| {
                error!(
                    registration_id = registration_id,
                    date = %date,
                    error = %e,
                    "Document retrieval failed"
                )
            })?;

        Ok(listing.documents)
    }

    /// Fetches the documents of one register and normalizes them into receipts.
    ///
    /// Every document gets its cheque link resolved; a failed lookup leaves the
    /// link empty instead of dropping the receipt. Receipts keep the order in
    /// which upstream listed the documents.
    ///
    /// # Arguments
    ///
    /// * `registration_id` - Register (KKT) registration id
    /// * `date` - Calendar day to fetch
    ///
    /// # Errors
    ///
    /// Returns an error only if the document listing itself fails.
    pub async fn receipts_for_register(
        &self,
        registration_id: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<Receipt>> {
        let documents = self.fetch_documents(registration_id, date).await?;
        let links = self.resolve_links(registration_id, &documents).await;

        let receipts: Vec<Receipt> = documents
            .iter()
            .zip(links)
            .map(|(document, link)| normalize_document(document, link, self.utc_offset))
            .collect();

        info!(
            registration_id = registration_id,
            receipts = receipts.len(),
            "Documents fetched"
        );
        Ok(receipts)
    }
}

/// Builds the normalized receipt for one upstream document.
///
/// FP and FD are rendered as decimal strings, the Unix timestamp as RFC 3339,
/// and every product is stamped with the receipt's FP/FD/FN and time. VAT
/// fields stay zero.
pub fn normalize_document(
    document: &Document,
    link: String,
    utc_offset: Option<FixedOffset>,
) -> Receipt {
    let fp = document.fiscal_sign.to_string();
    let fd = document.fiscal_document_number.to_string();
    let time = format_timestamp(document.date_time, utc_offset);

    let tax_total = document.tax_total();
    if tax_total != 0 {
        debug!(
            fd = %fd,
            tax_total = tax_total,
            "Upstream reports VAT that is not mapped into the receipt"
        );
    }

    let products = document
        .items
        .iter()
        .map(|item| Product {
            name: item.name.clone(),
            quantity: item.quantity.as_ref().map_or(0, |q| q.whole_units()),
            price: item.price,
            vat: 0,
            vat_price: 0,
            total_price: item.sum,
            fp: fp.clone(),
            fd: fd.clone(),
            r#fn: document.fiscal_drive_number.clone(),
            time: time.clone(),
        })
        .collect();

    Receipt {
        id: 0,
        fp,
        fd,
        date: time,
        products,
        link,
        price: document.total_sum,
        vat_price: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::schema::{DocumentItem, Quantity};

    fn utc() -> Option<FixedOffset> {
        FixedOffset::east_opt(0)
    }

    fn item(name: &str, quantity: Quantity, price: i64, sum: i64) -> DocumentItem {
        DocumentItem {
            quantity: Some(quantity),
            price,
            name: name.to_string(),
            sum,
            ..DocumentItem::default()
        }
    }

    fn sample_document() -> Document {
        Document {
            date_time: 1_700_000_000,
            fiscal_drive_number: "9999078900012345".to_string(),
            fiscal_document_number: 222,
            fiscal_sign: 111,
            total_sum: 500,
            nds20: 83,
            items: vec![
                item("Item A", Quantity::Text("2".into()), 100, 200),
                item("Item B", Quantity::Text("abc".into()), 300, 300),
            ],
            ..Document::default()
        }
    }

    #[test]
    fn receipt_fields_are_derived_from_document() {
        let receipt = normalize_document(&sample_document(), "https://x/1".into(), utc());

        assert_eq!(receipt.id, 0);
        assert_eq!(receipt.fp, "111");
        assert_eq!(receipt.fd, "222");
        assert_eq!(receipt.date, "2023-11-14T22:13:20Z");
        assert_eq!(receipt.price, 500);
        assert_eq!(receipt.vat_price, 0);
        assert_eq!(receipt.link, "https://x/1");
        assert_eq!(receipt.products.len(), 2);
    }

    #[test]
    fn products_share_parent_identifiers() {
        let receipt = normalize_document(&sample_document(), String::new(), utc());

        for product in &receipt.products {
            assert_eq!(product.fp, receipt.fp);
            assert_eq!(product.fd, receipt.fd);
            assert_eq!(product.r#fn, "9999078900012345");
            assert_eq!(product.time, receipt.date);
            assert_eq!(product.vat, 0);
            assert_eq!(product.vat_price, 0);
        }
    }

    #[test]
    fn product_values_are_copied_and_quantity_parsed() {
        let receipt = normalize_document(&sample_document(), String::new(), utc());

        let first = &receipt.products[0];
        assert_eq!(first.name, "Item A");
        assert_eq!(first.quantity, 2);
        assert_eq!(first.price, 100);
        assert_eq!(first.total_price, 200);

        // malformed quantity is coerced, not rejected
        assert_eq!(receipt.products[1].quantity, 0);
    }

    #[test]
    fn missing_quantity_is_zero() {
        let mut document = sample_document();
        document.items[0].quantity = None;
        let receipt = normalize_document(&document, String::new(), utc());
        assert_eq!(receipt.products[0].quantity, 0);
    }

    #[test]
    fn huge_tax_buckets_do_not_break_normalization() {
        let listing: DocumentListing = serde_json::from_str(
            r#"{"items":[{"fiscalSign":1,"nds10":9223372036854775807,"nds20":1,"items":[]}]}"#,
        )
        .unwrap();
        let receipt = normalize_document(&listing.documents[0], String::new(), utc());
        assert_eq!(receipt.fp, "1");
        assert_eq!(receipt.vat_price, 0);
    }

    #[test]
    fn document_without_items_has_no_products() {
        let document = Document {
            fiscal_sign: 1,
            ..Document::default()
        };
        let receipt = normalize_document(&document, String::new(), utc());
        assert!(receipt.products.is_empty());
        assert_eq!(receipt.fp, "1");
        assert_eq!(receipt.fd, "0");
    }
}
