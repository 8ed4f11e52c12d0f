use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::client::ClientDocumentModel;
use crate::models::kyc::KycDocumentFileModel;

/// Split of a client's documents as seen from one KYC record.
///
/// - `linked`: documents with a link row for the record, signatures included
/// - `available`: non-signature documents that are not linked and not expired
///
/// Expired non-signature documents that are not linked appear in neither list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentAvailability {
    pub linked: Vec<ClientDocumentModel>,
    pub available: Vec<ClientDocumentModel>,
}

impl DocumentAvailability {
    /// Projects `documents` (one client's documents, in display order)
    /// against the record's `links` as of `today` (UTC).
    pub fn project(documents: Vec<ClientDocumentModel>, links: &[KycDocumentFileModel], today: NaiveDate) -> Self {
        let linked_ids: HashSet<Uuid> = links.iter().map(|link| link.document_id).collect();
        let mut projection = Self::default();
        for document in documents {
            if linked_ids.contains(&document.id) {
                projection.linked.push(document);
            } else if is_linkable(&document, today) {
                projection.available.push(document);
            }
        }
        projection
    }

    pub fn is_available(&self, document_id: Uuid) -> bool {
        self.available.iter().any(|document| document.id == document_id)
    }
}

/// Whether a document that is not yet linked may be linked on `today`.
pub fn is_linkable(document: &ClientDocumentModel, today: NaiveDate) -> bool {
    !document.is_signature && document.is_available_on(today)
}
