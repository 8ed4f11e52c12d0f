#[cfg(test)]
pub mod test_utils {
    use kyc_review_api::{Declarations, KycDetails, KycSubject, NaturalPersonDetails, ServiceKind};
    use kyc_review_db::models::client::ClientModel;
    use kyc_review_db::models::kyc::KycModel;

    pub fn create_test_kyc(client: &ClientModel) -> KycModel {
        KycModel::new(
            client.id,
            client.agency_id,
            vec![ServiceKind::Accounting, ServiceKind::Payroll],
            KycDetails {
                subject: KycSubject::Natural(NaturalPersonDetails {
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    nationality: Some("GB".to_string()),
                    ..Default::default()
                }),
                declarations: Declarations {
                    confirms_truthfulness: true,
                    ..Default::default()
                },
            },
        )
    }
}
