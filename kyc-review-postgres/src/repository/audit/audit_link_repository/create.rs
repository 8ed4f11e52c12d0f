use kyc_review_db::models::audit::AuditEntityType;
use sqlx::PgConnection;
use uuid::Uuid;

/// Records that `entity_ids` were touched by the unit of work `audit_log_id`.
///
/// Called by the entity repositories on the connection they already hold,
/// so the audit trail commits or rolls back with the change itself.
pub async fn insert_audit_links(
    connection: &mut PgConnection,
    audit_log_id: Uuid,
    entity_type: AuditEntityType,
    entity_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    if entity_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO audit_link (audit_log_id, entity_id, entity_type)
        SELECT $1, entity_id, $3 FROM UNNEST($2::uuid[]) AS entity_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(audit_log_id)
    .bind(entity_ids)
    .bind(entity_type)
    .execute(connection)
    .await?;

    Ok(())
}
