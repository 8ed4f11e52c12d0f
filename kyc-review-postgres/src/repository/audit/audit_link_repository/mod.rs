pub mod create;
pub mod find_by_audit_log_id;
pub mod repo_impl;

pub use create::insert_audit_links;
pub use repo_impl::AuditLinkRepositoryImpl;
