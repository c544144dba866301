pub mod bulk_sync;
pub mod classifier;
pub mod fix_service;
pub mod issue_sync;
pub mod webhook_ingest;

pub use bulk_sync::{BulkSync, SyncError, SyncedIssue};
pub use classifier::classify;
pub use fix_service::{FixError, FixService};
pub use issue_sync::{IssueSync, RefreshSummary};
pub use webhook_ingest::{IngestError, WebhookAck, WebhookAuth, WebhookIngest};
