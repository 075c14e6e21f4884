//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Methods
//! that take part in multi-step operations accept any `PgExecutor`, so the
//! same call works against `&PgPool` or `&mut *tx` inside a transaction.

pub mod alert_repo;
pub mod card_repo;
pub mod column_repo;
pub mod form_repo;
pub mod funnel_repo;
pub mod polo_repo;
pub mod project_repo;
pub mod stage_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use card_repo::CardRepo;
pub use column_repo::ColumnRepo;
pub use form_repo::{FormAnswerRepo, FormResponseRepo, FormTemplateRepo};
pub use funnel_repo::{FunnelCardRepo, FunnelColumnRepo};
pub use polo_repo::PoloProjectRepo;
pub use project_repo::ProjectRepo;
pub use stage_repo::StageRepo;
pub use user_repo::UserRepo;
