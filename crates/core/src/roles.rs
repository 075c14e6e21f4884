//! User roles and the capabilities attached to them.
//!
//! Role tags must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

use crate::macros::define_text_enum;

define_text_enum! {
    /// A user's role within the organisation.
    Role {
        Admin = "admin",
        CommercialManager = "commercial_manager",
        SupervisorManager = "supervisor_manager",
        Commercial = "commercial",
        Supervisor = "supervisor",
        Technician = "technician",
    }
}

impl Role {
    /// Whether users holding this role may delete board cards.
    ///
    /// This is the only place the authorized set is defined.
    pub fn can_delete_cards(self) -> bool {
        matches!(
            self,
            Role::Admin | Role::CommercialManager | Role::SupervisorManager
        )
    }
}
