//! Account builders shared by directory tests.

use crate::directory::domain::{
    Account, DepartmentId, EmailAddress, FullName, NewAccount, PasswordHash, Role,
};
use mockable::Clock;

/// Builds an account with the given role without touching any store.
pub fn account(email: &str, role: Role, clock: &impl Clock) -> Account {
    account_in(email, role, None, clock)
}

/// Builds an account with a role and optional department.
pub fn account_in(
    email: &str,
    role: Role,
    department_id: Option<DepartmentId>,
    clock: &impl Clock,
) -> Account {
    let fields = NewAccount {
        email: EmailAddress::new(email).expect("valid test email"),
        password_hash: PasswordHash::new("sha256$00$00"),
        full_name: FullName::new("Test Account").expect("valid test name"),
        department_id,
    };
    Account::register(fields, role, clock)
}
