//! Role-scoped task visibility.
//!
//! [`VisibilityScope::for_account`] maps an acting account to the predicate
//! that decides which tasks it may see. Storage adapters translate the scope
//! into a native filter; [`VisibilityScope::admits`] evaluates the same
//! predicate against a single loaded task. Filters in [`TaskFilter`] are
//! always conjoined with the scope, so they can only narrow the result.

use super::{Priority, Task, TaskStatus};
use crate::directory::domain::{Account, AccountId, DepartmentId, Role};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// The set of tasks an account may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Every task. Granted to admins.
    All,
    /// Tasks routed to `department_id`, plus tasks owned by `owner_id`.
    DepartmentOrOwner {
        /// Department whose tasks are visible.
        department_id: DepartmentId,
        /// The acting account.
        owner_id: AccountId,
    },
    /// Only tasks owned by the account. Managers without a department.
    Owner(AccountId),
    /// Tasks the account owns or executes. Employees.
    OwnerOrExecutor(AccountId),
}

impl VisibilityScope {
    /// Derives the scope from the acting account's role and department.
    #[must_use]
    pub const fn for_account(actor: &Account) -> Self {
        match (actor.role(), actor.department_id()) {
            (Role::Admin, _) => Self::All,
            (Role::Manager, Some(department_id)) => Self::DepartmentOrOwner {
                department_id,
                owner_id: actor.id(),
            },
            (Role::Manager, None) => Self::Owner(actor.id()),
            (Role::Employee, _) => Self::OwnerOrExecutor(actor.id()),
        }
    }

    /// Returns `true` when `task` falls inside this scope.
    #[must_use]
    pub fn admits(&self, task: &Task) -> bool {
        match *self {
            Self::All => true,
            Self::DepartmentOrOwner {
                department_id,
                owner_id,
            } => task.target_dept_id() == Some(department_id) || task.owner_id() == owner_id,
            Self::Owner(owner_id) => task.owner_id() == owner_id,
            Self::OwnerOrExecutor(account_id) => {
                task.owner_id() == account_id || task.executor_id() == Some(account_id)
            }
        }
    }
}

/// Optional narrowing constraints for task listings.
///
/// Deadline bounds are inclusive; tasks without a deadline never match a
/// bounded query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required status.
    pub status: Option<TaskStatus>,
    /// Required priority.
    pub priority: Option<Priority>,
    /// Earliest accepted deadline.
    pub deadline_from: Option<DateTime<Utc>>,
    /// Latest accepted deadline.
    pub deadline_until: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Creates a filter with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requires a priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Requires a deadline on or after `from`.
    #[must_use]
    pub const fn with_deadline_from(mut self, from: DateTime<Utc>) -> Self {
        self.deadline_from = Some(from);
        self
    }

    /// Requires a deadline on or before `until`.
    #[must_use]
    pub const fn with_deadline_until(mut self, until: DateTime<Utc>) -> Self {
        self.deadline_until = Some(until);
        self
    }

    /// Returns `true` when `task` satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = self.status.is_none_or(|status| task.status() == status);
        let priority_ok = self
            .priority
            .is_none_or(|priority| task.priority() == priority);
        let from_ok = self
            .deadline_from
            .is_none_or(|from| task.deadline().is_some_and(|deadline| deadline >= from));
        let until_ok = self
            .deadline_until
            .is_none_or(|until| task.deadline().is_some_and(|deadline| deadline <= until));
        status_ok && priority_ok && from_ok && until_ok
    }
}

/// Limit and offset applied after filtering and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u32,
}

impl Page {
    /// Creates a page window.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Returns the maximum number of rows.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns the number of rows skipped.
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }
}

/// A complete listing request handed to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    /// Role-derived visibility predicate.
    pub scope: VisibilityScope,
    /// Additional conjunctive filters.
    pub filter: TaskFilter,
    /// Result window.
    pub page: Page,
}

impl TaskQuery {
    /// Returns `true` when `task` belongs in the (unpaged) result.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.scope.admits(task) && self.filter.matches(task)
    }
}

/// Listing order: newest first, ties broken by descending identifier.
#[must_use]
pub fn newest_first(left: &Task, right: &Task) -> Ordering {
    right
        .created_at()
        .cmp(&left.created_at())
        .then_with(|| right.id().cmp(&left.id()))
}
