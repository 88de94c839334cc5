//! Thread-safe in-process store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::{
    domain::{Account, AccountId, Department, DepartmentId, DepartmentName, EmailAddress, founder_of},
    ports::{
        AccountRepository, DepartmentRepository, DirectoryRepositoryError,
        DirectoryRepositoryResult,
    },
};
use crate::task::{
    domain::{Comment, Task, TaskId, TaskQuery, newest_first},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// In-memory implementation of every storage port.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    accounts: HashMap<AccountId, Account>,
    email_index: HashMap<EmailAddress, AccountId>,
    departments: HashMap<DepartmentId, Department>,
    department_names: HashMap<DepartmentName, DepartmentId>,
    tasks: HashMap<TaskId, Task>,
    comments: Vec<Comment>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, std::io::Error> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, std::io::Error> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn store_account(&self, account: &Account) -> DirectoryRepositoryResult<()> {
        let mut state = self.write().map_err(DirectoryRepositoryError::persistence)?;
        if state.accounts.contains_key(&account.id()) {
            return Err(DirectoryRepositoryError::DuplicateAccount(account.id()));
        }
        if state.email_index.contains_key(account.email()) {
            return Err(DirectoryRepositoryError::DuplicateEmail(
                account.email().clone(),
            ));
        }
        state
            .email_index
            .insert(account.email().clone(), account.id());
        state.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> DirectoryRepositoryResult<()> {
        let mut state = self.write().map_err(DirectoryRepositoryError::persistence)?;
        let previous_email = state
            .accounts
            .get(&account.id())
            .ok_or(DirectoryRepositoryError::AccountNotFound(account.id()))?
            .email()
            .clone();

        if &previous_email != account.email() {
            if state.email_index.contains_key(account.email()) {
                return Err(DirectoryRepositoryError::DuplicateEmail(
                    account.email().clone(),
                ));
            }
            state.email_index.remove(&previous_email);
            state
                .email_index
                .insert(account.email().clone(), account.id());
        }
        state.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn find_account(&self, id: AccountId) -> DirectoryRepositoryResult<Option<Account>> {
        let state = self.read().map_err(DirectoryRepositoryError::persistence)?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(
        &self,
        email: &EmailAddress,
    ) -> DirectoryRepositoryResult<Option<Account>> {
        let state = self.read().map_err(DirectoryRepositoryError::persistence)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn find_earliest_account(&self) -> DirectoryRepositoryResult<Option<Account>> {
        let state = self.read().map_err(DirectoryRepositoryError::persistence)?;
        Ok(founder_of(state.accounts.values()).cloned())
    }

    async fn list_accounts(&self) -> DirectoryRepositoryResult<Vec<Account>> {
        let state = self.read().map_err(DirectoryRepositoryError::persistence)?;
        let mut accounts: Vec<Account> = state.accounts.values().cloned().collect();
        accounts.sort_by_key(|account| (account.created_at(), account.id()));
        Ok(accounts)
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryStore {
    async fn store_department(&self, department: &Department) -> DirectoryRepositoryResult<()> {
        let mut state = self.write().map_err(DirectoryRepositoryError::persistence)?;
        if state.department_names.contains_key(department.name()) {
            return Err(DirectoryRepositoryError::DuplicateDepartmentName(
                department.name().clone(),
            ));
        }
        state
            .department_names
            .insert(department.name().clone(), department.id());
        state
            .departments
            .insert(department.id(), department.clone());
        Ok(())
    }

    async fn find_department(
        &self,
        id: DepartmentId,
    ) -> DirectoryRepositoryResult<Option<Department>> {
        let state = self.read().map_err(DirectoryRepositoryError::persistence)?;
        Ok(state.departments.get(&id).cloned())
    }

    async fn find_department_by_name(
        &self,
        name: &DepartmentName,
    ) -> DirectoryRepositoryResult<Option<Department>> {
        let state = self.read().map_err(DirectoryRepositoryError::persistence)?;
        Ok(state
            .department_names
            .get(name)
            .and_then(|id| state.departments.get(id))
            .cloned())
    }

    async fn list_departments(&self) -> DirectoryRepositoryResult<Vec<Department>> {
        let state = self.read().map_err(DirectoryRepositoryError::persistence)?;
        let mut departments: Vec<Department> = state.departments.values().cloned().collect();
        departments.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(departments)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn store_task(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn query_tasks(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        let mut matching: Vec<&Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .collect();
        matching.sort_by(|left, right| newest_first(left, right));

        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn store_comment(&self, comment: &Comment) -> TaskRepositoryResult<()> {
        let mut state = self.write().map_err(TaskRepositoryError::persistence)?;
        if !state.tasks.contains_key(&comment.task_id()) {
            return Err(TaskRepositoryError::NotFound(comment.task_id()));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn list_comments(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<Comment>> {
        let state = self.read().map_err(TaskRepositoryError::persistence)?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect();
        comments.sort_by_key(Comment::created_at);
        Ok(comments)
    }
}
