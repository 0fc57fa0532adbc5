use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::lock::{Mutex, MutexGuard};

use super::{LeaveStore, LeaveTx, StoreError};
use crate::leave::policy::VisibilityScope;
use crate::model::leave_request::{LeaveListing, LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::model::user::{LeaveBalance, NewUser, User};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    users: BTreeMap<u64, User>,
    requests: BTreeMap<u64, LeaveRequest>,
    last_user_id: u64,
    last_request_id: u64,
}

impl MemoryState {
    fn insert_user(&mut self, new: &NewUser) -> u64 {
        self.last_user_id += 1;
        let id = self.last_user_id;
        let balance = LeaveBalance::default();
        self.users.insert(
            id,
            User {
                id,
                name: new.name.clone(),
                role: new.role,
                paid_leave: balance.paid_leave,
                unpaid_leave: balance.unpaid_leave,
            },
        );
        id
    }
}

/// Process-local store. A transaction holds the mutex for its whole
/// lifetime and works on a staged copy that replaces the state on commit.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeaveStore for MemoryStore {
    async fn get_user(&self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn get_request(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.state.lock().await.requests.get(&id).cloned())
    }

    async fn create_request(&self, new: &NewLeaveRequest) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        state.last_request_id += 1;
        let id = state.last_request_id;
        state.requests.insert(
            id,
            LeaveRequest {
                id,
                user_id: new.user_id,
                start_date: new.start_date,
                end_date: new.end_date,
                days: new.days,
                status: LeaveStatus::Pending,
            },
        );
        Ok(id)
    }

    async fn list_requests(
        &self,
        scope: VisibilityScope,
    ) -> Result<Vec<LeaveListing>, StoreError> {
        let state = self.state.lock().await;
        let listings = match scope {
            VisibilityScope::All => state
                .requests
                .values()
                // inner join, like the SQL backend
                .filter_map(|request| {
                    state.users.get(&request.user_id).map(|user| LeaveListing {
                        request: request.clone(),
                        requester_name: Some(user.name.clone()),
                    })
                })
                .collect(),
            VisibilityScope::OwnedBy(user_id) => state
                .requests
                .values()
                .filter(|request| request.user_id == user_id)
                .map(|request| LeaveListing {
                    request: request.clone(),
                    requester_name: None,
                })
                .collect(),
        };
        Ok(listings)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.state.lock().await.users.values().cloned().collect())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.state.lock().await.users.len() as u64)
    }

    async fn insert_user(&self, new: &NewUser) -> Result<u64, StoreError> {
        Ok(self.state.lock().await.insert_user(new))
    }

    async fn begin<'a>(&'a self) -> Result<Box<dyn LeaveTx + 'a>, StoreError> {
        let guard = self.state.lock().await;
        let staged = (*guard).clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }
}

struct MemoryTx<'a> {
    guard: MutexGuard<'a, MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl LeaveTx for MemoryTx<'_> {
    async fn lock_request(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        Ok(self.staged.requests.get(&id).cloned())
    }

    async fn lock_user(&mut self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(self.staged.users.get(&id).cloned())
    }

    async fn update_request_status(
        &mut self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError> {
        match self.staged.requests.get_mut(&id) {
            Some(request) if request.status == from => {
                request.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_user_balances(
        &mut self,
        id: u64,
        balance: LeaveBalance,
    ) -> Result<(), StoreError> {
        if let Some(user) = self.staged.users.get_mut(&id) {
            user.paid_leave = balance.paid_leave;
            user.unpaid_leave = balance.unpaid_leave;
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
