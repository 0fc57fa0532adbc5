//! Storage boundary used by the request service.
//!
//! Backends hand out typed entities only. Every multi-step mutation goes
//! through a [`LeaveTx`], which either commits all of its writes or none.

use async_trait::async_trait;
use thiserror::Error;

use crate::leave::policy::VisibilityScope;
use crate::model::leave_request::{LeaveListing, LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::model::user::{LeaveBalance, NewUser, User};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt {table} row {id}: {reason}")]
    CorruptRow {
        table: &'static str,
        id: u64,
        reason: String,
    },
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn get_user(&self, id: u64) -> Result<Option<User>, StoreError>;

    async fn get_request(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;

    /// Inserts a new request in `PENDING` and returns its id.
    async fn create_request(&self, new: &NewLeaveRequest) -> Result<u64, StoreError>;

    /// Requests ordered by id. Listings carry the requester name only for
    /// [`VisibilityScope::All`].
    async fn list_requests(&self, scope: VisibilityScope)
    -> Result<Vec<LeaveListing>, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn count_users(&self) -> Result<u64, StoreError>;

    async fn insert_user(&self, new: &NewUser) -> Result<u64, StoreError>;

    async fn begin<'a>(&'a self) -> Result<Box<dyn LeaveTx + 'a>, StoreError>;
}

/// A unit of work. Rows read through `lock_*` stay locked until the
/// transaction commits or is dropped; dropping discards every write.
#[async_trait]
pub trait LeaveTx: Send {
    async fn lock_request(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError>;

    async fn lock_user(&mut self, id: u64) -> Result<Option<User>, StoreError>;

    /// Compare-and-swap on the status column. Returns `false` when the
    /// request is missing or no longer in `from`.
    async fn update_request_status(
        &mut self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError>;

    async fn update_user_balances(
        &mut self,
        id: u64,
        balance: LeaveBalance,
    ) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
