use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySql, MySqlPool, Transaction};

use super::{LeaveStore, LeaveTx, StoreError};
use crate::leave::policy::VisibilityScope;
use crate::model::leave_request::{LeaveListing, LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::model::role::Role;
use crate::model::user::{LeaveBalance, NewUser, User};

#[derive(FromRow)]
struct UserRow {
    id: u64, // 👈 matches BIGINT UNSIGNED
    name: String,
    role: String,
    paid_leave: u32,
    unpaid_leave: u32,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role).map_err(|_| StoreError::CorruptRow {
            table: "users",
            id: row.id,
            reason: format!("unknown role {:?}", row.role),
        })?;
        Ok(User {
            id: row.id,
            name: row.name,
            role,
            paid_leave: row.paid_leave,
            unpaid_leave: row.unpaid_leave,
        })
    }
}

#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    user_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    days: u32,
    status: String,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StoreError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = LeaveStatus::from_str(&row.status).map_err(|_| StoreError::CorruptRow {
            table: "leave_requests",
            id: row.id,
            reason: format!("unknown status {:?}", row.status),
        })?;
        Ok(LeaveRequest {
            id: row.id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            days: row.days,
            status,
        })
    }
}

#[derive(FromRow)]
struct NamedLeaveRow {
    #[sqlx(flatten)]
    leave: LeaveRow,
    name: String,
}

/// Leave storage backed by MySQL through a shared sqlx pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveStore for MySqlStore {
    async fn get_user(&self, id: u64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, name, role, paid_leave, unpaid_leave FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn get_request(&self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, user_id, start_date, end_date, days, status
            FROM leave_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(LeaveRequest::try_from)
        .transpose()
    }

    async fn create_request(&self, new: &NewLeaveRequest) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests (user_id, start_date, end_date, days, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.user_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.days)
        .bind(LeaveStatus::Pending.as_ref())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn list_requests(
        &self,
        scope: VisibilityScope,
    ) -> Result<Vec<LeaveListing>, StoreError> {
        match scope {
            VisibilityScope::All => {
                let rows = sqlx::query_as::<_, NamedLeaveRow>(
                    r#"
                    SELECT lr.id, lr.user_id, lr.start_date, lr.end_date, lr.days, lr.status, u.name
                    FROM leave_requests lr
                    JOIN users u ON lr.user_id = u.id
                    ORDER BY lr.id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(LeaveListing {
                            request: LeaveRequest::try_from(row.leave)?,
                            requester_name: Some(row.name),
                        })
                    })
                    .collect()
            }
            VisibilityScope::OwnedBy(user_id) => {
                let rows = sqlx::query_as::<_, LeaveRow>(
                    r#"
                    SELECT id, user_id, start_date, end_date, days, status
                    FROM leave_requests
                    WHERE user_id = ?
                    ORDER BY id
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

                rows.into_iter()
                    .map(|row| {
                        Ok(LeaveListing {
                            request: LeaveRequest::try_from(row)?,
                            requester_name: None,
                        })
                    })
                    .collect()
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, name, role, paid_leave, unpaid_leave FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert_user(&self, new: &NewUser) -> Result<u64, StoreError> {
        let balance = LeaveBalance::default();
        let result = sqlx::query(
            "INSERT INTO users (name, role, paid_leave, unpaid_leave) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(new.role.as_ref())
        .bind(balance.paid_leave)
        .bind(balance.unpaid_leave)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn begin<'a>(&'a self) -> Result<Box<dyn LeaveTx + 'a>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlTx { tx }))
    }
}

/// Uncommitted sqlx transactions roll back on drop.
struct MySqlTx {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl LeaveTx for MySqlTx {
    async fn lock_request(&mut self, id: u64) -> Result<Option<LeaveRequest>, StoreError> {
        sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, user_id, start_date, end_date, days, status
            FROM leave_requests
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?
        .map(LeaveRequest::try_from)
        .transpose()
    }

    async fn lock_user(&mut self, id: u64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, name, role, paid_leave, unpaid_leave FROM users WHERE id = ? FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn update_request_status(
        &mut self,
        id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(to.as_ref())
        .bind(id)
        .bind(from.as_ref())
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_user_balances(
        &mut self,
        id: u64,
        balance: LeaveBalance,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET paid_leave = ?, unpaid_leave = ? WHERE id = ?")
            .bind(balance.paid_leave)
            .bind(balance.unpaid_leave)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
