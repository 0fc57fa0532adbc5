use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::leave::balance;
use crate::leave::error::{Entity, LeaveError};
use crate::leave::lifecycle::{self, Decision};
use crate::leave::policy::{self, VisibilityScope};
use crate::model::leave_request::{LeaveStatus, NewLeaveRequest};
use crate::model::user::{LeaveBalance, User};
use crate::store::LeaveStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Leave application as submitted by an employee. Validated by
/// [`RequestService::apply`].
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = 3)]
    pub days: i64,
    #[schema(example = "2026-01-10", format = "date", value_type = String)]
    pub start_date: String,
    #[schema(example = "2026-01-12", format = "date", value_type = String)]
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approved { request_id: u64, balance: LeaveBalance },
    Rejected { request_id: u64 },
}

/// Row of the manager view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeamLeave {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Employee One")]
    pub name: String,
    #[schema(example = 3)]
    pub days: u32,
    pub status: LeaveStatus,
}

/// Row of the employee view. The actor is the owner, so no name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OwnLeave {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 3)]
    pub days: u32,
    pub status: LeaveStatus,
}

/// Managers get [`TeamLeave`] rows, employees [`OwnLeave`] rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum LeaveView {
    All(Vec<TeamLeave>),
    Own(Vec<OwnLeave>),
}

/// Runs the leave workflow against a [`LeaveStore`].
#[derive(Clone)]
pub struct RequestService {
    store: Arc<dyn LeaveStore>,
}

impl RequestService {
    pub fn new(store: Arc<dyn LeaveStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn LeaveStore {
        self.store.as_ref()
    }

    async fn load_actor(&self, actor_id: u64) -> Result<User, LeaveError> {
        self.store
            .get_user(actor_id)
            .await?
            .ok_or(LeaveError::NotFound(Entity::User, actor_id))
    }

    /// The actor's own record, balances included.
    pub async fn profile(&self, actor_id: u64) -> Result<User, LeaveError> {
        self.load_actor(actor_id).await
    }

    #[instrument(name = "leave_apply", skip(self, input), fields(days = input.days))]
    pub async fn apply(&self, actor_id: u64, input: &ApplyLeave) -> Result<u64, LeaveError> {
        let actor = self.load_actor(actor_id).await?;
        policy::require_apply(&actor)?;

        let new = validate_application(actor.id, input)?;
        let request_id = self.store.create_request(&new).await?;

        info!(request_id, "Leave request submitted");
        Ok(request_id)
    }

    /// Read-check-write of a single request inside one storage transaction.
    /// Any early return drops the transaction and rolls it back.
    #[instrument(name = "leave_decide", skip(self))]
    pub async fn decide(
        &self,
        actor_id: u64,
        request_id: u64,
        decision: Decision,
    ) -> Result<DecisionOutcome, LeaveError> {
        let actor = self.load_actor(actor_id).await?;
        policy::require_decide(&actor)?;

        let mut tx = self.store.begin().await?;
        let request = tx
            .lock_request(request_id)
            .await?
            .ok_or(LeaveError::NotFound(Entity::LeaveRequest, request_id))?;
        let next = lifecycle::resolve(&request, decision)?;

        let outcome = match decision {
            Decision::Approve => {
                let owner = tx
                    .lock_user(request.user_id)
                    .await?
                    .ok_or(LeaveError::NotFound(Entity::User, request.user_id))?;
                let updated = balance::deduct(owner.balance(), request.days).ok_or_else(|| {
                    LeaveError::InvalidInput(format!(
                        "unpaid leave of user {} cannot absorb {} more days",
                        owner.id, request.days
                    ))
                })?;
                tx.update_user_balances(owner.id, updated).await?;
                DecisionOutcome::Approved {
                    request_id,
                    balance: updated,
                }
            }
            Decision::Reject => DecisionOutcome::Rejected { request_id },
        };

        if !tx
            .update_request_status(request_id, request.status, next)
            .await?
        {
            return Err(LeaveError::AlreadyProcessed(request_id));
        }
        tx.commit().await?;

        info!(status = %next, "Leave request resolved");
        Ok(outcome)
    }

    pub async fn approve(
        &self,
        actor_id: u64,
        request_id: u64,
    ) -> Result<DecisionOutcome, LeaveError> {
        self.decide(actor_id, request_id, Decision::Approve).await
    }

    pub async fn reject(
        &self,
        actor_id: u64,
        request_id: u64,
    ) -> Result<DecisionOutcome, LeaveError> {
        self.decide(actor_id, request_id, Decision::Reject).await
    }

    #[instrument(name = "leave_view", skip(self))]
    pub async fn view(&self, actor_id: u64) -> Result<LeaveView, LeaveError> {
        let actor = self.load_actor(actor_id).await?;
        let scope = policy::visibility_scope(&actor);
        let listings = self.store.list_requests(scope).await?;

        let view = match scope {
            VisibilityScope::All => LeaveView::All(
                listings
                    .into_iter()
                    .map(|listing| TeamLeave {
                        id: listing.request.id,
                        name: listing.requester_name.unwrap_or_default(),
                        days: listing.request.days,
                        status: listing.request.status,
                    })
                    .collect(),
            ),
            VisibilityScope::OwnedBy(_) => LeaveView::Own(
                listings
                    .into_iter()
                    .map(|listing| OwnLeave {
                        id: listing.request.id,
                        days: listing.request.days,
                        status: listing.request.status,
                    })
                    .collect(),
            ),
        };
        Ok(view)
    }
}

fn validate_application(user_id: u64, input: &ApplyLeave) -> Result<NewLeaveRequest, LeaveError> {
    if input.days <= 0 {
        return Err(LeaveError::InvalidInput(
            "days must be a positive number".to_string(),
        ));
    }
    let days = u32::try_from(input.days)
        .map_err(|_| LeaveError::InvalidInput(format!("days out of range: {}", input.days)))?;

    let start_date = parse_date("start_date", &input.start_date)?;
    let end_date = parse_date("end_date", &input.end_date)?;
    if start_date > end_date {
        return Err(LeaveError::InvalidInput(
            "start_date cannot be after end_date".to_string(),
        ));
    }

    Ok(NewLeaveRequest {
        user_id,
        start_date,
        end_date,
        days,
    })
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, LeaveError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        LeaveError::InvalidInput(format!("{field} must be a YYYY-MM-DD date, got {value:?}"))
    })
}
