use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

pub const DEFAULT_PAID_LEAVE: u32 = 30;
pub const DEFAULT_UNPAID_LEAVE: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Employee One")]
    pub name: String,
    pub role: Role,
    #[schema(example = 30)]
    pub paid_leave: u32,
    #[schema(example = 0)]
    pub unpaid_leave: u32,
}

impl User {
    pub fn balance(&self) -> LeaveBalance {
        LeaveBalance {
            paid_leave: self.paid_leave,
            unpaid_leave: self.unpaid_leave,
        }
    }
}

/// Paid and unpaid leave day counters of a single user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaveBalance {
    #[schema(example = 20)]
    pub paid_leave: u32,
    #[schema(example = 0)]
    pub unpaid_leave: u32,
}

impl Default for LeaveBalance {
    fn default() -> Self {
        Self {
            paid_leave: DEFAULT_PAID_LEAVE,
            unpaid_leave: DEFAULT_UNPAID_LEAVE,
        }
    }
}

/// A user that has not been stored yet. Starts with the default balance.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}
