use crate::leave::error::LeaveError;
use crate::model::role::Role;
use crate::model::user::User;

/// Which requests an actor is allowed to see.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    All,
    OwnedBy(u64),
}

pub fn can_apply(actor: &User) -> bool {
    actor.role == Role::Employee
}

pub fn can_decide(actor: &User) -> bool {
    actor.role == Role::Manager
}

pub fn visibility_scope(actor: &User) -> VisibilityScope {
    match actor.role {
        Role::Manager => VisibilityScope::All,
        Role::Employee => VisibilityScope::OwnedBy(actor.id),
    }
}

pub fn require_apply(actor: &User) -> Result<(), LeaveError> {
    if can_apply(actor) {
        Ok(())
    } else {
        Err(LeaveError::Forbidden("Only employees can apply for leave"))
    }
}

pub fn require_decide(actor: &User) -> Result<(), LeaveError> {
    if can_decide(actor) {
        Ok(())
    } else {
        Err(LeaveError::Forbidden("Only managers can approve or reject leave"))
    }
}
