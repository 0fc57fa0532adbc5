use tracing::info;

use crate::model::role::Role;
use crate::model::user::NewUser;
use crate::store::{LeaveStore, StoreError};

/// Inserts the default employee and manager when no users exist yet.
/// Returns how many users were created.
pub async fn seed_default_users(store: &dyn LeaveStore) -> Result<usize, StoreError> {
    if store.count_users().await? > 0 {
        info!("Users already present, skipping seed");
        return Ok(0);
    }

    let seed = [
        NewUser::new("Employee One", Role::Employee),
        NewUser::new("Manager One", Role::Manager),
    ];
    for user in &seed {
        let id = store.insert_user(user).await?;
        info!(user_id = id, name = %user.name, role = %user.role, "Seeded user");
    }
    Ok(seed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[actix_web::test]
    async fn seeding_twice_is_a_no_op() {
        let store = MemoryStore::new();

        assert_eq!(seed_default_users(&store).await.unwrap(), 2);
        assert_eq!(seed_default_users(&store).await.unwrap(), 0);

        let users = store.list_users().await.unwrap();
        let roles: Vec<_> = users.iter().map(|u| u.role).collect();
        assert_eq!(roles, vec![Role::Employee, Role::Manager]);
    }
}
