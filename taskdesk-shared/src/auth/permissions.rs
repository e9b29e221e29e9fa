/// Authorization rules for TaskDesk operations
///
/// This module is the single home of the permission rule table. Every
/// mutating handler funnels through one of the two checks below instead of
/// re-implementing ownership comparisons inline.
///
/// # Rule table
///
/// | Action | Rule |
/// |---|---|
/// | create_task | any authenticated actor (actor becomes creator) |
/// | complete_task / cancel_task / wait_for_user | actor is creator or assignee |
/// | create_user / generate_token for another user | actor is admin |
/// | list_created_tasks for another user | actor is admin |
///
/// The checks are pure: they see only the actor and the ownership columns
/// of the target row, never the store. Denial is always distinguishable
/// from "not found" because existence is checked before permission.
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::permissions::{require_task_party, Actor};
/// use uuid::Uuid;
///
/// let creator = Uuid::new_v4();
/// let assignee = Uuid::new_v4();
/// let actor = Actor { id: assignee, is_admin: false };
///
/// assert!(require_task_party(&actor, creator, assignee).is_ok());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller of an operation
///
/// Built from validated credential claims; handlers never construct one
/// from caller-supplied input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Subject user id from the credential
    pub id: Uuid,

    /// Role flag from the credential
    pub is_admin: bool,
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    /// Actor is neither the creator nor the assignee of the task
    #[error("permission denied: you can only modify tasks you created or are assigned to")]
    NotTaskParty,

    /// Action is reserved for admins
    #[error("permission denied: {0}")]
    AdminRequired(&'static str),
}

/// Requires the actor to be a party to the task (creator or assignee)
///
/// Admins get no special treatment here: lifecycle transitions belong to
/// the task's parties only.
///
/// # Errors
///
/// Returns `PermissionError::NotTaskParty` otherwise.
pub fn require_task_party(
    actor: &Actor,
    created_by: Uuid,
    assigned_to: Uuid,
) -> Result<(), PermissionError> {
    if actor.id == created_by || actor.id == assigned_to {
        Ok(())
    } else {
        Err(PermissionError::NotTaskParty)
    }
}

/// Requires the actor to carry the admin role flag
///
/// # Arguments
///
/// * `action` - short description used in the denial message
///
/// # Errors
///
/// Returns `PermissionError::AdminRequired` for non-admin actors.
pub fn require_admin(actor: &Actor, action: &'static str) -> Result<(), PermissionError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(PermissionError::AdminRequired(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: Uuid, is_admin: bool) -> Actor {
        Actor { id, is_admin }
    }

    #[test]
    fn test_creator_is_task_party() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();

        let result = require_task_party(&actor(creator, false), creator, assignee);
        assert!(result.is_ok());
    }

    #[test]
    fn test_assignee_is_task_party() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();

        let result = require_task_party(&actor(assignee, false), creator, assignee);
        assert!(result.is_ok());
    }

    #[test]
    fn test_unrelated_actor_denied() {
        let result = require_task_party(&actor(Uuid::new_v4(), false), Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(result, Err(PermissionError::NotTaskParty)));
    }

    #[test]
    fn test_admin_is_not_a_task_party() {
        // Admin role grants no lifecycle rights on other people's tasks
        let result = require_task_party(&actor(Uuid::new_v4(), true), Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(result, Err(PermissionError::NotTaskParty)));
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&actor(Uuid::new_v4(), true), "create users").is_ok());

        let result = require_admin(&actor(Uuid::new_v4(), false), "create users");
        assert!(matches!(result, Err(PermissionError::AdminRequired(_))));
    }
}
