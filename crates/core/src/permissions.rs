//! Authorization policies and the per-endpoint capability table.
//!
//! Handlers never inspect roles directly. They look up the [`Capability`]
//! required for a `(Resource, Action)` pair and call [`authorize`] with the
//! current actor (and the object's author for authored content).

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated user making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: DbId,
    pub username: String,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Resources exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    /// `/users/me`, the actor's own record.
    Me,
    Categories,
    Genres,
    Titles,
    Reviews,
    Comments,
}

/// Controller actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    PartialUpdate,
    Destroy,
}

impl Action {
    /// Whether the action has no side effects.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

/// What an actor must satisfy to perform an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Anyone, including anonymous callers.
    Public,
    /// Any authenticated actor.
    Authenticated,
    /// Role admin or superuser.
    Admin,
    /// Safe actions for anyone; otherwise staff, superuser, admin, moderator
    /// or the object's author.
    AuthorOrElevated,
    /// Never allowed (405).
    Disallowed,
}

/// Look up the capability required for `action` on `resource`.
pub fn required_capability(resource: Resource, action: Action) -> Capability {
    use Action::*;
    use Capability::*;

    match (resource, action) {
        (Resource::Users, _) => Admin,

        (Resource::Me, Retrieve | PartialUpdate) => Authenticated,
        (Resource::Me, _) => Disallowed,

        (Resource::Categories | Resource::Genres, List | Retrieve) => Public,
        (Resource::Categories | Resource::Genres, Create | Destroy) => Admin,
        (Resource::Categories | Resource::Genres, PartialUpdate) => Disallowed,

        (Resource::Titles, List | Retrieve) => Public,
        (Resource::Titles, Create | PartialUpdate | Destroy) => Admin,

        (Resource::Reviews | Resource::Comments, List | Retrieve) => Public,
        (Resource::Reviews | Resource::Comments, Create) => Authenticated,
        (Resource::Reviews | Resource::Comments, PartialUpdate | Destroy) => AuthorOrElevated,
    }
}

/// Administrator check: authenticated and (role admin or superuser).
pub fn is_admin(actor: Option<&Actor>) -> bool {
    actor.is_some_and(|a| a.role == Role::Admin || a.is_superuser)
}

/// Author-or-elevated-role check for authored content.
///
/// Safe actions are always allowed, even for anonymous callers.
pub fn can_modify_authored(action: Action, actor: Option<&Actor>, author_id: DbId) -> bool {
    if action.is_safe() {
        return true;
    }
    actor.is_some_and(|a| {
        a.is_superuser
            || a.is_staff
            || matches!(a.role, Role::Admin | Role::Moderator)
            || a.id == author_id
    })
}

/// Enforce the capability table for one request.
///
/// `author_id` must be supplied for [`Capability::AuthorOrElevated`] checks
/// on an existing object; it is ignored otherwise.
///
/// Anonymous callers failing a check get [`CoreError::Unauthorized`];
/// authenticated ones get [`CoreError::Forbidden`].
pub fn authorize(
    resource: Resource,
    action: Action,
    actor: Option<&Actor>,
    author_id: Option<DbId>,
) -> Result<(), CoreError> {
    let allowed = match required_capability(resource, action) {
        Capability::Public => true,
        Capability::Authenticated => actor.is_some(),
        Capability::Admin => is_admin(actor),
        Capability::AuthorOrElevated => match author_id {
            Some(author_id) => can_modify_authored(action, actor, author_id),
            None => action.is_safe(),
        },
        Capability::Disallowed => {
            return Err(CoreError::MethodNotAllowed(format!(
                "{action:?} is not supported on {resource:?}"
            )))
        }
    };

    match (allowed, actor) {
        (true, _) => Ok(()),
        (false, None) => Err(CoreError::Unauthorized(
            "Authentication credentials were not provided".into(),
        )),
        (false, Some(_)) => Err(CoreError::Forbidden(
            "You do not have permission to perform this action".into(),
        )),
    }
}
