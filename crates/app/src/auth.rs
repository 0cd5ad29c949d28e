use dioxus::prelude::*;
use shared_types::{can_access, AuthUser, Role, Section};

/// The signed-in user, shared through context.
///
/// Pages read the role from here to decide which actions to offer; the
/// server enforces the same rules independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthState {
    pub current_user: Signal<Option<AuthUser>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            current_user: Signal::new(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.read().is_some()
    }

    pub fn set_user(&mut self, user: AuthUser) {
        self.current_user.set(Some(user));
    }

    pub fn clear_auth(&mut self) {
        self.current_user.set(None);
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user.read().as_ref().map(|u| u.role)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.current_user.read().as_ref().map(|u| u.id)
    }

    /// Whether the current user's sidebar includes `section`.
    pub fn can_see(&self, section: Section) -> bool {
        self.role().is_some_and(|role| can_access(role, section))
    }

    /// Whether the current user sits strictly above `target`.
    pub fn outranks(&self, target: Role) -> bool {
        self.role().is_some_and(|role| role.outranks(&target))
    }
}

pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}
