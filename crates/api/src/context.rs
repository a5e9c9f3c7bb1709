use partstrack_auth::{Principal, Role, SessionPrincipal, SessionToken};

/// Authenticated session for a request.
///
/// Inserted by the auth middleware; every protected handler can rely on it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session: SessionPrincipal,
}

impl SessionContext {
    pub fn new(session: SessionPrincipal) -> Self {
        Self { session }
    }

    pub fn principal(&self) -> &Principal {
        &self.session.principal
    }

    pub fn role(&self) -> Role {
        self.session.role
    }

    pub fn is_admin(&self) -> bool {
        self.session.role.is_admin()
    }

    pub fn must_change_password(&self) -> bool {
        self.session.must_change_password
    }

    pub fn token(&self) -> &SessionToken {
        &self.session.token
    }

    pub fn session(&self) -> &SessionPrincipal {
        &self.session
    }
}
