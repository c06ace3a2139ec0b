mod password;

use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{error, warn};

use crate::db::Database;
use crate::models::{Advisor, AdvisorRole};

pub use password::{hash_password, verify_password};

/// Wall-clock bound on the startup session check so a stuck backend cannot
/// wedge the loading screen.
const SESSION_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("An account with this email already exists.")]
    EmailTaken,
    #[error("Access denied. Admin privileges required.")]
    NotAdmin,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// The signed-in auth identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i32,
    pub email: String,
}

/// Privilege level the caller resolved to. `None` routes to the
/// unauthenticated landing view, never to a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Advisor,
    None,
}

/// Lookup seam for role resolution. `Database` is the real directory; tests
/// substitute a stub.
pub trait AdvisorDirectory {
    async fn advisor_by_user_id(&self, user_id: i32) -> Result<Option<Advisor>>;
    async fn advisor_by_email(&self, email: &str) -> Result<Option<Advisor>>;
}

impl AdvisorDirectory for Database {
    async fn advisor_by_user_id(&self, user_id: i32) -> Result<Option<Advisor>> {
        self.get_advisor_by_user_id(user_id).await
    }

    async fn advisor_by_email(&self, email: &str) -> Result<Option<Advisor>> {
        self.get_advisor_by_email(email).await
    }
}

/// Find the advisor row for a session: by user id first, by email as the
/// fallback for rows provisioned before the auth account existed.
pub async fn resolve_advisor<D: AdvisorDirectory>(
    directory: &D,
    session: &Session,
) -> Result<Option<Advisor>> {
    if let Some(advisor) = directory.advisor_by_user_id(session.user_id).await? {
        return Ok(Some(advisor));
    }
    directory.advisor_by_email(&session.email).await
}

/// Classify the caller. Any lookup failure is logged and resolves to
/// `Role::None`.
pub async fn resolve_role<D: AdvisorDirectory>(directory: &D, session: &Session) -> Role {
    match resolve_advisor(directory, session).await {
        Ok(Some(advisor)) => match advisor.role {
            AdvisorRole::Admin => Role::Admin,
            AdvisorRole::Advisor => Role::Advisor,
        },
        Ok(None) => Role::None,
        Err(err) => {
            error!(error = %err, "role lookup failed");
            Role::None
        }
    }
}

/// Authentication against the backing credential store. Holds the current
/// session and broadcasts every change on a watch channel.
pub struct AuthService {
    db: Database,
    session: watch::Sender<Option<Session>>,
}

impl AuthService {
    pub fn new(db: Database) -> Self {
        let (session, _) = watch::channel(None);
        Self { db, session }
    }

    /// Receiver for auth-change notifications. Dropping it is the
    /// unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// The current session, revalidated against the credential store and
    /// bounded by a fixed 3-second timeout. A timeout or lookup failure
    /// reads as signed out.
    pub async fn current_session(&self) -> Option<Session> {
        match tokio::time::timeout(SESSION_CHECK_TIMEOUT, self.load_session()).await {
            Ok(Ok(session)) => session,
            Ok(Err(err)) => {
                error!(error = %err, "session check failed");
                None
            }
            Err(_) => {
                warn!("session check timed out");
                None
            }
        }
    }

    async fn load_session(&self) -> Result<Option<Session>> {
        let current = self.session.borrow().clone();
        let Some(session) = current else {
            return Ok(None);
        };
        let user = self.db.get_auth_user_by_email(&session.email).await?;
        Ok(user.map(|u| Session {
            user_id: u.id,
            email: u.email,
        }))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if self
            .db
            .get_auth_user_by_email(email)
            .await
            .map_err(AuthError::Backend)?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let hash = hash_password(password);
        let user = self
            .db
            .create_auth_user(email, &hash)
            .await
            .map_err(AuthError::Backend)?;

        let session = Session {
            user_id: user.id,
            email: user.email,
        };
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let user = self
            .db
            .get_auth_user_by_email(email)
            .await
            .map_err(AuthError::Backend)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            user_id: user.id,
            email: user.email,
        };

        self.ensure_advisor(&session)
            .await
            .map_err(AuthError::Backend)?;

        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Sign in and require admin privileges. A caller that authenticates
    /// but does not resolve to admin is signed out again.
    pub async fn admin_sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self.sign_in(email, password).await?;

        if resolve_role(&self.db, &session).await != Role::Admin {
            self.sign_out();
            return Err(AuthError::NotAdmin);
        }

        Ok(session)
    }

    pub fn sign_out(&self) {
        self.session.send_replace(None);
    }

    /// First-login provisioning: every authenticated caller gets an advisor
    /// row. An email-matched row left over from admin provisioning is
    /// linked instead of duplicated.
    async fn ensure_advisor(&self, session: &Session) -> Result<()> {
        if self
            .db
            .get_advisor_by_user_id(session.user_id)
            .await?
            .is_some()
        {
            return Ok(());
        }

        if let Some(advisor) = self.db.get_advisor_by_email(&session.email).await? {
            if advisor.user_id.is_none() {
                self.db.link_advisor_user(advisor.id, session.user_id).await?;
            }
            return Ok(());
        }

        let advisor = blank_advisor(session);
        self.db.create_advisor(&advisor).await?;
        Ok(())
    }

    /// Admin-driven user creation: an auth account plus an advisor row in
    /// one go. Does not touch the caller's own session.
    pub async fn create_advisor_account(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        role: AdvisorRole,
    ) -> Result<(), AuthError> {
        if self
            .db
            .get_auth_user_by_email(email)
            .await
            .map_err(AuthError::Backend)?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let hash = hash_password(password);
        let user = self
            .db
            .create_auth_user(email, &hash)
            .await
            .map_err(AuthError::Backend)?;

        let mut advisor = blank_advisor(&Session {
            user_id: user.id,
            email: user.email.clone(),
        });
        advisor.first_name = first_name.to_string();
        advisor.last_name = last_name.to_string();
        advisor.role = role;
        self.db
            .create_advisor(&advisor)
            .await
            .map_err(AuthError::Backend)?;

        Ok(())
    }

    /// Create (or promote) an admin account. This is the explicit seeded
    /// account path used by the `seed-admin` CLI command.
    pub async fn seed_admin(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        let user = match self.db.get_auth_user_by_email(email).await? {
            Some(user) => user,
            None => {
                let hash = hash_password(password);
                self.db.create_auth_user(email, &hash).await?
            }
        };

        match self.db.get_advisor_by_email(email).await? {
            Some(advisor) => {
                if advisor.user_id.is_none() {
                    self.db.link_advisor_user(advisor.id, user.id).await?;
                }
                self.db.set_advisor_role(advisor.id, AdvisorRole::Admin).await?;
            }
            None => {
                let mut advisor = blank_advisor(&Session {
                    user_id: user.id,
                    email: user.email.clone(),
                });
                advisor.first_name = first_name.to_string();
                advisor.last_name = last_name.to_string();
                advisor.role = AdvisorRole::Admin;
                self.db.create_advisor(&advisor).await?;
            }
        }

        Ok(())
    }
}

fn blank_advisor(session: &Session) -> Advisor {
    let now = chrono::Utc::now();
    Advisor {
        id: 0,
        user_id: Some(session.user_id),
        email: session.email.clone(),
        first_name: String::new(),
        last_name: String::new(),
        phone: String::new(),
        company_name: String::new(),
        role: AdvisorRole::Advisor,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// The resolved identity for the running UI. Built at app start and after
/// every sign-in, reset to `signed_out` on sign-out.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: Option<Session>,
    pub advisor: Option<Advisor>,
    pub role: Role,
}

impl SessionContext {
    pub fn signed_out() -> Self {
        Self {
            session: None,
            advisor: None,
            role: Role::None,
        }
    }

    /// Resolve the current session and role. Lookup failures land on
    /// `Role::None` rather than propagating.
    pub async fn resolve(auth: &AuthService, db: &Database) -> Self {
        let Some(session) = auth.current_session().await else {
            return Self::signed_out();
        };

        let advisor = match resolve_advisor(db, &session).await {
            Ok(advisor) => advisor,
            Err(err) => {
                error!(error = %err, "role lookup failed");
                None
            }
        };

        let role = match advisor.as_ref().map(|a| a.role) {
            Some(AdvisorRole::Admin) => Role::Admin,
            Some(AdvisorRole::Advisor) => Role::Advisor,
            None => Role::None,
        };

        Self {
            session: Some(session),
            advisor,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn advisor_id(&self) -> Option<i32> {
        self.advisor.as_ref().map(|a| a.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct StubDirectory {
        rows: Vec<Advisor>,
        fail: bool,
    }

    impl AdvisorDirectory for StubDirectory {
        async fn advisor_by_user_id(&self, user_id: i32) -> Result<Option<Advisor>> {
            if self.fail {
                anyhow::bail!("directory unavailable");
            }
            Ok(self
                .rows
                .iter()
                .find(|a| a.user_id == Some(user_id))
                .cloned())
        }

        async fn advisor_by_email(&self, email: &str) -> Result<Option<Advisor>> {
            if self.fail {
                anyhow::bail!("directory unavailable");
            }
            Ok(self.rows.iter().find(|a| a.email == email).cloned())
        }
    }

    fn advisor(user_id: Option<i32>, email: &str, role: AdvisorRole) -> Advisor {
        let now = Utc::now();
        Advisor {
            id: 7,
            user_id,
            email: email.to_string(),
            first_name: "Pat".to_string(),
            last_name: "Reed".to_string(),
            phone: String::new(),
            company_name: String::new(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn session() -> Session {
        Session {
            user_id: 42,
            email: "pat@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn admin_row_resolves_to_admin() {
        let dir = StubDirectory {
            rows: vec![advisor(Some(42), "pat@example.com", AdvisorRole::Admin)],
            fail: false,
        };
        assert_eq!(resolve_role(&dir, &session()).await, Role::Admin);
    }

    #[tokio::test]
    async fn missing_row_resolves_to_none() {
        let dir = StubDirectory {
            rows: vec![],
            fail: false,
        };
        assert_eq!(resolve_role(&dir, &session()).await, Role::None);
    }

    #[tokio::test]
    async fn email_fallback_resolves_when_user_id_does_not_match() {
        let dir = StubDirectory {
            rows: vec![advisor(None, "pat@example.com", AdvisorRole::Advisor)],
            fail: false,
        };
        assert_eq!(resolve_role(&dir, &session()).await, Role::Advisor);
    }

    #[tokio::test]
    async fn lookup_failure_fails_open_to_none() {
        let dir = StubDirectory {
            rows: vec![advisor(Some(42), "pat@example.com", AdvisorRole::Admin)],
            fail: true,
        };
        assert_eq!(resolve_role(&dir, &session()).await, Role::None);
    }
}
