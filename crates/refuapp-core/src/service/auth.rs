use refuapp_api::{Body, FormPart, Request, Unreachable};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use super::Session;
use crate::error::CoreError;
use crate::model::Token;
use crate::normalize;
use crate::response::AuthenticationResponse;
use crate::store::TOKEN_KEY;

/// Scope requested on login; only administrators may edit refuges.
const ADMIN_SCOPE: &str = "admin";

/// Login and session token management.
#[derive(Clone)]
pub struct AuthService {
    session: Session,
}

impl AuthService {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// `POST /login/` with form fields `username`, `password` and
    /// `scope=admin`. The token is returned, not stored: call
    /// [`authenticate`](Self::authenticate) to keep it.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthenticationResponse, Unreachable> {
        debug!(username, "logging in");
        let form = vec![
            FormPart::text("username", username),
            FormPart::secret("password", password.clone()),
            FormPart::text("scope", ADMIN_SCOPE),
        ];

        let reply = self
            .session
            .send(Request::post(
                self.session.endpoints.login(),
                Body::Multipart(form),
            ))
            .await?;
        Ok(normalize::authentication(reply))
    }

    /// Store the token; subsequent requests carry it as a bearer token.
    pub fn authenticate(&self, token: &Token) -> Result<(), CoreError> {
        self.session
            .store
            .set(TOKEN_KEY, token.access_token.expose_secret())?;
        info!("session token stored");
        Ok(())
    }

    /// Forget the stored token, if any.
    pub fn deauthenticate(&self) -> Result<(), CoreError> {
        if self.is_authenticated()? {
            self.session.store.remove(TOKEN_KEY)?;
            info!("session token removed");
        }
        Ok(())
    }

    /// Whether a token is stored. Expiry is not checked: the server
    /// answers 401 once it lapses.
    pub fn is_authenticated(&self) -> Result<bool, CoreError> {
        Ok(self.session.store.get(TOKEN_KEY)?.is_some())
    }

    /// The stored token.
    pub fn bearer(&self) -> Option<SecretString> {
        self.session.bearer()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use refuapp_api::Body;
    use serde_json::json;

    use super::*;
    use crate::response::AuthenticationError;
    use crate::testing::{Script, fail, ok, session};

    fn password() -> SecretString {
        SecretString::from("hunter2".to_owned())
    }

    #[tokio::test]
    async fn login_sends_admin_scoped_form() {
        let script = Script::new(vec![ok(json!({"access_token": "t0k3n", "token_type": "bearer"}))]);
        let auth = AuthService::new(session(Arc::clone(&script)));

        let token = auth
            .login("warden", &password())
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(token.access_token.expose_secret(), "t0k3n");

        let request = &script.requests()[0];
        assert_eq!(request.url.path(), "/login/");
        let Body::Multipart(parts) = &request.body else {
            panic!("expected multipart body");
        };
        let names: Vec<&str> = parts.iter().map(FormPart::name).collect();
        assert_eq!(names, ["username", "password", "scope"]);
        // Password stays redacted in debug output.
        assert!(!format!("{parts:?}").contains("hunter2"));
    }

    #[tokio::test]
    async fn wrong_credentials_are_unauthorized() {
        let script = Script::new(vec![fail(401)]);
        let auth = AuthService::new(session(script));

        let response = auth.login("warden", &password()).await.unwrap();
        assert!(matches!(
            response,
            AuthenticationResponse::Error {
                error: AuthenticationError::Unauthorized
            }
        ));
    }

    #[test]
    fn token_lifecycle() {
        let auth = AuthService::new(session(Script::new(vec![fail(500)])));
        assert!(!auth.is_authenticated().unwrap());
        assert!(auth.bearer().is_none());

        auth.authenticate(&Token::new(SecretString::from("t0k3n".to_owned())))
            .unwrap();
        assert!(auth.is_authenticated().unwrap());
        assert_eq!(auth.bearer().unwrap().expose_secret(), "t0k3n");

        auth.deauthenticate().unwrap();
        assert!(!auth.is_authenticated().unwrap());
        // Logging out twice is harmless.
        auth.deauthenticate().unwrap();
    }
}
