//! services/catalogue/src/views/login.rs
//!
//! The login form. A successful sign-in stores the token in the session.

use async_trait::async_trait;
use catalogue_core::domain::{Credentials, FieldMap};
use catalogue_core::form::{missing_fields, FormAction, FormController};
use catalogue_core::navigation::Route;
use catalogue_core::ports::{CatalogueApi, PortResult};
use catalogue_core::session::SessionStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::views::state::AppState;

pub fn validate_login_fields(fields: &FieldMap) -> BTreeSet<String> {
    missing_fields(fields, &["email", "password"])
}

pub struct SignIn {
    api: Arc<dyn CatalogueApi>,
    session: Arc<SessionStore>,
}

#[async_trait]
impl FormAction for SignIn {
    fn validate(&self, fields: &FieldMap) -> BTreeSet<String> {
        validate_login_fields(fields)
    }

    async fn submit(&self, fields: &FieldMap) -> PortResult<Route> {
        let credentials = Credentials {
            email: fields.get("email").cloned().unwrap_or_default(),
            password: fields.get("password").cloned().unwrap_or_default(),
        };
        let token = self.api.sign_in(&credentials).await?;
        self.session.set(token);
        info!(email = %credentials.email, "Signed in");
        Ok(Route::Admin)
    }
}

/// `/login`
pub struct LoginView {
    form: FormController<SignIn>,
}

impl LoginView {
    pub fn new(app: Arc<AppState>) -> Self {
        let action = SignIn {
            api: app.api.clone(),
            session: app.session.clone(),
        };
        let fields = ["email", "password"]
            .iter()
            .map(|name| (name.to_string(), String::new()))
            .collect();
        Self {
            form: FormController::new(action, fields),
        }
    }

    pub fn form(&self) -> &FormController<SignIn> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController<SignIn> {
        &mut self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{app, FakeApi};
    use catalogue_core::form::SubmitOutcome;
    use catalogue_core::ports::PortError;

    #[tokio::test]
    async fn both_fields_required() {
        let api = FakeApi::default();
        let calls = api.calls.clone();
        let mut view = LoginView::new(app(api));

        let outcome = view.form_mut().submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Invalid(BTreeSet::from([
                "email".to_string(),
                "password".to_string()
            ]))
        );
        assert_eq!(calls.total(), 0);
    }

    #[tokio::test]
    async fn validation_is_idempotent() {
        let mut view = LoginView::new(app(FakeApi::default()));
        view.form_mut().set_field("email", "admin@example.com");
        let first = view.form().validate();
        assert_eq!(first, view.form().validate());
        assert_eq!(first, BTreeSet::from(["password".to_string()]));
    }

    #[tokio::test]
    async fn success_persists_token_and_goes_to_admin() {
        let api = FakeApi::default();
        let sent = api.last_credentials.clone();
        let state = app(api);
        let mut view = LoginView::new(state.clone());
        view.form_mut().set_field("email", "admin@example.com");
        view.form_mut().set_field("password", "password");

        assert_eq!(
            view.form_mut().submit().await,
            SubmitOutcome::Navigate(Route::Admin)
        );
        assert_eq!(state.session.get().as_deref(), Some("test-token"));
        assert_eq!(
            sent.lock().unwrap().as_ref().map(|c| c.email.as_str()),
            Some("admin@example.com")
        );
    }

    #[tokio::test]
    async fn rejection_leaves_session_untouched() {
        let mut api = FakeApi::default();
        api.sign_in_result = Err(PortError::Server {
            status: Some(400),
            message: "unauthorized: password is incorrect".to_string(),
        });
        let state = app(api);
        let mut view = LoginView::new(state.clone());
        view.form_mut().set_field("email", "admin@example.com");
        view.form_mut().set_field("password", "wrong");

        assert_eq!(
            view.form_mut().submit().await,
            SubmitOutcome::Rejected("unauthorized: password is incorrect".to_string())
        );
        assert_eq!(state.session.get(), None);
        assert!(view.form().state().notice.is_some());
    }
}
