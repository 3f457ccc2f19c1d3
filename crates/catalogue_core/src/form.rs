//! crates/catalogue_core/src/form.rs
//!
//! Controlled-input state, validation and submission for the catalogue's forms.

use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::domain::FieldMap;
use crate::navigation::Route;
use crate::ports::{PortError, PortResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message shown above the form after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub fields: FieldMap,
    pub validation_errors: BTreeSet<String>,
    pub notice: Option<Notice>,
}

/// What a form does with its fields.
#[async_trait]
pub trait FormAction: Send + Sync {
    /// Names of the fields that are currently invalid. Must not have side effects.
    fn validate(&self, fields: &FieldMap) -> BTreeSet<String>;

    /// Sends the fields and returns where to go next.
    async fn submit(&self, fields: &FieldMap) -> PortResult<Route>;

    /// Whether the record behind these fields can be deleted.
    fn can_delete(&self, _fields: &FieldMap) -> bool {
        false
    }

    async fn delete(&self, _fields: &FieldMap) -> PortResult<Route> {
        Err(PortError::Unexpected("this form has nothing to delete".to_string()))
    }
}

/// A yes/no confirmation asked before destructive actions.
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid(BTreeSet<String>),
    /// The server accepted the submission.
    Navigate(Route),
    /// The request failed; the message is now the form's notice.
    Rejected(String),
    /// The user declined the confirmation, or there was nothing to do.
    Cancelled,
}

pub struct FormController<A> {
    action: A,
    state: FormState,
}

impl<A: FormAction> FormController<A> {
    pub fn new(action: A, fields: FieldMap) -> Self {
        Self {
            action,
            state: FormState {
                fields,
                ..FormState::default()
            },
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn field(&self, name: &str) -> &str {
        self.state.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Updates one field, dismissing any notice left by the previous submission.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.state.notice = None;
        self.state.fields.insert(name.into(), value.into());
    }

    pub fn validate(&self) -> BTreeSet<String> {
        self.action.validate(&self.state.fields)
    }

    /// Whether `name` failed validation on the last submit attempt.
    pub fn has_error(&self, name: &str) -> bool {
        self.state.validation_errors.contains(name)
    }

    pub fn can_delete(&self) -> bool {
        self.action.can_delete(&self.state.fields)
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.state.notice = None;
        let errors = self.validate();
        self.state.validation_errors = errors.clone();
        if !errors.is_empty() {
            debug!(?errors, "Form validation failed");
            return SubmitOutcome::Invalid(errors);
        }

        let result = self.action.submit(&self.state.fields).await;
        self.settle(result)
    }

    /// Asks for confirmation, then deletes the record behind the form.
    pub async fn confirm_delete(&mut self, prompt: &dyn Prompt) -> SubmitOutcome {
        if !self.can_delete() {
            return SubmitOutcome::Cancelled;
        }
        if !prompt.confirm("Delete movie", "Are you sure?").await {
            return SubmitOutcome::Cancelled;
        }
        let result = self.action.delete(&self.state.fields).await;
        self.settle(result)
    }

    fn settle(&mut self, result: PortResult<Route>) -> SubmitOutcome {
        match result {
            Ok(route) => {
                info!(%route, "Form submitted");
                self.state.validation_errors.clear();
                self.state.notice = None;
                SubmitOutcome::Navigate(route)
            }
            Err(e) => {
                let message = e.to_string();
                self.state.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    message: message.clone(),
                });
                SubmitOutcome::Rejected(message)
            }
        }
    }
}

/// Names of the `required` fields that are missing or empty in `fields`.
pub fn missing_fields(fields: &FieldMap, required: &[&str]) -> BTreeSet<String> {
    required
        .iter()
        .filter(|name| fields.get(**name).map_or(true, |v| v.is_empty()))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct RecordingAction {
        calls: Arc<AtomicUsize>,
        reply: PortResult<Route>,
    }

    #[async_trait]
    impl FormAction for RecordingAction {
        fn validate(&self, fields: &FieldMap) -> BTreeSet<String> {
            missing_fields(fields, &["name"])
        }

        async fn submit(&self, _fields: &FieldMap) -> PortResult<Route> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }

        fn can_delete(&self, fields: &FieldMap) -> bool {
            fields.contains_key("id")
        }

        async fn delete(&self, _fields: &FieldMap) -> PortResult<Route> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    struct Answer(bool);

    #[async_trait]
    impl Prompt for Answer {
        async fn confirm(&self, _title: &str, _message: &str) -> bool {
            self.0
        }
    }

    fn controller(reply: PortResult<Route>) -> (FormController<RecordingAction>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let action = RecordingAction {
            calls: calls.clone(),
            reply,
        };
        (FormController::new(action, FieldMap::new()), calls)
    }

    #[tokio::test]
    async fn invalid_submit_stays_local() {
        let (mut form, calls) = controller(Ok(Route::Admin));
        let outcome = form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Invalid(BTreeSet::from(["name".to_string()])));
        assert!(form.has_error("name"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn errors_are_recomputed_on_each_attempt() {
        let (mut form, _) = controller(Ok(Route::Admin));
        form.submit().await;
        form.set_field("name", "Heat");
        // Still marked until the next attempt.
        assert!(form.has_error("name"));
        assert_eq!(form.submit().await, SubmitOutcome::Navigate(Route::Admin));
        assert!(!form.has_error("name"));
    }

    #[tokio::test]
    async fn validate_is_idempotent() {
        let (form, _) = controller(Ok(Route::Admin));
        assert_eq!(form.validate(), form.validate());
        assert!(form.state().validation_errors.is_empty());
    }

    #[tokio::test]
    async fn rejection_sets_notice_and_editing_clears_it() {
        let (mut form, _) = controller(Err(PortError::Server {
            status: Some(400),
            message: "title already taken".to_string(),
        }));
        form.set_field("name", "Heat");

        assert_eq!(
            form.submit().await,
            SubmitOutcome::Rejected("title already taken".to_string())
        );
        assert_eq!(
            form.state().notice,
            Some(Notice {
                kind: NoticeKind::Error,
                message: "title already taken".to_string()
            })
        );

        form.set_field("name", "Heat 2");
        assert_eq!(form.state().notice, None);
    }

    #[tokio::test]
    async fn declined_delete_is_a_no_op() {
        let (mut form, calls) = controller(Ok(Route::Admin));
        form.set_field("id", "3");
        assert_eq!(form.confirm_delete(&Answer(false)).await, SubmitOutcome::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(
            form.confirm_delete(&Answer(true)).await,
            SubmitOutcome::Navigate(Route::Admin)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn nothing_to_delete_never_prompts() {
        let (mut form, calls) = controller(Ok(Route::Admin));
        assert_eq!(form.confirm_delete(&Answer(true)).await, SubmitOutcome::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
