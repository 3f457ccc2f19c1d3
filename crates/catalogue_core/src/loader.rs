//! crates/catalogue_core/src/loader.rs
//!
//! The fetch/loading/error state machine every data-driven view runs.
//!
//! A view calls [`DataLoader::load`] when it is mounted and again whenever the
//! parameters it tracks change (route id, search term). Only the most recently
//! issued request may commit its result; anything that resolves after it has been
//! superseded is dropped.

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::navigation::Route;
use crate::ports::PortResult;
use crate::session::SessionStore;

/// The loading state owned by one view instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// What a call to [`DataLoader::load`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The request finished and its result is now the view state.
    Committed,
    /// The parameters match a request already issued, nothing was fetched.
    Unchanged,
    /// A newer request was issued while this one was in flight; its result was dropped.
    Superseded,
    /// The view needs a session and there is none. Nothing was fetched.
    Redirect(Route),
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

struct LoaderInner<P, T> {
    params: Option<P>,
    generation: u64,
    state: ViewState<T>,
}

/// Cheaply cloneable handle; clones drive the same state.
pub struct DataLoader<P, T> {
    inner: Arc<Mutex<LoaderInner<P, T>>>,
    session: Arc<SessionStore>,
    requires_auth: bool,
}

impl<P, T> Clone for DataLoader<P, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            session: Arc::clone(&self.session),
            requires_auth: self.requires_auth,
        }
    }
}

impl<P, T> DataLoader<P, T>
where
    P: Clone + PartialEq + Debug + Send,
    T: Clone + Send,
{
    /// A loader for a public view.
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LoaderInner {
                params: None,
                generation: 0,
                state: ViewState::Idle,
            })),
            session,
            requires_auth: false,
        }
    }

    /// A loader that redirects to login instead of fetching when there is no session.
    pub fn protected(session: Arc<SessionStore>) -> Self {
        Self {
            requires_auth: true,
            ..Self::new(session)
        }
    }

    pub async fn state(&self) -> ViewState<T> {
        self.inner.lock().await.state.clone()
    }

    pub async fn params(&self) -> Option<P> {
        self.inner.lock().await.params.clone()
    }

    /// Runs the loader for `params`.
    ///
    /// `fetch` is called at most once, and only when the parameters differ from the
    /// ones of the last issued request.
    pub async fn load<F, Fut>(&self, params: P, fetch: F) -> LoadOutcome
    where
        F: FnOnce(P) -> Fut,
        Fut: Future<Output = PortResult<T>>,
    {
        if self.requires_auth && self.session.get().is_none() {
            debug!(?params, "No session, redirecting to login");
            return LoadOutcome::Redirect(Route::Login);
        }

        let ticket = {
            let mut inner = self.inner.lock().await;
            if inner.params.as_ref() == Some(&params)
                && !matches!(inner.state, ViewState::Idle)
            {
                return LoadOutcome::Unchanged;
            }
            Self::issue(&mut inner, params.clone())
        };

        let result = fetch(params).await;
        self.commit(ticket, result).await
    }

    /// Moves to `Loading` for `params` and returns the ticket of the new request.
    /// Any request issued before this one can no longer commit.
    pub async fn begin(&self, params: P) -> Ticket {
        let mut inner = self.inner.lock().await;
        Self::issue(&mut inner, params)
    }

    /// Applies the result of the request identified by `ticket`, unless a newer
    /// request has been issued since.
    pub async fn commit(&self, ticket: Ticket, result: PortResult<T>) -> LoadOutcome {
        let mut inner = self.inner.lock().await;
        if ticket.generation != inner.generation {
            debug!(
                stale = ticket.generation,
                current = inner.generation,
                "Discarding superseded response"
            );
            return LoadOutcome::Superseded;
        }
        inner.state = match result {
            Ok(data) => ViewState::Loaded(data),
            Err(e) => {
                warn!(params = ?inner.params, "Load failed: {}", e);
                ViewState::Failed(e.to_string())
            }
        };
        LoadOutcome::Committed
    }

    fn issue(inner: &mut LoaderInner<P, T>, params: P) -> Ticket {
        inner.generation += 1;
        inner.params = Some(params);
        inner.state = ViewState::Loading;
        Ticket {
            generation: inner.generation,
        }
    }
}
