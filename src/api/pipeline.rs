//! Request pipeline: composable stages applied around every domain call.
//!
//! Outbound stages transform a request before it is sent; inbound stages
//! observe the status of every response. Authorization lives entirely here,
//! so no individual call site reads session state or handles expiry:
//! `BearerAuth` attaches the current token, and `AuthFailureWatch` forces
//! logout plus navigation to the login view when any response comes back
//! 401.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use tracing::warn;

use crate::auth::SessionHandle;

/// Moves the user's view. Supplied by the embedding application; the
/// pipeline calls `to_login` after a forced logout.
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// Navigator that goes nowhere, for headless embedders and tests.
pub struct NoNavigation;

impl Navigator for NoNavigation {
    fn to_login(&self) {}
}

/// Transforms a request before it leaves the application.
pub trait OutboundStage: Send + Sync {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Observes the status of a response after it arrives.
pub trait InboundStage: Send + Sync {
    fn observe(&self, status: StatusCode);
}

/// Ordered chain of outbound and inbound stages.
#[derive(Clone, Default)]
pub struct Pipeline {
    outbound: Vec<Arc<dyn OutboundStage>>,
    inbound: Vec<Arc<dyn InboundStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outbound(mut self, stage: impl OutboundStage + 'static) -> Self {
        self.outbound.push(Arc::new(stage));
        self
    }

    pub fn with_inbound(mut self, stage: impl InboundStage + 'static) -> Self {
        self.inbound.push(Arc::new(stage));
        self
    }

    pub(crate) fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        self.outbound
            .iter()
            .fold(request, |req, stage| stage.apply(req))
    }

    pub(crate) fn observe(&self, status: StatusCode) {
        for stage in &self.inbound {
            stage.observe(status);
        }
    }
}

/// Attaches the current bearer token to outbound requests. Requests without
/// a session go out unmodified; enforcement is the service's job.
pub struct BearerAuth {
    session: SessionHandle,
}

impl BearerAuth {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }
}

impl OutboundStage for BearerAuth {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Forces logout and navigation to login when any response reports the
/// token is no longer accepted. All other statuses pass through untouched.
pub struct AuthFailureWatch {
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

impl AuthFailureWatch {
    pub fn new(session: SessionHandle, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl InboundStage for AuthFailureWatch {
    fn observe(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            warn!("Received 401; forcing logout");
            self.session.force_logout();
            self.navigator.to_login();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::auth::{Session, SessionEvent, SessionStore};
    use crate::models::User;
    use crate::storage::MemoryStorage;

    struct RecordingNavigator {
        hits: AtomicUsize,
    }

    impl RecordingNavigator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                hits: AtomicUsize::new(0),
            })
        }
    }

    impl Navigator for RecordingNavigator {
        fn to_login(&self) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn handle() -> SessionHandle {
        SessionHandle::new(SessionStore::new(Box::new(MemoryStorage::new())))
    }

    fn authed_handle() -> SessionHandle {
        let handle = handle();
        handle.apply(SessionEvent::Succeeded(Session::new(
            "T1".to_string(),
            User {
                user_id: 1,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                first_name: None,
                last_name: None,
            },
        )));
        handle
    }

    fn header_of(request: RequestBuilder) -> Option<String> {
        let built = request.build().expect("Failed to build request");
        built
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .map(|v| v.to_str().expect("Header is not UTF-8").to_string())
    }

    #[test]
    fn test_bearer_auth_attaches_token_when_authenticated() {
        let stage = BearerAuth::new(authed_handle());
        let client = reqwest::Client::new();
        let request = stage.apply(client.get("http://localhost/accounts"));
        assert_eq!(header_of(request).as_deref(), Some("Bearer T1"));
    }

    #[test]
    fn test_bearer_auth_leaves_unauthenticated_requests_alone() {
        let stage = BearerAuth::new(handle());
        let client = reqwest::Client::new();
        let request = stage.apply(client.get("http://localhost/accounts"));
        assert_eq!(header_of(request), None);
    }

    #[test]
    fn test_auth_failure_watch_forces_logout_on_401() {
        let handle = authed_handle();
        let navigator = RecordingNavigator::new();
        let stage = AuthFailureWatch::new(handle.clone(), navigator.clone());

        stage.observe(StatusCode::UNAUTHORIZED);

        assert!(!handle.is_authenticated());
        assert_eq!(handle.token(), None);
        assert_eq!(navigator.hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_auth_failure_watch_ignores_other_statuses() {
        let handle = authed_handle();
        let navigator = RecordingNavigator::new();
        let stage = AuthFailureWatch::new(handle.clone(), navigator.clone());

        stage.observe(StatusCode::OK);
        stage.observe(StatusCode::FORBIDDEN);
        stage.observe(StatusCode::INTERNAL_SERVER_ERROR);

        assert!(handle.is_authenticated());
        assert_eq!(navigator.hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_repeated_401s_are_safe() {
        let handle = authed_handle();
        let navigator = RecordingNavigator::new();
        let stage = AuthFailureWatch::new(handle.clone(), navigator.clone());

        stage.observe(StatusCode::UNAUTHORIZED);
        stage.observe(StatusCode::UNAUTHORIZED);

        assert!(!handle.is_authenticated());
        assert_eq!(navigator.hits.load(Ordering::SeqCst), 2);
    }
}
