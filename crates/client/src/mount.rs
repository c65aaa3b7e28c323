//! Async resolution of a [`ClientSessionGuard`] for one page mount.
//!
//! The wait for the session is cancellable: unmounting aborts it, and the
//! navigation side effect runs under the same lock that records the unmount,
//! so nothing navigates once the page is gone.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task::JoinHandle;

use stockgate_auth::{RoutePolicy, SessionView};

use crate::guard::{ClientSessionGuard, GuardEffect, GuardState};

/// Where the client obtains its session view.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn fetch_session(&self) -> SessionView;
}

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}

#[derive(Debug)]
struct Mounted {
    guard: ClientSessionGuard,
    mounted: bool,
}

/// Handle to a mounted guard. Dropping it unmounts.
pub struct MountedGuard {
    shared: Arc<Mutex<Mounted>>,
    task: Option<JoinHandle<()>>,
}

impl MountedGuard {
    /// Mount a guard for `path` and start resolving it in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(
        path: impl Into<String>,
        policy: Arc<RoutePolicy>,
        source: Arc<dyn SessionSource>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let shared = Arc::new(Mutex::new(Mounted {
            guard: ClientSessionGuard::mount(path, policy),
            mounted: true,
        }));

        let task = tokio::spawn({
            let shared = shared.clone();
            async move {
                let view = source.fetch_session().await;

                let Ok(mut mounted) = shared.lock() else {
                    return;
                };
                if !mounted.mounted {
                    return;
                }
                if let Some(GuardEffect::Navigate(location)) = mounted.guard.resolve(&view) {
                    navigator.navigate(&location);
                }
            }
        });

        Self {
            shared,
            task: Some(task),
        }
    }

    pub fn state(&self) -> GuardState {
        match self.shared.lock() {
            Ok(m) => m.guard.state().clone(),
            Err(_) => GuardState::Unauthenticated,
        }
    }

    /// Wait until the background resolution has finished (or was cancelled).
    pub async fn settled(&mut self) -> GuardState {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "session resolution task failed");
                }
            }
        }
        self.state()
    }

    /// Tear the mount down, suppressing any pending navigation.
    pub fn unmount(&mut self) {
        if let Ok(mut m) = self.shared.lock() {
            m.mounted = false;
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for MountedGuard {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use stockgate_auth::{Role, SessionUser, SubjectId};
    use tokio::sync::{Mutex as AsyncMutex, oneshot};

    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, location: &str) {
            self.visits.lock().unwrap().push(location.to_string());
        }
    }

    struct Fixed(SessionView);

    #[async_trait]
    impl SessionSource for Fixed {
        async fn fetch_session(&self) -> SessionView {
            self.0.clone()
        }
    }

    /// Resolves only when the test sends a view.
    struct Deferred(AsyncMutex<Option<oneshot::Receiver<SessionView>>>);

    #[async_trait]
    impl SessionSource for Deferred {
        async fn fetch_session(&self) -> SessionView {
            let rx = self.0.lock().await.take();
            match rx {
                Some(rx) => rx.await.unwrap_or_else(|_| SessionView::unauthenticated()),
                None => SessionView::unauthenticated(),
            }
        }
    }

    fn policy() -> Arc<RoutePolicy> {
        Arc::new(RoutePolicy::default())
    }

    #[tokio::test]
    async fn authenticated_session_resolves_without_navigation() {
        let nav = Arc::new(RecordingNavigator::default());
        let user = SessionUser {
            id: SubjectId::new("u-1"),
            username: "admin".to_string(),
            role: Role::Admin,
        };
        let mut mounted = MountedGuard::mount(
            "/productos",
            policy(),
            Arc::new(Fixed(SessionView::authenticated(user.clone()))),
            nav.clone(),
        );

        assert_eq!(mounted.settled().await, GuardState::Authenticated(user));
        assert!(nav.visits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_session_navigates_to_login() {
        let nav = Arc::new(RecordingNavigator::default());
        let mut mounted = MountedGuard::mount(
            "/categorias",
            policy(),
            Arc::new(Fixed(SessionView::unauthenticated())),
            nav.clone(),
        );

        assert_eq!(mounted.settled().await, GuardState::Unauthenticated);
        assert_eq!(
            *nav.visits.lock().unwrap(),
            vec!["/login?callbackUrl=%2Fcategorias".to_string()]
        );
    }

    #[tokio::test]
    async fn unmount_before_resolution_suppresses_navigation() {
        let nav = Arc::new(RecordingNavigator::default());
        let (tx, rx) = oneshot::channel();
        let mut mounted = MountedGuard::mount(
            "/productos",
            policy(),
            Arc::new(Deferred(AsyncMutex::new(Some(rx)))),
            nav.clone(),
        );

        assert_eq!(mounted.state(), GuardState::Loading);
        mounted.unmount();
        let _ = tx.send(SessionView::unauthenticated());
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(mounted.state(), GuardState::Loading);
        assert!(nav.visits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropping_the_handle_unmounts() {
        let nav = Arc::new(RecordingNavigator::default());
        let (tx, rx) = oneshot::channel();
        let mounted = MountedGuard::mount(
            "/productos",
            policy(),
            Arc::new(Deferred(AsyncMutex::new(Some(rx)))),
            nav.clone(),
        );

        drop(mounted);
        let _ = tx.send(SessionView::unauthenticated());
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(nav.visits.lock().unwrap().is_empty());
    }
}
