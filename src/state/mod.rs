use crate::api::{ApiClient, ApiError, ApiErrorKind};
use crate::models::User;
use crate::util::now_ms;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// How long a fetched current-user stays fresh. Navigation inside this
/// window reuses the cached value instead of re-querying per component.
const USER_TTL_MS: i64 = 15_000;

/// Session context, provided once at the app root. The single source of
/// truth for "who is signed in"; pages never query `/users` themselves.
///
/// Signal handles are `Copy`, so the whole context is; event handlers
/// capture it freely.
#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<User>>,
    pub user_loading: RwSignal<bool>,

    /// Stale-response guard + freshness bookkeeping.
    pub user_request_id: RwSignal<u64>,
    pub user_refreshed_ms: RwSignal<i64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            current_user: RwSignal::new(None),
            user_loading: RwSignal::new(false),
            user_request_id: RwSignal::new(0),
            user_refreshed_ms: RwSignal::new(0),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.get().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user
            .get()
            .map(|u| u.is_admin())
            .unwrap_or(false)
    }

    /// Refresh the session user from the server. Called on navigation
    /// boundaries; within the TTL it is a no-op unless forced.
    pub fn refresh_current_user(&self, force: bool) {
        if self.user_loading.get_untracked() {
            return;
        }

        if !force {
            let fresh = now_ms() - self.user_refreshed_ms.get_untracked() < USER_TTL_MS;
            if fresh && self.current_user.get_untracked().is_some() {
                return;
            }
        }

        let req_id = self.user_request_id.get_untracked().saturating_add(1);
        self.user_request_id.set(req_id);
        self.user_loading.set(true);

        let api_client = self.api_client.get_untracked();
        let state = self.clone();
        spawn_local(async move {
            let result = api_client.get_current_user().await;

            // Ignore stale responses.
            if state.user_request_id.get_untracked() != req_id {
                return;
            }

            match result {
                Ok(user) => {
                    state.current_user.set(Some(user));
                    state.user_refreshed_ms.set(now_ms());
                }
                Err(_) => {
                    // No session (or unreachable backend): signed out.
                    state.current_user.set(None);
                    state.user_refreshed_ms.set(now_ms());
                }
            }
            state.user_loading.set(false);
        });
    }

    pub fn clear_session(&self) {
        self.current_user.set(None);
        self.user_refreshed_ms.set(0);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

/// Where a failed request navigates to, if anywhere. This is the one
/// status-to-navigation contract every list and detail view applies:
/// 401 -> login, 403 -> safe default, 5xx -> error page. Other client
/// errors stay inline and the user may retry.
pub(crate) fn redirect_target(kind: ApiErrorKind) -> Option<&'static str> {
    match kind {
        ApiErrorKind::Unauthorized => Some("/login"),
        ApiErrorKind::Forbidden => Some("/"),
        ApiErrorKind::Server => Some("/error"),
        ApiErrorKind::NotFound
        | ApiErrorKind::Client
        | ApiErrorKind::Network
        | ApiErrorKind::Parse => None,
    }
}

/// Apply the contract. Returns `true` when the error was terminal for
/// the view (a redirect was issued); `false` means the caller should
/// surface the message inline and leave its state unchanged.
pub(crate) fn handle_api_error(app_state: &AppState, e: &ApiError) -> bool {
    let Some(target) = redirect_target(e.kind) else {
        return false;
    };

    if e.kind == ApiErrorKind::Unauthorized {
        app_state.clear_session();
    }

    let _ = window().location().set_href(target);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_contract() {
        assert_eq!(redirect_target(ApiErrorKind::Unauthorized), Some("/login"));
        assert_eq!(redirect_target(ApiErrorKind::Forbidden), Some("/"));
        assert_eq!(redirect_target(ApiErrorKind::Server), Some("/error"));
        assert_eq!(redirect_target(ApiErrorKind::NotFound), None);
        assert_eq!(redirect_target(ApiErrorKind::Client), None);
        assert_eq!(redirect_target(ApiErrorKind::Network), None);
        assert_eq!(redirect_target(ApiErrorKind::Parse), None);
    }
}
