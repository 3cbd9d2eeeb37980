use crate::models::{Comment, ListScope, Note, Page, User};
use crate::pager::ListQuery;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// 401: the session cookie is missing or expired.
    Unauthorized,
    /// 403: signed in but not allowed.
    Forbidden,
    /// 404.
    NotFound,
    /// Any other 4xx: surfaced inline, the user may retry.
    Client,
    /// 5xx.
    Server,
    Network,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Error bodies come back as `{"message": "..."}` (or `{"error": "..."}`
/// from a couple of older endpoints).
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: e.to_string(),
        }
    }

    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            400..=499 => ApiErrorKind::Client,
            _ => ApiErrorKind::Server,
        };

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed ({status})"));

        Self {
            kind,
            status: Some(status),
            message,
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "https://localhost:443/api/v1".to_string();

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    // 1) Prefer README style: API_URL
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    // 2) Fallback: api_url
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Path + query string for a paginated note-list fetch. The shared scope
/// uses its own resource and takes no category parameter.
pub(crate) fn note_list_path(query: &ListQuery) -> String {
    let mut path = match query.scope {
        ListScope::Own => format!("/notes?page={}&size={}", query.page, query.page_size),
        ListScope::SharedWithMe => {
            format!("/notes/shared?page={}&size={}", query.page, query.page_size)
        }
    };

    if query.scope == ListScope::Own {
        if let Some(category) = query.category {
            path.push_str(&format!("&category={category}"));
        }
    }

    if let Some(search) = query.search.as_deref() {
        path.push_str(&format!("&search={}", urlencoding::encode(search)));
    }

    path
}

#[derive(Serialize, Clone, Debug)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize, Clone, Debug)]
struct ShareRequest {
    username: String,
}

/// Ask the browser to include cookies even when the API origin differs
/// from the page origin. Browser-only; a no-op when compiled for tests
/// on the host.
fn with_credentials(req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    #[cfg(target_arch = "wasm32")]
    let req = req.fetch_credentials_include();
    req
}

/// Session-cookie-credentialed client for the Planner API.
///
/// Authentication is delegated entirely to server-set cookies: no token
/// is held client-side, every request asks the browser to include
/// credentials.
#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    /// Absolute URL for a server-relative asset path (profile images).
    pub fn asset_url(&self, path: &str) -> String {
        let origin = self
            .base_url
            .strip_suffix("/api/v1")
            .unwrap_or(&self.base_url);
        format!("{origin}{path}")
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<reqwest::Response> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = with_credentials(client.request(method, url));

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json().await.map_err(ApiError::parse)
    }

    /// For endpoints that answer 204 No Content.
    async fn request_empty(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<()> {
        self.send(method, path, body).await?;
        Ok(())
    }

    // --- auth ---

    /// The server writes the session cookies; the body is only inspected
    /// for a non-success status marker.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<serde_json::Value> {
        self.request(
            reqwest::Method::POST,
            "/auth/login",
            Some(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    pub async fn register(&self, user: &User) -> ApiResult<serde_json::Value> {
        self.request(reqwest::Method::POST, "/auth/user", Some(user))
            .await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.request_empty(
            reqwest::Method::POST,
            "/auth/logout",
            Some(&serde_json::json!({})),
        )
        .await
    }

    // --- users ---

    pub async fn get_current_user(&self) -> ApiResult<User> {
        self.request(reqwest::Method::GET, "/users", None::<&()>)
            .await
    }

    pub async fn get_user(&self, id: i64) -> ApiResult<User> {
        self.request(reqwest::Method::GET, &format!("/users/{id}"), None::<&()>)
            .await
    }

    pub async fn update_user(&self, user: &User) -> ApiResult<User> {
        self.request(reqwest::Method::PUT, "/users", Some(user))
            .await
    }

    pub async fn upload_profile_image(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<User> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(ApiError::parse)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let client = reqwest::Client::new();
        let url = format!("{}/users/upload-image", self.base_url);
        let res = with_credentials(client.post(url))
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    pub async fn ban_user(&self, id: i64) -> ApiResult<User> {
        self.request(
            reqwest::Method::POST,
            &format!("/users/{id}/ban"),
            Some(&serde_json::json!({})),
        )
        .await
    }

    pub async fn unban_user(&self, id: i64) -> ApiResult<User> {
        self.request(
            reqwest::Method::POST,
            &format!("/users/{id}/unban"),
            Some(&serde_json::json!({})),
        )
        .await
    }

    // --- notes ---

    pub async fn get_note_page(&self, query: &ListQuery) -> ApiResult<Page<Note>> {
        self.request(reqwest::Method::GET, &note_list_path(query), None::<&()>)
            .await
    }

    pub async fn get_note(&self, id: i64) -> ApiResult<Note> {
        self.request(reqwest::Method::GET, &format!("/notes/{id}"), None::<&()>)
            .await
    }

    pub async fn create_note(&self, note: &Note) -> ApiResult<Note> {
        self.request(reqwest::Method::POST, "/notes", Some(note))
            .await
    }

    pub async fn update_note(&self, id: i64, note: &Note) -> ApiResult<Note> {
        self.request(reqwest::Method::PUT, &format!("/notes/{id}"), Some(note))
            .await
    }

    pub async fn delete_note(&self, id: i64) -> ApiResult<()> {
        self.request_empty(reqwest::Method::DELETE, &format!("/notes/{id}"), None::<&()>)
            .await
    }

    pub async fn share_note_with_username(&self, id: i64, username: &str) -> ApiResult<Note> {
        self.request(
            reqwest::Method::POST,
            &format!("/notes/{id}/share-username"),
            Some(&ShareRequest {
                username: username.to_string(),
            }),
        )
        .await
    }

    // --- comments ---

    pub async fn get_comments(
        &self,
        note_id: i64,
        page: u32,
        size: u32,
    ) -> ApiResult<Page<Comment>> {
        self.request(
            reqwest::Method::GET,
            &format!("/notes/{note_id}/comments?page={page}&size={size}"),
            None::<&()>,
        )
        .await
    }

    pub async fn create_comment(&self, note_id: i64, content: &str) -> ApiResult<Comment> {
        self.request(
            reqwest::Method::POST,
            &format!("/notes/{note_id}/comments"),
            Some(&Comment {
                content: content.to_string(),
                ..Default::default()
            }),
        )
        .await
    }

    pub async fn delete_comment(&self, note_id: i64, comment_id: i64) -> ApiResult<()> {
        self.request_empty(
            reqwest::Method::DELETE,
            &format!("/notes/{note_id}/comments/{comment_id}"),
            None::<&()>,
        )
        .await
    }

    pub async fn report_comment(&self, note_id: i64, comment_id: i64) -> ApiResult<Comment> {
        self.request(
            reqwest::Method::POST,
            &format!("/notes/{note_id}/comments/{comment_id}/report"),
            Some(&serde_json::json!({})),
        )
        .await
    }

    // --- moderation ---

    pub async fn get_reported_comments(&self, page: u32, size: u32) -> ApiResult<Page<Comment>> {
        self.request(
            reqwest::Method::GET,
            &format!("/admin/reported-comments?page={page}&size={size}"),
            None::<&()>,
        )
        .await
    }

    pub async fn unreport_comment(&self, comment_id: i64) -> ApiResult<Comment> {
        self.request(
            reqwest::Method::POST,
            &format!("/admin/reported-comments/{comment_id}/unreport"),
            Some(&serde_json::json!({})),
        )
        .await
    }

    pub async fn delete_reported_comment(&self, comment_id: i64) -> ApiResult<()> {
        self.request_empty(
            reqwest::Method::DELETE,
            &format!("/admin/reported-comments/{comment_id}"),
            None::<&()>,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteCategory;

    fn query(page: u32) -> ListQuery {
        ListQuery {
            page,
            page_size: 10,
            category: None,
            search: None,
            scope: ListScope::Own,
        }
    }

    #[test]
    fn test_note_list_path_own_scope() {
        assert_eq!(note_list_path(&query(0)), "/notes?page=0&size=10");
        assert_eq!(note_list_path(&query(3)), "/notes?page=3&size=10");
    }

    #[test]
    fn test_note_list_path_with_category_and_search() {
        let q = ListQuery {
            category: Some(NoteCategory::Maths),
            search: Some("pythagorean theorem".to_string()),
            ..query(0)
        };
        assert_eq!(
            note_list_path(&q),
            "/notes?page=0&size=10&category=MATHS&search=pythagorean%20theorem"
        );
    }

    #[test]
    fn test_note_list_path_shared_scope_drops_category() {
        let q = ListQuery {
            category: Some(NoteCategory::Art),
            search: Some("x".to_string()),
            scope: ListScope::SharedWithMe,
            ..query(1)
        };
        // The shared endpoint has no category parameter.
        assert_eq!(note_list_path(&q), "/notes/shared?page=1&size=10&search=x");
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError::from_status(401, "").kind, ApiErrorKind::Unauthorized);
        assert_eq!(ApiError::from_status(403, "").kind, ApiErrorKind::Forbidden);
        assert_eq!(ApiError::from_status(404, "").kind, ApiErrorKind::NotFound);
        assert_eq!(ApiError::from_status(400, "").kind, ApiErrorKind::Client);
        assert_eq!(ApiError::from_status(422, "").kind, ApiErrorKind::Client);
        assert_eq!(ApiError::from_status(500, "").kind, ApiErrorKind::Server);
        assert_eq!(ApiError::from_status(503, "").kind, ApiErrorKind::Server);
    }

    #[test]
    fn test_error_message_extracted_from_body() {
        let e = ApiError::from_status(400, r#"{"message": "Title is required"}"#);
        assert_eq!(e.message, "Title is required");
        assert_eq!(e.status, Some(400));

        let e = ApiError::from_status(409, r#"{"error": "Username already exists"}"#);
        assert_eq!(e.message, "Username already exists");

        let e = ApiError::from_status(500, "<html>boom</html>");
        assert_eq!(e.message, "Request failed (500)");
    }

    #[test]
    fn test_asset_url_strips_api_prefix() {
        let c = ApiClient::new("https://localhost:443/api/v1".to_string());
        assert_eq!(
            c.asset_url("/api/v1/users/profile-image/2"),
            "https://localhost:443/api/v1/users/profile-image/2"
        );
    }
}
