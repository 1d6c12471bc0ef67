use std::hash::Hasher;

use derive_more::Display;
use metrohash::MetroHash64;
use tracing::{debug, error, info, warn};

use crate::controller::FormSubmission;
use crate::icons::IconTable;
use crate::render::{RESET_THEME_ACTION, render_page};
use crate::session::{SessionState, SessionStore};
use crate::theme::Theme;

/// Largest accepted form body.
pub const MAX_FORM_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HttpMethod {
    #[display("GET")]
    Get,
    #[display("HEAD")]
    Head,
    #[display("POST")]
    Post,
    #[display("OTHER")]
    Other,
}

/// The parts of an HTTP request the page cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub cookie: Option<String>,
    pub if_none_match: Option<String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            cookie: None,
            if_none_match: None,
            body: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    pub fn with_if_none_match(mut self, etag: impl Into<String>) -> Self {
        self.if_none_match = Some(etag.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The request path without query string or fragment.
    pub fn path(&self) -> &str {
        self.url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Page { html: String, etag: String },
    NotModified { etag: String },
    Redirect {
        location: &'static str,
        set_cookie: Option<String>,
    },
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Reply::Page { .. } => 200,
            Reply::NotModified { .. } => 304,
            Reply::Redirect { .. } => 302,
            Reply::NotFound => 404,
            Reply::MethodNotAllowed => 405,
            Reply::PayloadTooLarge => 413,
        }
    }
}

/// Serves the single page: GET renders it from the session cookie, POST
/// stores the submitted form in the cookie and redirects back.
pub struct Controller {
    store: SessionStore,
    icons: IconTable,
}

impl Controller {
    pub fn new(store: SessionStore, icons: IconTable) -> Self {
        Self { store, icons }
    }

    pub fn handle(&self, request: &HttpRequest) -> Reply {
        if request.path() != "/" {
            debug!("No route for '{}'", request.url);
            return Reply::NotFound;
        }

        match request.method {
            HttpMethod::Get | HttpMethod::Head => self.show(request),
            HttpMethod::Post => self.update(request),
            HttpMethod::Other => Reply::MethodNotAllowed,
        }
    }

    fn show(&self, request: &HttpRequest) -> Reply {
        let session = self.store.load(request.cookie.as_deref());
        let html = render_page(&session, &self.icons).into_string();
        let etag = etag_for(&html);

        let cached = request.if_none_match.as_deref().is_some_and(|header| {
            header
                .split(',')
                .map(str::trim)
                .any(|tag| tag == etag || tag == "*")
        });
        if cached {
            return Reply::NotModified { etag };
        }
        Reply::Page { html, etag }
    }

    fn update(&self, request: &HttpRequest) -> Reply {
        if request.body.len() > MAX_FORM_BYTES {
            warn!(
                "Rejecting form body of {} bytes (limit {})",
                request.body.len(),
                MAX_FORM_BYTES
            );
            return Reply::PayloadTooLarge;
        }

        let form = FormSubmission::parse(&String::from_utf8_lossy(&request.body));
        let mut session = self.store.load(request.cookie.as_deref());
        apply_submission(&mut session, &form, self.store.default_theme());

        let set_cookie = match self.store.save(&session) {
            Ok(header) => Some(header),
            Err(e) => {
                error!("Failed to store session, redirecting without it: {}", e);
                None
            }
        };
        Reply::Redirect {
            location: "/",
            set_cookie,
        }
    }
}

/// Applies one form submission to the session. The reset action only touches
/// the theme; any other submission replaces the listing and all three colors,
/// filling missing colors from the default theme.
pub fn apply_submission(session: &mut SessionState, form: &FormSubmission, default_theme: &Theme) {
    match form.get("action") {
        Some(RESET_THEME_ACTION) => {
            info!("Resetting theme to defaults");
            session.theme = default_theme.clone();
        }
        _ => {
            session.files = form.get("files").unwrap_or_default().to_string();
            session.theme = Theme::from_fields(
                form.get("background"),
                form.get("foreground"),
                form.get("lines"),
                default_theme,
            );
            debug!(
                "Stored listing of {} bytes with theme {:?}",
                session.files.len(),
                session.theme
            );
        }
    }
}

fn etag_for(html: &str) -> String {
    let mut hasher = MetroHash64::default();
    hasher.write(html.as_bytes());
    format!("W/\"{:016x}\"", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Color;

    fn controller() -> Controller {
        let store = SessionStore::new(&["test-secret".to_string()], Theme::default())
            .expect("Failed to create store");
        Controller::new(store, IconTable::default())
    }

    fn post(controller: &Controller, cookie: Option<&str>, body: &str) -> Option<String> {
        let mut request = HttpRequest::new(HttpMethod::Post, "/").with_body(body);
        if let Some(cookie) = cookie {
            request = request.with_cookie(cookie);
        }
        match controller.handle(&request) {
            Reply::Redirect {
                location: "/",
                set_cookie,
            } => set_cookie.map(|header| {
                header
                    .split(';')
                    .next()
                    .expect("Set-Cookie has a name=value pair")
                    .to_string()
            }),
            other => panic!("Expected redirect, got {:?}", other),
        }
    }

    fn page(controller: &Controller, cookie: Option<&str>) -> String {
        let mut request = HttpRequest::new(HttpMethod::Get, "/");
        if let Some(cookie) = cookie {
            request = request.with_cookie(cookie);
        }
        match controller.handle(&request) {
            Reply::Page { html, .. } => html,
            other => panic!("Expected page, got {:?}", other),
        }
    }

    const CUSTOM_FORM: &str =
        "files=src%2Fapp%2Froot.tsx%0D%0AREADME.md&background=%23000000&foreground=%23ffffff&lines=%23ff0000";

    #[test]
    fn test_first_visit_uses_default_theme() {
        let html = page(&controller(), None);

        assert!(html.contains("name=\"background\" value=\"#15232d\""));
        assert!(html.contains("<textarea name=\"files\" spellcheck=\"false\"></textarea>"));
    }

    #[test]
    fn test_submission_round_trips_through_cookie() {
        let controller = controller();

        let cookie = post(&controller, None, CUSTOM_FORM).expect("Session cookie expected");
        let html = page(&controller, Some(&cookie));

        assert!(html.contains("name=\"background\" value=\"#000000\""));
        assert!(html.contains("name=\"foreground\" value=\"#ffffff\""));
        assert!(html.contains("name=\"lines\" value=\"#ff0000\""));
        assert!(html.contains("src/app/root.tsx\r\nREADME.md</textarea>"));
        assert!(html.contains("<span>root.tsx</span>"));
    }

    #[test]
    fn test_reset_theme_keeps_listing() {
        let controller = controller();
        let cookie = post(&controller, None, CUSTOM_FORM).expect("Session cookie expected");

        let reset = post(
            &controller,
            Some(&cookie),
            "files=ignored.txt&background=%23111111&foreground=%23222222&lines=%23333333&action=resetTheme",
        )
        .expect("Session cookie expected");

        let session = controller.store.load(Some(&reset));
        assert_eq!(session.theme, Theme::default());
        assert_eq!(session.files, "src/app/root.tsx\r\nREADME.md");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let controller = controller();

        let cookie = post(&controller, None, "background=red").expect("Session cookie expected");
        let session = controller.store.load(Some(&cookie));

        assert_eq!(session.files, "");
        assert_eq!(session.theme.background, Color::new("red"));
        assert_eq!(session.theme.foreground, Theme::default().foreground);
        assert_eq!(session.theme.lines, Theme::default().lines);
    }

    #[test]
    fn test_apply_submission_replaces_listing() {
        let mut session = SessionState {
            files: "old.txt".to_string(),
            theme: Theme::default(),
        };

        apply_submission(
            &mut session,
            &FormSubmission::parse("files=new.txt&background=a&foreground=b&lines=c"),
            &Theme::default(),
        );

        assert_eq!(session.files, "new.txt");
        assert_eq!(
            session.theme,
            Theme {
                background: Color::new("a"),
                foreground: Color::new("b"),
                lines: Color::new("c"),
            }
        );
    }

    #[test]
    fn test_matching_etag_is_not_modified() {
        let controller = controller();
        let etag = match controller.handle(&HttpRequest::new(HttpMethod::Get, "/")) {
            Reply::Page { etag, .. } => etag,
            other => panic!("Expected page, got {:?}", other),
        };

        let reply = controller.handle(
            &HttpRequest::new(HttpMethod::Get, "/").with_if_none_match(format!("\"x\", {etag}")),
        );
        assert_eq!(reply, Reply::NotModified { etag: etag.clone() });
        assert_eq!(reply.status(), 304);

        let stale = controller
            .handle(&HttpRequest::new(HttpMethod::Get, "/").with_if_none_match("W/\"0\""));
        assert_eq!(stale.status(), 200);
    }

    #[test]
    fn test_etag_changes_with_session() {
        let controller = controller();
        let cookie = post(&controller, None, CUSTOM_FORM).expect("Session cookie expected");

        let fresh = controller.handle(&HttpRequest::new(HttpMethod::Get, "/"));
        let custom = controller.handle(&HttpRequest::new(HttpMethod::Get, "/").with_cookie(cookie));

        match (fresh, custom) {
            (Reply::Page { etag: a, .. }, Reply::Page { etag: b, .. }) => assert_ne!(a, b),
            other => panic!("Expected two pages, got {:?}", other),
        }
    }

    #[test]
    fn test_head_and_query_strings_render_page() {
        let controller = controller();

        assert_eq!(
            controller
                .handle(&HttpRequest::new(HttpMethod::Head, "/"))
                .status(),
            200
        );
        assert_eq!(
            controller
                .handle(&HttpRequest::new(HttpMethod::Get, "/?utm_source=x"))
                .status(),
            200
        );
    }

    #[test]
    fn test_unknown_routes_and_methods() {
        let controller = controller();

        assert_eq!(
            controller.handle(&HttpRequest::new(HttpMethod::Get, "/favicon.ico")),
            Reply::NotFound
        );
        assert_eq!(
            controller.handle(&HttpRequest::new(HttpMethod::Other, "/")),
            Reply::MethodNotAllowed
        );
    }

    #[test]
    fn test_oversized_body_is_rejected() {
        let controller = controller();
        let body = vec![b'a'; MAX_FORM_BYTES + 1];

        let reply = controller.handle(&HttpRequest::new(HttpMethod::Post, "/").with_body(body));

        assert_eq!(reply, Reply::PayloadTooLarge);
        assert_eq!(reply.status(), 413);
    }

    #[test]
    fn test_tampered_cookie_renders_default_page() {
        let html = page(&controller(), Some("__session=AAAA%00garbage"));

        assert!(html.contains("name=\"background\" value=\"#15232d\""));
    }
}
