//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use parlor_api::{AppState, build_app};
use parlor_core::config::{AppConfig, DatabaseConfig, ProfileImagesConfig};
use parlor_database::MemoryUserStore;

/// A password that satisfies the default policy.
pub const PASSWORD: &str = "correct-Horse-battery-9-staple";

const BOUNDARY: &str = "parlor-test-boundary";

/// Test application backed by the in-memory user store and a temporary
/// image root.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    _images: TempDir,
}

/// Captured response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` of the session cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("parlor_session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application, adjusting configuration first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let images = TempDir::new().expect("tempdir");
        let mut config = AppConfig {
            server: Default::default(),
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                connect_timeout_seconds: 1,
                idle_timeout_seconds: 1,
            },
            session: Default::default(),
            auth: Default::default(),
            profile_images: ProfileImagesConfig {
                root_dir: images.path().join("profile").to_string_lossy().into_owned(),
                ..ProfileImagesConfig::default()
            },
            logging: Default::default(),
        };
        adjust(&mut config);

        let state = AppState::new(config.clone(), Arc::new(MemoryUserStore::new()));
        state
            .profile_images
            .store()
            .ensure_layout()
            .await
            .expect("image layout");

        Self {
            router: build_app(state),
            config,
            _images: images,
        }
    }

    /// Send a request with an optional JSON body and session cookie.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    /// Send a multipart/form-data request.
    pub async fn multipart(
        &self,
        method: &str,
        path: &str,
        parts: &[Part<'_>],
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File {
                    name,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder().method(method).uri(path).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).expect("request"))
            .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    /// Sign up `name` with [`PASSWORD`].
    pub async fn sign_up(&self, name: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/users/signup",
            Some(serde_json::json!({
                "name": name,
                "password": PASSWORD,
                "birthdate": "1990-04-12",
            })),
            None,
        )
        .await
    }

    /// Sign up and log in `name`, returning the session cookie.
    pub async fn logged_in(&self, name: &str) -> String {
        let signup = self.sign_up(name).await;
        assert_eq!(signup.status, StatusCode::CREATED, "{:?}", signup.body);

        let login = self
            .request(
                "POST",
                "/api/users/login",
                Some(serde_json::json!({ "name": name, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        login.session_cookie().expect("session cookie")
    }
}

/// A PNG gradient of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}
