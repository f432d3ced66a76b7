//! Integration tests for profile updates and profile image serving.

mod helpers;

use axum::http::{StatusCode, header};

use helpers::{Part, TestApp, png};

const FULL_HEIGHT_LEFT_HALF: &str = r#"{"width":50,"height":100,"x":0,"y":0}"#;

async fn upload(app: &TestApp, cookie: &str, data: &[u8], crop: &str) -> helpers::TestResponse {
    app.multipart(
        "PATCH",
        "/api/users/me",
        &[
            Part::File {
                name: "profileImage",
                content_type: "image/png",
                data,
            },
            Part::Text("crop", crop),
        ],
        Some(cookie),
    )
    .await
}

fn content_type(response: &helpers::TestResponse) -> &str {
    response
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_upload_serves_all_formats() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = upload(&app, &cookie, &png(200, 100), FULL_HEIGHT_LEFT_HALF).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let id = response.body["data"]["profilePictureId"]
        .as_str()
        .expect("image id")
        .to_string();

    let jpeg = app
        .request("GET", &format!("/images/profile/{id}"), None, None)
        .await;
    assert_eq!(jpeg.status, StatusCode::OK);
    assert_eq!(content_type(&jpeg), "image/jpeg");
    let decoded = image::load_from_memory(&jpeg.bytes).expect("decode jpeg");
    assert_eq!((decoded.width(), decoded.height()), (400, 400));

    for (name, mime) in [("png", "image/png"), ("webp", "image/webp")] {
        let served = app
            .request("GET", &format!("/images/profile/{id}?type={name}"), None, None)
            .await;
        assert_eq!(served.status, StatusCode::OK);
        assert_eq!(content_type(&served), mime);
        assert!(!served.bytes.is_empty());
    }
}

#[tokio::test]
async fn test_full_crop_on_landscape_image() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = upload(
        &app,
        &cookie,
        &png(640, 480),
        r#"{"width":100,"height":100,"x":0,"y":0}"#,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let id = response.body["data"]["profilePictureId"]
        .as_str()
        .expect("image id")
        .to_string();

    let served = app
        .request("GET", &format!("/images/profile/{id}?type=png"), None, None)
        .await;
    let decoded = image::load_from_memory(&served.bytes).expect("decode png");
    assert_eq!((decoded.width(), decoded.height()), (400, 400));
}

#[tokio::test]
async fn test_serve_rejects_unknown_type_and_ids() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;
    let id = upload(&app, &cookie, &png(200, 100), FULL_HEIGHT_LEFT_HALF).await.body["data"]
        ["profilePictureId"]
        .as_str()
        .expect("image id")
        .to_string();

    let gif = app
        .request("GET", &format!("/images/profile/{id}?type=gif"), None, None)
        .await;
    assert_eq!(gif.status, StatusCode::BAD_REQUEST);

    let upper = app
        .request("GET", &format!("/images/profile/{id}?type=PNG"), None, None)
        .await;
    assert_eq!(upper.status, StatusCode::BAD_REQUEST);

    let not_uuid = app
        .request("GET", "/images/profile/not-a-uuid", None, None)
        .await;
    assert_eq!(not_uuid.status, StatusCode::NOT_FOUND);

    let unknown = app
        .request(
            "GET",
            "/images/profile/4f1c2a5e-8b7d-4c3a-9e2f-0a1b2c3d4e5f",
            None,
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replacing_image_archives_previous() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let first = upload(&app, &cookie, &png(200, 100), FULL_HEIGHT_LEFT_HALF).await.body["data"]
        ["profilePictureId"]
        .as_str()
        .expect("first id")
        .to_string();
    let second = upload(&app, &cookie, &png(120, 120), r#"{"width":100,"height":100,"x":0,"y":0}"#)
        .await
        .body["data"]["profilePictureId"]
        .as_str()
        .expect("second id")
        .to_string();
    assert_ne!(first, second);

    let old = app
        .request("GET", &format!("/images/profile/{first}"), None, None)
        .await;
    assert_eq!(old.status, StatusCode::NOT_FOUND);

    let new = app
        .request("GET", &format!("/images/profile/{second}"), None, None)
        .await;
    assert_eq!(new.status, StatusCode::OK);

    let me = app.request("GET", "/api/users/me", None, Some(&cookie)).await;
    assert_eq!(me.body["data"]["profilePictureId"], second.as_str());
}

#[tokio::test]
async fn test_image_too_big() {
    let app = TestApp::with_config(|c| c.profile_images.max_upload_bytes = 1024).await;
    let cookie = app.logged_in("ada").await;

    let response = upload(&app, &cookie, &vec![0u8; 4096], FULL_HEIGHT_LEFT_HALF).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "profile_image_too_big");
}

#[tokio::test]
async fn test_unsupported_image_type() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = app
        .multipart(
            "PATCH",
            "/api/users/me",
            &[
                Part::File {
                    name: "profileImage",
                    content_type: "image/gif",
                    data: b"GIF89a",
                },
                Part::Text("crop", FULL_HEIGHT_LEFT_HALF),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "image_type_not_supported");

    let me = app.request("GET", "/api/users/me", None, Some(&cookie)).await;
    assert!(me.body["data"]["profilePictureId"].is_null());
}

#[tokio::test]
async fn test_crop_out_of_range() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = upload(
        &app,
        &cookie,
        &png(200, 100),
        r#"{"width":101,"height":100,"x":0,"y":0}"#,
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "validation_failed");
}

#[tokio::test]
async fn test_image_without_crop() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = app
        .multipart(
            "PATCH",
            "/api/users/me",
            &[Part::File {
                name: "profileImage",
                content_type: "image/png",
                data: &png(64, 64),
            }],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "validation_failed");
}

#[tokio::test]
async fn test_update_name_and_birthdate() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = app
        .multipart(
            "PATCH",
            "/api/users/me",
            &[
                Part::Text("name", "ada lovelace"),
                Part::Text("birthdate", "1815-12-10"),
            ],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["name"], "ada lovelace");
    assert_eq!(response.body["data"]["birthdate"], "1815-12-10");
    assert!(response.body["data"]["profilePictureId"].is_null());
}

#[tokio::test]
async fn test_empty_update() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = app
        .multipart("PATCH", "/api/users/me", &[Part::Text("name", "  ")], Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "no_updates_to_perform");
}

#[tokio::test]
async fn test_rename_to_taken_name() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;
    app.sign_up("grace").await;

    let response = app
        .multipart("PATCH", "/api/users/me", &[Part::Text("name", "grace")], Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "user_name_already_exists");
}

#[tokio::test]
async fn test_invalid_birthdate() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let response = app
        .multipart(
            "PATCH",
            "/api/users/me",
            &[Part::Text("birthdate", "12/10/1815")],
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "validation_failed");
}
