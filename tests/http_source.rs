use std::sync::Arc;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use profile_widget::{MemorySurface, Mount, ProfileWidget, RefreshOutcome, WidgetSettings};
use serde_json::json;

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1/profiles", addr)
}

fn settings(api_url: String) -> WidgetSettings {
    WidgetSettings {
        api_url,
        auth_token: "public-key".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn fetches_with_bearer_token_and_renders() {
    let seen = Seen::default();
    let recorder = seen.clone();
    let router = Router::new().route(
        "/v1/profiles/:username",
        get(move |Path(username): Path<String>, headers: HeaderMap| {
            let recorder = recorder.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                recorder.requests.lock().push((username.clone(), auth));
                Json(json!({
                    "username": username,
                    "email": "Ada@Example.com",
                    "fields": {
                        "current_state": {"focus": "<b>engines</b>", "energy": "steady"},
                        "about": {"tagline": "Notes & numbers", "bio": "Analyst"}
                    },
                    "seeds": [
                        {"text": "later", "priority": "low"},
                        {"text": "first", "priority": "urgent", "status": "active"}
                    ],
                    "contexts": [{"name": "Mathematics", "content": "Bernoulli numbers"}],
                    "last_updated": "2020-01-01T00:00:00Z"
                }))
            }
        }),
    );
    let api_url = serve(router).await;

    let surface = MemorySurface::full();
    let widget = ProfileWidget::new("ada", &settings(api_url), surface.clone()).unwrap();
    assert_eq!(widget.refresh().await, RefreshOutcome::Applied);

    let requests = seen.requests.lock().clone();
    assert_eq!(requests, vec![("ada".to_string(), Some("Bearer public-key".to_string()))]);

    let state = surface.html(Mount::CurrentState).unwrap();
    assert!(state.contains("&lt;b&gt;engines&lt;/b&gt;"));
    let about = surface.html(Mount::About).unwrap();
    assert!(about.contains("Notes &amp; numbers"));
    assert!(about.contains("https://gravatar.com/avatar/"));
    assert!(!about.contains("Ada@Example.com"));
    let items = surface.html(Mount::Items).unwrap();
    assert!(items.find("first").unwrap() < items.find("later").unwrap());
    assert!(surface.html(Mount::LastUpdated).unwrap().contains("Updated recently"));

    let data = widget.get_data().unwrap();
    assert_eq!(data.items.len(), 2);
    assert!(widget.refresh_state().last_success_at.is_some());
}

#[tokio::test]
async fn server_error_goes_offline_without_clearing() {
    let healthy = Arc::new(Mutex::new(true));
    let flag = healthy.clone();
    let router = Router::new().route(
        "/v1/profiles/:username",
        get(move || {
            let flag = flag.clone();
            async move {
                if *flag.lock() {
                    Ok(Json(json!({"username": "ada", "seeds": [{"text": "still here"}]})))
                } else {
                    Err((StatusCode::SERVICE_UNAVAILABLE, "down"))
                }
            }
        }),
    );
    let api_url = serve(router).await;

    let surface = MemorySurface::full();
    let widget = ProfileWidget::new("ada", &settings(api_url), surface.clone()).unwrap();
    assert_eq!(widget.refresh().await, RefreshOutcome::Applied);

    *healthy.lock() = false;
    assert_eq!(widget.refresh().await, RefreshOutcome::Offline);
    assert!(surface.html(Mount::Items).unwrap().contains("still here"));
    assert!(surface.html(Mount::LastUpdated).unwrap().contains("offline"));
    assert!(widget.get_data().is_some());
}

#[tokio::test]
async fn unreachable_endpoint_goes_offline() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let surface = MemorySurface::full();
    let widget = ProfileWidget::new(
        "ada",
        &settings(format!("http://{}/v1/profiles", addr)),
        surface.clone(),
    )
    .unwrap();
    assert_eq!(widget.refresh().await, RefreshOutcome::Offline);
    assert!(widget.get_data().is_none());
    assert!(surface.html(Mount::LastUpdated).unwrap().contains("offline"));
}

#[tokio::test]
async fn non_json_body_goes_offline() {
    let router = Router::new().route(
        "/v1/profiles/:username",
        get(|| async { "<html>maintenance</html>" }),
    );
    let api_url = serve(router).await;

    let surface = MemorySurface::full();
    let widget = ProfileWidget::new("ada", &settings(api_url), surface.clone()).unwrap();
    assert_eq!(widget.refresh().await, RefreshOutcome::Offline);
    assert!(widget.get_data().is_none());
}
