use axum::{
    routing::{get, post},
    Router,
    extract::{Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;

use crate::api::models::{TallyResponse, VoteForm, VoteRequest};
use crate::api::response;
use crate::dom::RESULTS_ID;
use crate::error::AppError;
use crate::fetcher::fetch_json;
use crate::models::VoteCollection;
use crate::page::{render_page, RESULTS_FRAGMENT_PATH, VOTE_API_PATH, VOTE_FORM_PATH};
use crate::render::tally_markup;
use crate::tally::VoteTally;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route(VOTE_FORM_PATH, post(submit_vote_handler))
        .route(RESULTS_FRAGMENT_PATH, get(results_fragment_handler))
        .route("/api/texts", get(texts_handler))
        .route(VOTE_API_PATH, get(list_votes_handler).post(create_vote_handler))
        .route("/api/tally", get(tally_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn page_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state).await)
}

/// Plain form submit, used only when the page script is not running: save the
/// vote, then send the browser back to a fresh page.
async fn submit_vote_handler(
    State(state): State<AppState>,
    Form(form): Form<VoteForm>,
) -> Redirect {
    let Some(product_id) = form.selected() else {
        tracing::info!("vote submitted without a product, ignoring");
        return Redirect::to("/");
    };

    let outcome = state.store.save_vote(product_id).await;
    if !outcome.success {
        tracing::warn!(product_id, message = %outcome.message, "vote was not recorded");
    }

    Redirect::to(&format!("/#{}", RESULTS_ID))
}

async fn results_fragment_handler(State(state): State<AppState>) -> Html<String> {
    let votes = read_votes(&state).await.ok();
    Html(tally_markup(votes.as_ref()))
}

async fn texts_handler(State(state): State<AppState>) -> Response {
    let result = fetch_json(&state.config.texts_url).await;
    let status = if result.success { StatusCode::OK } else { StatusCode::BAD_GATEWAY };
    (status, Json(result)).into_response()
}

async fn list_votes_handler(State(state): State<AppState>) -> Response {
    match read_votes(&state).await {
        Ok(votes) => response::success(votes).into_response(),
        Err(err) => response::from_error::<VoteCollection>(&err).into_response(),
    }
}

async fn create_vote_handler(
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Response {
    let product_id = req.product_id.trim();
    if product_id.is_empty() {
        let err = AppError::ValidationError("productID must not be empty".to_string());
        return response::from_error::<()>(&err).into_response();
    }

    let outcome = state.store.save_vote(product_id).await;
    let status = if outcome.success { StatusCode::CREATED } else { StatusCode::BAD_GATEWAY };
    response::with_status(status, outcome).into_response()
}

async fn tally_handler(State(state): State<AppState>) -> Response {
    match read_votes(&state).await {
        Ok(votes) => {
            let tally = VoteTally::from_votes(votes.records());
            response::success(TallyResponse {
                total: tally.total(),
                rows: tally.rows().to_vec(),
            })
            .into_response()
        }
        Err(err) => response::from_error::<TallyResponse>(&err).into_response(),
    }
}

async fn read_votes(state: &AppState) -> Result<VoteCollection, AppError> {
    state.store.get_votes().await.map_err(|err| {
        tracing::error!(error = %err, "could not read votes");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::VoteRecord;
    use crate::store::{MemoryStore, SaveOutcome, VoteStore};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl VoteStore for CountingStore {
        async fn append(&self, record: VoteRecord) -> crate::error::Result<String> {
            self.inner.append(record).await
        }

        async fn get_votes(&self) -> crate::error::Result<VoteCollection> {
            self.inner.get_votes().await
        }

        async fn save_vote(&self, product_id: &str) -> SaveOutcome {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_vote(product_id).await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl VoteStore for BrokenStore {
        async fn append(&self, _record: VoteRecord) -> crate::error::Result<String> {
            Err(AppError::StoreError("offline".to_string()))
        }

        async fn get_votes(&self) -> crate::error::Result<VoteCollection> {
            Err(AppError::StoreError("offline".to_string()))
        }
    }

    async fn offline_config() -> Config {
        // Point the texts endpoint at a closed port so no test touches the network.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::from_lookup(|_| None).unwrap();
        config.texts_url = format!("http://{}/texts", addr);
        config
    }

    fn form_post(body: &str) -> Request<Body> {
        Request::post("/votes")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn submit_without_product_never_reaches_store() {
        let store = Arc::new(CountingStore::default());
        let app = create_router(AppState::new(offline_config().await, store.clone()));

        for body in ["product=", "", "product=%20%20"] {
            let response = app.clone().oneshot(form_post(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
        }
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submitted_vote_shows_up_in_next_render() {
        let store = Arc::new(CountingStore::default());
        let app = create_router(AppState::new(offline_config().await, store.clone()));

        let response = app.clone().oneshot(form_post("product=camera")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/#results");
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);

        let response = app
            .oneshot(Request::get("/fragments/results").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains("<td>camera</td><td>1</td>"));
    }

    async fn numbered_texts_server() -> (String, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let router = axum::Router::new()
            .route(
                "/texts",
                get(|State(fetches): State<Arc<AtomicUsize>>| async move {
                    let batch = fetches.fetch_add(1, Ordering::SeqCst);
                    Json(json!({
                        "data": [{ "title": format!("Batch {}", batch), "author": "a", "genre": "g", "content": "c" }]
                    }))
                }),
            )
            .with_state(fetches.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{}/texts", addr), fetches)
    }

    #[tokio::test]
    async fn scripted_vote_refreshes_tally_without_rerunning_startup() {
        let (texts_url, fetches) = numbered_texts_server().await;
        let mut config = offline_config().await;
        config.texts_url = texts_url;
        let app = create_router(AppState::new(config, Arc::new(MemoryStore::new())));

        let page = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_string(page).await;
        assert!(page.contains("Batch 0"));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        // What the submit handler in the page script sends.
        let vote = Request::post(VOTE_API_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "productID": "camera" }).to_string()))
            .unwrap();
        let response = app.clone().oneshot(vote).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(Request::get(RESULTS_FRAGMENT_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let fragment = body_string(response).await;
        assert!(fragment.contains("<td>camera</td><td>1</td>"));
        assert!(!fragment.contains("alert("));
        assert!(!fragment.contains("Batch"));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn page_renders_placeholder_when_store_is_down() {
        let app = create_router(AppState::new(offline_config().await, Arc::new(BrokenStore)));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(crate::render::NO_VOTES_MESSAGE));
        assert!(!html.contains("<table"));
    }

    #[tokio::test]
    async fn api_tally_counts_in_first_seen_order() {
        let app = create_router(AppState::new(offline_config().await, Arc::new(MemoryStore::new())));

        for product in ["A", "B", "A"] {
            let request = Request::post("/api/votes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "productID": product }).to_string()))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(Request::get("/api/tally").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body["data"],
            json!({
                "rows": [{ "productID": "A", "votes": 2 }, { "productID": "B", "votes": 1 }],
                "total": 3
            })
        );
    }

    #[tokio::test]
    async fn api_rejects_empty_product() {
        let store = Arc::new(CountingStore::default());
        let app = create_router(AppState::new(offline_config().await, store.clone()));

        let request = Request::post("/api/votes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"productID":""}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn api_votes_surfaces_store_failure() {
        let app = create_router(AppState::new(offline_config().await, Arc::new(BrokenStore)));

        let response = app
            .oneshot(Request::get("/api/votes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["meta"]["status"], "error");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn api_texts_reports_fetch_failure() {
        let app = create_router(AppState::new(offline_config().await, Arc::new(MemoryStore::new())));

        let response = app
            .oneshot(Request::get("/api/texts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }
}
