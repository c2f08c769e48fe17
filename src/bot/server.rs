use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use teloxide::types::Update;
use tokio::net::TcpListener;

use super::dispatcher::{dispatch_update, BotContext};

/* Server is the HTTP front of the bot.
 * It answers liveness checks and receives updates pushed by Telegram.
 * Update handling errors are logged and never reach Telegram; only a body
 * that cannot be decoded is answered with an error status.
 */

const HOME_MESSAGE: &str = "Bot is Running!";

#[derive(Clone)]
struct ServerState {
    ctx: Arc<BotContext>,
    token: Arc<str>,
}

pub fn make_router(ctx: Arc<BotContext>, token: &str) -> Router {
    let state = ServerState {
        ctx,
        token: Arc::from(token),
    };

    Router::new()
        .route("/", get(home_handler))
        .route("/{token}", post(update_handler))
        .with_state(state)
}

/* Runs the server on all interfaces until Ctrl-C.
 */
pub async fn run_server(ctx: Arc<BotContext>, token: String, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = make_router(ctx, &token);

    log::info!("Starting web server on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

// GET /, liveness check.
async fn home_handler() -> &'static str {
    HOME_MESSAGE
}

// POST /{token}, receives one update from Telegram.
async fn update_handler(
    State(state): State<ServerState>,
    Path(token): Path<String>,
    body: Bytes,
) -> Response {
    if token != *state.token {
        log::warn!("Rejected update posted to an unknown path");
        return StatusCode::NOT_FOUND.into_response();
    }

    let update = match serde_json::from_slice::<Update>(&body) {
        Ok(update) => update,
        Err(err) => {
            log::error!("Error processing update: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "ERROR").into_response();
        }
    };

    if let Err(err) = dispatch_update(&state.ctx, update).await {
        log::error!("Failed to handle update: {err}");
    }

    (StatusCode::OK, "OK").into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use chrono::Duration;
    use teloxide::types::ChatId;
    use tower::ServiceExt;

    use super::*;
    use crate::bot::{messenger::testing::RecordingMessenger, store::Store};

    const TOKEN: &str = "123:abc";

    fn make_app() -> (Router, Arc<RecordingMessenger>) {
        let messenger = Arc::new(RecordingMessenger::default());
        let ctx = Arc::new(BotContext {
            store: Store::new(),
            messenger: messenger.clone(),
            admin_id: ChatId(555),
            bot_username: "PawsBot".to_string(),
            pending_timeout: Duration::seconds(600),
        });
        (make_router(ctx, TOKEN), messenger)
    }

    fn post_update(path: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    const START_UPDATE: &str = r#"{
        "update_id": 7,
        "message": {
            "message_id": 1,
            "date": 1700000000,
            "chat": {"id": 42, "type": "private", "first_name": "Paws"},
            "from": {"id": 42, "is_bot": false, "first_name": "Paws"},
            "text": "/start",
            "entities": [{"type": "bot_command", "offset": 0, "length": 6}]
        }
    }"#;

    #[tokio::test]
    async fn test_home() {
        let (app, _) = make_app();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, "Bot is Running!");
    }

    #[tokio::test]
    async fn test_update_is_dispatched() {
        let (app, messenger) = make_app();
        let response = app
            .oneshot(post_update("/123:abc", START_UPDATE))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, "OK");
        assert_eq!(messenger.sent_to(ChatId(42)).len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_token_is_rejected() {
        let (app, messenger) = make_app();
        let response = app
            .oneshot(post_update("/999:zzz", START_UPDATE))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_update() {
        let (app, messenger) = make_app();
        let response = app
            .oneshot(post_update("/123:abc", "{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_body(response).await, "ERROR");
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_handler_failure_still_acknowledged() {
        let messenger = Arc::new(RecordingMessenger::failing_for(ChatId(42)));
        let ctx = Arc::new(BotContext {
            store: Store::new(),
            messenger: messenger.clone(),
            admin_id: ChatId(555),
            bot_username: "PawsBot".to_string(),
            pending_timeout: Duration::seconds(600),
        });
        let app = make_router(ctx, TOKEN);

        let response = app
            .oneshot(post_update("/123:abc", START_UPDATE))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, "OK");
    }
}
