//! Exercises the client against a local stand-in for the SecondMe service.

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tessera_client::{
    ClientSettings, OAuthApp, SecondMeClient, refresh_if_expired, register_agent,
};
use tessera_core::{Agent, Credentials};
use tessera_error::{ClientErrorKind, TesseraErrorKind};
use tessera_interface::{AgentDirectory, AgentInvoker, collect_text};
use tessera_storage::InMemoryAgentDirectory;

const TOKEN: &str = "tok-1";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn sse_line(text: &str) -> String {
    let payload = json!({ "choices": [{ "delta": { "content": text } }] });
    format!("data: {payload}\n\n")
}

async fn token(Json(body): Json<Value>) -> Json<Value> {
    let grant_type = body["grant_type"].as_str().unwrap_or_default();
    let ok = match grant_type {
        "authorization_code" => body["code"] == "good" && body["redirect_uri"].is_string(),
        "refresh_token" => body["refresh_token"] == "ref-1" && body.get("redirect_uri").is_none(),
        _ => false,
    };
    if ok {
        Json(json!({
            "code": 0,
            "data": { "access_token": TOKEN, "refresh_token": "ref-1", "expires_in": 3600 }
        }))
    } else {
        Json(json!({ "code": 40001, "message": "invalid grant" }))
    }
}

async fn user_info(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "code": 0,
        "data": { "email": "mei@example.com", "name": "Mei", "avatarUrl": "", "route": "mei" }
    }))
    .into_response()
}

async fn shades() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn soft_memory() -> Json<Value> {
    let list: Vec<Value> = (0..12)
        .map(|i| json!({ "id": i, "content": format!("memory {i}") }))
        .collect();
    Json(json!({ "code": 0, "data": { "list": list } }))
}

async fn act(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let control = body["actionControl"].as_str().unwrap_or_default().to_string();
    format!(
        "{}{}data: [DONE]\n\n",
        sse_line("{\"echo\": "),
        sse_line(&format!("\"{}\"}}", control))
    )
    .into_response()
}

async fn chat() -> StatusCode {
    StatusCode::UNAUTHORIZED
}

async fn add_note(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["content"], "remember this");
    Json(json!({ "code": 0, "data": { "noteId": 77 } }))
}

async fn spawn_service() -> anyhow::Result<String> {
    let app = Router::new()
        .route("/api/secondme/oauth/token", post(token))
        .route("/api/secondme/user/info", get(user_info))
        .route("/api/secondme/user/shades", get(shades))
        .route("/api/secondme/user/softmemory", get(soft_memory))
        .route("/api/secondme/act/stream", post(act))
        .route("/api/secondme/chat/stream", post(chat))
        .route("/api/secondme/note/add", post(add_note));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn client() -> anyhow::Result<SecondMeClient> {
    let base_url = spawn_service().await?;
    let settings = ClientSettings::builder().base_url(base_url).build()?;
    Ok(SecondMeClient::new(settings)?.with_oauth(OAuthApp::new(
        "cid",
        "secret",
        "http://localhost:3000/api/auth/callback",
    )))
}

#[tokio::test]
async fn test_act_stream_decodes_tokens() -> anyhow::Result<()> {
    let client = client().await?;
    let stream = client.act(TOKEN, "hello", "shape").await?;
    let text = collect_text(stream).await?;
    assert_eq!(text, r#"{"echo": "shape"}"#);
    Ok(())
}

#[tokio::test]
async fn test_non_success_status_is_api_error() -> anyhow::Result<()> {
    let client = client().await?;
    let err = match client.chat(TOKEN, "hello").await {
        Ok(_) => anyhow::bail!("expected an error"),
        Err(e) => e,
    };
    match err.kind() {
        TesseraErrorKind::Client(e) => {
            assert!(matches!(e.kind, ClientErrorKind::Api { status: 401, .. }))
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_envelope_failure_is_reported() -> anyhow::Result<()> {
    let client = client().await?;
    let err = client.exchange_code("bad").await.unwrap_err();
    match err.kind() {
        TesseraErrorKind::Client(e) => assert!(matches!(
            e.kind,
            ClientErrorKind::Envelope { code: 40001, .. }
        )),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_refresh_omits_redirect_uri() -> anyhow::Result<()> {
    let client = client().await?;
    let grant = client.refresh_access_token("ref-1").await?;
    assert_eq!(grant.access_token(), TOKEN);
    Ok(())
}

#[tokio::test]
async fn test_exchange_requires_oauth_app() -> anyhow::Result<()> {
    let client = SecondMeClient::new(ClientSettings::default())?;
    let err = client.exchange_code("good").await.unwrap_err();
    match err.kind() {
        TesseraErrorKind::Client(e) => {
            assert!(matches!(e.kind, ClientErrorKind::MissingCredentials(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_add_note_returns_id() -> anyhow::Result<()> {
    let client = client().await?;
    assert_eq!(client.add_note(TOKEN, "remember this").await?, 77);
    Ok(())
}

#[tokio::test]
async fn test_register_agent_tolerates_missing_shades() -> anyhow::Result<()> {
    let client = client().await?;
    let directory = InMemoryAgentDirectory::new();

    let agent = register_agent(&client, &directory, "good").await?;
    assert_eq!(agent.id(), "mei");
    assert_eq!(agent.name(), "Mei");
    assert!(agent.shades().is_empty());
    assert_eq!(agent.memory_snippets().len(), 10);
    assert_eq!(*agent.credits(), 3);
    assert_eq!(agent.access_token(), TOKEN);
    assert!(directory.get("mei").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_register_agent_preserves_returning_credits() -> anyhow::Result<()> {
    let client = client().await?;
    let directory = InMemoryAgentDirectory::new();

    let first = register_agent(&client, &directory, "good").await?;
    directory.upsert(first.clone().with_credits(9u32)).await?;
    let second = register_agent(&client, &directory, "good").await?;

    assert_eq!(*second.credits(), 9);
    assert_eq!(second.joined_at(), first.joined_at());
    Ok(())
}

fn agent_with_token(refresh_token: &str, expires_at: chrono::DateTime<Utc>) -> Agent {
    Agent::builder()
        .id("mei")
        .name("Mei")
        .credentials(Credentials::new("stale", refresh_token, expires_at))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_expired_agent_gets_fresh_token() -> anyhow::Result<()> {
    let client = client().await?;
    let now = Utc::now();
    let agent = agent_with_token("ref-1", now - Duration::minutes(5));

    let agent = refresh_if_expired(&client, agent, now).await?;

    assert_eq!(agent.access_token(), TOKEN);
    assert_eq!(agent.credentials().refresh_token(), "ref-1");
    assert_eq!(*agent.credentials().expires_at(), now + Duration::seconds(3600));
    assert!(!agent.credentials().is_expired_at(now));
    Ok(())
}

#[tokio::test]
async fn test_valid_token_is_left_alone() -> anyhow::Result<()> {
    // No OAuth app: any refresh attempt would fail.
    let client = SecondMeClient::new(ClientSettings::default())?;
    let now = Utc::now();
    let agent = agent_with_token("ref-1", now + Duration::hours(1));

    let same = refresh_if_expired(&client, agent.clone(), now).await?;
    assert_eq!(same, agent);
    Ok(())
}

#[tokio::test]
async fn test_rejected_refresh_is_an_error() -> anyhow::Result<()> {
    let client = client().await?;
    let now = Utc::now();
    let agent = agent_with_token("revoked", now - Duration::minutes(5));

    let err = refresh_if_expired(&client, agent, now).await.unwrap_err();
    assert!(matches!(err.kind(), TesseraErrorKind::Client(_)));
    Ok(())
}
