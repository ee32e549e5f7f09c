mod common;

use anyhow::Result;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use ignite_api::auth::TokenIssuer;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde_json::Value;

async fn whoami(auth_header: Option<String>) -> Result<reqwest::Response> {
    let server = common::ensure_server().await?;
    let mut req = reqwest::Client::new().get(server.url("/api/v1/auth/whoami"));
    if let Some(value) = auth_header {
        req = req.header(AUTHORIZATION, value);
    }
    Ok(req.send().await?)
}

async fn assert_unauthorized(res: reqwest::Response) -> Result<Value> {
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(body)
}

#[tokio::test]
async fn whoami_echoes_token_identity() -> Result<()> {
    let token = common::issuer().issue(42, "ada@example.com")?;

    let res = whoami(Some(common::bearer(&token))).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user_id"], 42);
    assert_eq!(body["data"]["email"], "ada@example.com");
    Ok(())
}

#[tokio::test]
async fn missing_header_is_unauthorized() -> Result<()> {
    let body = assert_unauthorized(whoami(None).await?).await?;
    assert_eq!(body["error"], "Authorization header is required");
    Ok(())
}

#[tokio::test]
async fn non_bearer_header_is_unauthorized() -> Result<()> {
    let token = common::issuer().issue(1, "a@b.co")?;
    let body = assert_unauthorized(whoami(Some(token)).await?).await?;
    assert_eq!(body["error"], "Invalid authorization header format");
    Ok(())
}

#[tokio::test]
async fn tampered_signature_is_unauthorized() -> Result<()> {
    let token = common::issuer().issue(1, "a@b.co")?;
    let (head, sig) = token.rsplit_once('.').expect("three-part token");
    let mut bytes = URL_SAFE_NO_PAD.decode(sig)?;
    bytes[0] ^= 0x01;
    let tampered = format!("{}.{}", head, URL_SAFE_NO_PAD.encode(bytes));

    let body = assert_unauthorized(whoami(Some(common::bearer(&tampered))).await?).await?;
    assert_eq!(body["error"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_unauthorized() -> Result<()> {
    let issued = Utc::now() - Duration::hours(25);
    let token = common::issuer().issue_at(1, "a@b.co", issued)?;

    assert_unauthorized(whoami(Some(common::bearer(&token))).await?).await?;
    Ok(())
}

#[tokio::test]
async fn foreign_secret_is_unauthorized() -> Result<()> {
    let token = TokenIssuer::new(b"some-other-secret").issue(1, "a@b.co")?;

    assert_unauthorized(whoami(Some(common::bearer(&token))).await?).await?;
    Ok(())
}

#[tokio::test]
async fn protected_routes_check_token_before_database() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/v1/settings/1"))
        .send()
        .await?;
    assert_unauthorized(res).await?;
    Ok(())
}
