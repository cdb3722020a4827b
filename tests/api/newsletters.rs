use reqwest::StatusCode;

use serde_json::{json, Value};

use sqlx::PgPool;

use uuid::Uuid;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use telliarch::domain::{Audience, ServiceName};
use telliarch::repo::{SubscriptionRepo, UserRole};

use crate::helpers::{TestApp, TestUser};

fn newsletter() -> Value {
    json!({
        "subject": "Newsletter Title",
        "content": "First paragraph\nSecond paragraph",
    })
}

async fn subscribe(pool: &PgPool, audience: Audience, email: &str) {
    SubscriptionRepo::insert(pool, audience, &email.parse().unwrap())
        .await
        .expect("Failed to insert test subscriber");
}

async fn history_rows(pool: &PgPool) -> Vec<(i32, Option<String>, Uuid)> {
    sqlx::query_as("select recipient_count, service_filter, sent_by from sent_newsletters")
        .fetch_all(pool)
        .await
        .expect("Failed to fetch sent newsletters")
}

#[sqlx::test]
async fn newsletters_are_delivered_to_active_subscribers(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;

    subscribe(&pool, Audience::Newsletter, "one@test.com").await;
    subscribe(&pool, Audience::Newsletter, "two@test.com").await;
    subscribe(&pool, Audience::Newsletter, "gone@test.com").await;
    sqlx::query("update newsletter_subscribers set is_active = false where email = 'gone@test.com'")
        .execute(&pool)
        .await?;

    Mock::given(path("/emails"))
        .and(method("POST"))
        .and(header("Authorization", "Bearer TestAuthorization"))
        .and(body_partial_json(json!({ "subject": "Newsletter Title" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let res = app
        .send_newsletter(Some(&admin.token(&app)), &newsletter())
        .await
        .expect("Failed to send newsletter");

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        json!({
            "success": true,
            "message": "Newsletter sent to 2 subscribers",
            "sent": 2,
            "failed": 0,
        }),
        body
    );

    let history = history_rows(&pool).await;
    assert_eq!(1, history.len());
    assert_eq!(2, history[0].0);
    assert_eq!(None, history[0].1);
    assert_eq!(admin.id, history[0].2);

    Ok(())
}

#[sqlx::test]
async fn partial_failures_are_reported(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;

    for i in 0..5 {
        subscribe(&pool, Audience::Newsletter, &format!("reader{}@test.com", i)).await;
    }

    for failing in ["reader0@test.com", "reader4@test.com"] {
        Mock::given(body_partial_json(json!({ "to": [failing] })))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .expect(1)
            .mount(&app.email_server)
            .await;
    }
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&app.email_server)
        .await;

    let res = app
        .send_newsletter(Some(&admin.token(&app)), &newsletter())
        .await
        .unwrap();

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(3, body["sent"]);
    assert_eq!(2, body["failed"]);
    assert_eq!("Newsletter sent to 3 subscribers, 2 failed", body["message"]);

    let history = history_rows(&pool).await;
    assert_eq!(1, history.len());
    assert_eq!(3, history[0].0);

    Ok(())
}

#[sqlx::test]
async fn delivered_newsletters_are_reported_when_history_fails(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;
    subscribe(&pool, Audience::Newsletter, "reader@test.com").await;

    sqlx::query("alter table sent_newsletters rename to sent_newsletters_moved")
        .execute(&pool)
        .await?;

    Mock::given(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .send_newsletter(Some(&admin.token(&app)), &newsletter())
        .await
        .unwrap();

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(1, body["sent"]);
    assert_eq!(0, body["failed"]);

    Ok(())
}

#[sqlx::test]
async fn service_filter_limits_recipients(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;

    let hr = Audience::Service(ServiceName::HumanResourceManagement);
    subscribe(&pool, hr, "hr@test.com").await;
    subscribe(&pool, Audience::Newsletter, "global@test.com").await;
    subscribe(
        &pool,
        Audience::Service(ServiceName::FinancialManagement),
        "finance@test.com",
    )
    .await;

    Mock::given(body_partial_json(json!({ "to": ["hr@test.com"] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let mut body = newsletter();
    body["serviceFilter"] = json!("Human Resource Management");
    let res = app
        .send_newsletter(Some(&admin.token(&app)), &body)
        .await
        .unwrap();

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(1, body["sent"]);

    let history = history_rows(&pool).await;
    assert_eq!(Some("Human Resource Management".to_string()), history[0].1);

    Ok(())
}

#[sqlx::test]
async fn empty_audience_is_a_bad_request(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let res = app
        .send_newsletter(Some(&admin.token(&app)), &newsletter())
        .await
        .unwrap();

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("No subscribers found", body["error"]);
    assert!(history_rows(&pool).await.is_empty());

    Ok(())
}

#[sqlx::test]
async fn malformed_newsletters_are_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;
    subscribe(&pool, Audience::Newsletter, "reader@test.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        ("Missing Subject", json!({ "content": "Body" })),
        ("Missing Content", json!({ "subject": "Title" })),
        ("Blank Subject", json!({ "subject": "  ", "content": "Body" })),
        (
            "Unknown Filter",
            json!({ "subject": "Title", "content": "Body", "serviceFilter": "Astrology" }),
        ),
    ];
    for (test_name, newsletter) in test_cases {
        let res = app
            .send_newsletter(Some(&admin.token(&app)), &newsletter)
            .await
            .expect("Failed to send request to create newsletter");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", test_name);
    }

    Ok(())
}

#[sqlx::test]
async fn requests_without_a_token_are_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    subscribe(&pool, Audience::Newsletter, "reader@test.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let res = app.send_newsletter(None, &newsletter()).await.unwrap();

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("Unauthorized", body["error"]);

    Ok(())
}

#[sqlx::test]
async fn forged_or_expired_tokens_are_rejected(pool: PgPool) -> sqlx::Result<()> {
    use telliarch::crypto::{SessionToken, SigningKey};

    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;
    subscribe(&pool, Audience::Newsletter, "reader@test.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let other_key = SigningKey::new(&secrecy::Secret::new("another-key".into())).unwrap();
    let forged = SessionToken::issue(other_key.as_ref(), admin.id, chrono::Duration::hours(1))
        .unwrap();
    let expired = SessionToken::issue(
        app.signing_key.as_ref(),
        admin.id,
        chrono::Duration::hours(-1),
    )
    .unwrap();

    let test_cases = vec![
        ("Forged", forged.as_ref().to_string()),
        ("Expired", expired.as_ref().to_string()),
        ("Garbage", "not-a-token".to_string()),
    ];
    for (test_name, token) in test_cases {
        let res = app
            .send_newsletter(Some(&token), &newsletter())
            .await
            .unwrap();

        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "{}", test_name);
    }

    Ok(())
}

#[sqlx::test]
async fn non_admins_are_forbidden(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let user = TestUser::register(&pool, UserRole::User).await;
    subscribe(&pool, Audience::Newsletter, "reader@test.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let res = app
        .send_newsletter(Some(&user.token(&app)), &newsletter())
        .await
        .unwrap();

    assert_eq!(StatusCode::FORBIDDEN, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("Admin access required", body["error"]);
    assert!(history_rows(&pool).await.is_empty());

    Ok(())
}

#[sqlx::test]
async fn history_lists_recent_broadcasts(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = TestUser::admin(&pool).await;
    subscribe(&pool, Audience::Newsletter, "reader@test.com").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    let token = admin.token(&app);
    app.send_newsletter(Some(&token), &newsletter()).await.unwrap();

    let res = app.sent_newsletters(Some(&token)).await.unwrap();
    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    let entries = body.as_array().expect("History is not a list");
    assert_eq!(1, entries.len());
    assert_eq!("Newsletter Title", entries[0]["subject"]);
    assert_eq!(1, entries[0]["recipient_count"]);

    let res = app.sent_newsletters(None).await.unwrap();
    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    Ok(())
}
