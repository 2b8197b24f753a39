//! Integration tests against a LocalStack-compatible endpoint.
//!
//! Skipped unless `AWSMQ_TEST_ENDPOINT` and the AWS credential variables
//! are set. The SQS round trip needs an existing queue (name via
//! `AWSMQ_TEST_QUEUE`, default `awsmq-test`); the SNS test additionally
//! needs `AWSMQ_TEST_TOPIC_ARN`.

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use awsmq::{Auth, Error, SnsClient, SqsClient};

struct TestConfig {
    endpoint: String,
    region: String,
    account_id: String,
    auth: Auth,
}

fn load_config() -> Option<TestConfig> {
    let endpoint = env::var("AWSMQ_TEST_ENDPOINT").ok()?;
    let region = env::var("AWSMQ_TEST_REGION").unwrap_or_else(|_| "us-east-1".to_string());
    let account_id =
        env::var("AWSMQ_TEST_ACCOUNT_ID").unwrap_or_else(|_| "000000000000".to_string());
    let auth = Auth::from_env().ok()?;

    Some(TestConfig {
        endpoint,
        region,
        account_id,
        auth,
    })
}

fn unique_body(prefix: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{prefix}-{now}")
}

#[tokio::test]
async fn sqs_send_receive_delete_round_trip() -> Result<(), Error> {
    let Some(cfg) = load_config() else {
        return Ok(());
    };
    let queue = env::var("AWSMQ_TEST_QUEUE").unwrap_or_else(|_| "awsmq-test".to_string());

    let sqs = SqsClient::builder(cfg.region.as_str(), cfg.account_id.as_str())?
        .auth(cfg.auth.clone())
        .endpoint(cfg.endpoint.as_str())
        .build()?;

    let body = unique_body("hello");
    let sent = sqs
        .send_message(queue.as_str(), body.as_str())
        .attribute("suite", "integration")
        .send()
        .await?;
    assert!(!sent.message_id.is_empty());
    assert!(sent.body_md5_matches(&body));

    let mut deleted = false;
    for _ in 0..5 {
        let received = sqs
            .receive_messages(queue.as_str())
            .max_messages(10)
            .wait_time(5)
            .send()
            .await?;

        if let Some(msg) = received.iter().find(|m| m.body == body) {
            assert!(msg.body_md5_matches());
            sqs.delete_message(queue.as_str(), msg.receipt_handle.as_str())
                .send()
                .await?;
            deleted = true;
            break;
        }
    }
    assert!(deleted, "message was not received within the polling window");

    Ok(())
}

#[tokio::test]
async fn sqs_unknown_queue_reports_api_error() -> Result<(), Error> {
    let Some(cfg) = load_config() else {
        return Ok(());
    };

    let sqs = SqsClient::builder(cfg.region.as_str(), cfg.account_id.as_str())?
        .auth(cfg.auth.clone())
        .endpoint(cfg.endpoint.as_str())
        .build()?;

    let err = sqs
        .send_message("awsmq-no-such-queue", "hello")
        .send()
        .await
        .unwrap_err();

    match err {
        Error::Api { code, .. } => {
            assert!(code.unwrap_or_default().contains("NonExistentQueue"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn sns_publish_returns_message_id() -> Result<(), Error> {
    let Some(cfg) = load_config() else {
        return Ok(());
    };
    let Ok(topic_arn) = env::var("AWSMQ_TEST_TOPIC_ARN") else {
        return Ok(());
    };

    let sns = SnsClient::builder(cfg.region.as_str())?
        .auth(cfg.auth.clone())
        .endpoint(cfg.endpoint.as_str())
        .build()?;

    let out = sns
        .publish(topic_arn.as_str(), unique_body("integration").as_str())
        .subject("awsmq integration")
        .send()
        .await?;
    assert!(!out.message_id.is_empty());

    Ok(())
}
