use http::StatusCode;

use crate::{
    error::Error,
    types::{
        self, ConfirmSubscriptionOutput, DeleteMessageOutput, PublishOutput, ReceivedMessage,
        SendMessageOutput, SubscribeOutput,
    },
};

/// Builds the API error for a non-success Query API response.
///
/// The `<ErrorResponse>` envelope is parsed when present; otherwise the
/// status and a body snippet are all the error carries.
pub(crate) fn api_error(status: StatusCode, body: &str) -> Error {
    let snippet = crate::util::text::truncate_snippet(body, 4096);

    if let Some(parsed) = parse_error_xml(body) {
        let (code, message) = match parsed.error {
            Some(detail) => (detail.code, detail.message),
            None => (None, None),
        };
        return Error::Api {
            status,
            code,
            message,
            request_id: parsed.request_id,
            body_snippet: Some(snippet),
        };
    }

    Error::Api {
        status,
        code: None,
        message: None,
        request_id: None,
        body_snippet: Some(snippet),
    }
}

fn parse_error_xml(body: &str) -> Option<types::XmlErrorResponse> {
    if body.trim().is_empty() {
        return None;
    }

    quick_xml::de::from_str::<types::XmlErrorResponse>(body).ok()
}

pub(crate) fn parse_subscribe(body: &str) -> Result<SubscribeOutput, Error> {
    let parsed = quick_xml::de::from_str::<types::XmlSubscribeResponse>(body)
        .map_err(|e| Error::decode("failed to parse Subscribe XML response", Some(Box::new(e))))?;
    Ok(SubscribeOutput {
        subscription_arn: parsed.result.subscription_arn,
    })
}

pub(crate) fn parse_confirm_subscription(body: &str) -> Result<ConfirmSubscriptionOutput, Error> {
    let parsed = quick_xml::de::from_str::<types::XmlConfirmSubscriptionResponse>(body).map_err(
        |e| {
            Error::decode(
                "failed to parse ConfirmSubscription XML response",
                Some(Box::new(e)),
            )
        },
    )?;
    Ok(ConfirmSubscriptionOutput {
        subscription_arn: parsed.result.subscription_arn,
    })
}

pub(crate) fn parse_publish(body: &str) -> Result<PublishOutput, Error> {
    let parsed = quick_xml::de::from_str::<types::XmlPublishResponse>(body)
        .map_err(|e| Error::decode("failed to parse Publish XML response", Some(Box::new(e))))?;
    Ok(PublishOutput {
        message_id: parsed.result.message_id,
    })
}

pub(crate) fn parse_get_queue_url(body: &str) -> Result<String, Error> {
    let parsed = quick_xml::de::from_str::<types::XmlGetQueueUrlResponse>(body).map_err(|e| {
        Error::decode(
            "failed to parse GetQueueUrl XML response",
            Some(Box::new(e)),
        )
    })?;
    Ok(parsed.result.queue_url)
}

pub(crate) fn parse_send_message(body: &str) -> Result<SendMessageOutput, Error> {
    let parsed = quick_xml::de::from_str::<types::XmlSendMessageResponse>(body).map_err(|e| {
        Error::decode(
            "failed to parse SendMessage XML response",
            Some(Box::new(e)),
        )
    })?;
    Ok(SendMessageOutput {
        message_id: parsed.result.message_id,
        md5_of_body: parsed.result.md5_of_message_body,
    })
}

pub(crate) fn parse_receive_message(body: &str) -> Result<Vec<ReceivedMessage>, Error> {
    let parsed = quick_xml::de::from_str::<types::XmlReceiveMessageResponse>(body).map_err(|e| {
        Error::decode(
            "failed to parse ReceiveMessage XML response",
            Some(Box::new(e)),
        )
    })?;

    Ok(parsed
        .result
        .messages
        .into_iter()
        .map(|m| ReceivedMessage {
            receipt_handle: m.receipt_handle,
            md5_of_body: m.md5_of_body,
            body: m.body,
            attributes: m
                .attributes
                .into_iter()
                .map(|pair| (pair.name, pair.value))
                .collect(),
        })
        .collect())
}

pub(crate) fn parse_delete_message(body: &str) -> Result<DeleteMessageOutput, Error> {
    let parsed = quick_xml::de::from_str::<types::XmlDeleteMessageResponse>(body).map_err(|e| {
        Error::decode(
            "failed to parse DeleteMessage XML response",
            Some(Box::new(e)),
        )
    })?;
    Ok(DeleteMessageOutput {
        request_id: parsed.response_metadata.and_then(|m| m.request_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_response_envelope() {
        let xml = r#"
<ErrorResponse xmlns="http://queue.amazonaws.com/doc/2012-11-05/">
  <Error>
    <Type>Sender</Type>
    <Code>AWS.SimpleQueueService.NonExistentQueue</Code>
    <Message>The specified queue does not exist for this wsdl version.</Message>
  </Error>
  <RequestId>be4e2f10-1c41-5a62-9a1b-21e2c8c1e2a3</RequestId>
</ErrorResponse>
"#;

        let err = api_error(StatusCode::BAD_REQUEST, xml);
        match err {
            Error::Api {
                status,
                code,
                message,
                request_id,
                ..
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(
                    code.as_deref(),
                    Some("AWS.SimpleQueueService.NonExistentQueue")
                );
                assert!(message.unwrap().contains("does not exist"));
                assert_eq!(
                    request_id.as_deref(),
                    Some("be4e2f10-1c41-5a62-9a1b-21e2c8c1e2a3")
                );
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_error_body_still_yields_api_error() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        match err {
            Error::Api {
                status,
                code,
                body_snippet,
                ..
            } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(code, None);
                assert_eq!(body_snippet.as_deref(), Some("<html>oops</html>"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn parses_subscribe_with_pending_confirmation() {
        let xml = r#"
<SubscribeResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  <SubscribeResult>
    <SubscriptionArn>pending confirmation</SubscriptionArn>
  </SubscribeResult>
  <ResponseMetadata>
    <RequestId>a169c740-3766-11df-8963-01868b7c937a</RequestId>
  </ResponseMetadata>
</SubscribeResponse>
"#;

        let out = parse_subscribe(xml).unwrap();
        assert_eq!(out.subscription_arn, "pending confirmation");
    }

    #[test]
    fn parses_publish_message_id() {
        let xml = r#"
<PublishResponse xmlns="http://sns.amazonaws.com/doc/2010-03-31/">
  <PublishResult>
    <MessageId>94f20ce6-13c5-43a0-9a9e-ca52d816e90b</MessageId>
  </PublishResult>
  <ResponseMetadata>
    <RequestId>f187a3c1-376f-11df-8963-01868b7c937a</RequestId>
  </ResponseMetadata>
</PublishResponse>
"#;

        let out = parse_publish(xml).unwrap();
        assert_eq!(out.message_id, "94f20ce6-13c5-43a0-9a9e-ca52d816e90b");
    }

    #[test]
    fn parses_get_queue_url() {
        let xml = r#"
<GetQueueUrlResponse>
  <GetQueueUrlResult>
    <QueueUrl>https://sqs.eu-west-1.amazonaws.com/123456789012/orders</QueueUrl>
  </GetQueueUrlResult>
  <ResponseMetadata>
    <RequestId>470a6f13-2ed9-4181-ad8a-2fdea142988e</RequestId>
  </ResponseMetadata>
</GetQueueUrlResponse>
"#;

        let url = parse_get_queue_url(xml).unwrap();
        assert_eq!(url, "https://sqs.eu-west-1.amazonaws.com/123456789012/orders");
    }

    #[test]
    fn parses_send_message_result() {
        let xml = r#"
<SendMessageResponse>
  <SendMessageResult>
    <MD5OfMessageBody>5d41402abc4b2a76b9719d911017c592</MD5OfMessageBody>
    <MessageId>5fea7756-0ea4-451a-a703-a558b933e274</MessageId>
  </SendMessageResult>
  <ResponseMetadata>
    <RequestId>27daac76-34dd-47df-bd01-1f6e873584a0</RequestId>
  </ResponseMetadata>
</SendMessageResponse>
"#;

        let out = parse_send_message(xml).unwrap();
        assert_eq!(out.message_id, "5fea7756-0ea4-451a-a703-a558b933e274");
        assert_eq!(out.md5_of_body, "5d41402abc4b2a76b9719d911017c592");
        assert!(out.body_md5_matches("hello"));
        assert!(!out.body_md5_matches("other"));
    }

    #[test]
    fn parses_received_messages_with_attributes() {
        let xml = r#"
<ReceiveMessageResponse>
  <ReceiveMessageResult>
    <Message>
      <MessageId>5fea7756-0ea4-451a-a703-a558b933e274</MessageId>
      <ReceiptHandle>MbZj6wDWli+JvwwJaBV+3dcjk2YW2vA3+STFFljT</ReceiptHandle>
      <MD5OfBody>5d41402abc4b2a76b9719d911017c592</MD5OfBody>
      <Body>hello</Body>
      <Attribute>
        <Name>SenderId</Name>
        <Value>195004372649</Value>
      </Attribute>
      <Attribute>
        <Name>ApproximateReceiveCount</Name>
        <Value>5</Value>
      </Attribute>
    </Message>
  </ReceiveMessageResult>
  <ResponseMetadata>
    <RequestId>b6633655-283d-45b4-aee4-4e84e0ae6afa</RequestId>
  </ResponseMetadata>
</ReceiveMessageResponse>
"#;

        let messages = parse_receive_message(xml).unwrap();
        assert_eq!(messages.len(), 1);

        let msg = &messages[0];
        assert_eq!(msg.body, "hello");
        assert_eq!(msg.receipt_handle, "MbZj6wDWli+JvwwJaBV+3dcjk2YW2vA3+STFFljT");
        assert_eq!(msg.md5_of_body, "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(msg.attributes.get("SenderId").unwrap(), "195004372649");
        assert_eq!(
            msg.attributes.get("ApproximateReceiveCount").unwrap(),
            "5"
        );
        assert!(msg.body_md5_matches());
    }

    #[test]
    fn empty_receive_result_parses_to_empty_vec() {
        let xml = r#"
<ReceiveMessageResponse>
  <ReceiveMessageResult/>
  <ResponseMetadata>
    <RequestId>b6633655-283d-45b4-aee4-4e84e0ae6afa</RequestId>
  </ResponseMetadata>
</ReceiveMessageResponse>
"#;

        let messages = parse_receive_message(xml).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn parses_delete_message_request_id() {
        let xml = r#"
<DeleteMessageResponse>
  <ResponseMetadata>
    <RequestId>b5293cb5-d306-4a17-9048-b263635abe42</RequestId>
  </ResponseMetadata>
</DeleteMessageResponse>
"#;

        let out = parse_delete_message(xml).unwrap();
        assert_eq!(
            out.request_id.as_deref(),
            Some("b5293cb5-d306-4a17-9048-b263635abe42")
        );
    }
}
