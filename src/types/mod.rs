//! Shared request and response types.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Output from an SNS `Subscribe` call.
#[derive(Debug)]
pub struct SubscribeOutput {
    /// Subscription ARN, or the literal `pending confirmation` placeholder
    /// when the endpoint has to confirm first.
    pub subscription_arn: String,
}

/// Output from an SNS `ConfirmSubscription` call.
#[derive(Debug)]
pub struct ConfirmSubscriptionOutput {
    /// ARN of the confirmed subscription.
    pub subscription_arn: String,
}

/// Output from an SNS `Publish` call.
#[derive(Debug)]
pub struct PublishOutput {
    /// Service-assigned message id.
    pub message_id: String,
}

/// Output from an SQS `SendMessage` call.
#[derive(Debug)]
pub struct SendMessageOutput {
    /// Service-assigned message id.
    pub message_id: String,
    /// Hex MD5 of the message body as computed by the service.
    pub md5_of_body: String,
}

impl SendMessageOutput {
    /// Checks the service-reported body digest against a locally computed
    /// one. The client never enforces this; callers opt in.
    pub fn body_md5_matches(&self, body: &str) -> bool {
        crate::util::md5::md5_hex(body.as_bytes()) == self.md5_of_body.to_ascii_lowercase()
    }
}

/// Output from an SQS `DeleteMessage` call.
#[derive(Debug)]
pub struct DeleteMessageOutput {
    /// Request id reported by the service.
    pub request_id: Option<String>,
}

/// A single message delivery returned by SQS `ReceiveMessage`.
#[derive(Debug)]
pub struct ReceivedMessage {
    /// One-time token identifying this delivery; consumed by
    /// `delete_message`.
    pub receipt_handle: String,
    /// Hex MD5 of `body` as computed by the service.
    pub md5_of_body: String,
    /// Opaque message payload.
    pub body: String,
    /// AWS-defined attributes such as receive count and timestamps.
    pub attributes: BTreeMap<String, String>,
}

impl ReceivedMessage {
    /// Checks the service-reported body digest against a locally computed
    /// one.
    pub fn body_md5_matches(&self) -> bool {
        crate::util::md5::md5_hex(self.body.as_bytes()) == self.md5_of_body.to_ascii_lowercase()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlErrorResponse {
    #[serde(rename = "Error")]
    pub(crate) error: Option<XmlErrorDetail>,
    #[serde(rename = "RequestId")]
    pub(crate) request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlErrorDetail {
    #[serde(rename = "Code")]
    pub(crate) code: Option<String>,
    #[serde(rename = "Message")]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlSubscribeResponse {
    #[serde(rename = "SubscribeResult")]
    pub(crate) result: XmlSubscribeResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlSubscribeResult {
    #[serde(rename = "SubscriptionArn")]
    pub(crate) subscription_arn: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlConfirmSubscriptionResponse {
    #[serde(rename = "ConfirmSubscriptionResult")]
    pub(crate) result: XmlConfirmSubscriptionResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlConfirmSubscriptionResult {
    #[serde(rename = "SubscriptionArn")]
    pub(crate) subscription_arn: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlPublishResponse {
    #[serde(rename = "PublishResult")]
    pub(crate) result: XmlPublishResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlPublishResult {
    #[serde(rename = "MessageId")]
    pub(crate) message_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlGetQueueUrlResponse {
    #[serde(rename = "GetQueueUrlResult")]
    pub(crate) result: XmlGetQueueUrlResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlGetQueueUrlResult {
    #[serde(rename = "QueueUrl")]
    pub(crate) queue_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlSendMessageResponse {
    #[serde(rename = "SendMessageResult")]
    pub(crate) result: XmlSendMessageResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlSendMessageResult {
    #[serde(rename = "MessageId")]
    pub(crate) message_id: String,
    #[serde(rename = "MD5OfMessageBody")]
    pub(crate) md5_of_message_body: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlReceiveMessageResponse {
    #[serde(rename = "ReceiveMessageResult", default)]
    pub(crate) result: XmlReceiveMessageResult,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct XmlReceiveMessageResult {
    #[serde(rename = "Message", default)]
    pub(crate) messages: Vec<XmlMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlMessage {
    #[serde(rename = "ReceiptHandle")]
    pub(crate) receipt_handle: String,
    #[serde(rename = "MD5OfBody")]
    pub(crate) md5_of_body: String,
    #[serde(rename = "Body")]
    pub(crate) body: String,
    #[serde(rename = "Attribute", default)]
    pub(crate) attributes: Vec<XmlNameValuePair>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlNameValuePair {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Value")]
    pub(crate) value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlDeleteMessageResponse {
    #[serde(rename = "ResponseMetadata")]
    pub(crate) response_metadata: Option<XmlResponseMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct XmlResponseMetadata {
    #[serde(rename = "RequestId")]
    pub(crate) request_id: Option<String>,
}
