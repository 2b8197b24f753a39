use std::{collections::BTreeMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use url::Url;

use crate::{
    auth::{Auth, Region},
    client::{default_endpoint, parse_endpoint, Handle},
    error::{Error, Result},
    transport::{HttpSend, ReqwestTransport},
    types::{DeleteMessageOutput, ReceivedMessage, SendMessageOutput},
    util,
};

const SERVICE: &str = "sqs";
const VERSION: &str = "2012-11-05";

/// Client for a small subset of the SQS Query API: `SendMessage`,
/// `ReceiveMessage`, and `DeleteMessage`, with lazy `GetQueueUrl`
/// resolution.
#[derive(Clone)]
pub struct SqsClient {
    inner: Arc<SqsInner>,
}

struct SqsInner {
    handle: Handle,
    account_id: String,
    // Queue URLs never change for the life of a client; a racing second
    // resolution overwrites with the same value.
    queue_urls: Mutex<BTreeMap<String, Url>>,
}

pub struct SqsClientBuilder {
    region: Region,
    account_id: String,
    auth: Auth,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpSend>>,
}

impl SqsClient {
    pub fn builder(
        region: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Result<SqsClientBuilder> {
        let account_id = account_id.into();
        if account_id.trim().is_empty() {
            return Err(Error::invalid_config("account_id must not be empty"));
        }

        Ok(SqsClientBuilder {
            region: Region::new(region)?,
            account_id,
            auth: Auth::Anonymous,
            endpoint: None,
            timeout: None,
            user_agent: None,
            transport: None,
        })
    }

    /// Sends a message body to the named queue.
    pub fn send_message(
        &self,
        queue: impl Into<String>,
        body: impl Into<String>,
    ) -> SendMessageRequest {
        SendMessageRequest {
            client: self.clone(),
            queue: queue.into(),
            body: body.into(),
            delay_seconds: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Receives up to `max_messages` messages from the named queue,
    /// long-polling for `wait_time` seconds.
    pub fn receive_messages(&self, queue: impl Into<String>) -> ReceiveMessageRequest {
        ReceiveMessageRequest {
            client: self.clone(),
            queue: queue.into(),
            max_messages: 1,
            wait_time: 0,
            visibility_timeout: None,
        }
    }

    /// Deletes one delivery of a message, identified by its receipt
    /// handle.
    pub fn delete_message(
        &self,
        queue: impl Into<String>,
        receipt_handle: impl Into<String>,
    ) -> DeleteMessageRequest {
        DeleteMessageRequest {
            client: self.clone(),
            queue: queue.into(),
            receipt_handle: receipt_handle.into(),
        }
    }

    /// Resolves a queue name to its URL, issuing `GetQueueUrl` on first
    /// use and serving the cached URL afterwards.
    async fn queue_url(&self, queue: &str) -> Result<Url> {
        {
            let urls = self.inner.queue_urls.lock();
            if let Some(url) = urls.get(queue) {
                return Ok(url.clone());
            }
        }

        let params = vec![
            ("QueueName".to_string(), queue.to_string()),
            (
                "QueueOwnerAWSAccountId".to_string(),
                self.inner.account_id.clone(),
            ),
        ];
        let body = self
            .inner
            .handle
            .execute(&self.inner.handle.endpoint, "GetQueueUrl", params)
            .await?;
        let raw = util::xml::parse_get_queue_url(&body)?;
        let url = Url::parse(&raw)
            .map_err(|_| Error::decode("GetQueueUrl returned an invalid queue URL", None))?;

        self.inner
            .queue_urls
            .lock()
            .insert(queue.to_string(), url.clone());
        Ok(url)
    }
}

impl SqsClientBuilder {
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Overrides the derived regional endpoint, e.g. for a LocalStack
    /// instance.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn transport(mut self, transport: Arc<dyn HttpSend>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<SqsClient> {
        let endpoint = match &self.endpoint {
            Some(raw) => parse_endpoint(raw)?,
            None => default_endpoint(SERVICE, &self.region)?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.user_agent, self.timeout)?),
        };

        Ok(SqsClient {
            inner: Arc::new(SqsInner {
                handle: Handle {
                    endpoint,
                    region: self.region,
                    auth: self.auth,
                    service: SERVICE,
                    version: VERSION,
                    transport,
                },
                account_id: self.account_id,
                queue_urls: Mutex::new(BTreeMap::new()),
            }),
        })
    }
}

pub struct SendMessageRequest {
    client: SqsClient,
    queue: String,
    body: String,
    delay_seconds: Option<u32>,
    attributes: BTreeMap<String, String>,
}

impl SendMessageRequest {
    /// Delays delivery of the message by up to 900 seconds.
    pub fn delay_seconds(mut self, seconds: u32) -> Self {
        self.delay_seconds = Some(seconds);
        self
    }

    /// Attaches a string message attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub async fn send(self) -> Result<SendMessageOutput> {
        let url = self.client.queue_url(&self.queue).await?;

        let mut params = vec![("MessageBody".to_string(), self.body)];
        if let Some(seconds) = self.delay_seconds {
            params.push(("DelaySeconds".to_string(), seconds.to_string()));
        }
        for (idx, (name, value)) in self.attributes.into_iter().enumerate() {
            let prefix = format!("MessageAttribute.{}", idx + 1);
            params.push((format!("{prefix}.Name"), name));
            params.push((format!("{prefix}.Value.DataType"), "String".to_string()));
            params.push((format!("{prefix}.Value.StringValue"), value));
        }

        let body = self
            .client
            .inner
            .handle
            .execute(&url, "SendMessage", params)
            .await?;
        util::xml::parse_send_message(&body)
    }
}

pub struct ReceiveMessageRequest {
    client: SqsClient,
    queue: String,
    max_messages: u32,
    wait_time: u32,
    visibility_timeout: Option<u32>,
}

impl ReceiveMessageRequest {
    /// Requests up to this many messages per call (1 to 10).
    pub fn max_messages(mut self, count: u32) -> Self {
        self.max_messages = count;
        self
    }

    /// Long-polls for up to this many seconds when the queue is empty.
    pub fn wait_time(mut self, seconds: u32) -> Self {
        self.wait_time = seconds;
        self
    }

    /// Hides received messages from other consumers for this many
    /// seconds instead of the queue default.
    pub fn visibility_timeout(mut self, seconds: u32) -> Self {
        self.visibility_timeout = Some(seconds);
        self
    }

    /// Returns the received messages in the order the service reported
    /// them. An empty queue yields an empty vector.
    pub async fn send(self) -> Result<Vec<ReceivedMessage>> {
        let url = self.client.queue_url(&self.queue).await?;

        let mut params = vec![
            ("AttributeName".to_string(), "All".to_string()),
            (
                "MaxNumberOfMessages".to_string(),
                self.max_messages.to_string(),
            ),
            ("WaitTimeSeconds".to_string(), self.wait_time.to_string()),
        ];
        if let Some(seconds) = self.visibility_timeout {
            params.push(("VisibilityTimeout".to_string(), seconds.to_string()));
        }

        let body = self
            .client
            .inner
            .handle
            .execute(&url, "ReceiveMessage", params)
            .await?;
        util::xml::parse_receive_message(&body)
    }
}

pub struct DeleteMessageRequest {
    client: SqsClient,
    queue: String,
    receipt_handle: String,
}

impl DeleteMessageRequest {
    pub async fn send(self) -> Result<DeleteMessageOutput> {
        let url = self.client.queue_url(&self.queue).await?;

        let params = vec![("ReceiptHandle".to_string(), self.receipt_handle)];
        let body = self
            .client
            .inner
            .handle
            .execute(&url, "DeleteMessage", params)
            .await?;
        util::xml::parse_delete_message(&body)
    }
}
