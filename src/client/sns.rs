use std::{collections::BTreeMap, sync::Arc, time::Duration};

use crate::{
    auth::{Auth, Region},
    client::{default_endpoint, parse_endpoint, Handle},
    error::Result,
    transport::{HttpSend, ReqwestTransport},
    types::{ConfirmSubscriptionOutput, PublishOutput, SubscribeOutput},
    util,
};

const SERVICE: &str = "sns";
const VERSION: &str = "2010-03-31";

/// Client for a small subset of the SNS Query API: `Subscribe`,
/// `ConfirmSubscription`, and `Publish`.
#[derive(Clone)]
pub struct SnsClient {
    inner: Arc<Handle>,
}

pub struct SnsClientBuilder {
    region: Region,
    auth: Auth,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpSend>>,
}

impl SnsClient {
    pub fn builder(region: impl Into<String>) -> Result<SnsClientBuilder> {
        Ok(SnsClientBuilder {
            region: Region::new(region)?,
            auth: Auth::Anonymous,
            endpoint: None,
            timeout: None,
            user_agent: None,
            transport: None,
        })
    }

    /// Subscribes an endpoint to a topic.
    pub fn subscribe(
        &self,
        topic_arn: impl Into<String>,
        protocol: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> SubscribeRequest {
        SubscribeRequest {
            client: self.clone(),
            topic_arn: topic_arn.into(),
            protocol: protocol.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Confirms a pending subscription with the token delivered to the
    /// subscribed endpoint.
    pub fn confirm_subscription(
        &self,
        topic_arn: impl Into<String>,
        token: impl Into<String>,
    ) -> ConfirmSubscriptionRequest {
        ConfirmSubscriptionRequest {
            client: self.clone(),
            topic_arn: topic_arn.into(),
            token: token.into(),
            authenticate_on_unsubscribe: None,
        }
    }

    /// Publishes a message to a topic.
    pub fn publish(
        &self,
        topic_arn: impl Into<String>,
        message: impl Into<String>,
    ) -> PublishRequest {
        PublishRequest {
            client: self.clone(),
            topic_arn: topic_arn.into(),
            message: message.into(),
            subject: None,
            target_arn: None,
            message_structure_json: false,
            attributes: BTreeMap::new(),
        }
    }
}

impl SnsClientBuilder {
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

    pub fn build(self) -> Result<SnsClient> {
        let endpoint = match &self.endpoint {
            Some(raw) => parse_endpoint(raw)?,
            None => default_endpoint(SERVICE, &self.region)?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.user_agent, self.timeout)?),
        };

        Ok(SnsClient {
            inner: Arc::new(Handle {
                endpoint,
                region: self.region,
                auth: self.auth,
                service: SERVICE,
                version: VERSION,
                transport,
            }),
        })
    }
}

pub struct SubscribeRequest {
    client: SnsClient,
    topic_arn: String,
    protocol: String,
    endpoint: String,
}

impl SubscribeRequest {
    pub async fn send(self) -> Result<SubscribeOutput> {
        let params = vec![
            ("TopicArn".to_string(), self.topic_arn),
            ("Protocol".to_string(), self.protocol),
            ("Endpoint".to_string(), self.endpoint),
        ];

        let body = self
            .client
            .inner
            .execute(&self.client.inner.endpoint, "Subscribe", params)
            .await?;
        util::xml::parse_subscribe(&body)
    }
}

pub struct ConfirmSubscriptionRequest {
    client: SnsClient,
    topic_arn: String,
    token: String,
    authenticate_on_unsubscribe: Option<bool>,
}

impl ConfirmSubscriptionRequest {
    /// Requires authentication to unsubscribe the confirmed subscription.
    pub fn authenticate_on_unsubscribe(mut self, value: bool) -> Self {
        self.authenticate_on_unsubscribe = Some(value);
        self
    }

    pub async fn send(self) -> Result<ConfirmSubscriptionOutput> {
        let mut params = vec![
            ("TopicArn".to_string(), self.topic_arn),
            ("Token".to_string(), self.token),
        ];
        if let Some(value) = self.authenticate_on_unsubscribe {
            params.push((
                "AuthenticateOnUnsubscribe".to_string(),
                value.to_string(),
            ));
        }

        let body = self
            .client
            .inner
            .execute(&self.client.inner.endpoint, "ConfirmSubscription", params)
            .await?;
        util::xml::parse_confirm_subscription(&body)
    }
}

pub struct PublishRequest {
    client: SnsClient,
    topic_arn: String,
    message: String,
    subject: Option<String>,
    target_arn: Option<String>,
    message_structure_json: bool,
    attributes: BTreeMap<String, String>,
}

impl PublishRequest {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Publishes to an endpoint ARN instead of the topic given to
    /// `publish`.
    pub fn target_arn(mut self, target_arn: impl Into<String>) -> Self {
        self.target_arn = Some(target_arn.into());
        self
    }

    /// Marks the message body as a JSON document with one payload per
    /// delivery protocol.
    pub fn message_structure_json(mut self) -> Self {
        self.message_structure_json = true;
        self
    }

    /// Attaches a string message attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub async fn send(self) -> Result<PublishOutput> {
        let mut params = vec![("Message".to_string(), self.message)];
        match self.target_arn {
            Some(target_arn) => params.push(("TargetArn".to_string(), target_arn)),
            None => params.push(("TopicArn".to_string(), self.topic_arn)),
        }
        if let Some(subject) = self.subject {
            params.push(("Subject".to_string(), subject));
        }
        if self.message_structure_json {
            params.push(("MessageStructure".to_string(), "json".to_string()));
        }
        for (idx, (name, value)) in self.attributes.into_iter().enumerate() {
            let prefix = format!("MessageAttributes.entry.{}", idx + 1);
            params.push((format!("{prefix}.Name"), name));
            params.push((format!("{prefix}.Value.DataType"), "String".to_string()));
            params.push((format!("{prefix}.Value.StringValue"), value));
        }

        let body = self
            .client
            .inner
            .execute(&self.client.inner.endpoint, "Publish", params)
            .await?;
        util::xml::parse_publish(&body)
    }
}
