mod sns;
mod sqs;

pub use sns::{
    ConfirmSubscriptionRequest, PublishRequest, SnsClient, SnsClientBuilder, SubscribeRequest,
};
pub use sqs::{
    DeleteMessageRequest, ReceiveMessageRequest, SendMessageRequest, SqsClient, SqsClientBuilder,
};

use std::sync::Arc;

use http::Method;
use time::OffsetDateTime;
use url::Url;

use crate::{
    auth::{Auth, Region},
    error::{Error, Result},
    transport::HttpSend,
    util,
};

/// Shared per-client state and the single request path both service
/// clients go through.
pub(crate) struct Handle {
    pub(crate) endpoint: Url,
    pub(crate) region: Region,
    pub(crate) auth: Auth,
    pub(crate) service: &'static str,
    pub(crate) version: &'static str,
    pub(crate) transport: Arc<dyn HttpSend>,
}

impl Handle {
    /// One round trip: common parameters, signing, send, status check.
    /// Returns the raw response body for the caller to parse.
    pub(crate) async fn execute(
        &self,
        url: &Url,
        action: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<String> {
        params.push(("Action".to_string(), action.to_string()));
        params.push(("Version".to_string(), self.version.to_string()));

        #[cfg(feature = "tracing")]
        let _guard = tracing::info_span!(
            "awsmq.request",
            service = self.service,
            action,
            host = url.host_str().unwrap_or(""),
        )
        .entered();

        let query = match self.auth.credentials() {
            Some(creds) => {
                let now = OffsetDateTime::now_utc();
                let signed = util::signing::sign_query(
                    &Method::GET,
                    url,
                    &params,
                    util::signing::SigV4Params::new(&self.region, self.service, creds, now),
                )?;
                util::encode::canonical_query_string(&signed)
            }
            None => util::encode::canonical_query_string(&params),
        };

        let mut url = url.clone();
        url.set_query(Some(&query));

        let resp = self.transport.send(Method::GET, url).await?;
        if !resp.status.is_success() {
            return Err(util::xml::api_error(resp.status, &resp.body));
        }

        Ok(resp.body)
    }
}

pub(crate) fn default_endpoint(service: &str, region: &Region) -> Result<Url> {
    let raw = format!("https://{service}.{}.amazonaws.com/", region.as_str());
    Url::parse(&raw).map_err(|_| Error::invalid_config("region does not form a valid endpoint"))
}

pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let endpoint = Url::parse(endpoint)
        .map_err(|_| Error::invalid_config("endpoint must be a valid absolute URL"))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(Error::invalid_config(
            "endpoint scheme must be http or https",
        ));
    }
    if endpoint.host_str().is_none() {
        return Err(Error::invalid_config("endpoint must include host"));
    }
    if endpoint.query().is_some() || endpoint.fragment().is_some() {
        return Err(Error::invalid_config(
            "endpoint must not include query or fragment",
        ));
    }
    if endpoint.path() != "/" && !endpoint.path().is_empty() {
        return Err(Error::invalid_config("endpoint must not include a path"));
    }

    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_regional_endpoints() {
        let region = Region::new("eu-west-1").unwrap();
        let url = default_endpoint("sns", &region).unwrap();
        assert_eq!(url.as_str(), "https://sns.eu-west-1.amazonaws.com/");
    }

    #[test]
    fn validates_endpoint_overrides() {
        assert!(parse_endpoint("http://localhost:4566").is_ok());
        assert!(parse_endpoint("https://sqs.example.com/").is_ok());

        assert!(parse_endpoint("not a url").is_err());
        assert!(parse_endpoint("ftp://example.com").is_err());
        assert!(parse_endpoint("http://example.com/path").is_err());
        assert!(parse_endpoint("http://example.com/?x=1").is_err());
    }
}
