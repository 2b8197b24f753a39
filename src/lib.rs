//! A lean SNS/SQS client for Rust.
//!
//! ## Quick start
//!
//! ```no_run
//! # async fn demo() -> Result<(), awsmq::Error> {
//! use awsmq::{Auth, SnsClient, SqsClient};
//!
//! let sns = SnsClient::builder("eu-west-1")?
//!     .auth(Auth::from_env()?)
//!     .build()?;
//! let published = sns
//!     .publish("arn:aws:sns:eu-west-1:123456789012:orders", "hello")
//!     .send()
//!     .await?;
//! println!("published {}", published.message_id);
//!
//! let sqs = SqsClient::builder("eu-west-1", "123456789012")?
//!     .auth(Auth::from_env()?)
//!     .build()?;
//! let sent = sqs.send_message("orders", "hello").send().await?;
//! println!("sent {}", sent.message_id);
//!
//! let received = sqs.receive_messages("orders").wait_time(20).send().await?;
//! for msg in &received {
//!     sqs.delete_message("orders", msg.receipt_handle.as_str())
//!         .send()
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Each call issues exactly one signed HTTP request; errors from the
//! transport and from the service surface unchanged as [`Error`]. The
//! client never retries.

#[cfg(all(
    feature = "rustls",
    feature = "native-tls",
    not(feature = "allow-both-tls")
))]
compile_error!("Enable only one of: rustls, native-tls.");

/// Shared request/response types.
pub mod types;

mod auth;
mod client;
mod error;
mod transport;
mod util;

pub use auth::{Auth, Credentials, Region};
pub use client::{
    ConfirmSubscriptionRequest, DeleteMessageRequest, PublishRequest, ReceiveMessageRequest,
    SendMessageRequest, SnsClient, SnsClientBuilder, SqsClient, SqsClientBuilder, SubscribeRequest,
};
pub use error::{Error, Result};
