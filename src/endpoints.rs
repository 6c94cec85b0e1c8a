//! Typed calls for each backend endpoint.
//!
//! Every call goes through [`ApiGateway`](crate::gateway::ApiGateway), injects the
//! session's `mail` into the body and pins the response shape of its endpoint,
//! adapting server records into the canonical models.

pub mod alert;
pub mod batch;
pub mod product;
pub mod report;
pub mod sensor;
pub mod warehouse;

use serde_json::{Value, json};

pub(crate) fn mail_body(mail: &str) -> Value {
    json!({ "mail": mail })
}
