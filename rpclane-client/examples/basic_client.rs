// Rust Client Example: Basic RPC Calls
// Demonstrates a configured client against a running backend
// - Endpoint from RPC_URL
// - Auth header injected by a request hook
// - Response inspection hook
// - Typed wrappers with date fields
// - Validation error handling and cancellation

use anyhow::Result;
use chrono::NaiveDate;
use rpclane_client::logging::{init_logging, DEFAULT_FILTER};
use rpclane_client::{date, rpc_method, Client, ClientConfig, ClientError};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
struct Params {
    page: i64,
    #[serde(with = "date::wire_option")]
    dob_after: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct UserDetails {
    uid: String,
    name: String,
    #[serde(with = "date::wire")]
    dob: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct Paginated {
    has_next: bool,
    data: Vec<UserDetails>,
}

rpc_method!(fn call_get_users(Params) -> Paginated = "GetUsers");

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(DEFAULT_FILTER)?;

    let mut config = ClientConfig::from_env()?;
    if config.endpoint.is_none() {
        config.endpoint = Some("http://localhost:8000".to_string());
    }
    let config = config
        .with_request_hook(|mut request| {
            if let Err(e) = request.merge_headers([("X-Jwt-Token", "secret")]) {
                tracing::warn!("could not add auth header: {}", e);
            }
            request
        })
        .with_response_hook(|response| {
            info!("response status {}", response.status);
        });

    let client = Client::new(config)?;
    info!("Client configured: {:?}", client.config());

    let params = Params {
        page: 1,
        dob_after: NaiveDate::from_ymd_opt(2000, 1, 1),
    };
    match call_get_users(&client, &params).await {
        Ok(page) => {
            info!("has_next = {}", page.has_next);
            for user in page.data {
                info!("{} {} born {}", user.uid, user.name, user.dob);
            }
        }
        Err(e) => info!("GetUsers failed: {}", e),
    }

    // page 0 violates the server's validation rules
    let invalid = Params {
        page: 0,
        dob_after: None,
    };
    match call_get_users(&client, &invalid).await {
        Err(ClientError::Application(error)) if error.is_validation() => {
            for violation in error.violations() {
                info!("{}: {}", violation.path(), violation.msg);
            }
        }
        other => info!("unexpected outcome: {:?}", other.map(|page| page.has_next)),
    }

    let call = call_get_users(&client, &params);
    call.cancel();
    match call.await {
        Err(e) if e.is_cancelled() => info!("call cancelled before it was sent"),
        other => info!("cancel raced the response: {:?}", other.map(|page| page.has_next)),
    }

    Ok(())
}
