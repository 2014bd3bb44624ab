//! Downstream accounts service for trying the gateway locally.
//!
//! ```text
//! cargo run --example accounts_service
//! cargo run
//! curl 'http://127.0.0.1:8072/mybank/accounts/api/fetchCustomerDetails?mobileNumber=4354437687'
//! ```

use axum::extract::Query;
use axum::{routing::get, Json, Router};
use clap::Parser;
use mybank_gateway::CorrelationId;
use serde::Deserialize;

#[derive(Parser)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerQuery {
    mobile_number: String,
}

async fn fetch_customer_details(
    correlation_id: CorrelationId,
    Query(query): Query<CustomerQuery>,
) -> Json<serde_json::Value> {
    tracing::info!(correlation_id = %correlation_id, "MyBank correlation id found");
    Json(serde_json::json!({
        "name": "Demo Customer",
        "mobileNumber": query.mobile_number,
        "accountsDto": {
            "accountType": "Savings",
            "branchAddress": "123 Main Street, New York",
        },
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();
    let cli = Cli::parse();

    let app = Router::new().route("/api/fetchCustomerDetails", get(fetch_customer_details));

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    tracing::info!(address = %listener.local_addr()?, "Accounts service listening");
    axum::serve(listener, app).await?;
    Ok(())
}
