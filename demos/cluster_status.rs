//! Print the cluster version, the pin set and per-peer status of each pin.
//!
//! ```text
//! CLUSTER_API_URL=http://127.0.0.1:9094 cargo run --example cluster_status [CID...]
//! ```
//!
//! `CLUSTER_USER` and `CLUSTER_PASSWORD` enable Basic auth. Logging is controlled
//! with `RUST_LOG`. Ctrl-C cancels whatever call is in flight.

use anyhow::{Context, Result};
use cluster_http_client::{
    CancelToken, ClusterClient, ClusterEndpoint, PinlsOptions, RequestOptions, StatusOptions,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cluster_http_client=debug,info")),
        )
        .init();

    let url = std::env::var("CLUSTER_API_URL").unwrap_or_else(|_| "http://127.0.0.1:9094".into());
    let user = std::env::var("CLUSTER_USER").ok();
    let password = std::env::var("CLUSTER_PASSWORD").ok();

    let endpoint = ClusterEndpoint::with_credentials(&url, user.as_deref(), password.as_deref())
        .with_context(|| format!("bad cluster URL {}", url))?;
    let client = ClusterClient::new(endpoint)?;

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    let version = client
        .version(&RequestOptions::with_cancel(cancel.clone()))
        .await
        .context("fetching cluster version")?;
    println!("cluster {} at {}", version, url);

    let mut cids: Vec<String> = std::env::args().skip(1).collect();
    if cids.is_empty() {
        let pins = client
            .pinls(&PinlsOptions {
                cancel: Some(cancel.clone()),
                ..Default::default()
            })
            .await
            .context("listing pins")?;
        cids = pins.into_iter().map(|p| p.cid).collect();
    }

    let options = StatusOptions {
        cancel: Some(cancel.clone()),
        ..Default::default()
    };
    for cid in cids {
        match client.status(&cid, &options).await {
            Ok(status) => {
                println!("{} {}", status.cid, status.name);
                for (peer, info) in &status.peer_map {
                    let error = info.error.as_deref().filter(|e| !e.is_empty());
                    match error {
                        Some(error) => println!("  {} ({}): {} [{}]", peer, info.peer_name, info.status, error),
                        None => println!("  {} ({}): {}", peer, info.peer_name, info.status),
                    }
                }
            }
            Err(e) if e.is_cancelled() => break,
            Err(e) if e.is_not_found() => println!("{} not pinned", cid),
            Err(e) => return Err(e).with_context(|| format!("status of {}", cid)),
        }
    }

    Ok(())
}
