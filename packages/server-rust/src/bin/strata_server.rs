//! `strata-server`: serves the API and topic documents plus the gateway
//! routes.
//!
//! ```sh
//! STRATA_PORT=9000 STRATA_LOG_FORMAT=json strata-server
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use strata_server::apidoc::{ApiRegistry, EndpointDescriptor, TopicRegistry};
use strata_server::config::ServerArgs;
use strata_server::network::NetworkModule;
use strata_server::routes::gateway_routes;
use strata_server::telemetry::init_tracing;
use strata_server::unit_of_work::NullUnitOfWork;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.log_format)?;

    let mut network = NetworkModule::new(args.network_config());
    let port = network.start().await?;
    let base_url = args.base_url(port);

    let mut api = ApiRegistry::with_info(&args.api_title, &args.api_version);
    api.add(
        EndpointDescriptor::new(http::Method::GET, "/health")
            .summary("Server health")
            .tag("Ops"),
    )
    .add(
        EndpointDescriptor::new(http::Method::GET, "/health/live")
            .summary("Liveness probe")
            .tag("Ops"),
    );
    let gateways = gateway_routes(Arc::new(NullUnitOfWork::new()), &mut api);
    let topics = TopicRegistry::new();

    info!("Registered endpoints\n{}", api.render_table());
    info!("Registered topics\n{}", topics.render_table());

    let routes = gateways
        .merge(api.publish(&base_url, &args.docs_path))
        .merge(topics.publish(&base_url, &args.topics_path));

    network.serve(routes, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "cannot listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
