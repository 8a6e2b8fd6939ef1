use anyhow::Result;
use chatgate::cli::{actions, start, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = start()?;

    let result = actions::execute(action, &globals).await;

    telemetry::shutdown_tracer();

    result
}
