mod command;
mod config;
mod session;

use anyhow::Context;
use command::CommandExecutor;
use config::SimulatorConfig;
use robot_sim_shared::Robot;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// A single thread: a settling mount or dismount stalls the whole server,
// exactly like the real robot.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Sample-exchange robot simulator");

    let config = SimulatorConfig::from_env()?;
    info!("  motion time: {:?}", config.robot.motion_time);
    info!("  settle delay: {:?}", config.robot.settle_delay);

    let mut executor = CommandExecutor::new(Robot::new(config.robot));

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    // One controller at a time; the next is accepted once this one is gone
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Accept failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", addr);

        session::serve(socket, addr, &mut executor).await;
    }
}
