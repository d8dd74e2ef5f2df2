//! Session handling for controller connections
//!
//! This module handles:
//! - Framing the inbound byte stream into request lines
//! - Executing requests and writing replies back
//! - Closing the connection on a fault while the server keeps running

mod connection;

pub use connection::RobotSession;

use crate::command::CommandExecutor;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info};

/// Serve one connection to completion
///
/// Faults are logged and close the connection; they never propagate further.
pub async fn serve<S>(stream: S, addr: SocketAddr, executor: &mut CommandExecutor)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = RobotSession::new(stream, addr);

    match session.run(executor).await {
        Ok(()) => info!("Client disconnected: {}", session.addr()),
        Err(e) => error!("Closing connection from {}: {:#}", session.addr(), e),
    }

    info!("Connection closed (robot {:?})", executor.robot().state());
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_sim_shared::{Robot, RobotState};
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_serve_survives_fault() {
        let mut exec = CommandExecutor::new(Robot::default());
        let addr = SocketAddr::from(([127, 0, 0, 1], 5002));

        let (mut client, server) = duplex(1024);
        client.write_all(b"CHECK 2C\nANNEAL x\nCLEAR\n").await.expect("write failed");
        client.shutdown().await.expect("shutdown failed");
        serve(server, addr, &mut exec).await;

        let mut output = Vec::new();
        client.read_to_end(&mut output).await.expect("read failed");
        assert_eq!(output, b"1\r\n");
        // CLEAR after the fault never ran
        assert_eq!(exec.robot().state(), RobotState::Occupied);
    }
}
