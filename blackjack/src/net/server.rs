//! TCP front end.
//!
//! One task accepts connections. Every accepted socket gets a reader
//! task and a writer task that bridge it to a [`Link`]; the link is then
//! handed to the lobby. Read EOFs and write failures are reported to the
//! lobby as disconnects. Nothing here touches the registry directly.

use log::{debug, error, info};
use std::net::SocketAddr;
use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};

use super::{
    errors::ServerError,
    link::{ConnectionId, Link, Remote},
    utils,
};
use crate::table::{Coordinator, Lobby, LobbyHandle, TableConfig};

/// Bind `addr` and serve forever.
pub async fn run(addr: SocketAddr, config: TableConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;
    info!("listening on {addr}");
    serve(listener, config).await
}

/// Serve on an already-bound listener. Only returns on a fatal error.
pub async fn serve(listener: TcpListener, config: TableConfig) -> Result<(), ServerError> {
    config.validate().map_err(ServerError::Config)?;

    let (lobby, handle) = Lobby::new(config.clone());
    tokio::spawn(lobby.run());

    let coordinator = Coordinator::new(config, handle.clone());
    tokio::spawn(async move {
        if let Err(error) = coordinator.run().await {
            error!("game coordinator stopped: {error}");
        }
    });

    accept_connections(listener, handle).await
}

async fn accept_connections(listener: TcpListener, lobby: LobbyHandle) -> Result<(), ServerError> {
    let mut next_id: ConnectionId = 1;
    loop {
        let (stream, peer) = listener.accept().await.map_err(|error| {
            error!("accept failed: {error}");
            ServerError::Accept(error)
        })?;
        info!("accepted connection {next_id} from {peer}");
        let link = spawn_connection(next_id, stream, lobby.clone());
        lobby.connect(link).map_err(|_| ServerError::LobbyClosed)?;
        next_id += 1;
    }
}

fn spawn_connection(id: ConnectionId, stream: TcpStream, lobby: LobbyHandle) -> Link {
    let (link, remote) = Link::new(id);
    let Remote { input, mut output } = remote;
    let (read_half, mut write_half) = stream.into_split();

    let writer_lobby = lobby.clone();
    tokio::spawn(async move {
        while let Some(line) = output.recv().await {
            if let Err(error) = utils::write_line(&mut write_half, &line).await {
                debug!("connection {id}: write failed: {error}");
                writer_lobby.disconnect(id);
                return;
            }
        }
        // Every link handle is gone, so the table is done with this client.
        debug!("connection {id}: closing");
        let _ = write_half.shutdown().await;
    });

    tokio::spawn(async move {
        let mut reader = BufReader::new(read_half);
        let mut buf = Vec::new();
        loop {
            match utils::read_line(&mut reader, &mut buf).await {
                Ok(Some(line)) => {
                    if input.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("connection {id}: eof");
                    break;
                }
                Err(error) => {
                    debug!("connection {id}: read failed: {error}");
                    break;
                }
            }
        }
        lobby.disconnect(id);
    });

    link
}
