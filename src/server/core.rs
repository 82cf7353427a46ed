use log::{error, info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::auth::UserRegistry;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::protocol::responses::{self, format_response};
use crate::protocol::{CommandStatus, handle_auth_command, parse_command};
use crate::session::{Session, handle_session};

pub struct Server {
    session_registry: Arc<Mutex<HashMap<SocketAddr, Session>>>,
    user_registry: Arc<UserRegistry>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the control socket and builds the user registry from `config`.
    pub async fn new(config: ServerConfig) -> Self {
        let socket = config.control_socket();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                panic!("Server startup failed on socket {}: {}", socket, e);
            }
        };

        let user_registry = match UserRegistry::from_config(&config.users) {
            Ok(registry) => Arc::new(registry),
            Err(e) => {
                error!("Failed to build user registry: {}", e);
                panic!("Server startup failed: {}", e);
            }
        };

        // Ensure every configured physical root exists
        for spec in &config.users {
            if let Err(e) = std::fs::create_dir_all(&spec.root) {
                warn!("Failed to create root directory {}: {}", spec.root, e);
            }
            for mount in &spec.mounts {
                if let Err(e) = std::fs::create_dir_all(&mount.physical) {
                    warn!("Failed to create mount directory {}: {}", mount.physical, e);
                }
            }
        }

        Self {
            session_registry: Arc::new(Mutex::new(HashMap::new())),
            user_registry,
            listener,
            config: Arc::new(config),
        }
    }

    /// Address the control socket is listening on.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting file server on {} (max {} clients)",
            self.config.control_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let session_registry = Arc::clone(&self.session_registry);
                    let user_registry = Arc::clone(&self.user_registry);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_new_session(
                            stream,
                            addr,
                            session_registry,
                            user_registry,
                            config,
                        )
                        .await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Handles a new connection: greets, authenticates, registers the session,
/// and hands off to the session loop.
async fn handle_new_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    session_registry: Arc<Mutex<HashMap<SocketAddr, Session>>>,
    user_registry: Arc<UserRegistry>,
    config: Arc<ServerConfig>,
) -> Result<(), ServerError> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    // Send greeting
    reader
        .get_mut()
        .write_all(format_response(responses::READY, "Strata file server ready").as_bytes())
        .await?;
    reader.get_mut().flush().await?;

    let mut session = Session::default();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(ServerError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionAborted,
                "Client disconnected during authentication",
            )));
        }

        let command = parse_command(&line);
        let result = handle_auth_command(&mut session, &command, &user_registry, &config);

        let close = matches!(result.status, CommandStatus::CloseConnection);
        if let Some(msg) = result.message {
            reader.get_mut().write_all(msg.as_bytes()).await?;
        }
        if close {
            return Ok(());
        }

        if session.is_logged_in() {
            let mut sessions = session_registry.lock().await;

            if sessions.len() >= config.max_clients {
                reader
                    .get_mut()
                    .write_all(
                        format_response(
                            responses::SERVICE_UNAVAILABLE,
                            "Too many connections. Try again later.",
                        )
                        .as_bytes(),
                    )
                    .await?;
                return Ok(()); // Close connection
            }

            session.set_peer_addr(Some(peer_addr));
            sessions.insert(peer_addr, session);

            info!(
                "Authenticated client: {} ({}/{} clients)",
                peer_addr,
                sessions.len(),
                config.max_clients
            );

            let cmd_stream = reader.into_inner();

            drop(sessions);

            // Hand off to session loop
            handle_session(cmd_stream, session_registry, peer_addr, user_registry, config).await;

            return Ok(());
        }
    }
}
