//! Session command loop
//!
//! Drives an authenticated session using the Tokio runtime:
//!
//! - Uses BufReader to read command lines from the client.
//! - Handles the inline STOR payload exchange, then runs the upload
//!   pipeline against the session's bound provider.
//! - Dispatches every other command through `handle_command`.

use log::{error, info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::auth::UserRegistry;
use crate::config::ServerConfig;
use crate::protocol::responses::{self, format_response, upload_response};
use crate::protocol::{Command, CommandStatus, handle_command, parse_command};
use crate::session::Session;
use crate::upload::{UploadRequest, process_upload};

pub async fn handle_session(
    cmd_stream: TcpStream,
    sessions: Arc<Mutex<HashMap<SocketAddr, Session>>>,
    peer_addr: SocketAddr,
    registry: Arc<UserRegistry>,
    config: Arc<ServerConfig>,
) {
    let (read_half, mut write_half) = cmd_stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                // Client closed the connection
                info!("Connection closed by client {}", peer_addr);
                break;
            }
            Ok(_) => {
                // Enforce command length limit
                if line.len() > config.max_command_length {
                    let _ = write_half
                        .write_all(
                            format_response(responses::UNKNOWN_COMMAND, "Command too long")
                                .as_bytes(),
                        )
                        .await;
                    continue;
                }

                let trimmed = line.trim_end_matches("\r\n");
                let command = parse_command(trimmed);
                info!("Received from {}: {:?}", peer_addr, &command);

                // STOR owns a payload exchange on the control stream, so it
                // is handled here rather than in the dispatch table.
                if let Command::Stor {
                    path,
                    size,
                    overwrite,
                } = &command
                {
                    // Admission checks before asking for payload bytes; the
                    // registry lock is not held across the exchange.
                    let provider = {
                        let sessions_guard = sessions.lock().await;
                        match sessions_guard.get(&peer_addr) {
                            Some(session) if session.is_logged_in() => session.provider(),
                            Some(_) => None,
                            None => {
                                error!("Client {} not found in session map", peer_addr);
                                let _ = write_half
                                    .write_all(
                                        format_response(
                                            responses::SERVICE_UNAVAILABLE,
                                            "Session not found",
                                        )
                                        .as_bytes(),
                                    )
                                    .await;
                                break;
                            }
                        }
                    };

                    let Some(provider) = provider else {
                        let _ = write_half
                            .write_all(
                                format_response(responses::AUTH_FAILED, "Not logged in")
                                    .as_bytes(),
                            )
                            .await;
                        continue;
                    };

                    if *size > config.max_file_size_bytes() {
                        let _ = write_half
                            .write_all(
                                format_response(
                                    responses::EXCEEDED_STORAGE,
                                    "Insufficient storage space (file too large)",
                                )
                                .as_bytes(),
                            )
                            .await;
                        continue;
                    }

                    let _ = write_half
                        .write_all(
                            format_response(responses::OPENING_DATA, "Ok to send data").as_bytes(),
                        )
                        .await;

                    let mut data = vec![0u8; *size as usize];
                    if let Err(e) = reader.read_exact(&mut data).await {
                        // Pending upload is abandoned; nothing reached the
                        // provider.
                        warn!(
                            "Client {} dropped during upload of {}: {}",
                            peer_addr, path, e
                        );
                        break;
                    }

                    let request = UploadRequest {
                        path: path.clone(),
                        data,
                        overwrite: *overwrite,
                    };
                    let outcome = process_upload(provider.as_ref(), &request);
                    let _ = write_half
                        .write_all(upload_response(path, &outcome).as_bytes())
                        .await;
                    continue;
                }

                let mut sessions_guard = sessions.lock().await;
                match sessions_guard.get_mut(&peer_addr) {
                    Some(session) => {
                        let result = handle_command(session, &command, &registry, &config);

                        match result.status {
                            CommandStatus::CloseConnection => {
                                if let Some(msg) = result.message {
                                    let _ = write_half.write_all(msg.as_bytes()).await;
                                }
                                info!("Client {} requested to quit", peer_addr);
                                break;
                            }
                            CommandStatus::Success => {
                                if let Some(msg) = result.message {
                                    info!(
                                        "Sending response to client {}: {}",
                                        peer_addr,
                                        msg.trim()
                                    );
                                    let _ = write_half.write_all(msg.as_bytes()).await;
                                }
                            }
                            CommandStatus::Failure(_) => {
                                if let Some(msg) = result.message {
                                    let _ = write_half.write_all(msg.as_bytes()).await;
                                }
                            }
                        }
                    }
                    None => {
                        error!("Client {} not found in session map", peer_addr);
                        let _ = write_half
                            .write_all(
                                format_response(
                                    responses::SERVICE_UNAVAILABLE,
                                    "Session not found",
                                )
                                .as_bytes(),
                            )
                            .await;
                        break;
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    let mut sessions_guard = sessions.lock().await;
    sessions_guard.remove(&peer_addr);
    info!("Client {} disconnected", peer_addr);
}
