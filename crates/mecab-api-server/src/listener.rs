//! Listening socket acquisition.
//!
//! Under Server::Starter the supervisor opens the sockets itself and
//! passes them down through `SERVER_STARTER_PORT`, formatted as
//! `addr=fd;addr=fd;...` where `addr` is `port`, `host:port` or a unix
//! socket path. Without that variable the service binds its own port.

use std::io;
use std::net::SocketAddr;

use mecab_api_config::network::NetworkConfig;
use tokio::net::TcpListener;

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Malformed socket handoff {value:?}: {reason}")]
    Malformed { value: String, reason: String },

    #[error("Socket handoff offers no TCP listener: {0:?}")]
    NoTcpListener(String),

    #[error("Cannot adopt inherited descriptor {fd}: {source}")]
    Adopt {
        fd: i32,
        #[source]
        source: io::Error,
    },

    #[error("Socket handoff is not supported on this platform")]
    Unsupported,

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// One `addr=fd` entry of the handoff variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffEntry {
    pub addr: String,
    pub fd: i32,
}

impl HandoffEntry {
    pub fn is_unix(&self) -> bool {
        self.addr.starts_with('/')
    }
}

/// Where the listener came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerSource {
    Inherited(HandoffEntry),
    Bound(String),
}

/// Parse the handoff variable. Empty values hold no entries.
pub fn parse_handoff(value: &str) -> Result<Vec<HandoffEntry>, ListenerError> {
    let malformed = |reason: String| ListenerError::Malformed {
        value: value.to_string(),
        reason,
    };

    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (addr, fd) = entry
                .rsplit_once('=')
                .ok_or_else(|| malformed(format!("{entry:?} lacks '='")))?;

            if addr.is_empty() {
                return Err(malformed(format!("{entry:?} has no address")));
            }

            let fd = fd
                .parse::<i32>()
                .ok()
                .filter(|fd| *fd >= 0)
                .ok_or_else(|| malformed(format!("{fd:?} is not a descriptor")))?;

            Ok(HandoffEntry {
                addr: addr.to_string(),
                fd,
            })
        })
        .collect()
}

/// Acquire the listener from the environment named in `config`
pub async fn acquire(config: &NetworkConfig) -> Result<(TcpListener, ListenerSource), ListenerError> {
    let handoff = std::env::var(&config.handoff_env).ok();
    acquire_with(handoff.as_deref(), &config.fallback_addr()).await
}

/// Use the first inherited TCP socket when a handoff is present, otherwise bind `fallback`
pub async fn acquire_with(
    handoff: Option<&str>,
    fallback: &str,
) -> Result<(TcpListener, ListenerSource), ListenerError> {
    let handoff = handoff.map(str::trim).filter(|value| !value.is_empty());

    let Some(value) = handoff else {
        tracing::info!("No socket handoff, binding {}", fallback);
        let listener = TcpListener::bind(fallback)
            .await
            .map_err(|source| ListenerError::Bind {
                addr: fallback.to_string(),
                source,
            })?;
        return Ok((listener, ListenerSource::Bound(fallback.to_string())));
    };

    let entries = parse_handoff(value)?;
    let mut tcp = entries.into_iter().filter(|entry| !entry.is_unix());
    let entry = tcp
        .next()
        .ok_or_else(|| ListenerError::NoTcpListener(value.to_string()))?;

    for ignored in tcp {
        tracing::debug!("Ignoring extra inherited socket {} (fd {})", ignored.addr, ignored.fd);
    }

    let listener = adopt(entry.fd)?;
    let listener = TcpListener::from_std(listener).map_err(|source| ListenerError::Adopt {
        fd: entry.fd,
        source,
    })?;

    tracing::info!("Using inherited socket {} (fd {})", entry.addr, entry.fd);
    Ok((listener, ListenerSource::Inherited(entry)))
}

#[cfg(unix)]
fn adopt(fd: i32) -> Result<std::net::TcpListener, ListenerError> {
    use std::os::fd::{FromRawFd, IntoRawFd};

    // SAFETY: the supervisor hands this descriptor to us as an open
    // listening socket and nothing else in this process owns it.
    let listener = unsafe { std::net::TcpListener::from_raw_fd(fd) };

    let checked = listener
        .local_addr()
        .and_then(|_: SocketAddr| listener.set_nonblocking(true));

    match checked {
        Ok(()) => Ok(listener),
        Err(source) => {
            // not ours to close when it is not a TCP listener
            let _ = listener.into_raw_fd();
            Err(ListenerError::Adopt { fd, source })
        }
    }
}

#[cfg(not(unix))]
fn adopt(_fd: i32) -> Result<std::net::TcpListener, ListenerError> {
    Err(ListenerError::Unsupported)
}
