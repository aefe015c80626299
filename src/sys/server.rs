use crate::events::AppEvent;
use async_channel::Sender;
use directories::BaseDirs;
use std::path::PathBuf;
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

const SOCKET_NAME: &str = "coverlist.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
enum Verb {
    Next,
    #[strum(to_string = "previous", serialize = "prev")]
    Previous,
    First,
    Last,
    GoTo,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'goto' needs an index")]
    MissingIndex,
    #[error("invalid index '{0}'")]
    InvalidIndex(String),
    #[error("'{verb}' takes no argument, got '{arg}'")]
    UnexpectedArgument { verb: String, arg: String },
}

/// `$XDG_RUNTIME_DIR/coverlist.sock`, or under `/tmp` without a runtime dir.
pub fn socket_path() -> PathBuf {
    BaseDirs::new()
        .and_then(|dirs| dirs.runtime_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(SOCKET_NAME)
}

pub fn parse_command(line: &str) -> Result<AppEvent, CommandError> {
    let mut words = line.split_whitespace();
    let word = words.next().ok_or(CommandError::Empty)?;
    let verb = Verb::from_str(&word.to_lowercase())
        .map_err(|_| CommandError::Unknown(word.to_string()))?;

    match (verb, words.next()) {
        (Verb::GoTo, None) => Err(CommandError::MissingIndex),
        (Verb::GoTo, Some(raw)) => raw
            .parse()
            .map(AppEvent::GoTo)
            .map_err(|_| CommandError::InvalidIndex(raw.to_string())),
        (verb, Some(arg)) => Err(CommandError::UnexpectedArgument {
            verb: verb.to_string(),
            arg: arg.to_string(),
        }),
        (Verb::Next, None) => Ok(AppEvent::Next),
        (Verb::Previous, None) => Ok(AppEvent::Previous),
        (Verb::First, None) => Ok(AppEvent::First),
        (Verb::Last, None) => Ok(AppEvent::Last),
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    let path = socket_path();

    // Cleanup old socket if it exists
    if path.exists() {
        let _ = fs_err::remove_file(&path);
    }

    let listener = match UnixListener::bind(&path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", path.display(), e);
            return;
        }
    };
    log::info!("Listening for commands on {}", path.display());

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match parse_command(&line) {
                            Ok(event) => {
                                log::debug!("Socket command: {:?}", event);
                                if tx.send(event).await.is_err() {
                                    return;
                                }
                            }
                            Err(e) => log::warn!("Ignoring socket command: {}", e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("next"), Ok(AppEvent::Next));
        assert_eq!(parse_command("  previous\n"), Ok(AppEvent::Previous));
        assert_eq!(parse_command("prev"), Ok(AppEvent::Previous));
        assert_eq!(parse_command("FIRST"), Ok(AppEvent::First));
        assert_eq!(parse_command("last"), Ok(AppEvent::Last));
    }

    #[test]
    fn test_parse_goto() {
        assert_eq!(parse_command("goto 3"), Ok(AppEvent::GoTo(3)));
        assert_eq!(parse_command("goto"), Err(CommandError::MissingIndex));
        assert_eq!(
            parse_command("goto -1"),
            Err(CommandError::InvalidIndex("-1".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(
            parse_command("show"),
            Err(CommandError::Unknown("show".to_string()))
        );
        assert_eq!(
            parse_command("prev 2"),
            Err(CommandError::UnexpectedArgument {
                verb: "previous".to_string(),
                arg: "2".to_string(),
            })
        );
    }

    #[test]
    fn test_socket_name() {
        assert!(socket_path().ends_with(SOCKET_NAME));
    }
}
