//! Interactive line-oriented shell.
//!
//! State persists across commands for the life of the session, the way the
//! page kept it until reload.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::client::ContractClient;
use crate::app::state::AppState;
use crate::app::view::render;

const HELP: &str = "Commands:\n  \
    fetch            read the current message\n  \
    set <message>    store a new message\n  \
    status           re-check the wallet connection\n  \
    help             show this text\n  \
    quit             leave the shell\n";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Fetch,
    /// Submit the given text; an empty text exercises validation.
    Set(String),
    Status,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    /// Parse one input line.
    ///
    /// Only the command word is trimmed. For `set`, everything after the
    /// single separator following the word is kept verbatim, so spaces in
    /// the message survive.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "fetch" | "get" => Ok(Self::Fetch),
            "set" => Ok(Self::Set(rest.to_string())),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

/// Run the shell until `quit`, end of input, or Ctrl-C.
pub async fn run_shell<R, W>(
    client: &ContractClient,
    state: &mut AppState,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    client.check_connection(state).await;
    output.write_all(render(state).as_bytes()).await?;
    output.write_all(b"Type 'help' for commands.\n").await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, leaving shell");
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                output.write_all(format!("{}\n", message).as_bytes()).await?;
                continue;
            }
        };

        // Operation errors are already reflected in the state's notice.
        match command {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                output.write_all(HELP.as_bytes()).await?;
                continue;
            }
            ShellCommand::Status => client.check_connection(state).await,
            ShellCommand::Fetch => {
                let _ = client.fetch_message(state).await;
            }
            ShellCommand::Set(text) => {
                state.pending_input = text;
                let _ = client.submit_message(state).await;
            }
        }

        output.write_all(render(state).as_bytes()).await?;
    }

    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("fetch"), Ok(ShellCommand::Fetch));
        assert_eq!(ShellCommand::parse("  GET "), Ok(ShellCommand::Fetch));
        assert_eq!(
            ShellCommand::parse("set hello there"),
            Ok(ShellCommand::Set("hello there".into()))
        );
        assert_eq!(ShellCommand::parse("set"), Ok(ShellCommand::Set(String::new())));
        assert_eq!(ShellCommand::parse(""), Ok(ShellCommand::Empty));
        assert_eq!(ShellCommand::parse("   "), Ok(ShellCommand::Empty));
        assert_eq!(ShellCommand::parse("exit"), Ok(ShellCommand::Quit));
        assert!(ShellCommand::parse("deploy").is_err());
    }

    #[test]
    fn test_set_keeps_message_verbatim() {
        // One separator is dropped, the rest is the message
        assert_eq!(
            ShellCommand::parse("set   x  "),
            Ok(ShellCommand::Set("  x  ".into()))
        );
        assert_eq!(
            ShellCommand::parse("set   "),
            Ok(ShellCommand::Set("  ".into()))
        );
        assert_eq!(
            ShellCommand::parse("  set two  spaces \r\n"),
            Ok(ShellCommand::Set("two  spaces ".into()))
        );
        assert_eq!(
            ShellCommand::parse("set\tx"),
            Ok(ShellCommand::Set("x".into()))
        );
    }
}
