//! JSON-lines driver: commands in on one stream, events out on another.
//! Each command is parsed and dispatched; every state change is answered with
//! a full snapshot line. Task results arriving in between also emit one.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use crate::protocol::{ClientCommand, ServerEvent};
use crate::runtime::Runtime;

#[instrument(level = "info", skip_all)]
pub async fn run<R, W>(runtime: &mut Runtime, input: R, mut output: W) -> std::io::Result<()>
where
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  info!(target: "lumina", "Driver started");
  let mut lines = input.lines();
  let shutdown = tokio::signal::ctrl_c();
  tokio::pin!(shutdown);

  emit(&mut output, &snapshot(runtime)).await?;
  loop {
    tokio::select! {
      line = lines.next_line() => {
        let Some(line) = line? else {
          // Input closed: let outstanding work land, then report once more.
          debug!(target: "lumina", pending = runtime.pending(), "Input closed; settling");
          runtime.settle().await;
          emit(&mut output, &snapshot(runtime)).await?;
          break;
        };
        if line.trim().is_empty() {
          continue;
        }
        let event = match serde_json::from_str::<ClientCommand>(&line) {
          Ok(ClientCommand::Quit) => break,
          Ok(ClientCommand::Ping) => ServerEvent::Pong,
          Ok(cmd) => {
            debug!(target: "lumina", ?cmd, "Command received");
            if let Some(msg) = cmd.into_msg() {
              runtime.dispatch(msg);
            }
            snapshot(runtime)
          }
          Err(e) => {
            warn!(target: "lumina", error = %e, "Unparseable command");
            ServerEvent::Error { message: format!("Invalid JSON: {}", e) }
          }
        };
        emit(&mut output, &event).await?;
      }
      msg = runtime.next() => {
        runtime.dispatch(msg);
        emit(&mut output, &snapshot(runtime)).await?;
      }
      _ = &mut shutdown => {
        info!(target: "lumina", "Interrupted");
        break;
      }
    }
  }
  output.flush().await?;
  info!(target: "lumina", "Driver stopped");
  Ok(())
}

fn snapshot(runtime: &Runtime) -> ServerEvent {
  ServerEvent::Snapshot { snapshot: Box::new(runtime.app().snapshot()) }
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, event: &ServerEvent) -> std::io::Result<()> {
  let mut out = serde_json::to_string(event).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  out.push('\n');
  output.write_all(out.as_bytes()).await?;
  output.flush().await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app::App;
  use crate::backend::fake::{FakeSource, Reply};
  use crate::config::AppConfig;
  use crate::tutor::BackendChat;
  use serde_json::{json, Value};
  use std::sync::Arc;

  async fn drive(src: FakeSource, input: &str) -> Vec<Value> {
    let src = Arc::new(src);
    let chat = Arc::new(BackendChat::new(src.clone()));
    let mut rt = Runtime::new(App::new(&AppConfig::default()), src, chat);
    let mut out: Vec<u8> = Vec::new();
    run(&mut rt, input.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out)
      .unwrap()
      .lines()
      .map(|l| serde_json::from_str(l).unwrap())
      .collect()
  }

  #[tokio::test]
  async fn ping_bad_json_and_quit() {
    let events = drive(FakeSource::new(), "{\"type\":\"ping\"}\nnot json\n{\"type\":\"quit\"}\n{\"type\":\"ping\"}\n").await;
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["type"], json!("snapshot"));
    assert_eq!(events[0]["snapshot"]["view"], json!("intro"));
    assert_eq!(events[1], json!({"type": "pong"}));
    assert_eq!(events[2]["type"], json!("error"));
  }

  #[tokio::test]
  async fn final_snapshot_reflects_settled_requests() {
    let src = FakeSource::new()
      .route("GET /api/ui/weakness", Reply::json(json!({"modules": [{"id": "Writing", "name": "Writing", "score": 5.5, "weak_point": "Coherence"}]})));
    let events = drive(src, "{\"type\":\"navigate\",\"view\":\"weakness\"}\n").await;
    let last = events.last().unwrap();
    assert_eq!(last["snapshot"]["view"], json!("weakness"));
    assert_eq!(last["snapshot"]["page"]["body"]["active_module"], json!("Writing"));
  }
}
