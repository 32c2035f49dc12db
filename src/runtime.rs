//! Runs `Cmd`s as tokio tasks and feeds their results back as `Msg`s.
//!
//! The runtime is the only owner of `App`; spawned tasks see nothing but the
//! data source, the chat provider, and a channel sender. Completion order
//! between tasks is not defined.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::app::{App, Cmd, Msg};
use crate::backend::DataSource;
use crate::tutor::ChatProvider;

pub struct Runtime {
    app: App,
    source: Arc<dyn DataSource>,
    chat: Arc<dyn ChatProvider>,
    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,
    pending: usize,
}

impl Runtime {
    pub fn new(app: App, source: Arc<dyn DataSource>, chat: Arc<dyn ChatProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { app, source, chat, tx, rx, pending: 0 }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Tasks spawned whose result has not been dispatched yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn dispatch(&mut self, msg: Msg) {
        for cmd in self.app.update(msg) {
            self.spawn(cmd);
        }
    }

    fn spawn(&mut self, cmd: Cmd) {
        self.pending += 1;
        let tx = self.tx.clone();
        match cmd {
            Cmd::Fetch { ticket, request } => {
                let source = self.source.clone();
                tokio::spawn(async move {
                    let response = request.execute(source.as_ref()).await;
                    // Receiver lives as long as the runtime.
                    let _ = tx.send(Msg::Loaded { ticket, response });
                });
            }
            Cmd::Chat { text } => {
                let chat = self.chat.clone();
                tokio::spawn(async move {
                    let result = chat.reply(&text).await;
                    let _ = tx.send(Msg::ChatReplied(result));
                });
            }
        }
    }

    /// Wait for the next task result. Never resolves while nothing is pending.
    pub async fn next(&mut self) -> Msg {
        if self.pending == 0 {
            std::future::pending::<()>().await;
        }
        loop {
            if let Some(msg) = self.rx.recv().await {
                self.pending -= 1;
                return msg;
            }
        }
    }

    /// Dispatch results until every spawned task has reported back.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            let msg = self.next().await;
            debug!(target: "lumina", pending = self.pending, "Task finished");
            self.dispatch(msg);
        }
    }
}
