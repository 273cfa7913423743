//! Message-passing process runtime
//!
//! A [`Process`] is a named node with a bounded inbox, an ordered list of
//! children and a [`Handler`]. Starting a process spawns one tokio task per
//! node (children first). Each worker loops over its cancellation signal, its
//! state-change channel and its inbox until it is killed, then sends `STOP` to
//! its children and calls [`Handler::finish`].
//!
//! Handlers are synchronous: they record outgoing messages and state requests
//! in a [`Context`] and the worker delivers them after the handler returns, so
//! back-pressure from a full child inbox never suspends a handler.
//!
//! ```text
//! WAITING --START--> RUNNING --STOP--> KILLED
//! WAITING --STOP--> KILLED
//! any    --cancel--> KILLED
//! ```

use std::sync::Arc;

use jiff::civil::Date;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, trace};

use crate::model::AccountInfo;

/// Capacity of every process inbox
pub const INBOX_CAPACITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Start,
    Stop,
    Date,
    DailyAccountInfo,
    MonthlyAccountInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Start,
    Stop,
    Date(Date),
    DailyAccountInfo(AccountInfo),
    MonthlyAccountInfo(AccountInfo),
}

/// Value exchanged between processes
#[derive(Debug, Clone)]
pub struct Message {
    pub timestamp: jiff::Timestamp,
    /// Re-dispatch to children after handling (never applied to `START`)
    pub forward: bool,
    pub payload: Payload,
}

impl Message {
    pub fn new(payload: Payload, forward: bool) -> Self {
        Self {
            timestamp: jiff::Timestamp::now(),
            forward,
            payload,
        }
    }

    pub fn start() -> Self {
        Self::new(Payload::Start, true)
    }

    pub fn stop() -> Self {
        Self::new(Payload::Stop, true)
    }

    pub fn date(date: Date) -> Self {
        Self::new(Payload::Date(date), false)
    }

    pub fn daily_account_info(info: AccountInfo) -> Self {
        Self::new(Payload::DailyAccountInfo(info), false)
    }

    pub fn monthly_account_info(info: AccountInfo) -> Self {
        Self::new(Payload::MonthlyAccountInfo(info), false)
    }

    pub fn kind(&self) -> MessageKind {
        match self.payload {
            Payload::Start => MessageKind::Start,
            Payload::Stop => MessageKind::Stop,
            Payload::Date(_) => MessageKind::Date,
            Payload::DailyAccountInfo(_) => MessageKind::DailyAccountInfo,
            Payload::MonthlyAccountInfo(_) => MessageKind::MonthlyAccountInfo,
        }
    }
}

/// Lifecycle of a process worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Waiting,
    Running,
    Killed,
}

/// Output collected from one handler invocation
#[derive(Debug, Default)]
pub struct Context {
    outgoing: Vec<Message>,
    requested_state: Option<State>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for every child of the current process.
    pub fn dispatch(&mut self, msg: Message) {
        self.outgoing.push(msg);
    }

    /// Request a state change, applied once the handler returns.
    pub fn set_state(&mut self, state: State) {
        self.requested_state = Some(state);
    }

    pub fn outgoing(&self) -> &[Message] {
        &self.outgoing
    }

    pub fn take_outgoing(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn requested_state(&self) -> Option<State> {
        self.requested_state
    }
}

/// Domain logic hosted by a process
pub trait Handler: Send + 'static {
    fn handle(&mut self, ctx: &mut Context, msg: &Message);

    /// Called once when the worker exits.
    fn finish(self: Box<Self>) {}
}

/// Cloneable address of a started (or not yet started) process
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    name: Arc<str>,
    inbox: mpsc::Sender<Message>,
    state: mpsc::UnboundedSender<State>,
}

impl ProcessHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a message, waiting while the inbox is full.
    ///
    /// Returns `false` if the process has already exited.
    pub async fn send(&self, msg: Message) -> bool {
        self.inbox.send(msg).await.is_ok()
    }

    pub fn set_state(&self, state: State) {
        // A closed channel means the worker already exited
        let _ = self.state.send(state);
    }
}

/// Ordered fan-out list
#[derive(Debug, Clone, Default)]
pub struct ProcessList(Vec<ProcessHandle>);

impl ProcessList {
    pub fn new(handles: Vec<ProcessHandle>) -> Self {
        Self(handles)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessHandle> {
        self.0.iter()
    }

    /// Send a copy of `msg` to every process in order.
    pub async fn dispatch(&self, msg: &Message) {
        for process in &self.0 {
            if !process.send(msg.clone()).await {
                trace!(process = process.name(), kind = ?msg.kind(), "inbox closed, message dropped");
            }
        }
    }
}

pub struct Process {
    name: Arc<str>,
    handler: Box<dyn Handler>,
    children: Vec<Process>,
    inbox_tx: mpsc::Sender<Message>,
    inbox_rx: mpsc::Receiver<Message>,
    state_tx: mpsc::UnboundedSender<State>,
    state_rx: mpsc::UnboundedReceiver<State>,
}

impl Process {
    pub fn new(name: &str, handler: impl Handler, children: Vec<Process>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel(INBOX_CAPACITY);
        let (state_tx, state_rx) = mpsc::unbounded_channel();
        Self {
            name: Arc::from(name),
            handler: Box::new(handler),
            children,
            inbox_tx,
            inbox_rx,
            state_tx,
            state_rx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> ProcessHandle {
        ProcessHandle {
            name: self.name.clone(),
            inbox: self.inbox_tx.clone(),
            state: self.state_tx.clone(),
        }
    }

    /// Spawn this process and, before it, all of its descendants.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(self, cancel: &watch::Receiver<bool>, tasks: &mut JoinSet<()>) -> ProcessHandle {
        let handle = self.handle();
        let Process {
            name,
            handler,
            children,
            inbox_rx,
            state_rx,
            ..
        } = self;

        let children = ProcessList::new(
            children
                .into_iter()
                .map(|child| child.start(cancel, tasks))
                .collect(),
        );

        let worker = Worker {
            name,
            handler,
            inbox: inbox_rx,
            state_rx,
            children,
            cancel: cancel.clone(),
            state: State::Waiting,
        };
        tasks.spawn(worker.run());
        handle
    }
}

struct Worker {
    name: Arc<str>,
    handler: Box<dyn Handler>,
    inbox: mpsc::Receiver<Message>,
    state_rx: mpsc::UnboundedReceiver<State>,
    children: ProcessList,
    cancel: watch::Receiver<bool>,
    state: State,
}

impl Worker {
    async fn run(mut self) {
        debug!(process = %self.name, "worker started");
        let mut cancel = self.cancel.clone();
        while self.state != State::Killed {
            tokio::select! {
                biased;
                _ = async {
                    let _ = cancel.wait_for(|cancelled| *cancelled).await;
                } => {
                    self.state = State::Killed;
                }
                Some(next) = self.state_rx.recv() => {
                    self.state = next;
                }
                received = self.inbox.recv() => match received {
                    Some(msg) => self.receive(msg).await,
                    None => self.state = State::Killed,
                },
            }
        }

        self.children.dispatch(&Message::stop()).await;
        debug!(process = %self.name, "worker exited");
        self.handler.finish();
    }

    async fn receive(&mut self, msg: Message) {
        match msg.kind() {
            MessageKind::Start => {
                self.state = State::Running;
                self.children.dispatch(&msg).await;
            }
            // Children receive STOP once the worker loop exits
            MessageKind::Stop => {
                self.state = State::Killed;
                return;
            }
            _ => {}
        }

        if self.state == State::Running {
            let mut ctx = Context::new();
            self.handler.handle(&mut ctx, &msg);
            for out in ctx.take_outgoing() {
                self.children.dispatch(&out).await;
            }
            if let Some(next) = ctx.requested_state() {
                self.state = next;
            }
        }

        if msg.forward && msg.kind() != MessageKind::Start {
            self.children.dispatch(&msg).await;
        }
    }
}

/// Owner of the root processes of a pipeline
pub struct Engine {
    roots: Vec<Process>,
}

impl Engine {
    pub fn new(roots: Vec<Process>) -> Self {
        Self { roots }
    }

    /// Spawn every process and send `START` to the roots.
    pub async fn start(self) -> RunningEngine {
        let (cancel, cancel_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();
        let roots = ProcessList::new(
            self.roots
                .into_iter()
                .map(|root| root.start(&cancel_rx, &mut tasks))
                .collect(),
        );
        roots.dispatch(&Message::start()).await;
        RunningEngine {
            roots,
            cancel,
            tasks,
        }
    }
}

pub struct RunningEngine {
    roots: ProcessList,
    cancel: watch::Sender<bool>,
    tasks: JoinSet<()>,
}

impl RunningEngine {
    pub fn roots(&self) -> &ProcessList {
        &self.roots
    }

    /// Flip every worker to `KILLED` at its next loop iteration.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Wait until every worker has exited.
    pub async fn wait(mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined {
                error!(%err, "process worker failed");
            }
        }
    }

    /// Queue `STOP` behind every pending root message and wait for the tree to
    /// drain. Use [`RunningEngine::cancel`] to stop without draining.
    pub async fn stop(self) {
        self.roots.dispatch(&Message::stop()).await;
        self.wait().await;
    }
}
