use super::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::*;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Unit of work executed by a [`Dispatcher`].
///
/// The worker owns `State` and lends it to exactly one task at a time, so
/// tasks mutate it without any locking. Tasks reach the queue again through
/// the [`Handle`] they are given.
#[async_trait::async_trait]
pub trait Task: Send + Sized + 'static {
    type State: Send + 'static;
    async fn run(self, state: &mut Self::State, handle: &Handle<Self>);
}

/// Cloneable submission side of a dispatcher. Never blocks.
pub struct Handle<T> {
    queue: UnboundedSender<T>,
    timer: UnboundedSender<(Instant, T)>,
    halt: watch::Receiver<bool>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            timer: self.timer.clone(),
            halt: self.halt.clone(),
        }
    }
}

impl<T> Handle<T>
where
    T: Send + 'static,
{
    /// Runs the task once the worker is free, after every task submitted before it.
    pub fn submit(&self, task: T) -> Result<(), GameError> {
        self.queue.send(task).map_err(|_| GameError::Closed)
    }
    /// Runs the task no earlier than `delay` from now.
    pub fn submit_after(&self, task: T, delay: Duration) -> Result<(), GameError> {
        self.timer
            .send((Instant::now() + delay, task))
            .map_err(|_| GameError::Closed)
    }
    pub fn is_halted(&self) -> bool {
        *self.halt.borrow()
    }
    /// Resolves once the dispatcher is told to stop.
    pub async fn halted(&self) {
        let mut halt = self.halt.clone();
        let _ = halt.wait_for(|h| *h).await;
    }
}

/// Stop switch shared with signal handlers.
#[derive(Debug, Clone)]
pub struct Halt(Arc<watch::Sender<bool>>);

impl Halt {
    pub fn halt(&self) {
        self.0.send_replace(true);
    }
}

/// Single-worker serialized execution queue.
///
/// - one worker task runs queued tasks strictly one after another
/// - immediate submissions run in submission order
/// - delayed submissions wait in a clock task, ordered by due time and then
///   submission order, and join the worker queue once due
///
/// There is no priority, cancellation or retry: every task runs exactly once.
pub struct Dispatcher<T: Task> {
    handle: Handle<T>,
    halt: Halt,
    worker: JoinHandle<T::State>,
    clock: JoinHandle<()>,
}

impl<T: Task> Dispatcher<T> {
    pub fn spawn(state: T::State) -> Self {
        let (queue, inbox) = unbounded_channel();
        let (timer, alarms) = unbounded_channel();
        let (halt, stop) = watch::channel(false);
        let handle = Handle {
            queue: queue.clone(),
            timer,
            halt: stop,
        };
        let clock = tokio::spawn(Self::clock(alarms, queue));
        let worker = tokio::spawn(Self::work(state, inbox, handle.clone()));
        log::debug!("[dispatcher] spawned");
        Self {
            handle,
            halt: Halt(Arc::new(halt)),
            worker,
            clock,
        }
    }
    pub fn handle(&self) -> Handle<T> {
        self.handle.clone()
    }
    pub fn halter(&self) -> Halt {
        self.halt.clone()
    }
    pub fn submit(&self, task: T) -> Result<(), GameError> {
        self.handle.submit(task)
    }
    pub fn submit_after(&self, task: T, delay: Duration) -> Result<(), GameError> {
        self.handle.submit_after(task, delay)
    }
    /// Halts the worker after (or, if it cooperates, during) its current task
    /// and hands back the state. Pending tasks are dropped.
    pub async fn shutdown(self) -> Option<T::State> {
        self.halt.halt();
        self.clock.abort();
        self.worker
            .await
            .inspect_err(|e| log::error!("[dispatcher] worker failed: {}", e))
            .ok()
    }
}

impl<T: Task> Dispatcher<T> {
    async fn work(mut state: T::State, mut inbox: UnboundedReceiver<T>, handle: Handle<T>) -> T::State {
        loop {
            tokio::select! {
                biased;
                _ = handle.halted() => break,
                task = inbox.recv() => match task {
                    Some(task) => task.run(&mut state, &handle).await,
                    None => break,
                },
            }
        }
        log::debug!("[dispatcher] worker stopped");
        state
    }
    async fn clock(mut alarms: UnboundedReceiver<(Instant, T)>, queue: UnboundedSender<T>) {
        let mut pending = BinaryHeap::<Alarm<T>>::new();
        let mut sequence = 0u64;
        let mut open = true;
        while open || !pending.is_empty() {
            let next = pending.peek().map(|a| a.due);
            tokio::select! {
                biased;
                alarm = alarms.recv(), if open => match alarm {
                    Some((due, task)) => {
                        pending.push(Alarm { due, sequence, task });
                        sequence += 1;
                    }
                    None => open = false,
                },
                _ = tokio::time::sleep_until(next.unwrap_or_else(Instant::now)), if next.is_some() => {
                    let now = Instant::now();
                    while pending.peek().is_some_and(|a| a.due <= now) {
                        if let Some(alarm) = pending.pop() {
                            if queue.send(alarm.task).is_err() {
                                log::warn!("[dispatcher] worker gone, dropping delayed tasks");
                                return;
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Delayed task waiting in the clock. Ordered so the heap pops the earliest
/// due time first and, among equal due times, the earliest submission.
struct Alarm<T> {
    due: Instant,
    sequence: u64,
    task: T,
}

impl<T> PartialEq for Alarm<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}
impl<T> Eq for Alarm<T> {}

impl<T> Ord for Alarm<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
impl<T> PartialOrd for Alarm<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
