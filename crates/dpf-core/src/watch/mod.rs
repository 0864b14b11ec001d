//! Job watcher
//!
//! Polls a resource until its reported state settles.
//!
//! The watcher is an explicit state machine:
//!
//! ```text
//! Polling -> Succeeded | Failed | Cancelled | TimedOut
//! ```
//!
//! Every tick waits one interval, issues exactly one read-style call and then
//! consults the target's [`Watchable::progress`]. The [`Context`] is checked
//! before the wait, during the wait, during the call and after it; no request
//! is issued once the context is done.
//!
//! Retryable HTTP failures (no status, 429, 502, 503, 504) keep the machine
//! polling. Everything else ends the watch with an error.

use crate::client::{Client, SearchParams};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::job::Job;
use crate::traits::{CountableListSpec, ListSpec, Progress, Spec, Watchable};
use async_trait::async_trait;
use std::time::Duration;

/// State of a watch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Waiting for the target to settle
    Polling,
    /// Target settled successfully
    Succeeded,
    /// Target settled in a failure state, or a call failed for good
    Failed,
    /// The caller cancelled the context
    Cancelled,
    /// The context deadline passed
    TimedOut,
}

impl WatchState {
    /// `true` for every state but [`WatchState::Polling`]
    pub fn is_terminal(self) -> bool {
        !matches!(self, WatchState::Polling)
    }
}

/// One read-style call against a watched target
#[async_trait]
trait PollTarget: Send {
    fn kind(&self) -> &'static str;

    async fn poll(&mut self, client: &Client) -> Result<String>;

    fn progress(&self) -> Progress;
}

struct ReadTarget<'a, S: ?Sized>(&'a mut S);

#[async_trait]
impl<S> PollTarget for ReadTarget<'_, S>
where
    S: Spec + Watchable + ?Sized,
{
    fn kind(&self) -> &'static str {
        self.0.kind()
    }

    async fn poll(&mut self, client: &Client) -> Result<String> {
        client.read(&mut *self.0).await
    }

    fn progress(&self) -> Progress {
        self.0.progress()
    }
}

struct ListTarget<'a, L> {
    list: &'a mut L,
    params: Option<&'a SearchParams>,
}

#[async_trait]
impl<L> PollTarget for ListTarget<'_, L>
where
    L: ListSpec + Watchable,
{
    fn kind(&self) -> &'static str {
        self.list.kind()
    }

    async fn poll(&mut self, client: &Client) -> Result<String> {
        client.list(&mut *self.list, self.params).await
    }

    fn progress(&self) -> Progress {
        self.list.progress()
    }
}

struct ListAllTarget<'a, L> {
    list: &'a mut L,
    params: Option<&'a SearchParams>,
}

#[async_trait]
impl<L> PollTarget for ListAllTarget<'_, L>
where
    L: CountableListSpec + Watchable,
{
    fn kind(&self) -> &'static str {
        self.list.kind()
    }

    async fn poll(&mut self, client: &Client) -> Result<String> {
        client.list_all(&mut *self.list, self.params).await
    }

    fn progress(&self) -> Progress {
        self.list.progress()
    }
}

/// Polls resources through a [`Client`] at a fixed interval
#[derive(Debug, Clone)]
pub struct Watcher {
    client: Client,
    interval: Duration,
}

impl Watcher {
    /// Create a watcher polling every `interval`
    pub fn new(client: Client, interval: Duration) -> Self {
        Self { client, interval }
    }

    /// Delay between two polls
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Re-read `resource` until it settles
    pub async fn watch_read<S>(&self, ctx: &Context, resource: &mut S) -> Result<()>
    where
        S: Spec + Watchable + ?Sized,
    {
        self.run(ctx, &mut ReadTarget(resource)).await
    }

    /// Re-list one page until the list settles
    pub async fn watch_list<L>(
        &self,
        ctx: &Context,
        list: &mut L,
        params: Option<&SearchParams>,
    ) -> Result<()>
    where
        L: ListSpec + Watchable,
    {
        self.run(ctx, &mut ListTarget { list, params }).await
    }

    /// Re-list every page until the list settles
    pub async fn watch_list_all<L>(
        &self,
        ctx: &Context,
        list: &mut L,
        params: Option<&SearchParams>,
    ) -> Result<()>
    where
        L: CountableListSpec + Watchable,
    {
        self.run(ctx, &mut ListAllTarget { list, params }).await
    }

    /// Poll the job for `request_id` until it finishes
    pub async fn watch_job(&self, ctx: &Context, request_id: &str) -> Result<Job> {
        let mut job = Job::new(request_id);
        self.watch_read(ctx, &mut job).await?;
        Ok(job)
    }

    async fn run<T: PollTarget>(&self, ctx: &Context, target: &mut T) -> Result<()> {
        let kind = target.kind();
        let mut state = WatchState::Polling;
        let mut tick: u64 = 0;
        tracing::debug!(kind, interval = ?self.interval, "watch started");

        loop {
            tick += 1;
            let outcome = self.tick(ctx, target).await;
            let next = match &outcome {
                Ok(next) => *next,
                Err(Error::Cancelled) => WatchState::Cancelled,
                Err(Error::DeadlineExceeded) => WatchState::TimedOut,
                Err(_) => WatchState::Failed,
            };

            if next != state {
                tracing::debug!(kind, tick, from = ?state, to = ?next, "watch state changed");
                state = next;
            }
            if state.is_terminal() {
                return outcome.map(|_| ());
            }
        }
    }

    /// Exactly one step of the state machine
    async fn tick<T: PollTarget>(&self, ctx: &Context, target: &mut T) -> Result<WatchState> {
        ctx.err()?;
        tokio::select! {
            biased;
            reason = ctx.done() => return Err(reason),
            _ = tokio::time::sleep(self.interval) => {}
        }

        ctx.err()?;
        let polled = tokio::select! {
            biased;
            reason = ctx.done() => return Err(reason),
            polled = target.poll(&self.client) => polled,
        };
        ctx.err()?;

        match polled {
            Ok(request_id) => match target.progress() {
                Progress::Pending => {
                    tracing::trace!(
                        kind = target.kind(),
                        request_id = %request_id,
                        "still pending"
                    );
                    Ok(WatchState::Polling)
                }
                Progress::Succeeded => Ok(WatchState::Succeeded),
                Progress::Failed(reason) => Err(Error::WatchFailed {
                    kind: target.kind().to_string(),
                    reason,
                }),
            },
            Err(Error::BadResponse(response)) if response.is_retryable() => {
                tracing::warn!(kind = target.kind(), error = %response, "retryable poll failure");
                Ok(WatchState::Polling)
            }
            Err(e) => Err(e),
        }
    }
}

impl Client {
    /// Watcher over this client polling every `interval`
    pub fn watcher(&self, interval: Duration) -> Watcher {
        Watcher::new(self.clone(), interval)
    }

    /// Poll the job for `request_id` every `interval` until it finishes
    pub async fn watch_job(
        &self,
        ctx: &Context,
        interval: Duration,
        request_id: &str,
    ) -> Result<Job> {
        self.watcher(interval).watch_job(ctx, request_id).await
    }
}
