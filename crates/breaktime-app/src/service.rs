//! Break service: a tokio task that owns the scheduler.
//!
//! Every user action and timer firing is a message handled one at a time on
//! the service task, so scheduler transitions never interleave. After each
//! message the service publishes a fresh [`SchedulerSnapshot`] on a watch
//! channel.

use breaktime_core::{
    BreakKind, Scheduler, SchedulerConfig, SchedulerSnapshot, SchedulerState, SettingKey,
    SettingValue, SettingsError, SettingsStore,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::hooks::HookRunner;
use crate::notify::HookNotifier;
use crate::surface::{ChannelSurface, PresentationEvent};
use crate::timers::{TimerFiring, TokioTimers};

type Reply = oneshot::Sender<Result<(), SettingsError>>;

/// Errors surfaced through [`BreakHandle`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service task has stopped and no longer accepts commands.
    #[error("break service is not running")]
    Stopped,

    /// The settings store rejected a change.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Debug)]
enum Command {
    Start,
    Pause,
    SkipBreak,
    TriggerBreak(BreakKind),
    SetSetting(SettingKey, SettingValue, Reply),
    ResetSetting(SettingKey, Reply),
    Shutdown,
}

/// Wiring for a new service.
#[derive(Debug, Default)]
pub struct ServiceOptions {
    /// Receives overlay show/dismiss events.
    pub presenter: Option<mpsc::UnboundedSender<PresentationEvent>>,
    /// Hook scripts for break lifecycle events.
    pub hooks: HookRunner,
    /// Ring the terminal bell when a break completes.
    pub bell: bool,
    /// Call `start` before handling the first command.
    pub autostart: bool,
}

/// Owner of the scheduler; see the module docs.
pub struct BreakService<S> {
    scheduler: Scheduler<S, TokioTimers>,
    commands: mpsc::UnboundedReceiver<Command>,
    firings: mpsc::UnboundedReceiver<TimerFiring>,
    snapshots: watch::Sender<SchedulerSnapshot>,
}

impl<S> BreakService<S>
where
    S: SettingsStore + Send + 'static,
{
    /// Spawn the service on the current tokio runtime.
    ///
    /// The returned join handle completes after [`BreakHandle::shutdown`] or
    /// once every handle has been dropped.
    #[must_use]
    pub fn spawn(settings: S, options: ServiceOptions) -> (BreakHandle, JoinHandle<()>) {
        let initial = SchedulerSnapshot::new(
            SchedulerState::default(),
            SchedulerConfig::resolve(&settings),
        );
        let (snapshots, snapshot_rx) = watch::channel(initial);
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (firing_tx, firings) = mpsc::unbounded_channel();

        let surface = ChannelSurface::new(
            options.presenter,
            options.hooks.clone(),
            snapshot_rx.clone(),
        );
        let notifier = HookNotifier::new(options.hooks, options.bell, snapshot_rx.clone());
        let scheduler = Scheduler::new(settings, TokioTimers::new(firing_tx))
            .with_surface(Box::new(surface))
            .with_sink(Box::new(notifier));

        let service = Self {
            scheduler,
            commands,
            firings,
            snapshots,
        };
        let autostart = options.autostart;
        let task = tokio::spawn(service.run(autostart));

        let handle = BreakHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (handle, task)
    }

    async fn run(mut self, autostart: bool) {
        if autostart {
            self.scheduler.start();
            self.publish();
        }
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(command) => {
                        let pending = self.handle(command);
                        // Callers read the snapshot as soon as the reply lands.
                        self.publish();
                        if let Some((reply, result)) = pending {
                            let _ = reply.send(result);
                        }
                    }
                },
                Some(firing) = self.firings.recv() => {
                    self.on_firing(firing);
                    self.publish();
                }
            }
        }
        debug!("break service stopped");
    }

    /// Apply a command. Setting edits hand back their reply, to be sent after publishing.
    fn handle(&mut self, command: Command) -> Option<(Reply, Result<(), SettingsError>)> {
        trace!(?command, "command");
        match command {
            Command::Start => self.scheduler.start(),
            Command::Pause => self.scheduler.pause(),
            Command::SkipBreak => self.scheduler.skip_break(),
            Command::TriggerBreak(kind) => self.scheduler.trigger_break(kind),
            Command::SetSetting(key, value, reply) => {
                let result = self.scheduler.settings_mut().set(key, value);
                if result.is_ok() {
                    debug!(%key, %value, "setting changed");
                }
                return Some((reply, result));
            }
            Command::ResetSetting(key, reply) => {
                let result = self.scheduler.settings_mut().remove(key);
                if result.is_ok() {
                    debug!(%key, "setting reset");
                }
                return Some((reply, result));
            }
            Command::Shutdown => {}
        }
        None
    }

    fn on_firing(&mut self, firing: TimerFiring) {
        if self.scheduler.timers().is_current(firing) {
            self.scheduler.on_timer(firing.timer);
        } else {
            trace!(timer = ?firing.timer, generation = firing.generation, "dropping stale firing");
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.scheduler.snapshot());
    }
}

/// Cloneable handle for sending actions to a running [`BreakService`].
#[derive(Debug, Clone)]
pub struct BreakHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SchedulerSnapshot>,
}

impl BreakHandle {
    /// Begin a fresh work session.
    ///
    /// # Errors
    /// Returns [`ServiceError::Stopped`] if the service is gone.
    pub fn start(&self) -> Result<(), ServiceError> {
        self.send(Command::Start)
    }

    /// Pause the work clock.
    ///
    /// # Errors
    /// Returns [`ServiceError::Stopped`] if the service is gone.
    pub fn pause(&self) -> Result<(), ServiceError> {
        self.send(Command::Pause)
    }

    /// End the current break early.
    ///
    /// # Errors
    /// Returns [`ServiceError::Stopped`] if the service is gone.
    pub fn skip_break(&self) -> Result<(), ServiceError> {
        self.send(Command::SkipBreak)
    }

    /// Take a break of `kind` right now.
    ///
    /// # Errors
    /// Returns [`ServiceError::Stopped`] if the service is gone.
    pub fn trigger_break(&self, kind: BreakKind) -> Result<(), ServiceError> {
        self.send(Command::TriggerBreak(kind))
    }

    /// Store a setting and wait until the service has applied it.
    ///
    /// # Errors
    /// Returns [`ServiceError::Stopped`] if the service is gone, or
    /// [`ServiceError::Settings`] if the store rejected the value.
    pub async fn set_setting(&self, key: SettingKey, value: SettingValue) -> Result<(), ServiceError> {
        let reply = self.request(|reply| Command::SetSetting(key, value, reply))?;
        Ok(reply.await.map_err(|_| ServiceError::Stopped)??)
    }

    /// Forget a stored setting so its default applies again.
    ///
    /// # Errors
    /// Same as [`BreakHandle::set_setting`].
    pub async fn reset_setting(&self, key: SettingKey) -> Result<(), ServiceError> {
        let reply = self.request(|reply| Command::ResetSetting(key, reply))?;
        Ok(reply.await.map_err(|_| ServiceError::Stopped)??)
    }

    /// Blocking form of [`BreakHandle::set_setting`] for synchronous callers.
    ///
    /// Must not be called from inside an async task.
    ///
    /// # Errors
    /// Same as [`BreakHandle::set_setting`].
    pub fn set_setting_blocking(&self, key: SettingKey, value: SettingValue) -> Result<(), ServiceError> {
        let reply = self.request(|reply| Command::SetSetting(key, value, reply))?;
        Ok(reply.blocking_recv().map_err(|_| ServiceError::Stopped)??)
    }

    /// Blocking form of [`BreakHandle::reset_setting`].
    ///
    /// # Errors
    /// Same as [`BreakHandle::set_setting`].
    pub fn reset_setting_blocking(&self, key: SettingKey) -> Result<(), ServiceError> {
        let reply = self.request(|reply| Command::ResetSetting(key, reply))?;
        Ok(reply.blocking_recv().map_err(|_| ServiceError::Stopped)??)
    }

    /// Receiver of snapshots published after every handled message.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SchedulerSnapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SchedulerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Ask the service to stop. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    fn send(&self, command: Command) -> Result<(), ServiceError> {
        self.commands
            .send(command)
            .map_err(|_| ServiceError::Stopped)
    }

    fn request(
        &self,
        command: impl FnOnce(Reply) -> Command,
    ) -> Result<oneshot::Receiver<Result<(), SettingsError>>, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(command(reply))?;
        Ok(rx)
    }
}
