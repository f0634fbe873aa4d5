//! Visualization session: playback, scene and the actor that drives them.
//!
//! A [`Session`] is plain data with synchronous transitions. To run one
//! with autoplay, [`spawn_session`] moves it into a tokio task that applies
//! intents, timer ticks and queries strictly one at a time, and owns the
//! autoplay timer for as long as the task lives.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use lacuna_scene::Scene;

use crate::autoplay::Autoplay;
use crate::error::{Error, Result};
use crate::playback::{Playback, PlaybackStatus, TickOutcome};
use crate::render::render;
use crate::timeline::{Seed, Timeline};

/// Navigation intents a shell can send.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    TogglePlay,
    Next,
    Prev,
    Seek { step: i64 },
    SetSpeed { speed: f64 },
    Reset,
}

/// One visualization session: a playback controller plus the scene that
/// shows its current step.
#[derive(Debug)]
pub struct Session {
    playback: Playback,
    scene: Scene,
}

impl Session {
    /// Start a session for `seed`, rendered at step 0.
    pub fn new(seed: Seed) -> Self {
        let mut session = Self {
            playback: Playback::new(seed),
            scene: Scene::new(),
        };
        session.redraw();
        info!(
            n = session.playback.timeline().len(),
            total_steps = session.playback.total_steps(),
            "session started"
        );
        session
    }

    /// Apply one intent, redrawing if the visible step changed.
    pub fn dispatch(&mut self, intent: Intent) -> Result<()> {
        let before = self.playback.current_step();
        let mut stale = false;
        match intent {
            Intent::TogglePlay => self.playback.toggle_play(),
            Intent::Next => self.playback.next(),
            Intent::Prev => self.playback.prev(),
            Intent::Seek { step } => self.playback.seek(step),
            Intent::SetSpeed { speed } => {
                if let Err(e) = self.playback.set_speed(speed) {
                    warn!("rejected speed change: {}", e);
                    return Err(e);
                }
            }
            Intent::Reset => {
                self.playback.reset();
                stale = true;
            }
        }
        if stale || self.playback.current_step() != before {
            self.redraw();
        }
        debug!(
            ?intent,
            step = self.playback.current_step(),
            playing = self.playback.is_playing(),
            "applied intent"
        );
        Ok(())
    }

    /// Apply one autoplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.playback.tick();
        match outcome {
            TickOutcome::Advanced => self.redraw(),
            TickOutcome::Stopped => debug!("autoplay reached the last step"),
            TickOutcome::Idle => {}
        }
        outcome
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus::from(&self.playback)
    }

    /// Current scene as an SVG document.
    pub fn svg(&self) -> String {
        self.scene.to_svg()
    }

    fn redraw(&mut self) {
        render(
            &mut self.scene,
            self.playback.timeline(),
            self.playback.current_step(),
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

enum Command {
    Dispatch(Intent, oneshot::Sender<Result<PlaybackStatus>>),
    Status(oneshot::Sender<PlaybackStatus>),
    Svg(oneshot::Sender<String>),
    Timeline(oneshot::Sender<Timeline>),
}

/// Cloneable handle to a running session actor.
///
/// The actor stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Apply an intent and return the resulting status.
    pub async fn dispatch(&self, intent: Intent) -> Result<PlaybackStatus> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Dispatch(intent, tx)).await?;
        rx.await.map_err(|_| Error::SessionClosed)?
    }

    pub async fn status(&self) -> Result<PlaybackStatus> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Status(tx)).await?;
        rx.await.map_err(|_| Error::SessionClosed)
    }

    pub async fn svg(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Svg(tx)).await?;
        rx.await.map_err(|_| Error::SessionClosed)
    }

    pub async fn timeline(&self) -> Result<Timeline> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Timeline(tx)).await?;
        rx.await.map_err(|_| Error::SessionClosed)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| Error::SessionClosed)
    }
}

/// Move `session` into an actor task.
///
/// The join handle yields the session back once all handles are dropped.
/// The autoplay timer lives inside the task and is released when playback
/// stops or the task ends.
pub fn spawn_session(session: Session) -> (SessionHandle, JoinHandle<Session>) {
    let (tx, rx) = mpsc::channel(32);
    let task = tokio::spawn(run(session, rx));
    (SessionHandle { tx }, task)
}

async fn run(mut session: Session, mut commands: mpsc::Receiver<Command>) -> Session {
    let (tick_tx, mut ticks) = mpsc::channel(1);
    let mut autoplay = Autoplay::default();

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle(&mut session, command),
                None => break,
            },
            Some(generation) = ticks.recv() => {
                if autoplay.is_current(generation) {
                    session.tick();
                }
            }
        }

        let desired = session
            .playback()
            .is_playing()
            .then(|| session.playback().tick_interval());
        autoplay.sync(desired, &tick_tx);
    }

    drop(autoplay);
    info!("session closed");
    session
}

fn handle(session: &mut Session, command: Command) {
    match command {
        Command::Dispatch(intent, reply) => {
            let result = session.dispatch(intent).map(|()| session.status());
            let _ = reply.send(result);
        }
        Command::Status(reply) => {
            let _ = reply.send(session.status());
        }
        Command::Svg(reply) => {
            let _ = reply.send(session.svg());
        }
        Command::Timeline(reply) => {
            let _ = reply.send(session.playback().timeline().clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn new_session_renders_step_zero() {
        let session = Session::default();
        assert!(!session.scene().is_empty());
        assert!(session.svg().contains("Initialize array"));
    }

    #[test]
    fn dispatch_redraws_on_step_change() {
        let mut session = Session::default();
        session.dispatch(Intent::Next).unwrap();
        assert_eq!(session.status().current_step, 1);
        assert!(session.svg().contains("Process index 0"));

        session.dispatch(Intent::Seek { step: 999 }).unwrap();
        assert!(session.svg().contains("Missing: [5, 6]"));
    }

    #[test]
    fn invalid_speed_is_reported() {
        let mut session = Session::default();
        let err = session.dispatch(Intent::SetSpeed { speed: 0.0 }).unwrap_err();
        assert!(matches!(err, Error::InvalidSpeed(_)));
        assert_eq!(session.status().speed, 1.0);
    }

    #[test]
    fn reset_redraws_from_scratch() {
        let mut session = Session::default();
        let initial = session.svg();
        session.dispatch(Intent::Seek { step: 5 }).unwrap();
        session.dispatch(Intent::TogglePlay).unwrap();
        session.dispatch(Intent::Reset).unwrap();

        assert_eq!(session.svg(), initial);
        assert!(!session.status().is_playing);
    }

    #[test]
    fn reset_redraws_once() {
        let mut session = Session::default();
        let first_slot = |session: &Session| {
            let scene = session.scene();
            scene.children(scene.root())[0].value()
        };

        session.dispatch(Intent::Reset).unwrap();
        let before = first_slot(&session);
        let per_render = session.scene().len() as u64;

        session.dispatch(Intent::Reset).unwrap();
        assert_eq!(first_slot(&session), before + per_render);
    }

    #[test]
    fn intent_json_shape() {
        let intent: Intent = serde_json::from_str(r#"{"type":"seek","step":-5}"#).unwrap();
        assert_eq!(intent, Intent::Seek { step: -5 });
        let json = serde_json::to_string(&Intent::TogglePlay).unwrap();
        assert_eq!(json, r#"{"type":"toggle_play"}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_runs_to_the_end_and_stops() {
        let (handle, _task) = spawn_session(Session::default());
        handle.dispatch(Intent::SetSpeed { speed: 2.0 }).await.unwrap();
        let status = handle.dispatch(Intent::TogglePlay).await.unwrap();
        assert!(status.is_playing);

        tokio::time::sleep(Duration::from_secs(10)).await;

        let status = handle.status().await.unwrap();
        assert_eq!(status.current_step, 16);
        assert!(!status.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn pausing_stops_future_ticks() {
        let (handle, _task) = spawn_session(Session::default());
        handle.dispatch(Intent::TogglePlay).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let status = handle.dispatch(Intent::TogglePlay).await.unwrap();
        assert_eq!(status.current_step, 1);
        assert!(!status.is_playing);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.status().await.unwrap().current_step, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_restarts_the_timer() {
        let (handle, _task) = spawn_session(Session::default());
        handle.dispatch(Intent::TogglePlay).await.unwrap();

        // One tick at 1.0s, then 250ms ticks from 1.5s on.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle
            .dispatch(Intent::SetSpeed { speed: 4.0 })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(handle.status().await.unwrap().current_step, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn tiny_speed_keeps_session_alive() {
        let (handle, _task) = spawn_session(Session::default());
        handle
            .dispatch(Intent::SetSpeed { speed: 1e-300 })
            .await
            .unwrap();
        let status = handle.dispatch(Intent::TogglePlay).await.unwrap();
        assert!(status.is_playing);

        tokio::time::sleep(Duration::from_secs(60)).await;

        let status = handle.status().await.unwrap();
        assert_eq!(status.current_step, 0);
        assert!(status.is_playing);
        handle.dispatch(Intent::Next).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn huge_speed_plays_to_the_end() {
        let (handle, _task) = spawn_session(Session::default());
        handle
            .dispatch(Intent::SetSpeed { speed: 1e12 })
            .await
            .unwrap();
        handle.dispatch(Intent::TogglePlay).await.unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;

        let status = handle.status().await.unwrap();
        assert_eq!(status.current_step, 16);
        assert!(!status.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handles_ends_the_session() {
        let (handle, task) = spawn_session(Session::default());
        handle.dispatch(Intent::TogglePlay).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        drop(handle);

        let session = task.await.unwrap();
        assert_eq!(session.playback().current_step(), 1);
    }

    #[tokio::test]
    async fn closed_session_reports_error() {
        let (handle, task) = spawn_session(Session::default());
        task.abort();
        let _ = task.await;
        assert!(matches!(handle.status().await, Err(Error::SessionClosed)));
    }

    #[tokio::test]
    async fn queries_return_timeline_and_svg() {
        let (handle, _task) = spawn_session(Session::default());
        let timeline = handle.timeline().await.unwrap();
        assert_eq!(timeline.result(), &[5, 6]);
        assert!(handle.svg().await.unwrap().starts_with("<svg"));
    }
}
