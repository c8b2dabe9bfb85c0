//! Session controller
//!
//! One per page load. Owns the surface, the renderer, the intent encoder and
//! the outbound channel, and routes host events between them. Every entry
//! point runs to completion on the caller's event-loop turn.

use crate::error::ClientError;
use crate::input::{IntentEncoder, IntervalTimer};
use crate::protocol::{Intent, ServerMessage, Snapshot};
use crate::settings::Settings;
use crate::view::{CadenceEstimator, SnapshotRenderer, Surface};

/// Outbound half of the server channel
pub trait IntentSink {
    fn send(&mut self, intent: &Intent);
}

/// Collects intents in memory (headless sessions and tests)
impl IntentSink for Vec<Intent> {
    fn send(&mut self, intent: &Intent) {
        self.push(intent.clone());
    }
}

pub struct Session<S, T, C>
where
    S: Surface,
    T: IntervalTimer,
    C: IntentSink,
{
    surface: S,
    renderer: SnapshotRenderer<S::Handle>,
    encoder: IntentEncoder<T>,
    sink: C,
    cadence: CadenceEstimator,
    snapshots: u64,
}

impl<S, T, C> Session<S, T, C>
where
    S: Surface,
    T: IntervalTimer,
    C: IntentSink,
{
    pub fn new(settings: &Settings, mut surface: S, timer: T, sink: C) -> Result<Self, ClientError> {
        let renderer = SnapshotRenderer::new(&mut surface, settings.ball_radius)?;
        let encoder = IntentEncoder::new(settings.keys.clone(), settings.repeat_period(), timer);
        let cadence = CadenceEstimator::new(settings.tick_interval(), settings.adaptive_cadence);

        Ok(Self {
            surface,
            renderer,
            encoder,
            sink,
            cadence,
            snapshots: 0,
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn renderer(&self) -> &SnapshotRenderer<S::Handle> {
        &self.renderer
    }

    pub fn encoder(&self) -> &IntentEncoder<T> {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut IntentEncoder<T> {
        &mut self.encoder
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Snapshots rendered so far
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    /// Inbound text frame. Bad frames are logged and dropped; the screen
    /// keeps showing the last good state.
    pub fn on_message(&mut self, text: &str, now_ms: f64) {
        match ServerMessage::decode(text) {
            Ok(ServerMessage::GameState(snapshot)) => self.on_snapshot(&snapshot, now_ms),
            Ok(ServerMessage::Other(event)) => log::debug!("Ignoring event '{}'", event),
            Err(e) => log::warn!("Dropping frame: {}", e),
        }
    }

    pub fn on_snapshot(&mut self, snapshot: &Snapshot, now_ms: f64) {
        self.cadence.observe(now_ms);
        self.renderer
            .render(&mut self.surface, snapshot, self.cadence.interval());
        self.snapshots += 1;
        if self.snapshots == 1 {
            log::info!("First snapshot rendered");
        }
    }

    /// Returns true when the host should suppress the key's default action
    pub fn on_key_down(&mut self, key: &str) -> bool {
        let response = self.encoder.key_down(key);
        if let Some(intent) = &response.intent {
            self.sink.send(intent);
        }
        response.suppress_default
    }

    /// Returns true when the host should suppress the key's default action
    pub fn on_key_up(&mut self, key: &str) -> bool {
        self.encoder.key_up(key).suppress_default
    }

    /// Repeat timer fired
    pub fn on_repeat_tick(&mut self) {
        for intent in self.encoder.repeat_tick() {
            self.sink.send(&intent);
        }
    }

    /// Start/Restart button
    pub fn on_start_clicked(&mut self) {
        self.sink.send(&Intent::StartGame);
    }

    /// Window blurred: key-ups will not arrive, stop moving
    pub fn on_focus_lost(&mut self) {
        if self.encoder.is_repeating() {
            log::debug!("Focus lost, releasing held keys");
        }
        self.encoder.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ManualTimer;
    use crate::protocol::Direction;
    use crate::view::{ElementKind, MemorySurface, StatusMessage, Transition};
    use std::time::Duration;

    type TestSession = Session<MemorySurface, ManualTimer, Vec<Intent>>;

    fn session() -> TestSession {
        Session::new(&Settings::default(), MemorySurface::new(), ManualTimer::new(), Vec::new()).unwrap()
    }

    fn frame(body: &str) -> String {
        format!(r#"{{"event":"game_state","data":{}}}"#, body)
    }

    fn tick(s: &mut TestSession, dt: Duration) {
        let ticks = s.encoder_mut().timer_mut().elapse(dt);
        for _ in 0..ticks {
            s.on_repeat_tick();
        }
    }

    #[test]
    fn test_frames_drive_view() {
        let mut s = session();
        s.on_message(
            &frame(
                r#"{"ball_x":100,"ball_y":100,"player_paddle_x":10,"player_paddle_width":80,
                    "score":2,"game_started":true,"game_over":false,"ball_moving":true,
                    "bricks":[{"x":0,"y":0,"width":50,"height":20,"breakable":true}],
                    "falling_items":[{"id":"p1","x":5,"y":5,"type":"grow"}]}"#,
            ),
            0.0,
        );
        assert_eq!(s.snapshots(), 1);
        assert_eq!(s.renderer().bricks().len(), 1);
        assert_eq!(s.renderer().falling_items().len(), 1);
        assert_eq!(s.renderer().status(), Some(StatusMessage::Hidden));
        assert_eq!(s.surface().singleton(ElementKind::Score).unwrap().text, "2");

        s.on_message(
            &frame(r#"{"game_started":false,"game_over":true,"bricks":[],"falling_items":[]}"#),
            16.0,
        );
        assert!(s.renderer().bricks().is_empty());
        assert!(s.renderer().falling_items().is_empty());
        assert_eq!(s.renderer().status(), Some(StatusMessage::GameOver));
        assert!(s.surface().elements_of(ElementKind::Brick).is_empty());
    }

    #[test]
    fn test_bad_frames_keep_last_state() {
        let mut s = session();
        s.on_message(&frame(r#"{"score":5,"bricks":[{"x":0,"y":0,"width":1,"height":1}]}"#), 0.0);
        s.on_message("garbage", 16.0);
        s.on_message(r#"{"event":"player_joined","data":{}}"#, 32.0);
        assert_eq!(s.snapshots(), 1);
        assert_eq!(s.renderer().bricks().len(), 1);
        assert_eq!(s.surface().singleton(ElementKind::Score).unwrap().text, "5");
    }

    #[test]
    fn test_interpolation_follows_arrival_rate() {
        let mut s = session();
        let moving = frame(r#"{"ball_x":1,"ball_y":1,"game_over":false,"ball_moving":true}"#);
        for i in 0..5 {
            s.on_message(&moving, f64::from(i) * 25.0);
        }
        let ball = s.surface().singleton(ElementKind::PrimaryBall).unwrap();
        assert_eq!(ball.transition, Some(Transition::Linear(Duration::from_millis(25))));
    }

    #[test]
    fn test_negative_stored_tick_interval() {
        let settings = Settings::from_json(r#"{"tick_interval_ms": -16}"#).unwrap();
        let mut s: TestSession =
            Session::new(&settings, MemorySurface::new(), ManualTimer::new(), Vec::new()).unwrap();
        let moving = frame(r#"{"ball_x":1,"ball_y":1,"game_over":false,"ball_moving":true}"#);
        s.on_message(&moving, 0.0);
        s.on_message(&moving, 20.0);
        assert_eq!(s.snapshots(), 2);
        let ball = s.surface().singleton(ElementKind::PrimaryBall).unwrap();
        assert_eq!(ball.transition, Some(Transition::Linear(Duration::from_millis(20))));
    }

    #[test]
    fn test_keys_reach_sink() {
        let mut s = session();
        assert!(s.on_key_down(" "));
        assert!(s.on_key_down("ArrowLeft"));
        assert!(!s.on_key_down("q"));
        tick(&mut s, Duration::from_millis(100));
        assert!(s.on_key_up("ArrowLeft"));
        tick(&mut s, Duration::from_millis(100));

        let left = Intent::MovePaddle {
            direction: Direction::Left,
        };
        assert_eq!(s.sink(), &vec![Intent::StartGame, left.clone(), left]);
    }

    #[test]
    fn test_start_button_and_blur() {
        let mut s = session();
        s.on_start_clicked();
        s.on_key_down("d");
        s.on_focus_lost();
        tick(&mut s, Duration::from_millis(200));
        assert_eq!(s.sink(), &vec![Intent::StartGame]);
        assert!(!s.encoder().is_repeating());
    }
}
