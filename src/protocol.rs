//! Wire protocol shared with the game server
//!
//! Frames are JSON text with an event envelope: `{"event": "...", "data": ...}`.
//! The server owns every field of a snapshot; the client only reads them.

use glam::Vec2;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ClientError;

/// Event name of the per-tick state broadcast
pub const GAME_STATE_EVENT: &str = "game_state";

/// Raw event envelope, before the payload is interpreted
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Messages the server sends to the client
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Full state snapshot for one server tick
    GameState(Snapshot),
    /// Any event this client does not consume
    Other(String),
}

impl ServerMessage {
    /// Decode one text frame
    pub fn decode(text: &str) -> Result<Self, ClientError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        if envelope.event == GAME_STATE_EVENT {
            let snapshot = serde_json::from_value(envelope.data)?;
            Ok(ServerMessage::GameState(snapshot))
        } else {
            Ok(ServerMessage::Other(envelope.event))
        }
    }
}

/// Full game state for one tick.
///
/// Every field is optional: a missing or ill-typed field decodes to `None`
/// and the renderer leaves the matching element as it was.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient")]
    pub ball_x: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub ball_y: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub player_paddle_x: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub player_paddle_width: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub game_started: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub game_over: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub ball_moving: Option<bool>,
    /// Bricks in server order; identity is the list index
    #[serde(default, deserialize_with = "lenient")]
    pub bricks: Option<Vec<BrickDesc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub falling_items: Option<Vec<FallingItemDesc>>,
    /// Present only when the server runs the multi-ball variant
    #[serde(default, deserialize_with = "lenient")]
    pub balls: Option<Vec<BallDesc>>,
}

impl Snapshot {
    /// Primary ball centre, if both coordinates arrived
    pub fn ball_center(&self) -> Option<Vec2> {
        Some(Vec2::new(self.ball_x?, self.ball_y?))
    }
}

/// A brick as described by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BrickDesc {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_breakable")]
    pub breakable: bool,
}

fn default_breakable() -> bool {
    true
}

/// A power-up falling toward the paddle
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FallingItemDesc {
    #[serde(deserialize_with = "entity_id")]
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// One ball in the multi-ball variant
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BallDesc {
    #[serde(deserialize_with = "entity_id")]
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Falls back to the snapshot's `ball_moving` when absent
    #[serde(default)]
    pub is_moving: Option<bool>,
}

/// Decode into `Some(T)` or `None` without failing the whole snapshot
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Server ids arrive as strings or integers; both become strings
fn entity_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid entity id: {}", other))),
    }
}

/// Paddle movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// Messages the client sends to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Intent {
    /// Start (or restart) the round
    StartGame,
    /// One discrete paddle step
    MovePaddle { direction: Direction },
}

impl Intent {
    /// Encode as a text frame
    pub fn encode(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_snapshot() {
        let text = r#"{"event":"game_state","data":{
            "ball_x": 400, "ball_y": 300.5,
            "player_paddle_x": 350, "player_paddle_width": 100,
            "score": 7, "game_started": true, "game_over": false, "ball_moving": true,
            "bricks": [{"x":0,"y":0,"width":50,"height":20,"breakable":false}],
            "falling_items": [{"id":"p1","x":10,"y":20,"type":"slow_ball"}],
            "balls": [{"id":3,"x":1,"y":2,"type":"normal","is_moving":true}]
        }}"#;

        let ServerMessage::GameState(snapshot) = ServerMessage::decode(text).unwrap() else {
            panic!("expected game_state");
        };
        assert_eq!(snapshot.ball_center(), Some(Vec2::new(400.0, 300.5)));
        assert_eq!(snapshot.player_paddle_width, Some(100.0));
        assert_eq!(snapshot.score, Some(7));
        assert_eq!(snapshot.game_over, Some(false));
        let bricks = snapshot.bricks.unwrap();
        assert_eq!(bricks.len(), 1);
        assert!(!bricks[0].breakable);
        assert_eq!(snapshot.falling_items.unwrap()[0].kind, "slow_ball");
        let balls = snapshot.balls.unwrap();
        assert_eq!(balls[0].id, "3");
        assert_eq!(balls[0].is_moving, Some(true));
    }

    #[test]
    fn test_decode_partial_snapshot_skips_bad_fields() {
        let text = r#"{"event":"game_state","data":{
            "ball_x": "oops", "ball_y": 10, "score": 3,
            "bricks": [{"x":0}]
        }}"#;

        let ServerMessage::GameState(snapshot) = ServerMessage::decode(text).unwrap() else {
            panic!("expected game_state");
        };
        assert_eq!(snapshot.ball_x, None);
        assert_eq!(snapshot.ball_center(), None);
        assert_eq!(snapshot.score, Some(3));
        assert_eq!(snapshot.bricks, None);
        assert_eq!(snapshot.falling_items, None);
        assert_eq!(snapshot.balls, None);
    }

    #[test]
    fn test_breakable_defaults_to_true() {
        let brick: BrickDesc =
            serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
        assert!(brick.breakable);
    }

    #[test]
    fn test_decode_other_event() {
        let msg = ServerMessage::decode(r#"{"event":"chat","data":"hi"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Other("chat".to_string()));
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(ServerMessage::decode("not json").is_err());
        assert!(ServerMessage::decode(r#"{"data":{}}"#).is_err());
    }

    #[test]
    fn test_encode_intents() {
        let start: serde_json::Value =
            serde_json::from_str(&Intent::StartGame.encode().unwrap()).unwrap();
        assert_eq!(start, serde_json::json!({"event": "start_game"}));

        let left = Intent::MovePaddle {
            direction: Direction::Left,
        };
        let value: serde_json::Value = serde_json::from_str(&left.encode().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"event": "move_paddle", "data": {"direction": "left"}})
        );
    }
}
