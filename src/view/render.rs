//! Snapshot renderer
//!
//! Applies one server snapshot to the surface: singletons (paddle, primary
//! ball, score, status banner, start button) are positioned directly, the
//! dynamic classes (bricks, falling items, multi-ball balls) go through their
//! registries. Fields missing from a snapshot leave their element untouched,
//! except `balls`: without it the client is back to the single primary ball.

use std::time::Duration;

use glam::Vec2;

use super::reconcile::Registry;
use super::surface::{Attributes, ElementKind, Surface, Transition};
use crate::error::ClientError;
use crate::protocol::{BallDesc, BrickDesc, FallingItemDesc, Snapshot};

/// Banner shown over the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    GameOver,
    PressToStart,
    Hidden,
}

impl StatusMessage {
    /// Game over takes precedence over the start prompt
    pub fn decide(game_over: bool, game_started: bool) -> Self {
        if game_over {
            StatusMessage::GameOver
        } else if !game_started {
            StatusMessage::PressToStart
        } else {
            StatusMessage::Hidden
        }
    }

    pub fn text(&self) -> Option<&'static str> {
        match self {
            StatusMessage::GameOver => Some("Game Over"),
            StatusMessage::PressToStart => Some("Press Space to start"),
            StatusMessage::Hidden => None,
        }
    }

    /// Label of the start button, or `None` while it is hidden
    pub fn button_label(&self) -> Option<&'static str> {
        match self {
            StatusMessage::GameOver => Some("Restart Game"),
            StatusMessage::PressToStart => Some("Start Game"),
            StatusMessage::Hidden => None,
        }
    }
}

/// Snap when the round is over or the entity is at rest, otherwise slide
/// for one snapshot interval
pub fn transition_for(game_over: bool, moving: bool, interval: Duration) -> Transition {
    if game_over || !moving {
        Transition::Instant
    } else {
        Transition::Linear(interval)
    }
}

/// Owns every element the snapshots drive
pub struct SnapshotRenderer<H> {
    ball_radius: f32,
    primary_ball: H,
    paddle: H,
    score: H,
    status: H,
    start_button: H,
    bricks: Registry<usize, H>,
    falling_items: Registry<String, H>,
    balls: Registry<String, H>,
    /// Last snapshot carried a `balls` list
    multi_ball: bool,
    status_shown: Option<StatusMessage>,
}

impl<H> SnapshotRenderer<H> {
    /// Resolve the singletons and set up the per-class registries
    pub fn new<S>(surface: &mut S, ball_radius: f32) -> Result<Self, ClientError>
    where
        S: Surface<Handle = H>,
    {
        let diameter = Vec2::splat(ball_radius * 2.0);

        let primary_ball = surface.create(ElementKind::PrimaryBall)?;
        surface.set_attributes(&primary_ball, &Attributes::new().with_size(diameter));
        let paddle = surface.create(ElementKind::Paddle)?;
        let score = surface.create(ElementKind::Score)?;
        let status = surface.create(ElementKind::Status)?;
        let start_button = surface.create(ElementKind::StartButton)?;

        Ok(Self {
            ball_radius,
            primary_ball,
            paddle,
            score,
            status,
            start_button,
            bricks: Registry::new(
                ElementKind::Brick,
                Attributes::new().with_class("brick", true),
            ),
            falling_items: Registry::new(
                ElementKind::FallingItem,
                Attributes::new().with_class("falling-item", true),
            ),
            balls: Registry::new(
                ElementKind::Ball,
                Attributes::new()
                    .with_class("ball", true)
                    .with_size(diameter),
            ),
            multi_ball: false,
            status_shown: None,
        })
    }

    pub fn bricks(&self) -> &Registry<usize, H> {
        &self.bricks
    }

    pub fn falling_items(&self) -> &Registry<String, H> {
        &self.falling_items
    }

    pub fn balls(&self) -> &Registry<String, H> {
        &self.balls
    }

    /// Last status decided, if any snapshot carried the flags
    pub fn status(&self) -> Option<StatusMessage> {
        self.status_shown
    }

    /// Apply one snapshot. `interval` is the slide duration for moving entities.
    pub fn render<S>(&mut self, surface: &mut S, snapshot: &Snapshot, interval: Duration)
    where
        S: Surface<Handle = H>,
    {
        let game_over = snapshot.game_over.unwrap_or(false);
        let ball_moving = snapshot.ball_moving.unwrap_or(false);

        self.render_paddle(surface, snapshot, transition_for(game_over, ball_moving, interval));
        self.render_balls(surface, snapshot, game_over, ball_moving, interval);

        if let Some(score) = snapshot.score {
            surface.set_attributes(&self.score, &Attributes::new().with_text(score.to_string()));
        }

        self.render_status(surface, snapshot);

        if let Some(bricks) = &snapshot.bricks {
            let report = self
                .bricks
                .reconcile(surface, bricks.iter().enumerate().map(|(i, b)| (i, brick_attributes(b))));
            log::trace!("bricks: {:?}", report);
        }

        if let Some(items) = &snapshot.falling_items {
            let report = self
                .falling_items
                .reconcile(surface, items.iter().map(|item| (item.id.clone(), item_attributes(item))));
            log::trace!("falling items: {:?}", report);
        }
    }

    fn render_paddle<S>(&self, surface: &mut S, snapshot: &Snapshot, transition: Transition)
    where
        S: Surface<Handle = H>,
    {
        let mut attrs = Attributes::new().with_transition(transition);
        attrs.x = snapshot.player_paddle_x;
        attrs.width = snapshot.player_paddle_width;
        surface.set_attributes(&self.paddle, &attrs);
    }

    fn render_balls<S>(
        &mut self,
        surface: &mut S,
        snapshot: &Snapshot,
        game_over: bool,
        ball_moving: bool,
        interval: Duration,
    ) where
        S: Surface<Handle = H>,
    {
        let offset = Vec2::splat(self.ball_radius);

        if let Some(balls) = &snapshot.balls {
            if !self.multi_ball {
                log::info!("Switching to multi-ball");
                self.multi_ball = true;
                surface.set_attributes(&self.primary_ball, &Attributes::new().shown(false));
            }
            let incoming = balls.iter().map(|ball| {
                let moving = ball.is_moving.unwrap_or(ball_moving);
                let attrs = ball_attributes(ball, offset)
                    .with_transition(transition_for(game_over, moving, interval));
                (ball.id.clone(), attrs)
            });
            let report = self.balls.reconcile(surface, incoming);
            log::trace!("balls: {:?}", report);
            return;
        }

        if self.multi_ball {
            log::info!("Back to a single ball");
            self.multi_ball = false;
            let report = self.balls.reconcile(surface, std::iter::empty());
            log::trace!("balls: {:?}", report);
            surface.set_attributes(&self.primary_ball, &Attributes::new().shown(true));
        }
        if let Some(center) = snapshot.ball_center() {
            let attrs = Attributes::new()
                .at(center - offset)
                .shown(true)
                .with_transition(transition_for(game_over, ball_moving, interval));
            surface.set_attributes(&self.primary_ball, &attrs);
        }
    }

    fn render_status<S>(&mut self, surface: &mut S, snapshot: &Snapshot)
    where
        S: Surface<Handle = H>,
    {
        let status = match (snapshot.game_over, snapshot.game_started) {
            (Some(true), _) => StatusMessage::GameOver,
            (Some(false), Some(started)) => StatusMessage::decide(false, started),
            _ => return,
        };

        let mut banner = Attributes::new().shown(status.text().is_some());
        banner.text = status.text().map(str::to_string);
        surface.set_attributes(&self.status, &banner);

        let mut button = Attributes::new().shown(status.button_label().is_some());
        button.text = status.button_label().map(str::to_string);
        surface.set_attributes(&self.start_button, &button);

        if self.status_shown != Some(status) {
            log::debug!("Status: {:?}", status);
            self.status_shown = Some(status);
        }
    }
}

fn brick_attributes(brick: &BrickDesc) -> Attributes {
    Attributes::new()
        .at(Vec2::new(brick.x, brick.y))
        .with_size(Vec2::new(brick.width, brick.height))
        .with_class("breakable", brick.breakable)
        .with_class("unbreakable", !brick.breakable)
}

fn item_attributes(item: &FallingItemDesc) -> Attributes {
    Attributes::new()
        .at(Vec2::new(item.x, item.y))
        .with_kind(item.kind.clone())
}

fn ball_attributes(ball: &BallDesc, offset: Vec2) -> Attributes {
    Attributes::new()
        .at(Vec2::new(ball.x, ball.y) - offset)
        .with_kind(ball.kind.clone())
}
