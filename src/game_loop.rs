//! Gravity timer and lifecycle around a [`Game`].
//!
//! The loop owns the authoritative game. Front-ends feed it the current
//! instant and player actions, then redraw from `game()` whenever a call
//! returns events.

use std::time::{Duration, Instant};

use log::{info, trace};

use crate::config::{Config, RestartPolicy};
use crate::game::{Game, GameEvent};

pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    Restart,
}

/// Fixed-interval timer that can be stopped and restarted.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    interval: Duration,
    last_tick: Instant,
    running: bool,
}

impl Timer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
            running: true,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self, now: Instant) {
        self.last_tick = now;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Time left until the next tick, or `None` while stopped.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.last_tick);
        Some(self.interval.checked_sub(elapsed).unwrap_or(Duration::ZERO))
    }

    /// Consumes a tick if one is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        if !self.running || now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }
        self.last_tick = now;
        true
    }
}

pub struct GameLoop {
    game: Game,
    timer: Timer,
    policy: RestartPolicy,
    final_score: Option<u32>,
}

impl GameLoop {
    pub fn new(game: Game, config: &Config, now: Instant) -> Self {
        Self {
            game,
            timer: Timer::new(config.tick, now),
            policy: config.restart,
            final_score: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Score of the most recently finished game, kept until the next manual
    /// restart so the front-end can keep showing it.
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Runs gravity if the timer is due.
    pub fn update(&mut self, now: Instant) -> Vec<GameEvent> {
        if !self.timer.fire(now) {
            return Vec::new();
        }
        trace!("gravity tick");
        self.game.tick();
        self.settle(now)
    }

    pub fn handle(&mut self, action: Action, now: Instant) -> Vec<GameEvent> {
        match action {
            Action::MoveLeft => {
                self.game.move_left();
            }
            Action::MoveRight => {
                self.game.move_right();
            }
            Action::MoveDown => {
                self.game.move_down();
            }
            Action::Rotate => {
                self.game.rotate();
            }
            Action::Restart => {
                self.final_score = None;
                self.restart(now);
            }
        }
        self.settle(now)
    }

    fn restart(&mut self, now: Instant) {
        self.game.reset();
        self.timer.start(now);
    }

    fn settle(&mut self, now: Instant) -> Vec<GameEvent> {
        let events = self.game.take_events();
        let final_score = events.iter().find_map(|event| match event {
            GameEvent::GameOver { final_score } => Some(*final_score),
            _ => None,
        });

        let Some(score) = final_score else {
            return events;
        };

        self.timer.stop();
        self.final_score = Some(score);

        match self.policy {
            RestartPolicy::Manual => events,
            RestartPolicy::Auto => {
                info!("restarting automatically after score {}", score);
                let mut events = events;
                self.restart(now);
                events.extend(self.game.take_events());
                events
            }
        }
    }
}
