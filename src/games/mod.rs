pub mod coin_run;
pub mod hockey;
pub mod invaders;
pub mod platformer;

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::info;
use ratatui::prelude::*;

use crate::core::{Action, InputState, Millis, Ruleset, Session, Status};
use crate::ui::field;

pub trait Game {
    fn update(&mut self);
    fn handle_input(&mut self, key: KeyEvent);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn is_game_over(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct Marquee {
    pub title: &'static str,
    pub accent: Color,
    pub help: &'static [(&'static str, &'static str)],
}

pub struct Cabinet {
    session: Session,
    input: InputState,
    marquee: Marquee,
    started: Instant,
    paused_at: Option<Instant>,
    paused_for: Duration,
}

impl Cabinet {
    pub fn new(rules: Ruleset, marquee: Marquee, seed: u64, hold_ticks: u32) -> Self {
        info!("{}: cabinet ready (seed {})", rules.name, seed);
        Self {
            session: Session::new(rules, seed),
            input: InputState::new(hold_ticks),
            marquee,
            started: Instant::now(),
            paused_at: None,
            paused_for: Duration::ZERO,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self) {
        if !self.is_paused() && !self.is_over() {
            self.toggle_pause();
        }
    }

    /// Session clock: wall time since start, minus time spent paused.
    fn clock(&self) -> Millis {
        let elapsed = self.started.elapsed().saturating_sub(self.paused_for);
        elapsed.as_millis() as Millis
    }

    fn toggle_pause(&mut self) {
        match self.paused_at.take() {
            Some(at) => self.paused_for += at.elapsed(),
            None => {
                self.paused_at = Some(Instant::now());
                self.input.clear();
            }
        }
    }

    fn is_over(&self) -> bool {
        self.session.status() != Status::Playing
    }
}

impl Game for Cabinet {
    fn update(&mut self) {
        if self.is_paused() {
            return;
        }
        let now = self.clock();
        self.session.update(&self.input, now);
        self.input.end_tick();
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Release => {
                if let Some(action) = Action::from_key(key.code) {
                    self.input.release(action);
                }
                return;
            }
            KeyEventKind::Repeat => {
                if let Some(action) = Action::from_key(key.code) {
                    self.input.repeat(action);
                }
                return;
            }
            KeyEventKind::Press => {}
        }

        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if !self.is_over() {
                    self.toggle_pause();
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            _ => {
                if self.is_over() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.input.press(Action::Reset);
                    }
                    return;
                }
                if self.is_paused() {
                    return;
                }
                if let Some(action) = Action::from_key(key.code) {
                    self.input.press(action);
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        field::render_cabinet(frame, area, &self.session, &self.marquee, self.is_paused());
    }

    /// Restarts through the session's Reset trigger so the restart happens
    /// on the next tick, like any other input.
    fn reset(&mut self) {
        if self.paused_at.is_some() {
            self.toggle_pause();
        }
        self.input.clear();
        self.input.press(Action::Reset);
    }

    fn get_score(&self) -> u32 {
        self.session.counters().score
    }

    fn is_game_over(&self) -> bool {
        self.session.status() == Status::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    fn cabinet() -> Cabinet {
        Cabinet::new(invaders::rules(), invaders::MARQUEE, 11, 4)
    }

    #[test]
    fn test_release_stops_movement() {
        let mut cab = cabinet();
        cab.handle_input(key(KeyCode::Left, KeyEventKind::Press));
        cab.update();
        let x = cab.session().world().player.body.pos.x;
        assert_eq!(x, 370.0);

        cab.handle_input(key(KeyCode::Left, KeyEventKind::Release));
        cab.update();
        assert_eq!(cab.session().world().player.body.pos.x, x);
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut cab = cabinet();
        cab.handle_input(key(KeyCode::Char('p'), KeyEventKind::Press));
        assert!(cab.is_paused());
        cab.update();
        assert_eq!(cab.session().tick(), 0);
        cab.handle_input(key(KeyCode::Char('p'), KeyEventKind::Press));
        cab.update();
        assert_eq!(cab.session().tick(), 1);
    }

    #[test]
    fn test_reset_key_restarts_on_next_tick() {
        let mut cab = cabinet();
        cab.handle_input(key(KeyCode::Right, KeyEventKind::Press));
        cab.update();
        cab.update();
        cab.handle_input(key(KeyCode::Char('r'), KeyEventKind::Press));
        cab.update();
        assert_eq!(cab.session().tick(), 0);
        assert_eq!(cab.session().world().player.body.pos.x, 375.0);
    }

    #[test]
    fn test_score_and_game_over_track_the_session() {
        let mut cab = cabinet();
        assert_eq!(cab.get_score(), 0);
        assert!(!cab.is_game_over());

        cab.session.counters_mut().score = 120;
        for e in &mut cab.session.world_mut().enemies {
            e.body.pos.y += 480.0;
        }
        cab.update();
        assert_eq!(cab.get_score(), 120);
        assert!(cab.is_game_over());
    }
}
