use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;

use crate::config::Settings;
use crate::games::{coin_run, hockey, invaders, platformer, Cabinet, Game};

pub const GAME_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Hockey,
    CoinRun,
    Platformer,
    Invaders,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Hockey, Tab::CoinRun, Tab::Platformer, Tab::Invaders]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Hockey => " Air Hockey ",
            Tab::CoinRun => " Coin Run ",
            Tab::Platformer => " Platformer ",
            Tab::Invaders => " Invaders ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Hockey => 1,
            Tab::CoinRun => 2,
            Tab::Platformer => 3,
            Tab::Invaders => 4,
        }
    }

    pub fn from_game(idx: usize) -> Tab {
        Tab::all().get(idx + 1).copied().unwrap_or(Tab::Home)
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize,
    pub hockey: Cabinet,
    pub coin_run: Cabinet,
    pub platformer: Cabinet,
    pub invaders: Cabinet,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        info!("starting with seed {}", seed);
        let hold = settings.hold_ticks;
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            hockey: Cabinet::new(hockey::rules(), hockey::MARQUEE, seed, hold),
            coin_run: Cabinet::new(coin_run::rules(), coin_run::MARQUEE, seed.wrapping_add(1), hold),
            platformer: Cabinet::new(
                platformer::rules(),
                platformer::MARQUEE,
                seed.wrapping_add(2),
                hold,
            ),
            invaders: Cabinet::new(invaders::rules(), invaders::MARQUEE, seed.wrapping_add(3), hold),
        }
    }

    pub fn active_game(&mut self) -> Option<&mut Cabinet> {
        match self.current_tab {
            Tab::Home => None,
            Tab::Hockey => Some(&mut self.hockey),
            Tab::CoinRun => Some(&mut self.coin_run),
            Tab::Platformer => Some(&mut self.platformer),
            Tab::Invaders => Some(&mut self.invaders),
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(game) = self.active_game() {
            game.update();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Release and auto-repeat only matter to the running game
        if key.kind != KeyEventKind::Press {
            if let Some(game) = self.active_game() {
                game.handle_input(key);
            }
            return;
        }

        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.switch_to(Tab::Home);
                    return;
                }
            }
            _ => {}
        }

        // Home screen shortcuts and navigation
        if matches!(self.current_tab, Tab::Home) && key.modifiers.is_empty() {
            match key.code {
                KeyCode::Char(c @ '1'..='4') => {
                    let idx = c as usize - '1' as usize;
                    self.selected_game = idx;
                    self.switch_to(Tab::from_game(idx));
                }
                KeyCode::Right | KeyCode::Down => {
                    self.selected_game = (self.selected_game + 1) % GAME_COUNT;
                }
                KeyCode::Left | KeyCode::Up => {
                    self.selected_game = (self.selected_game + GAME_COUNT - 1) % GAME_COUNT;
                }
                KeyCode::Enter => self.switch_to(Tab::from_game(self.selected_game)),
                _ => {}
            }
            return;
        }

        // Forward to active game
        if let Some(game) = self.active_game() {
            game.handle_input(key);
        }
    }

    /// Leaving a game pauses it so its clock stops while it is hidden.
    fn switch_to(&mut self, tab: Tab) {
        if let Some(game) = self.active_game() {
            game.pause();
        }
        self.current_tab = tab;
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(&Settings {
            seed: Some(5),
            ..Settings::default()
        })
    }

    #[test]
    fn test_number_keys_launch_games() {
        let mut app = app();
        app.on_key(press(KeyCode::Char('3')));
        assert_eq!(app.current_tab, Tab::Platformer);
        app.on_key(press(KeyCode::Esc));
        assert_eq!(app.current_tab, Tab::Home);
        assert!(app.platformer.is_paused());
    }

    #[test]
    fn test_tile_selection_wraps() {
        let mut app = app();
        app.on_key(press(KeyCode::Left));
        assert_eq!(app.selected_game, 3);
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.current_tab, Tab::Invaders);
    }

    #[test]
    fn test_tab_cycles_through_games() {
        let mut app = app();
        for _ in 0..Tab::all().len() {
            app.on_key(press(KeyCode::Tab));
        }
        assert_eq!(app.current_tab, Tab::Home);
        app.on_key(press(KeyCode::BackTab));
        assert_eq!(app.current_tab, Tab::Invaders);
    }

    #[test]
    fn test_q_only_quits_from_home() {
        let mut app = app();
        app.on_key(press(KeyCode::Char('1')));
        app.on_key(press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.on_key(press(KeyCode::Esc));
        app.on_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_each_game_gets_its_own_seed() {
        let app = app();
        assert_eq!(app.hockey.session().seed(), 5);
        assert_eq!(app.invaders.session().seed(), 8);
    }
}
