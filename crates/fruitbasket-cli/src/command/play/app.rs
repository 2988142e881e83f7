use std::time::Duration;

use crossterm::event::Event;
use fruitbasket_engine::{BasketGame, PopupGame, SpawnSeed};
use ratatui::Frame;

use crate::{
    command::play::screens::Screen,
    record::SessionHistory,
    tui::{App, RenderMode, Tui},
};

const FPS: f64 = 60.0;

#[derive(Debug)]
pub struct PlayApp {
    screen: Screen,
}

impl PlayApp {
    pub fn basket(game: BasketGame) -> Self {
        Self {
            screen: Screen::basket(game),
        }
    }

    pub fn popup(game: PopupGame) -> Self {
        Self {
            screen: Screen::popup(game),
        }
    }

    pub fn score(&self) -> u64 {
        self.screen.score()
    }

    pub fn into_history(self, seed: SpawnSeed) -> SessionHistory {
        self.screen.into_history(seed)
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
        tui.set_render_mode(RenderMode::throttled_from_rate(FPS));
    }

    fn should_exit(&self) -> bool {
        self.screen.should_exit()
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        self.screen.handle_event(&event);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, _tui: &mut Tui, dt: Duration) {
        self.screen.update(dt);
    }
}
