use std::time::Duration;

use crossterm::event::Event;
use fruitbasket_engine::{BasketGame, PopupGame, SpawnSeed};
use ratatui::Frame;

use crate::{
    command::play::screens::{basket::BasketScreen, popup::PopupScreen},
    record::SessionHistory,
};

mod basket;
mod popup;

#[derive(Debug)]
pub enum Screen {
    Basket(BasketScreen),
    Popup(PopupScreen),
}

impl Screen {
    pub fn basket(game: BasketGame) -> Self {
        Screen::Basket(BasketScreen::new(game))
    }

    pub fn popup(game: PopupGame) -> Self {
        Screen::Popup(PopupScreen::new(game))
    }

    pub fn should_exit(&self) -> bool {
        match self {
            Screen::Basket(screen) => screen.should_exit(),
            Screen::Popup(screen) => screen.should_exit(),
        }
    }

    pub fn score(&self) -> u64 {
        match self {
            Screen::Basket(screen) => screen.score(),
            Screen::Popup(screen) => screen.score(),
        }
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        match self {
            Screen::Basket(screen) => screen.draw(frame),
            Screen::Popup(screen) => screen.draw(frame),
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        match self {
            Screen::Basket(screen) => screen.handle_event(event),
            Screen::Popup(screen) => screen.handle_event(event),
        }
    }

    pub fn update(&mut self, dt: Duration) {
        match self {
            Screen::Basket(screen) => screen.update(dt),
            Screen::Popup(screen) => screen.update(dt),
        }
    }

    pub fn into_history(self, seed: SpawnSeed) -> SessionHistory {
        match self {
            Screen::Basket(screen) => SessionHistory::basket(seed, screen.into_recording()),
            Screen::Popup(screen) => SessionHistory::popup(seed, screen.into_recording()),
        }
    }
}

/// Maps the keys `1`..=`9` to zero-based indices.
fn digit_index(c: char) -> Option<usize> {
    let digit = c.to_digit(10).filter(|d| *d > 0)?;
    usize::try_from(digit - 1).ok()
}
