use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use fruitbasket_engine::{BasketEvent, BasketGame, BasketState};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::Block,
};

use crate::{
    command::play::screens::digit_index,
    record::RecordingEngine,
    ui::widgets::{BasketDisplay, FieldDisplay, StatsDisplay, color, style},
};

#[derive(Debug)]
pub struct BasketScreen {
    engine: RecordingEngine<BasketGame>,
    selected: usize,
    is_exiting: bool,
}

impl BasketScreen {
    pub fn new(game: BasketGame) -> Self {
        Self {
            engine: RecordingEngine::new(game),
            selected: 0,
            is_exiting: false,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.is_exiting
    }

    pub fn score(&self) -> u64 {
        self.state().score()
    }

    pub fn into_recording(self) -> RecordingEngine<BasketGame> {
        self.engine
    }

    fn state(&self) -> &BasketState {
        self.engine.snapshot()
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let state = self.state();
        let border_style = if state.held().is_some() {
            color::YELLOW
        } else {
            color::WHITE
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let selected = (!state.active_fruits().is_empty()).then_some(self.selected);
        let field = FieldDisplay::new(state.active_fruits())
            .selected(selected)
            .block(panel("FIELD"));
        let baskets = BasketDisplay::new(state.baskets(), state.held()).block(panel("BASKETS"));
        let stats = StatsDisplay::basket(state.stats()).block(panel("STATS"));

        let help_text = if state.held().is_some() {
            "Controls: 1-9 (Drop into basket) | Enter/Space (Release) | Q (Quit)"
        } else {
            "Controls: ↑ ↓ (Select) | Enter/Space (Pick up) | Q (Quit)"
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let [field_area, side_area] = Layout::horizontal([
            Constraint::Length(field.width()),
            Constraint::Length(stats.width().max(30)),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [baskets_area, stats_area] = Layout::vertical([
            Constraint::Length(baskets.height()),
            Constraint::Length(stats.height()),
        ])
        .areas(side_area);

        frame.render_widget(field, field_area);
        frame.render_widget(baskets, baskets_area);
        frame.render_widget(stats, stats_area);
        frame.render_widget(help_text, help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        let state = self.state();
        let active_len = state.active_fruits().len();
        let submitted = match event.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(active_len.saturating_sub(1));
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => state
                .held()
                .or_else(|| state.active_fruits().get(self.selected))
                .map(|fruit| BasketEvent::Pick(fruit.id)),
            KeyCode::Char('q') => {
                self.is_exiting = true;
                None
            }
            KeyCode::Char(c) => digit_index(c)
                .and_then(|index| state.baskets().get(index))
                .map(|basket| BasketEvent::Drop(basket.kind())),
            _ => None,
        };
        if let Some(event) = submitted {
            self.engine.submit(event);
            self.clamp_selection();
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.engine.submit(BasketEvent::Tick(dt));
    }

    fn clamp_selection(&mut self) {
        let active_len = self.state().active_fruits().len();
        self.selected = self.selected.min(active_len.saturating_sub(1));
    }
}
