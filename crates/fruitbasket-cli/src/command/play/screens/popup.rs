use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use fruitbasket_engine::{PopupEvent, PopupGame, PopupState};
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
    ui::widgets::{SlotGridDisplay, StatsDisplay, color, style},
};

#[derive(Debug)]
pub struct PopupScreen {
    engine: RecordingEngine<PopupGame>,
    columns: usize,
    is_exiting: bool,
}

impl PopupScreen {
    pub fn new(game: PopupGame) -> Self {
        let columns = grid_columns(game.state().slots().len());
        Self {
            engine: RecordingEngine::new(game),
            columns,
            is_exiting: false,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.is_exiting
    }

    pub fn score(&self) -> u64 {
        self.state().score()
    }

    pub fn into_recording(self) -> RecordingEngine<PopupGame> {
        self.engine
    }

    fn state(&self) -> &PopupState {
        self.engine.snapshot()
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let state = self.state();
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .border_style(color::WHITE)
                .style(style::DEFAULT)
        };
        let grid = SlotGridDisplay::new(state.slots(), self.columns).block(panel("FIELD"));
        let stats = StatsDisplay::popup(state.stats()).block(panel("STATS"));

        let help_text = Text::from("Controls: 1-9 (Grab) | Q (Quit)")
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let [grid_column, stats_column] = Layout::horizontal([
            Constraint::Length(grid.width()),
            Constraint::Length(stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);
        let [grid_area] = Layout::vertical([Constraint::Length(grid.height())]).areas(grid_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(stats_column);

        frame.render_widget(grid, grid_area);
        frame.render_widget(stats, stats_area);
        frame.render_widget(help_text, help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Char('q') => self.is_exiting = true,
                KeyCode::Char(c) => {
                    if let Some(index) = digit_index(c) {
                        self.engine.submit(PopupEvent::Grab(index));
                    }
                }
                _ => {}
            }
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.engine.submit(PopupEvent::Tick(dt));
    }
}

/// Number of columns of the most square grid holding `slots` slots.
fn grid_columns(slots: usize) -> usize {
    let root = slots.isqrt();
    if root * root < slots { root + 1 } else { root.max(1) }
}
