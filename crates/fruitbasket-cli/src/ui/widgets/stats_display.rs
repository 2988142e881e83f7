use std::{iter, time::Duration};

use fruitbasket_engine::{PopupStats, SessionStats};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Label/value table of session statistics.
pub struct StatsDisplay<'a, S: 'static> {
    stats: &'a S,
    rows: &'static [Row<S>],
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a, SessionStats> {
    pub fn basket(stats: &'a SessionStats) -> Self {
        Self {
            stats,
            rows: BASKET_ROWS,
            block: None,
        }
    }
}

impl<'a> StatsDisplay<'a, PopupStats> {
    pub fn popup(stats: &'a PopupStats) -> Self {
        Self {
            stats,
            rows: POPUP_ROWS,
            block: None,
        }
    }
}

impl<'a, S: 'static> StatsDisplay<'a, S> {
    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.rows.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

enum Row<S: 'static> {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&S) -> String),
    LabelValue(&'static str, &'static dyn Fn(&S) -> String),
}

// Manual impls: a derive would require `S: Copy`.
impl<S: 'static> Clone for Row<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static> Copy for Row<S> {}

fn format_time(dur: Duration) -> String {
    format!(
        "{:0}:{:0>2}.{:0>2}",
        dur.as_secs() / 60,
        dur.as_secs() % 60,
        dur.subsec_millis() / 10
    )
}

const BASKET_ROWS: &[Row<SessionStats>] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats| stats.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|stats| format_time(stats.elapsed())),
    Row::Empty,
    Row::LabelValue("MISSES:", &|stats| stats.mismatches().to_string()),
    Row::LabelValue("RELEASES:", &|stats| stats.releases().to_string()),
    Row::LabelValue("SPAWNED:", &|stats| stats.spawned().to_string()),
    Row::LabelValue("LOST:", &|stats| stats.discarded().to_string()),
];

const POPUP_ROWS: &[Row<PopupStats>] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats| stats.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|stats| format_time(stats.elapsed())),
    Row::Empty,
    Row::LabelValue("POP UPS:", &|stats| stats.pop_ups().to_string()),
    Row::LabelValue("ESCAPED:", &|stats| stats.pop_downs().to_string()),
];

impl<S: 'static> Widget for StatsDisplay<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..self.rows.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(self.rows.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
