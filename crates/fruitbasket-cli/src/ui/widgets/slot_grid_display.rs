use fruitbasket_engine::Slot;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

const CELL_WIDTH: u16 = 7;
const CELL_HEIGHT: u16 = 3;

/// Pop-up slots laid out in rows, numbered from 1.
#[derive(Debug)]
pub struct SlotGridDisplay<'a> {
    slots: &'a [Slot],
    columns: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SlotGridDisplay<'a> {
    pub fn new(slots: &'a [Slot], columns: usize) -> Self {
        Self {
            slots,
            columns: columns.max(1),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn rows(&self) -> usize {
        self.slots.len().div_ceil(self.columns)
    }

    pub fn width(&self) -> u16 {
        let columns = u16::try_from(self.columns).unwrap_or(u16::MAX);
        columns.saturating_mul(CELL_WIDTH) + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(self.rows()).unwrap_or(u16::MAX);
        rows.saturating_mul(CELL_HEIGHT) + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for SlotGridDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let row_areas =
            Layout::vertical((0..self.rows()).map(|_| Constraint::Length(CELL_HEIGHT))).split(area);
        let rows = row_areas.iter().zip(self.slots.chunks(self.columns));
        for (row, (row_area, row_slots)) in rows.enumerate() {
            let cell_areas =
                Layout::horizontal((0..self.columns).map(|_| Constraint::Length(CELL_WIDTH)))
                    .split(*row_area);
            for (column, (cell_area, slot)) in cell_areas.iter().zip(row_slots).enumerate() {
                let number = row * self.columns + column + 1;
                let (symbol, cell_style) = if slot.active {
                    ("(@)", style::ACTIVE_SLOT)
                } else {
                    (" . ", style::DIM)
                };
                let block = BlockWidget::bordered()
                    .title(Line::from(number.to_string()).centered())
                    .border_style(cell_style)
                    .style(style::DEFAULT);
                let inner = block.inner(*cell_area);
                block.render(*cell_area, buf);
                Line::styled(symbol, cell_style)
                    .centered()
                    .render(inner, buf);
            }
        }
    }
}
