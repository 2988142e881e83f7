use fruitbasket_engine::Fruit;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{fruit_style, style};

/// Fruits on the field, one per line, with a movable selection.
#[derive(Debug)]
pub struct FieldDisplay<'a> {
    fruits: &'a [Fruit],
    selected: Option<usize>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> FieldDisplay<'a> {
    pub fn new(fruits: &'a [Fruit]) -> Self {
        Self {
            fruits,
            selected: None,
            block: None,
        }
    }

    pub fn selected(self, selected: Option<usize>) -> Self {
        Self { selected, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        34 + super::block_horizontal_margin(self.block.as_ref())
    }
}

/// Returns the first visible line so that `selected` stays on screen.
fn scroll_offset(selected: Option<usize>, height: usize) -> usize {
    match selected {
        Some(selected) if height > 0 => (selected + 1).saturating_sub(height),
        _ => 0,
    }
}

impl Widget for FieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        if self.fruits.is_empty() {
            Line::styled("(empty)", style::DIM)
                .centered()
                .render(area, buf);
            return;
        }

        let offset = scroll_offset(self.selected, usize::from(area.height));
        for (row, (index, fruit)) in self
            .fruits
            .iter()
            .enumerate()
            .skip(offset)
            .take(usize::from(area.height))
            .enumerate()
        {
            let is_selected = self.selected == Some(index);
            let marker = if is_selected { "> " } else { "  " };
            let pos = fruit.position;
            let line = Line::from(vec![
                Span::styled(marker, style::DEFAULT),
                Span::styled(format!("{:<5}", fruit.id.to_string()), style::DIM),
                Span::styled(format!("{:<7}", fruit.kind.to_string()), fruit_style(fruit.kind)),
                Span::styled(
                    format!("{:>5.1} {:>5.1} {:>5.1}", pos.x, pos.y, pos.z),
                    style::DIM,
                ),
            ]);
            let line = if is_selected {
                line.style(style::SELECTED)
            } else {
                line
            };
            #[expect(clippy::cast_possible_truncation)]
            let y = area.y + row as u16;
            line.render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }
}
