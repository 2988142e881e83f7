use fruitbasket_engine::{Basket, Fruit};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{fruit_style, style};

/// The player's hand followed by the numbered baskets and what they hold.
#[derive(Debug)]
pub struct BasketDisplay<'a> {
    baskets: &'a [Basket],
    held: Option<&'a Fruit>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BasketDisplay<'a> {
    pub fn new(baskets: &'a [Basket], held: Option<&'a Fruit>) -> Self {
        Self {
            baskets,
            held,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(self.baskets.len()).unwrap_or(u16::MAX);
        rows.saturating_add(2) + super::block_vertical_margin(self.block.as_ref())
    }

    fn hand_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled("HAND: ", style::DEFAULT)];
        match self.held {
            Some(fruit) => spans.push(Span::styled(
                format!("{} {}", fruit.id, fruit.kind),
                fruit_style(fruit.kind),
            )),
            None => spans.push(Span::styled("empty", style::DIM)),
        }
        Line::from(spans)
    }

    fn basket_line(number: usize, basket: &Basket, width: usize) -> Line<'static> {
        let label = format!("{number} {:<7}{:>4} ", basket.kind().to_string(), basket.len());
        let room = width.saturating_sub(label.len());
        let mut spans = vec![Span::styled(label, style::DEFAULT)];
        // Show the latest deposits when the basket is wider than the panel.
        let skip = basket.len().saturating_sub(room);
        spans.extend(basket.contents()[skip..].iter().map(|fruit| {
            Span::styled(fruit.kind.as_char().to_string(), fruit_style(fruit.kind))
        }));
        Line::from(spans)
    }
}

impl Widget for BasketDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        if area.is_empty() {
            return;
        }

        self.hand_line()
            .render(Rect::new(area.x, area.y, area.width, 1), buf);

        let width = usize::from(area.width);
        let rows = (area.y + 2..area.bottom()).zip(self.baskets.iter().enumerate());
        for (y, (index, basket)) in rows {
            Self::basket_line(index + 1, basket, width)
                .render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }
}
