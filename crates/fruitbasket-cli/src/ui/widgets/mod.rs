use fruitbasket_engine::FruitKind;
use ratatui::{layout::Rect, style::Style, widgets::Block as BlockWidget};

pub use self::{basket_display::*, field_display::*, slot_grid_display::*, stats_display::*};

mod basket_display;
mod field_display;
mod slot_grid_display;
mod stats_display;

pub mod color {
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const ORANGE: Color = Color::Rgb(255, 127, 0);
    pub const MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIM: Style = fg_bg(color::GRAY, color::BLACK);
    pub const SELECTED: Style = fg_bg(color::BLACK, color::WHITE).add_modifier(Modifier::BOLD);
    pub const ACTIVE_SLOT: Style = fg_bg(color::BLACK, color::GREEN);

    pub const APPLE: Style = fg_bg(color::RED, color::BLACK);
    pub const BANANA: Style = fg_bg(color::YELLOW, color::BLACK);
    pub const ORANGE: Style = fg_bg(color::ORANGE, color::BLACK);
    pub const GRAPE: Style = fg_bg(color::MAGENTA, color::BLACK);
}

pub fn fruit_style(kind: FruitKind) -> Style {
    match kind {
        FruitKind::Apple => style::APPLE,
        FruitKind::Banana => style::BANANA,
        FruitKind::Orange => style::ORANGE,
        FruitKind::Grape => style::GRAPE,
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
