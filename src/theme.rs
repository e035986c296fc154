use ratatui::style::{Color, Modifier, Style};

// Centralized colors for the docking chrome. Plain named colors so every
// terminal palette renders them.

pub fn surface_bg() -> Color {
    Color::Reset
}

pub fn title_bg() -> Color {
    Color::DarkGray
}

pub fn title_fg() -> Color {
    Color::White
}

pub fn tab_active_bg() -> Color {
    Color::Blue
}

pub fn tab_active_fg() -> Color {
    Color::White
}

pub fn tab_inactive_fg() -> Color {
    Color::Gray
}

pub fn focused_title_bg() -> Color {
    Color::Cyan
}

pub fn bar() -> Color {
    Color::DarkGray
}

pub fn static_bar() -> Color {
    Color::Black
}

pub fn ghost() -> Color {
    Color::Yellow
}

pub fn floating_border() -> Color {
    Color::Gray
}

pub fn button_fg() -> Color {
    Color::LightRed
}

pub fn toggled_button_fg() -> Color {
    Color::LightGreen
}

pub fn title_style(focused: bool) -> Style {
    let bg = if focused {
        focused_title_bg()
    } else {
        title_bg()
    };
    Style::default().bg(bg).fg(title_fg())
}

pub fn tab_style(active: bool) -> Style {
    if active {
        Style::default()
            .bg(tab_active_bg())
            .fg(tab_active_fg())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(title_bg()).fg(tab_inactive_fg())
    }
}

pub fn ghost_style() -> Style {
    Style::default().fg(ghost()).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_changes_the_title_background() {
        assert_ne!(title_style(true).bg, title_style(false).bg);
        assert_eq!(tab_style(true).fg, Some(tab_active_fg()));
    }
}
