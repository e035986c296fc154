//! Terminal rendering of a [`Docker`].
//!
//! The docker computes geometry in abstract units; here one unit is one
//! character cell. [`UiFrame`] wraps `ratatui::Frame` and clips every draw
//! to the visible area, so frames that hang off the screen (a floating
//! frame dragged half out, a drawer mid-animation) never write out of
//! bounds.

pub mod input;

use ratatui::Frame as TermFrame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::dock::{DockTarget, Docker, DrawItem, FrameButton, LayoutItem, NodeId, Panel};
use crate::layout::Rect;
use crate::theme;

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: CellRect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut TermFrame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Draws straight into `buffer`; used for offscreen rendering in tests.
    pub fn from_parts(area: CellRect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> CellRect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: CellRect) -> Option<CellRect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: CellRect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn fill(&mut self, area: CellRect, symbol: &str, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol).set_style(style);
                }
            }
        }
    }

    /// Writes `text` from `(x, y)`, truncated to `bounds`.
    pub fn set_string(&mut self, bounds: CellRect, x: u16, y: u16, text: &str, style: Style) {
        let Some(bounds) = self.clip_rect(bounds) else {
            return;
        };
        safe_set_string(self.buffer, bounds, x, y, text, style);
    }

    /// Writes `text` top to bottom starting at `(x, y)`, one char per row.
    pub fn set_vertical_string(
        &mut self,
        bounds: CellRect,
        x: u16,
        y: u16,
        text: &str,
        style: Style,
    ) {
        let Some(bounds) = self.clip_rect(bounds) else {
            return;
        };
        for (row, ch) in (y..bounds.bottom()).zip(text.chars()) {
            let mut tmp = [0; 4];
            safe_set_string(self.buffer, bounds, x, row, ch.encode_utf8(&mut tmp), style);
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: CellRect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Snaps a docking rect onto the cell grid. Negative or oversized
/// coordinates are clamped; the result may be empty.
pub fn cell_rect(rect: Rect) -> CellRect {
    let clamp = |v: f64| v.round().clamp(0.0, u16::MAX as f64) as u16;
    let x = clamp(rect.x);
    let y = clamp(rect.y);
    let right = clamp(rect.right());
    let bottom = clamp(rect.bottom());
    CellRect {
        x,
        y,
        width: right.saturating_sub(x),
        height: bottom.saturating_sub(y),
    }
}

/// The docking surface for a terminal area.
pub fn surface_rect(area: CellRect) -> Rect {
    Rect::new(
        area.x as f64,
        area.y as f64,
        area.width as f64,
        area.height as f64,
    )
}

/// Paints every frame, bar and the drag ghost. Panels without a content
/// grid are handed to `content` together with their cell rect.
pub fn render_docker<F>(frame: &mut UiFrame<'_>, docker: &Docker, mut content: F)
where
    F: FnMut(&mut UiFrame<'_>, NodeId, &Panel, CellRect),
{
    frame.fill(frame.area(), " ", Style::default().bg(theme::surface_bg()));
    for item in docker.draw_list() {
        match item {
            DrawItem::Frame(id) => render_frame(frame, docker, id, &mut content),
            DrawItem::Bar {
                rect, is_static, ..
            } => render_bar(frame, rect, is_static),
        }
    }
    if let Some(ghost) = docker.ghost()
        && ghost.is_visible()
    {
        let area = cell_rect(ghost.rect());
        frame.render_widget(Block::bordered().border_style(theme::ghost_style()), area);
    }
}

fn render_bar(frame: &mut UiFrame<'_>, rect: Rect, is_static: bool) {
    let area = cell_rect(rect);
    let symbol = if area.height > area.width { "│" } else { "─" };
    let color = if is_static {
        theme::static_bar()
    } else {
        theme::bar()
    };
    frame.fill(area, symbol, Style::default().fg(color));
}

fn render_frame<F>(frame: &mut UiFrame<'_>, docker: &Docker, id: NodeId, content: &mut F)
where
    F: FnMut(&mut UiFrame<'_>, NodeId, &Panel, CellRect),
{
    let Some(f) = docker.frame(id) else {
        return;
    };
    let outer = cell_rect(f.rect());
    if outer.width == 0 || outer.height == 0 {
        return;
    }
    if f.is_floating() {
        frame.render_widget(Clear, outer);
        frame.fill(outer, " ", Style::default().fg(theme::floating_border()));
    }

    let focused = docker.focused_frame() == Some(id);
    if f.has_title() {
        let title = cell_rect(f.title_rect());
        frame.fill(title, " ", theme::title_style(focused));
        let strip = f.strip();
        let vertical = strip.visible.height > strip.visible.width;
        let visible = cell_rect(strip.visible);
        for (index, (tab, panel)) in strip.tabs.iter().zip(f.panels()).enumerate() {
            let Some(panel) = docker.panel(*panel) else {
                continue;
            };
            let tab = cell_rect(*tab).intersection(visible);
            if tab.width == 0 || tab.height == 0 {
                continue;
            }
            let style = theme::tab_style(f.current() == Some(index));
            frame.fill(tab, " ", style);
            if vertical {
                frame.set_vertical_string(tab, tab.x, tab.y.saturating_add(1), panel.title(), style);
            } else {
                frame.set_string(tab, tab.x.saturating_add(1), tab.y, panel.title(), style);
            }
        }
        if let Some(back) = strip.scroll_back {
            let back = cell_rect(back);
            frame.set_string(back, back.x, back.y, "<", theme::title_style(focused));
        }
        if let Some(forward) = strip.scroll_forward {
            let forward = cell_rect(forward);
            frame.set_string(forward, forward.x, forward.y, ">", theme::title_style(focused));
        }
        let current = f.current_panel().and_then(|p| docker.panel(p));
        for (button, rect) in f.buttons() {
            let area = cell_rect(*rect);
            let (label, toggled) = match button {
                FrameButton::Close => ("x".to_string(), false),
                FrameButton::Custom(name) => current
                    .and_then(|p| p.buttons().iter().find(|b| &b.name == name))
                    .map(|b| (b.label.clone(), b.toggled))
                    .unwrap_or_else(|| (name.clone(), false)),
            };
            let fg = if toggled {
                theme::toggled_button_fg()
            } else {
                theme::button_fg()
            };
            let style = theme::title_style(focused).fg(fg);
            frame.set_string(area, area.x, area.y, &format!("[{label}]"), style);
        }
    }

    let Some(panel_id) = f.current_panel() else {
        return;
    };
    let Some(panel) = docker.panel(panel_id) else {
        return;
    };
    let body = cell_rect(f.content_rect());
    if panel.is_placeholder() || body.width == 0 || body.height == 0 {
        return;
    }
    if panel.layout().is_empty() {
        content(frame, panel_id, panel, body);
        return;
    }
    render_grid(frame, docker, panel_id, panel, f.content_rect());
}

fn render_grid(frame: &mut UiFrame<'_>, docker: &Docker, id: NodeId, panel: &Panel, area: Rect) {
    let cells = panel.layout().cell_rects(area, 0.0);
    for (index, (item, rect)) in panel.layout().items().iter().zip(cells).enumerate() {
        let cell = cell_rect(rect);
        match &item.content {
            LayoutItem::Text(text) => {
                frame.render_widget(
                    Paragraph::new(text.as_str()).wrap(Wrap { trim: false }),
                    cell,
                );
            }
            LayoutItem::Tabs(widget) => {
                let Some(strip) = docker.custom_tab_strip(id, index) else {
                    continue;
                };
                let visible = cell_rect(strip.visible);
                for (tab_index, (tab, title)) in strip.tabs.iter().zip(widget.tabs()).enumerate() {
                    let tab = cell_rect(*tab).intersection(visible);
                    let style = theme::tab_style(widget.current() == Some(tab_index));
                    frame.fill(tab, " ", style);
                    let label = if title.closeable {
                        format!("{} x", title.title)
                    } else {
                        title.title.clone()
                    };
                    frame.set_string(tab, tab.x.saturating_add(1), tab.y, &label, style);
                }
            }
        }
    }
}

/// Where the demo puts a new panel: stacked into the focused frame when
/// there is one, otherwise next to the tree.
pub fn default_target(docker: &Docker) -> DockTarget {
    docker
        .focused_frame()
        .filter(|frame| docker.frame(*frame).is_some_and(|f| !f.is_floating()))
        .map(DockTarget::Frame)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DockerOptions;
    use crate::dock::{DockLocation, PanelOptions, PanelType};

    #[test]
    fn cell_rect_rounds_and_clamps() {
        let rect = cell_rect(Rect::new(-2.4, 1.6, 10.0, 3.0));
        assert_eq!(rect, CellRect::new(0, 2, 8, 3));
        assert_eq!(cell_rect(Rect::new(5.0, 5.0, 0.0, 0.0)).area(), 0);
    }

    #[test]
    fn frames_and_titles_are_painted() {
        let mut docker = Docker::new(DockerOptions::terminal());
        docker.register_panel_type("notes", PanelType::new(|_, _| Box::new(())));
        docker.resize_surface(Rect::new(0.0, 0.0, 30.0, 8.0));
        docker
            .add_panel(
                "notes",
                DockLocation::Left,
                DockTarget::Auto,
                PanelOptions {
                    title: Some("Alpha".into()),
                    ..PanelOptions::default()
                },
            )
            .unwrap();
        docker.update();

        let area = CellRect::new(0, 0, 30, 8);
        let mut buffer = Buffer::empty(area);
        let mut painted = None;
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            render_docker(&mut frame, &docker, |frame, _, panel, body| {
                painted = Some(body);
                frame.set_string(body, body.x, body.y, panel.title(), Style::default());
            });
        }
        let row: String = (0..30)
            .map(|x| buffer.cell((x, 0)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect();
        assert!(row.starts_with(" Alpha"));
        assert!(row.ends_with("[x]"));
        assert_eq!(painted, Some(CellRect::new(0, 1, 30, 7)));
    }
}
