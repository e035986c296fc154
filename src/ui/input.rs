//! Terminal events to docker input.
//!
//! Terminals report mouse positions as whole cells. The docker works in
//! continuous units with half-open rects, so a cell is addressed by its
//! centre: column `c` becomes `c + 0.5`.

use std::time::Instant;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton as TermButton, MouseEvent, MouseEventKind,
};

use crate::dock::{Docker, MouseButton};
use crate::layout::Point;

pub fn cell_point(column: u16, row: u16) -> Point {
    Point::new(column as f64 + 0.5, row as f64 + 0.5)
}

fn map_button(button: TermButton) -> MouseButton {
    match button {
        TermButton::Left => MouseButton::Left,
        TermButton::Right => MouseButton::Right,
        TermButton::Middle => MouseButton::Middle,
    }
}

/// Feeds one mouse event to the docker. Returns whether it was consumed.
pub fn dispatch_mouse(docker: &mut Docker, mouse: MouseEvent, now: Instant) -> bool {
    let point = cell_point(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(button) => docker.mouse_down(point, map_button(button), now),
        MouseEventKind::Drag(_) | MouseEventKind::Moved => docker.mouse_move(point, now),
        MouseEventKind::Up(_) => docker.mouse_up(point, now),
        MouseEventKind::ScrollUp => docker.mouse_scroll(point, Point::new(0.0, -1.0)),
        MouseEventKind::ScrollDown => docker.mouse_scroll(point, Point::new(0.0, 1.0)),
        MouseEventKind::ScrollLeft => docker.mouse_scroll(point, Point::new(-1.0, 0.0)),
        MouseEventKind::ScrollRight => docker.mouse_scroll(point, Point::new(1.0, 0.0)),
    }
}

/// Keys the docker itself reacts to. Escape cancels a drag in progress.
pub fn dispatch_key(docker: &mut Docker, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Esc => docker.escape(),
        _ => false,
    }
}

/// Routes any terminal event. Resizes are left to the host, which owns the
/// mapping from terminal area to docking surface.
pub fn dispatch(docker: &mut Docker, event: &Event, now: Instant) -> bool {
    match event {
        Event::Mouse(mouse) => dispatch_mouse(docker, *mouse, now),
        Event::Key(key) => dispatch_key(docker, *key),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DockerOptions;
    use crate::dock::{DockLocation, DockTarget, DragMode, PanelOptions, PanelType};
    use crate::layout::Rect;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn cells_map_to_their_centres() {
        assert_eq!(cell_point(0, 0), Point::new(0.5, 0.5));
        assert_eq!(cell_point(3, 7), Point::new(3.5, 7.5));
    }

    #[test]
    fn escape_cancels_a_tab_drag() {
        let mut options = DockerOptions::terminal();
        options.move_start_delay = Duration::ZERO;
        let mut docker = Docker::new(options);
        docker.register_panel_type("notes", PanelType::new(|_, _| Box::new(())));
        docker.resize_surface(Rect::new(0.0, 0.0, 60.0, 20.0));
        for location in [DockLocation::Left, DockLocation::Stacked] {
            docker
                .add_panel("notes", location, DockTarget::Auto, PanelOptions::default())
                .unwrap();
        }
        docker.update();
        let before = docker.save().unwrap();

        let now = Instant::now();
        let root = docker.root();
        let tab = docker.frame(root).map(|f| f.strip().tabs[1]).unwrap();
        let (column, row) = (tab.x as u16 + 1, tab.y as u16);
        assert!(dispatch_mouse(
            &mut docker,
            mouse(MouseEventKind::Down(TermButton::Left), column, row),
            now
        ));
        dispatch_mouse(
            &mut docker,
            mouse(MouseEventKind::Drag(TermButton::Left), 40, 12),
            now + Duration::from_millis(5),
        );
        assert_eq!(docker.drag_mode(), Some(DragMode::Frame));

        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(dispatch(&mut docker, &esc, now));
        assert_eq!(docker.drag_mode(), None);
        assert_eq!(docker.save().unwrap(), before);
    }
}
