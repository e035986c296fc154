use std::time::{Duration, Instant};

use term_dock::layout::{AnchorContext, AnchorTarget, DropTarget, detect_anchor};
use term_dock::{
    DockLocation, DockTarget, Docker, DockerOptions, Measure, NodeId, NodeKind, PanelOptions,
    PanelType, Point, Rect,
};
use term_dock::dock::{DragMode, MouseButton};

/// Two side-by-side frames on a 100x40 surface.
fn two_frames() -> (Docker, NodeId, NodeId) {
    let mut docker = Docker::new(DockerOptions::terminal());
    docker.register_panel_type("notes", PanelType::new(|_, _| Box::new(())));
    docker.resize_surface(Rect::new(0.0, 0.0, 100.0, 40.0));
    let left = docker
        .add_panel("notes", DockLocation::Left, DockTarget::Auto, PanelOptions::default())
        .expect("left");
    let right = docker
        .add_panel("notes", DockLocation::Right, DockTarget::Panel(left), PanelOptions::default())
        .expect("right");
    docker.update();
    (docker, left, right)
}

fn frame_rect(docker: &Docker, panel: NodeId) -> Rect {
    docker
        .frame_of(panel)
        .and_then(|f| docker.frame(f))
        .map(|f| f.rect())
        .expect("frame rect")
}

/// A point on the first tab of `panel`'s frame.
fn tab_point(docker: &Docker, panel: NodeId) -> Point {
    let rect = frame_rect(docker, panel);
    Point::new(rect.x + 1.5, rect.y + 0.5)
}

#[test]
fn escape_mid_drag_restores_everything() {
    let (mut docker, left, right) = two_frames();
    let before = docker.save().expect("save");
    let now = Instant::now();

    assert!(docker.mouse_down(tab_point(&docker, left), MouseButton::Left, now));
    assert_eq!(docker.drag_mode(), Some(DragMode::Frame));

    // Interior left band of the right-hand frame.
    let target = frame_rect(&docker, right);
    let point = Point::new(target.x + 3.5, target.y + target.height / 2.0);
    docker.mouse_move(point, now + Duration::from_millis(500));
    let anchor = docker
        .ghost()
        .and_then(|g| g.current_anchor())
        .copied()
        .expect("ghost shows an anchor");
    assert_eq!(anchor.location, DockLocation::Left);

    assert!(docker.escape());
    assert!(docker.ghost().is_none());
    assert_eq!(docker.drag_mode(), None);
    assert_eq!(docker.save().expect("save"), before);
}

#[test]
fn dropping_on_a_title_strip_stacks() {
    let (mut docker, left, right) = two_frames();
    let now = Instant::now();
    docker.mouse_down(tab_point(&docker, left), MouseButton::Left, now);

    let target = frame_rect(&docker, right);
    let drop = Point::new(target.x + target.width / 2.0, target.y + 0.5);
    assert!(docker.mouse_up(drop, now + Duration::from_millis(500)));

    let root = docker.root();
    assert_eq!(docker.node_kind(root), Some(NodeKind::Frame));
    assert_eq!(docker.frame_of(left), docker.frame_of(right));
    let frame = docker.frame(root).expect("root frame");
    assert_eq!(frame.panels(), &[right, left]);
    assert!(docker.ghost().is_none());
}

#[test]
fn release_before_the_move_delay_does_nothing() {
    let (mut docker, left, right) = two_frames();
    let before = docker.save().expect("save");
    let now = Instant::now();
    docker.mouse_down(tab_point(&docker, left), MouseButton::Left, now);
    let target = frame_rect(&docker, right);
    let drop = Point::new(target.x + target.width / 2.0, target.y + 0.5);
    docker.mouse_up(drop, now + Duration::from_millis(10));
    assert_eq!(docker.save().expect("save"), before);
    assert_ne!(docker.frame_of(left), docker.frame_of(right));
}

#[test]
fn new_panel_drag_lands_where_released() {
    let (mut docker, _, right) = two_frames();
    let now = Instant::now();
    assert!(docker.begin_panel_creation("notes", now));
    assert_eq!(docker.drag_mode(), Some(DragMode::CreatePanel));

    let target = frame_rect(&docker, right);
    let drop = Point::new(target.x + target.width / 2.0, target.y + 0.5);
    assert!(docker.mouse_up(drop, now + Duration::from_millis(500)));
    let frame = docker.frame_of(right).and_then(|f| docker.frame(f)).expect("frame");
    assert_eq!(frame.panels().len(), 2);
    assert_eq!(docker.find_panels(Some("notes")).len(), 3);
}

#[test]
fn wide_target_resolves_to_a_left_split() {
    let ctx = AnchorContext {
        surface: Rect::new(-500.0, -500.0, 1400.0, 1100.0),
        title_height: 0.0,
        edge_anchor: Measure::Pixels(10.0),
        panel_anchor: Measure::Percent(15.0),
        can_orient_tabs: true,
    };
    let target = DropTarget {
        id: 1_u8,
        rect: Rect::new(0.0, 0.0, 400.0, 100.0),
        has_title: false,
        same: None,
        can_split: true,
        is_topper: false,
        allow_edges: true,
        is_placeholder: false,
    };
    // Inside both the left band (60 wide) and the top band (15 tall).
    let anchor = detect_anchor(&ctx, &target, Point::new(20.0, 10.0)).expect("anchor");
    assert_eq!(anchor.location, DockLocation::Left);
    assert_eq!(anchor.target, AnchorTarget::Frame(1));

    let tall = DropTarget {
        rect: Rect::new(0.0, 0.0, 100.0, 400.0),
        ..target
    };
    let anchor = detect_anchor(&ctx, &tall, Point::new(10.0, 20.0)).expect("anchor");
    assert_eq!(anchor.location, DockLocation::Top);
}
