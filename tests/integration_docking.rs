use std::time::{Duration, Instant};

use term_dock::{
    DockLocation, DockTarget, Docker, DockerOptions, Edge, MeasureSize, NodeId, NodeKind,
    PanelOptions, PanelType, Rect,
};

fn docker() -> Docker {
    let mut docker = Docker::new(DockerOptions::terminal());
    docker.register_panel_type("notes", PanelType::new(|_, _| Box::new(())));
    docker.register_panel_type(
        "wide",
        PanelType::new(|panel, _| {
            panel.set_min_size(MeasureSize::pixels(30.0, 0.0));
            Box::new(())
        }),
    );
    docker.resize_surface(Rect::new(0.0, 0.0, 100.0, 40.0));
    docker
}

fn add(docker: &mut Docker, kind: &str, location: DockLocation, target: DockTarget) -> NodeId {
    docker
        .add_panel(kind, location, target, PanelOptions::default())
        .expect("add panel")
}

fn assert_tab_indices(docker: &Docker) {
    for frame in docker.all_frames() {
        let f = docker.frame(frame).expect("frame");
        if let Some(current) = f.current() {
            assert!(current < f.panels().len(), "frame {frame} current {current}");
        }
    }
}

#[test]
fn split_then_stack_collapses_the_splitter() {
    let mut docker = docker();
    let p0 = add(&mut docker, "notes", DockLocation::Left, DockTarget::Auto);
    let f0 = docker.frame_of(p0).expect("f0");
    assert_eq!(docker.root(), f0);

    let p1 = add(&mut docker, "notes", DockLocation::Left, DockTarget::Panel(p0));
    let root = docker.root();
    assert_eq!(docker.node_kind(root), Some(NodeKind::Splitter));
    let splitter = docker.splitter(root).expect("splitter");
    let new_frame = docker.frame_of(p1).expect("p1 frame");
    assert_eq!(splitter.panes(), [Some(new_frame), Some(f0)]);

    assert!(docker.move_panel(
        p1,
        DockLocation::Stacked,
        DockTarget::Frame(f0),
        PanelOptions::default()
    ));
    assert_eq!(docker.root(), f0);
    let frame = docker.frame(f0).expect("f0");
    assert_eq!(frame.panels(), &[p0, p1]);
    assert_eq!(frame.current(), Some(1));
    assert!(docker.frame(new_frame).is_none());
}

#[test]
fn removing_every_panel_leaves_the_placeholder() {
    let mut docker = docker();
    let a = add(&mut docker, "notes", DockLocation::Left, DockTarget::Auto);
    let b = add(&mut docker, "notes", DockLocation::Right, DockTarget::Panel(a));
    let c = add(&mut docker, "notes", DockLocation::Bottom, DockTarget::Panel(b));
    let d = add(&mut docker, "notes", DockLocation::Stacked, DockTarget::Panel(c));
    let e = add(&mut docker, "notes", DockLocation::Float, DockTarget::Auto);
    docker.update();

    for panel in [c, a, e, d, b] {
        assert!(docker.remove_panel(panel, false));
        assert!(!docker.all_frames().is_empty());
        assert_tab_indices(&docker);
        docker.update();
    }

    let root = docker.root();
    let frame = docker.frame(root).expect("root frame");
    assert_eq!(frame.panels().len(), 1);
    let placeholder = docker.panel(frame.panels()[0]).expect("placeholder");
    assert!(placeholder.is_placeholder());
    assert!(docker.floating_frames().is_empty());
    assert!(!docker.remove_panel(frame.panels()[0], false));
}

#[test]
fn tab_indices_stay_in_range() {
    let mut docker = docker();
    let first = add(&mut docker, "notes", DockLocation::Left, DockTarget::Auto);
    let frame = docker.frame_of(first).expect("frame");
    let mut panels = vec![first];
    for _ in 0..3 {
        panels.push(add(&mut docker, "notes", DockLocation::Stacked, DockTarget::Frame(frame)));
        assert_tab_indices(&docker);
    }
    assert_eq!(docker.frame(frame).and_then(|f| f.current()), Some(3));

    // Removing the current last tab moves the selection back into range.
    docker.remove_panel(panels[3], false);
    assert_tab_indices(&docker);
    docker.set_current_tab(frame, Some(0), false).expect("select");
    docker.remove_panel(panels[0], false);
    assert_tab_indices(&docker);
    assert!(docker.set_current_tab(frame, Some(9), false).is_ok());
    assert_tab_indices(&docker);
}

#[test]
fn minimum_sizes_survive_a_divider_push() {
    let mut docker = docker();
    let a = add(&mut docker, "wide", DockLocation::Left, DockTarget::Auto);
    let b = add(&mut docker, "wide", DockLocation::Right, DockTarget::Panel(a));
    docker.update();
    let root = docker.root();

    for pos in [0.0, 0.05, 0.95, 1.0] {
        docker.set_splitter_pos(root, pos).expect("set pos");
        docker.update();
        let left = docker.frame_of(a).and_then(|f| docker.frame(f)).expect("left");
        let right = docker.frame_of(b).and_then(|f| docker.frame(f)).expect("right");
        assert!(left.rect().width >= 30.0, "left {:?} at {pos}", left.rect());
        assert!(right.rect().width >= 30.0, "right {:?} at {pos}", right.rect());
        let total = left.rect().width + right.rect().width + docker.options().splitter_bar_size;
        assert!((total - 100.0).abs() < 1e-9, "total {total}");
    }
}

#[test]
fn pinned_divider_when_minimums_do_not_fit() {
    let mut docker = docker();
    docker.resize_surface(Rect::new(0.0, 0.0, 50.0, 20.0));
    let a = add(&mut docker, "wide", DockLocation::Left, DockTarget::Auto);
    add(&mut docker, "wide", DockLocation::Right, DockTarget::Panel(a));
    docker.update();
    let root = docker.root();
    let splitter = docker.splitter(root).expect("splitter");
    assert!((0.0..=1.0).contains(&splitter.pos()));
    let bar = splitter.bar_rect();
    assert!(bar.x >= 0.0 && bar.right() <= 50.0);
}

#[test]
fn layout_pass_is_idempotent() {
    let mut docker = docker();
    let a = add(&mut docker, "notes", DockLocation::Left, DockTarget::Auto);
    add(&mut docker, "notes", DockLocation::Bottom, DockTarget::Panel(a));
    add(&mut docker, "notes", DockLocation::Right, DockTarget::Auto);
    add(&mut docker, "notes", DockLocation::Float, DockTarget::Auto);
    add(&mut docker, "notes", DockLocation::Left, DockTarget::Collapsed);

    let snapshot = |docker: &Docker| -> Vec<(NodeId, Rect, Rect)> {
        docker
            .all_frames()
            .into_iter()
            .filter_map(|id| docker.frame(id).map(|f| (id, f.rect(), f.content_rect())))
            .collect()
    };
    docker.update();
    let first = snapshot(&docker);
    let panels: Vec<Rect> = docker
        .find_panels(None)
        .into_iter()
        .filter_map(|p| docker.panel(p).map(|p| p.rect()))
        .collect();
    docker.update();
    assert_eq!(snapshot(&docker), first);
    let again: Vec<Rect> = docker
        .find_panels(None)
        .into_iter()
        .filter_map(|p| docker.panel(p).map(|p| p.rect()))
        .collect();
    assert_eq!(again, panels);
}

#[test]
fn collapse_expand_round_trip() {
    let mut docker = docker();
    add(&mut docker, "notes", DockLocation::Left, DockTarget::Auto);
    let p2 = add(&mut docker, "notes", DockLocation::Left, DockTarget::Collapsed);

    let collapser = docker.collapser(Edge::Left).expect("left collapser");
    assert_eq!(collapser.pos(), 0.0);
    let drawer_frame = docker.drawer_frame(Edge::Left).expect("drawer frame");
    assert_eq!(docker.frame_of(p2), Some(drawer_frame));
    assert!(!docker.is_expanded(Edge::Left));

    let mut now = Instant::now();
    let mut settle = |docker: &mut Docker| {
        for _ in 0..20 {
            now += Duration::from_millis(20);
            docker.tick(now);
        }
    };

    assert!(docker.expand(Edge::Left));
    settle(&mut docker);
    assert!(docker.is_expanded(Edge::Left));
    let open = docker.collapser(Edge::Left).expect("collapser");
    assert!(open.is_open());
    assert!(!open.is_animating());
    assert_eq!(docker.focused_frame(), Some(drawer_frame));

    assert!(docker.collapse(Edge::Left, false));
    settle(&mut docker);
    assert!(!docker.is_expanded(Edge::Left));
    assert_eq!(docker.collapser(Edge::Left).map(|c| c.pos()), Some(0.0));
    // The closed drawer keeps its tab strip.
    let strip = docker.frame(drawer_frame).map(|f| f.rect().width);
    assert_eq!(strip, Some(docker.options().title_height));
}
