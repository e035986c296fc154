use std::time::{Duration, Instant};

use super::NodeId;
use crate::layout::{Anchor, AnchorContext, DropTarget, Point, Rect, Size, detect_anchor};

/// Drag feedback: an outline that follows the pointer and snaps to the
/// most recent anchor with a short tween.
#[derive(Debug, Clone)]
pub struct Ghost {
    rect: Rect,
    from: Rect,
    to: Rect,
    tween_started: Option<Instant>,
    tween: Duration,
    anchor: Option<Anchor<NodeId>>,
    mouse: Point,
    float_size: Size,
    visible: bool,
}

impl Ghost {
    pub fn new(rect: Rect, float_size: Size, tween: Duration) -> Self {
        Self {
            rect,
            from: rect,
            to: rect,
            tween_started: None,
            tween,
            anchor: None,
            mouse: rect.center(),
            float_size,
            visible: false,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Where the current tween ends.
    pub fn target_rect(&self) -> Rect {
        self.to
    }

    pub fn current_anchor(&self) -> Option<&Anchor<NodeId>> {
        self.anchor.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mouse(&self) -> Point {
        self.mouse
    }

    /// Tests `targets` in order and anchors to the first hit. Without a hit
    /// the ghost floats under the pointer, or hides if floating is off.
    pub fn update(
        &mut self,
        mouse: Point,
        targets: &[DropTarget<NodeId>],
        ctx: &AnchorContext,
        disable_floating: bool,
        now: Instant,
    ) -> Option<&Anchor<NodeId>> {
        let found = targets
            .iter()
            .find_map(|target| detect_anchor(ctx, target, mouse));
        if found.is_none() && disable_floating {
            self.mouse = mouse;
            self.anchor = None;
            self.visible = false;
            return None;
        }
        self.anchor(mouse, found, now);
        self.anchor.as_ref()
    }

    /// Points the ghost at `anchor`, or at a free floating rect under the
    /// pointer. A tween restarts whenever the destination changes kind or
    /// anchor.
    pub fn anchor(&mut self, mouse: Point, anchor: Option<Anchor<NodeId>>, now: Instant) {
        self.mouse = mouse;
        let target = match &anchor {
            Some(anchor) => anchor.rect,
            None => Rect::from_center(mouse, self.float_size),
        };
        let retarget = match (&self.anchor, &anchor) {
            (None, None) => !self.visible,
            (Some(a), Some(b)) => a.rect != b.rect || a.location != b.location,
            _ => true,
        };
        if retarget {
            self.from = self.rect;
            self.tween_started = Some(now);
        }
        if !self.visible {
            self.rect = target;
            self.from = target;
        }
        self.to = target;
        self.anchor = anchor;
        self.visible = true;
        self.tick(now);
    }

    /// Advances the tween.
    pub fn tick(&mut self, now: Instant) {
        let progress = match self.tween_started {
            Some(started) if !self.tween.is_zero() => {
                now.saturating_duration_since(started).as_secs_f64() / self.tween.as_secs_f64()
            }
            _ => 1.0,
        };
        self.rect = self.from.lerp(&self.to, progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Measure;
    use crate::layout::{DockLocation, Edge};

    fn ctx() -> AnchorContext {
        AnchorContext {
            surface: Rect::new(0.0, 0.0, 100.0, 40.0),
            title_height: 1.0,
            edge_anchor: Measure::Pixels(2.0),
            panel_anchor: Measure::Percent(15.0),
            can_orient_tabs: true,
        }
    }

    fn target(rect: Rect) -> DropTarget<NodeId> {
        DropTarget {
            id: NodeId(1),
            rect,
            has_title: true,
            same: None,
            can_split: true,
            is_topper: false,
            allow_edges: false,
            is_placeholder: false,
        }
    }

    #[test]
    fn floats_under_pointer_without_anchor() {
        let now = Instant::now();
        let mut ghost = Ghost::new(Rect::default(), Size::new(10.0, 4.0), Duration::ZERO);
        let anchor = ghost.update(Point::new(50.0, 20.0), &[], &ctx(), false, now);
        assert!(anchor.is_none());
        assert!(ghost.is_visible());
        assert_eq!(ghost.rect(), Rect::new(45.0, 18.0, 10.0, 4.0));
    }

    #[test]
    fn hides_when_floating_disabled() {
        let now = Instant::now();
        let mut ghost = Ghost::new(Rect::default(), Size::new(10.0, 4.0), Duration::ZERO);
        ghost.update(Point::new(50.0, 20.0), &[], &ctx(), true, now);
        assert!(!ghost.is_visible());
    }

    #[test]
    fn tweens_towards_new_anchor() {
        let now = Instant::now();
        let mut ghost = Ghost::new(
            Rect::default(),
            Size::new(10.0, 4.0),
            Duration::from_millis(100),
        );
        ghost.update(Point::new(90.0, 38.0), &[], &ctx(), false, now);
        let start = ghost.rect();
        let targets = [target(Rect::new(0.0, 0.0, 100.0, 40.0))];
        let anchor = ghost
            .update(Point::new(10.0, 20.0), &targets, &ctx(), false, now)
            .copied()
            .expect("anchor");
        assert_eq!(anchor.location, DockLocation::Left);
        assert_eq!(ghost.rect(), start);
        ghost.tick(now + Duration::from_millis(50));
        assert_eq!(ghost.rect(), start.lerp(&anchor.rect, 0.5));
        ghost.tick(now + Duration::from_millis(200));
        assert_eq!(ghost.rect(), anchor.rect);
        assert_ne!(anchor.tab_orientation, Some(Edge::Top));
    }
}
