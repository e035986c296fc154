/// One entry of a [`TabWidget`].
#[derive(Debug, Clone, PartialEq)]
pub struct CustomTab {
    pub title: String,
    pub closeable: bool,
}

/// A tab strip placed inside a panel's content grid. The docker drives it
/// from pointer input and reports changes as panel events.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabWidget {
    tabs: Vec<CustomTab>,
    current: Option<usize>,
    pub(crate) offset: f64,
    pub reorderable: bool,
}

impl TabWidget {
    pub fn new() -> Self {
        Self {
            reorderable: true,
            ..Self::default()
        }
    }

    /// Appends a tab; the first tab becomes current.
    pub fn add_tab(&mut self, title: impl Into<String>) -> usize {
        self.tabs.push(CustomTab {
            title: title.into(),
            closeable: true,
        });
        if self.current.is_none() {
            self.current = Some(0);
        }
        self.tabs.len() - 1
    }

    pub fn tabs(&self) -> &[CustomTab] {
        &self.tabs
    }

    pub fn tab_mut(&mut self, index: usize) -> Option<&mut CustomTab> {
        self.tabs.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Returns whether the selection changed.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || self.current == Some(index) {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Removes a closeable tab. The selection follows the same rule as frame
    /// tabs: it shifts down when a tab at or before it goes away.
    pub fn remove_tab(&mut self, index: usize) -> Option<CustomTab> {
        if !self.tabs.get(index)?.closeable {
            return None;
        }
        let removed = self.tabs.remove(index);
        self.current = match self.current {
            _ if self.tabs.is_empty() => None,
            Some(cur) if index <= cur => Some(cur.saturating_sub(1)),
            other => other,
        };
        Some(removed)
    }

    /// Moves a tab, keeping the same tab selected.
    pub fn move_tab(&mut self, from: usize, to: usize) -> bool {
        if !self.reorderable || from >= self.tabs.len() || to >= self.tabs.len() || from == to {
            return false;
        }
        let selected = self.current;
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        self.current = selected.map(|cur| {
            if cur == from {
                to
            } else if from < cur && cur <= to {
                cur - 1
            } else if to <= cur && cur < from {
                cur + 1
            } else {
                cur
            }
        });
        true
    }

    pub(crate) fn titles(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(|tab| tab.title.as_str())
    }

    pub(crate) fn restore(&mut self, tabs: Vec<CustomTab>, current: Option<usize>) {
        self.tabs = tabs;
        self.current = current.filter(|cur| *cur < self.tabs.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> TabWidget {
        let mut w = TabWidget::new();
        for title in ["a", "b", "c", "d"] {
            w.add_tab(title);
        }
        w
    }

    #[test]
    fn moving_keeps_selected_tab() {
        let mut w = widget();
        w.set_current(2);
        assert!(w.move_tab(0, 3));
        assert_eq!(w.current(), Some(1));
        assert_eq!(w.tabs()[1].title, "c");
        assert!(w.move_tab(1, 0));
        assert_eq!(w.current(), Some(0));
    }

    #[test]
    fn removing_before_current_shifts_selection() {
        let mut w = widget();
        w.set_current(2);
        w.remove_tab(0);
        assert_eq!(w.current(), Some(1));
        w.remove_tab(3);
        assert_eq!(w.current(), Some(1));
        w.remove_tab(1);
        w.remove_tab(0);
        w.remove_tab(0);
        assert_eq!(w.current(), None);
    }

    #[test]
    fn fixed_tabs_stay_put() {
        let mut w = widget();
        w.reorderable = false;
        assert!(!w.move_tab(0, 1));
        w.tab_mut(0).expect("tab").closeable = false;
        assert!(w.remove_tab(0).is_none());
    }
}
