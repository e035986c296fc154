use super::Rect;

/// One item placed on a panel's content grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridItem<T> {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub content: T,
}

impl<T> GridItem<T> {
    fn columns(&self) -> usize {
        self.x + self.width.max(1)
    }

    fn rows(&self) -> usize {
        self.y + self.height.max(1)
    }
}

/// A panel's content grid: items at `(x, y)` cells spanning
/// `width × height` cells. Column and row counts grow to fit the items and
/// every column (and row) gets the same share of the area.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout<T> {
    items: Vec<GridItem<T>>,
}

impl<T> Default for GridLayout<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> GridLayout<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `content` and returns its item index.
    pub fn add_item(&mut self, content: T, x: usize, y: usize, width: usize, height: usize) -> usize {
        self.items.push(GridItem {
            x,
            y,
            width: width.max(1),
            height: height.max(1),
            content,
        });
        self.items.len() - 1
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[GridItem<T>] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&GridItem<T>> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut GridItem<T>> {
        self.items.get_mut(index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        let cols = self.items.iter().map(GridItem::columns).max().unwrap_or(0);
        let rows = self.items.iter().map(GridItem::rows).max().unwrap_or(0);
        (cols, rows)
    }

    /// Rect of every item, in item order, inside `area`.
    pub fn cell_rects(&self, area: Rect, spacing: f64) -> Vec<Rect> {
        let (cols, rows) = self.dimensions();
        if cols == 0 || rows == 0 {
            return Vec::new();
        }
        let spacing = spacing.max(0.0);
        let cell_w = ((area.width - spacing * (cols - 1) as f64) / cols as f64).max(0.0);
        let cell_h = ((area.height - spacing * (rows - 1) as f64) / rows as f64).max(0.0);
        self.items
            .iter()
            .map(|item| {
                let w = item.width.max(1) as f64;
                let h = item.height.max(1) as f64;
                Rect::new(
                    area.x + item.x as f64 * (cell_w + spacing),
                    area.y + item.y as f64 * (cell_h + spacing),
                    cell_w * w + spacing * (w - 1.0),
                    cell_h * h + spacing * (h - 1.0),
                )
            })
            .collect()
    }

    /// Index of the top-most item whose cell contains `point`.
    pub fn item_at(&self, area: Rect, spacing: f64, point: super::Point) -> Option<usize> {
        self.cell_rects(area, spacing)
            .iter()
            .rposition(|rect| rect.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;

    #[test]
    fn single_item_fills_area() {
        let mut grid = GridLayout::new();
        grid.add_item("a", 0, 0, 1, 1);
        let rects = grid.cell_rects(Rect::new(5.0, 5.0, 40.0, 10.0), 1.0);
        assert_eq!(rects, vec![Rect::new(5.0, 5.0, 40.0, 10.0)]);
    }

    #[test]
    fn items_share_columns_and_spans() {
        let mut grid = GridLayout::new();
        grid.add_item("header", 0, 0, 2, 1);
        grid.add_item("left", 0, 1, 1, 1);
        grid.add_item("right", 1, 1, 1, 1);
        assert_eq!(grid.dimensions(), (2, 2));
        let rects = grid.cell_rects(Rect::new(0.0, 0.0, 21.0, 11.0), 1.0);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 21.0, 5.0));
        assert_eq!(rects[1], Rect::new(0.0, 6.0, 10.0, 5.0));
        assert_eq!(rects[2], Rect::new(11.0, 6.0, 10.0, 5.0));
        assert_eq!(
            grid.item_at(Rect::new(0.0, 0.0, 21.0, 11.0), 1.0, Point::new(15.0, 8.0)),
            Some(2)
        );
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let grid: GridLayout<()> = GridLayout::new();
        assert!(grid.cell_rects(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0).is_empty());
    }
}
