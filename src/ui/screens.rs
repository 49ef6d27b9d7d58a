/// Selection cursor over the displayed cards. The cards themselves belong to
/// the catalog; the view only remembers which one is highlighted.
#[derive(Debug, Default, Clone)]
pub(crate) struct ListingView {
    pub(crate) selected: usize,
}

impl ListingView {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let len = len as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor inside a list that may just have shrunk.
    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// First visible index so that `selected` stays on screen when only
    /// `capacity` cards fit.
    pub(crate) fn window_start(&self, capacity: usize, len: usize) -> usize {
        let capacity = capacity.max(1);
        let mut start = if self.selected >= capacity {
            self.selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        start
    }
}
