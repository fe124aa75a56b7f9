use crate::models::RatingFilter;

/// Popup listing the four filters, opened with `f`.
#[derive(Debug, Clone)]
pub(crate) struct FilterMenu {
    pub(crate) selected: usize,
}

impl FilterMenu {
    /// Open with the active filter highlighted.
    pub(crate) fn new(current: RatingFilter) -> Self {
        let selected = RatingFilter::ALL
            .iter()
            .position(|filter| *filter == current)
            .unwrap_or(0);
        Self { selected }
    }

    pub(crate) fn move_by(&mut self, offset: isize) {
        let len = RatingFilter::ALL.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }

    pub(crate) fn current(&self) -> RatingFilter {
        RatingFilter::ALL[self.selected]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    #[test]
    fn opens_on_the_active_filter_and_wraps() {
        let mut menu = FilterMenu::new(RatingFilter::ShowAll);
        assert_eq!(menu.selected, 3);
        menu.move_by(1);
        assert_eq!(menu.current(), RatingFilter::Only(Rating::Liked));
        menu.move_by(-1);
        assert_eq!(menu.current(), RatingFilter::ShowAll);
    }
}
