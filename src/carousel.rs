use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: usize = 6;

/// Leading items that never appear in a carousel. Item 0 is the banner.
pub const SKIPPED_ITEMS: usize = 1;

/// A trailing partial page is not counted and can't be reached.
pub fn page_count(item_count: usize) -> usize {
    item_count.saturating_sub(SKIPPED_ITEMS) / PAGE_SIZE
}

pub fn max_index(item_count: usize) -> Option<usize> {
    page_count(item_count).checked_sub(1)
}

pub fn page_items<T>(items: &[T], index: usize) -> &[T] {
    let rest = items.get(SKIPPED_ITEMS..).unwrap_or(&[]);
    let start = index.saturating_mul(PAGE_SIZE).min(rest.len());
    let end = start.saturating_add(PAGE_SIZE).min(rest.len());
    &rest[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

pub fn step(current: usize, direction: Direction, item_count: usize) -> Option<usize> {
    let max = max_index(item_count)?;
    let current = current.min(max);
    let next = match direction {
        Direction::Forward if current == max => 0,
        Direction::Forward => current + 1,
        Direction::Backward if current == 0 => max,
        Direction::Backward => current - 1,
    };
    Some(next)
}

/// `transitioning` is raised when the index changes and only lowered by
/// [`CarouselState::exit_complete`]. While it is up the index never moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CarouselState {
    index: usize,
    transitioning: bool,
}

impl CarouselState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Returns whether the index changed. A step that lands on the current
    /// page is not a change and does not raise the flag.
    pub fn advance(&mut self, direction: Direction, item_count: usize) -> bool {
        if self.transitioning {
            return false;
        }
        self.clamp(item_count);

        match step(self.index, direction, item_count) {
            Some(next) if next != self.index => {
                self.index = next;
                self.transitioning = true;
                true
            }
            _ => false,
        }
    }

    pub fn exit_complete(&mut self) {
        self.transitioning = false;
    }

    /// Pull the index back to page 0 if the result list shrank under it.
    /// Left alone while a transition is in flight.
    pub fn clamp(&mut self, item_count: usize) {
        if self.transitioning {
            return;
        }
        match max_index(item_count) {
            Some(max) if self.index <= max => {}
            _ => self.index = 0,
        }
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        page_items(items, self.index)
    }
}
