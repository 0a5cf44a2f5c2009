use std::time::{SystemTime, UNIX_EPOCH};

use super::BookId;

/// Hands out millisecond timestamps as ids, bumped past the last id when the clock has not
/// moved on (or went backwards), so ids are strictly increasing.
#[derive(Debug)]
pub(crate) struct MonotonicIds {
    last: BookId,
}

impl MonotonicIds {
    pub(crate) fn starting_after(last: BookId) -> Self {
        Self { last }
    }

    pub(crate) fn next(&mut self) -> BookId {
        self.next_at(now_millis())
    }

    fn next_at(&mut self, now: BookId) -> BookId {
        let id = now.max(self.last.saturating_add(1));
        self.last = id;

        id
    }
}

fn now_millis() -> BookId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as BookId)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_the_clock_when_it_is_ahead() {
        let mut ids = MonotonicIds::starting_after(2);

        assert_eq!(ids.next_at(1_700_000_000_000), 1_700_000_000_000);
    }

    #[test]
    fn same_millisecond_does_not_collide() {
        let mut ids = MonotonicIds::starting_after(2);

        let first = ids.next_at(1_700_000_000_000);
        let second = ids.next_at(1_700_000_000_000);

        assert_eq!(second, first + 1);
    }

    #[test]
    fn clock_going_backwards_does_not_collide() {
        let mut ids = MonotonicIds::starting_after(1_700_000_000_005);

        assert_eq!(ids.next_at(1_700_000_000_000), 1_700_000_000_006);
    }

    #[test]
    fn real_clock_is_strictly_increasing() {
        let mut ids = MonotonicIds::starting_after(0);

        let generated: Vec<BookId> = (0..1000).map(|_| ids.next()).collect();

        assert!(generated.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
