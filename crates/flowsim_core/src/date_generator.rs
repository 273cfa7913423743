//! Root of the simulation pipeline: emits one `DATE` message per calendar day.

use jiff::civil::Date;
use tracing::{debug, trace};

use crate::date_math::{add_days, days_inclusive};
use crate::process::{Context, Handler, Message, Payload, State};

/// Inclusive range of civil dates, stepped one day at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    next: Date,
    remaining: usize,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self {
            next: start,
            remaining: days_inclusive(start, end),
        }
    }
}

impl Iterator for DateRange {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = add_days(current, 1);
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DateRange {}

/// Handler that turns `START` into the full stream of `DATE` messages and
/// then kills its own process so the tree drains.
#[derive(Debug, Clone)]
pub struct DateGenerator {
    start: Date,
    end: Date,
}

impl DateGenerator {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    pub fn dates(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

impl Handler for DateGenerator {
    fn handle(&mut self, ctx: &mut Context, msg: &Message) {
        match msg.payload {
            Payload::Start => {
                let dates = self.dates();
                debug!(start = %self.start, end = %self.end, days = dates.len(), "generating dates");
                for date in dates {
                    ctx.dispatch(Message::date(date));
                }
                ctx.set_state(State::Killed);
            }
            _ => trace!(kind = ?msg.kind(), "date generator ignored message"),
        }
    }
}
