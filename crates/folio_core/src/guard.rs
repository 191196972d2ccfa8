//! Last-request-wins sequencing for loads that can be superseded.

use std::cell::Cell;
use std::rc::Rc;

/// One counter per load category. Starting a load invalidates every ticket
/// handed out before it.
#[derive(Debug, Clone, Default)]
pub struct RequestSeq {
    current: Rc<Cell<u64>>,
}

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        let value = self.current.get() + 1;
        self.current.set(value);
        Ticket {
            value,
            seq: Rc::clone(&self.current),
        }
    }

    /// Invalidates in-flight loads without starting a new one.
    pub fn invalidate(&self) {
        self.current.set(self.current.get() + 1);
    }

    pub fn current(&self) -> u64 {
        self.current.get()
    }
}

/// Captured at load start and checked after every await.
#[derive(Debug, Clone)]
pub struct Ticket {
    value: u64,
    seq: Rc<Cell<u64>>,
}

impl Ticket {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn is_current(&self) -> bool {
        self.seq.get() == self.value
    }
}
