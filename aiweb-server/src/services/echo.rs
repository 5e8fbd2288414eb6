//! Echo and flaky-echo logic.
//!
//! The flaky variant fails a configurable number of times per caller before
//! succeeding, which gives the client's retry wrapper something to retry.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use aiweb_types::EchoResponse;

use super::ServiceError;

/// Identity echo.
pub fn echo(msg: String) -> EchoResponse {
    EchoResponse { msg, attempts: None }
}

/// Hosts tracked at once. A new host arriving at the cap evicts an
/// arbitrary existing entry.
const MAX_TRACKED_HOSTS: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct FailureCounter {
    failures: u32,
    seen: u32,
}

/// Per-caller failure counters for the flaky echo: at most one entry per
/// client host, restarted whenever the host asks for a different `failures`.
#[derive(Debug)]
pub struct FlakyEchoTracker {
    counters: Mutex<HashMap<String, FailureCounter>>,
    capacity: usize,
}

impl Default for FlakyEchoTracker {
    fn default() -> Self {
        Self::with_capacity(MAX_TRACKED_HOSTS)
    }
}

impl FlakyEchoTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Fail while the caller's counter is below `failures`; otherwise echo
    /// the message with the total attempt count and reset the counter.
    pub fn echo(
        &self,
        msg: String,
        client_host: &str,
        failures: u32,
    ) -> Result<EchoResponse, ServiceError> {
        let mut map = self.counters.lock().unwrap_or_else(PoisonError::into_inner);

        if !map.contains_key(client_host) && map.len() >= self.capacity {
            if let Some(evicted) = map.keys().next().cloned() {
                map.remove(&evicted);
            }
        }
        let counter = map
            .entry(client_host.to_owned())
            .or_insert(FailureCounter { failures, seen: 0 });
        if counter.failures != failures {
            *counter = FailureCounter { failures, seen: 0 };
        }

        if counter.seen < failures {
            counter.seen += 1;
            return Err(ServiceError::Transient("Simulated transient failure".into()));
        }

        let attempts = counter.seen + 1;
        map.remove(client_host);
        Ok(EchoResponse { msg, attempts: Some(attempts) })
    }

    #[cfg(test)]
    fn tracked_hosts(&self) -> usize {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
