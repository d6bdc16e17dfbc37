//! Per-view fetch state
//!
//! A `FetchSlot` is the only place a view keeps server data. It applies an
//! outcome only when the outcome's sequence number matches the latest request
//! the slot issued, so a slow early response can't overwrite a newer one.

use chrono::{DateTime, Local};

/// What `FetchSlot::complete` did with an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotUpdate {
    /// Payload replaced
    Applied,
    /// Request failed, payload untouched
    Failed,
    /// Outcome belongs to a superseded request and was dropped
    Stale,
}

#[derive(Debug, Clone)]
pub struct FetchSlot<T> {
    latest_seq: Option<u64>,
    loading: bool,
    payload: Option<T>,
    last_error: Option<String>,
    updated_at: Option<DateTime<Local>>,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            latest_seq: None,
            loading: false,
            payload: None,
            last_error: None,
            updated_at: None,
        }
    }
}

impl<T> FetchSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that request `seq` is in flight. Later calls supersede earlier ones.
    pub fn begin(&mut self, seq: u64) {
        self.latest_seq = Some(seq);
        self.loading = true;
    }

    pub fn complete(&mut self, seq: u64, result: Result<T, String>) -> SlotUpdate {
        if self.latest_seq != Some(seq) {
            return SlotUpdate::Stale;
        }
        self.loading = false;
        match result {
            Ok(payload) => {
                self.payload = Some(payload);
                self.last_error = None;
                self.updated_at = Some(Local::now());
                SlotUpdate::Applied
            }
            Err(err) => {
                self.last_error = Some(err);
                SlotUpdate::Failed
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn latest_seq(&self) -> Option<u64> {
        self.latest_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_clears_loading_and_stores_payload() {
        let mut slot: FetchSlot<&str> = FetchSlot::new();
        slot.begin(1);
        assert!(slot.is_loading());

        assert_eq!(slot.complete(1, Ok("first")), SlotUpdate::Applied);
        assert!(!slot.is_loading());
        assert_eq!(slot.payload(), Some(&"first"));
        assert!(slot.updated_at().is_some());
    }

    #[test]
    fn test_failure_clears_loading_and_keeps_payload() {
        let mut slot: FetchSlot<&str> = FetchSlot::new();
        slot.begin(1);
        slot.complete(1, Ok("first"));

        slot.begin(2);
        assert_eq!(
            slot.complete(2, Err("connection refused".to_string())),
            SlotUpdate::Failed
        );
        assert!(!slot.is_loading());
        assert_eq!(slot.payload(), Some(&"first"));
        assert_eq!(slot.last_error(), Some("connection refused"));
    }

    #[test]
    fn test_failure_without_prior_payload_leaves_none() {
        let mut slot: FetchSlot<String> = FetchSlot::new();
        slot.begin(4);
        slot.complete(4, Err("timeout".to_string()));
        assert!(slot.payload().is_none());
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_stale_outcome_is_dropped() {
        let mut slot: FetchSlot<&str> = FetchSlot::new();
        slot.begin(1);
        slot.begin(2);

        // Newer request resolves first
        assert_eq!(slot.complete(2, Ok("newer")), SlotUpdate::Applied);
        // Older one arrives late and must not clobber it
        assert_eq!(slot.complete(1, Ok("older")), SlotUpdate::Stale);
        assert_eq!(slot.payload(), Some(&"newer"));
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_stale_outcome_keeps_loading_for_pending_request() {
        let mut slot: FetchSlot<&str> = FetchSlot::new();
        slot.begin(1);
        slot.begin(2);

        assert_eq!(slot.complete(1, Err("boom".to_string())), SlotUpdate::Stale);
        assert!(slot.is_loading());
        assert!(slot.last_error().is_none());
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        slot.begin(1);
        slot.complete(1, Err("nope".to_string()));
        slot.begin(2);
        slot.complete(2, Ok(7));
        assert!(slot.last_error().is_none());
        assert_eq!(slot.payload(), Some(&7));
    }

    #[test]
    fn test_outcome_before_any_request_is_stale() {
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        assert_eq!(slot.complete(9, Ok(1)), SlotUpdate::Stale);
        assert!(slot.payload().is_none());
    }
}
