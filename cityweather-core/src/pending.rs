//! Cancel-and-replace bookkeeping for a flow's in-flight request.
//!
//! Starting a request and applying its result both happen under the state
//! channel's write lock, so a superseded result can never land after the
//! state a newer request has already published.

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub(crate) struct PendingRequest {
    current: Mutex<Option<CancellationToken>>,
}

impl PendingRequest {
    /// Cancel whatever is in flight and hand out a token for the new request.
    pub(crate) fn replace(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    pub(crate) fn cancel(&self) {
        if let Some(previous) = self.current.lock().take() {
            previous.cancel();
        }
    }

    /// Supersede the request in flight and publish the new request's
    /// starting state in one step.
    pub(crate) fn start<T>(
        &self,
        state: &watch::Sender<T>,
        modify: impl FnOnce(&mut T),
    ) -> CancellationToken {
        let mut token = CancellationToken::new();
        state.send_modify(|s| {
            token = self.replace();
            modify(s);
        });
        token
    }
}

/// Apply a request's result unless it has been superseded. Returns whether
/// the state was touched.
pub(crate) fn apply<T>(
    state: &watch::Sender<T>,
    token: &CancellationToken,
    modify: impl FnOnce(&mut T),
) -> bool {
    state.send_if_modified(|s| {
        if token.is_cancelled() {
            return false;
        }
        modify(s);
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_cancels_previous_token() {
        let pending = PendingRequest::default();
        let first = pending.replace();
        let second = pending.replace();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        pending.cancel();
        assert!(second.is_cancelled());
    }

    #[test]
    fn superseded_result_is_not_applied() {
        let pending = PendingRequest::default();
        let (state, _) = watch::channel(Vec::<&str>::new());

        let first = pending.start(&state, |s| s.push("start A"));
        let second = pending.start(&state, |s| s.push("start B"));

        assert!(!apply(&state, &first, |s| s.push("result A")));
        assert!(apply(&state, &second, |s| s.push("result B")));
        assert_eq!(*state.borrow(), vec!["start A", "start B", "result B"]);
    }

    #[test]
    fn cancelled_result_does_not_notify() {
        let pending = PendingRequest::default();
        let (state, mut rx) = watch::channel(0);

        let token = pending.start(&state, |s| *s = 1);
        rx.borrow_and_update();
        pending.cancel();

        assert!(!apply(&state, &token, |s| *s = 2));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(*state.borrow(), 1);
    }
}
