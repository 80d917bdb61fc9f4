//! Auto-wait engine (§4.5): polls until an element resolves or the
//! policy's timeout elapses.

use std::future::Future;
use std::time::{Duration, Instant};

use enbu_core::{AutoWaitPolicy, Selector, WaitState};
use enbu_driver::{DriverAdapter, DriverError, SnapshotData};

async fn poll_with_timeout<F, Fut>(policy: AutoWaitPolicy, mut check: F) -> Result<(), DriverError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, DriverError>>,
{
    let deadline = Instant::now() + Duration::from_millis(policy.timeout_ms);
    loop {
        if check().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(DriverError::Timeout {
                timeout_ms: policy.timeout_ms,
            });
        }
        tokio::time::sleep(Duration::from_millis(policy.interval_ms)).await;
    }
}

fn ref_key(raw: &str) -> &str {
    raw.strip_prefix('@').unwrap_or(raw)
}

fn selector_present_in_snapshot(selector: &Selector, snapshot: &SnapshotData) -> bool {
    match selector {
        Selector::InteractableText(text) => {
            snapshot.refs.values().any(|entry| entry.name == text.as_str())
        }
        Selector::Ref(element_ref) => snapshot.refs.contains_key(ref_key(element_ref.as_str())),
        Selector::Css(_) | Selector::Xpath(_) => true,
    }
}

/// Runs before dispatch for `interactableText`/`ref` selectors (§4.5).
/// A no-op for `css`/`xpath`, which skip this loop entirely.
pub async fn wait_until_resolved(
    driver: &DriverAdapter,
    selector: &Selector,
    policy: AutoWaitPolicy,
    session_name: &str,
) -> Result<(), DriverError> {
    if !selector.requires_auto_wait() {
        return Ok(());
    }
    poll_with_timeout(policy, || async {
        let snapshot = driver.snapshot(session_name).await?;
        Ok(selector_present_in_snapshot(selector, &snapshot))
    })
    .await
}

fn state_satisfied(state: WaitState, present: bool) -> bool {
    match state {
        WaitState::Visible | WaitState::Attached => present,
        WaitState::Hidden | WaitState::Detached => !present,
    }
}

/// Backs the `wait` command's selector form: polls `is-visible` for
/// `css`/`xpath`, `snapshot` otherwise, until `state` is satisfied (spec
/// §4.5's "CSS/xpath selectors skip this loop unless the command
/// explicitly has wait semantics").
pub async fn wait_for_state(
    driver: &DriverAdapter,
    selector: &Selector,
    state: WaitState,
    policy: AutoWaitPolicy,
    session_name: &str,
) -> Result<(), DriverError> {
    poll_with_timeout(policy, || async {
        let present = match selector {
            Selector::Css(_) | Selector::Xpath(_) => driver.is_visible(selector, session_name).await?,
            Selector::InteractableText(_) | Selector::Ref(_) => {
                let snapshot = driver.snapshot(session_name).await?;
                selector_present_in_snapshot(selector, &snapshot)
            }
        };
        Ok(state_satisfied(state, present))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_state_satisfied_treats_hidden_and_detached_as_absence() {
        assert!(state_satisfied(WaitState::Hidden, false));
        assert!(!state_satisfied(WaitState::Hidden, true));
        assert!(state_satisfied(WaitState::Detached, false));
    }

    #[test]
    fn unit_state_satisfied_treats_visible_and_attached_as_presence() {
        assert!(state_satisfied(WaitState::Visible, true));
        assert!(state_satisfied(WaitState::Attached, true));
        assert!(!state_satisfied(WaitState::Visible, false));
    }

    #[test]
    fn functional_ref_key_strips_leading_at_sigil() {
        assert_eq!(ref_key("@e1"), "e1");
        assert_eq!(ref_key("e1"), "e1");
    }
}
