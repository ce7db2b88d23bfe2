//! Pure function mapping `(transfer, wall-clock, node config)` to duty.
//!
//! Every function here is deterministic given its inputs — no clock is read internally — so
//! every node computes the same duty independently, and tests drive `now` directly rather than
//! sleeping.

use crate::config::NodeConfig;
use dib_types::Transfer;
use std::time::Duration;

/// The outcome of evaluating duty for a transfer at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duty {
    /// Whether this node should act on the transfer right now.
    pub is_my_duty: bool,
    /// Whether the transfer has left its "fresh" window (period 0).
    pub is_timed_out: bool,
}

/// Splits `age` into `(k, duration_k, time_left_in_k)` under the exponential period schedule
/// `timeout_initial × timeout_backoff^k`.
pub fn resolve_period(age: Duration, timeout_initial: Duration, timeout_backoff: f64) -> (u32, Duration, Duration) {
    let mut k: u32 = 0;
    let mut duration = timeout_initial;
    let mut remaining = age;
    while remaining >= duration {
        remaining -= duration;
        k += 1;
        duration = duration.mul_f64(timeout_backoff);
    }
    let time_left = duration - remaining;
    (k, duration, time_left)
}

/// `transfer_anchor = int(t.id) if not route_to_first_node else 0`, reduced to a `u128` via the
/// id's low 16 bytes — plenty of entropy for the modulus below.
fn transfer_anchor(t: &Transfer, route_to_first_node: bool) -> u128 {
    if route_to_first_node {
        return 0;
    }
    let digest = t.id().digest();
    let mut low = [0u8; 16];
    low.copy_from_slice(&digest.as_slice()[16..32]);
    u128::from_be_bytes(low)
}

/// Evaluates duty for `t` at wall-clock `now` (unix seconds).
pub fn duty(t: &Transfer, now: u64, config: &NodeConfig) -> Duty {
    let age = Duration::from_secs(now.saturating_sub(t.initiation_timestamp()));
    let (k, duration, time_left) = resolve_period(age, config.timeout_initial(), config.timeout_backoff());
    let is_timed_out = k > 0;

    // Second half of the current period: nobody acts, giving an in-flight tx room to confirm.
    if time_left < duration / 2 {
        return Duty { is_my_duty: false, is_timed_out };
    }

    let anchor = transfer_anchor(t, config.route_to_first_node());
    let node_count = u128::from(config.node_count());
    let owner = ((anchor + u128::from(k)) % node_count) + 1;
    let is_my_duty = owner == u128::from(config.node_id());

    Duty { is_my_duty, is_timed_out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use dib_types::TxKey;

    fn config(node_id: u32, node_count: u32, route_to_first_node: bool) -> NodeConfig {
        NodeConfig::new(
            node_id,
            node_count,
            vec![],
            Duration::from_secs(30),
            2.0,
            true,
            true,
            true,
            route_to_first_node,
        )
        .unwrap()
    }

    fn transfer_at(initiation_timestamp: u64) -> Transfer {
        Transfer::new(
            dib_types::TransferId::new(B256::ZERO),
            "7".to_string(),
            vec![],
            initiation_timestamp,
            TxKey::new(0, B256::ZERO),
        )
    }

    #[test]
    fn resolve_period_first_period_covers_zero_to_initial() {
        let (k, d, left) = resolve_period(Duration::from_secs(10), Duration::from_secs(30), 2.0);
        assert_eq!(k, 0);
        assert_eq!(d, Duration::from_secs(30));
        assert_eq!(left, Duration::from_secs(20));
    }

    #[test]
    fn resolve_period_advances_and_grows_exponentially() {
        // age = 30 (period 0 done) + 10 into period 1 (duration 60).
        let (k, d, left) = resolve_period(Duration::from_secs(40), Duration::from_secs(30), 2.0);
        assert_eq!(k, 1);
        assert_eq!(d, Duration::from_secs(60));
        assert_eq!(left, Duration::from_secs(50));
    }

    #[test]
    fn period_zero_is_not_timed_out() {
        // transfer_anchor=0 (route_to_first_node), owner for k=0 is node 1.
        let cfg = config(1, 3, true);
        let t = transfer_at(0);
        let d = duty(&t, 10, &cfg);
        assert!(!d.is_timed_out);
        assert!(d.is_my_duty);
    }

    #[test]
    fn dead_zone_in_second_half_of_period_grants_nobody_duty() {
        // age = timeout_initial * 0.75 is in the second half of period 0.
        let cfg = config(1, 3, true);
        let t = transfer_at(0);
        let d = duty(&t, 22, &cfg); // 0.75 * 30 = 22.5, truncated to 22s for integer secs
        assert!(!d.is_my_duty);
    }

    #[test]
    fn period_one_owner_acts_just_past_first_period() {
        // age = timeout_initial * 1.01 rolls into period 1, first half, owner acts.
        let cfg = config(2, 3, true); // route_to_first_node means anchor=0; owner(k=1) = (0+1)%3+1 = 2
        let t = transfer_at(0);
        let d = duty(&t, 31, &cfg);
        assert!(d.is_timed_out);
        assert!(d.is_my_duty);
    }

    #[test]
    fn takeover_rotates_ownership_away_from_the_dead_node() {
        // node_count=3, natural owner (k=0) is node 1; node 1 is dead; at period 1 node 2 should
        // see is_timed_out && is_my_duty once past the dead zone.
        let cfg = config(2, 3, true);
        let t = transfer_at(0);
        let d = duty(&t, 31, &cfg);
        assert!(d.is_timed_out);
        assert!(d.is_my_duty);
    }

    #[test]
    fn non_owner_never_claims_duty_in_the_active_half() {
        let cfg = config(3, 3, true);
        let t = transfer_at(0);
        let d = duty(&t, 10, &cfg);
        assert!(!d.is_my_duty);
    }
}
