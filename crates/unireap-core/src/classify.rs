// Idle-client classification
//
// A known client is a ghost when it has no name and has never moved a
// byte or packet in either direction. The test is exact: any non-zero
// term, including a single character of name, keeps the client.

use unireap_api::ClientRecord;

/// Sum of name length and all traffic counters.
///
/// Computed in `u128` so six saturated `u64` counters cannot overflow.
pub fn activity(record: &ClientRecord) -> u128 {
    let name = u128::try_from(record.name_len()).unwrap_or(u128::MAX);
    [
        record.tx_bytes,
        record.tx_packets,
        record.rx_bytes,
        record.rx_packets,
        record.wifi_tx_attempts,
        record.tx_retries,
    ]
    .into_iter()
    .map(u128::from)
    .fold(name, u128::saturating_add)
}

/// `true` iff the client's activity is exactly zero.
pub fn is_idle(record: &ClientRecord) -> bool {
    activity(record) == 0
}

/// MACs of idle clients, in discovery order.
pub fn idle_macs(records: &[ClientRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| is_idle(r))
        .map(|r| r.mac.clone())
        .collect()
}
