//! `LivenessMonitor` — per-peer last-contact tracking with ping-due and
//! disconnect-due transitions (§4.6).

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::record::LivenessState;

/// A peer is in at most one of {live, in-probe, absent}. Generic over the
/// peer key so the broker (keyed by `WorkerId`) and the worker (keyed by a
/// single synthetic peer) share one implementation.
pub struct LivenessMonitor<P> {
    t_probe: Duration,
    t_disconnect: Duration,
    last_contact: HashMap<P, DateTime<Utc>>,
    probe_sent_at: HashMap<P, DateTime<Utc>>,
}

impl<P: Eq + Hash + Clone> LivenessMonitor<P> {
    pub fn new(t_probe: Duration, t_disconnect: Duration) -> Self {
        Self {
            t_probe,
            t_disconnect,
            last_contact: HashMap::new(),
            probe_sent_at: HashMap::new(),
        }
    }

    /// Clears any outstanding probe and records contact now.
    pub fn contact_from(&mut self, peer: P) {
        self.probe_sent_at.remove(&peer);
        self.last_contact.insert(peer, Utc::now());
    }

    pub fn disconnect(&mut self, peer: &P) {
        self.last_contact.remove(peer);
        self.probe_sent_at.remove(peer);
    }

    pub fn state(&self, peer: &P) -> LivenessState {
        if self.probe_sent_at.contains_key(peer) {
            LivenessState::InProbe
        } else if self.last_contact.contains_key(peer) {
            LivenessState::Live
        } else {
            LivenessState::Absent
        }
    }

    /// Peers silent for longer than `t_probe` and not already in probe. Each
    /// returned peer transitions to "in probe" atomically with the check.
    pub fn due_for_probe(&mut self, now: DateTime<Utc>) -> Vec<P> {
        let due: Vec<P> = self
            .last_contact
            .iter()
            .filter(|(_, last)| now.signed_duration_since(**last).to_std().unwrap_or_default() > self.t_probe)
            .map(|(peer, _)| peer.clone())
            .collect();

        for peer in &due {
            self.last_contact.remove(peer);
            self.probe_sent_at.insert(peer.clone(), now);
        }
        due
    }

    /// Peers whose outstanding probe has exceeded `t_disconnect`. Each
    /// returned peer's probe record is cleared (the caller is expected to
    /// disconnect it outright).
    pub fn due_for_disconnect(&mut self, now: DateTime<Utc>) -> Vec<P> {
        let due: Vec<P> = self
            .probe_sent_at
            .iter()
            .filter(|(_, sent)| now.signed_duration_since(**sent).to_std().unwrap_or_default() > self.t_disconnect)
            .map(|(peer, _)| peer.clone())
            .collect();

        for peer in &due {
            self.probe_sent_at.remove(peer);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> LivenessMonitor<&'static str> {
        LivenessMonitor::new(Duration::from_secs(1), Duration::from_secs(1))
    }

    #[test]
    fn test_contact_from_marks_live() {
        let mut m = monitor();
        m.contact_from("p1");
        assert_eq!(m.state(&"p1"), LivenessState::Live);
    }

    #[test]
    fn test_due_for_probe_transitions_to_in_probe() {
        let mut m = monitor();
        let t0 = Utc::now();
        m.contact_from("p1");
        let due = m.due_for_probe(t0 + chrono::Duration::seconds(2));
        assert_eq!(due, vec!["p1"]);
        assert_eq!(m.state(&"p1"), LivenessState::InProbe);
    }

    #[test]
    fn test_due_for_probe_returns_each_peer_once() {
        let mut m = monitor();
        m.contact_from("p1");
        let now = Utc::now() + chrono::Duration::seconds(2);
        let first = m.due_for_probe(now);
        let second = m.due_for_probe(now);
        assert_eq!(first, vec!["p1"]);
        assert!(second.is_empty());
    }

    #[test]
    fn test_contact_from_cancels_in_flight_probe() {
        let mut m = monitor();
        m.contact_from("p1");
        let now = Utc::now() + chrono::Duration::seconds(2);
        m.due_for_probe(now);
        assert_eq!(m.state(&"p1"), LivenessState::InProbe);

        m.contact_from("p1");
        assert_eq!(m.state(&"p1"), LivenessState::Live);
    }

    #[test]
    fn test_due_for_disconnect_after_grace_period() {
        let mut m = monitor();
        m.contact_from("p1");
        let probe_time = Utc::now() + chrono::Duration::seconds(2);
        m.due_for_probe(probe_time);

        let disconnect_time = probe_time + chrono::Duration::seconds(2);
        let due = m.due_for_disconnect(disconnect_time);
        assert_eq!(due, vec!["p1"]);
    }

    #[test]
    fn test_disconnect_clears_all_state() {
        let mut m = monitor();
        m.contact_from("p1");
        m.disconnect(&"p1");
        assert_eq!(m.state(&"p1"), LivenessState::Absent);
    }
}
