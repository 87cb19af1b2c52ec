//! Three-state view of a peer's liveness (§9 expansion of §4.6, since the
//! original encodes this implicitly via two optional dict memberships).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessState {
    /// Contact recorded, no outstanding probe.
    Live,
    /// A probe has been sent and not yet answered or timed out.
    InProbe,
    /// No record for this peer at all.
    Absent,
}
