//! `WorkerRegistration` — the data-model view of a worker's entry in the
//! router (§3). The router itself stores this as two maps per §4.5; this
//! type is an introspection snapshot derived from them.

use std::collections::BTreeSet;

use crate::util::WorkerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRegistration {
    pub worker_id: WorkerId,
    pub endpoints: BTreeSet<String>,
    pub ready: bool,
}
