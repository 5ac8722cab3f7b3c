//! End-to-end scenarios (§8) driven against the real `rq`/`rqd` binaries.

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/definition.rs"]
mod definition;

#[path = "specs/references.rs"]
mod references;

#[path = "specs/status.rs"]
mod status;

#[path = "specs/idle_shutdown.rs"]
mod idle_shutdown;

#[path = "specs/reload.rs"]
mod reload;

#[path = "specs/frame_bound.rs"]
mod frame_bound;
