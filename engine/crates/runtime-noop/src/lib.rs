//! Do-nothing implementations of the `runtime` contracts, used as explicit
//! defaults wherever a collaborator was not configured.

pub mod rate_limiting;
