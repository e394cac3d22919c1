//! Application layer orchestrating the domain over the store and provider
//! ports: the application registry with its review lifecycle, the wallet
//! service composing provider commands with the response normalizer, and the
//! background queue for best-effort payee registration.

pub mod jobs;
pub mod registry;
pub mod wallet;
