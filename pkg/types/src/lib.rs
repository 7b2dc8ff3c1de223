pub mod config;
pub mod ingress;
pub mod meta;
pub mod pod;
pub mod service;
pub mod trace;
pub mod validate;
