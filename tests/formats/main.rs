//! Format-level tests built on byte-exact container fixtures.

mod ddave;
mod detect;
