//! Engine test suites. Smaller units keep their tests next to the
//! code; the cross-module behavior of selection, delegation, and table
//! lifecycle lives here.

pub(crate) mod support;
