pub(crate) mod coerce;
pub(crate) mod core;
pub(crate) mod error;
