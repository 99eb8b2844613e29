pub(crate) mod charts;
