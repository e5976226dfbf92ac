pub(crate) mod intervals;
