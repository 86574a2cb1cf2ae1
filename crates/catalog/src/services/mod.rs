//! Runtime services built on parsed catalogs.

pub mod locale;
