//! Domain layer

pub mod knowledge;
