//! Request bodies

pub mod pet;
