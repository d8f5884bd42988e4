//! Core primitives shared by both execution contexts

pub mod shared;
