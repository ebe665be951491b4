#![doc = include_str!("../README.md")]

pub mod apache;
pub mod ssh;
