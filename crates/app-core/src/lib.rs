//! Core application logic for Feedline
//!
//! This crate contains the interaction engine of the comment overlay shown
//! over feed posts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comments;
