//! X (Twitter) posting for the social trigger.
//!
//! A thin API v2 client: create a post, resolve the authenticated account's
//! username once, and build the public post URL. Post text composition is a
//! pure function in the core crate; callers pass finished text in.

pub mod client;

pub use client::{SocialClient, SocialConfig, SocialError};
