//! Session gate integration tests
//!
//! Drive the full router through `tower::ServiceExt::oneshot` with an
//! in-memory session store, plus the Supabase adapter against a stub
//! GoTrue server.

#![allow(dead_code)]

mod common;
mod gate;
mod login;
mod supabase;
