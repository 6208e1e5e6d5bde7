//! core::ops
//!
//! The editing primitives.
//!
//! # Modules
//!
//! - [`allocator`] - Scope-unique public tokens from an atomic counter
//! - [`edit_lock`] - Advisory, self-expiring "who is editing" marker
//! - [`version_log`] - Append-only content snapshots and the unsaved signal
//! - [`status`] - draft/publish/trash transitions and publication stamping
//!
//! # Architecture
//!
//! A document's life through these pieces:
//! 1. Creation mints its token through the allocator, exactly once
//! 2. The active editor's client re-acquires the edit lock on a heartbeat
//! 3. Each save bumps the save count; a snapshot appends a version and
//!    syncs the counter
//! 4. Status changes happen independently and stamp publication time
//!
//! The allocator and version log propagate store failures. The edit lock
//! offers degrading helpers so editing never waits on the lock store.

pub mod allocator;
pub mod edit_lock;
pub mod status;
pub mod version_log;

pub use allocator::{counter_key, TokenAllocator};
pub use edit_lock::{lock_key, EditLock, DEFAULT_LOCK_TTL};
pub use status::{transition, StatusChange};
pub use version_log::{has_unsaved_version, VersionLog};
