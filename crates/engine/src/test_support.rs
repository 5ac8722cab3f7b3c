// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test double for [`DaemonContext`], in the shape of
//! `rq-adapters`'s `FakeAnalyzerAdapter`: a `Clone` handle over shared
//! interior state that a test configures up front and inspects afterwards.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::context::DaemonContext;

struct FakeState {
    idle_timeout_minutes: AtomicU64,
    idle_seconds: AtomicU64,
    shutdown_requested: AtomicBool,
    activity_touches: AtomicU64,
}

/// A `DaemonContext` fully scripted by the test.
#[derive(Clone)]
pub struct FakeDaemonContext {
    inner: Arc<FakeState>,
}

impl FakeDaemonContext {
    pub fn new(idle_timeout_minutes: u32, idle_seconds: u64) -> Self {
        Self {
            inner: Arc::new(FakeState {
                idle_timeout_minutes: AtomicU64::new(idle_timeout_minutes as u64),
                idle_seconds: AtomicU64::new(idle_seconds),
                shutdown_requested: AtomicBool::new(false),
                activity_touches: AtomicU64::new(0),
            }),
        }
    }

    pub fn set_idle_seconds(&self, idle_seconds: u64) {
        self.inner.idle_seconds.store(idle_seconds, Ordering::SeqCst);
    }

    pub fn shutdown_requested(&self) -> bool {
        self.inner.shutdown_requested.load(Ordering::SeqCst)
    }

    pub fn activity_touches(&self) -> u64 {
        self.inner.activity_touches.load(Ordering::SeqCst)
    }
}

impl Default for FakeDaemonContext {
    fn default() -> Self {
        Self::new(30, 0)
    }
}

impl DaemonContext for FakeDaemonContext {
    fn idle_timeout_minutes(&self) -> u32 {
        self.inner.idle_timeout_minutes.load(Ordering::SeqCst) as u32
    }

    fn idle_seconds(&self) -> u64 {
        self.inner.idle_seconds.load(Ordering::SeqCst)
    }

    fn request_shutdown(&self) {
        self.inner.shutdown_requested.store(true, Ordering::SeqCst);
    }

    fn touch_activity(&self) {
        self.inner.activity_touches.fetch_add(1, Ordering::SeqCst);
    }
}
