//! Service instance abstraction.
//!
//! # Responsibilities
//! - Represent a single instance of a downstream service
//! - Track in-flight requests (for least-requests balancing)

use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A single running instance of a downstream service.
#[derive(Debug)]
pub struct Instance {
    /// The address of the instance.
    pub addr: SocketAddr,
    /// Number of requests currently forwarded to this instance.
    pub in_flight: AtomicUsize,
}

impl Instance {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Mark a request as started; the returned guard marks it finished on drop.
    pub fn acquire(self: &Arc<Self>) -> InstanceGuard {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InstanceGuard {
            instance: self.clone(),
        }
    }
}

/// A RAII guard that tracks one in-flight request.
#[derive(Debug)]
pub struct InstanceGuard {
    instance: Arc<Instance>,
}

impl Deref for InstanceGuard {
    type Target = Instance;
    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        self.instance.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_tracks_in_flight() {
        let instance = Arc::new(Instance::new("127.0.0.1:8080".parse().unwrap()));
        let g1 = instance.acquire();
        let g2 = instance.acquire();
        assert_eq!(instance.in_flight(), 2);
        drop(g1);
        assert_eq!(g2.in_flight(), 1);
        drop(g2);
        assert_eq!(instance.in_flight(), 0);
    }
}
