//! Background work: selection scans and expansion listings.
//!
//! Every task does its filesystem I/O inside `spawn_blocking` and reports the
//! outcome through the `EventProxy`. Nothing here touches `AppState`.

use std::path::PathBuf;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::events::UserEvent;
use super::proxy::EventProxy;
use crate::core::{CoreError, DirectoryScanner, ExpansionListing, NodeId, ScanRequest, ScanResult};

/// Spawns worker tasks on the runtime and routes their results to the proxy.
#[derive(Clone)]
pub struct TaskSpawner<P: EventProxy> {
    scanner: DirectoryScanner,
    proxy: P,
    runtime: Handle,
}

impl<P: EventProxy> TaskSpawner<P> {
    pub fn new(scanner: DirectoryScanner, proxy: P, runtime: Handle) -> Self {
        Self {
            scanner,
            proxy,
            runtime,
        }
    }

    /// Scans the requested directory on a worker and posts
    /// `UserEvent::ScanFinished`.
    ///
    /// Aborting the returned handle drops the result even if the blocking
    /// enumeration itself runs to completion.
    pub fn spawn_scan(&self, request: ScanRequest) -> JoinHandle<()> {
        let scanner = self.scanner.clone();
        let proxy = self.proxy.clone();

        tracing::debug!(
            "Spawning scan of {:?} (ticket {})",
            request.directory,
            request.ticket
        );
        self.runtime.spawn(async move {
            let worker_request = request.clone();
            let result = tokio::task::spawn_blocking(move || scanner.scan(&worker_request))
                .await
                .unwrap_or_else(|e| {
                    let e = CoreError::from(e);
                    tracing::error!("Scan task for {:?} failed: {}", request.directory, e);
                    ScanResult::failed(&request, e.to_string())
                });
            proxy.send_event(UserEvent::ScanFinished(Box::new(result)));
        })
    }

    /// Lists the subdirectories of `path` on a worker and posts
    /// `UserEvent::ExpansionFinished` for `node`.
    pub fn spawn_expansion(&self, node: NodeId, path: PathBuf) -> JoinHandle<()> {
        let scanner = self.scanner.clone();
        let proxy = self.proxy.clone();

        self.runtime.spawn(async move {
            let worker_path = path.clone();
            let listing =
                tokio::task::spawn_blocking(move || scanner.list_for_expansion(&worker_path))
                    .await
                    .unwrap_or_else(|e| {
                        let e = CoreError::from(e);
                        tracing::error!("Expansion task for {:?} failed: {}", path, e);
                        ExpansionListing {
                            path,
                            subdirectories: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    });
            proxy.send_event(UserEvent::ExpansionFinished { node, listing });
        })
    }
}
