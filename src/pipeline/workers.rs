use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::FileEntry;
use crate::engine::trigrams::index_file_with_limit;

/// Single trigram worker: pull paths until the path channel is closed and drained,
/// extract, send successes. Failures are logged and dropped; never retried.
fn trigram_worker_loop(path_rx: Receiver<PathBuf>, entry_tx: Sender<FileEntry>, max_file_size: u64) {
    while let Ok(path) = path_rx.recv() {
        match index_file_with_limit(&path, max_file_size) {
            Ok(entry) => {
                if entry_tx.send(entry).is_err() {
                    break;
                }
            }
            Err(e) => debug!("Skipping file: {}", e),
        }
    }
    drop(entry_tx);
}

/// Spawn `num_workers` trigram workers. Each holds a clone of `entry_tx`; the entry channel
/// closes once every worker has exited, provided the caller drops its own sender.
pub fn spawn_trigram_workers(
    path_rx: Receiver<PathBuf>,
    entry_tx: &Sender<FileEntry>,
    num_workers: usize,
    max_file_size: u64,
) -> Vec<JoinHandle<()>> {
    (0..num_workers.max(1))
        .map(|_| {
            let path_rx = path_rx.clone();
            let entry_tx = entry_tx.clone();
            thread::spawn(move || trigram_worker_loop(path_rx, entry_tx, max_file_size))
        })
        .collect()
}
