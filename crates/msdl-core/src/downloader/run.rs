//! Bounded worker pool driving the chunk fetches.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::client::HttpClient;
use crate::error::DownloadError;
use crate::planner::ChunkPlan;
use crate::storage::StagingFile;

use super::chunk;

/// Runs every chunk through a pool of at most `connections` workers popping
/// from a shared queue. The first fatal result raises the abort flag and
/// drains the queue so siblings stop picking up work; their abort outcomes
/// never mask the original error.
pub(super) fn run_pool(
    client: &HttpClient,
    urls: &[String],
    chunks: &[ChunkPlan],
    staging: &StagingFile,
    connections: usize,
    quiet: bool,
) -> Result<(), DownloadError> {
    let count = chunks.len();
    let work: Arc<Mutex<VecDeque<ChunkPlan>>> =
        Arc::new(Mutex::new(chunks.iter().copied().collect()));
    let abort = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let num_workers = connections.max(1).min(count);
    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let work = Arc::clone(&work);
        let abort = Arc::clone(&abort);
        let tx = tx.clone();
        let client = client.clone();
        let urls = urls.to_vec();
        let staging = staging.clone();
        handles.push(thread::spawn(move || loop {
            if abort.load(Ordering::Relaxed) {
                break;
            }
            let plan = match work.lock().unwrap().pop_front() {
                Some(p) => p,
                None => break,
            };
            let res = fetch_and_write(&client, &urls, &plan, &staging, &abort, quiet);
            let _ = tx.send(res);
        }));
    }
    drop(tx);

    let mut first_error: Option<DownloadError> = None;
    let mut to_receive = count;
    while to_receive > 0 {
        let res = match rx.recv() {
            Ok(res) => res,
            Err(_) => {
                if first_error.is_none() {
                    first_error = Some(DownloadError::Io(io::Error::new(
                        io::ErrorKind::Other,
                        "chunk worker result channel closed (worker may have panicked)",
                    )));
                }
                break;
            }
        };
        to_receive -= 1;
        match res {
            Ok(()) => {}
            // Siblings surrendering to the abort flag; the cause is already
            // (or is about to be) in first_error.
            Err(DownloadError::Aborted) => {}
            Err(e) => {
                abort.store(true, Ordering::Relaxed);
                let drained = {
                    let mut q = work.lock().unwrap();
                    let mut n = 0;
                    while q.pop_front().is_some() {
                        n += 1;
                    }
                    n
                };
                to_receive = to_receive.saturating_sub(drained);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    for handle in handles {
        if handle.join().is_err() && first_error.is_none() {
            first_error = Some(DownloadError::Io(io::Error::new(
                io::ErrorKind::Other,
                "chunk worker panicked",
            )));
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Fetches one chunk (with failover) and writes it at its offset.
fn fetch_and_write(
    client: &HttpClient,
    urls: &[String],
    plan: &ChunkPlan,
    staging: &StagingFile,
    abort: &AtomicBool,
    quiet: bool,
) -> Result<(), DownloadError> {
    let (body, source) = chunk::fetch_chunk(client, urls, plan, abort)?;
    staging.write_at(plan.offset, &body)?;
    if !quiet {
        println!("chunk {} downloaded from {}", plan.index, urls[source]);
    }
    Ok(())
}
