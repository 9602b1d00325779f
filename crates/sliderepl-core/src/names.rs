//! Process-wide source of unique artifact names.
//!
//! A single producer thread feeds an ever-increasing sequence into a
//! one-slot channel. Every caller of [`UniqueNames::next_id`] takes exactly one
//! value off that channel, so no two callers can observe the same number
//! and no lock is involved.

use std::thread;

use async_channel::{Receiver, bounded};

use crate::error::{Error, Result};

/// Handle to the unique number producer.
///
/// Cloning is cheap; all clones draw from the same sequence. The producer
/// thread stops once the last handle is dropped.
#[derive(Clone)]
pub struct UniqueNames {
    rx: Receiver<u64>,
}

impl UniqueNames {
    /// Start the producer thread.
    pub fn start() -> Result<Self> {
        let (tx, rx) = bounded(1);

        thread::Builder::new()
            .name("unique-names".to_string())
            .spawn(move || {
                for value in 0u64.. {
                    if tx.send_blocking(value).is_err() {
                        break;
                    }
                }
                tracing::debug!("Unique name producer stopped");
            })?;

        Ok(Self { rx })
    }

    /// Take the next number, blocking until the producer hands it over.
    pub fn next_id(&self) -> Result<u64> {
        self.rx.recv_blocking().map_err(|_| Error::NameSourceClosed)
    }
}
