use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of CPU-bound worker threads behind a shared job channel. Every
/// search runs on one worker from start to finish, so page-fault stalls on
/// cold storage never block the threads answering trivial endpoints.
pub struct SearchPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl SearchPool {
    pub(crate) fn new(size: usize) -> std::io::Result<Self> {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(size);

        for index in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("search-worker-{index}"))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    pub(crate) fn execute(&self, job: Job) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(job);
        }
    }
}

impl Drop for SearchPool {
    fn drop(&mut self) {
        // Closing the channel lets every worker drain and exit.
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
