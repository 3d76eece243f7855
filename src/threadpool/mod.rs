use crate::utils::error::BottleError;
use crossbeam_channel::{bounded, Receiver, Sender};
use log::error;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
}

type Job = Box<dyn FnOnce() + Send + 'static>;

impl ThreadPool {
    pub fn new(size: usize) -> ThreadPool {
        assert!(size > 0);

        let (sender, receiver) = bounded(100);
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(id, receiver.clone()));
        }

        ThreadPool {
            workers,
            sender: Some(sender),
        }
    }

    pub fn execute<F>(&self, f: F) -> Result<(), BottleError>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f);
        self.sender
            .as_ref()
            .ok_or(BottleError::ThreadJoinError)?
            .send(job)
            .map_err(|_| BottleError::ThreadJoinError)
    }

    /// Waits for every queued job to finish.
    pub fn join(mut self) -> Result<(), BottleError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), BottleError> {
        // 关闭发送端，工作线程取完任务后退出
        drop(self.sender.take());

        let mut result = Ok(());
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    result = Err(BottleError::ThreadJoinError);
                }
            }
        }
        result
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!("Thread pool shutdown: {}", e);
        }
    }
}

struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, receiver: Receiver<Job>) -> Worker {
        let thread = thread::spawn(move || {
            while let Ok(job) = receiver.recv() {
                // 单个任务 panic 不应终止工作线程
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!("Worker {} recovered from a panicking job", id);
                }
            }
        });

        Worker {
            thread: Some(thread),
        }
    }
}
