//! Single-worker job queue
//!
//! The render loop must never block on slow work (network scans, file
//! listings). It submits a job instead; one worker drains the queue in
//! FIFO order, running at most one job at a time.
//!
//! There is no preemption. [`JobQueue::cancel`] raises a flag that the job
//! polls through its [`CancelToken`] between its own waits; a job that
//! has not started yet when cancelled is skipped.
//!
//! # Usage
//!
//! ```ignore
//! static JOBS: JobQueue<Shared> = JobQueue::new();
//!
//! // render loop
//! let ticket = JOBS.submit(scan_networks, 0)?;
//!
//! // worker task
//! JOBS.run(&SHARED).await;
//! ```

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

/// Maximum pending submissions
pub const JOB_QUEUE_DEPTH: usize = 4;

/// Tickets that can be live at once: every queued job plus the running one
const CANCEL_SLOTS: usize = JOB_QUEUE_DEPTH + 1;

/// Marker bit distinguishing "ticket N cancelled" from an empty slot
const CANCELLED: u64 = 1 << 32;

/// A unit of work: shared state, argument and cancel token
pub type JobFn<S> = fn(&S, u32, &CancelToken<'_>);

/// Errors from submitting a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobError {
    /// All queue slots are taken
    QueueFull,
}

/// Handle to a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JobTicket(u32);

impl JobTicket {
    pub fn id(&self) -> u32 {
        self.0
    }
}

struct Job<S> {
    func: JobFn<S>,
    arg: u32,
    ticket: u32,
}

/// Cooperative cancellation flag handed to a running job
pub struct CancelToken<'q> {
    slot: &'q AtomicU64,
    ticket: u32,
}

impl CancelToken<'_> {
    /// Check if the job was asked to stop
    pub fn is_cancelled(&self) -> bool {
        self.slot.load(Ordering::Acquire) == (CANCELLED | self.ticket as u64)
    }

    pub fn ticket(&self) -> JobTicket {
        JobTicket(self.ticket)
    }
}

/// Bounded FIFO of jobs over shared state `S`
pub struct JobQueue<S> {
    jobs: Channel<CriticalSectionRawMutex, Job<S>, JOB_QUEUE_DEPTH>,
    cancelled: [AtomicU64; CANCEL_SLOTS],
    next_ticket: Mutex<CriticalSectionRawMutex, Cell<u32>>,
    busy: AtomicBool,
}

impl<S> JobQueue<S> {
    pub const fn new() -> Self {
        Self {
            jobs: Channel::new(),
            cancelled: [const { AtomicU64::new(0) }; CANCEL_SLOTS],
            next_ticket: Mutex::new(Cell::new(0)),
            busy: AtomicBool::new(false),
        }
    }

    fn slot(&self, ticket: u32) -> &AtomicU64 {
        &self.cancelled[ticket as usize % CANCEL_SLOTS]
    }

    /// Queue `func(state, arg, token)` for the worker
    ///
    /// Never waits: fails with [`JobError::QueueFull`] when every slot is
    /// taken. Callers must not resubmit work that is still in flight.
    pub fn submit(&self, func: JobFn<S>, arg: u32) -> Result<JobTicket, JobError> {
        let result = self.next_ticket.lock(|next| -> Result<JobTicket, JobError> {
            let ticket = next.get();
            self.jobs
                .try_send(Job { func, arg, ticket })
                .map_err(|_| JobError::QueueFull)?;
            self.slot(ticket).store(0, Ordering::Release);
            next.set(ticket.wrapping_add(1));
            Ok(JobTicket(ticket))
        });

        match result {
            Ok(ticket) => debug!("job {=u32} queued", ticket.0),
            Err(_) => warn!("job rejected, queue full"),
        }
        result
    }

    /// Ask job `ticket` to stop
    ///
    /// Tickets older than the queue window are ignored.
    pub fn cancel(&self, ticket: JobTicket) {
        let live = self.next_ticket.lock(|next| {
            let age = next.get().wrapping_sub(ticket.0);
            age >= 1 && age as usize <= CANCEL_SLOTS
        });
        if live {
            self.slot(ticket.0)
                .store(CANCELLED | ticket.0 as u64, Ordering::Release);
            info!("job {=u32} cancel requested", ticket.0);
        }
    }

    /// Check if job `ticket` was asked to stop
    pub fn is_cancelled(&self, ticket: JobTicket) -> bool {
        self.slot(ticket.0).load(Ordering::Acquire) == (CANCELLED | ticket.0 as u64)
    }

    /// Jobs waiting to start
    pub fn pending(&self) -> usize {
        self.jobs.len()
    }

    /// Check if a job is running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run the oldest queued job, if any
    ///
    /// Returns `false` when the queue was empty.
    pub fn run_next(&self, state: &S) -> bool {
        match self.jobs.try_receive() {
            Ok(job) => {
                self.execute(state, job);
                true
            }
            Err(_) => false,
        }
    }

    /// Worker loop: run jobs forever as they arrive
    pub async fn run(&self, state: &S) {
        loop {
            let job = self.jobs.receive().await;
            self.execute(state, job);
        }
    }

    fn execute(&self, state: &S, job: Job<S>) {
        let token = CancelToken {
            slot: self.slot(job.ticket),
            ticket: job.ticket,
        };
        if token.is_cancelled() {
            info!("job {=u32} cancelled before start", job.ticket);
            return;
        }

        self.busy.store(true, Ordering::Release);
        debug!("job {=u32} started", job.ticket);
        (job.func)(state, job.arg, &token);
        self.busy.store(false, Ordering::Release);

        if token.is_cancelled() {
            info!("job {=u32} stopped after cancel", job.ticket);
        } else {
            debug!("job {=u32} finished", job.ticket);
        }
    }
}

impl<S> Default for JobQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}
