//! The incremental escape-time engine (spec.md §4.3): advances only points
//! that have not yet escaped, partitions work across the worker pool by
//! striping the live list, and compacts the list so work per frame shrinks
//! monotonically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::functions::FunctionVariant;
use crate::plane::CoordinatePlane;
use crate::point::Point;
use crate::pool::Pool;

/// A raw pointer wrapper asserting that the pointed-to memory outlives the
/// worker-pool job that captures it, and that each job only touches the
/// disjoint stripe it was assigned. Safety is established by `iterate()`
/// always calling `pool.wait()` before the borrow of `plane` it came from
/// goes out of scope.
#[derive(Clone, Copy)]
struct RawPtr<T>(*mut T);
unsafe impl<T> Send for RawPtr<T> {}

/// Outcome of one worker's stripe.
struct StripeResult {
    local_escaped: usize,
    written: usize,
}

/// Parameters shared by every stripe in a single `iterate()` batch.
#[derive(Clone, Copy)]
struct BatchContext {
    w: usize,
    steps: u64,
    iteration_count: u64,
    function: FunctionVariant,
    all_points: RawPtr<Point>,
    live: RawPtr<usize>,
    live_len: usize,
    scratch: RawPtr<usize>,
    per_thread_cap: usize,
}

/// Runs stripe `t` of `batch.w`: advances every live point at index `t,
/// t+w, t+2w, ...` by up to `steps` iterations, writing still-alive indices
/// into this thread's slice of `scratch`.
///
/// # Safety
/// `batch.all_points` must point to a valid, fully allocated `Point` array;
/// `batch.live` must point to `batch.live_len` valid indices into it;
/// `batch.scratch` must point to at least `batch.per_thread_cap` writable
/// `usize` slots starting at offset `t * batch.per_thread_cap`. The caller
/// must guarantee no other thread is concurrently live for an overlapping
/// stripe or scratch range.
unsafe fn run_stripe(t: usize, batch: BatchContext) -> StripeResult {
    let BatchContext {
        w,
        steps,
        iteration_count,
        function,
        all_points,
        live,
        live_len,
        scratch,
        per_thread_cap,
    } = batch;
    let live_slice: &[usize] = unsafe { std::slice::from_raw_parts(live.0, live_len) };
    let scratch_out: &mut [usize] =
        unsafe { std::slice::from_raw_parts_mut(scratch.0.add(t * per_thread_cap), per_thread_cap) };

    let mut local_escaped = 0usize;
    let mut written = 0usize;
    let mut j = t;
    while j < live_len {
        let point_idx = live_slice[j];
        // Safety: striped indices are disjoint across threads, so no other
        // thread holds a reference to this point for the duration of this batch.
        let point: &mut Point = unsafe { &mut *all_points.0.add(point_idx) };
        for i in 0..steps {
            if point.escaped != 0 {
                break;
            }
            if function.escape_predicate(point.z) {
                point.escaped = iteration_count + i + 1;
                break;
            }
            function.step(point);
        }
        if point.escaped != 0 {
            local_escaped += 1;
        } else {
            scratch_out[written] = point_idx;
            written += 1;
        }
        j += w;
    }
    StripeResult { local_escaped, written }
}

/// Owns the worker pool shared by the iteration engine and the colouring
/// pass. Grow-only: per spec.md §9 Open Questions, shrinking the desired
/// thread count never shrinks the underlying OS-thread pool; only a later
/// increase beyond the pool's current size grows it.
pub struct Engine {
    pool: Pool,
}

impl Engine {
    pub fn new(initial_threads: u32) -> Result<Engine, Error> {
        Ok(Engine {
            pool: Pool::new(initial_threads)?,
        })
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    fn ensure_capacity(&mut self, desired: u32) -> Result<(), Error> {
        if (desired as usize) > self.pool.size() {
            tracing::debug!(from = self.pool.size(), to = desired, "growing worker pool");
            self.pool = Pool::new(desired)?;
        }
        Ok(())
    }

    /// Advances `requested_steps` iterations on `plane`'s live list. Returns
    /// the number of points that newly escaped in this batch.
    pub fn iterate(&mut self, plane: &mut CoordinatePlane, requested_steps: u64) -> Result<usize, Error> {
        let steps = if plane.halt_after > 0 {
            requested_steps.min(plane.halt_after.saturating_sub(plane.iteration_count))
        } else {
            requested_steps
        };
        if steps == 0 || plane.live.is_empty() {
            return Ok(0);
        }

        self.ensure_capacity(plane.num_threads)?;
        let w = (plane.num_threads.max(1) as usize).min(plane.live.len().max(1));
        let live_len = plane.live.len();
        let iteration_count = plane.iteration_count;
        let function = FunctionVariant::from_index(plane.function_index);

        let per_thread_cap = live_len / w + 1;
        let needed = per_thread_cap * w;
        if plane.scratch.len() < needed {
            plane.scratch.resize(needed, 0);
        }

        let batch = BatchContext {
            w,
            steps,
            iteration_count,
            function,
            all_points: RawPtr(plane.all_points.as_mut_ptr()),
            live: RawPtr(plane.live.as_mut_ptr()),
            live_len,
            scratch: RawPtr(plane.scratch.as_mut_ptr()),
            per_thread_cap,
        };

        let results: Arc<Vec<Mutex<Option<StripeResult>>>> =
            Arc::new((0..w).map(|_| Mutex::new(None)).collect());
        let done_flags: Vec<Arc<AtomicBool>> = (0..w).map(|_| Arc::new(AtomicBool::new(false))).collect();

        if w < 2 {
            let result = unsafe { run_stripe(0, batch) };
            *results[0].lock().unwrap() = Some(result);
            done_flags[0].store(true, Ordering::Release);
        } else {
            for t in 0..w {
                let results = results.clone();
                let done = done_flags[t].clone();
                self.pool.add(move || {
                    let result = unsafe { run_stripe(t, batch) };
                    *results[t].lock().unwrap() = Some(result);
                    done.store(true, Ordering::Release);
                })?;
            }
            self.pool.wait()?;
            // Defensive re-check: belt-and-braces alongside pool.wait().
            for flag in &done_flags {
                while !flag.load(Ordering::Acquire) {
                    std::hint::spin_loop();
                }
            }
        }

        let mut new_live = Vec::with_capacity(live_len);
        let mut newly_escaped = 0usize;
        for (t, slot) in results.iter().enumerate() {
            let result = slot.lock().unwrap().take().expect("stripe result missing after wait()");
            newly_escaped += result.local_escaped;
            let start = t * per_thread_cap;
            let scratch_slice = unsafe { std::slice::from_raw_parts(batch.scratch.0.add(start), result.written) };
            new_live.extend_from_slice(scratch_slice);
        }

        plane.escaped += newly_escaped;
        let shrank = new_live.len() != live_len;
        plane.live = new_live;
        plane.iteration_count += steps;
        if shrank {
            plane.unchanged = 0;
        } else {
            plane.unchanged += steps;
        }
        tracing::debug!(steps, live_len = plane.live.len(), newly_escaped, "iterate batch");
        Ok(newly_escaped)
    }
}
