use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use montecarlo_pi::partition::Partition;
use montecarlo_pi::scheduler::{DeferredScheduler, PoolScheduler, Scheduler, TaskHandle};
use montecarlo_pi::{
    estimate_pi, tasks, threads, EstimateError, Estimator, JoinMode, RunConfig, Strategy,
    TaskBackend,
};

const MOCK_HITS: [u64; 4] = [3, 5, 2, 4];

fn mock_kernel(partition: Partition) -> u64 {
    MOCK_HITS[partition.worker]
}

/// Counts submissions and forwards them to the deferred back-end.
#[derive(Default)]
struct CountingScheduler {
    submitted: Cell<usize>,
}

impl Scheduler for CountingScheduler {
    fn submit<F>(&self, job: F) -> TaskHandle
    where
        F: FnOnce() -> u64 + Send + 'static,
    {
        self.submitted.set(self.submitted.get() + 1);
        DeferredScheduler.submit(job)
    }
}

/// Bumps a counter when dropped, including during a panic unwind.
struct Finished(Arc<AtomicUsize>);

impl Drop for Finished {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn estimates_stay_in_range() {
    for strategy in Strategy::ALL {
        for (samples, workers, seed) in [(1, 1, None), (100, 4, Some(3)), (10_007, 7, Some(u64::MAX))] {
            let estimate = estimate_pi(strategy, samples, workers, seed).unwrap();
            assert!(
                (0.0..=4.0).contains(&estimate.value),
                "{strategy}: {} out of range",
                estimate.value
            );
        }
    }
}

#[test]
fn every_strategy_converges() {
    for strategy in Strategy::ALL {
        let estimate = estimate_pi(strategy, 10_000_000, 4, Some(2024)).unwrap();
        let error = (estimate.value - std::f64::consts::PI).abs();
        assert!(error < 0.05, "{strategy}: {} is {error} from π", estimate.value);
    }
}

#[test]
fn single_thread_is_reproducible() {
    let first = estimate_pi(Strategy::SingleThread, 500_000, 4, Some(77)).unwrap();
    let second = estimate_pi(Strategy::SingleThread, 500_000, 4, Some(77)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn partitioned_strategies_agree_for_a_seed() {
    let config = RunConfig::new(800_000, 8, Some(13));
    let base = Estimator::new(config);
    let pooled = base.with_task_backend(TaskBackend::Pool).run(Strategy::TaskBased).unwrap();
    let deferred = base
        .with_task_backend(TaskBackend::Deferred)
        .run(Strategy::TaskBased)
        .unwrap();
    let joined = base.with_join_mode(JoinMode::Join).run(Strategy::ThreadBased).unwrap();
    let detached = base
        .with_join_mode(JoinMode::Detach)
        .run(Strategy::ThreadBased)
        .unwrap();

    assert_eq!(pooled, deferred);
    assert_eq!(pooled, joined);
    assert_eq!(joined, detached);
}

#[test]
fn mocked_partitions_aggregate_exactly() {
    let config = RunConfig::new(40, 4, None);

    let pool = PoolScheduler::new(4).unwrap();
    let pooled = tasks::run(&config, &pool, mock_kernel).unwrap();
    let deferred = tasks::run(&config, &DeferredScheduler, mock_kernel).unwrap();
    let joined = threads::run(&config, JoinMode::Join, mock_kernel).unwrap();
    let detached = threads::run(&config, JoinMode::Detach, mock_kernel).unwrap();

    for estimate in [pooled, deferred, joined, detached] {
        assert_eq!(estimate.hits, 14);
        assert_eq!(estimate.samples, 40);
        assert_eq!(estimate.value, 1.4);
    }
}

#[test]
fn invalid_counts_schedule_nothing() {
    for (samples, workers) in [(0, 4), (40, 0), (0, 0)] {
        let config = RunConfig::new(samples, workers, None);

        let scheduler = CountingScheduler::default();
        let result = tasks::run(&config, &scheduler, mock_kernel);
        assert!(matches!(result, Err(EstimateError::InvalidConfiguration { .. })));
        assert_eq!(scheduler.submitted.get(), 0);

        let started = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&started);
        let result = threads::run(&config, JoinMode::Join, move |p| {
            counter.fetch_add(1, Ordering::SeqCst);
            p.iterations
        });
        assert!(matches!(result, Err(EstimateError::InvalidConfiguration { .. })));
        assert_eq!(started.load(Ordering::SeqCst), 0);

        for strategy in Strategy::ALL {
            assert!(matches!(
                estimate_pi(strategy, samples, workers, None),
                Err(EstimateError::InvalidConfiguration { .. })
            ));
        }
    }
}

#[test]
fn task_strategy_submits_every_partition_once() {
    let scheduler = CountingScheduler::default();
    let estimate = tasks::run(&RunConfig::new(40, 4, None), &scheduler, mock_kernel).unwrap();
    assert_eq!(scheduler.submitted.get(), 4);
    assert_eq!(estimate.value, 1.4);
}

#[test]
fn thread_workers_are_all_reconciled() {
    for mode in [JoinMode::Join, JoinMode::Detach] {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&finished);
        let estimate = threads::run(&RunConfig::new(4_000, 4, Some(1)), mode, move |p| {
            let _done = Finished(Arc::clone(&counter));
            montecarlo_pi::sampler::sample_partition(p)
        })
        .unwrap();
        assert!(estimate.value > 0.0);
        assert_eq!(finished.load(Ordering::SeqCst), 4, "{mode:?}");
    }
}

/// Kernel that fails on `failing` and bumps `counter` on every exit path.
fn crashing_kernel(
    counter: Arc<AtomicUsize>,
    failing: usize,
) -> impl Fn(Partition) -> u64 + Clone + Send + 'static {
    move |p| {
        let _done = Finished(Arc::clone(&counter));
        if p.worker == failing {
            panic!("worker {} crashed", p.worker);
        }
        p.iterations
    }
}

#[test]
fn failed_thread_run_still_reconciles_workers() {
    for (mode, failing) in [
        (JoinMode::Join, 1),
        (JoinMode::Detach, 0),
        (JoinMode::Detach, 3),
    ] {
        let finished = Arc::new(AtomicUsize::new(0));
        let kernel = crashing_kernel(Arc::clone(&finished), failing);
        let result = threads::run(&RunConfig::new(40, 4, None), mode, kernel);

        match result {
            Err(EstimateError::UnresolvedWorker { worker, .. }) => assert_eq!(worker, failing),
            other => panic!("{mode:?}: expected an unresolved worker, got {other:?}"),
        }
        assert_eq!(finished.load(Ordering::SeqCst), 4, "{mode:?}");
    }
}

#[test]
fn failed_pool_run_still_reconciles_tasks() {
    let finished = Arc::new(AtomicUsize::new(0));
    let pool = PoolScheduler::new(4).unwrap();
    let kernel = crashing_kernel(Arc::clone(&finished), 0);
    let result = tasks::run(&RunConfig::new(40, 4, None), &pool, kernel);

    assert!(matches!(
        result,
        Err(EstimateError::UnresolvedWorker { worker: 0, .. })
    ));
    assert_eq!(finished.load(Ordering::SeqCst), 4);
}
