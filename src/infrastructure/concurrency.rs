/// Thread pool setup for callview.
/// Only the spring layout runs on the pool.

use anyhow::Result;

/// Worker count: the requested number, or half the cores (minimum 1).
pub fn worker_count(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => std::cmp::max(1, num_cpus::get() / 2),
    }
}

/// Initialize the global rayon thread pool.
pub fn init_thread_pool(requested: Option<usize>) -> Result<()> {
    let workers = worker_count(requested);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    tracing::debug!(workers, cores = num_cpus::get(), "initialized thread pool");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count_respects_request() {
        assert_eq!(worker_count(Some(3)), 3);
    }

    #[test]
    fn test_worker_count_defaults_to_at_least_one() {
        assert!(worker_count(None) >= 1);
        assert!(worker_count(Some(0)) >= 1);
    }
}
