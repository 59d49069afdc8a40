use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use sqlite_graphql_config::Config;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BudgetExceeded {
    #[error("Time limit exceeded: {elapsed_ms:.2}ms > {limit_ms}ms - {path}")]
    Time { elapsed_ms: f64, limit_ms: u64, path: String },
    #[error("Query limit exceeded: {count} > {limit} - {path}")]
    Queries { count: u64, limit: u64, path: String },
}

/// The limits of one request. `None` disables a check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionLimits {
    pub time_limit: Option<Duration>,
    pub query_limit: Option<u64>,
}

impl ExecutionLimits {
    /// Zero in the configuration disables the check.
    pub fn from_config(config: &Config) -> Self {
        Self {
            time_limit: (config.time_limit_ms > 0).then(|| Duration::from_millis(config.time_limit_ms)),
            query_limit: (config.num_queries_limit > 0).then_some(config.num_queries_limit),
        }
    }
}

/// Elapsed time and table fetches of one request, shared by every resolver of
/// the request.
#[derive(Debug)]
pub struct ExecutionBudget {
    started: Instant,
    limits: ExecutionLimits,
    queries: AtomicU64,
}

impl ExecutionBudget {
    pub fn new(limits: ExecutionLimits) -> Self {
        Self {
            started: Instant::now(),
            limits,
            queries: AtomicU64::new(0),
        }
    }

    /// Called before every table fetch. Fails if the request ran out of time, or
    /// if this fetch would go over the query limit. The path names the fetch in
    /// the error.
    pub fn check(&self, path: &str) -> Result<(), BudgetExceeded> {
        let elapsed = self.started.elapsed();

        if let Some(limit) = self.limits.time_limit {
            if elapsed > limit {
                return Err(BudgetExceeded::Time {
                    elapsed_ms: elapsed.as_secs_f64() * 1000.0,
                    limit_ms: limit.as_millis() as u64,
                    path: path.to_string(),
                });
            }
        }

        let count = self.queries.fetch_add(1, Ordering::Relaxed) + 1;

        match self.limits.query_limit {
            Some(limit) if count > limit => Err(BudgetExceeded::Queries {
                count,
                limit,
                path: path.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Table fetches so far.
    pub fn queries_executed(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}
