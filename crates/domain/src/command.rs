//! Command execution with optimistic concurrency control.
//!
//! Every command follows the same cycle: load the current wishlist, apply the
//! mutation in memory, then write it back conditionally on the version that
//! was loaded. A write that loses the race is retried from a fresh load, with
//! exponential backoff, up to the bound set by [`RetryPolicy`].

use std::time::Duration;

use common::CustomerId;
use document_store::{DocumentStore, Version};
use rand::Rng;

use crate::error::DomainError;
use crate::repository::WishlistRepository;
use crate::wishlist::{Wishlist, WishlistChange, WishlistError};

/// Retry behavior for conflicting saves.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Upper bound for any single delay.
    pub max_delay: Duration,

    /// Growth factor applied per retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(250),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that surfaces the first conflict to the caller.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Backoff ceiling before the given retry (1-based), without jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(32) as i32;
        let scaled = self.base_delay.as_nanos() as f64 * self.backoff_multiplier.powi(exponent);
        let cap = self.max_delay.as_nanos() as f64;
        if !scaled.is_finite() || scaled >= cap {
            return self.max_delay;
        }
        Duration::from_nanos(scaled as u64)
    }

    /// Delay before the given retry with jitter, between half of
    /// [`delay_for`](Self::delay_for) and the full value.
    pub fn backoff(&self, retry: u32) -> Duration {
        let ceiling = self.delay_for(retry).as_micros() as u64;
        let jittered = rand::thread_rng().gen_range(ceiling / 2..=ceiling);
        Duration::from_micros(jittered)
    }
}

/// How a command treats a customer without a stored wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Start from an empty wishlist. The first successful save creates it.
    CreateIfMissing,
    /// Fail with [`DomainError::WishlistNotFound`].
    RequireExisting,
}

/// Progress of a single save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// The wishlist was read at this version.
    Loaded(Version),
    /// A conditional write is in flight.
    Attempting { expected: Version },
    /// The write landed at this version.
    Committed(Version),
    /// Another writer got there first.
    Conflicted { expected: Version },
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// The wishlist after the command.
    pub wishlist: Wishlist,

    /// Version of the wishlist after the command. Unchanged when nothing was
    /// written.
    pub version: Version,

    /// Number of save attempts, including the first.
    pub attempts: u32,

    /// True if the command changed and persisted the wishlist.
    pub changed: bool,
}

/// Handler for executing mutations against wishlists.
pub struct CommandHandler<S: DocumentStore> {
    repository: WishlistRepository<S>,
    policy: RetryPolicy,
}

impl<S: DocumentStore> CommandHandler<S> {
    pub fn new(repository: WishlistRepository<S>, policy: RetryPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn repository(&self) -> &WishlistRepository<S> {
        &self.repository
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Loads the customer's wishlist, if one exists.
    pub async fn load(&self, customer_id: &CustomerId) -> Result<Option<Wishlist>, DomainError> {
        self.repository.load_by_owner(customer_id).await
    }

    /// Applies `mutate` to the customer's wishlist and saves the result.
    ///
    /// The mutation runs once per attempt against freshly loaded state, so it
    /// must not carry side effects between calls. A mutation that records no
    /// change skips the write. Only version conflicts are retried; invariant
    /// and storage failures return immediately.
    pub async fn execute<F>(
        &self,
        customer_id: &CustomerId,
        mode: LoadMode,
        mut mutate: F,
    ) -> Result<CommandResult, DomainError>
    where
        F: FnMut(&mut Wishlist) -> Result<(), WishlistError> + Send,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let mut wishlist = match self.repository.load_by_owner(customer_id).await? {
                Some(wishlist) => wishlist,
                None if mode == LoadMode::CreateIfMissing => {
                    Wishlist::new(customer_id.clone()).with_max_items(self.repository.max_items())
                }
                None => {
                    return Err(DomainError::WishlistNotFound {
                        customer_id: customer_id.clone(),
                    });
                }
            };
            let expected = wishlist.version();
            trace_state(customer_id, AttemptState::Loaded(expected));

            mutate(&mut wishlist)?;

            if !wishlist.is_dirty() {
                return Ok(CommandResult {
                    wishlist,
                    version: expected,
                    attempts,
                    changed: false,
                });
            }

            trace_state(customer_id, AttemptState::Attempting { expected });
            tracing::debug!(
                customer_id = %customer_id,
                expected = %expected,
                changes = ?wishlist
                    .pending_changes()
                    .iter()
                    .map(WishlistChange::change_type)
                    .collect::<Vec<_>>(),
                "Saving wishlist"
            );

            match self.repository.save(&mut wishlist, expected).await {
                Ok(version) => {
                    trace_state(customer_id, AttemptState::Committed(version));
                    return Ok(CommandResult {
                        wishlist,
                        version,
                        attempts,
                        changed: true,
                    });
                }
                Err(DomainError::VersionConflict {
                    wishlist_id,
                    expected,
                    actual,
                }) => {
                    trace_state(customer_id, AttemptState::Conflicted { expected });

                    if self.policy.max_retries == 0 {
                        return Err(DomainError::VersionConflict {
                            wishlist_id,
                            expected,
                            actual,
                        });
                    }
                    if attempts > self.policy.max_retries {
                        tracing::warn!(
                            customer_id = %customer_id,
                            wishlist_id = %wishlist_id,
                            attempts,
                            "Giving up after repeated version conflicts"
                        );
                        return Err(DomainError::ConcurrencyExhausted {
                            wishlist_id,
                            attempts,
                        });
                    }

                    let delay = self.policy.backoff(attempts);
                    tracing::debug!(
                        customer_id = %customer_id,
                        retry = attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Version conflict, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn trace_state(customer_id: &CustomerId, state: AttemptState) {
    tracing::trace!(customer_id = %customer_id, state = ?state, "Save attempt");
}
