//! Wishlist service providing the request-level API.

use std::time::Instant;

use document_store::DocumentStore;

use crate::command::{CommandHandler, CommandResult, LoadMode, RetryPolicy};
use crate::error::DomainError;
use crate::repository::WishlistRepository;
use crate::validation::{validate_customer_id, validate_note, validate_product_id};

use super::{
    AddItem, ClearWishlist, DEFAULT_MAX_ITEMS, Item, RemoveItem, ReorderItems, SetItemQuantity,
    Wishlist, WishlistError,
};

/// Tunables for [`WishlistService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Capacity of every wishlist.
    pub max_items: usize,

    /// Retry behavior for conflicting saves.
    pub retry: RetryPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            retry: RetryPolicy::default(),
        }
    }
}

/// Service for managing wishlists.
///
/// Validates raw command input, runs the mutation through the
/// [`CommandHandler`] and records one log event plus metrics per call.
pub struct WishlistService<S: DocumentStore> {
    handler: CommandHandler<S>,
}

impl<S: DocumentStore> WishlistService<S> {
    /// Creates a new wishlist service on top of the given store.
    pub fn new(store: S, config: ServiceConfig) -> Self {
        let repository = WishlistRepository::new(store).with_max_items(config.max_items);
        Self {
            handler: CommandHandler::new(repository, config.retry),
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S> {
        &self.handler
    }

    /// Loads a customer's wishlist.
    ///
    /// A customer without a stored wishlist gets an empty, unpersisted one.
    #[tracing::instrument(skip(self))]
    pub async fn get_wishlist(&self, customer_id: &str) -> Result<Wishlist, DomainError> {
        let started = Instant::now();
        let result = self.load_or_empty(customer_id).await;
        observe("get_wishlist", started, query_outcome(&result));
        result
    }

    /// Looks up a single product in a customer's wishlist.
    #[tracing::instrument(skip(self))]
    pub async fn find_item(&self, customer_id: &str, product_id: &str) -> Result<Item, DomainError> {
        let started = Instant::now();
        let result = self.lookup_item(customer_id, product_id).await;
        observe("find_item", started, query_outcome(&result));
        result
    }

    /// Adds a product to a customer's wishlist, creating the wishlist on
    /// first use.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(&self, cmd: AddItem) -> Result<CommandResult, DomainError> {
        let started = Instant::now();
        let result = self.run_add_item(cmd).await;
        observe("add_item", started, command_outcome(&result));
        result
    }

    /// Removes a product from a customer's wishlist.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, cmd: RemoveItem) -> Result<CommandResult, DomainError> {
        let started = Instant::now();
        let result = self.run_remove_item(cmd).await;
        observe("remove_item", started, command_outcome(&result));
        result
    }

    /// Replaces the display order of a customer's wishlist.
    #[tracing::instrument(skip(self))]
    pub async fn reorder_items(&self, cmd: ReorderItems) -> Result<CommandResult, DomainError> {
        let started = Instant::now();
        let result = self.run_reorder_items(cmd).await;
        observe("reorder_items", started, command_outcome(&result));
        result
    }

    /// Changes the quantity of a product in a customer's wishlist.
    #[tracing::instrument(skip(self))]
    pub async fn set_item_quantity(
        &self,
        cmd: SetItemQuantity,
    ) -> Result<CommandResult, DomainError> {
        let started = Instant::now();
        let result = self.run_set_item_quantity(cmd).await;
        observe("set_item_quantity", started, command_outcome(&result));
        result
    }

    /// Removes every product from a customer's wishlist.
    #[tracing::instrument(skip(self))]
    pub async fn clear_wishlist(&self, cmd: ClearWishlist) -> Result<CommandResult, DomainError> {
        let started = Instant::now();
        let result = self.run_clear_wishlist(cmd).await;
        observe("clear_wishlist", started, command_outcome(&result));
        result
    }

    async fn load_or_empty(&self, customer_id: &str) -> Result<Wishlist, DomainError> {
        let customer_id = validate_customer_id(customer_id)?;
        match self.handler.load(&customer_id).await? {
            Some(wishlist) => Ok(wishlist),
            None => Ok(Wishlist::new(customer_id)
                .with_max_items(self.handler.repository().max_items())),
        }
    }

    async fn lookup_item(&self, customer_id: &str, product_id: &str) -> Result<Item, DomainError> {
        let customer_id = validate_customer_id(customer_id)?;
        let product_id = validate_product_id(product_id)?;

        self.handler
            .load(&customer_id)
            .await?
            .and_then(|wishlist| wishlist.get_item(&product_id).cloned())
            .ok_or_else(|| WishlistError::ItemNotFound { product_id }.into())
    }

    async fn run_add_item(&self, cmd: AddItem) -> Result<CommandResult, DomainError> {
        let customer_id = validate_customer_id(&cmd.customer_id)?;
        let product_id = validate_product_id(&cmd.product_id)?;
        let note = validate_note(cmd.note)?;
        let quantity = cmd.quantity;
        let idempotent = cmd.idempotent;

        self.handler
            .execute(&customer_id, LoadMode::CreateIfMissing, |wishlist| {
                match wishlist.add_item(product_id.clone(), quantity, note.clone()) {
                    Err(WishlistError::DuplicateItem { .. }) if idempotent => Ok(()),
                    other => other,
                }
            })
            .await
    }

    async fn run_remove_item(&self, cmd: RemoveItem) -> Result<CommandResult, DomainError> {
        let customer_id = validate_customer_id(&cmd.customer_id)?;
        let product_id = validate_product_id(&cmd.product_id)?;

        self.handler
            .execute(&customer_id, LoadMode::RequireExisting, |wishlist| {
                wishlist.remove_item(&product_id).map(|_| ())
            })
            .await
    }

    async fn run_reorder_items(&self, cmd: ReorderItems) -> Result<CommandResult, DomainError> {
        let customer_id = validate_customer_id(&cmd.customer_id)?;
        let order = cmd
            .product_ids
            .iter()
            .map(|id| validate_product_id(id))
            .collect::<Result<Vec<_>, _>>()?;

        self.handler
            .execute(&customer_id, LoadMode::RequireExisting, |wishlist| {
                wishlist.reorder(&order)
            })
            .await
    }

    async fn run_set_item_quantity(
        &self,
        cmd: SetItemQuantity,
    ) -> Result<CommandResult, DomainError> {
        let customer_id = validate_customer_id(&cmd.customer_id)?;
        let product_id = validate_product_id(&cmd.product_id)?;
        let quantity = cmd.quantity;

        self.handler
            .execute(&customer_id, LoadMode::RequireExisting, |wishlist| {
                wishlist.set_quantity(&product_id, quantity)
            })
            .await
    }

    async fn run_clear_wishlist(&self, cmd: ClearWishlist) -> Result<CommandResult, DomainError> {
        let customer_id = validate_customer_id(&cmd.customer_id)?;

        self.handler
            .execute(&customer_id, LoadMode::RequireExisting, |wishlist| {
                wishlist.clear();
                Ok(())
            })
            .await
    }
}

fn command_outcome(result: &Result<CommandResult, DomainError>) -> &'static str {
    match result {
        Ok(result) if result.changed => "success",
        Ok(_) => "unchanged",
        Err(e) => e.kind().as_str(),
    }
}

fn query_outcome<T>(result: &Result<T, DomainError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    }
}

fn observe(command: &'static str, started: Instant, outcome: &'static str) {
    let elapsed = started.elapsed();

    metrics::counter!("wishlist_commands_total", "command" => command, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("wishlist_command_duration_seconds", "command" => command)
        .record(elapsed.as_secs_f64());

    tracing::info!(
        command,
        outcome,
        latency_ms = elapsed.as_secs_f64() * 1000.0,
        "Command completed"
    );
}
