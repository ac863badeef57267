//! Wishlist commands.

use meridian_core::{CollectionId, ProductId, WishlistItemId};
use meridian_storefront::api::{AddWishlistItemRequest, CatalogApi, UserApi, WishlistApi};
use meridian_storefront::config::StorefrontConfig;
use meridian_storefront::stores::{AuthStore, WishlistStore};

use super::{CliError, load_session};

/// Show every collection and its saved items.
#[allow(clippy::print_stdout)]
pub async fn list() -> Result<(), CliError> {
    let (_, store) = open()?;
    if !store.refresh().await {
        return Err(CliError::Message("could not load the wishlist".into()));
    }

    let collections = store.current();
    if collections.is_empty() {
        println!("no collections yet");
        return Ok(());
    }
    for collection in &collections {
        println!(
            "{} (#{}, {} items)",
            collection.name,
            collection.id,
            collection.items.len()
        );
        for item in &collection.items {
            println!(
                "  {:>6}  {:<40} {:>10}",
                item.id, item.product_name, item.price
            );
        }
    }
    Ok(())
}

/// Create a new collection.
#[allow(clippy::print_stdout)]
pub async fn create(name: &str) -> Result<(), CliError> {
    let (_, store) = open()?;
    if store.create_collection(name).await {
        println!("created collection {name}");
        Ok(())
    } else {
        Err(CliError::Message("could not create the collection".into()))
    }
}

/// Delete a collection and everything in it.
#[allow(clippy::print_stdout)]
pub async fn delete(collection: CollectionId) -> Result<(), CliError> {
    let (_, store) = open()?;
    if store.delete_collection(collection).await {
        println!("collection deleted");
        Ok(())
    } else {
        Err(CliError::Message("could not delete the collection".into()))
    }
}

/// Save a product into a collection.
#[allow(clippy::print_stdout)]
pub async fn add(collection: CollectionId, product_id: ProductId) -> Result<(), CliError> {
    let (config, store) = open()?;
    let product = CatalogApi::new(&config)?.get(product_id).await?;

    let request = AddWishlistItemRequest {
        product_id: product.id,
        product_name: product.name.clone(),
        price: product.price,
        category: Some(product.category.clone()),
        image_url: (!product.image_url.is_empty()).then(|| product.image_url.clone()),
    };
    if store.add_item(collection, &request).await {
        println!("saved {}", product.name);
        Ok(())
    } else {
        Err(CliError::Message("could not save the product".into()))
    }
}

/// Remove a saved item from a collection.
#[allow(clippy::print_stdout)]
pub async fn remove(collection: CollectionId, item: WishlistItemId) -> Result<(), CliError> {
    let (_, store) = open()?;
    if store.remove_item(collection, item).await {
        println!("item removed");
        Ok(())
    } else {
        Err(CliError::Message("could not remove the item".into()))
    }
}

/// Show the aggregate counts.
#[allow(clippy::print_stdout)]
pub async fn stats() -> Result<(), CliError> {
    let (_, store) = open()?;
    let Some(stats) = store.stats().await else {
        return Err(CliError::Message("could not load wishlist stats".into()));
    };
    println!("collections: {}", stats.total_collections);
    println!("items:       {}", stats.total_items);
    Ok(())
}

fn open() -> Result<(StorefrontConfig, WishlistStore), CliError> {
    let (config, session) = load_session()?;
    let auth = AuthStore::new(UserApi::new(&config)?, session);
    if !auth.is_logged_in() {
        return Err(CliError::NotLoggedIn);
    }
    let store = WishlistStore::new(WishlistApi::new(&config)?, auth.subscribe());
    Ok((config, store))
}
