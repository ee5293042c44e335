//! Purchase transactions against a real PostgreSQL database.

mod common;

use common::{new_pet, setup};
use pawstore_core::{PurchaseFailure, ValidationError};
use pawstore_db::DbError;
use uuid::Uuid;

#[tokio::test]
async fn test_available_and_sold_in_one_cart() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();
    let engine = ctx.db.purchases();
    let early_bird = ctx.customer("early").await;
    let buyer = ctx.customer("buyer").await;

    let a = pets
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();
    let b = pets
        .create(ctx.store.id, &new_pet("Barkley", "DOG", "tom@example.com"))
        .await
        .unwrap();

    engine
        .purchase(ctx.store.id, early_bird, &[b.id.to_string()])
        .await
        .unwrap();

    let outcome = engine
        .purchase(ctx.store.id, buyer, &[a.id.to_string(), b.id.to_string()])
        .await
        .unwrap();

    assert_eq!(outcome.purchased_ids, vec![a.id]);
    assert_eq!(
        outcome.errors,
        vec![PurchaseFailure {
            pet_ref: "Barkley".to_string(),
            message: "already purchased".to_string(),
        }]
    );

    let history = pets.list_purchased_by(ctx.store.id, buyer).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, a.id);
    assert_eq!(history[0].purchased_by_customer_id, Some(buyer));
    assert!(history[0].purchased_at.is_some());
    assert_eq!(history[0].breeder_email, "jane@example.com");

    assert!(pets.list_available(ctx.store.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_pet_is_not_found() {
    let Some(ctx) = setup().await else { return };
    let buyer = ctx.customer("buyer").await;
    let z = Uuid::new_v4();

    let outcome = ctx
        .db
        .purchases()
        .purchase(ctx.store.id, buyer, &[z.to_string()])
        .await
        .unwrap();

    assert!(outcome.purchased_ids.is_empty());
    assert_eq!(
        outcome.errors,
        vec![PurchaseFailure {
            pet_ref: z.to_string(),
            message: "not found".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_pet_of_another_store_is_not_found() {
    let Some(ctx) = setup().await else { return };
    let other = ctx.other_store().await;
    let buyer = ctx.customer("buyer").await;

    let foreign = ctx
        .pets()
        .create(other.id, &new_pet("Sprout", "FROG", "lena@example.com"))
        .await
        .unwrap();

    let outcome = ctx
        .db
        .purchases()
        .purchase(ctx.store.id, buyer, &[foreign.id.to_string()])
        .await
        .unwrap();

    assert!(outcome.purchased_ids.is_empty());
    assert_eq!(outcome.errors[0].message, "not found");
    assert_eq!(ctx.pets().list_available(other.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_cart_is_rejected_without_changes() {
    let Some(ctx) = setup().await else { return };
    let buyer = ctx.customer("buyer").await;
    let pets = ctx.pets();

    pets.create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();

    let empty: [String; 0] = [];
    let err = ctx
        .db
        .purchases()
        .purchase(ctx.store.id, buyer, &empty)
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::Validation(ValidationError::EmptyCart)));
    assert_eq!(pets.list_available(ctx.store.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_purchases_sell_once() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();
    let alice = ctx.customer("alice").await;
    let bob = ctx.customer("bob").await;

    let x = pets
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();
    let cart = [x.id.to_string()];

    let engine_a = ctx.db.purchases();
    let engine_b = ctx.db.purchases();
    let store_id = ctx.store.id;

    let (first, second) = tokio::join!(
        engine_a.purchase(store_id, alice, &cart),
        engine_b.purchase(store_id, bob, &cart),
    );
    let outcomes = [first.unwrap(), second.unwrap()];

    let winners = outcomes
        .iter()
        .filter(|o| o.purchased_ids == vec![x.id])
        .count();
    let losers = outcomes
        .iter()
        .filter(|o| o.purchased_ids.is_empty() && o.errors.len() == 1 && o.errors[0].message == "already purchased")
        .count();
    assert_eq!(winners, 1);
    assert_eq!(losers, 1);

    let bought_by_alice = pets.list_purchased_by(store_id, alice).await.unwrap();
    let bought_by_bob = pets.list_purchased_by(store_id, bob).await.unwrap();
    assert_eq!(bought_by_alice.len() + bought_by_bob.len(), 1);
}

#[tokio::test]
async fn test_duplicate_and_malformed_ids() {
    let Some(ctx) = setup().await else { return };
    let buyer = ctx.customer("buyer").await;

    let x = ctx
        .pets()
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();

    let cart = [x.id.to_string(), x.id.to_string(), "bogus".to_string()];
    let outcome = ctx
        .db
        .purchases()
        .purchase(ctx.store.id, buyer, &cart)
        .await
        .unwrap();

    assert_eq!(outcome.purchased_ids, vec![x.id]);
    assert_eq!(
        outcome.errors,
        vec![PurchaseFailure {
            pet_ref: "bogus".to_string(),
            message: "not found".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_failure_inside_transaction_rolls_back() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();

    let pet = pets
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();

    // No such customer: the UPDATE trips the buyer foreign key
    let err = ctx
        .db
        .purchases()
        .purchase(ctx.store.id, i64::MAX, &[pet.id.to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::TransactionFailed(_)), "got {err:?}");
    assert!(err.is_retryable());

    let available = pets.list_available(ctx.store.id).await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, pet.id);
}
