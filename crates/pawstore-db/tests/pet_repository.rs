//! Pet repository against a real PostgreSQL database.

mod common;

use common::{new_pet, setup};
use pawstore_core::{Pet, Species, ValidationError};
use pawstore_db::DbError;
use uuid::Uuid;

#[tokio::test]
async fn test_create_then_list_returns_plaintext_email() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();

    let created = pets
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();
    assert_eq!(created.species, Species::Cat);
    assert!(created.is_available());

    let all = pets.list_all(ctx.store.id).await.unwrap();
    let available = pets.list_available(ctx.store.id).await.unwrap();

    for list in [&all, &available] {
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, created.id);
        assert_eq!(list[0].breeder_email, "jane@example.com");
    }
}

#[tokio::test]
async fn test_ciphertext_at_rest_differs_per_row() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();

    for name in ["Miso", "Biscuit"] {
        pets.create(ctx.store.id, &new_pet(name, "CAT", "jane@example.com"))
            .await
            .unwrap();
    }

    let rows: Vec<(Vec<u8>, Vec<u8>)> = sqlx::query_as(
        "SELECT breeder_email_enc, breeder_email_nonce FROM pets WHERE store_id = $1",
    )
    .bind(ctx.store.id)
    .fetch_all(ctx.db.pool())
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    for (ciphertext, nonce) in &rows {
        assert_ne!(ciphertext.as_slice(), b"jane@example.com".as_slice());
        assert_eq!(nonce.len(), 12);
    }
    assert_ne!(rows[0].0, rows[1].0);
    assert_ne!(rows[0].1, rows[1].1);
}

#[tokio::test]
async fn test_invalid_pet_writes_nothing() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();

    let mut input = new_pet("Nibbles", "HAMSTER", "jane@example.com");
    let err = pets.create(ctx.store.id, &input).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::NotAllowed { .. })
    ));

    input.species = "DOG".to_string();
    input.breeder_email = "not-an-email".to_string();
    let err = pets.create(ctx.store.id, &input).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::InvalidFormat { .. })
    ));

    assert_eq!(pets.count(ctx.store.id).await.unwrap(), 0);
}

fn ids(pets: &[Pet]) -> Vec<Uuid> {
    pets.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn test_whitespace_only_fields_are_rejected() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();

    let input = new_pet("   ", "CAT", "jane@example.com");
    let err = pets.create(ctx.store.id, &input).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::Required { ref field }) if field == "name"
    ));

    let mut input = new_pet("Miso", "CAT", "jane@example.com");
    input.breeder_name = "\t \n".to_string();
    let err = pets.create(ctx.store.id, &input).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::Required { ref field }) if field == "breeder_name"
    ));

    assert_eq!(pets.count(ctx.store.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_all_is_newest_first() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();

    let oldest = pets
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();
    let newest = pets
        .create(ctx.store.id, &new_pet("Sprout", "FROG", "lena@example.com"))
        .await
        .unwrap();
    let middle = pets
        .create(ctx.store.id, &new_pet("Barkley", "DOG", "tom@example.com"))
        .await
        .unwrap();

    ctx.backdate("created_at", oldest.id, 30).await;
    ctx.backdate("created_at", middle.id, 20).await;
    ctx.backdate("created_at", newest.id, 10).await;

    let all = pets.list_all(ctx.store.id).await.unwrap();
    assert_eq!(ids(&all), vec![newest.id, middle.id, oldest.id]);
}

#[tokio::test]
async fn test_list_available_is_newest_first_and_skips_sold() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();
    let buyer = ctx.customer("buyer").await;

    let oldest = pets
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();
    let sold = pets
        .create(ctx.store.id, &new_pet("Barkley", "DOG", "tom@example.com"))
        .await
        .unwrap();
    let newest = pets
        .create(ctx.store.id, &new_pet("Sprout", "FROG", "lena@example.com"))
        .await
        .unwrap();

    ctx.backdate("created_at", oldest.id, 30).await;
    ctx.backdate("created_at", sold.id, 20).await;
    ctx.backdate("created_at", newest.id, 10).await;

    ctx.db
        .purchases()
        .purchase(ctx.store.id, buyer, &[sold.id.to_string()])
        .await
        .unwrap();

    let available = pets.list_available(ctx.store.id).await.unwrap();
    assert_eq!(ids(&available), vec![newest.id, oldest.id]);
}

#[tokio::test]
async fn test_purchase_history_is_most_recent_purchase_first() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();
    let engine = ctx.db.purchases();
    let buyer = ctx.customer("buyer").await;

    let a = pets
        .create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();
    let b = pets
        .create(ctx.store.id, &new_pet("Barkley", "DOG", "tom@example.com"))
        .await
        .unwrap();

    // A is listed after B but bought first
    ctx.backdate("created_at", b.id, 60).await;
    ctx.backdate("created_at", a.id, 50).await;

    engine.purchase(ctx.store.id, buyer, &[a.id.to_string()]).await.unwrap();
    engine.purchase(ctx.store.id, buyer, &[b.id.to_string()]).await.unwrap();
    ctx.backdate("purchased_at", a.id, 20).await;
    ctx.backdate("purchased_at", b.id, 10).await;

    let history = pets.list_purchased_by(ctx.store.id, buyer).await.unwrap();
    assert_eq!(ids(&history), vec![b.id, a.id]);
}

#[tokio::test]
async fn test_tampered_row_fails_whole_list() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();

    pets.create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();
    let victim = pets
        .create(ctx.store.id, &new_pet("Barkley", "DOG", "tom@example.com"))
        .await
        .unwrap();

    sqlx::query(
        "UPDATE pets SET breeder_email_enc = set_byte(breeder_email_enc, 0, get_byte(breeder_email_enc, 0) # 1) \
         WHERE id = $1",
    )
    .bind(victim.id)
    .execute(ctx.db.pool())
    .await
    .unwrap();

    match pets.list_all(ctx.store.id).await {
        Err(DbError::Integrity { pet_id }) => assert_eq!(pet_id, victim.id),
        other => panic!("expected integrity error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stores_do_not_see_each_other() {
    let Some(ctx) = setup().await else { return };
    let pets = ctx.pets();
    let other = ctx.other_store().await;

    pets.create(ctx.store.id, &new_pet("Miso", "CAT", "jane@example.com"))
        .await
        .unwrap();

    assert!(pets.list_all(other.id).await.unwrap().is_empty());
    assert!(pets.list_available(other.id).await.unwrap().is_empty());
    assert_eq!(pets.count(ctx.store.id).await.unwrap(), 1);
}
