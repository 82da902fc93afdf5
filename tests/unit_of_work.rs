//! Integration tests per DbContext (unit of work) su MySQL
//!
//! Verificano il flush del change set con e senza transazione esplicita.

#[cfg(test)]
mod unit_of_work_tests {
    use product_manager::entities::Product;
    use product_manager::repositories::{DbContext, ProductRepository, ProductStore, UnitOfWork};
    use rust_decimal::Decimal;
    use sqlx::MySqlPool;

    fn product(name: &str) -> Product {
        Product::new(name.to_string(), Decimal::new(1250, 2), None)
    }

    #[sqlx::test]
    async fn test_save_without_transaction_is_durable(pool: MySqlPool) -> sqlx::Result<()> {
        let ctx = DbContext::new(pool.clone());
        let products = ProductRepository::new(&ctx);
        let lamp = product("Lamp");

        products.add(lamp.clone()).await;
        assert_eq!(ctx.pending_count().await, 1);
        assert!(products.get_by_id(&lamp.id).await?.is_none());

        let affected = ctx.save_changes().await?;

        assert_eq!(affected, 1);
        assert_eq!(ctx.pending_count().await, 0);
        let stored = products.get_by_id(&lamp.id).await?.unwrap();
        assert_eq!(stored.price, Decimal::new(1250, 2));
        Ok(())
    }

    #[sqlx::test]
    async fn test_rollback_discards_saved_changes(pool: MySqlPool) -> sqlx::Result<()> {
        let ctx = DbContext::new(pool.clone());
        let products = ProductRepository::new(&ctx);

        ctx.begin_transaction().await?;
        ctx.begin_transaction().await?;
        products.add(product("Lamp")).await;
        ctx.save_changes().await?;
        ctx.rollback().await?;

        assert!(products.get_by_name("Lamp").await?.is_none());
        // dopo il rollback il contesto torna utilizzabile
        ctx.rollback().await?;
        ctx.commit().await?;
        Ok(())
    }

    #[sqlx::test]
    async fn test_commit_makes_changes_visible(pool: MySqlPool) -> sqlx::Result<()> {
        let ctx = DbContext::new(pool.clone());
        let products = ProductRepository::new(&ctx);
        let lamp = product("Lamp");

        ctx.begin_transaction().await?;
        products.add(lamp.clone()).await;
        products.add(product("Desk")).await;
        assert_eq!(ctx.save_changes().await?, 2);
        ctx.commit().await?;

        assert_eq!(products.get_all().await?.len(), 2);

        let renamed = Product {
            name: "Floor lamp".to_string(),
            ..lamp.clone()
        };
        products.update(renamed).await;
        products.delete(&lamp.id).await;
        ctx.save_changes().await?;

        let names: Vec<String> = products.get_all().await?.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Desk".to_string()]);
        Ok(())
    }

    #[sqlx::test]
    async fn test_unique_violation_surfaces_on_save(pool: MySqlPool) -> sqlx::Result<()> {
        let ctx = DbContext::new(pool.clone());
        let products = ProductRepository::new(&ctx);

        products.add(product("Lamp")).await;
        products.add(product("Lamp")).await;
        let err = ctx.save_changes().await.unwrap_err();

        assert!(matches!(err, sqlx::Error::Database(_)));
        // la transazione implicita ha annullato anche il primo insert
        assert!(products.get_all().await?.is_empty());
        assert_eq!(ctx.pending_count().await, 2);
        Ok(())
    }

    #[sqlx::test]
    async fn test_failed_save_can_be_retried(pool: MySqlPool) -> sqlx::Result<()> {
        let other = DbContext::new(pool.clone());
        let other_products = ProductRepository::new(&other);
        let blocking = product("Lamp");
        other_products.add(blocking.clone()).await;
        other.save_changes().await?;

        let ctx = DbContext::new(pool.clone());
        let products = ProductRepository::new(&ctx);
        let lamp = product("Lamp");
        products.add(lamp.clone()).await;

        assert!(ctx.save_changes().await.is_err());
        assert_eq!(ctx.pending_count().await, 1);

        other_products.delete(&blocking.id).await;
        other.save_changes().await?;

        assert_eq!(ctx.save_changes().await?, 1);
        assert_eq!(ctx.pending_count().await, 0);
        assert!(products.get_by_id(&lamp.id).await?.is_some());
        Ok(())
    }
}
