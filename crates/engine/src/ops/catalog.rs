use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    Actor, Consumable, ConsumableNew, ConsumableUpdate, EngineError, Product, ProductNew,
    ProductUpdate, Resource, ResultEngine, consumable_usage, consumables, products, purchases,
    sales,
    util::{
        CATALOG_NAME_MAX, name_key, normalize_name, normalize_optional_text,
        require_positive_price,
    },
};

use super::{Engine, with_tx};

impl Engine {
    /// All consumables, sorted by name.
    pub async fn list_consumables(&self) -> ResultEngine<Vec<Consumable>> {
        let models = consumables::Entity::find()
            .order_by_asc(consumables::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Consumable::from).collect())
    }

    pub async fn consumable(&self, id: i32) -> ResultEngine<Consumable> {
        let model = consumables::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("consumable".to_string()))?;
        Ok(model.into())
    }

    /// Adds a consumable with an empty stock.
    ///
    /// Names are unique case-insensitively.
    pub async fn create_consumable(
        &self,
        actor: &Actor,
        cmd: ConsumableNew,
    ) -> ResultEngine<Consumable> {
        actor.require_write(Resource::Catalog)?;
        let name = normalize_name(&cmd.name, "consumable", 1, CATALOG_NAME_MAX)?;
        require_positive_price(cmd.price)?;
        let key = name_key(&name);

        let consumable = with_tx!(self, |db_tx| {
            ensure_consumable_name_free(&db_tx, &key, None, &name).await?;
            let model = consumables::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name.clone()),
                name_key: ActiveValue::Set(key),
                price_minor: ActiveValue::Set(cmd.price.minor()),
                current_stock: ActiveValue::Set(0),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| EngineError::from_store(err, &name))?;
            Ok::<_, EngineError>(Consumable::from(model))
        })?;

        tracing::info!(id = consumable.id, name = %consumable.name, by = %actor.name, "consumable created");
        Ok(consumable)
    }

    /// Renames and/or re-prices a consumable.
    ///
    /// Past days keep their stored cost until their usage is saved again or
    /// the date is reconciled.
    pub async fn update_consumable(
        &self,
        actor: &Actor,
        id: i32,
        cmd: ConsumableUpdate,
    ) -> ResultEngine<Consumable> {
        actor.require_write(Resource::Catalog)?;
        if cmd.is_empty() {
            return Err(EngineError::InvalidInput("nothing to update".to_string()));
        }
        let name = cmd
            .name
            .as_deref()
            .map(|value| normalize_name(value, "consumable", 1, CATALOG_NAME_MAX))
            .transpose()?;
        if let Some(price) = cmd.price {
            require_positive_price(price)?;
        }

        with_tx!(self, |db_tx| {
            let model = consumables::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("consumable".to_string()))?;

            let mut active: consumables::ActiveModel = model.into();
            if let Some(name) = &name {
                let key = name_key(name);
                ensure_consumable_name_free(&db_tx, &key, Some(id), name).await?;
                active.name = ActiveValue::Set(name.clone());
                active.name_key = ActiveValue::Set(key);
            }
            if let Some(price) = cmd.price {
                active.price_minor = ActiveValue::Set(price.minor());
            }
            let label = name.clone().unwrap_or_else(|| "consumable".to_string());
            let updated = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_store(err, &label))?;
            Ok(Consumable::from(updated))
        })
    }

    /// Removes a consumable that no usage or purchase row references.
    pub async fn delete_consumable(&self, actor: &Actor, id: i32) -> ResultEngine<()> {
        actor.require_write(Resource::Catalog)?;
        with_tx!(self, |db_tx| {
            let model = consumables::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("consumable".to_string()))?;

            let usage_rows = consumable_usage::Entity::find()
                .filter(consumable_usage::Column::ConsumableId.eq(id))
                .count(&db_tx)
                .await?;
            let purchase_rows = purchases::Entity::find()
                .filter(purchases::Column::ConsumableId.eq(id))
                .count(&db_tx)
                .await?;
            if usage_rows + purchase_rows > 0 {
                return Err(EngineError::InUse(format!(
                    "consumable '{}' is referenced by {usage_rows} usage and {purchase_rows} purchase rows",
                    model.name
                )));
            }

            consumables::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, name = %model.name, by = %actor.name, "consumable deleted");
            Ok(())
        })
    }

    /// All products, sorted by name.
    pub async fn list_products(&self) -> ResultEngine<Vec<Product>> {
        let models = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    pub async fn create_product(&self, actor: &Actor, cmd: ProductNew) -> ResultEngine<Product> {
        actor.require_write(Resource::Catalog)?;
        let name = normalize_name(&cmd.name, "product", 1, CATALOG_NAME_MAX)?;
        require_positive_price(cmd.price)?;
        let category = normalize_optional_text(cmd.category.as_deref());
        let key = name_key(&name);

        let product = with_tx!(self, |db_tx| {
            ensure_product_name_free(&db_tx, &key, None, &name).await?;
            let model = products::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name.clone()),
                name_key: ActiveValue::Set(key),
                category: ActiveValue::Set(category),
                price_minor: ActiveValue::Set(cmd.price.minor()),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| EngineError::from_store(err, &name))?;
            Ok::<_, EngineError>(Product::from(model))
        })?;

        tracing::info!(id = product.id, name = %product.name, by = %actor.name, "product created");
        Ok(product)
    }

    /// Updates a product. An empty `category` string clears it.
    pub async fn update_product(
        &self,
        actor: &Actor,
        id: i32,
        cmd: ProductUpdate,
    ) -> ResultEngine<Product> {
        actor.require_write(Resource::Catalog)?;
        if cmd.is_empty() {
            return Err(EngineError::InvalidInput("nothing to update".to_string()));
        }
        let name = cmd
            .name
            .as_deref()
            .map(|value| normalize_name(value, "product", 1, CATALOG_NAME_MAX))
            .transpose()?;
        if let Some(price) = cmd.price {
            require_positive_price(price)?;
        }

        with_tx!(self, |db_tx| {
            let model = products::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("product".to_string()))?;

            let mut active: products::ActiveModel = model.into();
            if let Some(name) = &name {
                let key = name_key(name);
                ensure_product_name_free(&db_tx, &key, Some(id), name).await?;
                active.name = ActiveValue::Set(name.clone());
                active.name_key = ActiveValue::Set(key);
            }
            if let Some(category) = &cmd.category {
                active.category = ActiveValue::Set(normalize_optional_text(Some(category)));
            }
            if let Some(price) = cmd.price {
                active.price_minor = ActiveValue::Set(price.minor());
            }
            let label = name.clone().unwrap_or_else(|| "product".to_string());
            let updated = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_store(err, &label))?;
            Ok(Product::from(updated))
        })
    }

    /// Removes a product that was never sold.
    pub async fn delete_product(&self, actor: &Actor, id: i32) -> ResultEngine<()> {
        actor.require_write(Resource::Catalog)?;
        with_tx!(self, |db_tx| {
            let model = products::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("product".to_string()))?;

            let sale_rows = sales::Entity::find()
                .filter(sales::Column::ProductId.eq(id))
                .count(&db_tx)
                .await?;
            if sale_rows > 0 {
                return Err(EngineError::InUse(format!(
                    "product '{}' is referenced by {sale_rows} sale rows",
                    model.name
                )));
            }

            products::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, name = %model.name, by = %actor.name, "product deleted");
            Ok(())
        })
    }
}

async fn ensure_consumable_name_free<C: ConnectionTrait>(
    db: &C,
    key: &str,
    except: Option<i32>,
    display: &str,
) -> ResultEngine<()> {
    let mut query = consumables::Entity::find().filter(consumables::Column::NameKey.eq(key));
    if let Some(id) = except {
        query = query.filter(consumables::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(display.to_string()));
    }
    Ok(())
}

async fn ensure_product_name_free<C: ConnectionTrait>(
    db: &C,
    key: &str,
    except: Option<i32>,
    display: &str,
) -> ResultEngine<()> {
    let mut query = products::Entity::find().filter(products::Column::NameKey.eq(key));
    if let Some(id) = except {
        query = query.filter(products::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(display.to_string()));
    }
    Ok(())
}
