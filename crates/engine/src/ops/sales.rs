use std::collections::HashMap;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Actor, EngineError, Money, Period, Resource, ResultEngine, Sale, SaleBatch, SaleItem,
    products, sales, util::require_positive_quantity,
};

use super::{Engine, now, period_bounds, with_tx};

impl Engine {
    /// Records a multi-line sale, one row per line, priced from the catalog.
    ///
    /// The batch is all-or-nothing: an unknown product on any line leaves no
    /// row behind.
    pub async fn create_sale(&self, actor: &Actor, items: &[SaleItem]) -> ResultEngine<SaleBatch> {
        actor.require_write(Resource::Sales)?;
        if items.is_empty() {
            return Err(EngineError::InvalidInput(
                "a sale needs at least one item".to_string(),
            ));
        }
        for item in items {
            require_positive_quantity(item.quantity)?;
        }
        let sold_at = now();

        let batch = with_tx!(self, |db_tx| {
            let ids: Vec<i32> = items.iter().map(|item| item.product_id).collect();
            let catalog: HashMap<i32, products::Model> = products::Entity::find()
                .filter(products::Column::Id.is_in(ids))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| (model.id, model))
                .collect();

            let mut sales_out = Vec::with_capacity(items.len());
            let mut total = Money::ZERO;
            for item in items {
                let product = catalog.get(&item.product_id).ok_or_else(|| {
                    EngineError::KeyNotFound(format!("product {}", item.product_id))
                })?;
                let line_total = Money::new(product.price_minor).times(i64::from(item.quantity))?;
                total = total
                    .checked_add(line_total)
                    .ok_or_else(|| EngineError::InvalidAmount("sale total overflow".to_string()))?;

                let model = sales::ActiveModel {
                    id: ActiveValue::NotSet,
                    product_id: ActiveValue::Set(product.id),
                    quantity: ActiveValue::Set(item.quantity),
                    total_price_minor: ActiveValue::Set(line_total.minor()),
                    sale_timestamp: ActiveValue::Set(sold_at),
                }
                .insert(&db_tx)
                .await?;
                sales_out.push(Sale::from_model(model, product.name.clone()));
            }

            Ok::<_, EngineError>(SaleBatch {
                sales: sales_out,
                total,
            })
        })?;

        tracing::info!(
            lines = batch.sales.len(),
            total = %batch.total,
            by = %actor.name,
            "sale recorded"
        );
        Ok(batch)
    }

    /// Sales, newest first, optionally restricted to a period.
    pub async fn list_sales(&self, period: Option<Period>) -> ResultEngine<Vec<Sale>> {
        let mut query = sales::Entity::find().find_also_related(products::Entity);
        if let Some(period) = period {
            let (from, to) = period_bounds(period)?;
            query = query
                .filter(sales::Column::SaleTimestamp.gte(from))
                .filter(sales::Column::SaleTimestamp.lt(to));
        }
        let rows = query
            .order_by_desc(sales::Column::SaleTimestamp)
            .order_by_desc(sales::Column::Id)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(sale, product)| {
                let name = product.map(|p| p.name).unwrap_or_default();
                Sale::from_model(sale, name)
            })
            .collect())
    }
}
