use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    Actor, EngineError, Purchase, PurchaseNew, Resource, ResultEngine, consumables, purchases,
    util::require_positive_quantity,
};

use super::{Engine, today, with_tx};

impl Engine {
    /// Records a stock purchase and raises the consumable's stock by its
    /// quantity. Both writes commit together.
    pub async fn create_purchase(&self, actor: &Actor, cmd: PurchaseNew) -> ResultEngine<Purchase> {
        actor.require_write(Resource::Purchases)?;
        require_positive_quantity(cmd.quantity)?;
        if cmd.cost.is_negative() {
            return Err(EngineError::InvalidAmount("cost must be >= 0".to_string()));
        }
        let purchase_date = cmd.purchase_date.unwrap_or_else(today);

        let purchase = with_tx!(self, |db_tx| {
            let consumable = consumables::Entity::find_by_id(cmd.consumable_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("consumable".to_string()))?;

            let model = purchases::ActiveModel {
                id: ActiveValue::NotSet,
                consumable_id: ActiveValue::Set(consumable.id),
                quantity: ActiveValue::Set(cmd.quantity),
                cost_minor: ActiveValue::Set(cmd.cost.minor()),
                purchase_date: ActiveValue::Set(purchase_date),
            }
            .insert(&db_tx)
            .await?;

            consumables::Entity::update_many()
                .col_expr(
                    consumables::Column::CurrentStock,
                    Expr::col(consumables::Column::CurrentStock).add(cmd.quantity),
                )
                .filter(consumables::Column::Id.eq(consumable.id))
                .exec(&db_tx)
                .await?;

            Ok::<_, EngineError>(Purchase::from_model(model, consumable.name))
        })?;

        tracing::info!(
            id = purchase.id,
            consumable = %purchase.consumable_name,
            quantity = purchase.quantity,
            by = %actor.name,
            "purchase recorded"
        );
        Ok(purchase)
    }

    /// All purchases, newest first.
    pub async fn list_purchases(&self) -> ResultEngine<Vec<Purchase>> {
        let rows = purchases::Entity::find()
            .find_also_related(consumables::Entity)
            .order_by_desc(purchases::Column::PurchaseDate)
            .order_by_desc(purchases::Column::Id)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(purchase, consumable)| {
                let name = consumable.map(|c| c.name).unwrap_or_default();
                Purchase::from_model(purchase, name)
            })
            .collect())
    }
}
