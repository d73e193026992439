use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Actor, EngineError, Expense, ExpenseNew, Period, Resource, ResultEngine, expenses,
    util::{EXPENSE_KIND_MAX, normalize_name, normalize_optional_text},
};

use super::{Engine, today};

impl Engine {
    pub async fn create_expense(&self, actor: &Actor, cmd: ExpenseNew) -> ResultEngine<Expense> {
        actor.require_write(Resource::Expenses)?;
        let kind = normalize_name(&cmd.kind, "expense kind", 1, EXPENSE_KIND_MAX)?;
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }

        let model = expenses::ActiveModel {
            id: ActiveValue::NotSet,
            kind: ActiveValue::Set(kind),
            amount_minor: ActiveValue::Set(cmd.amount.minor()),
            description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
            expense_date: ActiveValue::Set(cmd.expense_date.unwrap_or_else(today)),
        }
        .insert(&self.database)
        .await?;

        let expense = Expense::from(model);
        tracing::info!(id = expense.id, kind = %expense.kind, amount = %expense.amount, by = %actor.name, "expense recorded");
        Ok(expense)
    }

    /// Expenses, newest first, optionally restricted to a period.
    pub async fn list_expenses(&self, period: Option<Period>) -> ResultEngine<Vec<Expense>> {
        let mut query = expenses::Entity::find();
        if let Some(period) = period {
            query = query
                .filter(expenses::Column::ExpenseDate.gte(period.start))
                .filter(expenses::Column::ExpenseDate.lt(period.end));
        }
        let models = query
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }
}
