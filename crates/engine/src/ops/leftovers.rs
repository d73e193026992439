use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::OnConflict};

use crate::{
    Actor, EngineError, Leftovers, LeftoversSave, Resource, ResultEngine, counts::check_count,
    daily_leftovers, util::normalize_optional_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// End-of-day leftovers for `date`; zeros when nothing was recorded.
    pub async fn leftovers(&self, date: NaiveDate) -> ResultEngine<Leftovers> {
        let model = daily_leftovers::Entity::find()
            .filter(daily_leftovers::Column::RecordDate.eq(date))
            .one(&self.database)
            .await?;
        Ok(model.map_or_else(|| Leftovers::empty(date), Leftovers::from))
    }

    /// Upserts the leftovers of a date. Omitted counts are stored as zero.
    pub async fn save_leftovers(
        &self,
        actor: &Actor,
        cmd: LeftoversSave,
    ) -> ResultEngine<Leftovers> {
        actor.require_write(Resource::Leftovers)?;
        let leftovers = Leftovers {
            record_date: cmd.record_date,
            bread_baguettes: cmd.bread_baguettes.unwrap_or(0),
            cooked_eggs: cmd.cooked_eggs.unwrap_or(0),
            salami_pieces: cmd.salami_pieces.unwrap_or(0),
            notes: normalize_optional_text(cmd.notes.as_deref()).unwrap_or_default(),
        };
        check_count("bread_baguettes", leftovers.bread_baguettes)?;
        check_count("cooked_eggs", leftovers.cooked_eggs)?;
        check_count("salami_pieces", leftovers.salami_pieces)?;

        with_tx!(self, |db_tx| {
            let active = daily_leftovers::ActiveModel {
                id: ActiveValue::NotSet,
                record_date: ActiveValue::Set(leftovers.record_date),
                bread_baguettes: ActiveValue::Set(leftovers.bread_baguettes),
                cooked_eggs: ActiveValue::Set(leftovers.cooked_eggs),
                salami_pieces: ActiveValue::Set(leftovers.salami_pieces),
                notes: ActiveValue::Set(leftovers.notes.clone()),
            };
            daily_leftovers::Entity::insert(active)
                .on_conflict(
                    OnConflict::column(daily_leftovers::Column::RecordDate)
                        .update_columns([
                            daily_leftovers::Column::BreadBaguettes,
                            daily_leftovers::Column::CookedEggs,
                            daily_leftovers::Column::SalamiPieces,
                            daily_leftovers::Column::Notes,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
            Ok::<_, EngineError>(())
        })?;

        Ok(leftovers)
    }
}
