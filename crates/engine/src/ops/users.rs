use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Actor, EngineError, ProfileUpdate, Resource, ResultEngine, Role, User, UserNew, UserUpdate,
    passwords::{hash_password, verify_password},
    users,
    util::{USER_NAME_MAX, USER_NAME_MIN, normalize_name, require_password},
};

use super::{Engine, now, with_tx};

impl Engine {
    /// Public sign-up. The account always gets the `user` role.
    pub async fn register(&self, name: &str, password: &str) -> ResultEngine<User> {
        let user = self.insert_user(name, password, Role::User).await?;
        tracing::info!(id = user.id, name = %user.name, "user registered");
        Ok(user)
    }

    /// Returns the user when `password` matches; any mismatch, including an
    /// unknown name, is [`EngineError::InvalidCredentials`].
    pub async fn verify_credentials(&self, name: &str, password: &str) -> ResultEngine<User> {
        let model = users::Entity::find()
            .filter(users::Column::Name.eq(name.trim()))
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;
        if !verify_password(password, &model.password_hash) {
            return Err(EngineError::InvalidCredentials);
        }
        User::try_from(model)
    }

    pub async fn profile(&self, id: i32) -> ResultEngine<User> {
        let model = find_user(&self.database, id).await?;
        User::try_from(model)
    }

    /// Renames the caller and/or changes their password.
    ///
    /// A new password requires the current one.
    pub async fn update_profile(&self, actor: &Actor, cmd: ProfileUpdate) -> ResultEngine<User> {
        if cmd.name.is_none() && cmd.new_password.is_none() {
            return Err(EngineError::InvalidInput("nothing to update".to_string()));
        }
        let name = cmd
            .name
            .as_deref()
            .map(|value| normalize_name(value, "user", USER_NAME_MIN, USER_NAME_MAX))
            .transpose()?;
        let password_hash = match cmd.new_password.as_deref() {
            Some(new_password) => {
                require_password(new_password)?;
                Some(hash_password(new_password)?)
            }
            None => None,
        };

        with_tx!(self, |db_tx| {
            let model = find_user(&db_tx, actor.id).await?;
            if password_hash.is_some() {
                let current = cmd.current_password.as_deref().ok_or_else(|| {
                    EngineError::InvalidInput("current_password is required".to_string())
                })?;
                if !verify_password(current, &model.password_hash) {
                    return Err(EngineError::InvalidCredentials);
                }
            }

            let mut active: users::ActiveModel = model.into();
            if let Some(name) = &name {
                ensure_user_name_free(&db_tx, name, Some(actor.id)).await?;
                active.name = ActiveValue::Set(name.clone());
            }
            if let Some(hash) = &password_hash {
                active.password_hash = ActiveValue::Set(hash.clone());
            }
            active.updated_at = ActiveValue::Set(now());
            let label = name.clone().unwrap_or_else(|| actor.name.clone());
            let updated = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_store(err, &label))?;
            User::try_from(updated)
        })
    }

    /// All accounts, newest first.
    pub async fn list_users(&self, actor: &Actor) -> ResultEngine<Vec<User>> {
        actor.require_read(Resource::Users)?;
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(User::try_from).collect()
    }

    pub async fn create_user(&self, actor: &Actor, cmd: UserNew) -> ResultEngine<User> {
        actor.require_write(Resource::Users)?;
        let user = self.insert_user(&cmd.name, &cmd.password, cmd.role).await?;
        tracing::info!(id = user.id, name = %user.name, role = %user.role, by = %actor.name, "user created");
        Ok(user)
    }

    pub async fn update_user(&self, actor: &Actor, id: i32, cmd: UserUpdate) -> ResultEngine<User> {
        actor.require_write(Resource::Users)?;
        if cmd.name.is_none() && cmd.role.is_none() && cmd.new_password.is_none() {
            return Err(EngineError::InvalidInput("nothing to update".to_string()));
        }
        let name = cmd
            .name
            .as_deref()
            .map(|value| normalize_name(value, "user", USER_NAME_MIN, USER_NAME_MAX))
            .transpose()?;
        let password_hash = match cmd.new_password.as_deref() {
            Some(new_password) => {
                require_password(new_password)?;
                Some(hash_password(new_password)?)
            }
            None => None,
        };

        with_tx!(self, |db_tx| {
            let model = find_user(&db_tx, id).await?;
            let mut active: users::ActiveModel = model.into();
            if let Some(name) = &name {
                ensure_user_name_free(&db_tx, name, Some(id)).await?;
                active.name = ActiveValue::Set(name.clone());
            }
            if let Some(role) = cmd.role {
                active.role = ActiveValue::Set(role.as_str().to_string());
            }
            if let Some(hash) = &password_hash {
                active.password_hash = ActiveValue::Set(hash.clone());
            }
            active.updated_at = ActiveValue::Set(now());
            let label = name.clone().unwrap_or_else(|| "user".to_string());
            let updated = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_store(err, &label))?;
            User::try_from(updated)
        })
    }

    /// Deletes another account. Deleting yourself is rejected.
    pub async fn delete_user(&self, actor: &Actor, id: i32) -> ResultEngine<()> {
        actor.require_write(Resource::Users)?;
        if actor.id == id {
            return Err(EngineError::InvalidInput(
                "cannot delete your own account".to_string(),
            ));
        }
        let result = users::Entity::delete_by_id(id).exec(&self.database).await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("user".to_string()));
        }
        tracing::info!(id, by = %actor.name, "user deleted");
        Ok(())
    }

    async fn insert_user(&self, name: &str, password: &str, role: Role) -> ResultEngine<User> {
        let name = normalize_name(name, "user", USER_NAME_MIN, USER_NAME_MAX)?;
        require_password(password)?;
        let password_hash = hash_password(password)?;
        let created_at = now();

        with_tx!(self, |db_tx| {
            ensure_user_name_free(&db_tx, &name, None).await?;
            let model = users::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name.clone()),
                password_hash: ActiveValue::Set(password_hash),
                role: ActiveValue::Set(role.as_str().to_string()),
                created_at: ActiveValue::Set(created_at),
                updated_at: ActiveValue::Set(created_at),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| EngineError::from_store(err, &name))?;
            User::try_from(model)
        })
    }
}

async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> ResultEngine<users::Model> {
    users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))
}

async fn ensure_user_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> ResultEngine<()> {
    let mut query = users::Entity::find().filter(users::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(users::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}
