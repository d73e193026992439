mod common;

use engine::{Actor, EngineError, ProfileUpdate, Role, UserNew, UserUpdate};

use common::{admin, engine_with_db};

fn actor_of(user: &engine::User) -> Actor {
    Actor::new(user.id, user.name.clone(), user.role)
}

#[tokio::test]
async fn registration_always_yields_user_role() {
    let (engine, _db) = engine_with_db().await;

    let user = engine.register("sami", "secret1").await.unwrap();
    assert_eq!(user.role, Role::User);

    let logged = engine.verify_credentials("sami", "secret1").await.unwrap();
    assert_eq!(logged.id, user.id);

    let err = engine.register("sami", "another1").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn bad_credentials_look_the_same() {
    let (engine, _db) = engine_with_db().await;
    engine.register("sami", "secret1").await.unwrap();

    assert_eq!(
        engine.verify_credentials("sami", "wrong!!").await.unwrap_err(),
        EngineError::InvalidCredentials
    );
    assert_eq!(
        engine.verify_credentials("nobody", "secret1").await.unwrap_err(),
        EngineError::InvalidCredentials
    );
}

#[tokio::test]
async fn short_password_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.register("sami", "123").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn password_change_needs_current_password() {
    let (engine, _db) = engine_with_db().await;
    let user = engine.register("sami", "secret1").await.unwrap();
    let actor = actor_of(&user);

    let err = engine
        .update_profile(
            &actor,
            ProfileUpdate {
                name: None,
                current_password: Some("nope123".to_string()),
                new_password: Some("secret2".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidCredentials);

    engine
        .update_profile(
            &actor,
            ProfileUpdate {
                name: Some("sami b".to_string()),
                current_password: Some("secret1".to_string()),
                new_password: Some("secret2".to_string()),
            },
        )
        .await
        .unwrap();
    assert!(engine.verify_credentials("sami b", "secret2").await.is_ok());
    assert!(engine.verify_credentials("sami", "secret1").await.is_err());
}

#[tokio::test]
async fn user_management_is_privileged() {
    let (engine, _db) = engine_with_db().await;
    let clerk = engine.register("sami", "secret1").await.unwrap();

    let err = engine.list_users(&actor_of(&clerk)).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let vip = engine
        .create_user(
            &admin(),
            UserNew {
                name: "leila".to_string(),
                password: "secret1".to_string(),
                role: Role::Vip,
            },
        )
        .await
        .unwrap();
    assert_eq!(vip.role, Role::Vip);

    let promoted = engine
        .update_user(
            &actor_of(&vip),
            clerk.id,
            UserUpdate {
                name: None,
                role: Some(Role::Admin),
                new_password: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Admin);
    assert_eq!(engine.list_users(&actor_of(&vip)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn users_cannot_delete_themselves() {
    let (engine, _db) = engine_with_db().await;
    let boss = engine
        .create_user(
            &admin(),
            UserNew {
                name: "boss".to_string(),
                password: "secret1".to_string(),
                role: Role::Admin,
            },
        )
        .await
        .unwrap();
    let clerk = engine.register("sami", "secret1").await.unwrap();
    let actor = actor_of(&boss);

    let err = engine.delete_user(&actor, boss.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    engine.delete_user(&actor, clerk.id).await.unwrap();
    let err = engine.delete_user(&actor, clerk.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
