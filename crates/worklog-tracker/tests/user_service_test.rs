//! Integration tests for user onboarding and listing.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use worklog_core::error::{WorklogError, WorklogResult};
use worklog_core::models::user::{AddUser, IdentityInfo, UserFilter};
use worklog_core::repository::{IdentityResolver, Pagination};
use worklog_db::repository::SurrealUserRepository;
use worklog_tracker::UserService;

/// In-memory passport registry that counts lookups.
#[derive(Default)]
struct StaticResolver {
    known: HashMap<(u16, u32), IdentityInfo>,
    calls: Arc<AtomicU32>,
}

impl StaticResolver {
    fn with(mut self, serie: u16, number: u32, surname: &str, name: &str) -> Self {
        self.known.insert(
            (serie, number),
            IdentityInfo {
                name: name.into(),
                surname: surname.into(),
                patronymic: "Petrovich".into(),
                address: "Kazan, Baumana 5".into(),
            },
        );
        self
    }
}

impl IdentityResolver for StaticResolver {
    async fn resolve(&self, serie: u16, number: u32) -> WorklogResult<IdentityInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known
            .get(&(serie, number))
            .cloned()
            .ok_or(WorklogError::IdentityNotFound { serie, number })
    }
}

async fn setup(resolver: StaticResolver) -> UserService<SurrealUserRepository<Db>, StaticResolver> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    worklog_db::run_migrations(&db).await.unwrap();
    UserService::new(SurrealUserRepository::new(db), resolver)
}

fn passport(serie: u16, number: u32) -> AddUser {
    AddUser {
        passport_serie: serie,
        passport_number: number,
    }
}

#[tokio::test]
async fn onboarding_copies_resolved_identity() {
    let svc = setup(StaticResolver::default().with(1234, 567890, "Ivanov", "Ivan")).await;

    let user = svc.add_user(passport(1234, 567890)).await.unwrap();
    assert_eq!(user.surname, "Ivanov");
    assert_eq!(user.name, "Ivan");
    assert_eq!(user.patronymic, "Petrovich");
    assert_eq!(user.address, "Kazan, Baumana 5");
    assert_eq!(user.passport_serie, 1234);
    assert_eq!(user.passport_number, 567890);

    let fetched = svc.get_user(user.id).await.unwrap();
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn onboarding_twice_is_user_already_exists() {
    let svc = setup(StaticResolver::default().with(1234, 567890, "Ivanov", "Ivan")).await;

    svc.add_user(passport(1234, 567890)).await.unwrap();
    let err = svc.add_user(passport(1234, 567890)).await.unwrap_err();
    assert!(
        matches!(err, WorklogError::UserAlreadyExists),
        "expected UserAlreadyExists, got {err:?}"
    );

    let page = svc
        .list_users(&UserFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn unknown_passport_persists_nothing() {
    let svc = setup(StaticResolver::default()).await;

    let err = svc.add_user(passport(1111, 222222)).await.unwrap_err();
    assert!(matches!(
        err,
        WorklogError::IdentityNotFound {
            serie: 1111,
            number: 222222
        }
    ));

    let page = svc
        .list_users(&UserFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn identity_is_resolved_once_per_call() {
    let resolver = StaticResolver::default().with(1234, 567890, "Ivanov", "Ivan");
    let calls = Arc::clone(&resolver.calls);
    let svc = setup(resolver).await;

    svc.add_user(passport(1234, 567890)).await.unwrap();
    let _ = svc.add_user(passport(1234, 567890)).await;
    let _ = svc.add_user(passport(9999, 999999)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let svc = setup(
        StaticResolver::default()
            .with(1000, 1, "Smith", "John")
            .with(1000, 2, "Smithson", "Jane")
            .with(1000, 3, "Brown", "Bob"),
    )
    .await;

    for number in 1..=3 {
        svc.add_user(passport(1000, number)).await.unwrap();
    }

    let filter = UserFilter {
        surname: Some("Smith".into()),
        ..Default::default()
    };
    let page = svc
        .list_users(&filter, Pagination { offset: 0, limit: 1 })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 2);
    assert!(page.items[0].surname.starts_with("Smith"));
}
