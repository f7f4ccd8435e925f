#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use access_control_sdk::ActorContext;

use crate::domain::cache::user_permissions_key;
use crate::domain::error::DomainError;
use crate::domain::repos::SingleDatabaseResolver;
use crate::domain::service::ServiceConfig;
use crate::test_support::{
    RecordingCache, UnknownTenantResolver, build_services, build_services_with, inmem_db,
    seed_role, seed_user, seed_user_role,
};

fn ids(grants: &[Uuid]) -> BTreeSet<Uuid> {
    grants.iter().copied().collect()
}

#[tokio::test]
async fn first_assignment_inserts_and_evicts_role_users() {
    let db = inmem_db().await;
    let role_id = Uuid::new_v4();
    let (user_a, user_b) = (Uuid::new_v4(), Uuid::new_v4());
    let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

    seed_role(&db, role_id, None, false).await;
    seed_user(&db, user_a, None).await;
    seed_user(&db, user_b, None).await;
    seed_user_role(&db, user_a, role_id).await;
    seed_user_role(&db, user_b, role_id).await;

    let (services, cache) = build_services(db, ServiceConfig::default());
    let actor = ActorContext::platform(Uuid::new_v4());

    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p1, p2])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.removed, 0);
    assert!(outcome.dropped.is_empty());
    assert_eq!(outcome.cache_evictions, 2);

    let stored = services.grants.role_permission_ids(role_id).await.unwrap();
    assert_eq!(ids(&stored), ids(&[p1, p2]));

    let evicted = cache.evicted();
    assert!(evicted.contains(&user_permissions_key(user_a)));
    assert!(evicted.contains(&user_permissions_key(user_b)));
}

#[tokio::test]
async fn reassignment_reconciles_the_difference() {
    let db = inmem_db().await;
    let role_id = Uuid::new_v4();
    let (p1, p2, p3, p4) = (
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
    );

    seed_role(&db, role_id, None, false).await;

    let (services, _cache) = build_services(db, ServiceConfig::default());
    let actor = ActorContext::platform(Uuid::new_v4());

    services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p1, p2, p3])
        .await
        .unwrap();
    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p2, p3, p4])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.removed, 1);

    let stored = services.grants.role_permission_ids(role_id).await.unwrap();
    assert_eq!(ids(&stored), ids(&[p2, p3, p4]));
}

#[tokio::test]
async fn identical_reassignment_writes_nothing_and_keeps_caches() {
    let db = inmem_db().await;
    let role_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

    seed_role(&db, role_id, None, false).await;
    seed_user(&db, user_id, None).await;
    seed_user_role(&db, user_id, role_id).await;

    let (services, cache) = build_services(db, ServiceConfig::default());
    let actor = ActorContext::platform(Uuid::new_v4());

    services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p1, p2])
        .await
        .unwrap();
    assert_eq!(cache.evicted().len(), 1);

    // Same set again, different order with a duplicate thrown in.
    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p2, p1, p1])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.cache_evictions, 0);
    assert_eq!(cache.evicted().len(), 1);

    let stored = services.grants.role_permission_ids(role_id).await.unwrap();
    assert_eq!(ids(&stored), ids(&[p1, p2]));
}

#[tokio::test]
async fn missing_or_deleted_roles_are_rejected() {
    let db = inmem_db().await;
    let deleted_role = Uuid::new_v4();
    seed_role(&db, deleted_role, None, true).await;

    let (services, cache) = build_services(db, ServiceConfig::default());
    let actor = ActorContext::platform(Uuid::new_v4());

    let err = services
        .grants
        .assign_role_permissions(&actor, Uuid::new_v4(), vec![Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RoleNotFound { .. }));

    let err = services
        .grants
        .assign_role_permissions(&actor, deleted_role, vec![Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::RoleNotFound { .. }));
    assert!(err.to_string().contains("does not exist or was deleted"));

    assert!(cache.evicted().is_empty());
    let stored = services
        .grants
        .role_permission_ids(deleted_role)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn tenant_actor_is_limited_to_the_tenant_allowance() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();
    let (p_allowed, p_outside) = (Uuid::new_v4(), Uuid::new_v4());

    seed_role(&db, role_id, Some(tenant_id), false).await;

    let (services, _cache) = build_services(db, ServiceConfig { tenant_mode: true });

    services
        .grants
        .assign_tenant_permissions(tenant_id, vec![p_allowed])
        .await
        .unwrap();

    let actor = ActorContext::tenant(Uuid::new_v4(), tenant_id);
    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p_allowed, p_outside])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.dropped, vec![p_outside]);

    let stored = services.grants.role_permission_ids(role_id).await.unwrap();
    assert_eq!(ids(&stored), ids(&[p_allowed]));
}

#[tokio::test]
async fn platform_actor_bypasses_the_allowance() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();
    let p_outside = Uuid::new_v4();

    seed_role(&db, role_id, Some(tenant_id), false).await;

    let (services, _cache) = build_services(db, ServiceConfig { tenant_mode: true });

    let actor = ActorContext::platform(Uuid::new_v4());
    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p_outside])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 1);
    assert!(outcome.dropped.is_empty());
}

#[tokio::test]
async fn allowance_is_ignored_when_tenant_mode_is_off() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();
    let p_outside = Uuid::new_v4();

    seed_role(&db, role_id, Some(tenant_id), false).await;

    let (services, _cache) = build_services(db, ServiceConfig::default());

    let actor = ActorContext::tenant(Uuid::new_v4(), tenant_id);
    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p_outside])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 1);
    assert!(outcome.dropped.is_empty());
}

#[tokio::test]
async fn platform_roles_scope_by_the_actor_tenant() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();
    let (p_allowed, p_outside) = (Uuid::new_v4(), Uuid::new_v4());

    seed_role(&db, role_id, None, false).await;

    let (services, _cache) = build_services(db, ServiceConfig { tenant_mode: true });

    services
        .grants
        .assign_tenant_permissions(tenant_id, vec![p_allowed])
        .await
        .unwrap();

    let actor = ActorContext::tenant(Uuid::new_v4(), tenant_id);
    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p_allowed, p_outside])
        .await
        .unwrap();

    assert_eq!(outcome.dropped, vec![p_outside]);
    let stored = services.grants.role_permission_ids(role_id).await.unwrap();
    assert_eq!(ids(&stored), ids(&[p_allowed]));
}

#[tokio::test]
async fn tenant_assignment_evicts_every_tenant_user() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let (member_a, member_b, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

    seed_user(&db, member_a, Some(tenant_id)).await;
    seed_user(&db, member_b, Some(tenant_id)).await;
    seed_user(&db, outsider, None).await;

    let (services, cache) = build_services(db, ServiceConfig { tenant_mode: true });

    let outcome = services
        .grants
        .assign_tenant_permissions(tenant_id, vec![p1, p2])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.cache_evictions, 2);

    let evicted = cache.evicted();
    assert!(evicted.contains(&user_permissions_key(member_a)));
    assert!(evicted.contains(&user_permissions_key(member_b)));
    assert!(!evicted.contains(&user_permissions_key(outsider)));

    let stored = services
        .grants
        .tenant_permission_ids(tenant_id)
        .await
        .unwrap();
    assert_eq!(ids(&stored), ids(&[p1, p2]));
}

#[tokio::test]
async fn tenant_revocation_cascades_into_role_grants() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let tenant_role = Uuid::new_v4();
    let platform_role = Uuid::new_v4();
    let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

    seed_role(&db, tenant_role, Some(tenant_id), false).await;
    seed_role(&db, platform_role, None, false).await;

    let (services, _cache) = build_services(db, ServiceConfig { tenant_mode: true });
    let platform = ActorContext::platform(Uuid::new_v4());

    services
        .grants
        .assign_tenant_permissions(tenant_id, vec![p1, p2])
        .await
        .unwrap();
    services
        .grants
        .assign_role_permissions(&platform, tenant_role, vec![p1, p2])
        .await
        .unwrap();
    services
        .grants
        .assign_role_permissions(&platform, platform_role, vec![p2])
        .await
        .unwrap();

    // Shrink the allowance to p1; the tenant's roles must lose p2 with it.
    let outcome = services
        .grants
        .assign_tenant_permissions(tenant_id, vec![p1])
        .await
        .unwrap();

    assert_eq!(outcome.removed, 1);
    assert_eq!(outcome.inserted, 0);

    let tenant_stored = services
        .grants
        .tenant_permission_ids(tenant_id)
        .await
        .unwrap();
    assert_eq!(ids(&tenant_stored), ids(&[p1]));

    let role_stored = services
        .grants
        .role_permission_ids(tenant_role)
        .await
        .unwrap();
    assert_eq!(ids(&role_stored), ids(&[p1]));

    // Roles outside the tenant keep their grants.
    let platform_stored = services
        .grants
        .role_permission_ids(platform_role)
        .await
        .unwrap();
    assert_eq!(ids(&platform_stored), ids(&[p2]));
}

#[tokio::test]
async fn identical_tenant_assignment_writes_nothing() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let member = Uuid::new_v4();
    let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

    seed_user(&db, member, Some(tenant_id)).await;

    let (services, cache) = build_services(db, ServiceConfig { tenant_mode: true });

    services
        .grants
        .assign_tenant_permissions(tenant_id, vec![p1, p2])
        .await
        .unwrap();
    assert_eq!(cache.evicted().len(), 1);

    let outcome = services
        .grants
        .assign_tenant_permissions(tenant_id, vec![p2, p1])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.cache_evictions, 0);
    assert_eq!(cache.evicted().len(), 1);
}

#[tokio::test]
async fn unresolvable_tenant_store_is_rejected() {
    let db = inmem_db().await;
    let tenant_id = Uuid::new_v4();
    let cache = Arc::new(RecordingCache::default());
    let services = build_services_with(
        db,
        ServiceConfig { tenant_mode: true },
        Arc::new(UnknownTenantResolver),
        cache.clone(),
    );

    let err = services
        .grants
        .assign_tenant_permissions(tenant_id, vec![Uuid::new_v4()])
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::TenantUnavailable { .. }));
    assert!(cache.evicted().is_empty());

    let stored = services
        .grants
        .tenant_permission_ids(tenant_id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn eviction_failure_does_not_fail_the_assignment() {
    let db = inmem_db().await;
    let role_id = Uuid::new_v4();
    let (user_a, user_b) = (Uuid::new_v4(), Uuid::new_v4());
    let p1 = Uuid::new_v4();

    seed_role(&db, role_id, None, false).await;
    seed_user(&db, user_a, None).await;
    seed_user(&db, user_b, None).await;
    seed_user_role(&db, user_a, role_id).await;
    seed_user_role(&db, user_b, role_id).await;

    let cache = Arc::new(RecordingCache::failing_on(vec![user_permissions_key(
        user_a,
    )]));
    let services = build_services_with(
        db,
        ServiceConfig::default(),
        Arc::new(SingleDatabaseResolver),
        cache.clone(),
    );

    let actor = ActorContext::platform(Uuid::new_v4());
    let outcome = services
        .grants
        .assign_role_permissions(&actor, role_id, vec![p1])
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.cache_evictions, 2);
    assert_eq!(cache.evicted(), vec![user_permissions_key(user_b)]);

    let stored = services.grants.role_permission_ids(role_id).await.unwrap();
    assert_eq!(ids(&stored), ids(&[p1]));
}
