//! Benchmarks for the authorization decision path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use taskgate_core::config::AuthzConfig;
use taskgate_core::rbac::{
    can, can_all, decide, Actor, AuthorizationContext, Authorizer, DecisionRequest,
    OrganizationId, Permission, ResourceDescriptor, ResourceType, Role, UserId,
};

/// Freshly generated UUID identifiers.
struct Fixture {
    user: UserId,
    org: OrganizationId,
    other_org: OrganizationId,
}

impl Fixture {
    fn new() -> Self {
        Self {
            user: UserId::from_uuid(),
            org: OrganizationId::from_uuid(),
            other_org: OrganizationId::from_uuid(),
        }
    }

    fn member(&self, role: Role) -> AuthorizationContext {
        AuthorizationContext::new(
            Actor::new(self.user.clone(), "bench@example.com").with_membership(self.org.clone(), role),
        )
    }
}

fn bench_can(c: &mut Criterion) {
    let mut group = c.benchmark_group("can");
    let fx = Fixture::new();

    let no_resource = fx.member(Role::Member);
    group.bench_function("role_grant_only", |b| {
        b.iter(|| black_box(can(black_box(Permission::TaskCreate), &no_resource)))
    });

    let own = fx
        .member(Role::Member)
        .with_resource(ResourceDescriptor::task(fx.org.clone()).created_by(fx.user.clone()));
    group.bench_function("own_refiner", |b| {
        b.iter(|| black_box(can(black_box(Permission::TaskUpdateOwn), &own)))
    });

    let cross = fx
        .member(Role::Owner)
        .with_resource(ResourceDescriptor::project(fx.other_org.clone()));
    group.bench_function("cross_tenant_deny", |b| {
        b.iter(|| black_box(can(black_box(Permission::ProjectView), &cross)))
    });

    let system =
        AuthorizationContext::system().with_resource(ResourceDescriptor::organization(fx.other_org.clone()));
    group.bench_function("system_bypass", |b| {
        b.iter(|| black_box(can(black_box(Permission::OrganizationDelete), &system)))
    });

    group.finish();
}

fn bench_can_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("can_all");
    let fx = Fixture::new();
    let ctx = fx.member(Role::Owner).with_resource(ResourceDescriptor::task(fx.org.clone()));

    for size in [1usize, 9, 27] {
        let permissions: Vec<Permission> = Permission::ALL.into_iter().take(size).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &permissions, |b, perms| {
            b.iter(|| black_box(can_all(perms.iter().copied(), &ctx)))
        });
    }
    group.finish();
}

fn bench_authorizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("authorizer");
    let fx = Fixture::new();
    let ctx = fx.member(Role::Admin).with_resource(ResourceDescriptor::task(fx.org.clone()));

    let quiet = Authorizer::new(AuthzConfig {
        audit_decisions: false,
        record_metrics: false,
    });
    group.bench_function("quiet", |b| {
        b.iter(|| black_box(quiet.check(black_box(Permission::TaskDelete), &ctx)))
    });

    let observed = Authorizer::default();
    group.bench_function("observed", |b| {
        b.iter(|| black_box(observed.check(black_box(Permission::TaskDelete), &ctx)))
    });

    group.finish();
}

fn bench_decide(c: &mut Criterion) {
    let fx = Fixture::new();
    let request = DecisionRequest::new(Permission::CommentDeleteOwn, fx.user.as_str())
        .membership(fx.org.as_str(), Role::Member)
        .resource(ResourceType::Comment, fx.org.as_str())
        .created_by(fx.user.as_str());

    c.bench_function("decide_request", |b| {
        b.iter(|| black_box(decide(black_box(&request))))
    });
}

criterion_group!(benches, bench_can, bench_can_all, bench_authorizer, bench_decide);
criterion_main!(benches);
