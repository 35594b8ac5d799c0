use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::service::{AuthConfig, AuthService};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(
        repo.clone(),
        AuthConfig { jwt_secret: Some("secret".into()), password_algorithm: "argon2".into() },
    );

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _ = rt.block_on(svc.register(RegisterInput {
        username: "bench".into(),
        email: "bench@example.com".into(),
        password: "Benchmark1".into(),
        confirm_password: "Benchmark1".into(),
    }));

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt
                .block_on(svc.login(LoginInput {
                    email: "bench@example.com".into(),
                    password: "Benchmark1".into(),
                }))
                .unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
