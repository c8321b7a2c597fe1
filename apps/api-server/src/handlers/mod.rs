//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod badges;
mod health;
mod posts;
mod views;

use actix_web::{HttpRequest, HttpResponse, web};

use board_shared::ErrorResponse;

use crate::observability::RequestId;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Authenticated routes
            .route("/badges", web::get().to(badges::catalog))
            .route("/badges/mine", web::get().to(badges::mine))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::search))
                    .route("", web::post().to(posts::submit))
                    .route("/mine", web::get().to(posts::mine))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}/vote", web::post().to(posts::vote))
                    .route("/{id}/report", web::post().to(posts::report)),
            )
            // Admin routes
            .service(
                web::scope("/admin")
                    .route("/users", web::post().to(admin::create_account))
                    .route("/posts", web::post().to(admin::publish))
                    .route("/posts/pending", web::get().to(admin::pending))
                    .route("/posts/{id}/approve", web::post().to(admin::approve))
                    .route("/posts/{id}/decline", web::post().to(admin::decline))
                    .route("/posts/{id}/reports", web::get().to(admin::reports)),
            ),
    )
    .default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found(format!("No route for {} {}", req.method(), req.path()))
            .with_request_id(request_id.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    use board_core::BoardPolicy;
    use board_core::domain::{Role, User};
    use board_core::ports::{AuthError, PasswordService, UserRepository};
    use board_infra::{InMemoryStore, JwtConfig, JwtTokenService};

    use crate::state::{AppState, Storage, memory_repositories};

    struct PlainPasswords;

    impl PasswordService for PlainPasswords {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("plain:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(hash == format!("plain:{password}"))
        }

        fn generate_temporary(&self, length: usize) -> String {
            "t".repeat(length)
        }
    }

    struct Harness {
        store: Arc<InMemoryStore>,
        state: AppState,
    }

    impl Harness {
        fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            let state = AppState::assemble(
                memory_repositories(store.clone()),
                BoardPolicy::default(),
                Arc::new(JwtTokenService::new(JwtConfig::default())),
                Arc::new(PlainPasswords),
                Storage::Memory,
            );
            Self { store, state }
        }

        /// Seed a user directly and return a bearer header for them.
        async fn bearer(&self, email: &str, role: Role) -> String {
            let users: &dyn UserRepository = self.store.as_ref();
            let user = users
                .save(User::new(
                    email.into(),
                    "Member".into(),
                    "plain:password123".into(),
                    role,
                ))
                .await
                .unwrap();
            let token = self
                .state
                .tokens
                .generate_token(user.id, &user.email, user.role)
                .unwrap();
            format!("Bearer {token}")
        }
    }

    macro_rules! init_app {
        ($harness:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($harness.state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn test_register_login_and_profile() {
        let harness = Harness::new();
        let app = init_app!(harness);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"email": "Member@Example.com", "password": "password123"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "member@example.com", "password": "password123"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["token_type"], "Bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me["email"], "member@example.com");
        assert_eq!(me["points"], 0);
    }

    #[actix_rt::test]
    async fn test_protected_routes_require_a_token() {
        let harness = Harness::new();
        let app = init_app!(harness);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_submit_approve_and_vote() {
        let harness = Harness::new();
        let author = harness.bearer("author@example.com", Role::User).await;
        let voter = harness.bearer("voter@example.com", Role::User).await;
        let admin = harness.bearer("admin@example.com", Role::Admin).await;
        let app = init_app!(harness);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", author.clone()))
            .set_json(json!({"category": "Facilities", "content": "Fix the fountain"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let post: Value = test::read_body_json(res).await;
        assert_eq!(post["status"], "Pending");
        let post_id = post["id"].as_str().unwrap().to_string();

        // Pending posts cannot be voted on.
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/vote"))
            .insert_header(("Authorization", voter.clone()))
            .set_json(json!({"vote_type": "up"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/posts/{post_id}/approve"))
            .insert_header(("Authorization", admin))
            .set_json(json!({"message": "Thanks!"}))
            .to_request();
        let approved: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(approved["data"]["status"], "Approved");
        assert_eq!(approved["data"]["review_msg"], "Thanks!");

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/vote"))
            .insert_header(("Authorization", voter.clone()))
            .set_json(json!({"vote_type": "up"}))
            .to_request();
        let vote: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(vote["vote_type"], "upvote");
        assert_eq!(vote["upvotes"], 1);
        assert_eq!(vote["points"], 1);
        assert_eq!(vote["badges_awarded"][0]["code"], "first_vote");

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(("Authorization", voter.clone()))
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed[0]["my_vote"], "upvote");
        assert!(listed[0].get("created_by").is_none());

        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/vote"))
            .insert_header(("Authorization", voter))
            .set_json(json!({"vote_type": "up"}))
            .to_request();
        let retracted: Value = test::call_and_read_body_json(&app, req).await;
        assert!(retracted["vote_type"].is_null());
        assert_eq!(retracted["upvotes"], 0);
        assert_eq!(retracted["points"], 0);
    }

    #[actix_rt::test]
    async fn test_reports_auto_decline_at_threshold() {
        let harness = Harness::new();
        let admin = harness.bearer("admin@example.com", Role::Admin).await;
        let author = harness.bearer("author@example.com", Role::User).await;
        let mut reporters = Vec::new();
        for n in 0..3 {
            reporters.push(harness.bearer(&format!("r{n}@example.com"), Role::User).await);
        }
        let app = init_app!(harness);

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", author))
            .set_json(json!({"category": "Events", "content": "Spam spam spam"}))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        let post_id = post["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/posts/{post_id}/approve"))
            .insert_header(("Authorization", admin.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let mut last = Value::Null;
        for reporter in &reporters {
            let req = test::TestRequest::post()
                .uri(&format!("/api/posts/{post_id}/report"))
                .insert_header(("Authorization", reporter.clone()))
                .set_json(json!({"reason": "spam"}))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::CREATED);
            last = test::read_body_json(res).await;
        }
        assert_eq!(last["auto_declined"], true);
        assert_eq!(last["status"], "Declined");
        assert_eq!(last["report_count"], 0);

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/posts/{post_id}/reports"))
            .insert_header(("Authorization", admin))
            .to_request();
        let reports: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(reports.as_array().map(Vec::len), Some(0));
    }

    #[actix_rt::test]
    async fn test_admin_routes_reject_regular_users() {
        let harness = Harness::new();
        let member = harness.bearer("member@example.com", Role::User).await;
        let app = init_app!(harness);

        let req = test::TestRequest::get()
            .uri("/api/admin/posts/pending")
            .insert_header(("Authorization", member))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_admin_creates_account() {
        let harness = Harness::new();
        let admin = harness.bearer("admin@example.com", Role::Admin).await;
        let app = init_app!(harness);

        let req = test::TestRequest::post()
            .uri("/api/admin/users")
            .insert_header(("Authorization", admin))
            .set_json(json!({"email": "new@example.com", "name": "Newcomer"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["user"]["role"], "user");
        assert_eq!(body["temporary_password"], "tttttttttt");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "new@example.com", "password": "tttttttttt"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_rt::test]
    async fn test_repeated_failed_logins_lock_the_account() {
        let harness = Harness::new();
        harness.bearer("member@example.com", Role::User).await;
        let app = init_app!(harness);

        let attempt = |password: &str| {
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "member@example.com", "password": password}))
                .to_request()
        };

        for _ in 0..2 {
            let res = test::call_service(&app, attempt("wrong-password")).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }
        let res = test::call_service(&app, attempt("wrong-password")).await;
        assert_eq!(res.status(), StatusCode::LOCKED);

        let res = test::call_service(&app, attempt("password123")).await;
        assert_eq!(res.status(), StatusCode::LOCKED);
    }

    #[actix_rt::test]
    async fn test_unknown_route_is_problem_json() {
        let harness = Harness::new();
        let app = init_app!(harness);

        let req = test::TestRequest::get().uri("/api/nowhere").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], 404);
        assert!(body["request_id"].is_string());
    }

    #[actix_rt::test]
    async fn test_badge_catalog_lists_every_milestone() {
        let harness = Harness::new();
        let member = harness.bearer("member@example.com", Role::User).await;
        let app = init_app!(harness);

        let req = test::TestRequest::get()
            .uri("/api/badges")
            .insert_header(("Authorization", member))
            .to_request();
        let catalog: Value = test::call_and_read_body_json(&app, req).await;

        let thresholds: Vec<u64> = catalog
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|b| b["threshold"].as_u64())
            .collect();
        assert_eq!(thresholds.len(), 9);
        assert!(thresholds.iter().all(|t| [1, 10, 50].contains(t)));
    }
}
