//! # Inkwell API
//!
//! A blogging REST API built with Rust, Axum, and PostgreSQL: users write
//! articles, users comment on articles, administrators moderate both.
//!
//! ## Overview
//!
//! The routes themselves are thin, one parametrized SQL statement each. The
//! interesting part is the request-security chain in front of them:
//!
//! - **Authentication**: stateless HS256 JWTs carrying `{id, role}`
//! - **Authorization**: admin-only routes plus owner-or-admin checks on
//!   users, articles and comments
//! - **CSRF**: double-submit cookie/header matching on state-changing requests
//! - **Rate limiting**: fixed-window counters per client address, with a
//!   stricter policy on login attempts
//! - **CORS allowlist** and hardened response headers
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractors, role policy, CSRF, rate limits, headers
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Register and login
//! │   ├── users/       # User management
//! │   ├── articles/    # Articles and article search
//! │   └── comments/    # Comments on articles
//! ├── cli.rs            # `create-admin` command
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus metrics
//! ├── router.rs         # Route tree and layer stack
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validating extractors
//! ```
//!
//! Each feature module follows the same structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Database access
//! - `model.rs`: Rows and DTOs
//! - `router.rs`: Axum router configuration
//!
//! ## Request Pipeline
//!
//! ```text
//! logging → metrics → security headers → CORS
//!     → /api: CSRF → global rate limit → [login rate limit]
//!         → AuthUser / RequireAdmin extractors → ownership check → handler
//! ```
//!
//! ## Workspace Crates
//!
//! - `inkwell-core`: [`AppError`](inkwell_core::AppError) and password hashing
//! - `inkwell-config`: environment-driven configuration structs
//! - `inkwell-db`: connection pool bootstrap
//! - `inkwell-auth`: identities, roles and the JWT token service
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL=postgres://localhost/inkwell
//! export JWT_SECRET=change-me
//! cargo run
//!
//! # bootstrap an administrator
//! cargo run -- create-admin admin admin@example.com secret123
//! ```

pub mod cli;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use inkwell_auth;
pub use inkwell_config;
pub use inkwell_core;
pub use inkwell_db;
