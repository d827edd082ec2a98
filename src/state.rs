use dashmap::DashMap;
use uuid::Uuid;

use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::config::Config;
use crate::engine::ranking::Ranker;
use crate::engine::weight::build_resolver;
use crate::error::AppError;
use crate::models::booking::Booking;
use crate::models::capster::Capster;
use crate::models::category::Category;
use crate::models::payment_method::PaymentMethod;
use crate::models::request::Request;
use crate::models::service::Service;
use crate::models::template::Template;
use crate::models::user::User;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub users: DashMap<Uuid, User>,
    pub capsters: DashMap<Uuid, Capster>,
    pub services: DashMap<Uuid, Service>,
    pub payment_methods: DashMap<Uuid, PaymentMethod>,
    pub bookings: DashMap<Uuid, Booking>,
    pub categories: DashMap<Uuid, Category>,
    pub templates: DashMap<Uuid, Template>,
    pub requests: DashMap<Uuid, Request>,
    pub ranker: Ranker,
    pub tokens: TokenService,
    pub passwords: PasswordHasher,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let resolver = build_resolver(config.weight_policy, &config.type_weights);
        let ranker = Ranker::new(resolver, config.coefficients, config.horizon_days)
            .map_err(|err| AppError::Internal(err.to_string()))?;

        Ok(Self {
            users: DashMap::new(),
            capsters: DashMap::new(),
            services: DashMap::new(),
            payment_methods: DashMap::new(),
            bookings: DashMap::new(),
            categories: DashMap::new(),
            templates: DashMap::new(),
            requests: DashMap::new(),
            ranker,
            tokens: TokenService::new(&config.jwt_secret, config.token_ttl_hours),
            passwords: PasswordHasher::new(config.password_hash_iterations),
            metrics: Metrics::new(),
        })
    }
}
