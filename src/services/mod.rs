//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod qr;
pub mod seed;
pub mod stats;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub stats: stats::StatsService,
    pub qr: qr::QrService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            qr: qr::QrService::new(repository.clone(), config.server.public_url.clone()),
            repository,
        }
    }
}
