//! Shared application state passed to every handler.

use std::sync::Arc;

use parlor_auth::{PasswordHasher, PasswordValidator, SessionStore};
use parlor_core::config::AppConfig;
use parlor_database::UserStore;
use parlor_service::{ProfileCoordinator, ProfileImageManager, UserService};
use parlor_storage::{ProfileImageStore, RasterCodec};

/// Handles to every service the routes need. Cloned per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Server-side sessions.
    pub sessions: SessionStore,
    /// Account operations.
    pub user_service: Arc<UserService>,
    /// Profile updates that may swap the image.
    pub profiles: Arc<ProfileCoordinator>,
    /// Profile image creation and serving.
    pub profile_images: Arc<ProfileImageManager>,
}

impl AppState {
    /// Wire services on top of a user store.
    pub fn new(config: AppConfig, users: Arc<dyn UserStore>) -> Self {
        let hasher = Arc::new(PasswordHasher::new());
        let validator = Arc::new(PasswordValidator::new(&config.auth));

        let store = ProfileImageStore::new(&config.profile_images.root_dir);
        let profile_images = Arc::new(ProfileImageManager::new(
            store,
            Arc::new(RasterCodec::new()),
            config.profile_images.max_concurrent_jobs,
        ));

        Self {
            sessions: SessionStore::new(&config.session),
            user_service: Arc::new(UserService::new(users.clone(), hasher, validator)),
            profiles: Arc::new(ProfileCoordinator::new(users, profile_images.clone())),
            profile_images,
            config: Arc::new(config),
        }
    }
}
