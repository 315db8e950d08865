use std::sync::Arc;

use crate::auth::JwtVerifier;
use reelvault_core::Catalog;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn Catalog>,
    jwt: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, jwt: JwtVerifier) -> Self {
        Self {
            catalog,
            jwt: Arc::new(jwt),
        }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn jwt(&self) -> &JwtVerifier {
        &self.jwt
    }
}
