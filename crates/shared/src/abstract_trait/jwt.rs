use crate::{
    domain::{Identity, Role},
    errors::ServiceError,
};
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

pub trait JwtServiceTrait {
    fn generate_token(
        &self,
        subject_id: &str,
        role: Role,
        token_type: &str,
    ) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str, expected_type: &str) -> Result<Identity, ServiceError>;
}
