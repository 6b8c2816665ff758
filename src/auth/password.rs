use crate::error::AppError;

// Verification reads the cost out of the digest, so raising this only
// affects passwords hashed afterwards.
const COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, COST).map_err(AppError::from)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hash).map_err(AppError::from)
}
