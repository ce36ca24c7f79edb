pub mod digest;
pub mod password;
pub mod token;

pub use digest::TokenDigest;
pub use password::CredentialHasher;
pub use token::remember_token;
