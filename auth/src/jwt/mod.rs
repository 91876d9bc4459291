pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::AccessClaims;
pub use claims::RevocationClaims;
pub use claims::TOKEN_USE_ACCESS;
pub use codec::TokenCodec;
pub use errors::TokenError;
