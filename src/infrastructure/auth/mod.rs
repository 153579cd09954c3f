mod shared_secret_verifier;

pub use shared_secret_verifier::SharedSecretVerifier;
