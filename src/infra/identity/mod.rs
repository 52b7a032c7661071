pub mod local_identity_provider;
