//! Adapter boundary to the external authentication service.
//!
//! Handlers only see the [`SessionProvider`] trait and the [`Session`] it
//! returns. [`HttpSessionProvider`] talks to a better-auth compatible service
//! and is configured by the immutable [`AuthConfig`].

pub mod config;
pub mod http;
pub mod provider;
pub mod session;

pub use self::config::{
    AdditionalField, AuthConfig, ConfigError, DEFAULT_ROLE, EmailAndPassword, FieldType, ROLE_FIELD,
    SocialProvider,
};
pub use self::http::HttpSessionProvider;
pub use self::provider::{
    EmailCredentials, ProviderError, ProviderReply, SessionProvider, SharedProvider, SocialRedirect,
};
pub use self::session::{Session, User};
