// crates/gitlab-gate-client/src/lib.rs
// ============================================================================
// Module: GitLab Gate Client Library
// Description: Backend collaborator for the GitLab REST API.
// Purpose: Isolate HTTP transport, auth, and response limits from dispatch.
// Dependencies: async-trait, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! The gateway core talks to GitLab only through the [`GitlabBackend`] trait.
//! Requests are described as data ([`ApiRequest`], [`FileWrite`],
//! [`UploadRequest`]) so dispatch can be planned and tested without a network.
//! [`GitlabClient`] is the production implementation over `reqwest`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod backend;
pub mod client;
pub mod request;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use backend::BackendError;
pub use backend::GitlabBackend;
pub use client::GitlabClient;
pub use request::ApiMethod;
pub use request::ApiRequest;
pub use request::FileWrite;
pub use request::UploadRequest;
