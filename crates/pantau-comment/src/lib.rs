#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod comment;
mod composer;
mod error;
mod flags;
mod normalize;
mod notify;
mod payload;
mod reaction;
mod resource;
mod section;
mod service;
mod session;
mod store;
mod transport;

pub mod endpoint;
pub mod thread;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use comment::UniversalComment;
pub use composer::{CommentPolicy, Draft, DraftKey, ReplyComposer};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use flags::{InFlightGuard, InFlightSet};
pub use normalize::{ANONYMOUS_NAME, normalize, normalize_list, parse_count};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use payload::{CommentBody, ReactionBody, ReactionKind};
pub use reaction::ReactionController;
pub use resource::{ResourceRef, ResourceType};
pub use section::CommentSection;
pub use service::CommentApi;
pub use session::{Biografi, Session, User};
pub use store::CommentStore;
pub use transport::{ApiRequest, CommentTransport, Method};

/// Tracing target for comment API requests.
pub const TRACING_TARGET: &str = "pantau_comment";
