//! # social-core
//!
//! Core services of a social-network API client, bound into a
//! [`ferrous_container`] provider by [`CoreModule`].
//!
//! ```
//! use ferrous_container::{Container, Resolver};
//! use social_core::{ClientSettings, CoreModule, TweetSearchParameters, QueryParameters};
//!
//! let container = Container::new();
//! container.initialize(&CoreModule::new()).unwrap();
//!
//! let settings = container.get_required::<ClientSettings>();
//! assert!(!settings.values().show_debug);
//!
//! let mut search = container.get_owned::<TweetSearchParameters>().unwrap();
//! search.search_query = "rust".to_string();
//! assert_eq!(search.query_pairs()[0], ("q".to_string(), "rust".to_string()));
//! ```

pub mod errors;
pub mod events;
pub mod factory;
pub mod helpers;
pub mod message;
pub mod parameters;
pub mod settings;
pub mod tasks;

mod module;

pub use errors::{ApiError, ApiErrorFactory, ErrorDetail, SingleErrorUnwrapper};
pub use events::{AfterQueryArgs, BeforeQueryArgs, ClientEvents, Handler, WeakEvent, WeakEvents};
pub use factory::{Factories, Factory};
pub use helpers::{HttpUtility, ThreadHelper};
pub use message::{
    DtoUserFactory, Message, MessageController, MessageDto, MessageError, MessageFactory, User, UserDto, UserFactory,
};
pub use module::CoreModule;
pub use parameters::*;
pub use settings::{ClientDefaults, ClientSettings, SettingsAccessor};
pub use tasks::{SynchronousInvoker, TaskError, TaskFactory};
