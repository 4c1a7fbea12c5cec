use std::sync::Arc;

use ferrous_container::{DiResult, Lifetime, Resolver, ServiceCollection, ServiceModule};

use crate::errors::{ApiErrorFactory, SingleErrorUnwrapper};
use crate::events::{ClientEvents, WeakEvents};
use crate::factory::Factories;
use crate::helpers::{HttpUtility, ThreadHelper};
use crate::message::{DtoUserFactory, MessageFactory, UserFactory};
use crate::parameters::{
    AccountSettingsParameters, CustomRequestParameters, GeoCode, HomeTimelineParameters,
    LatestMessagesReceivedParameters, LatestMessagesSentParameters, ListIdentifier, ListUpdateParameters,
    MentionsTimelineParameters, PublishTweetParameters, RetweetsOfMeTimelineParameters, TweetIdentifier,
    TweetSearchParameters, TweetsFromListParameters, TweetsFromListQuery, UserIdentifier, UserSearchParameters,
    UserTimelineParameters,
};
use crate::settings::{ClientDefaults, ClientSettings, SettingsAccessor};
use crate::tasks::{SynchronousInvoker, TaskFactory};

/// Default bindings of the client core.
///
/// `MessageFactory` needs a `dyn MessageController`, which the application
/// registers itself; everything else is bound here.
#[derive(Debug, Clone, Default)]
pub struct CoreModule {
    defaults: ClientDefaults,
}

impl CoreModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `defaults` as the application settings instead of the built-in ones.
    pub fn with_defaults(defaults: ClientDefaults) -> Self {
        Self { defaults }
    }

    fn register_infrastructure(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.register_generic::<Factories>(Lifetime::Transient)?;
        services.add_per_thread_factory::<ThreadHelper, _>(|_| ThreadHelper::new());
        services.add_singleton(HttpUtility::new());
        services.add_singleton(TaskFactory::new());
        services.add_singleton(SynchronousInvoker::new());
        Ok(())
    }

    fn register_settings(&self, services: &mut ServiceCollection) -> DiResult<()> {
        let defaults = self.defaults.clone();
        services
            .add_options::<ClientDefaults>()
            .default_with(move || defaults.clone())
            .validate(ClientDefaults::check)
            .register();

        services.register::<SettingsAccessor, _>(Lifetime::Singleton, SettingsAccessor::from_options)?;
        services.register::<ClientSettings, _>(Lifetime::PerThread, |r| {
            let accessor = r.get::<SettingsAccessor>()?;
            Ok(ClientSettings::new(accessor.application_settings()))
        })?;
        Ok(())
    }

    fn register_events(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.register_generic::<WeakEvents>(Lifetime::Transient)?;
        services.register::<ClientEvents, _>(Lifetime::Singleton, ClientEvents::resolve)?;
        Ok(())
    }

    fn register_errors(&self, services: &mut ServiceCollection) {
        services.add_transient_factory::<ApiErrorFactory, _>(|_| ApiErrorFactory::new());
        services.add_singleton(SingleErrorUnwrapper::new());
    }

    fn register_parameters(&self, services: &mut ServiceCollection) -> DiResult<()> {
        add_parameters::<CustomRequestParameters>(services);
        add_parameters::<TweetIdentifier>(services);
        add_parameters::<UserIdentifier>(services);
        add_parameters::<ListIdentifier>(services);
        add_parameters::<GeoCode>(services);
        add_parameters::<ListUpdateParameters>(services);
        add_parameters::<TweetsFromListParameters>(services);
        add_parameters::<TweetSearchParameters>(services);
        add_parameters::<UserSearchParameters>(services);
        add_parameters::<PublishTweetParameters>(services);
        add_parameters::<AccountSettingsParameters>(services);
        add_parameters::<HomeTimelineParameters>(services);
        add_parameters::<UserTimelineParameters>(services);
        add_parameters::<MentionsTimelineParameters>(services);
        add_parameters::<RetweetsOfMeTimelineParameters>(services);
        add_parameters::<LatestMessagesReceivedParameters>(services);
        add_parameters::<LatestMessagesSentParameters>(services);

        services.register::<TweetsFromListQuery, _>(Lifetime::Transient, |r| TweetsFromListQuery::resolve(r))?;
        Ok(())
    }

    fn register_messages(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.add_singleton_trait::<dyn UserFactory>(Arc::new(DtoUserFactory));
        services.register::<MessageFactory, _>(Lifetime::Transient, MessageFactory::resolve)?;
        Ok(())
    }
}

impl ServiceModule for CoreModule {
    fn name(&self) -> &'static str {
        "social-core"
    }

    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
        self.register_infrastructure(services)?;
        self.register_settings(services)?;
        self.register_events(services)?;
        self.register_errors(services);
        self.register_parameters(services)?;
        self.register_messages(services)?;
        tracing::debug!(services = services.len(), "core services registered");
        Ok(())
    }
}

fn add_parameters<T: Default + Send + Sync + 'static>(services: &mut ServiceCollection) {
    services.add_transient_factory::<T, _>(|_| T::default());
}
