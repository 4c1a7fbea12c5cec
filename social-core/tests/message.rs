use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use ferrous_container::{Container, DiResult, Resolver, ServiceCollection, ServiceModule};
use parking_lot::Mutex;
use social_core::{
    CoreModule, DtoUserFactory, MessageController, MessageDto, MessageError, MessageFactory, User, UserDto,
    UserFactory,
};

/// Records what was sent and answers with a published copy.
#[derive(Default)]
struct FakeController {
    published: Mutex<Vec<MessageDto>>,
    destroyed: AtomicUsize,
    refuse: bool,
}

impl MessageController for FakeController {
    fn publish_message(&self, message: &MessageDto) -> Option<MessageDto> {
        if self.refuse {
            return None;
        }
        self.published.lock().push(message.clone());
        Some(MessageDto {
            id: 1000 + message.text.len() as u64,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            sender_id: 1,
            sender_screen_name: "me".to_string(),
            sender: Some(user_dto(1, "me")),
            is_published: true,
            ..message.clone()
        })
    }

    fn destroy_message(&self, message: &MessageDto) -> bool {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
        message.is_published
    }
}

struct ControllerModule(Arc<FakeController>);

impl ServiceModule for ControllerModule {
    fn name(&self) -> &'static str {
        "fake-controller"
    }

    fn register_services(&self, services: &mut ServiceCollection) -> DiResult<()> {
        services.add_singleton_trait::<dyn MessageController>(self.0.clone());
        Ok(())
    }
}

fn user_dto(id: u64, screen_name: &str) -> UserDto {
    UserDto {
        id,
        screen_name: screen_name.to_string(),
        name: screen_name.to_uppercase(),
    }
}

fn user(id: u64, screen_name: &str) -> User {
    DtoUserFactory.user_from_dto(&user_dto(id, screen_name))
}

fn setup(controller: FakeController) -> (Container, Arc<FakeController>) {
    let controller = Arc::new(controller);
    let container = Container::new();
    container
        .initialize_all(&[&CoreModule::new(), &ControllerModule(controller.clone())])
        .unwrap();
    (container, controller)
}

#[test]
fn sender_and_receiver_are_built_once() {
    let (container, _) = setup(FakeController::default());
    let factory = container.get_required::<MessageFactory>();

    let message = factory.create(MessageDto {
        id: 5,
        text: "hello".to_string(),
        sender: Some(user_dto(1, "me")),
        recipient: Some(user_dto(2, "you")),
        ..MessageDto::default()
    });

    let first = message.sender().unwrap();
    let second = message.sender().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.screen_name(), "me");
    assert_eq!(message.receiver().unwrap().name(), "YOU");
}

#[test]
fn publish_replaces_the_message_data() {
    let (container, controller) = setup(FakeController::default());
    let factory = container.get_required::<MessageFactory>();

    let mut message = factory.create_new("hello", Some(&user(2, "you")));
    assert!(matches!(message.sender(), Err(MessageError::MissingSender(0))));

    assert!(message.publish());
    assert!(message.is_published());
    assert_eq!(message.id(), 1005);
    assert_eq!(message.sender().unwrap().id(), 1);
    assert_eq!(message.receiver_screen_name(), "you");
    assert_eq!(controller.published.lock().len(), 1);
}

#[test]
fn publish_to_sets_the_recipient_first() {
    let (container, controller) = setup(FakeController::default());
    let mut message = container.get_required::<MessageFactory>().create_new("hey", None);

    assert!(message.publish_to(&user(3, "them")));
    assert_eq!(controller.published.lock()[0].recipient_id, 3);
    assert_eq!(message.receiver().unwrap(), &user(3, "them"));
}

#[test]
fn refused_publish_reports_failure() {
    let (container, _) = setup(FakeController {
        refuse: true,
        ..FakeController::default()
    });
    let mut message = container.get_required::<MessageFactory>().create_new("nope", None);

    assert!(!message.publish());
    assert!(!message.is_published());
}

#[test]
fn destroy_goes_through_the_controller() {
    let (container, controller) = setup(FakeController::default());
    let mut message = container.get_required::<MessageFactory>().create_new("bye", Some(&user(2, "you")));

    assert!(!message.destroy());
    message.publish();
    assert!(message.destroy());
    assert_eq!(controller.destroyed.load(Ordering::SeqCst), 2);
}

#[test]
fn equality_compares_id_text_and_users() {
    let (container, _) = setup(FakeController::default());
    let factory = container.get_required::<MessageFactory>();
    let dto = MessageDto {
        id: 8,
        text: "same".to_string(),
        sender: Some(user_dto(1, "me")),
        recipient: Some(user_dto(2, "you")),
        ..MessageDto::default()
    };

    let a = factory.create(dto.clone());
    let b = factory.create(dto.clone());
    assert_eq!(a, b);

    let mut c = factory.create(dto);
    c.set_recipient(Some(&user(4, "someone-else")));
    assert_ne!(a, c);
}

#[test]
fn display_prints_the_text() {
    let (container, _) = setup(FakeController::default());
    let message = container.get_required::<MessageFactory>().create_new("plain text", None);
    assert_eq!(message.to_string(), "plain text");
}

#[test]
fn message_factories_are_transient() {
    let (container, _) = setup(FakeController::default());
    let a = container.get_required::<MessageFactory>();
    let b = container.get_required::<MessageFactory>();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn publish_async_runs_through_the_task_factory() {
    let (container, controller) = setup(FakeController::default());
    let mut message = container.get_required::<MessageFactory>().create_new("later", None);

    assert_eq!(message.publish_to_async(&user(6, "async")).await, Ok(true));
    assert!(message.is_published());
    assert_eq!(message.id(), 1005);
    assert_eq!(message.receiver().unwrap().id(), 6);
    assert_eq!(controller.published.lock()[0].recipient_id, 6);
}

#[tokio::test]
async fn refused_publish_async_reports_failure() {
    let (container, _) = setup(FakeController {
        refuse: true,
        ..FakeController::default()
    });
    let mut message = container.get_required::<MessageFactory>().create_new("nope", None);

    assert_eq!(message.publish_async().await, Ok(false));
    assert!(!message.is_published());
}

#[tokio::test]
async fn destroy_async_goes_through_the_controller() {
    let (container, controller) = setup(FakeController::default());
    let mut message = container.get_required::<MessageFactory>().create_new("bye", None);

    assert!(message.publish_async().await.unwrap());
    assert_eq!(message.destroy_async().await, Ok(true));
    assert_eq!(controller.destroyed.load(Ordering::SeqCst), 1);
}
