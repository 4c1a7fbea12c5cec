//! Private messages between users.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ferrous_container::{DiError, DiResult, Resolver, ResolverContext};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::tasks::{TaskError, TaskFactory};

/// User data as received from the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDto {
    pub id: u64,
    pub screen_name: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct User {
    dto: UserDto,
}

impl User {
    pub fn id(&self) -> u64 {
        self.dto.id
    }

    pub fn screen_name(&self) -> &str {
        &self.dto.screen_name
    }

    pub fn name(&self) -> &str {
        &self.dto.name
    }

    pub fn dto(&self) -> &UserDto {
        &self.dto
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.dto.id == other.dto.id
    }
}

impl Eq for User {}

/// Turns user DTOs into [`User`] values.
pub trait UserFactory: Send + Sync {
    fn user_from_dto(&self, dto: &UserDto) -> User;
}

/// Default [`UserFactory`]: wraps the DTO as-is.
#[derive(Debug, Default)]
pub struct DtoUserFactory;

impl UserFactory for DtoUserFactory {
    fn user_from_dto(&self, dto: &UserDto) -> User {
        User { dto: dto.clone() }
    }
}

/// Message data as received from, or sent to, the API.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDto {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub sender_id: u64,
    pub sender_screen_name: String,
    pub sender: Option<UserDto>,
    pub recipient_id: u64,
    pub recipient_screen_name: String,
    pub recipient: Option<UserDto>,
    pub text: String,
    pub is_published: bool,
    pub is_destroyed: bool,
}

impl Default for MessageDto {
    fn default() -> Self {
        Self {
            id: 0,
            created_at: Utc::now(),
            sender_id: 0,
            sender_screen_name: String::new(),
            sender: None,
            recipient_id: 0,
            recipient_screen_name: String::new(),
            recipient: None,
            text: String::new(),
            is_published: false,
            is_destroyed: false,
        }
    }
}

/// Talks to the messaging endpoints. Supplied by the application.
pub trait MessageController: Send + Sync {
    /// Sends the message and returns it as published, or `None` if the API
    /// refused it.
    fn publish_message(&self, message: &MessageDto) -> Option<MessageDto>;

    fn destroy_message(&self, message: &MessageDto) -> bool;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    #[error("Message {0} has no sender")]
    MissingSender(u64),
    #[error("Message {0} has no recipient")]
    MissingRecipient(u64),
    #[error(transparent)]
    Container(#[from] DiError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// A message and the operations available on it.
pub struct Message {
    dto: MessageDto,
    users: Arc<dyn UserFactory>,
    controller: Arc<dyn MessageController>,
    tasks: Arc<TaskFactory>,
    sender: OnceCell<User>,
    receiver: OnceCell<User>,
}

impl Message {
    pub fn new(
        dto: MessageDto,
        users: Arc<dyn UserFactory>,
        controller: Arc<dyn MessageController>,
        tasks: Arc<TaskFactory>,
    ) -> Self {
        Self {
            dto,
            users,
            controller,
            tasks,
            sender: OnceCell::new(),
            receiver: OnceCell::new(),
        }
    }

    pub fn dto(&self) -> &MessageDto {
        &self.dto
    }

    pub fn id(&self) -> u64 {
        self.dto.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.dto.created_at
    }

    pub fn text(&self) -> &str {
        &self.dto.text
    }

    pub fn sender_id(&self) -> u64 {
        self.dto.sender_id
    }

    pub fn sender_screen_name(&self) -> &str {
        &self.dto.sender_screen_name
    }

    pub fn receiver_id(&self) -> u64 {
        self.dto.recipient_id
    }

    pub fn receiver_screen_name(&self) -> &str {
        &self.dto.recipient_screen_name
    }

    pub fn is_published(&self) -> bool {
        self.dto.is_published
    }

    pub fn is_destroyed(&self) -> bool {
        self.dto.is_destroyed
    }

    /// The sender, built from the DTO on first access.
    pub fn sender(&self) -> Result<&User, MessageError> {
        self.sender.get_or_try_init(|| {
            self.dto
                .sender
                .as_ref()
                .map(|dto| self.users.user_from_dto(dto))
                .ok_or(MessageError::MissingSender(self.dto.id))
        })
    }

    /// The recipient, built from the DTO on first access.
    pub fn receiver(&self) -> Result<&User, MessageError> {
        self.receiver.get_or_try_init(|| {
            self.dto
                .recipient
                .as_ref()
                .map(|dto| self.users.user_from_dto(dto))
                .ok_or(MessageError::MissingRecipient(self.dto.id))
        })
    }

    /// Publishes the message. On success the published copy replaces the
    /// local data.
    pub fn publish(&mut self) -> bool {
        let published = self.controller.publish_message(&self.dto);
        self.apply_publish(published)
    }

    pub fn publish_to(&mut self, recipient: &User) -> bool {
        self.set_recipient(Some(recipient));
        self.publish()
    }

    pub fn destroy(&self) -> bool {
        self.controller.destroy_message(&self.dto)
    }

    /// [`publish`](Self::publish) run on the blocking pool of the current
    /// runtime.
    pub async fn publish_async(&mut self) -> Result<bool, MessageError> {
        let controller = self.controller.clone();
        let dto = self.dto.clone();
        let published = self.tasks.execute(move || controller.publish_message(&dto)).await?;
        Ok(self.apply_publish(published))
    }

    pub async fn publish_to_async(&mut self, recipient: &User) -> Result<bool, MessageError> {
        self.set_recipient(Some(recipient));
        self.publish_async().await
    }

    pub async fn destroy_async(&self) -> Result<bool, MessageError> {
        let controller = self.controller.clone();
        let dto = self.dto.clone();
        Ok(self.tasks.execute(move || controller.destroy_message(&dto)).await?)
    }

    fn apply_publish(&mut self, published: Option<MessageDto>) -> bool {
        match published {
            Some(published) => {
                tracing::debug!(id = published.id, "message published");
                self.dto = published;
                self.sender.take();
                self.receiver.take();
                true
            }
            None => {
                tracing::debug!(id = self.dto.id, "message was not published");
                false
            }
        }
    }

    /// Sets or clears the recipient.
    pub fn set_recipient(&mut self, recipient: Option<&User>) {
        match recipient {
            Some(user) => {
                self.dto.recipient_id = user.id();
                self.dto.recipient_screen_name = user.screen_name().to_string();
                self.dto.recipient = Some(user.dto().clone());
            }
            None => {
                self.dto.recipient_id = 0;
                self.dto.recipient_screen_name.clear();
                self.dto.recipient = None;
            }
        }
        self.receiver.take();
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
            && self.text() == other.text()
            && self.sender().ok() == other.sender().ok()
            && self.receiver().ok() == other.receiver().ok()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dto.text)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message").field("dto", &self.dto).finish_non_exhaustive()
    }
}

/// Builds [`Message`] values wired to the registered user factory and
/// message controller.
pub struct MessageFactory {
    users: Arc<dyn UserFactory>,
    controller: Arc<dyn MessageController>,
    tasks: Arc<TaskFactory>,
}

impl MessageFactory {
    pub fn new(users: Arc<dyn UserFactory>, controller: Arc<dyn MessageController>, tasks: Arc<TaskFactory>) -> Self {
        Self {
            users,
            controller,
            tasks,
        }
    }

    pub(crate) fn resolve(r: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(Self::new(
            r.get_trait::<dyn UserFactory>()?,
            r.get_trait::<dyn MessageController>()?,
            r.get::<TaskFactory>()?,
        ))
    }

    pub fn create(&self, dto: MessageDto) -> Message {
        Message::new(dto, self.users.clone(), self.controller.clone(), self.tasks.clone())
    }

    /// A draft addressed to `recipient`.
    pub fn create_new(&self, text: impl Into<String>, recipient: Option<&User>) -> Message {
        let mut message = self.create(MessageDto {
            text: text.into(),
            ..MessageDto::default()
        });
        message.set_recipient(recipient);
        message
    }
}
