use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::credentials::errors::AuthError;
use crate::domain::credentials::models::GoogleProfile;
use crate::domain::credentials::ports::UserProvisioner;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::CredentialMethod;
use crate::domain::user::models::NewCredential;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
    default_picture: String,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `password_hasher` - Hasher applied to new and changed passwords
    pub fn new(repository: Arc<UR>, password_hasher: auth::PasswordHasher) -> Self {
        Self {
            repository,
            password_hasher,
            default_picture: String::new(),
        }
    }

    /// Picture URL assigned to accounts created without one.
    pub fn with_default_picture(mut self, default_picture: impl Into<String>) -> Self {
        self.default_picture = default_picture.into();
        self
    }

    fn credential_from(&self, credential: NewCredential) -> Result<CredentialMethod, UserError> {
        match credential {
            NewCredential::Password(password) => Ok(CredentialMethod::Password {
                hash: self.password_hasher.hash(password.as_str())?,
            }),
            NewCredential::Federated { subject } if subject.is_empty() => {
                Err(UserError::MissingCredential)
            }
            NewCredential::Federated { subject } => Ok(CredentialMethod::Federated { subject }),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let credential = self.credential_from(command.credential)?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            email: command.email,
            credential,
            role: Role::default(),
            name: command.name,
            given_name: command.given_name,
            family_name: command.family_name,
            picture: command
                .picture
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| self.default_picture.clone()),
            email_verified: command.email_verified,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_email) = command.email {
            if new_email != user.email
                && self
                    .repository
                    .find_by_email(new_email.as_str())
                    .await?
                    .is_some()
            {
                return Err(UserError::EmailAlreadyExists(new_email.to_string()));
            }
            user.email = new_email;
        }

        if let Some(email_verified) = command.email_verified {
            user.email_verified = email_verified;
        }
        if let Some(name) = command.name {
            user.name = name;
        }
        if let Some(given_name) = command.given_name {
            user.given_name = given_name;
        }
        if let Some(family_name) = command.family_name {
            user.family_name = family_name;
        }
        if let Some(picture) = command.picture {
            user.picture = picture;
        }

        if let Some(new_password) = command.password {
            user.credential = CredentialMethod::Password {
                hash: self.password_hasher.hash(new_password.as_str())?,
            };
        }

        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}

#[async_trait]
impl<UR> UserProvisioner for UserService<UR>
where
    UR: UserRepository,
{
    async fn provision_federated(&self, profile: &GoogleProfile) -> Result<User, AuthError> {
        let command = CreateUserCommand {
            email: profile.email.clone(),
            credential: NewCredential::Federated {
                subject: profile.sub.clone(),
            },
            name: profile.name.clone(),
            given_name: profile.given_name.clone().unwrap_or_default(),
            family_name: profile.family_name.clone().unwrap_or_default(),
            picture: profile.picture.clone(),
            email_verified: profile.email_verified,
        };

        self.create_user(command).await.map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn hasher() -> auth::PasswordHasher {
        auth::PasswordHasher::with_scheme(auth::HashScheme::Bcrypt { cost: 4 })
    }

    fn existing_user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            credential: CredentialMethod::Password {
                hash: "$2b$04$existinghash".to_string(),
            },
            role: Role::User,
            name: "Existing".to_string(),
            given_name: String::new(),
            family_name: String::new(),
            picture: String::new(),
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_password_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "test@example.com"
                    && user
                        .credential
                        .password_hash()
                        .is_some_and(|h| h.starts_with("$2b$04$"))
                    && user.picture == "https://img.example.com/default.png"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), hasher())
            .with_default_picture("https://img.example.com/default.png");

        let command = CreateUserCommand::new(
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            "Test".to_string(),
            NewCredential::Password(Password::new("Str0ng!pass".to_string()).unwrap()),
        );

        let user = service.create_user(command).await.unwrap();
        assert_eq!(user.email.as_str(), "test@example.com");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(existing_user(email))));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), hasher());

        let command = CreateUserCommand::new(
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            "Test".to_string(),
            NewCredential::Federated {
                subject: "sub-1".to_string(),
            },
        );

        let result = service.create_user(command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_subject() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), hasher());
        let command = CreateUserCommand::new(
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            "Test".to_string(),
            NewCredential::Federated {
                subject: String::new(),
            },
        );

        let result = service.create_user(command).await;
        assert!(matches!(result, Err(UserError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), hasher());

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_email_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), hasher());

        let result = service.get_user_by_email("ghost@example.com").await;
        assert!(matches!(result, Err(UserError::NotFoundByEmail(_))));
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password_and_bumps_timestamp() {
        let mut repository = MockTestUserRepository::new();

        let user = existing_user("old@example.com");
        let user_id = user.id;
        let original_updated_at = user.updated_at;

        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_update()
            .withf(move |user| {
                user.email.as_str() == "new@example.com"
                    && user.name == "Renamed"
                    && user
                        .credential
                        .password_hash()
                        .is_some_and(|h| h != "$2b$04$existinghash")
                    && user.updated_at >= original_updated_at
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), hasher());

        let command = UpdateUserCommand {
            email: Some(EmailAddress::new("new@example.com".to_string()).unwrap()),
            name: Some("Renamed".to_string()),
            password: Some(Password::new("N3w!password".to_string()).unwrap()),
            ..Default::default()
        };

        let updated = service.update_user(&user_id, command).await.unwrap();
        assert_eq!(updated.email.as_str(), "new@example.com");
    }

    #[tokio::test]
    async fn test_update_user_email_taken() {
        let mut repository = MockTestUserRepository::new();

        let user = existing_user("old@example.com");
        let user_id = user.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(existing_user(email))));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository), hasher());

        let command = UpdateUserCommand {
            email: Some(EmailAddress::new("taken@example.com".to_string()).unwrap()),
            ..Default::default()
        };

        let result = service.update_user(&user_id, command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        let user_id = UserId::new();

        repository
            .expect_delete()
            .times(1)
            .returning(move |_| Err(UserError::NotFound(user_id.to_string())));

        let service = UserService::new(Arc::new(repository), hasher());

        let result = service.delete_user(&user_id).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_provision_federated_creates_federated_account() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.credential.federated_subject() == Some("google-123")
                    && user.email_verified
                    && user.given_name == "Ada"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), hasher());

        let profile = GoogleProfile {
            email: EmailAddress::new("ada@example.com".to_string()).unwrap(),
            email_verified: true,
            sub: "google-123".to_string(),
            name: "Ada Lovelace".to_string(),
            given_name: Some("Ada".to_string()),
            family_name: Some("Lovelace".to_string()),
            picture: None,
        };

        let user = service.provision_federated(&profile).await.unwrap();
        assert_eq!(user.credential.password_hash(), None);
    }
}
