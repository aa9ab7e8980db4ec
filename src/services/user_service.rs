use crate::domain::User;
use crate::errors::{GatorError, GatorResult};
use crate::storage::traits::UserRepository;

pub struct UserService<U: UserRepository> {
    repository: U,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(repository: U) -> Self {
        Self { repository }
    }

    /// Create a new user; names are unique
    pub fn register(&self, name: &str) -> GatorResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatorError::InvalidInput("user name is empty".to_string()));
        }

        let user = User::new(name.to_string());
        self.repository.create(&user)?;
        Ok(user)
    }

    pub fn get(&self, name: &str) -> GatorResult<User> {
        self.repository
            .get_by_name(name)?
            .ok_or_else(|| GatorError::NotFound(format!("user {}", name)))
    }

    pub fn list(&self) -> GatorResult<Vec<User>> {
        self.repository.list()
    }

    /// Delete every user along with their feeds and follows
    pub fn reset(&self) -> GatorResult<()> {
        self.repository.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::{SqliteStorage, SqliteUserRepository};

    fn setup() -> UserService<SqliteUserRepository> {
        let storage = SqliteStorage::in_memory().unwrap();
        UserService::new(SqliteUserRepository::new(storage))
    }

    #[test]
    fn test_register_and_get() {
        let service = setup();
        let user = service.register("kahya").unwrap();

        assert_eq!(service.get("kahya").unwrap().id, user.id);
    }

    #[test]
    fn test_register_duplicate() {
        let service = setup();
        service.register("kahya").unwrap();

        assert!(matches!(
            service.register("kahya"),
            Err(GatorError::Conflict(_))
        ));
    }

    #[test]
    fn test_register_empty_name() {
        let service = setup();
        assert!(matches!(
            service.register("  "),
            Err(GatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_get_missing() {
        let service = setup();
        assert!(matches!(service.get("nobody"), Err(GatorError::NotFound(_))));
    }

    #[test]
    fn test_reset_clears_users() {
        let service = setup();
        service.register("a").unwrap();
        service.register("b").unwrap();

        service.reset().unwrap();

        assert!(service.list().unwrap().is_empty());
    }
}
