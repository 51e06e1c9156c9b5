//! Authentication and role resolution

use crate::{error::AppResult, models::role::Role, repository::Repository};

/// Login literal that short-circuits to the administrator check.
pub const ADMIN_LOGIN: &str = "admin";

/// Internal number of the reserved administrator coach row.
pub const ADMIN_INTERNAL_NUMBER: i64 = 999;

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
}

impl AuthService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Map a credential pair to a role. `Ok(None)` means denied; a missing
    /// match is a normal return, never an error.
    ///
    /// Resolution order, first match wins:
    /// 1. the admin literal resolves against the reserved coach row and
    ///    never falls through to the numeric branches;
    /// 2. a numeric login is tried as a coach internal number;
    /// 3. then as a user id.
    ///
    /// Coach and user ids are independent numeral spaces, so a coach match
    /// masks a user with the same numeral. Non-numeric, non-admin logins
    /// are always denied.
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<Option<Role>> {
        let login = login.trim();

        if login.eq_ignore_ascii_case(ADMIN_LOGIN) {
            let coach = self
                .repository
                .coaches
                .find_by_internal_number(ADMIN_INTERNAL_NUMBER)
                .await?;
            return Ok(match coach {
                Some(admin) if admin.password == password => {
                    tracing::info!("administrator logged in");
                    Some(Role::Administrator)
                }
                _ => {
                    tracing::debug!("admin login denied");
                    None
                }
            });
        }

        let Ok(number) = login.parse::<i64>() else {
            tracing::debug!(login, "non-numeric login denied");
            return Ok(None);
        };

        if let Some(coach) = self
            .repository
            .coaches
            .find_by_internal_number(number)
            .await?
        {
            if coach.password == password {
                tracing::info!(internal_number = number, "coach logged in");
                return Ok(Some(Role::Coach));
            }
        }

        if let Some(user) = self.repository.users.find_by_id(number).await? {
            if user.password == password {
                tracing::info!(user_id = number, "user logged in");
                return Ok(Some(Role::User));
            }
        }

        tracing::debug!(login, "login denied");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::coach::CreateCoach;
    use crate::models::user::CreateUser;

    async fn service() -> AuthService {
        let db = Database::new_in_memory().await.unwrap();
        let repo = Repository::new(db.pool().clone());
        repo.coaches
            .create(&CreateCoach {
                internal_number: ADMIN_INTERNAL_NUMBER,
                surname: "Sysadmin".to_string(),
                name: "Root".to_string(),
                experience: 99,
                password: "admin_pass".to_string(),
            })
            .await
            .unwrap();
        // Coach 5 and user 5 share a numeral on purpose.
        repo.coaches
            .create(&CreateCoach {
                internal_number: 5,
                surname: "Ivanov".to_string(),
                name: "Petr".to_string(),
                experience: 3,
                password: "coachpass".to_string(),
            })
            .await
            .unwrap();
        let mut user_id = 0;
        for _ in 0..5 {
            user_id = repo
                .users
                .create(&CreateUser {
                    surname: "Klimov".to_string(),
                    name: "Alexey".to_string(),
                    password: "userpass5".to_string(),
                })
                .await
                .unwrap();
        }
        assert_eq!(user_id, 5);
        AuthService::new(repo)
    }

    #[tokio::test]
    async fn admin_literal_resolves_to_administrator() {
        let auth = service().await;
        let role = auth.authenticate("admin", "admin_pass").await.unwrap();
        assert_eq!(role, Some(Role::Administrator));
        // Case-insensitive match on the literal.
        let role = auth.authenticate("ADMIN", "admin_pass").await.unwrap();
        assert_eq!(role, Some(Role::Administrator));
    }

    #[tokio::test]
    async fn admin_wrong_password_never_falls_through() {
        let auth = service().await;
        let role = auth.authenticate("admin", "wrong").await.unwrap();
        assert_eq!(role, None);
    }

    #[tokio::test]
    async fn coach_match_masks_user_with_same_numeral() {
        let auth = service().await;
        let role = auth.authenticate("5", "coachpass").await.unwrap();
        assert_eq!(role, Some(Role::Coach));
    }

    #[tokio::test]
    async fn coach_password_mismatch_falls_through_to_user() {
        let auth = service().await;
        let role = auth.authenticate("5", "userpass5").await.unwrap();
        assert_eq!(role, Some(Role::User));
    }

    #[tokio::test]
    async fn non_numeric_login_is_denied_not_an_error() {
        let auth = service().await;
        assert_eq!(auth.authenticate("petr", "coachpass").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_numeral_is_denied() {
        let auth = service().await;
        assert_eq!(auth.authenticate("404", "whatever").await.unwrap(), None);
    }
}
