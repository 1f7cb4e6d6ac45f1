use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginForm, SignupForm},
        password::{hash_password, verify_decoy, verify_password},
        repo::UserStore,
        repo_types::{NewUser, User, UserId},
    },
    db::StoreError,
    error::AppError,
};

/// Creates an account. Fails with `DuplicateEmail` if the normalized email is
/// already registered, whatever the other fields say.
pub async fn register(users: &dyn UserStore, mut form: SignupForm) -> Result<User, AppError> {
    form.normalize();
    form.validate().map_err(AppError::Validation)?;

    let password_hash = hash_password(&form.password)?;
    let new_user = NewUser {
        email: form.email,
        name: form.name,
        surname: form.surname,
        password_hash,
    };

    match users.create(new_user).await {
        Ok(user) => {
            info!(user_id = user.id, "user registered");
            Ok(user)
        }
        Err(StoreError::UniqueViolation(_)) => {
            warn!("signup with already registered email");
            Err(AppError::DuplicateEmail)
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks a login. Unknown email and wrong password both yield `InvalidCredentials`.
pub async fn verify_credentials(
    users: &dyn UserStore,
    mut form: LoginForm,
) -> Result<UserId, AppError> {
    form.normalize();
    form.validate().map_err(AppError::Validation)?;

    let Some(user) = users.find_by_email(&form.email).await? else {
        verify_decoy(&form.password);
        warn!("login with unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user.id)
}
