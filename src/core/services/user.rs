use crate::core::models::user::{Credentials, Insert as UserInsert, Profile, User, USERNAME_MAX_LEN};
use crate::core::ports::repository::{Store, TxStore, UserCommon};
use crate::core::services::vote::user_votes;
use crate::error::Error;
use hex::ToHex;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 32;

fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(SALT_LEN).map(char::from).collect()
}

fn validate(credentials: &Credentials) -> Result<(), Error> {
    let username = credentials.username.trim();
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        return Err(Error::BusinessError(format!("username must be 1 to {} characters", USERNAME_MAX_LEN)));
    }
    if credentials.password.is_empty() {
        return Err(Error::BusinessError("password must not be empty".into()));
    }
    Ok(())
}

pub async fn signup<T>(mut storer: T, credentials: Credentials, is_staff: bool) -> Result<i32, Error>
where
    T: TxStore,
{
    validate(&credentials)?;
    let username = credentials.username.trim().to_owned();
    if UserCommon::get_by_username(&mut storer, &username).await?.is_some() {
        return Err(Error::UsernameTaken(username));
    }
    let slt = random_salt();
    let id = UserCommon::insert(
        &mut storer,
        UserInsert {
            password: hash_password(&credentials.password, &slt),
            salt: slt,
            username,
            is_staff,
        },
    )
    .await?;
    storer.commit().await?;
    Ok(id)
}

/// `None` for an unknown username or a wrong password.
pub async fn authenticate<S>(storer: &mut S, credentials: &Credentials) -> Result<Option<User>, Error>
where
    S: Store,
{
    let user = match UserCommon::get_by_username(storer, credentials.username.trim()).await? {
        Some(u) => u,
        None => return Ok(None),
    };
    if hash_password(&credentials.password, &user.salt) != user.password {
        return Ok(None);
    }
    Ok(Some(user))
}

pub async fn profile<S>(storer: &mut S, uid: i32) -> Result<Profile, Error>
where
    S: Store,
{
    let user = UserCommon::get(storer, uid).await?.ok_or(Error::Unauthorized)?;
    let votes = user_votes(storer, uid).await?;
    Ok(Profile {
        id: user.id,
        username: user.username,
        is_staff: user.is_staff,
        votes,
    })
}

/// Creates the staff account unless a user with that name is already there.
pub async fn ensure_admin<T>(storer: T, credentials: Credentials) -> Result<(), Error>
where
    T: TxStore,
{
    let username = credentials.username.clone();
    match signup(storer, credentials, true).await {
        Ok(id) => {
            log::info!("created staff user {} ({})", username, id);
            Ok(())
        }
        Err(Error::UsernameTaken(_)) => {
            log::info!("staff user {} already exists", username);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::ports::repository::Manager;
    use crate::database::memory::MemoryManager;

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_hash_password_depends_on_salt() {
        assert_eq!(hash_password("pw", "a"), hash_password("pw", "a"));
        assert_ne!(hash_password("pw", "a"), hash_password("pw", "b"));
        assert_eq!(hash_password("pw", "a").len(), 64);
    }

    #[test]
    fn test_random_salt() {
        let salt = random_salt();
        assert_eq!(salt.len(), SALT_LEN);
        assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[actix_web::test]
    async fn test_signup_and_authenticate() {
        let m = MemoryManager::default();
        let id = signup(m.tx().await.unwrap(), credentials("alice", "secret"), false).await.unwrap();
        let mut db = m.db().await.unwrap();
        let user = authenticate(&mut db, &credentials("alice", "secret")).await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_ne!(user.password, "secret");
        assert!(authenticate(&mut db, &credentials("alice", "wrong")).await.unwrap().is_none());
        assert!(authenticate(&mut db, &credentials("bob", "secret")).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_signup_rejects_duplicates_and_blanks() {
        let m = MemoryManager::default();
        signup(m.tx().await.unwrap(), credentials("alice", "secret"), false).await.unwrap();
        assert!(matches!(signup(m.tx().await.unwrap(), credentials("alice", "other"), false).await, Err(Error::UsernameTaken(_))));
        assert!(matches!(signup(m.tx().await.unwrap(), credentials(" ", "pw"), false).await, Err(Error::BusinessError(_))));
        assert!(matches!(signup(m.tx().await.unwrap(), credentials("bob", ""), false).await, Err(Error::BusinessError(_))));
    }

    #[actix_web::test]
    async fn test_duplicate_insert_is_username_taken() {
        let m = MemoryManager::default();
        signup(m.tx().await.unwrap(), credentials("admin", "pw"), false).await.unwrap();
        let mut tx = m.tx().await.unwrap();
        let res = UserCommon::insert(
            &mut tx,
            UserInsert {
                username: "admin".into(),
                password: "x".into(),
                salt: "y".into(),
                is_staff: true,
            },
        )
        .await;
        assert!(matches!(res, Err(Error::UsernameTaken(name)) if name == "admin"));
    }

    #[actix_web::test]
    async fn test_ensure_admin_keeps_existing_user() {
        let m = MemoryManager::default();
        signup(m.tx().await.unwrap(), credentials("admin", "pw"), false).await.unwrap();
        ensure_admin(m.tx().await.unwrap(), credentials("admin", "other")).await.unwrap();
        let mut db = m.db().await.unwrap();
        let user = authenticate(&mut db, &credentials("admin", "pw")).await.unwrap().unwrap();
        assert!(!user.is_staff);
    }

    #[actix_web::test]
    async fn test_ensure_admin_is_idempotent() {
        let m = MemoryManager::default();
        ensure_admin(m.tx().await.unwrap(), credentials("admin", "pw")).await.unwrap();
        ensure_admin(m.tx().await.unwrap(), credentials("admin", "pw")).await.unwrap();
        let mut db = m.db().await.unwrap();
        let admin = authenticate(&mut db, &credentials("admin", "pw")).await.unwrap().unwrap();
        assert!(admin.is_staff);
        let profile = profile(&mut db, admin.id).await.unwrap();
        assert_eq!(profile.username, "admin");
        assert!(profile.votes.is_empty());
    }
}
