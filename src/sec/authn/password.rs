use tokio_postgres::Error as PgError;
use deadpool_postgres::GenericClient;
use argon2::Variant;
use rand::RngCore;

use crate::net::error::Error as NetError;

pub const SALT_LEN: usize = 32;

pub type Salt = [u8; SALT_LEN];

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed updating password")]
    UpdateFailed,

    #[error(transparent)]
    Rand(#[from] rand::Error),

    #[error(transparent)]
    Argon2(#[from] argon2::Error),

    #[error(transparent)]
    Db(#[from] PgError)
}

impl From<PasswordError> for NetError {
    fn from(err: PasswordError) -> Self {
        NetError::new().source(err)
    }
}

pub fn gen_salt() -> Result<Salt, rand::Error> {
    let mut salt = [0u8; SALT_LEN];

    rand::thread_rng().try_fill_bytes(&mut salt)?;

    Ok(salt)
}

pub fn gen_hash(password: &str) -> Result<String, PasswordError> {
    let salt = gen_salt()?;

    let mut config = argon2::Config::default();
    config.mem_cost = 19456;
    config.variant = Variant::Argon2id;

    Ok(argon2::hash_encoded(
        password.as_bytes(),
        &salt,
        &config
    )?)
}

pub struct Password {
    pub user_id: i64,
    pub hash: String,
}

impl Password {
    pub async fn retrieve(
        conn: &impl GenericClient,
        user_id: &i64,
    ) -> Result<Option<Password>, PgError> {
        if let Some(row) = conn.query_opt(
            "select users.id, users.password from users where users.id = $1",
            &[user_id]
        ).await? {
            Ok(Some(Password {
                user_id: row.get(0),
                hash: row.get(1)
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn update(
        &mut self,
        conn: &impl GenericClient,
        update: &str,
    ) -> Result<(), PasswordError> {
        let encoded = gen_hash(update)?;

        let result = conn.execute(
            "update users set password = $2 where id = $1",
            &[&self.user_id, &encoded]
        ).await?;

        if result != 1 {
            return Err(PasswordError::UpdateFailed);
        }

        self.hash = encoded;

        Ok(())
    }

    pub fn verify<C>(&self, check: C) -> Result<bool, PasswordError>
    where
        C: AsRef<[u8]>
    {
        Ok(argon2::verify_encoded(&self.hash, check.as_ref())?)
    }
}
