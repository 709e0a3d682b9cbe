use chrono::Utc;
use base64::{Engine, engine::general_purpose::URL_SAFE};
use rand::RngCore;
use tokio_postgres::Error as PgError;
use deadpool_postgres::GenericClient;

use crate::net::error::Error as NetError;

pub const SESSION_ID_BYTES: usize = 48;

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SessionToken([u8; SESSION_ID_BYTES]);

#[derive(Debug, thiserror::Error)]
pub enum UniqueError {
    #[error(transparent)]
    Rand(#[from] rand::Error),

    #[error(transparent)]
    Pg(#[from] PgError),
}

impl SessionToken {
    pub fn from_vec(vec: Vec<u8>) -> Self {
        TryFrom::try_from(vec)
            .expect("invalid vector length for session token")
    }

    pub fn drain_vec(vec: &mut Vec<u8>) -> Self {
        let mut array = [0; SESSION_ID_BYTES];
        let mut index = 0;

        for v in vec.drain(0..SESSION_ID_BYTES) {
            array[index] = v;
            index += 1;
        }

        SessionToken(array)
    }

    pub async fn unique(conn: &impl GenericClient, mut attempts: usize) -> Result<Option<Self>, UniqueError> {
        let mut rtn = [0; SESSION_ID_BYTES];
        let mut count;

        while attempts > 0 {
            rand::thread_rng().try_fill_bytes(&mut rtn)?;

            count = conn.execute(
                "select token from auth_session where token = $1",
                &[&rtn.as_slice()]
            ).await?;

            if count == 0 {
                return Ok(Some(SessionToken(rtn)));
            } else {
                rtn.fill(0);
            }

            attempts -= 1;
        }

        Ok(None)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl AsRef<[u8]> for SessionToken {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("data does not have the proper length")]
pub struct InvalidLength;

impl TryFrom<Vec<u8>> for SessionToken {
    type Error = InvalidLength;

    fn try_from(vec: Vec<u8>) -> Result<Self, Self::Error> {
        if let Ok(array) = vec.try_into() {
            Ok(SessionToken(array))
        } else {
            Err(InvalidLength)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("ran out of token attempts")]
    TokenAttempts,

    #[error("date time value overflowed")]
    UtcOverflow,

    #[error(transparent)]
    Pg(PgError),

    #[error(transparent)]
    Rand(rand::Error),
}

impl From<UniqueError> for BuilderError {
    fn from(err: UniqueError) -> Self {
        match err {
            UniqueError::Rand(err) => BuilderError::Rand(err),
            UniqueError::Pg(err) => BuilderError::Pg(err)
        }
    }
}

impl From<PgError> for BuilderError {
    fn from(err: PgError) -> Self {
        BuilderError::Pg(err)
    }
}

impl From<BuilderError> for NetError {
    fn from(err: BuilderError) -> NetError {
        match err {
            BuilderError::TokenAttempts |
            BuilderError::UtcOverflow => NetError::new()
                .source(err),
            BuilderError::Pg(err) => err.into(),
            BuilderError::Rand(err) => err.into(),
        }
    }
}

pub struct SessionBuilder {
    user_id: i64,
    duration: chrono::Duration,
}

impl SessionBuilder {
    pub fn duration(&mut self, duration: std::time::Duration) -> &mut Self {
        self.duration = chrono::Duration::from_std(duration)
            .unwrap_or_else(|_| chrono::Duration::days(7));
        self
    }

    pub async fn build(self, conn: &impl GenericClient) -> Result<Session, BuilderError> {
        let user_id = self.user_id;
        let dropped = false;
        let issued_on = Utc::now();

        let Some(token) = SessionToken::unique(conn, 10).await? else {
            return Err(BuilderError::TokenAttempts);
        };

        let Some(expires) = issued_on.checked_add_signed(self.duration) else {
            return Err(BuilderError::UtcOverflow);
        };

        let _ = conn.execute(
            "\
            insert into auth_session (token, user_id, dropped, issued_on, expires) values \
            ($1, $2, $3, $4, $5)",
            &[
                &token.as_slice(),
                &user_id,
                &dropped,
                &issued_on,
                &expires,
            ]
        ).await?;

        Ok(Session {
            token,
            user_id,
            dropped,
            issued_on,
            expires,
        })
    }
}

#[derive(Debug)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: i64,
    pub dropped: bool,
    pub issued_on: chrono::DateTime<chrono::Utc>,
    pub expires: chrono::DateTime<chrono::Utc>,
}

impl Session {
    pub fn builder(user_id: i64) -> SessionBuilder {
        SessionBuilder {
            user_id,
            duration: chrono::Duration::days(7),
        }
    }

    pub async fn retrieve_token(
        conn: &impl GenericClient,
        token: &SessionToken
    ) -> Result<Option<Session>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select auth_session.token, \
                   auth_session.user_id, \
                   auth_session.dropped, \
                   auth_session.issued_on, \
                   auth_session.expires \
            from auth_session \
            where auth_session.token = $1",
            &[&token.as_slice()]
        ).await? {
            Ok(Some(Session {
                token: SessionToken::from_vec(row.get(0)),
                user_id: row.get(1),
                dropped: row.get(2),
                issued_on: row.get(3),
                expires: row.get(4),
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn delete(&self, conn: &impl GenericClient) -> Result<(), PgError> {
        let _ = conn.execute(
            "delete from auth_session where token = $1",
            &[&self.token.as_slice()]
        ).await?;

        Ok(())
    }
}

pub type Hash = blake3::Hash;

pub fn create_hash<T>(token: T) -> Hash
where
    T: AsRef<[u8]>
{
    blake3::hash(token.as_ref())
}

/// the bearer token handed to clients is base64(token bytes || blake3(token))
pub fn encode_base64<T>(token: T, hash: Hash) -> String
where
    T: AsRef<[u8]>
{
    let token_ref = token.as_ref();
    let slice = hash.as_bytes();

    let mut joined = Vec::with_capacity(token_ref.len() + slice.len());
    joined.extend_from_slice(token_ref);
    joined.extend_from_slice(slice);

    URL_SAFE.encode(joined)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64 string")]
    InvalidString,

    #[error("invalid token length")]
    InvalidLength,

    #[error("token hash mismatch")]
    InvalidHash,
}

pub fn decode_base64<S>(session_id: S) -> Result<(SessionToken, Hash), DecodeError>
where
    S: AsRef<[u8]>
{
    let Ok(mut bytes) = URL_SAFE.decode(session_id) else {
        return Err(DecodeError::InvalidString);
    };

    if bytes.len() != SESSION_ID_BYTES + blake3::OUT_LEN {
        return Err(DecodeError::InvalidLength);
    }

    let token = SessionToken::drain_vec(&mut bytes);
    let hash: [u8; blake3::OUT_LEN] = bytes.try_into()
        .expect("remaining bytes does not match expected length");
    let given = blake3::Hash::from(hash);

    let expected = blake3::hash(token.as_slice());

    if given != expected {
        Err(DecodeError::InvalidHash)
    } else {
        Ok((token, given))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let token = SessionToken([7; SESSION_ID_BYTES]);
        let hash = create_hash(&token);

        let encoded = encode_base64(&token, hash);
        let (decoded, decoded_hash) = decode_base64(&encoded)
            .expect("failed to decode session id");

        assert_eq!(token, decoded, "tokens do not match");
        assert_eq!(hash, decoded_hash, "hashes do not match");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_base64("not base64 !!!"),
            Err(DecodeError::InvalidString)
        ));

        let short = URL_SAFE.encode([1u8; 10]);

        assert!(matches!(
            decode_base64(&short),
            Err(DecodeError::InvalidLength)
        ));
    }

    #[test]
    fn decode_rejects_tampered_hash() {
        let token = SessionToken([7; SESSION_ID_BYTES]);
        let wrong = blake3::hash(b"something else");

        let encoded = encode_base64(&token, wrong);

        assert!(matches!(
            decode_base64(&encoded),
            Err(DecodeError::InvalidHash)
        ));
    }
}
