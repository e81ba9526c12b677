//! Postgres 账号存储实现

use crate::error::StorageError;
use crate::models::{ResetTokenRecord, UserRecord};
use crate::traits::UserStore;
use domain::Role;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const USER_COLUMNS: &str = "user_id, email, username, name, password_hash, role, \
                            reset_secret, reset_expires_at, created_at_ms";

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<UserRecord>, StorageError> {
        let sql = format!("select {USER_COLUMNS} from users where {column} = $1");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| user_from_row(&row)).transpose()
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StorageError> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|err| StorageError::new(err.to_string()))?;
    let reset_secret: Option<String> = row.try_get("reset_secret")?;
    let reset_expires_at: Option<i64> = row.try_get("reset_expires_at")?;
    let reset_token = match (reset_secret, reset_expires_at) {
        (Some(secret), Some(expires_at)) => Some(ResetTokenRecord {
            secret,
            expires_at: expires_at.max(0) as u64,
        }),
        _ => None,
    };
    let created_at_ms: i64 = row.try_get("created_at_ms")?;
    Ok(UserRecord {
        user_id: row.try_get("user_id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("password_hash")?,
        role,
        reset_token,
        created_at_ms: created_at_ms.max(0) as u64,
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        self.find_one("user_id", user_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        self.find_one("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        self.find_one("username", username).await
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        sqlx::query(
            "insert into users (user_id, email, username, name, password_hash, role, created_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&record.user_id)
        .bind(&record.email)
        .bind(&record.username)
        .bind(&record.name)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(record.created_at_ms as i64)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update users set password_hash = $2 where user_id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_reset_token(
        &self,
        user_id: &str,
        token: Option<ResetTokenRecord>,
    ) -> Result<bool, StorageError> {
        let (secret, expires_at) = match token {
            Some(token) => (Some(token.secret), Some(token.expires_at as i64)),
            None => (None, None),
        };
        let result = sqlx::query(
            "update users set reset_secret = $2, reset_expires_at = $3 where user_id = $1",
        )
        .bind(user_id)
        .bind(secret)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
